//! MIDI macro transmission
//!
//! Sends the eight computed macro values as Control Change messages to a
//! hardware or software synth. Plain CC has no acknowledgement, so this is
//! fire-and-forget: no queuing, no retry. The output connection is scoped
//! to a single send and released unconditionally, even when a send fails.

use std::thread;
use std::time::Duration;

use midir::{MidiOutput, MidiOutputPort};
use tracing::info;

use crate::error::{Error, Result};
use crate::macro_map::MACRO_COUNT;

const CLIENT_NAME: &str = "patchsmith";

/// Gap between CC messages so synth UIs don't drop updates.
const INTER_MESSAGE: Duration = Duration::from_millis(2);

/// Names of the available MIDI output ports, in backend order. A system
/// with no MIDI devices yields an empty list, not an error.
pub fn list_ports() -> Result<Vec<String>> {
    let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| Error::Midi(e.to_string()))?;
    let mut names = Vec::new();
    for port in midi_out.ports() {
        names.push(
            midi_out
                .port_name(&port)
                .map_err(|e| Error::Midi(e.to_string()))?,
        );
    }
    Ok(names)
}

fn port_names(midi_out: &MidiOutput, ports: &[MidiOutputPort]) -> Vec<String> {
    ports
        .iter()
        .map(|p| midi_out.port_name(p).unwrap_or_default())
        .collect()
}

/// Resolve a user-supplied port query: exact match, then case-insensitive
/// exact, then substring.
fn find_port(midi_out: &MidiOutput, query: &str) -> Option<(MidiOutputPort, String)> {
    let ports = midi_out.ports();
    let names = port_names(midi_out, &ports);

    if let Some(i) = names.iter().position(|n| n == query) {
        return Some((ports[i].clone(), names[i].clone()));
    }
    let q = query.to_lowercase();
    if let Some(i) = names.iter().position(|n| n.to_lowercase() == q) {
        return Some((ports[i].clone(), names[i].clone()));
    }
    names
        .iter()
        .position(|n| n.to_lowercase().contains(&q))
        .map(|i| (ports[i].clone(), names[i].clone()))
}

/// Pick a likely port when none was requested: prefer an IAC or virtual
/// bus, fall back to the first available output.
fn guess_port(midi_out: &MidiOutput) -> Option<(MidiOutputPort, String)> {
    let ports = midi_out.ports();
    let names = port_names(midi_out, &ports);

    for needle in ["iac", "virtual", "through"] {
        if let Some(i) = names.iter().position(|n| n.to_lowercase().contains(needle)) {
            return Some((ports[i].clone(), names[i].clone()));
        }
    }
    ports
        .first()
        .map(|p| (p.clone(), names.first().cloned().unwrap_or_default()))
}

fn cc_bytes(channel: u8, cc: u8, value: u8) -> [u8; 3] {
    [0xB0 | (channel & 0x0F), cc & 0x7F, value & 0x7F]
}

/// Send the eight macro values as one CC message each. `port` of `None`
/// picks a virtual bus when one exists.
pub fn send_macros(
    port: Option<&str>,
    values: &[u8; MACRO_COUNT],
    cc_numbers: &[u8; MACRO_COUNT],
    channel: u8,
) -> Result<()> {
    let midi_out = MidiOutput::new(CLIENT_NAME).map_err(|e| Error::Midi(e.to_string()))?;

    let (port, name) = match port {
        Some(query) => {
            find_port(&midi_out, query).ok_or_else(|| Error::PortNotFound(query.to_string()))?
        }
        None => guess_port(&midi_out)
            .ok_or_else(|| Error::PortNotFound("no MIDI output ports available".to_string()))?,
    };

    info!("sending {} macro CCs to '{}'", MACRO_COUNT, name);
    let mut conn = midi_out
        .connect(&port, "patchsmith-macros")
        .map_err(|e| Error::Midi(e.to_string()))?;

    let mut outcome = Ok(());
    for (cc, value) in cc_numbers.iter().zip(values) {
        if let Err(e) = conn.send(&cc_bytes(channel, *cc, *value)) {
            outcome = Err(Error::Midi(e.to_string()));
            break;
        }
        thread::sleep(INTER_MESSAGE);
    }

    // Release the port even when a send failed, so the next invocation
    // can reopen it.
    conn.close();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cc_message_layout() {
        assert_eq!(cc_bytes(0, 1, 64), [0xB0, 1, 64]);
        assert_eq!(cc_bytes(9, 74, 127), [0xB9, 74, 127]);
        // out-of-range inputs are masked into MIDI ranges
        assert_eq!(cc_bytes(16, 200, 255), [0xB0, 72, 127]);
    }

    #[test]
    fn listing_ports_never_panics() {
        // Environments without MIDI backends report an empty list or a
        // backend error; both are acceptable here.
        match list_ports() {
            Ok(ports) => {
                for port in ports {
                    println!("available output: {}", port);
                }
            }
            Err(e) => println!("no MIDI backend: {}", e),
        }
    }
}
