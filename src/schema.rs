//! Patch field schema
//!
//! Declares the structural shape of a valid patch: every recognized field
//! path with its type, numeric bounds, and allowed enumerations. Lookup is
//! index-insensitive (`filters[0].cutoff` and `filters[3].cutoff` describe
//! the same field). An unknown path is a negative lookup, not an error;
//! the validator decides policy.

use std::collections::HashMap;

/// Top-level sections every patch document must carry.
pub const SECTIONS: [&str; 6] = ["oscillators", "filters", "envelopes", "lfos", "fx", "global"];

/// Sections that hold an ordered sequence of parameter blocks.
pub const ARRAY_SECTIONS: [&str; 4] = ["oscillators", "filters", "envelopes", "lfos"];

pub const WAVEFORMS: &[&str] = &["saw", "square", "sine", "triangle", "wavetable", "noise"];
pub const FILTER_TYPES: &[&str] = &["lowpass4", "lowpass2", "bandpass", "highpass4", "highpass2"];
pub const LFO_SHAPES: &[&str] = &["sine", "triangle", "square", "saw", "random"];
pub const QUALITIES: &[&str] = &["eco", "high", "ultra"];

/// Declared type and bounds for one field path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSpec {
    Float { min: f64, max: f64 },
    Int { min: i64, max: i64 },
    Choice(&'static [&'static str]),
    Text,
    Bool,
}

lazy_static::lazy_static! {
    static ref FIELDS: HashMap<&'static str, FieldSpec> = {
        use FieldSpec::*;
        let mut m = HashMap::new();

        m.insert("oscillators[].wave", Choice(WAVEFORMS));
        m.insert("oscillators[].wt_position", Float { min: 0.0, max: 1.0 });
        m.insert("oscillators[].transpose", Int { min: -24, max: 24 });
        m.insert("oscillators[].detune", Float { min: 0.0, max: 1.0 });
        m.insert("oscillators[].amp", Float { min: 0.0, max: 1.0 });

        m.insert("filters[].type", Choice(FILTER_TYPES));
        m.insert("filters[].cutoff", Float { min: 0.0, max: 1.0 });
        m.insert("filters[].resonance", Float { min: 0.0, max: 1.0 });
        m.insert("filters[].drive", Float { min: 0.0, max: 1.0 });
        m.insert("filters[].mix", Float { min: 0.0, max: 1.0 });

        m.insert("envelopes[].attack", Float { min: 0.0, max: 10.0 });
        m.insert("envelopes[].decay", Float { min: 0.0, max: 10.0 });
        m.insert("envelopes[].sustain", Float { min: 0.0, max: 1.0 });
        m.insert("envelopes[].release", Float { min: 0.0, max: 10.0 });

        m.insert("lfos[].rate", Float { min: 0.0, max: 40.0 });
        m.insert("lfos[].shape", Choice(LFO_SHAPES));
        m.insert("lfos[].amount", Float { min: 0.0, max: 1.0 });
        m.insert("lfos[].tempo_sync", Bool);

        m.insert("fx.reverb.mix", Float { min: 0.0, max: 1.0 });
        m.insert("fx.reverb.size", Float { min: 0.0, max: 1.0 });
        m.insert("fx.delay.mix", Float { min: 0.0, max: 1.0 });
        m.insert("fx.delay.time", Float { min: 0.0, max: 2.0 });
        m.insert("fx.delay.feedback", Float { min: 0.0, max: 0.95 });
        m.insert("fx.delay.sync", Bool);
        m.insert("fx.chorus.mix", Float { min: 0.0, max: 1.0 });
        m.insert("fx.chorus.rate", Float { min: 0.0, max: 10.0 });
        m.insert("fx.chorus.depth", Float { min: 0.0, max: 1.0 });

        m.insert("global.name", Text);
        m.insert("global.category", Text);
        m.insert("global.volume", Float { min: 0.0, max: 1.0 });
        m.insert("global.bpm", Float { min: 20.0, max: 300.0 });
        m.insert("global.quality", Choice(QUALITIES));

        m
    };
}

/// Strip concrete indices so any element of a sequence section matches the
/// same table entry: `filters[0].cutoff` -> `filters[].cutoff`.
fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_index = false;
    for ch in path.chars() {
        match ch {
            '[' => {
                in_index = true;
                out.push('[');
            }
            ']' => {
                in_index = false;
                out.push(']');
            }
            _ if in_index => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Look up the declared type and bounds for a field path.
pub fn describe(path: &str) -> Option<&'static FieldSpec> {
    FIELDS.get(normalize(path).as_str())
}

pub fn is_known_field(path: &str) -> bool {
    describe(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_indexed_paths() {
        assert_eq!(
            describe("filters[0].cutoff"),
            Some(&FieldSpec::Float { min: 0.0, max: 1.0 })
        );
        assert_eq!(describe("filters[17].cutoff"), describe("filters[2].cutoff"));
    }

    #[test]
    fn unknown_path_is_negative_lookup() {
        assert!(describe("filters[0].wobble").is_none());
        assert!(!is_known_field("noise.color"));
        assert!(is_known_field("oscillators[1].wave"));
    }

    #[test]
    fn enumerations_are_closed() {
        match describe("oscillators[0].wave") {
            Some(FieldSpec::Choice(allowed)) => assert!(allowed.contains(&"saw")),
            other => panic!("unexpected spec: {:?}", other),
        }
    }

    #[test]
    fn every_table_path_is_normalized() {
        for path in FIELDS.keys() {
            assert_eq!(normalize(path), *path);
        }
    }
}
