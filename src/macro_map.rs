//! Macro slot mapping
//!
//! A macro map ties the synth's eight macro knobs to patch parameters.
//! Each slot names one or more source paths, an input range, a scaling
//! curve, and the CC number it is sent on. Slots with several sources
//! average their individually-scaled values, so a macro always fits in a
//! single CC byte no matter how many parameters feed it. A source path
//! absent from the document is an error, never a silent zero.
//!
//! Named `macro_map` rather than `macro` because that's a keyword.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::patch::PatchDocument;
use crate::paths;

/// Number of macro knobs on the target synth.
pub const MACRO_COUNT: usize = 8;

/// The full 8-slot map, loaded once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroMap {
    pub slots: Vec<MacroSlot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MacroSlot {
    #[serde(default)]
    pub name: Option<String>,
    /// CC number; defaults to slot position + 1 (CC 1..=8).
    #[serde(default)]
    pub cc: Option<u8>,
    /// Parameter paths feeding this slot.
    pub sources: Vec<String>,
    /// Input domain of the source values.
    #[serde(default = "default_range")]
    pub range: [f64; 2],
    #[serde(default)]
    pub curve: Curve,
    #[serde(default)]
    pub invert: bool,
}

fn default_range() -> [f64; 2] {
    [0.0, 1.0]
}

/// Scaling curve: `"linear"` or `"pow:<gamma>"`. Gamma above 1 biases
/// low, below 1 biases high.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum Curve {
    Linear,
    Pow(f64),
}

impl Default for Curve {
    fn default() -> Self {
        Curve::Linear
    }
}

impl TryFrom<String> for Curve {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, String> {
        let s = s.trim().to_lowercase();
        if s == "linear" {
            return Ok(Curve::Linear);
        }
        if let Some(gamma) = s.strip_prefix("pow:") {
            let gamma: f64 = gamma
                .parse()
                .map_err(|_| format!("bad gamma in curve '{}'", s))?;
            if !gamma.is_finite() || gamma <= 0.0 {
                return Err(format!("gamma must be positive, got '{}'", s));
            }
            return Ok(Curve::Pow(gamma));
        }
        Err(format!(
            "unknown curve '{}' (expected \"linear\" or \"pow:<gamma>\")",
            s
        ))
    }
}

impl MacroSlot {
    /// Map a source value through range, curve, and invert to 0..=127.
    fn scale(&self, x: f64) -> f64 {
        let [lo, hi] = self.range;
        let mut t = ((x - lo) / (hi - lo)).clamp(0.0, 1.0);
        if let Curve::Pow(gamma) = self.curve {
            t = t.powf(gamma);
        }
        if self.invert {
            t = 1.0 - t;
        }
        t * 127.0
    }
}

impl MacroMap {
    /// Load and sanity-check a macro map.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let map: MacroMap = toml::from_str(&text)?;
        map.check()?;
        Ok(map)
    }

    fn check(&self) -> Result<()> {
        if self.slots.len() != MACRO_COUNT {
            return Err(Error::Config(format!(
                "macro map must declare exactly {} slots, found {}",
                MACRO_COUNT,
                self.slots.len()
            )));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.sources.is_empty() {
                return Err(Error::Config(format!("macro {}: no source paths", i + 1)));
            }
            if let Some(cc) = slot.cc {
                if cc > 127 {
                    return Err(Error::Config(format!("macro {}: CC {} out of range", i + 1, cc)));
                }
            }
            let [lo, hi] = slot.range;
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(Error::Config(format!(
                    "macro {}: bad input range [{}, {}]",
                    i + 1,
                    lo,
                    hi
                )));
            }
        }
        Ok(())
    }

    /// CC number per slot, defaulting to 1..=8.
    pub fn cc_numbers(&self) -> [u8; MACRO_COUNT] {
        let mut cc = [0u8; MACRO_COUNT];
        for (i, slot) in self.slots.iter().enumerate().take(MACRO_COUNT) {
            cc[i] = slot.cc.unwrap_or(i as u8 + 1);
        }
        cc
    }
}

/// Compute the eight macro values for a patch. Aborts on the first slot
/// whose source path is absent from the document.
pub fn compute_macros(doc: &PatchDocument, map: &MacroMap) -> Result<[u8; MACRO_COUNT]> {
    let value = doc.to_value()?;
    let mut out = [0u8; MACRO_COUNT];

    for (i, slot) in map.slots.iter().enumerate().take(MACRO_COUNT) {
        let mut scaled = Vec::with_capacity(slot.sources.len());
        for path in &slot.sources {
            let x = paths::resolve(&value, path).ok_or_else(|| {
                Error::MissingParameter(format!(
                    "macro {} references '{}' which is absent from the patch",
                    i + 1,
                    path
                ))
            })?;
            scaled.push(slot.scale(x));
        }
        let avg = scaled.iter().sum::<f64>() / scaled.len() as f64;
        out[i] = avg.round().clamp(0.0, 127.0) as u8;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::PatchDocument;

    fn slot(sources: &[&str]) -> MacroSlot {
        MacroSlot {
            name: None,
            cc: None,
            sources: sources.iter().map(|s| s.to_string()).collect(),
            range: [0.0, 1.0],
            curve: Curve::Linear,
            invert: false,
        }
    }

    fn map_with(slots: Vec<MacroSlot>) -> MacroMap {
        assert_eq!(slots.len(), MACRO_COUNT);
        MacroMap { slots }
    }

    fn eight(first: MacroSlot) -> Vec<MacroSlot> {
        let mut slots = vec![first];
        slots.resize(MACRO_COUNT, slot(&["global.volume"]));
        slots
    }

    #[test]
    fn curve_parsing() {
        assert_eq!(Curve::try_from("linear".to_string()), Ok(Curve::Linear));
        assert_eq!(Curve::try_from("pow:0.5".to_string()), Ok(Curve::Pow(0.5)));
        assert!(Curve::try_from("log".to_string()).is_err());
        assert!(Curve::try_from("pow:-1".to_string()).is_err());
    }

    #[test]
    fn values_scale_into_cc_range() {
        let mut doc = PatchDocument::init();
        doc.filters[0].cutoff = 0.5;
        let map = map_with(eight(slot(&["filters[0].cutoff"])));
        let values = compute_macros(&doc, &map).unwrap();
        assert_eq!(values[0], 64); // 0.5 * 127 rounded
        assert!(values.iter().all(|v| *v <= 127));
    }

    #[test]
    fn multi_source_slots_average() {
        let mut doc = PatchDocument::init();
        doc.filters[0].cutoff = 1.0;
        doc.filters[0].resonance = 0.0;
        let map = map_with(eight(slot(&["filters[0].cutoff", "filters[0].resonance"])));
        let values = compute_macros(&doc, &map).unwrap();
        assert_eq!(values[0], 64); // (127 + 0) / 2 rounded
    }

    #[test]
    fn pow_curve_and_invert() {
        let mut doc = PatchDocument::init();
        doc.filters[0].cutoff = 0.25;

        let mut curved = slot(&["filters[0].cutoff"]);
        curved.curve = Curve::Pow(0.5);
        let values = compute_macros(&doc, &map_with(eight(curved))).unwrap();
        assert_eq!(values[0], 64); // sqrt(0.25) = 0.5

        let mut inverted = slot(&["filters[0].cutoff"]);
        inverted.invert = true;
        let values = compute_macros(&doc, &map_with(eight(inverted))).unwrap();
        assert_eq!(values[0], 95); // (1 - 0.25) * 127 rounded
    }

    #[test]
    fn missing_source_path_aborts() {
        let doc = PatchDocument::init(); // two envelopes
        let map = map_with(eight(slot(&["envelopes[2].attack"])));
        match compute_macros(&doc, &map) {
            Err(Error::MissingParameter(msg)) => {
                assert!(msg.contains("envelopes[2].attack"));
                assert!(msg.contains("macro 1"));
            }
            other => panic!("expected MissingParameter, got {:?}", other),
        }
    }

    #[test]
    fn cc_numbers_default_to_one_through_eight() {
        let map = map_with(eight(slot(&["global.volume"])));
        assert_eq!(map.cc_numbers(), [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn slot_count_is_enforced() {
        let map = MacroMap {
            slots: vec![slot(&["global.volume"]); 3],
        };
        assert!(map.check().is_err());
    }

    #[test]
    fn shipped_macro_map_matches_init_patch() {
        let text = include_str!("../configs/macro_map.toml");
        let map: MacroMap = toml::from_str(text).unwrap();
        map.check().unwrap();
        let values = compute_macros(&PatchDocument::init(), &map).unwrap();
        assert_eq!(values.len(), MACRO_COUNT);
    }
}
