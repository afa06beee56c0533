//! Typed patch documents
//!
//! A `PatchDocument` is a complete synthesizer sound: oscillators, filters,
//! envelopes, LFOs, effects, and global settings. Raw JSON goes through an
//! explicit parse-and-validate boundary (`from_value`): the tree is checked
//! against the schema first, and only then deserialized, so typed access
//! only ever sees a valid patch. Documents are value objects with no
//! shared state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Saw,
    Square,
    Sine,
    Triangle,
    Wavetable,
    Noise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Lowpass4,
    Lowpass2,
    Bandpass,
    Highpass4,
    Highpass2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LfoShape {
    Sine,
    Triangle,
    Square,
    Saw,
    Random,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Eco,
    High,
    Ultra,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Oscillator {
    pub wave: Waveform,
    pub wt_position: f32,
    /// Semitones, -24..=24
    pub transpose: i32,
    pub detune: f32,
    pub amp: f32,
}

impl Default for Oscillator {
    fn default() -> Self {
        Oscillator {
            wave: Waveform::Saw,
            wt_position: 0.5,
            transpose: 0,
            detune: 0.0,
            amp: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Filter {
    #[serde(rename = "type")]
    pub filter_type: FilterType,
    pub cutoff: f32,
    pub resonance: f32,
    pub drive: f32,
    /// Blend toward this filter when two are active
    pub mix: f32,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            filter_type: FilterType::Lowpass4,
            cutoff: 0.5,
            resonance: 0.2,
            drive: 0.0,
            mix: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope {
            attack: 0.01,
            decay: 0.15,
            sustain: 0.8,
            release: 0.15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Lfo {
    /// Hz when not tempo-synced
    pub rate: f32,
    pub shape: LfoShape,
    pub amount: f32,
    pub tempo_sync: bool,
}

impl Default for Lfo {
    fn default() -> Self {
        Lfo {
            rate: 0.2,
            shape: LfoShape::Sine,
            amount: 0.0,
            tempo_sync: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Reverb {
    pub mix: f32,
    pub size: f32,
}

impl Default for Reverb {
    fn default() -> Self {
        Reverb { mix: 0.1, size: 0.5 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Delay {
    pub mix: f32,
    pub time: f32,
    pub feedback: f32,
    pub sync: bool,
}

impl Default for Delay {
    fn default() -> Self {
        Delay {
            mix: 0.1,
            time: 0.3,
            feedback: 0.2,
            sync: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Chorus {
    pub mix: f32,
    pub rate: f32,
    pub depth: f32,
}

impl Default for Chorus {
    fn default() -> Self {
        Chorus {
            mix: 0.0,
            rate: 0.2,
            depth: 0.2,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FxSection {
    pub reverb: Reverb,
    pub delay: Delay,
    pub chorus: Chorus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalSection {
    pub name: String,
    pub category: String,
    pub volume: f32,
    /// Metadata only, not used for synthesis
    pub bpm: f32,
    pub quality: Quality,
}

impl Default for GlobalSection {
    fn default() -> Self {
        GlobalSection {
            name: "Init".to_string(),
            category: "init".to_string(),
            volume: 0.8,
            bpm: 120.0,
            quality: Quality::High,
        }
    }
}

/// A complete patch. `Default` is the init patch the randomizer starts from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchDocument {
    pub oscillators: Vec<Oscillator>,
    pub filters: Vec<Filter>,
    pub envelopes: Vec<Envelope>,
    pub lfos: Vec<Lfo>,
    pub fx: FxSection,
    pub global: GlobalSection,
}

impl Default for PatchDocument {
    fn default() -> Self {
        Self::init()
    }
}

impl PatchDocument {
    /// The init patch: three oscillators (third silent), one lowpass
    /// filter, amp + mod envelopes, one idle LFO.
    pub fn init() -> Self {
        PatchDocument {
            oscillators: vec![
                Oscillator::default(),
                Oscillator {
                    wave: Waveform::Square,
                    amp: 0.7,
                    ..Oscillator::default()
                },
                Oscillator {
                    wave: Waveform::Sine,
                    wt_position: 0.0,
                    amp: 0.0,
                    ..Oscillator::default()
                },
            ],
            filters: vec![Filter::default()],
            envelopes: vec![
                Envelope::default(),
                Envelope {
                    attack: 0.02,
                    decay: 0.25,
                    sustain: 0.4,
                    release: 0.2,
                },
            ],
            lfos: vec![Lfo::default()],
            fx: FxSection::default(),
            global: GlobalSection::default(),
        }
    }

    /// Serialize to a raw JSON tree.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::Json)
    }

    /// The parse-and-validate boundary: check the raw tree against the
    /// schema, then deserialize. Typed access never sees an invalid patch.
    pub fn from_value(value: Value) -> Result<Self> {
        let result = validate::validate(&value);
        if !result.ok() {
            return Err(Error::Invalid(result));
        }
        serde_json::from_value(value).map_err(Error::Json)
    }

    /// Parse and validate a JSON string.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Load and validate a patch file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Save as pretty-printed JSON with a trailing newline, so the files
    /// stay human-editable and diff cleanly.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.global.name
    }
}
