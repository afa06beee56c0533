//! # Patchsmith - Synth Preset Generation and Macro Control
//!
//! Patchsmith generates synthesizer preset files from constrained-random
//! category archetypes, validates them against a field schema, and drives
//! the synth's eight macro knobs over MIDI Control Change.
//!
//! ## Core Features
//!
//! - **Constrained Randomization**: archetype recipes (lead, bass, pad,
//!   pluck) sample every parameter from declared ranges and weighted
//!   choices, so generated patches stay musically plausible
//! - **Schema Validation**: one pass collects every violation (unknown
//!   field, wrong type, out-of-range value, bad enum) with a field path
//! - **Macro Mapping**: eight configurable slots map patch parameters to
//!   0..=127 CC values through linear or gamma curves
//! - **MIDI Transmission**: fire-and-forget CC delivery to any output
//!   port, with IAC/virtual-bus autodetection
//! - **Deterministic Batches**: a seed reproduces an identical patch
//!   sequence, byte for byte
//!
//! ## Data Flow
//!
//! 1. **Generate**: `randomizer` samples a [`patch::PatchDocument`] per
//!    the generator spec, the validator re-checks it, `io` writes JSON
//! 2. **Send**: a patch file is loaded through the parse-and-validate
//!    boundary, `macro_map` computes eight CC values, `midi` transmits
//!    them
//!
//! ## Quick Start
//!
//! ```rust
//! use patchsmith::randomizer::{self, GeneratorSpec};
//!
//! let spec: GeneratorSpec = toml::from_str(r#"
//!     [categories.lead.params]
//!     "filters[0].cutoff" = { min = 0.55, max = 0.95 }
//!     "envelopes[0].release" = { min = 0.05, max = 0.2 }
//! "#).unwrap();
//!
//! let patches = randomizer::generate(&spec, "lead", 4, Some(42)).unwrap();
//! assert_eq!(patches.len(), 4);
//! ```

pub mod error;
pub mod io;
pub mod macro_map;
pub mod midi;
pub mod patch;
pub mod paths;
pub mod randomizer;
pub mod schema;
pub mod validate;

pub use error::{Error, Result};
pub use patch::PatchDocument;
