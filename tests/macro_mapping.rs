//! Macro computation over generated patches: always eight CC-range
//! values for a valid document, and a hard error when a slot references
//! a parameter the document doesn't have.

use patchsmith::macro_map::{self, MacroMap};
use patchsmith::patch::PatchDocument;
use patchsmith::randomizer::{self, GeneratorSpec};
use patchsmith::Error;

fn shipped_map() -> MacroMap {
    toml::from_str(include_str!("../configs/macro_map.toml")).expect("shipped macro map")
}

#[test]
fn eight_values_in_cc_range_for_any_valid_patch() {
    let spec: GeneratorSpec =
        toml::from_str(include_str!("../configs/generators.toml")).unwrap();
    let map = shipped_map();

    for category in ["lead", "bass", "pad", "pluck"] {
        for doc in randomizer::generate(&spec, category, 8, Some(77)).unwrap() {
            let values = macro_map::compute_macros(&doc, &map).unwrap();
            assert_eq!(values.len(), 8);
            assert!(values.iter().all(|v| *v <= 127));
        }
    }
}

#[test]
fn slot_referencing_absent_envelope_is_missing_parameter() {
    let text = r#"
        [[slots]]
        sources = ["envelopes[2].attack"]

        [[slots]]
        sources = ["filters[0].cutoff"]

        [[slots]]
        sources = ["filters[0].resonance"]

        [[slots]]
        sources = ["oscillators[0].wt_position"]

        [[slots]]
        sources = ["oscillators[1].wt_position"]

        [[slots]]
        sources = ["envelopes[0].sustain"]

        [[slots]]
        sources = ["fx.reverb.mix"]

        [[slots]]
        sources = ["fx.delay.mix"]
    "#;
    let map: MacroMap = toml::from_str(text).unwrap();

    // The init patch carries two envelopes; envelopes[2] does not exist.
    let doc = PatchDocument::init();
    match macro_map::compute_macros(&doc, &map) {
        Err(Error::MissingParameter(msg)) => assert!(msg.contains("envelopes[2].attack")),
        other => panic!("expected MissingParameter, got {:?}", other),
    }
}

#[test]
fn macros_follow_the_patch_not_the_category() {
    let map = shipped_map();

    let mut dark = PatchDocument::init();
    dark.filters[0].cutoff = 0.1;
    let mut bright = PatchDocument::init();
    bright.filters[0].cutoff = 0.9;

    let dark_values = macro_map::compute_macros(&dark, &map).unwrap();
    let bright_values = macro_map::compute_macros(&bright, &map).unwrap();
    assert!(dark_values[0] < bright_values[0]);
}
