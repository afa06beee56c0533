//! Structural patch validation
//!
//! Checks a raw JSON tree against the schema before any typed access
//! happens. Every violation is collected in a single pass so a bad patch
//! file can be fixed in one edit, never fail-fast. Rules, in order:
//! required sections, known fields, type compatibility, numeric range,
//! enum membership.

use serde_json::Value;

use crate::schema::{self, FieldSpec, ARRAY_SECTIONS, SECTIONS};

/// One schema violation: where and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub reason: String,
}

/// Outcome of validating one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// A document with zero violations is ok.
    pub fn ok(&self) -> bool {
        self.violations.is_empty()
    }

    fn push(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(Violation {
            path: path.into(),
            reason: reason.into(),
        });
    }
}

/// Validate a raw patch document. Pure function over the input and the
/// immutable schema.
pub fn validate(doc: &Value) -> ValidationResult {
    let mut result = ValidationResult::default();

    let root = match doc.as_object() {
        Some(obj) => obj,
        None => {
            result.push("", "expected object");
            return result;
        }
    };

    for section in SECTIONS {
        if !root.contains_key(section) {
            result.push(section, "missing required section");
        }
    }

    for (key, value) in root {
        if !SECTIONS.contains(&key.as_str()) {
            result.push(key, "unknown field");
        } else if ARRAY_SECTIONS.contains(&key.as_str()) {
            check_sequence(key, value, &mut result);
        } else if key == "fx" {
            check_fx(value, &mut result);
        } else {
            check_block(key, value, &mut result);
        }
    }

    result
}

fn check_sequence(section: &str, value: &Value, result: &mut ValidationResult) {
    let items = match value.as_array() {
        Some(items) => items,
        None => {
            result.push(section, "expected array");
            return;
        }
    };
    for (i, item) in items.iter().enumerate() {
        check_block(&format!("{}[{}]", section, i), item, result);
    }
}

fn check_fx(value: &Value, result: &mut ValidationResult) {
    let effects = match value.as_object() {
        Some(effects) => effects,
        None => {
            result.push("fx", "expected object");
            return;
        }
    };
    for (effect, params) in effects {
        check_block(&format!("fx.{}", effect), params, result);
    }
}

fn check_block(prefix: &str, value: &Value, result: &mut ValidationResult) {
    let fields = match value.as_object() {
        Some(fields) => fields,
        None => {
            result.push(prefix, "expected object");
            return;
        }
    };
    for (field, v) in fields {
        let path = format!("{}.{}", prefix, field);
        match schema::describe(&path) {
            None => result.push(path, "unknown field"),
            Some(spec) => check_value(&path, v, spec, result),
        }
    }
}

fn check_value(path: &str, value: &Value, spec: &FieldSpec, result: &mut ValidationResult) {
    match spec {
        FieldSpec::Float { min, max } => match value.as_f64() {
            None => result.push(path, "expected number"),
            Some(x) if x < *min => result.push(path, format!("below minimum {}", min)),
            Some(x) if x > *max => result.push(path, format!("above maximum {}", max)),
            Some(_) => {}
        },
        FieldSpec::Int { min, max } => match value.as_i64() {
            None => result.push(path, "expected integer"),
            Some(x) if x < *min => result.push(path, format!("below minimum {}", min)),
            Some(x) if x > *max => result.push(path, format!("above maximum {}", max)),
            Some(_) => {}
        },
        FieldSpec::Choice(allowed) => match value.as_str() {
            None => result.push(path, "expected string"),
            Some(s) if !allowed.contains(&s) => {
                result.push(path, format!("not one of [{}]", allowed.join(", ")));
            }
            Some(_) => {}
        },
        FieldSpec::Text => {
            if !value.is_string() {
                result.push(path, "expected string");
            }
        }
        FieldSpec::Bool => {
            if !value.is_boolean() {
                result.push(path, "expected boolean");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::PatchDocument;

    #[test]
    fn default_patch_is_valid() {
        let value = PatchDocument::default().to_value().unwrap();
        let result = validate(&value);
        assert!(result.ok(), "violations: {:?}", result.violations);
    }

    #[test]
    fn negative_cutoff_reports_path_and_reason() {
        let mut value = PatchDocument::default().to_value().unwrap();
        value["filters"][0]["cutoff"] = serde_json::json!(-5);
        let result = validate(&value);
        assert!(!result.ok());
        assert_eq!(
            result.violations,
            vec![Violation {
                path: "filters[0].cutoff".to_string(),
                reason: "below minimum 0".to_string(),
            }]
        );
    }

    #[test]
    fn missing_section_and_unknown_field() {
        let mut value = PatchDocument::default().to_value().unwrap();
        value.as_object_mut().unwrap().remove("lfos");
        value["noise"] = serde_json::json!({"color": 0.5});
        let result = validate(&value);
        let reasons: Vec<_> = result
            .violations
            .iter()
            .map(|v| (v.path.as_str(), v.reason.as_str()))
            .collect();
        assert!(reasons.contains(&("lfos", "missing required section")));
        assert!(reasons.contains(&("noise", "unknown field")));
    }

    #[test]
    fn collects_every_violation_in_one_pass() {
        let mut value = PatchDocument::default().to_value().unwrap();
        value["filters"][0]["cutoff"] = serde_json::json!(2.0);
        value["filters"][0]["type"] = serde_json::json!("combfilter");
        value["oscillators"][0]["transpose"] = serde_json::json!(0.5);
        value["global"]["volume"] = serde_json::json!("loud");
        let result = validate(&value);
        assert_eq!(result.violations.len(), 4);
    }

    #[test]
    fn enum_violation_names_allowed_values() {
        let mut value = PatchDocument::default().to_value().unwrap();
        value["global"]["quality"] = serde_json::json!("insane");
        let result = validate(&value);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].reason,
            "not one of [eco, high, ultra]"
        );
    }

    #[test]
    fn non_object_root() {
        let result = validate(&serde_json::json!([1, 2, 3]));
        assert!(!result.ok());
        assert_eq!(result.violations[0].reason, "expected object");
    }
}
