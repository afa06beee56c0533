//! Dotted parameter paths
//!
//! Generator specs and macro maps address patch parameters with paths like
//! `filters[0].cutoff` or `fx.reverb.mix`. This module resolves those paths
//! against a JSON tree for reads and writes. Writes never create structure:
//! a path that does not land on an existing field fails, which surfaces
//! typos in configuration instead of producing an invalid document.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

/// Parse a path into key/index steps. Malformed paths (empty segments,
/// unclosed or non-numeric brackets) yield `None`.
fn steps(path: &str) -> Option<Vec<Step<'_>>> {
    let mut out = Vec::new();
    for part in path.split('.') {
        if part.is_empty() {
            return None;
        }
        let key_end = part.find('[').unwrap_or(part.len());
        let key = &part[..key_end];
        if !key.is_empty() {
            out.push(Step::Key(key));
        }
        let mut rest = &part[key_end..];
        while let Some(after) = rest.strip_prefix('[') {
            let close = after.find(']')?;
            let index: usize = after[..close].parse().ok()?;
            out.push(Step::Index(index));
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Fetch the value at a path, if present.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut cur = root;
    for step in steps(path)? {
        cur = match step {
            Step::Key(key) => cur.as_object()?.get(key)?,
            Step::Index(index) => cur.as_array()?.get(index)?,
        };
    }
    Some(cur)
}

/// Fetch a numeric value at a path. Non-numeric leaves resolve to `None`.
pub fn resolve(root: &Value, path: &str) -> Option<f64> {
    get(root, path)?.as_f64()
}

/// Overwrite the value at a path. Returns `false` if the path does not
/// address an existing field.
pub fn set(root: &mut Value, path: &str, value: Value) -> bool {
    let steps = match steps(path) {
        Some(steps) => steps,
        None => return false,
    };
    let (last, walk) = match steps.split_last() {
        Some(split) => split,
        None => return false,
    };

    let mut cur = root;
    for step in walk {
        let next = match step {
            Step::Key(key) => cur.as_object_mut().and_then(|o| o.get_mut(*key)),
            Step::Index(index) => cur.as_array_mut().and_then(|a| a.get_mut(*index)),
        };
        cur = match next {
            Some(v) => v,
            None => return false,
        };
    }

    match last {
        Step::Key(key) => match cur.as_object_mut() {
            Some(obj) if obj.contains_key(*key) => {
                obj.insert((*key).to_string(), value);
                true
            }
            _ => false,
        },
        Step::Index(index) => match cur.as_array_mut().and_then(|a| a.get_mut(*index)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        },
    }
}
