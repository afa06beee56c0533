//! Constrained-random patch generation
//!
//! Category archetypes (lead, bass, pad, pluck, ...) are pure data: a
//! generator spec maps parameter paths to distributions, and the engine
//! samples each one into the init patch. Adding a category is a config
//! edit, never a code change. Distributions only ever cover schema-legal
//! ranges; the export pipeline re-validates every document as a safety
//! net, so a spec authored out of range fails loudly instead of writing
//! broken files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::patch::PatchDocument;
use crate::paths;

/// Per-category randomization recipes, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSpec {
    pub categories: BTreeMap<String, CategorySpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategorySpec {
    /// Stem for generated patch names, e.g. "LD" -> "LD_0001".
    #[serde(default)]
    pub name_prefix: Option<String>,
    /// Parameter path -> distribution.
    pub params: BTreeMap<String, Distribution>,
    /// Applied after `params`; lets a spec pin or re-range single fields.
    #[serde(default)]
    pub overrides: BTreeMap<String, Distribution>,
}

/// One sampling rule. In TOML:
/// `{ min = 0.55, max = 0.95 }`, `{ values = [...], weights = [...] }`,
/// or a bare constant.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Distribution {
    Uniform {
        min: f64,
        max: f64,
    },
    Choice {
        values: Vec<Scalar>,
        #[serde(default)]
        weights: Vec<f64>,
    },
    Constant(Scalar),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Int(i64),
    Number(f64),
    Text(String),
}

impl Scalar {
    fn to_value(&self) -> Value {
        match self {
            Scalar::Flag(b) => json!(b),
            Scalar::Int(i) => json!(i),
            Scalar::Number(x) => json!(x),
            Scalar::Text(s) => json!(s),
        }
    }
}

impl Distribution {
    fn sample(&self, rng: &mut StdRng) -> Value {
        match self {
            Distribution::Uniform { min, max } => json!(round4(rng.gen_range(*min..=*max))),
            Distribution::Choice { values, weights } => {
                values[pick_weighted(rng, values.len(), weights)].to_value()
            }
            Distribution::Constant(scalar) => scalar.to_value(),
        }
    }
}

/// Four decimals is plenty of resolution for normalized synth parameters
/// and keeps the exported JSON readable.
fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

fn pick_weighted(rng: &mut StdRng, n: usize, weights: &[f64]) -> usize {
    if weights.is_empty() {
        return rng.gen_range(0..n);
    }
    let total: f64 = weights.iter().sum();
    let mut x = rng.gen::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        if x < *w {
            return i;
        }
        x -= w;
    }
    n - 1
}

impl GeneratorSpec {
    /// Load and sanity-check a generator spec.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let spec: GeneratorSpec = toml::from_str(&text)?;
        spec.check()?;
        Ok(spec)
    }

    fn check(&self) -> Result<()> {
        for (category, cat) in &self.categories {
            for (path, dist) in cat.params.iter().chain(cat.overrides.iter()) {
                check_distribution(dist).map_err(|reason| {
                    Error::Config(format!("category '{}', param '{}': {}", category, path, reason))
                })?;
            }
        }
        Ok(())
    }
}

fn check_distribution(dist: &Distribution) -> std::result::Result<(), String> {
    match dist {
        Distribution::Uniform { min, max } => {
            if !min.is_finite() || !max.is_finite() {
                return Err("non-finite bound".to_string());
            }
            if min > max {
                return Err(format!("empty range [{}, {}]", min, max));
            }
        }
        Distribution::Choice { values, weights } => {
            if values.is_empty() {
                return Err("empty choice list".to_string());
            }
            if !weights.is_empty() {
                if weights.len() != values.len() {
                    return Err(format!(
                        "{} weights for {} values",
                        weights.len(),
                        values.len()
                    ));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err("negative or non-finite weight".to_string());
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err("weights sum to zero".to_string());
                }
            }
        }
        Distribution::Constant(Scalar::Number(x)) if !x.is_finite() => {
            return Err("non-finite constant".to_string());
        }
        Distribution::Constant(_) => {}
    }
    Ok(())
}

/// Generate `count` patches for a category. With a seed the output
/// sequence is fully reproducible; without one it draws from entropy.
pub fn generate(
    spec: &GeneratorSpec,
    category: &str,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<PatchDocument>> {
    let cat = spec
        .categories
        .get(category)
        .ok_or_else(|| Error::Config(format!("unknown category '{}'", category)))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let prefix = cat
        .name_prefix
        .clone()
        .unwrap_or_else(|| category.to_uppercase());

    let mut docs = Vec::with_capacity(count);
    for i in 1..=count {
        let mut value = PatchDocument::init().to_value()?;

        for (path, dist) in cat.params.iter().chain(cat.overrides.iter()) {
            let sampled = dist.sample(&mut rng);
            if !paths::set(&mut value, path, sampled) {
                return Err(Error::Config(format!(
                    "category '{}': no such parameter path '{}'",
                    category, path
                )));
            }
        }

        let name = format!("{}_{:04}", prefix, i);
        paths::set(&mut value, "global.name", json!(name));
        paths::set(&mut value, "global.category", json!(category));

        // Safety net: a spec that samples outside the schema fails here.
        docs.push(PatchDocument::from_value(value)?);
    }

    debug!("generated {} '{}' patches", docs.len(), category);
    Ok(docs)
}
