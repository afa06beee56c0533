//! Batch patch export
//!
//! Filename stems come from the patch name; characters that are unsafe on
//! common filesystems are replaced and collisions get a numeric suffix so
//! an export never clobbers an earlier file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::patch::PatchDocument;

/// Replace filesystem-hostile characters with underscores.
pub fn sanitize_filename(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn stem_for(doc: &PatchDocument, index: usize) -> String {
    let name = sanitize_filename(doc.name());
    if name.is_empty() {
        format!("patch_{:04}", index)
    } else {
        name
    }
}

/// Write every document into `out_dir` as `<name>.json`, creating the
/// directory if needed. Returns the written paths in input order.
pub fn save_batch(docs: &[PatchDocument], out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(docs.len());
    for (i, doc) in docs.iter().enumerate() {
        let stem = stem_for(doc, i + 1);
        let mut candidate = out_dir.join(format!("{}.json", stem));
        let mut suffix = 1;
        while candidate.exists() {
            candidate = out_dir.join(format!("{}.{}.json", stem, suffix));
            suffix += 1;
        }
        doc.save(&candidate)?;
        written.push(candidate);
    }

    info!("wrote {} patches to {}", written.len(), out_dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_hostile_characters() {
        assert_eq!(sanitize_filename("LD/01: bright?"), "LD_01_ bright_");
        assert_eq!(sanitize_filename("  "), "");
    }

    #[test]
    fn batch_export_avoids_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = PatchDocument::init();
        a.global.name = "Same".to_string();
        let b = a.clone();

        let written = save_batch(&[a, b], dir.path()).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].file_name().unwrap(), "Same.json");
        assert_eq!(written[1].file_name().unwrap(), "Same.1.json");
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn unnamed_patches_fall_back_to_numbered_stems() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = PatchDocument::init();
        doc.global.name = String::new();
        let written = save_batch(&[doc], dir.path()).unwrap();
        assert_eq!(written[0].file_name().unwrap(), "patch_0001.json");
    }
}
