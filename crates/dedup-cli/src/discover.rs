//! Directory Discovery (C11): recursively find `.docx` files under an input
//! directory, sorted by path.
//!
//! Discovery order is load-bearing — it determines the order in which
//! extraction is attempted, and `doc_id`s are assigned densely to the
//! documents that survive extraction, in this order (see §7,
//! Document-parse-failure: a failed document receives no `doc_id`).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use dedup_core::CoreError;

/// Recursively discover every `.docx` file under `root`, sorted by path.
pub fn discover_paths(root: &Path) -> Result<Vec<PathBuf>, CoreError> {
    if !root.is_dir() {
        return Err(CoreError::InputMissing(root.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("docx"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();
    Ok(paths)
}
