//! Directory scanner for discovering source files
//!
//! Discovery order is a lexical walk: entries are visited sorted by file
//! name within each directory. First-wins merging depends on this order.
//! The sets file directly under the root is preferred over nested ones.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Default source file extension
pub const DEFAULT_EXTENSION: &str = "sval";

/// Default basename of the dedicated sets file
pub const DEFAULT_SETS_FILE: &str = "sets.sval";

/// Result of scanning a source directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root directory that was scanned
    pub root: PathBuf,
    /// Item source files, in discovery order
    pub item_files: Vec<PathBuf>,
    /// The sets file, if one was found
    pub sets_file: Option<PathBuf>,
}

impl ScanResult {
    /// Total number of source files found
    pub fn total_files(&self) -> usize {
        self.item_files.len() + usize::from(self.sets_file.is_some())
    }

    /// Check whether there is nothing to process
    pub fn is_empty(&self) -> bool {
        self.total_files() == 0
    }
}

/// Scan a directory recursively for source files
///
/// A missing root is logged and yields an empty result.
pub fn scan_directory<P: AsRef<Path>>(root: P, extension: &str, sets_file_name: &str) -> ScanResult {
    let root = root.as_ref();
    let mut result = ScanResult {
        root: root.to_path_buf(),
        ..ScanResult::default()
    };

    if !root.is_dir() {
        warn!("source directory '{}' does not exist", root.display());
        return result;
    }

    let mut sets_candidates: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == extension) {
            continue;
        }

        if path.file_name().is_some_and(|name| name == sets_file_name) {
            sets_candidates.push(path.to_path_buf());
            continue;
        }

        result.item_files.push(path.to_path_buf());
    }

    result.sets_file = choose_sets_file(root, sets_file_name, &sets_candidates);
    if let Some(chosen) = &result.sets_file {
        for ignored in sets_candidates.iter().filter(|p| *p != chosen) {
            warn!(
                "ignoring extra sets file '{}', using '{}'",
                ignored.display(),
                chosen.display()
            );
        }
    }

    info!(
        "found {} source files in '{}'",
        result.total_files(),
        root.display()
    );

    result
}

/// The sets file directly under the root wins; otherwise the first one found
fn choose_sets_file(root: &Path, sets_file_name: &str, candidates: &[PathBuf]) -> Option<PathBuf> {
    let at_root = root.join(sets_file_name);
    candidates
        .iter()
        .find(|p| **p == at_root)
        .or_else(|| candidates.first())
        .cloned()
}
