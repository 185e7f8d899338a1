//! Parsed-record cache shared by set resolution and merging
//!
//! Every item file is parsed exactly once. A file that fails to parse is
//! logged and contributes no records.

use crate::parser::parse_item_file;
use crate::record::ItemRecord;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Records parsed from one source file
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub path: PathBuf,
    pub records: Vec<ItemRecord>,
}

/// Parsed records for all item files, in discovery order
#[derive(Debug, Clone, Default)]
pub struct SourceCache {
    files: Vec<ParsedFile>,
}

impl SourceCache {
    /// Parse every file in order
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Self {
        let files = paths
            .iter()
            .map(|path| {
                let path = path.as_ref();
                let records = match parse_item_file(path) {
                    Ok(records) => {
                        info!("parsed {} items from '{}'", records.len(), path.display());
                        records
                    }
                    Err(e) => {
                        warn!("{}", e);
                        Vec::new()
                    }
                };
                ParsedFile {
                    path: path.to_path_buf(),
                    records,
                }
            })
            .collect();

        Self { files }
    }

    /// Build a cache from already-parsed files
    pub fn from_files(files: Vec<ParsedFile>) -> Self {
        Self { files }
    }

    /// Parsed files in discovery order
    pub fn files(&self) -> &[ParsedFile] {
        &self.files
    }

    /// All records across files, in discovery then document order
    pub fn records(&self) -> impl Iterator<Item = &ItemRecord> {
        self.files.iter().flat_map(|f| f.records.iter())
    }

    /// Total number of parsed records, duplicates included
    pub fn record_count(&self) -> usize {
        self.files.iter().map(|f| f.records.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_bad_files_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.sval");
        let bad = dir.path().join("bad.sval");
        let missing = dir.path().join("missing.sval");
        fs::write(
            &good,
            r#"<array><dict><string name="id">a</string></dict></array>"#,
        )
        .unwrap();
        fs::write(&bad, "<array><dict></array>").unwrap();

        let cache = SourceCache::load(&[&good, &bad, &missing]);

        assert_eq!(cache.files().len(), 3);
        assert_eq!(cache.files()[0].records.len(), 1);
        assert!(cache.files()[1].records.is_empty());
        assert!(cache.files()[2].records.is_empty());
        assert_eq!(cache.record_count(), 1);
    }
}
