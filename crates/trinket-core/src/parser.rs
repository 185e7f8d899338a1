//! Parser for item source files

use crate::error::{Error, Result};
use crate::icon::{extract_icon, is_icon_node};
use crate::record::ItemRecord;
use crate::xml::{parse_wrapped, Element};
use std::fs;
use std::path::{Path, PathBuf};

/// Read and parse a source file into its synthetic root element
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Element> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_document(&content, path)
}

/// Parse source content into its synthetic root element
pub fn parse_document(content: &str, path: &Path) -> Result<Element> {
    parse_wrapped(content).map_err(|message| Error::Xml {
        path: path.to_path_buf(),
        message,
    })
}

/// Get the top-level array container of a parsed document
pub fn top_level_array<'a>(root: &'a Element, path: &Path) -> Result<&'a Element> {
    root.child("array").ok_or_else(|| Error::MissingArray {
        path: path.to_path_buf(),
    })
}

/// Parse an item source file into records, in document order
pub fn parse_item_file<P: AsRef<Path>>(path: P) -> Result<Vec<ItemRecord>> {
    let path = path.as_ref();
    let root = read_document(path)?;
    let array = top_level_array(&root, path)?;
    Ok(extract_records(array))
}

/// Parse item source content from a string (useful for testing)
pub fn parse_items_str(content: &str, source_name: &str) -> Result<Vec<ItemRecord>> {
    let path = PathBuf::from(source_name);
    let root = parse_document(content, &path)?;
    let array = top_level_array(&root, &path)?;
    Ok(extract_records(array))
}

/// Extract one record per `dict` child of the array
///
/// Nodes that yield no fields at all produce no record.
pub fn extract_records(array: &Element) -> Vec<ItemRecord> {
    array
        .children_with_tag("dict")
        .map(extract_record)
        .filter(|record| !record.is_empty())
        .collect()
}

fn extract_record(node: &Element) -> ItemRecord {
    let mut record = ItemRecord::new();

    for field in &node.children {
        if is_icon_node(field) {
            record.icon = extract_icon(field);
            continue;
        }

        let Some(name) = field.name_attr() else {
            continue;
        };

        // Numeric names are positional artifacts, not fields
        if name.is_empty() || name.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        record.set_field(&name.to_lowercase(), field.trimmed_text().to_string());
    }

    record
}
