//! Merge engine: deduplicates items across files and joins set membership

use crate::cache::ParsedFile;
use crate::record::{ItemRecord, SetMembership};
use crate::sets::MembershipIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// An item with its set membership joined in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedItem {
    pub record: ItemRecord,
    pub membership: SetMembership,
}

impl MergedItem {
    /// The item's ID
    pub fn id(&self) -> &str {
        self.record.key().unwrap_or_default()
    }
}

/// The merged item table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergedTable {
    /// Items, one per ID, in first-seen order
    pub items: Vec<MergedItem>,
    /// Files that contributed to this table, in merge order
    pub sources: Vec<PathBuf>,
    /// Number of later duplicates that were dropped
    pub duplicates_dropped: usize,
}

impl MergedTable {
    /// Get the number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by ID (case-sensitive)
    pub fn find_by_id(&self, id: &str) -> Option<&MergedItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Find an item by display name
    pub fn find_by_name(&self, name: &str) -> Option<&MergedItem> {
        self.items
            .iter()
            .find(|item| item.record.name.as_deref() == Some(name))
    }
}

/// Merge parsed files into a single table
///
/// Files are taken in the given order and records in document order; the
/// first record for an ID wins. Records without an ID are dropped.
pub fn merge_items(files: &[ParsedFile], index: &MembershipIndex) -> MergedTable {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut table = MergedTable::default();

    for file in files {
        table.sources.push(file.path.clone());

        for record in &file.records {
            let Some(id) = record.key() else {
                continue;
            };

            if !seen.insert(id) {
                table.duplicates_dropped += 1;
                continue;
            }

            table.items.push(join_membership(record.clone(), index));
        }
    }

    table
}

/// Attach membership from the index to a record
pub fn join_membership(record: ItemRecord, index: &MembershipIndex) -> MergedItem {
    let membership = record
        .key()
        .map(|id| index.membership(id))
        .unwrap_or(SetMembership::NotMember);

    let label = record.name.as_deref().unwrap_or("Unknown");
    match &membership {
        SetMembership::Member { set_name } => {
            debug!("'{}' belongs to set '{}'", label, set_name)
        }
        SetMembership::NotMember => debug!("'{}' is not part of any set", label),
    }

    MergedItem { record, membership }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_items_str;

    fn parsed(name: &str, content: &str) -> ParsedFile {
        ParsedFile {
            path: PathBuf::from(name),
            records: parse_items_str(content, name).unwrap(),
        }
    }

    #[test]
    fn test_first_file_wins() {
        let a = parsed(
            "a.sval",
            r#"<array><dict><string name="id">x</string><string name="name">From A</string></dict></array>"#,
        );
        let b = parsed(
            "b.sval",
            r#"<array><dict><string name="id">x</string><string name="name">From B</string></dict>
               <dict><string name="id">y</string><string name="name">Only B</string></dict></array>"#,
        );

        let table = merge_items(&[a, b], &MembershipIndex::new());

        assert_eq!(table.len(), 2);
        assert_eq!(table.duplicates_dropped, 1);
        assert_eq!(
            table.find_by_id("x").unwrap().record.name.as_deref(),
            Some("From A")
        );
        assert_eq!(table.sources.len(), 2);
    }

    #[test]
    fn test_same_file_duplicate_dropped() {
        let a = parsed(
            "a.sval",
            r#"<array><dict><string name="id">x</string><string name="price">1</string></dict>
               <dict><string name="id">x</string><string name="price">2</string></dict></array>"#,
        );

        let table = merge_items(&[a], &MembershipIndex::new());

        assert_eq!(table.len(), 1);
        assert_eq!(table.items[0].record.price.as_deref(), Some("1"));
    }

    #[test]
    fn test_ids_are_case_sensitive() {
        let a = parsed(
            "a.sval",
            r#"<array><dict><string name="id">x</string></dict><dict><string name="id">X</string></dict></array>"#,
        );

        let table = merge_items(&[a], &MembershipIndex::new());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_records_without_id_dropped() {
        let a = parsed(
            "a.sval",
            r#"<array><dict><string name="name">Nameless</string></dict><dict><string name="id"></string></dict></array>"#,
        );

        let table = merge_items(&[a], &MembershipIndex::new());
        assert!(table.is_empty());
    }

    #[test]
    fn test_membership_joined() {
        let a = parsed(
            "a.sval",
            r#"<array>
                <dict><string name="id">ring1</string><string name="name">Iron Ring</string>
                  <string name="quality">common</string><string name="desc">+5 Armor</string>
                  <int name="price">10</int></dict>
                <dict><string name="id">ring2</string><string name="name">Gold Ring</string></dict>
            </array>"#,
        );
        let mut index = MembershipIndex::new();
        index.insert("ring1", "iron_set");

        let table = merge_items(&[a], &index);

        let ring1 = table.find_by_id("ring1").unwrap();
        assert!(ring1.membership.is_member());
        assert_eq!(ring1.membership.set_name(), "iron_set");

        let ring2 = table.find_by_name("Gold Ring").unwrap();
        assert_eq!(ring2.membership, SetMembership::NotMember);
    }
}
