//! Set resolution: set summaries and the item → set membership index

use crate::cache::SourceCache;
use crate::error::Result;
use crate::parser::{parse_document, read_document, top_level_array};
use crate::record::{SetEffect, SetMembership, SetRecord, NO_DESCRIPTION, UNKNOWN_ITEM};
use crate::xml::Element;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Lookup from lower-cased item ID to display name
#[derive(Debug, Clone, Default)]
pub struct ItemNameLookup {
    names: HashMap<String, String>,
}

impl ItemNameLookup {
    /// Build from every cached record having both an ID and a name
    ///
    /// The first record seen for an ID wins, matching the merge order.
    pub fn from_cache(cache: &SourceCache) -> Self {
        let mut names = HashMap::new();
        for record in cache.records() {
            if let (Some(id), Some(name)) = (record.key(), record.name.as_deref()) {
                names
                    .entry(id.to_lowercase())
                    .or_insert_with(|| name.to_string());
            }
        }
        Self { names }
    }

    /// Insert a name, keeping an existing entry
    pub fn insert(&mut self, id: &str, name: &str) {
        self.names
            .entry(id.to_lowercase())
            .or_insert_with(|| name.to_string());
    }

    /// Resolve an ID to its display name, or [`UNKNOWN_ITEM`]
    pub fn resolve(&self, id: &str) -> &str {
        self.names
            .get(&id.to_lowercase())
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ITEM)
    }
}

/// Lookup from lower-cased item ID to the name of its owning set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    sets_by_item: HashMap<String, String>,
}

impl MembershipIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record membership; the first set to list an item keeps it
    pub fn insert(&mut self, item_id: &str, set_name: &str) {
        let key = item_id.to_lowercase();
        if let Some(existing) = self.sets_by_item.get(&key) {
            if existing != set_name {
                warn!(
                    "item '{}' is listed by sets '{}' and '{}', keeping '{}'",
                    key, existing, set_name, existing
                );
            }
            return;
        }
        self.sets_by_item.insert(key, set_name.to_string());
    }

    /// Membership for an item ID (case-insensitive)
    pub fn membership(&self, item_id: &str) -> SetMembership {
        match self.sets_by_item.get(&item_id.to_lowercase()) {
            Some(set_name) => SetMembership::Member {
                set_name: set_name.clone(),
            },
            None => SetMembership::NotMember,
        }
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.sets_by_item.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.sets_by_item.is_empty()
    }
}

/// Aggregate row for one set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSummary {
    /// Set display name
    pub name: String,
    /// Number of listed member IDs
    pub member_count: usize,
    /// Member display names, [`UNKNOWN_ITEM`] for unresolved IDs
    pub members: Vec<String>,
    /// Effects as `threshold:description`
    pub effects: Vec<String>,
}

impl SetSummary {
    /// Build a summary from a set record
    pub fn from_record(set: &SetRecord, names: &ItemNameLookup) -> Self {
        Self {
            name: set.name.clone(),
            member_count: set.member_ids.len(),
            members: set
                .member_ids
                .iter()
                .map(|id| names.resolve(id).to_string())
                .collect(),
            effects: set
                .effects
                .iter()
                .map(|e| format!("{}:{}", e.threshold, e.description))
                .collect(),
        }
    }

    /// Split the effect strings back into (threshold, description) pairs
    pub fn effect_pairs(&self) -> Vec<(&str, &str)> {
        self.effects
            .iter()
            .map(|e| e.split_once(':').unwrap_or(("", e.as_str())))
            .collect()
    }
}

/// Output of set resolution
#[derive(Debug, Clone, Default)]
pub struct SetResolution {
    /// The sets file, if any
    pub source: Option<PathBuf>,
    /// One summary per valid set, in document order
    pub summaries: Vec<SetSummary>,
    /// Item → set membership
    pub index: MembershipIndex,
}

/// Resolve sets from the sets file against the cached item records
///
/// A missing or unparsable sets file is logged and yields an empty resolution.
pub fn resolve_sets(sets_file: Option<&Path>, cache: &SourceCache) -> SetResolution {
    let Some(path) = sets_file else {
        info!("no sets file, skipping set resolution");
        return SetResolution::default();
    };

    let names = ItemNameLookup::from_cache(cache);
    match read_document(path).and_then(|root| {
        let array = top_level_array(&root, path)?;
        Ok(parse_sets(array))
    }) {
        Ok(sets) => {
            let mut resolution = build_resolution(&sets, &names);
            resolution.source = Some(path.to_path_buf());
            info!(
                "parsed {} sets from '{}'",
                resolution.summaries.len(),
                path.display()
            );
            resolution
        }
        Err(e) => {
            warn!("{}", e);
            SetResolution::default()
        }
    }
}

/// Resolve sets from a string (useful for testing)
pub fn resolve_sets_str(
    content: &str,
    source_name: &str,
    names: &ItemNameLookup,
) -> Result<SetResolution> {
    let path = PathBuf::from(source_name);
    let root = parse_document(content, &path)?;
    let array = top_level_array(&root, &path)?;
    let mut resolution = build_resolution(&parse_sets(array), names);
    resolution.source = Some(path);
    Ok(resolution)
}

fn build_resolution(sets: &[SetRecord], names: &ItemNameLookup) -> SetResolution {
    let mut resolution = SetResolution::default();
    for set in sets {
        debug!("found set '{}' ({})", set.name, set.id);
        for item_id in &set.member_ids {
            resolution.index.insert(item_id, &set.name);
        }
        resolution.summaries.push(SetSummary::from_record(set, names));
    }
    resolution
}

/// Parse set records from the sets file's array
///
/// Sets without both an ID and a name are skipped.
pub fn parse_sets(array: &Element) -> Vec<SetRecord> {
    array.children_with_tag("dict").filter_map(parse_set).collect()
}

fn parse_set(node: &Element) -> Option<SetRecord> {
    let id = required_string(node, "id")?.to_lowercase();
    let name = required_string(node, "name")?.to_string();

    let member_ids: Vec<String> = node
        .named_child("array", "items")
        .map(|items| {
            items
                .children_with_tag("string")
                .map(|s| s.trimmed_text())
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default();

    let effects: Vec<SetEffect> = node
        .children_with_tag("dict")
        .filter_map(|effect| {
            let threshold = effect.name_attr().filter(|n| !n.is_empty())?;
            let description = effect
                .named_child("string", "desc")
                .map(|d| d.trimmed_text())
                .filter(|d| !d.is_empty())
                .unwrap_or(NO_DESCRIPTION);
            debug!("effect {} of set '{}': {}", threshold, name, description);
            Some(SetEffect {
                threshold: threshold.to_string(),
                description: description.to_string(),
            })
        })
        .collect();

    Some(SetRecord {
        id,
        name,
        member_ids,
        effects,
    })
}

fn required_string<'a>(node: &'a Element, field: &str) -> Option<&'a str> {
    node.named_child("string", field)
        .map(|e| e.trimmed_text())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETS: &str = r#"
<array>
  <dict>
    <string name="id">Iron_Set</string>
    <string name="name">Iron Set</string>
    <array name="items">
      <string>RING1</string>
      <string>amulet1</string>
      <string> </string>
    </array>
    <dict name="2"><string name="desc">+10 Armor</string></dict>
    <dict name="3"></dict>
  </dict>
  <dict>
    <string name="id">nameless</string>
    <array name="items"><string>ring2</string></array>
  </dict>
  <dict>
    <string name="id">empty_set</string>
    <string name="name">Empty Set</string>
  </dict>
</array>
"#;

    fn names() -> ItemNameLookup {
        let mut names = ItemNameLookup::default();
        names.insert("ring1", "Iron Ring");
        names
    }

    #[test]
    fn test_set_summary() {
        let resolution = resolve_sets_str(SETS, "sets.sval", &names()).unwrap();

        assert_eq!(resolution.summaries.len(), 2);
        let iron = &resolution.summaries[0];
        assert_eq!(iron.name, "Iron Set");
        assert_eq!(iron.member_count, 2);
        assert_eq!(iron.members, vec!["Iron Ring", UNKNOWN_ITEM]);
        assert_eq!(
            iron.effects,
            vec!["2:+10 Armor".to_string(), format!("3:{}", NO_DESCRIPTION)]
        );
        assert_eq!(iron.effect_pairs()[0], ("2", "+10 Armor"));
    }

    #[test]
    fn test_set_without_name_is_dropped() {
        let resolution = resolve_sets_str(SETS, "sets.sval", &names()).unwrap();

        assert!(resolution.summaries.iter().all(|s| s.name != "nameless"));
        assert_eq!(resolution.index.membership("ring2"), SetMembership::NotMember);
    }

    #[test]
    fn test_empty_set_still_summarized() {
        let resolution = resolve_sets_str(SETS, "sets.sval", &names()).unwrap();
        let empty = &resolution.summaries[1];

        assert_eq!(empty.name, "Empty Set");
        assert_eq!(empty.member_count, 0);
        assert!(empty.members.is_empty());
    }

    #[test]
    fn test_membership_index_is_case_insensitive() {
        let resolution = resolve_sets_str(SETS, "sets.sval", &names()).unwrap();

        assert_eq!(resolution.index.len(), 2);
        assert_eq!(
            resolution.index.membership("Ring1"),
            SetMembership::Member {
                set_name: "Iron Set".to_string()
            }
        );
    }

    #[test]
    fn test_first_set_keeps_shared_item() {
        let content = r#"<array>
            <dict><string name="id">a</string><string name="name">A</string>
              <array name="items"><string>x</string></array></dict>
            <dict><string name="id">b</string><string name="name">B</string>
              <array name="items"><string>x</string></array></dict>
        </array>"#;
        let resolution = resolve_sets_str(content, "sets.sval", &names()).unwrap();

        assert_eq!(resolution.index.membership("x").set_name(), "A");
        assert_eq!(resolution.summaries.len(), 2);
    }

    #[test]
    fn test_missing_sets_file_is_empty() {
        let resolution = resolve_sets(None, &SourceCache::default());
        assert!(resolution.summaries.is_empty());
        assert!(resolution.index.is_empty());

        let resolution = resolve_sets(Some(Path::new("nope/sets.sval")), &SourceCache::default());
        assert!(resolution.summaries.is_empty());
    }

    #[test]
    fn test_name_lookup_first_wins() {
        let mut names = ItemNameLookup::default();
        names.insert("A", "First");
        names.insert("a", "Second");

        assert_eq!(names.resolve("a"), "First");
        assert_eq!(names.resolve("missing"), UNKNOWN_ITEM);
    }
}
