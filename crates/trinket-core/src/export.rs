//! Tabular rows for merged items and sets, and their CSV encoding
//!
//! A row is a mapping from column name to string value. Item rows share one
//! sorted column set: every observed field plus the derived columns.

use crate::compose::compose_description;
use crate::error::{Error, Result};
use crate::merger::MergedItem;
use crate::sets::SetSummary;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A row of named string values
pub type Row = BTreeMap<String, String>;

pub const SET_ITEM_COLUMN: &str = "Set Item";
pub const SET_NAME_COLUMN: &str = "Item Set Name";
pub const ICON_COLUMN: &str = "icon";
pub const SPRITESHEET_COLUMN: &str = "spritesheet";
pub const COORDINATES_COLUMN: &str = "coordinates";
pub const DESCRIPTION_COLUMN: &str = "description";

pub const SET_COUNT_COLUMN: &str = "Items in Set";
pub const SET_MEMBERS_COLUMN: &str = "Set Items";
pub const SET_EFFECTS_COLUMN: &str = "Set Effect";

/// Columns every item row carries regardless of source fields
pub const DERIVED_ITEM_COLUMNS: &[&str] = &[
    SET_ITEM_COLUMN,
    SET_NAME_COLUMN,
    ICON_COLUMN,
    SPRITESHEET_COLUMN,
    COORDINATES_COLUMN,
    DESCRIPTION_COLUMN,
];

/// Fixed column order for set rows
pub const SET_COLUMNS: &[&str] = &[
    SET_NAME_COLUMN,
    SET_COUNT_COLUMN,
    SET_MEMBERS_COLUMN,
    SET_EFFECTS_COLUMN,
];

/// Format a boolean the way the item table stores it
fn bool_cell(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Build the row for a merged item
pub fn item_row(item: &MergedItem, icon: &str) -> Row {
    let record = &item.record;
    let mut row: Row = record
        .fields()
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .collect();

    row.insert(
        SET_ITEM_COLUMN.to_string(),
        bool_cell(item.membership.is_member()).to_string(),
    );
    row.insert(
        SET_NAME_COLUMN.to_string(),
        item.membership.set_name().to_string(),
    );
    row.insert(ICON_COLUMN.to_string(), icon.to_string());

    let (sheet, coordinates) = match &record.icon {
        Some(icon) => (icon.spritesheet.clone(), icon.rect.to_string()),
        None => (String::new(), String::new()),
    };
    row.insert(SPRITESHEET_COLUMN.to_string(), sheet);
    row.insert(COORDINATES_COLUMN.to_string(), coordinates);
    row.insert(
        DESCRIPTION_COLUMN.to_string(),
        compose_description(record.desc.as_deref(), record.attune_desc.as_deref()),
    );

    row
}

/// Sorted union of all row columns and the derived columns
pub fn item_columns(rows: &[Row]) -> Vec<String> {
    let mut columns: BTreeSet<String> = DERIVED_ITEM_COLUMNS.iter().map(|c| c.to_string()).collect();
    for row in rows {
        columns.extend(row.keys().cloned());
    }
    columns.into_iter().collect()
}

/// Build the row for a set summary
pub fn set_row(summary: &SetSummary) -> Row {
    let mut row = Row::new();
    row.insert(SET_NAME_COLUMN.to_string(), summary.name.clone());
    row.insert(SET_COUNT_COLUMN.to_string(), summary.member_count.to_string());
    row.insert(SET_MEMBERS_COLUMN.to_string(), summary.members.join("\n"));
    row.insert(SET_EFFECTS_COLUMN.to_string(), summary.effects.join("\n\n"));
    row
}

/// Rebuild a set summary from its row
pub fn set_summary_from_row(row: &Row) -> SetSummary {
    let cell = |column: &str| row.get(column).map(String::as_str).unwrap_or_default();
    let split = |text: &str, separator: &str| -> Vec<String> {
        if text.is_empty() {
            Vec::new()
        } else {
            text.split(separator).map(str::to_string).collect()
        }
    };

    SetSummary {
        name: cell(SET_NAME_COLUMN).to_string(),
        member_count: cell(SET_COUNT_COLUMN).trim().parse().unwrap_or(0),
        members: split(cell(SET_MEMBERS_COLUMN), "\n"),
        effects: split(cell(SET_EFFECTS_COLUMN), "\n\n"),
    }
}

/// Typed view of an item row, as the renderer consumes it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemEntry {
    pub id: String,
    pub name: String,
    pub quality: String,
    pub price: String,
    pub description: String,
    pub icon: String,
    pub is_set_member: bool,
    pub set_name: String,
}

impl ItemEntry {
    /// Read the entry's columns from a row; missing columns are empty
    pub fn from_row(row: &Row) -> Self {
        let cell = |column: &str| row.get(column).cloned().unwrap_or_default();
        Self {
            id: cell("id"),
            name: cell("name"),
            quality: cell("quality"),
            price: cell("price"),
            description: cell(DESCRIPTION_COLUMN),
            icon: cell(ICON_COLUMN),
            is_set_member: cell(SET_ITEM_COLUMN).trim().eq_ignore_ascii_case("true"),
            set_name: cell(SET_NAME_COLUMN),
        }
    }
}

/// Write rows as CSV with the given column order
pub fn write_rows<P: AsRef<Path>, S: AsRef<str>>(path: P, columns: &[S], rows: &[Row]) -> Result<()> {
    let path = path.as_ref();
    let csv_error = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record(columns.iter().map(|c| c.as_ref()))
        .map_err(csv_error)?;

    for row in rows {
        let values = columns
            .iter()
            .map(|c| row.get(c.as_ref()).map(String::as_str).unwrap_or_default());
        writer.write_record(values).map_err(csv_error)?;
    }

    writer.flush().map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Read CSV rows keyed by header
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let csv_error = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Write the item table CSV
pub fn write_item_rows<P: AsRef<Path>>(path: P, rows: &[Row]) -> Result<()> {
    write_rows(path, &item_columns(rows), rows)
}

/// Write the set table CSV
pub fn write_set_rows<P: AsRef<Path>>(path: P, summaries: &[SetSummary]) -> Result<()> {
    let rows: Vec<Row> = summaries.iter().map(set_row).collect();
    write_rows(path, SET_COLUMNS, &rows)
}

/// Read set summaries back from a set table CSV
pub fn read_set_summaries<P: AsRef<Path>>(path: P) -> Result<Vec<SetSummary>> {
    Ok(read_rows(path)?.iter().map(set_summary_from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{IconRef, ItemRecord, Rect, SetMembership};

    fn ring() -> MergedItem {
        let mut record = ItemRecord::new();
        record.set_field("id", "ring1".to_string());
        record.set_field("name", "Iron Ring".to_string());
        record.set_field("quality", "common".to_string());
        record.set_field("desc", "+5 Armor".to_string());
        record.set_field("weight", "1".to_string());
        record.icon = Some(IconRef {
            spritesheet: "sheet.png".to_string(),
            rect: Rect::new(0, 16, 16, 16).unwrap(),
        });
        MergedItem {
            record,
            membership: SetMembership::Member {
                set_name: "Iron Set".to_string(),
            },
        }
    }

    #[test]
    fn test_item_row_derived_columns() {
        let row = item_row(&ring(), "[[File:ring1.png]]");

        assert_eq!(row["Set Item"], "True");
        assert_eq!(row["Item Set Name"], "Iron Set");
        assert_eq!(row["coordinates"], "0 16 16 16");
        assert_eq!(row["spritesheet"], "sheet.png");
        assert_eq!(row["description"], "Base: +5 Armor");
        assert_eq!(row["weight"], "1");
    }

    #[test]
    fn test_non_member_row_is_explicit() {
        let mut item = ring();
        item.membership = SetMembership::NotMember;
        let row = item_row(&item, "");

        assert_eq!(row["Set Item"], "False");
        assert_eq!(row["Item Set Name"], "");
    }

    #[test]
    fn test_item_columns_sorted_union() {
        let mut other = Row::new();
        other.insert("zeta".to_string(), "z".to_string());
        let rows = vec![item_row(&ring(), ""), other];

        let columns = item_columns(&rows);

        assert_eq!(columns[0], "Item Set Name");
        assert_eq!(columns[1], "Set Item");
        assert!(columns.contains(&"zeta".to_string()));
        let mut sorted = columns.clone();
        sorted.sort();
        assert_eq!(columns, sorted);
    }

    #[test]
    fn test_item_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.csv");
        let rows = vec![item_row(&ring(), "[[File:ring1.png]]")];

        write_item_rows(&path, &rows).unwrap();
        let read = read_rows(&path).unwrap();

        let entry = ItemEntry::from_row(&read[0]);
        assert_eq!(entry.name, "Iron Ring");
        assert!(entry.is_set_member);
        assert_eq!(entry.set_name, "Iron Set");
        assert_eq!(entry.icon, "[[File:ring1.png]]");
        assert_eq!(entry.price, "");
    }

    #[test]
    fn test_set_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sets.csv");
        let summaries = vec![SetSummary {
            name: "Iron Set".to_string(),
            member_count: 2,
            members: vec!["Iron Ring".to_string(), "Unknown Item".to_string()],
            effects: vec!["2:+10 Armor".to_string(), "3:Line\nbreak".to_string()],
        }];

        write_set_rows(&path, &summaries).unwrap();
        let read = read_set_summaries(&path).unwrap();

        assert_eq!(read, summaries);
    }

    #[test]
    fn test_write_failure_reports_path() {
        let err = write_item_rows("no/such/dir/items.csv", &[]).unwrap_err();
        assert!(err.to_string().contains("no/such/dir/items.csv"));
    }
}
