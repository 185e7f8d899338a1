//! Core record types for item and set data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Display name used for a set member ID that resolves to no item
pub const UNKNOWN_ITEM: &str = "Unknown Item";

/// Description used for a set effect node without a `desc` field
pub const NO_DESCRIPTION: &str = "<No description found>";

/// A rectangle in spritesheet pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a rectangle, rejecting zero-sized ones
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width,
            height,
        })
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for Rect {
    type Err = String;

    /// Parse four whitespace-separated integers
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<u32> = s
            .split_whitespace()
            .map(|v| v.parse::<u32>().map_err(|e| format!("'{}': {}", v, e)))
            .collect::<Result<_, _>>()?;

        match values.as_slice() {
            &[x, y, width, height] => Rect::new(x, y, width, height)
                .ok_or_else(|| format!("empty rectangle '{}'", s.trim())),
            _ => Err(format!("expected 4 integers, found {}", values.len())),
        }
    }
}

/// An icon reference: a spritesheet path and the sprite's rectangle in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRef {
    pub spritesheet: String,
    pub rect: Rect,
}

/// One item parsed from a source file
///
/// Known fields are named; anything else lands in `extra`, keyed by the
/// lower-cased field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub quality: Option<String>,
    pub price: Option<String>,
    pub desc: Option<String>,
    pub attune_desc: Option<String>,
    pub icon: Option<IconRef>,
    pub extra: BTreeMap<String, String>,
}

impl ItemRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a field by its (already lower-cased) source name
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "id" => self.id = Some(value),
            "name" => self.name = Some(value),
            "quality" => self.quality = Some(value),
            "price" => self.price = Some(value),
            "desc" => self.desc = Some(value),
            "attune-desc" => self.attune_desc = Some(value),
            _ => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }

    /// Check whether no field was extracted at all
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_none()
            && self.quality.is_none()
            && self.price.is_none()
            && self.desc.is_none()
            && self.attune_desc.is_none()
            && self.icon.is_none()
            && self.extra.is_empty()
    }

    /// The record's ID, if present and non-empty
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Iterate over the plain text fields as (column, value) pairs
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        let known = [
            ("id", &self.id),
            ("name", &self.name),
            ("quality", &self.quality),
            ("price", &self.price),
            ("desc", &self.desc),
            ("attune-desc", &self.attune_desc),
        ];

        known
            .into_iter()
            .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

/// A set effect that activates at a number of equipped members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetEffect {
    /// Item-count threshold (the effect node's name)
    pub threshold: String,
    /// Effect description, or [`NO_DESCRIPTION`]
    pub description: String,
}

/// A set definition from the sets file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRecord {
    /// Set ID (lower-cased)
    pub id: String,
    /// Display name
    pub name: String,
    /// Member item IDs (lower-cased), in listing order
    pub member_ids: Vec<String>,
    /// Effects in document order
    pub effects: Vec<SetEffect>,
}

/// Whether a merged item belongs to a set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetMembership {
    /// Listed by the named set
    Member { set_name: String },
    /// Confirmed to belong to no set
    NotMember,
}

impl SetMembership {
    /// Check if this is a set member
    pub fn is_member(&self) -> bool {
        matches!(self, SetMembership::Member { .. })
    }

    /// The owning set's name, or an empty string for non-members
    pub fn set_name(&self) -> &str {
        match self {
            SetMembership::Member { set_name } => set_name,
            SetMembership::NotMember => "",
        }
    }
}
