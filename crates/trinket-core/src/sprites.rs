//! Sprite crop manifest
//!
//! Lists the (spritesheet, rectangle) pair of every merged item with an icon
//! so an external cropper can cut `<id>.png` files from the sheets.

use crate::error::{Error, Result};
use crate::merger::{MergedItem, MergedTable};
use crate::record::Rect;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One sprite to crop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropJob {
    /// Item the sprite belongs to
    pub id: String,
    /// Spritesheet path as written in the source data
    pub spritesheet: String,
    /// Area to crop
    pub rect: Rect,
    /// File name the cropper should write
    pub output: String,
}

/// All crop jobs for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteManifest {
    /// When the manifest was generated
    pub generated_at: DateTime<Utc>,
    /// Jobs in item table order
    pub jobs: Vec<CropJob>,
}

impl SpriteManifest {
    /// Collect a crop job for every item with an icon
    pub fn from_table(table: &MergedTable) -> Self {
        let jobs = table
            .items
            .iter()
            .filter_map(|item| {
                let icon = item.record.icon.as_ref()?;
                Some(CropJob {
                    id: item.id().to_string(),
                    spritesheet: icon.spritesheet.clone(),
                    rect: icon.rect,
                    output: sprite_file_name(item.id()),
                })
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            jobs,
        }
    }

    /// Load a manifest from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the manifest to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Find the job for an item
    pub fn find_job(&self, id: &str) -> Option<&CropJob> {
        self.jobs.iter().find(|j| j.id == id)
    }
}

/// File name of a cropped sprite
pub fn sprite_file_name(id: &str) -> String {
    format!("{}.png", id)
}

/// Image directive for an item's icon cell
///
/// Empty when the item has no icon, or when a sprite directory is given and
/// the cropped sprite is not in it.
pub fn icon_directive(item: &MergedItem, sprite_dir: Option<&Path>) -> String {
    if item.record.icon.is_none() {
        return String::new();
    }

    let file_name = sprite_file_name(item.id());
    match sprite_dir {
        Some(dir) if !dir.join(&file_name).is_file() => String::new(),
        _ => format!("[[File:{}]]", file_name),
    }
}
