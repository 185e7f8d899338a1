//! Pipeline configuration
//!
//! Stored as JSON; every field has a default so partial files load.

use crate::annotate::color::DEFAULT_COLOR_ESCAPE;
use crate::annotate::wrap::{DEFAULT_LINE_BREAK, DEFAULT_WRAP_WIDTH};
use crate::error::{Error, Result};
use crate::scanner::{DEFAULT_EXTENSION, DEFAULT_SETS_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for markup rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum description line width
    pub wrap_width: usize,
    /// Marker placed between wrapped lines
    pub line_break: String,
    /// Replaces spaces in row anchors
    pub anchor_separator: char,
    /// Page prefixed to set → item links (empty for same-page anchors)
    pub anchor_page: String,
    /// Plural noun used in table titles and file names
    pub title_noun: String,
    /// Escape marker of inline color codes
    pub color_escape: char,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            line_break: DEFAULT_LINE_BREAK.to_string(),
            anchor_separator: '_',
            anchor_page: String::new(),
            title_noun: "Trinkets".to_string(),
            color_escape: DEFAULT_COLOR_ESCAPE,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory searched recursively for source files
    pub source_dir: PathBuf,
    /// Directory receiving all artifacts
    pub output_dir: PathBuf,
    /// Source file extension
    pub extension: String,
    /// Basename of the sets file
    pub sets_file_name: String,
    /// Directory holding cropped sprites, checked before emitting icons
    pub sprite_dir: Option<PathBuf>,
    /// JSON link dictionary
    pub links: Option<PathBuf>,
    /// Markup settings
    pub render: RenderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("output"),
            extension: DEFAULT_EXTENSION.to_string(),
            sets_file_name: DEFAULT_SETS_FILE.to_string(),
            sprite_dir: None,
            links: None,
            render: RenderConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check values that would make the pipeline misbehave
    pub fn validate(&self) -> Result<()> {
        if self.render.wrap_width == 0 {
            return Err(Error::Config("wrap_width must be greater than 0".to_string()));
        }
        if self.extension.is_empty() {
            return Err(Error::Config("extension must not be empty".to_string()));
        }
        if self.sets_file_name.is_empty() {
            return Err(Error::Config("sets_file_name must not be empty".to_string()));
        }
        Ok(())
    }
}
