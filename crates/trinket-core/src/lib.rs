//! trinket-core: Core library for turning game item data into wiki tables
//!
//! This library provides functionality to:
//! - Scan a directory tree for item and set source files
//! - Parse the XML-like item dialect into item records
//! - Resolve item sets and merge items across files (first file wins)
//! - Export item and set rows to CSV and a sprite crop manifest
//! - Annotate, wrap and render descriptions into wiki table markup

pub mod annotate;
pub mod cache;
pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod icon;
pub mod merger;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod scanner;
pub mod sets;
pub mod sprites;
pub mod xml;

pub use annotate::{DescriptionFormatter, LinkDictionary, LinkTerm, LinkedTerms, WordWrapper};
pub use cache::{ParsedFile, SourceCache};
pub use compose::{compose_description, split_description, DescriptionParts};
pub use config::{PipelineConfig, RenderConfig};
pub use error::{Error, Result};
pub use export::{ItemEntry, Row};
pub use merger::{merge_items, MergedItem, MergedTable};
pub use parser::{parse_item_file, parse_items_str};
pub use pipeline::{extract, render_from_csv, run, Extraction, PipelineOutcome, RunReport};
pub use record::{IconRef, ItemRecord, Rect, SetEffect, SetMembership, SetRecord};
pub use render::{QualityTable, TableRenderer};
pub use scanner::{scan_directory, ScanResult};
pub use sets::{resolve_sets, MembershipIndex, SetResolution, SetSummary};
pub use sprites::{CropJob, SpriteManifest};
