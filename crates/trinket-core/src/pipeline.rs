//! End-to-end pipeline: discover, merge, export and render
//!
//! Each artifact is written independently. A failed write is logged and
//! recorded in the report while the remaining artifacts are still attempted.

use crate::annotate::LinkDictionary;
use crate::cache::SourceCache;
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::export::{self, ItemEntry, Row};
use crate::merger::{merge_items, MergedTable};
use crate::render::TableRenderer;
use crate::scanner::{scan_directory, ScanResult};
use crate::sets::{resolve_sets, SetSummary};
use crate::sprites::{icon_directive, SpriteManifest};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const ITEMS_CSV: &str = "trinket_data.csv";
pub const SETS_CSV: &str = "trinket_sets_data.csv";
pub const SPRITE_MANIFEST: &str = "sprite_manifest.json";
pub const SETS_TABLE: &str = "sets_table.txt";

/// Everything extracted from the source directory
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub scan: ScanResult,
    pub table: MergedTable,
    pub sets: Vec<SetSummary>,
}

impl Extraction {
    /// No item files and no sets were found
    pub fn is_empty(&self) -> bool {
        self.scan.item_files.is_empty() && self.sets.is_empty()
    }

    /// Item rows with icon directives resolved against `sprite_dir`
    pub fn item_rows(&self, sprite_dir: Option<&Path>) -> Vec<Row> {
        self.table
            .items
            .iter()
            .map(|item| export::item_row(item, &icon_directive(item, sprite_dir)))
            .collect()
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Artifacts written successfully, in write order
    pub files_written: Vec<PathBuf>,
    /// Artifacts that failed, with the cause
    pub errors: Vec<(PathBuf, String)>,
    pub item_count: usize,
    pub set_count: usize,
    pub duplicates_dropped: usize,
}

impl RunReport {
    /// Check if every artifact was written
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn record(&mut self, path: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => {
                info!("wrote '{}'", path.display());
                self.files_written.push(path);
            }
            Err(e) => {
                error!("{}", e);
                self.errors.push((path, e.to_string()));
            }
        }
    }
}

/// Outcome of [`run`]
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// No source files were found
    NothingToDo,
    Completed(RunReport),
}

/// Scan, parse, resolve sets and merge
pub fn extract(config: &PipelineConfig) -> Extraction {
    let scan = scan_directory(&config.source_dir, &config.extension, &config.sets_file_name);
    let cache = SourceCache::load(&scan.item_files);
    let resolution = resolve_sets(scan.sets_file.as_deref(), &cache);
    let table = merge_items(cache.files(), &resolution.index);

    info!(
        "merged {} items ({} duplicates dropped), {} sets",
        table.len(),
        table.duplicates_dropped,
        resolution.summaries.len()
    );

    Extraction {
        scan,
        table,
        sets: resolution.summaries,
    }
}

/// Load the configured link dictionary, or an empty one
pub fn load_links(config: &PipelineConfig) -> Result<LinkDictionary> {
    match &config.links {
        Some(path) => {
            let dictionary = LinkDictionary::load(path)?;
            info!("loaded {} link terms from '{}'", dictionary.len(), path.display());
            Ok(dictionary)
        }
        None => Ok(LinkDictionary::new()),
    }
}

/// Run the whole pipeline
///
/// Configuration and link dictionary problems are errors. Artifact write
/// failures are recorded in the report instead.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome> {
    config.validate()?;
    let dictionary = load_links(config)?;
    let renderer = TableRenderer::new(&dictionary, &config.render)?;

    let extraction = extract(config);
    if extraction.is_empty() {
        info!("no source files found in '{}'", config.source_dir.display());
        return Ok(PipelineOutcome::NothingToDo);
    }

    let out = &config.output_dir;
    fs::create_dir_all(out).map_err(|e| Error::FileWrite {
        path: out.clone(),
        source: e,
    })?;

    let mut report = RunReport {
        item_count: extraction.table.len(),
        set_count: extraction.sets.len(),
        duplicates_dropped: extraction.table.duplicates_dropped,
        ..RunReport::default()
    };

    let rows = extraction.item_rows(config.sprite_dir.as_deref());
    let path = out.join(ITEMS_CSV);
    report.record(path.clone(), export::write_item_rows(&path, &rows));

    let path = out.join(SETS_CSV);
    report.record(path.clone(), export::write_set_rows(&path, &extraction.sets));

    let path = out.join(SPRITE_MANIFEST);
    report.record(
        path.clone(),
        SpriteManifest::from_table(&extraction.table).save(&path),
    );

    let entries: Vec<ItemEntry> = rows.iter().map(ItemEntry::from_row).collect();
    write_tables(&renderer, &entries, &extraction.sets, out, &mut report);

    Ok(PipelineOutcome::Completed(report))
}

/// Render markup tables from previously exported CSV files
pub fn render_from_csv(
    config: &PipelineConfig,
    items_csv: &Path,
    sets_csv: Option<&Path>,
) -> Result<RunReport> {
    config.validate()?;
    let dictionary = load_links(config)?;
    let renderer = TableRenderer::new(&dictionary, &config.render)?;

    let entries: Vec<ItemEntry> = export::read_rows(items_csv)?
        .iter()
        .map(ItemEntry::from_row)
        .collect();
    let sets = match sets_csv {
        Some(path) => export::read_set_summaries(path)?,
        None => Vec::new(),
    };

    let out = &config.output_dir;
    fs::create_dir_all(out).map_err(|e| Error::FileWrite {
        path: out.clone(),
        source: e,
    })?;

    let mut report = RunReport {
        item_count: entries.len(),
        set_count: sets.len(),
        ..RunReport::default()
    };
    write_tables(&renderer, &entries, &sets, out, &mut report);
    Ok(report)
}

fn write_tables(
    renderer: &TableRenderer<'_>,
    entries: &[ItemEntry],
    sets: &[SetSummary],
    out: &Path,
    report: &mut RunReport,
) {
    for table in renderer.render_quality_tables(entries) {
        let path = out.join(renderer.quality_file_name(&table.quality));
        let result = write_text(&path, &table.markup);
        report.record(path, result);
    }

    if !sets.is_empty() {
        let path = out.join(SETS_TABLE);
        let result = write_text(&path, &renderer.render_set_table(sets, entries));
        report.record(path, result);
    }
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
