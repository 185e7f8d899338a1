//! Trinket table CLI
//!
//! Command-line tool for extracting item data and rendering wiki tables.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trinket_core::{
    extract, parse_item_file, render_from_csv, run, PipelineConfig, PipelineOutcome, RunReport,
};

#[derive(Parser)]
#[command(name = "trinket")]
#[command(about = "Game item data to wiki table converter", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that read the source tree
#[derive(Args)]
struct SourceArgs {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source directory, overrides the config
    #[arg(short, long)]
    source: Option<PathBuf>,
}

impl SourceArgs {
    fn load(&self) -> trinket_core::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(source) = &self.source {
            config.source_dir = source.clone();
        }
        Ok(config)
    }
}

/// Options shared by commands that render markup
#[derive(Args)]
struct OutputArgs {
    /// Output directory, overrides the config
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON link dictionary, overrides the config
    #[arg(short, long)]
    links: Option<PathBuf>,

    /// Maximum description line width, overrides the config
    #[arg(short, long)]
    width: Option<usize>,
}

impl OutputArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(links) = &self.links {
            config.links = Some(links.clone());
        }
        if let Some(width) = self.width {
            config.render.wrap_width = width;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, export and render everything
    Run {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Directory of cropped sprites, overrides the config
        #[arg(long)]
        sprites: Option<PathBuf>,
    },

    /// Show the merged item table without writing anything
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the merged table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render wiki tables from previously exported CSV files
    Render {
        /// JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Item table CSV
        #[arg(long)]
        items: PathBuf,

        /// Set table CSV
        #[arg(long)]
        sets: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Parse and display a single source file
    Parse {
        /// Path to the source file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List the item sets found in the source tree
    Sets {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Write a config file with default values
    InitConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "trinket_core=info",
        1 => "trinket_core=debug",
        _ => "trinket_core=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn dispatch(command: Commands) -> trinket_core::Result<()> {
    match command {
        Commands::Run {
            source,
            output,
            sprites,
        } => cmd_run(&source, &output, sprites),
        Commands::Extract { source, json } => cmd_extract(&source, json),
        Commands::Render {
            config,
            items,
            sets,
            output,
        } => cmd_render(config.as_deref(), &items, sets.as_deref(), &output),
        Commands::Parse { file } => cmd_parse(&file),
        Commands::Sets { source } => cmd_sets(&source),
        Commands::InitConfig { output } => cmd_init_config(&output),
    }
}

fn cmd_run(source: &SourceArgs, output: &OutputArgs, sprites: Option<PathBuf>) -> trinket_core::Result<()> {
    let mut config = source.load()?;
    output.apply(&mut config);
    if sprites.is_some() {
        config.sprite_dir = sprites;
    }

    match run(&config)? {
        PipelineOutcome::NothingToDo => {
            println!("No source files found in {}", config.source_dir.display());
        }
        PipelineOutcome::Completed(report) => {
            println!(
                "Merged {} items ({} duplicates dropped) and {} sets",
                report.item_count, report.duplicates_dropped, report.set_count
            );
            print_report(&report, &config.output_dir);
        }
    }

    Ok(())
}

fn cmd_extract(source: &SourceArgs, json: bool) -> trinket_core::Result<()> {
    let config = source.load()?;
    let extraction = extract(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&extraction.table)?);
        return Ok(());
    }

    println!("Source: {}", config.source_dir.display());
    println!(
        "Files: {} item file(s), sets file: {}",
        extraction.scan.item_files.len(),
        extraction
            .scan
            .sets_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );
    println!(
        "Items: {} ({} duplicates dropped)",
        extraction.table.len(),
        extraction.table.duplicates_dropped
    );
    println!();

    println!("id\tname\tquality\tset");
    println!("{}", "-".repeat(48));
    for item in &extraction.table.items {
        println!(
            "{}\t{}\t{}\t{}",
            item.id(),
            item.record.name.as_deref().unwrap_or_default(),
            item.record.quality.as_deref().unwrap_or_default(),
            item.membership.set_name()
        );
    }

    Ok(())
}

fn cmd_render(
    config_path: Option<&Path>,
    items: &Path,
    sets: Option<&Path>,
    output: &OutputArgs,
) -> trinket_core::Result<()> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    output.apply(&mut config);

    let report = render_from_csv(&config, items, sets)?;
    println!(
        "Rendered {} items and {} sets",
        report.item_count, report.set_count
    );
    print_report(&report, &config.output_dir);

    Ok(())
}

fn cmd_parse(file: &Path) -> trinket_core::Result<()> {
    let records = parse_item_file(file)?;

    println!("File: {}", file.display());
    println!("Records: {}", records.len());
    println!();

    for record in &records {
        println!("{}", record.key().unwrap_or("<no id>"));
        for (field, value) in record.fields() {
            println!("  {}: {}", field, value);
        }
        if let Some(icon) = &record.icon {
            println!("  icon: {} [{}]", icon.spritesheet, icon.rect);
        }
    }

    Ok(())
}

fn cmd_sets(source: &SourceArgs) -> trinket_core::Result<()> {
    let config = source.load()?;
    let extraction = extract(&config);

    if extraction.sets.is_empty() {
        println!("No sets found");
        return Ok(());
    }

    println!("Sets ({}):", extraction.sets.len());
    println!();
    for set in &extraction.sets {
        println!("{} ({} items)", set.name, set.member_count);
        for member in &set.members {
            println!("  {}", member);
        }
        for (threshold, description) in set.effect_pairs() {
            println!("  [{}] {}", threshold, description);
        }
        println!();
    }

    Ok(())
}

fn cmd_init_config(output: &Path) -> trinket_core::Result<()> {
    PipelineConfig::default().save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to point at your data, then run:");
    println!("  trinket run --config {}", output.display());

    Ok(())
}

fn print_report(report: &RunReport, output_dir: &Path) {
    println!(
        "  {} files written to {}",
        report.files_written.len(),
        output_dir.display()
    );
    for path in &report.files_written {
        println!("  - {}", path.display());
    }

    if !report.errors.is_empty() {
        println!("\nErrors:");
        for (path, err) in &report.errors {
            println!("  {}: {}", path.display(), err);
        }
    }
}
