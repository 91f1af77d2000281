//! MNIST-A dataset CLI
//!
//! Inspects MNIST-A CSV exports, writes orientation-corrected digits to image
//! files, and drives the Burn data loader over the dataset.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info};

use mnista_data::backend::{backend_name, default_device, DefaultBackend};
use mnista_data::config::LoaderConfig;
use mnista_data::dataset::raster::render_ascii;
use mnista_data::dataset::{
    build_dataloader, class_name, digit_glyph, load_csv_images, load_csv_labels, MnistaDataset,
};
use mnista_data::utils::logging::{init_logging, LogConfig, LogLevel};
use mnista_data::utils::{format_count, format_elapsed, format_throughput};

/// MNIST-A (Arabic handwritten digits) dataset tool
#[derive(Parser, Debug)]
#[command(name = "mnista")]
#[command(version)]
#[command(about = "Inspect and batch the MNIST-A dataset with Burn", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level; overrides the level set by --verbose
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    /// Data loader configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct DataArgs {
    /// CSV file with one flattened 28x28 image per line
    #[arg(short, long, default_value = "data/mnista/train_images.csv")]
    images: PathBuf,

    /// CSV file with one label per line
    #[arg(short, long, default_value = "data/mnista/train_labels.csv")]
    labels: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print dataset size, class distribution and one rendered digit
    Inspect {
        #[command(flatten)]
        data: DataArgs,

        /// Item to render
        #[arg(short = 'n', long, default_value = "0")]
        index: usize,
    },

    /// Write one orientation-corrected digit to an image file
    Export {
        #[command(flatten)]
        data: DataArgs,

        /// Item to export
        #[arg(short = 'n', long)]
        index: usize,

        /// Output image path (format from extension, e.g. .png)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run the Burn data loader over the dataset and report batch shapes
    Batches {
        #[command(flatten)]
        data: DataArgs,

        /// Stop after this many batches
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(cli.verbose, cli.log_level);
    init_logging(&log_config)?;
    debug!("Logging at {}", log_config.level);

    let loader_config = match &cli.config {
        Some(path) => LoaderConfig::load(path)?,
        None => LoaderConfig::default(),
    };

    match cli.command {
        Commands::Inspect { data, index } => cmd_inspect(&data, index),
        Commands::Export {
            data,
            index,
            output,
        } => cmd_export(&data, index, &output),
        Commands::Batches { data, limit } => cmd_batches(&data, &loader_config, limit),
    }
}

fn load_dataset(data: &DataArgs) -> Result<MnistaDataset<i64>> {
    let images = load_csv_images(&data.images)
        .with_context(|| format!("loading images from {}", data.images.display()))?;
    let labels = load_csv_labels(&data.labels)
        .with_context(|| format!("loading labels from {}", data.labels.display()))?;

    Ok(MnistaDataset::new(images, labels))
}

fn cmd_inspect(data: &DataArgs, index: usize) -> Result<()> {
    let dataset = load_dataset(data)?;

    println!("{}", "MNIST-A dataset".bold());
    println!("  items:  {}", format_count(dataset.len()));
    println!("  images: {}", format_count(dataset.images().len()));
    println!();

    for (label, count) in dataset.class_distribution().iter().enumerate() {
        println!(
            "  {} {:<10} {:>8}",
            digit_glyph(label).unwrap_or('?'),
            class_name(label).unwrap_or("?"),
            format_count(*count)
        );
    }

    let item = dataset
        .try_get(index)
        .with_context(|| format!("reading item {index}"))?;

    println!();
    println!(
        "Item {} (label {})",
        index,
        item.label.to_string().green().bold()
    );
    print!("{}", render_ascii(&item.image));

    Ok(())
}

fn cmd_export(data: &DataArgs, index: usize, output: &Path) -> Result<()> {
    let dataset = load_dataset(data)?;
    let item = dataset
        .try_get(index)
        .with_context(|| format!("reading item {index}"))?;

    item.image
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(
        "Wrote item {} (label {}) to {}",
        index,
        item.label,
        output.display()
    );
    println!("{} {}", "Saved".green(), output.display());

    Ok(())
}

fn cmd_batches(data: &DataArgs, config: &LoaderConfig, limit: Option<usize>) -> Result<()> {
    let dataset = load_dataset(data)?.map_transform(config.normalizer()?);

    info!("Backend: {} ({:?})", backend_name(), default_device());
    info!(
        "Loading {} items, batch size {}, {} workers",
        format_count(dataset.len()),
        config.batch_size,
        config.num_workers
    );

    let loader = build_dataloader::<DefaultBackend, _, _>(dataset, config)
        .context("dataset cannot be batched")?;
    let start = Instant::now();
    let mut num_batches = 0usize;
    let mut num_items = 0usize;

    for batch in loader.iter().take(limit.unwrap_or(usize::MAX)) {
        let [n, c, h, w] = batch.images.dims();
        debug!("Batch {}: images [{}, {}, {}, {}]", num_batches, n, c, h, w);
        num_batches += 1;
        num_items += n;
    }

    let elapsed = start.elapsed();
    println!(
        "{} {} batches ({} items) in {}, {}",
        "Loaded".green(),
        format_count(num_batches),
        format_count(num_items),
        format_elapsed(elapsed),
        format_throughput(num_items, elapsed)
    );

    Ok(())
}
