mod asset;
mod convert;
mod removal;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use removal::{BackgroundRemover, DominantColorSampler, FlatRemover, FloodRemover};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Strip the flat background from PNG assets, overwriting them in place
    RemoveBg {
        /// Image files to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Color distance below which a pixel counts as background
        #[arg(long, default_value_t = 30)]
        tolerance: u32,

        /// Edge length of the corner region sampled for background colors
        #[arg(long, default_value_t = 20)]
        sample_size: u32,

        /// Removal algorithm
        #[arg(long, value_enum, default_value_t = Mode::Flood)]
        mode: Mode,

        /// Background palette detection (flood mode only)
        #[arg(long, value_enum, default_value_t = Strategy::Corner)]
        strategy: Strategy,
    },

    /// Convert a migration script's absence INSERTs into a CSV file
    SqlToCsv {
        /// SQL migration script to read
        input: PathBuf,

        /// CSV file to write
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    /// Connected flood fill seeded at the image corners
    Flood,
    /// Global per-pixel threshold against the top-left color
    Flat,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Strategy {
    /// Distinct colors of the corner sample region
    Corner,
    /// Most frequent colors of the corner sample region
    Dominant,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match args.command {
        Command::RemoveBg {
            files,
            tolerance,
            sample_size,
            mode,
            strategy,
        } => {
            tracing::info!("Background removal over {} file(s)", files.len());
            tracing::debug!(
                "mode={:?} strategy={:?} tolerance={} sample_size={}",
                mode,
                strategy,
                tolerance,
                sample_size
            );

            let remover = build_remover(mode, strategy, tolerance, sample_size);
            run_removal(&files, remover.as_ref())
        }
        Command::SqlToCsv { input, output } => {
            let count = convert::convert(&input, &output)?;
            tracing::info!("Converted {} records into {}", count, output.display());
            Ok(())
        }
    }
}

fn build_remover(
    mode: Mode,
    strategy: Strategy,
    tolerance: u32,
    sample_size: u32,
) -> Box<dyn BackgroundRemover> {
    match mode {
        Mode::Flood => match strategy {
            Strategy::Corner => removal::create_default_remover(tolerance, sample_size),
            Strategy::Dominant => Box::new(FloodRemover::new(
                Box::new(DominantColorSampler::new(sample_size)),
                tolerance,
            )),
        },
        Mode::Flat => Box::new(FlatRemover::new(tolerance)),
    }
}

/// Process each file in turn. A failure is terminal for that file only; the
/// rest of the batch still runs, and the exit status reflects the failures.
fn run_removal(files: &[PathBuf], remover: &dyn BackgroundRemover) -> Result<()> {
    let mut processed = 0usize;
    let mut failed = 0usize;

    for path in files {
        if !path.exists() {
            tracing::warn!("File not found: {}", path.display());
            continue;
        }

        match asset::process_file(path, remover) {
            Ok(stats) => {
                processed += 1;
                tracing::info!(
                    "Processed {}: {} pixels cleared ({} background colors)",
                    path.display(),
                    stats.cleared_pixels,
                    stats.palette_colors
                );
            }
            Err(err) => {
                failed += 1;
                tracing::error!("Failed to process {}: {}", path.display(), err);
            }
        }
    }

    tracing::info!("Done: {} processed, {} failed", processed, failed);
    if failed > 0 {
        bail!("{failed} file(s) failed");
    }
    Ok(())
}
