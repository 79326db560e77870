//! cutrace CLI
//!
//! Expands encoder split traces into per-CU ancestor tables.

use clap::{Parser, Subcommand};
use cutrace_lib::batch::{self, BatchConfig};
use cutrace_lib::partition::{self, ctu_root, Point, Size};
use cutrace_lib::{init, Config};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "cutrace")]
#[command(about = "Reconstruct CU partition ancestry from encoder split traces", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Number of threads to use
    #[arg(short = 't', long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every trace file of a directory
    Batch {
        /// Directory holding the trace files
        #[arg(long, default_value = "split_csv")]
        input_dir: PathBuf,

        /// Directory receiving the ancestor tables
        #[arg(long, default_value = "datasets")]
        output_dir: PathBuf,

        /// Trace file extension
        #[arg(long, default_value = "csv")]
        extension: String,

        /// Process files and rows one at a time
        #[arg(long)]
        sequential: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process a single trace file
    File {
        /// Input trace file
        #[arg(short, long)]
        input: PathBuf,

        /// Output ancestor table
        #[arg(short, long)]
        output: PathBuf,

        /// Process rows one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Decode a split series and optionally replay it for one leaf
    Decode {
        /// Split series value
        #[arg(allow_hyphen_values = true)]
        code: String,

        /// Leaf position as "x,y"
        #[arg(long, requires = "size")]
        pos: Option<String>,

        /// Leaf size as "w*h"
        #[arg(long, requires = "pos")]
        size: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config {
        max_threads: cli.threads,
        verbose: cli.verbose,
        debug: cli.debug,
    };

    init(config)?;

    info!("cutrace v{}", cutrace_lib::VERSION);

    match cli.command {
        Commands::Batch {
            input_dir,
            output_dir,
            extension,
            sequential,
            json,
        } => {
            let config = BatchConfig::new(input_dir, output_dir)
                .with_extension(extension)
                .with_parallel(!sequential);
            cmd_batch(&config, json)?;
        }
        Commands::File {
            input,
            output,
            sequential,
        } => {
            info!("Processing {} -> {}", input.display(), output.display());
            cmd_file(&input, &output, !sequential)?;
        }
        Commands::Decode { code, pos, size } => {
            cmd_decode(&code, pos.as_deref(), size.as_deref())?;
        }
    }

    Ok(())
}

fn cmd_batch(config: &BatchConfig, json: bool) -> anyhow::Result<()> {
    let report = batch::run_batch(config)?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }

    if report.files_failed() > 0 {
        return Err(anyhow::anyhow!(
            "{} of {} trace files failed",
            report.files_failed(),
            report.files.len()
        ));
    }

    Ok(())
}

fn cmd_file(input: &PathBuf, output: &PathBuf, parallel: bool) -> anyhow::Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let report = batch::process_file(input, output, parallel)
        .map_err(|e| anyhow::anyhow!("Failed to process {}: {}", input.display(), e))?;

    println!("{}", report);
    for failure in &report.failures {
        println!("  row {}: {}", failure.row, failure.message);
    }

    Ok(())
}

fn cmd_decode(code: &str, pos: Option<&str>, size: Option<&str>) -> anyhow::Result<()> {
    let value = partition::parse_series(code)?;
    let ops = partition::decode(value)?;

    if ops.is_empty() {
        println!("{}: no splits", value);
    } else {
        let names: Vec<&str> = ops.iter().map(|op| op.name()).collect();
        println!("{}: {}", value, names.join(" -> "));
    }

    if let (Some(pos), Some(size)) = (pos, size) {
        let position: Point = pos.parse()?;
        let size: Size = size.parse()?;
        let chain = partition::reconstruct(ctu_root(position), position, size, &ops)?;

        for (depth, (rect, mode)) in chain.iter().enumerate() {
            println!(
                "  {:>2}  {:>9}  {:>7}  {}",
                depth,
                rect.position().to_string(),
                rect.size().to_string(),
                mode
            );
        }
    }

    Ok(())
}
