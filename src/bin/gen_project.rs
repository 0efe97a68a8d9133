//! CLI fixture generator: write mixed-content project files for harnesses.

use clap::Parser;
use mock_a_parser::generator;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the generator
#[derive(Parser, Debug)]
#[command(name = "gen-project")]
#[command(about = "Generate mixed-content project fixture files", long_about = None)]
struct Args {
    /// Directory to write fixture files into (must exist)
    #[arg(short, long)]
    out: PathBuf,

    /// Number of files to create
    #[arg(long, default_value_t = 5)]
    num_files: usize,

    /// Lines per generated file
    #[arg(long, default_value_t = 20)]
    lines_per_file: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let created = generator::generate(&args.out, args.num_files, args.lines_per_file)?;
    info!(
        files = created.len(),
        out = %args.out.display(),
        "Fixtures generated"
    );
    Ok(())
}
