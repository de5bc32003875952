mod inspect;
use inspect::inspect;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Read and inspect UMB container files
#[derive(Clone, Debug, Parser)]
pub struct Args {
    /// input UMB file
    #[arg(short, long)]
    pub input: PathBuf,
    /// verbosity of tracing output emitted to stderr
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
    #[command(subcommand)]
    operation: Operation,
}

#[derive(Clone, Debug, Subcommand)]
enum Operation {
    /// Print a summary of a UMB file's manifest and entity counts
    Inspect,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt().with_max_level(args.log_level).with_writer(std::io::stderr).init();

    match &args.operation {
        Operation::Inspect => inspect(&args),
    }
}
