//! incl CLI - expand `@include` directives.
//!
//! Reads a file (or stdin), replaces every `@include "name"` with the expanded
//! contents of `name` and writes the result to a file (or stdout). Diagnostics
//! go to stderr.

mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::ExpandArgs;
use output::Output;

/// incl - recursive `@include` expander.
#[derive(Parser)]
#[command(name = "incl", version, about)]
struct Cli {
    #[command(flatten)]
    args: ExpandArgs,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.args.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
