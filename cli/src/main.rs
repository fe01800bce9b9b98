#![deny(missing_docs)]

//! # Apigen CLI
//!
//! Command Line Interface for the OpenAPI client-model front-end.
//!
//! Supported Commands:
//! - `generate`: OpenAPI -> resolved client model (JSON).

use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI client model generator")]
struct Cli {
    /// Log debug output from the pipeline.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve an OpenAPI document into clients, operations and types.
    Generate(generate::GenerateArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Generate(args) => {
            generate::execute(args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "apigen",
            "generate",
            "api.yaml",
            "--exclude-deprecated",
            "--filter",
            "^/pets",
            "--no-tree-shake",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Generate(args) = cli.command;
        assert!(args.exclude_deprecated);
        assert!(args.no_tree_shake);
        assert_eq!(args.filter.as_deref(), Some("^/pets"));
    }
}
