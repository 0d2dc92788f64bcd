//! Cartograph CLI - Code knowledge graph queries from the command line.
//!
//! Loads a raw graph payload (JSON from the indexing service), builds the
//! positioned graph, and runs engine queries: impact analysis, package
//! scoping, neighborhood focus, and structural statistics.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// Cartograph: code knowledge graph engine and query interface.
#[derive(Parser)]
#[command(name = "cartograph")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Graph payload JSON produced by the indexing service
    #[arg(short, long, global = true, default_value = "graph.json")]
    graph: PathBuf,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the positioned graph and report construction accounting
    Build,

    /// Show node, edge, community, and process breakdowns
    Stats,

    /// Analyze the blast radius of changing a symbol
    Impact {
        /// Symbol name to analyze
        symbol: String,

        /// Maximum traversal depth
        #[arg(short, long, default_value = "3")]
        depth: u32,

        /// Minimum edge confidence required for traversal
        #[arg(short, long, default_value = "0.5")]
        floor: f32,

        /// Walk downstream (what the symbol needs) instead of upstream
        /// (what breaks)
        #[arg(long)]
        downstream: bool,
    },

    /// List auto-detected package scoping candidates
    Packages,

    /// Scope the graph to a path prefix and summarize the result
    Scope {
        /// Path prefix, e.g. "packages/web/"
        prefix: String,
    },

    /// List nodes within a hop budget of a focal node
    Focus {
        /// Focal node id
        node: String,

        /// Hop budget (0 = the focal node only)
        #[arg(short = 'n', long, default_value = "1")]
        hops: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Run the appropriate command
    let result = match cli.command {
        Commands::Build => cli::build::run(&cli.graph),
        Commands::Stats => cli::stats::run(&cli.graph),
        Commands::Impact {
            symbol,
            depth,
            floor,
            downstream,
        } => cli::impact::run(&cli.graph, &symbol, depth, floor, downstream),
        Commands::Packages => cli::packages::run(&cli.graph),
        Commands::Scope { prefix } => cli::scope::run(&cli.graph, &prefix),
        Commands::Focus { node, hops } => cli::focus::run(&cli.graph, &node, hops),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
