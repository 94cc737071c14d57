//! Command-line front end for cxxlint.
//!
//! ```bash
//! cxxlint check src/ --format pretty     # lint a tree
//! cxxlint check --rules CX001,CX004 .    # only some rules
//! cxxlint tree src/net/socket.cpp        # show the classified brackets
//! cxxlint list-rules
//! cxxlint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Structural linter for C++ sources
#[derive(Parser)]
#[command(name = "cxxlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: nearest cxxlint.toml above the checked path)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Print the classified bracket groups of one file, with the
    /// scrubber, builder and classifier diagnostics on stderr
    Tree {
        /// C++ source or header
        file: PathBuf,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Annotated source snippets.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // configuration belongs to the checked path, not to the working directory
    let explicit = cli.config.as_deref();
    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
        } => {
            let config = config_resolver::resolve(&path, explicit);
            commands::check::run(&path, format, rules, exclude, &config)
        }
        Commands::Tree { file } => {
            let config = config_resolver::resolve(&file, explicit);
            commands::tree::run(&file, &config)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}

/// Diagnostics go to stderr so that `--format json` stays parseable.
/// `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
