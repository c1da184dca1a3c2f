//! # EF Designer CLI
//!
//! Command-line front end for the model import engine.
//!
//! ## Commands
//!
//! - `import` - Reverse-engineer an assembly through the parser tools
//! - `merge` - Merge an already parsed JSON document
//! - `info` - Display the contents of a model file
//!

pub mod commands;
pub mod console;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub use console::ConsoleFeedback;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "efdesign")]
#[command(about = "EF model designer - import existing entity classes into a model")]
#[command(version)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a compiled assembly through the external parsers
    Import {
        /// Assembly to reverse-engineer
        assembly: String,

        /// Model file to merge into; created if missing
        #[arg(short, long, env = "EFDESIGN_MODEL")]
        model: PathBuf,

        /// Import configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Merge a parsed model document
    Merge {
        /// JSON document written by a parser
        document: PathBuf,

        /// Model file to merge into; created if missing
        #[arg(short, long, env = "EFDESIGN_MODEL")]
        model: PathBuf,
    },

    /// Show the contents of a model file
    Info {
        /// Model file to read
        #[arg(short, long, env = "EFDESIGN_MODEL")]
        model: PathBuf,
    },
}

// ============================================================================
// Entry points
// ============================================================================

/// Parse the process arguments and run
pub fn main_entry() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Execute a parsed command line
pub fn run(cli: Cli) -> Result<ExitCode> {
    let succeeded = match cli.command {
        Command::Import {
            assembly,
            model,
            config,
        } => commands::import(&assembly, &model, config.as_deref())?,
        Command::Merge { document, model } => commands::merge(&document, &model)?,
        Command::Info { model } => {
            commands::info(&model)?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::parse_from([
            "efdesign",
            "--verbose",
            "import",
            "Sales.dll",
            "--model",
            "sales.efmodel",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Command::Import {
                assembly, config, ..
            } => {
                assert_eq!(assembly, "Sales.dll");
                assert!(config.is_none());
            }
            other => panic!("Expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "efdesign_cli");
    }
}
