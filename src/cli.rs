//! Command-line interface definitions and parsing
//!
//! Defines the `search-select` driver using `clap`. The driver hosts a
//! control over a record file so the search and selection behaviour can be
//! inspected without a UI.
//!
//! # Commands
//!
//! - **query**: run one search term and print the candidates
//! - **sql**: print the SQL a database-backed host would execute
//! - **replay**: drive a control with an event script
//! - **config**: print the effective configuration
//!
//! # Examples
//!
//! ```bash
//! search-select query -r people.json an
//! search-select --config picker.toml sql "ada l"
//! search-select replay -r people.csv session.txt
//! ```

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Arguments naming a record file
#[derive(Parser, Debug, Clone)]
pub struct RecordArgs {
    /// JSON or CSV file holding the records
    #[arg(short = 'r', long = "records", value_name = "FILE")]
    pub records: PathBuf,

    /// Field holding each record's identifier
    #[arg(long = "id-field", value_name = "FIELD", default_value = "id")]
    pub id_field: String,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "search-select")]
#[command(about = "Drive a search-select control from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the user config directory)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Search once and print the candidates
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        records: RecordArgs,

        /// Search term; omit with --initial for the starter list
        #[arg(value_name = "TERM", default_value = "")]
        term: String,

        /// Run the unfiltered initial-load query instead
        #[arg(long = "initial")]
        initial: bool,
    },

    /// Print the SQL statement for a search term
    Sql {
        /// Search term
        #[arg(value_name = "TERM", default_value = "")]
        term: String,

        /// Render the initial-load query instead
        #[arg(long = "initial")]
        initial: bool,

        /// Identifiers to exclude (as if already selected)
        #[arg(short = 'x', long = "exclude", value_name = "ID", num_args = 0..)]
        exclude: Vec<String>,
    },

    /// Replay an event script against a control
    #[command(visible_alias = "r")]
    Replay {
        #[command(flatten)]
        records: RecordArgs,

        /// Script file, one step per line ("-" reads stdin)
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log filter directive for the requested verbosity
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}
