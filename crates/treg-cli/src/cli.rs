//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Time registrations from daily notes.
///
/// Reads `### HH:MM` entries from dated Markdown notes and checks each day
/// against the hours it was expected to log.
#[derive(Debug, Parser)]
#[command(name = "treg", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the notes (overrides config).
    #[arg(long, global = true)]
    pub notes_dir: Option<PathBuf>,

    /// Also warn about missing project links, descriptions and day bounds.
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one day's registrations and validation.
    Day {
        /// Day to show, YYYY-MM-DD (default: today).
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the Monday-to-Sunday week containing a date.
    Week {
        /// Any day in the week, YYYY-MM-DD (default: today).
        #[arg(long)]
        date: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show every registered day in a calendar month.
    Month {
        /// Month to show, YYYY-MM (default: current month).
        #[arg(long)]
        month: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show every registered day between two dates, inclusive.
    Range {
        /// First day, YYYY-MM-DD.
        start: String,

        /// Last day, YYYY-MM-DD.
        end: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Validate one day's note and list its issues.
    Validate {
        /// Day to validate, YYYY-MM-DD (default: today).
        #[arg(long, conflicts_with = "file")]
        date: Option<String>,

        /// Note file to validate; its date is taken from the file name.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print a one-line status for a day.
    Status {
        /// Day to summarize, YYYY-MM-DD (default: today).
        #[arg(long)]
        date: Option<String>,
    },
}
