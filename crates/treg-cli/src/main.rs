use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use treg_cli::commands::{day, month, range, status, util, validate, week};
use treg_cli::{Cli, Commands, Config};
use treg_core::{Aggregator, FsNoteStore};

/// Load config and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(notes_dir) = &cli.notes_dir {
        config.notes_dir.clone_from(notes_dir);
    }
    if cli.strict {
        config.settings.strict_validation = true;
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn open_aggregator(cli: &Cli) -> Result<Aggregator<FsNoteStore>> {
    let config = load_config(cli)?;
    let store = FsNoteStore::new(config.notes_dir);
    Aggregator::new(store, config.settings).context("invalid configuration")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let today = Local::now().date_naive();
    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Some(Commands::Day { date, json }) => {
            let date = util::date_or(date.as_deref(), today)?;
            day::run(&mut stdout, &open_aggregator(&cli)?, date, *json)?;
        }
        Some(Commands::Week { date, json }) => {
            let date = util::date_or(date.as_deref(), today)?;
            week::run(&mut stdout, &open_aggregator(&cli)?, date, *json)?;
        }
        Some(Commands::Month { month, json }) => {
            let (year, month) = match month {
                Some(month) => util::parse_month(month)?,
                None => (today.year(), today.month()),
            };
            month::run(&mut stdout, &open_aggregator(&cli)?, year, month, *json)?;
        }
        Some(Commands::Range { start, end, json }) => {
            range::run(&mut stdout, &open_aggregator(&cli)?, start, end, *json)?;
        }
        Some(Commands::Validate { date, file }) => {
            let date = util::date_or(date.as_deref(), today)?;
            validate::run(&mut stdout, &open_aggregator(&cli)?, date, file.as_deref())?;
        }
        Some(Commands::Status { date }) => {
            let date = util::date_or(date.as_deref(), today)?;
            status::run(&mut stdout, &open_aggregator(&cli)?, date)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    stdout.flush()?;
    Ok(())
}
