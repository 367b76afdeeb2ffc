//! weekplan CLI - Weekly Planner
//!
//! Command-line front end for the weekplan grid: an interactive session with
//! recurring reminder scans, a script replayer, and slot listing.

mod alert;
mod command;
mod config;
mod session;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weekplan_core::{Alert, Day, HourSlot, Planner, SpreadsheetExporter};
use weekplan_render::{WeekViewRenderer, XlsxWriter};

use crate::alert::{OutputFormat, TerminalPresenter};
use crate::config::Config;
use crate::session::Session;

#[derive(Parser)]
#[command(name = "weekplan")]
#[command(author, version, about = "Weekly planner with reminders and spreadsheet export", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ./weekplan.toml when present)
    #[arg(long, env = "WEEKPLAN_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive planner session
    Run {
        /// Workbook rewritten after every change
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seconds between reminder scans
        #[arg(long, value_name = "SECS")]
        tick_secs: Option<u64>,

        /// Do not ring the terminal bell on reminders
        #[arg(long)]
        no_bell: bool,

        /// Reminder format (text, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Apply a command script without interaction
    Replay {
        /// Script file, one session command per line
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Workbook rewritten after every change
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the day and hour labels of the grid
    Slots {
        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    init_tracing(cli.verbose, &config)?;

    match cli.command {
        Some(Commands::Run {
            output,
            tick_secs,
            no_bell,
            format,
        }) => cmd_run(&config, output, tick_secs, no_bell, format),
        Some(Commands::Replay {
            script,
            output,
            format,
        }) => cmd_replay(&config, &script, output, format),
        Some(Commands::Slots { format }) => cmd_slots(format),
        None => {
            println!("weekplan - Weekly Planner");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

/// Log to stderr, and to the configured log file when there is one
fn init_tracing(verbose: u8, config: &Config) -> Result<()> {
    let default_level = match verbose {
        0 if config.log_file.is_some() => "info",
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file '{}'", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .init();
    Ok(())
}

fn xlsx_writer(config: &Config, output: Option<PathBuf>) -> XlsxWriter {
    let writer = XlsxWriter::new(output.unwrap_or_else(|| config.output.clone()))
        .sheet_name(&config.sheet_name);
    if config.color_fill {
        writer
    } else {
        writer.no_color_fill()
    }
}

fn cmd_run(
    config: &Config,
    output: Option<PathBuf>,
    tick_secs: Option<u64>,
    no_bell: bool,
    format: OutputFormat,
) -> Result<()> {
    let writer = xlsx_writer(config, output);
    let tick = Duration::from_secs(tick_secs.unwrap_or(config.tick_seconds).max(1));
    let presenter = TerminalPresenter::stdout(config.bell && !no_bell, format);

    info!(output = %writer.path.display(), "starting interactive session");
    let session = Session::new(Planner::new(writer, presenter));
    session::run_interactive(session, tick)
}

fn cmd_replay(
    config: &Config,
    script: &std::path::Path,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("failed to read script '{}'", script.display()))?;

    let writer = xlsx_writer(config, output);

    match format {
        OutputFormat::Text => {
            let presenter = TerminalPresenter::stdout(false, OutputFormat::Text);
            let mut session = Session::new(Planner::new(writer, presenter));
            session::replay(&mut session, &text, &mut std::io::stdout())
                .with_context(|| format!("replay of '{}' failed", script.display()))?;
            print!("{}", WeekViewRenderer::new().compact().render(session.planner().grid()));
        }
        OutputFormat::Json => {
            // alerts are collected and command feedback dropped so stdout is one JSON document
            let mut session = Session::new(Planner::new(writer, Vec::<Alert>::new()));
            session::replay(&mut session, &text, &mut std::io::sink())
                .with_context(|| format!("replay of '{}' failed", script.display()))?;
            let planner = session.planner();
            let report = json!({
                "alerts": planner.presenter(),
                "rows": SpreadsheetExporter::rows(planner.grid()),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn cmd_slots(format: OutputFormat) -> Result<()> {
    let days: Vec<&str> = Day::ALL.iter().map(|d| d.label()).collect();
    let hours: Vec<String> = HourSlot::all().map(|h| h.label()).collect();

    match format {
        OutputFormat::Text => {
            println!("Days:  {}", days.join(" "));
            println!("Hours: {}", hours.join(" "));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "days": days, "hours": hours }))?);
        }
    }
    Ok(())
}
