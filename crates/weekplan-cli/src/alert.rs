//! Terminal reminder presenter

use std::io::{self, Write};

use serde::Serialize;
use weekplan_core::{Alert, AlertPresenter};

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints reminders to a terminal stream, optionally ringing the bell
pub struct TerminalPresenter<W: Write> {
    out: W,
    bell: bool,
    format: OutputFormat,
}

#[derive(Serialize)]
struct AlertLine<'a> {
    reminder: &'a Alert,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, bell: bool, format: OutputFormat) -> Self {
        Self { out, bell, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalPresenter<io::Stdout> {
    pub fn stdout(bell: bool, format: OutputFormat) -> Self {
        Self::new(io::stdout(), bell, format)
    }
}

impl<W: Write> AlertPresenter for TerminalPresenter<W> {
    fn present(&mut self, alert: &Alert) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                if self.bell {
                    write!(self.out, "\x07")?;
                }
                writeln!(
                    self.out,
                    "Reminder: you have a scheduled activity: {} for {} at {}",
                    alert.text,
                    alert.day.full_name(),
                    alert.hour
                )?;
            }
            OutputFormat::Json => {
                let line = serde_json::to_string(&AlertLine { reminder: alert })?;
                writeln!(self.out, "{line}")?;
            }
        }
        self.out.flush()
    }
}
