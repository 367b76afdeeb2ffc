//! Planner sessions
//!
//! A [`Session`] applies parsed commands to a [`Planner`]. Two drivers sit on
//! top of it:
//! - [`run_interactive`]: reads stdin and scans for reminders on a fixed
//!   interval, both on one current-thread runtime so edits and scans never
//!   interleave
//! - [`replay`]: applies a script line by line, stopping at the first error

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveTime, Timelike};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use weekplan_core::{AlertPresenter, ClockTime, NotificationScanner, Planner, SheetWriter};
use weekplan_render::WeekViewRenderer;

use crate::command::{parse_line, SessionCommand, HELP};

/// Whether the session keeps going after a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<W, P> {
    planner: Planner<W, P>,
    view: WeekViewRenderer,
}

impl<W: SheetWriter, P: AlertPresenter> Session<W, P> {
    pub fn new(planner: Planner<W, P>) -> Self {
        Self {
            planner,
            view: WeekViewRenderer::new(),
        }
    }

    pub fn planner(&self) -> &Planner<W, P> {
        &self.planner
    }

    /// Parse and apply one input line
    pub fn execute_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        match parse_line(line)? {
            Some(command) => self.apply(command, out),
            None => Ok(Flow::Continue),
        }
    }

    /// Apply a command, writing any feedback to `out`
    pub fn apply(&mut self, command: SessionCommand, out: &mut impl Write) -> Result<Flow> {
        debug!(?command, mutation = command.is_mutation(), "applying command");
        match command {
            SessionCommand::Add { day, hour, text } => {
                self.planner.add(day, hour, text)?;
                writeln!(out, "Added {day} {hour}")?;
            }
            SessionCommand::Edit { day, hour, text } => {
                self.planner.edit(day, hour, text)?;
                writeln!(out, "Edited {day} {hour}")?;
            }
            SessionCommand::Delete { day, hour } => {
                if self.planner.delete(day, hour)? {
                    writeln!(out, "Deleted {day} {hour}")?;
                } else {
                    writeln!(out, "Nothing at {day} {hour}")?;
                }
            }
            SessionCommand::Color { day, hour, color } => {
                self.planner.recolor(day, hour, color)?;
                writeln!(out, "{day} {hour} marked {color} ({})", color.category())?;
            }
            SessionCommand::Notify { day, hour, time } => {
                self.planner.configure_notification(day, hour, time)?;
                writeln!(out, "Reminder for {day} {hour} set at {time}")?;
            }
            SessionCommand::Unnotify { day, hour } => {
                self.planner.remove_notification(day, hour)?;
                writeln!(out, "Reminder for {day} {hour} removed")?;
            }
            SessionCommand::Toggle { day, hour } => {
                let done = self.planner.toggle_completed(day, hour)?;
                let state = if done { "done" } else { "not done" };
                writeln!(out, "{day} {hour} marked {state}")?;
            }
            SessionCommand::Tick { at } => {
                self.tick(at.unwrap_or_else(ClockTime::now))?;
            }
            SessionCommand::Show => {
                write!(out, "{}", self.view.render(self.planner.grid()))?;
            }
            SessionCommand::Pending => {
                let pending = NotificationScanner::pending(self.planner.grid());
                if pending.is_empty() {
                    writeln!(out, "No pending reminders")?;
                }
                for (time, day, hour) in pending {
                    let text = self
                        .planner
                        .grid()
                        .get_cell(day, hour)
                        .map(|cell| cell.text())
                        .unwrap_or_default();
                    writeln!(out, "{time}  {day} {hour}  {text}")?;
                }
            }
            SessionCommand::Help => writeln!(out, "{HELP}")?,
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Scan for reminders due at `now`; returns how many fired
    pub fn tick(&mut self, now: ClockTime) -> Result<usize> {
        let alerts = self.planner.tick(now)?;
        Ok(alerts.len())
    }
}

/// Apply a command script, stopping at the first failing line
pub fn replay<W: SheetWriter, P: AlertPresenter>(
    session: &mut Session<W, P>,
    script: &str,
    out: &mut impl Write,
) -> Result<()> {
    for (index, line) in script.lines().enumerate() {
        let flow = session
            .execute_line(line, out)
            .with_context(|| format!("line {}: {}", index + 1, line.trim()))?;
        if flow == Flow::Quit {
            info!(line = index + 1, "replay stopped by quit");
            break;
        }
    }
    Ok(())
}

/// Interactive session on stdin with a recurring notification scan
pub fn run_interactive<W: SheetWriter, P: AlertPresenter>(
    session: Session<W, P>,
    tick: Duration,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start session runtime")?;
    runtime.block_on(session_loop(session, tick))
}

/// Time until the next multiple of `period` past the start of the minute.
///
/// Starting there puts every tick just after a boundary: with a 60 s period
/// each tick lands at second zero, so no two ticks share a minute.
fn first_tick_delay(period: Duration, now: NaiveTime) -> Duration {
    let period = period.as_nanos().max(1);
    let into_minute = u128::from(now.second()) * 1_000_000_000
        + u128::from(now.nanosecond() % 1_000_000_000);
    Duration::from_nanos((period - into_minute % period) as u64)
}

async fn session_loop<W: SheetWriter, P: AlertPresenter>(
    mut session: Session<W, P>,
    tick: Duration,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let start = Instant::now() + first_tick_delay(tick, Local::now().time());
    let mut ticker = tokio::time::interval_at(start, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stdout = std::io::stdout();

    info!(tick_secs = tick.as_secs(), "session started");
    writeln!(stdout, "weekplan session; type 'help' for commands")?;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = session.tick(ClockTime::now()) {
                    warn!(error = %e, "notification scan failed");
                    eprintln!("error: {e:#}");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match session.execute_line(&line, &mut stdout) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => {
                        warn!(error = %e, input = %line.trim(), "command failed");
                        eprintln!("error: {e:#}");
                    }
                }
            }
        }
    }

    info!("session ended");
    Ok(())
}
