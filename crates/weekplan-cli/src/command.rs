//! Session command language
//!
//! One command per line. Blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! add Mon 9:00 Standup with the team
//! color mon 09:00 green
//! notify Monday 9 08:55
//! tick 08:55
//! ```

use thiserror::Error;
use weekplan_core::{ClockTime, Day, GridError, HourSlot, PriorityColor};

pub const HELP: &str = "\
Commands:
  add DAY HOUR TEXT...      put an activity in a slot (replaces any existing one)
  edit DAY HOUR TEXT...     change the text of an activity
  delete DAY HOUR           remove an activity
  color DAY HOUR COLOR      green | orange | red | blue | none
  notify DAY HOUR HH:MM     remind at HH:MM
  unnotify DAY HOUR         drop the reminder
  toggle DAY HOUR           mark done / not done
  tick [HH:MM]              scan for due reminders now (or as if at HH:MM)
  show                      print the week
  pending                   list reminders that have not fired
  help                      this text
  quit                      leave the session

DAY is Mon..Sun (or the full name), HOUR is 07:00..23:00 or 00:00.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Add { day: Day, hour: HourSlot, text: String },
    Edit { day: Day, hour: HourSlot, text: String },
    Delete { day: Day, hour: HourSlot },
    Color { day: Day, hour: HourSlot, color: PriorityColor },
    Notify { day: Day, hour: HourSlot, time: ClockTime },
    Unnotify { day: Day, hour: HourSlot },
    Toggle { day: Day, hour: HourSlot },
    Tick { at: Option<ClockTime> },
    Show,
    Pending,
    Help,
    Quit,
}

impl SessionCommand {
    /// Whether the command changes the grid
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::Tick { .. } | Self::Show | Self::Pending | Self::Help | Self::Quit
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Split off the first whitespace-delimited token
fn next_token(input: &str) -> Option<(&str, &str)> {
    let input = input.trim_start();
    if input.is_empty() {
        return None;
    }
    match input.find(char::is_whitespace) {
        Some(end) => Some((&input[..end], &input[end..])),
        None => Some((input, "")),
    }
}

/// Parser state over one line
struct Args<'a> {
    rest: &'a str,
    usage: &'static str,
}

impl<'a> Args<'a> {
    fn token(&mut self) -> Result<&'a str, CommandError> {
        let (token, rest) = next_token(self.rest).ok_or(CommandError::Usage(self.usage))?;
        self.rest = rest;
        Ok(token)
    }

    fn slot(&mut self) -> Result<(Day, HourSlot), CommandError> {
        let day: Day = self.token()?.parse()?;
        let hour: HourSlot = self.token()?.parse()?;
        Ok((day, hour))
    }

    /// Remaining text, trimmed; must be non-empty
    fn text(&mut self) -> Result<String, CommandError> {
        let text = self.rest.trim();
        if text.is_empty() {
            return Err(CommandError::Usage(self.usage));
        }
        self.rest = "";
        Ok(text.to_string())
    }

    fn finish(&self) -> Result<(), CommandError> {
        if self.rest.trim().is_empty() {
            Ok(())
        } else {
            Err(CommandError::Usage(self.usage))
        }
    }
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let Some((name, rest)) = next_token(line) else {
        return Ok(None);
    };

    let (verb, usage) = match name.to_ascii_lowercase().as_str() {
        "add" => ("add", "add DAY HOUR TEXT..."),
        "edit" => ("edit", "edit DAY HOUR TEXT..."),
        "delete" | "del" | "rm" => ("delete", "delete DAY HOUR"),
        "color" | "colour" => ("color", "color DAY HOUR green|orange|red|blue|none"),
        "notify" => ("notify", "notify DAY HOUR HH:MM"),
        "unnotify" => ("unnotify", "unnotify DAY HOUR"),
        "toggle" | "done" => ("toggle", "toggle DAY HOUR"),
        "tick" => ("tick", "tick [HH:MM]"),
        "show" => ("show", "show"),
        "pending" => ("pending", "pending"),
        "help" | "?" => ("help", "help"),
        "quit" | "exit" => ("quit", "quit"),
        _ => return Err(CommandError::Unknown(name.to_string())),
    };
    let mut args = Args { rest, usage };

    let command = match verb {
        "add" => {
            let (day, hour) = args.slot()?;
            SessionCommand::Add { day, hour, text: args.text()? }
        }
        "edit" => {
            let (day, hour) = args.slot()?;
            SessionCommand::Edit { day, hour, text: args.text()? }
        }
        "delete" => {
            let (day, hour) = args.slot()?;
            SessionCommand::Delete { day, hour }
        }
        "color" => {
            let (day, hour) = args.slot()?;
            let color: PriorityColor = args.token()?.parse()?;
            SessionCommand::Color { day, hour, color }
        }
        "notify" => {
            let (day, hour) = args.slot()?;
            let time: ClockTime = args.token()?.parse()?;
            SessionCommand::Notify { day, hour, time }
        }
        "unnotify" => {
            let (day, hour) = args.slot()?;
            SessionCommand::Unnotify { day, hour }
        }
        "toggle" => {
            let (day, hour) = args.slot()?;
            SessionCommand::Toggle { day, hour }
        }
        "tick" => {
            let at: Option<ClockTime> = match next_token(args.rest) {
                Some(_) => Some(args.token()?.parse()?),
                None => None,
            };
            SessionCommand::Tick { at }
        }
        "show" => SessionCommand::Show,
        "pending" => SessionCommand::Pending,
        "help" => SessionCommand::Help,
        _ => SessionCommand::Quit,
    };
    args.finish()?;

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> SessionCommand {
        parse_line(line).unwrap().unwrap()
    }

    fn hour(label: &str) -> HourSlot {
        label.parse().unwrap()
    }

    #[test]
    fn add_keeps_text_spacing() {
        assert_eq!(
            parse("add mon 9:00   Standup  with   team "),
            SessionCommand::Add {
                day: Day::Mon,
                hour: hour("09:00"),
                text: "Standup  with   team".into(),
            }
        );
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse("color Wed 14 orange"),
            SessionCommand::Color { day: Day::Wed, hour: hour("14:00"), color: PriorityColor::Orange }
        );
        assert_eq!(
            parse("notify friday 18:00 17:45"),
            SessionCommand::Notify {
                day: Day::Fri,
                hour: hour("18:00"),
                time: ClockTime::new(17, 45).unwrap(),
            }
        );
        assert_eq!(parse("unnotify Fri 18:00"), SessionCommand::Unnotify { day: Day::Fri, hour: hour("18:00") });
        assert_eq!(parse("toggle sun 0:00"), SessionCommand::Toggle { day: Day::Sun, hour: hour("00:00") });
        assert_eq!(parse("rm Tue 7"), SessionCommand::Delete { day: Day::Tue, hour: hour("07:00") });
        assert_eq!(
            parse("edit Thu 10:00 Call mom"),
            SessionCommand::Edit { day: Day::Thu, hour: hour("10:00"), text: "Call mom".into() }
        );
        assert_eq!(parse("tick"), SessionCommand::Tick { at: None });
        assert_eq!(parse("tick 9:05"), SessionCommand::Tick { at: Some(ClockTime::new(9, 5).unwrap()) });
        assert_eq!(parse("SHOW"), SessionCommand::Show);
        assert_eq!(parse("pending"), SessionCommand::Pending);
        assert_eq!(parse("?"), SessionCommand::Help);
        assert_eq!(parse("exit"), SessionCommand::Quit);
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# weekly template").unwrap(), None);
    }

    #[test]
    fn reports_usage_and_range_errors() {
        assert_eq!(parse_line("add Mon 9:00"), Err(CommandError::Usage("add DAY HOUR TEXT...")));
        assert_eq!(parse_line("delete Mon"), Err(CommandError::Usage("delete DAY HOUR")));
        assert_eq!(parse_line("show everything"), Err(CommandError::Usage("show")));
        assert!(matches!(
            parse_line("add Mon 3:00 Sleep"),
            Err(CommandError::Grid(GridError::OutOfRange { .. }))
        ));
        assert!(matches!(
            parse_line("notify Mon 9:00 noon"),
            Err(CommandError::Grid(GridError::Parse(_)))
        ));
        assert!(matches!(parse_line("dance Mon"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn mutation_classification() {
        assert!(parse("delete Mon 9").is_mutation());
        assert!(parse("toggle Mon 9").is_mutation());
        assert!(!parse("tick").is_mutation());
        assert!(!parse("show").is_mutation());
    }
}
