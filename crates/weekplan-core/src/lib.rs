//! # weekplan-core
//!
//! Core domain model for the weekplan weekly planner.
//!
//! This crate provides:
//! - Grid coordinates: `Day`, `HourSlot`, and the minute-resolution `ClockTime`
//! - Domain types: `ActivityCell`, `PriorityColor`, `ActivityGrid`
//! - Notification scanning (`notify`) and export rows (`export`)
//! - The `Planner` controller that ties edits, export and alerts together
//! - Collaborator traits: `SheetWriter`, `AlertPresenter`
//! - Error types
//!
//! ## Example
//!
//! ```rust
//! use weekplan_core::{ActivityCell, ActivityGrid, ClockTime, Day, HourSlot, PriorityColor};
//! use weekplan_core::notify::NotificationScanner;
//!
//! let mut grid = ActivityGrid::new();
//! let nine: HourSlot = "09:00".parse().unwrap();
//!
//! let mut cell = ActivityCell::new("Standup").unwrap().with_priority(PriorityColor::Green);
//! cell.set_notification("09:00".parse().unwrap()).unwrap();
//! grid.set_cell(Day::Mon, nine, cell);
//!
//! let alerts = NotificationScanner::scan(&mut grid, ClockTime::new(9, 0).unwrap());
//! assert_eq!(alerts.len(), 1);
//! assert_eq!(alerts[0].text, "Standup");
//! ```

pub mod export;
pub mod notify;
pub mod planner;

pub use export::{ExportRow, SpreadsheetExporter, COLUMNS};
pub use notify::{Alert, NotificationScanner};
pub use planner::Planner;

use chrono::{Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Coordinates
// ============================================================================

/// Day column of the week grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    /// Number of day columns
    pub const COUNT: usize = 7;

    /// All days in column order
    pub const ALL: [Day; Self::COUNT] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    /// Column index (Mon = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day for a column index
    pub fn from_index(index: usize) -> Result<Self, GridError> {
        Self::ALL.get(index).copied().ok_or_else(|| GridError::OutOfRange {
            axis: "day",
            value: index.to_string(),
        })
    }

    /// Short label used in headers and exported rows
    pub fn label(&self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            Day::Mon => "Monday",
            Day::Tue => "Tuesday",
            Day::Wed => "Wednesday",
            Day::Thu => "Thursday",
            Day::Fri => "Friday",
            Day::Sat => "Saturday",
            Day::Sun => "Sunday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = GridError;

    /// Accepts the short label or the full English name, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|day| {
                needle.eq_ignore_ascii_case(day.label())
                    || needle.eq_ignore_ascii_case(day.full_name())
            })
            .ok_or_else(|| GridError::OutOfRange {
                axis: "day",
                value: needle.to_string(),
            })
    }
}

/// Hour row of the week grid.
///
/// The grid has 18 rows: 07:00 through 23:00, then 00:00 (midnight).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HourSlot(u8);

impl HourSlot {
    /// Number of hour rows
    pub const COUNT: usize = 18;

    /// Hour of day shown in the first row
    pub const FIRST_HOUR: u8 = 7;

    /// Slot for a row index
    pub fn from_index(index: usize) -> Result<Self, GridError> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            Err(GridError::OutOfRange {
                axis: "hour",
                value: index.to_string(),
            })
        }
    }

    /// Slot for an hour of day (7..=23 or 0)
    pub fn from_hour(hour: u8) -> Result<Self, GridError> {
        match hour {
            Self::FIRST_HOUR..=23 => Ok(Self(hour - Self::FIRST_HOUR)),
            0 => Ok(Self(Self::COUNT as u8 - 1)),
            _ => Err(GridError::OutOfRange {
                axis: "hour",
                value: hour.to_string(),
            }),
        }
    }

    /// All slots in row order
    pub fn all() -> impl Iterator<Item = HourSlot> {
        (0..Self::COUNT as u8).map(HourSlot)
    }

    /// Row index (07:00 = 0)
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Hour of day for this row
    pub fn hour_of_day(self) -> u8 {
        if self.index() == Self::COUNT - 1 {
            0
        } else {
            self.0 + Self::FIRST_HOUR
        }
    }

    /// Zero-padded `HH:00` label
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour_of_day())
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for HourSlot {
    type Err = GridError;

    /// Accepts `H:00`, `HH:00` or a bare hour number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let out_of_range = || GridError::OutOfRange {
            axis: "hour",
            value: trimmed.to_string(),
        };

        let hour_part = match trimmed.split_once(':') {
            Some((hour, "00")) => hour,
            Some(_) => return Err(out_of_range()),
            None => trimmed,
        };
        let hour: u8 = hour_part.parse().map_err(|_| out_of_range())?;
        Self::from_hour(hour).map_err(|_| out_of_range())
    }
}

impl TryFrom<String> for HourSlot {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HourSlot> for String {
    fn from(slot: HourSlot) -> Self {
        slot.label()
    }
}

/// Wall-clock time of day at minute resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, GridError> {
        if hour > 23 || minute > 59 {
            return Err(GridError::Parse(format!(
                "invalid time of day: {hour}:{minute:02}"
            )));
        }
        Ok(Self { hour, minute })
    }

    /// Truncate a `NaiveTime` to minute resolution
    pub fn from_naive(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Current local wall-clock time, truncated to the minute
    pub fn now() -> Self {
        Self::from_naive(Local::now().time())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = GridError;

    /// Accepts `H:MM` and `HH:MM`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let malformed = || GridError::Parse(format!("expected HH:MM, got '{trimmed}'"));

        let (hour, minute) = trimmed.split_once(':').ok_or_else(malformed)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(malformed());
        }
        let hour: u8 = hour.parse().map_err(|_| malformed())?;
        let minute: u8 = minute.parse().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(time: ClockTime) -> Self {
        time.to_string()
    }
}

// ============================================================================
// Activity Cell
// ============================================================================

/// Priority tag of an activity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityColor {
    /// Daily activity
    Green,
    /// Recreational activity
    Orange,
    /// Mandatory activity
    Red,
    /// Optional activity
    Blue,
    /// Untagged
    #[default]
    None,
}

impl PriorityColor {
    /// CSS color name (or hex for the untagged background)
    pub fn css_name(&self) -> &'static str {
        match self {
            PriorityColor::Green => "green",
            PriorityColor::Orange => "orange",
            PriorityColor::Red => "red",
            PriorityColor::Blue => "lightblue",
            PriorityColor::None => "#cce5ff",
        }
    }

    /// 0xRRGGBB value matching `css_name`
    pub fn rgb(&self) -> u32 {
        match self {
            PriorityColor::Green => 0x008000,
            PriorityColor::Orange => 0xFFA500,
            PriorityColor::Red => 0xFF0000,
            PriorityColor::Blue => 0xADD8E6,
            PriorityColor::None => 0xCCE5FF,
        }
    }

    /// Kind of activity the color stands for
    pub fn category(&self) -> &'static str {
        match self {
            PriorityColor::Green => "daily activity",
            PriorityColor::Orange => "recreational activity",
            PriorityColor::Red => "mandatory activity",
            PriorityColor::Blue => "optional activity",
            PriorityColor::None => "unclassified",
        }
    }
}

impl fmt::Display for PriorityColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for PriorityColor {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "green" => Ok(PriorityColor::Green),
            "orange" => Ok(PriorityColor::Orange),
            "red" => Ok(PriorityColor::Red),
            "blue" | "lightblue" => Ok(PriorityColor::Blue),
            "none" => Ok(PriorityColor::None),
            other => Err(GridError::Parse(format!("unknown priority color: '{other}'"))),
        }
    }
}

/// One activity in a grid slot.
///
/// A cell with a notification time always has non-empty text. The default
/// cell is blank and stands for an empty slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCell {
    text: String,
    completed: bool,
    priority: PriorityColor,
    notification: Option<ClockTime>,
    notified: bool,
}

fn is_blank_text(text: &str) -> bool {
    text.trim().is_empty()
}

impl ActivityCell {
    /// Create a cell with the given text
    pub fn new(text: impl Into<String>) -> Result<Self, GridError> {
        let mut cell = Self::default();
        cell.set_text(text)?;
        Ok(cell)
    }

    /// Set the priority color
    pub fn with_priority(mut self, color: PriorityColor) -> Self {
        self.priority = color;
        self
    }

    /// Set the completion flag
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn priority(&self) -> PriorityColor {
        self.priority
    }

    pub fn notification_time(&self) -> Option<ClockTime> {
        self.notification
    }

    /// Whether the alert for the configured time has already fired
    pub fn is_notified(&self) -> bool {
        self.notified
    }

    /// No text and no notification: equivalent to an empty slot
    pub fn is_blank(&self) -> bool {
        is_blank_text(&self.text) && self.notification.is_none()
    }

    /// Replace the text. Empty text is rejected; delete the cell instead.
    pub fn set_text(&mut self, text: impl Into<String>) -> Result<(), GridError> {
        let text = text.into();
        if is_blank_text(&text) {
            return Err(GridError::Validation(
                "activity text must not be empty".into(),
            ));
        }
        self.text = text;
        Ok(())
    }

    pub fn set_priority(&mut self, color: PriorityColor) {
        self.priority = color;
    }

    /// Configure the alert time and re-arm the latch
    pub fn set_notification(&mut self, time: ClockTime) -> Result<(), GridError> {
        if is_blank_text(&self.text) {
            return Err(GridError::Validation(
                "cannot set a notification on an activity without text".into(),
            ));
        }
        self.notification = Some(time);
        self.notified = false;
        Ok(())
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
        self.notified = false;
    }

    /// Flip the completion flag, returning the new value
    pub fn toggle_completed(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }

    pub(crate) fn mark_notified(&mut self) {
        self.notified = true;
    }
}

// ============================================================================
// Activity Grid
// ============================================================================

/// Fixed 7 × 18 grid of optional activity cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityGrid {
    cells: [[Option<ActivityCell>; HourSlot::COUNT]; Day::COUNT],
}

impl Default for ActivityGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityGrid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self {
            cells: std::array::from_fn(|_| std::array::from_fn(|_| None)),
        }
    }

    /// Validate raw column/row indices into grid coordinates
    pub fn slot(day_index: usize, hour_index: usize) -> Result<(Day, HourSlot), GridError> {
        Ok((Day::from_index(day_index)?, HourSlot::from_index(hour_index)?))
    }

    /// Insert or replace the cell in a slot, returning the previous one.
    ///
    /// Storing a blank cell leaves the slot empty.
    pub fn set_cell(&mut self, day: Day, hour: HourSlot, cell: ActivityCell) -> Option<ActivityCell> {
        let slot = &mut self.cells[day.index()][hour.index()];
        if cell.is_blank() {
            slot.take()
        } else {
            slot.replace(cell)
        }
    }

    pub fn get_cell(&self, day: Day, hour: HourSlot) -> Option<&ActivityCell> {
        self.cells[day.index()][hour.index()].as_ref()
    }

    pub fn get_cell_mut(&mut self, day: Day, hour: HourSlot) -> Option<&mut ActivityCell> {
        self.cells[day.index()][hour.index()].as_mut()
    }

    /// Empty a slot. Removing from an empty slot is a no-op.
    pub fn remove_cell(&mut self, day: Day, hour: HourSlot) -> Option<ActivityCell> {
        self.cells[day.index()][hour.index()].take()
    }

    /// Populated slots in (day, hour) order
    pub fn iter(&self) -> impl Iterator<Item = (Day, HourSlot, &ActivityCell)> + '_ {
        Day::ALL.into_iter().flat_map(move |day| {
            HourSlot::all().filter_map(move |hour| {
                self.get_cell(day, hour).map(|cell| (day, hour, cell))
            })
        })
    }

    /// Populated slots in (day, hour) order, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Day, HourSlot, &mut ActivityCell)> + '_ {
        self.cells.iter_mut().zip(Day::ALL).flat_map(|(column, day)| {
            column
                .iter_mut()
                .zip(HourSlot::all())
                .filter_map(move |(slot, hour)| slot.as_mut().map(|cell| (day, hour, cell)))
        })
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.cells.iter().flatten().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Persistent tabular storage for exported rows.
///
/// Called after every grid mutation with the complete row set; implementations
/// replace whatever they stored before.
pub trait SheetWriter {
    fn write_rows(&mut self, rows: &[ExportRow]) -> Result<(), ExportError>;
}

/// User-visible presentation of a due notification
pub trait AlertPresenter {
    fn present(&mut self, alert: &Alert) -> std::io::Result<()>;
}

/// In-memory sheet that keeps the last written rows
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySheet {
    /// Rows from the most recent write
    pub rows: Vec<ExportRow>,
    /// Number of writes received
    pub writes: usize,
}

impl SheetWriter for MemorySheet {
    fn write_rows(&mut self, rows: &[ExportRow]) -> Result<(), ExportError> {
        self.rows = rows.to_vec();
        self.writes += 1;
        Ok(())
    }
}

/// Collects alerts instead of showing them
impl AlertPresenter for Vec<Alert> {
    fn present(&mut self, alert: &Alert) -> std::io::Result<()> {
        self.push(alert.clone());
        Ok(())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Grid and cell precondition failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{axis} out of range: {value}")]
    OutOfRange { axis: &'static str, value: String },

    #[error("No activity at {day} {hour}")]
    EmptySlot { day: Day, hour: HourSlot },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Export collaborator failure
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),
}

/// Failure of a planner operation
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Alert presentation failed: {0}")]
    Alert(#[source] std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
