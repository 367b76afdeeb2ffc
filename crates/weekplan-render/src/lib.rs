//! # weekplan-render
//!
//! Output backends for the weekplan grid.
//!
//! This crate provides:
//! - `XlsxWriter`: the spreadsheet collaborator used for write-through export
//! - `WeekViewRenderer`: a plain-text week table for terminals
//!
//! ## Example
//!
//! ```rust,ignore
//! use weekplan_core::{Alert, Planner};
//! use weekplan_render::{WeekViewRenderer, XlsxWriter};
//!
//! let mut planner = Planner::new(XlsxWriter::new("planner.xlsx"), Vec::<Alert>::new());
//! planner.add(Day::Mon, "09:00".parse()?, "Standup")?;
//!
//! println!("{}", WeekViewRenderer::new().render(planner.grid()));
//! ```

pub mod excel;

pub use excel::XlsxWriter;

use weekplan_core::{ActivityCell, ActivityGrid, Day, HourSlot};

/// Plain-text week table
#[derive(Clone, Debug)]
pub struct WeekViewRenderer {
    /// Width of each day column in characters
    pub column_width: usize,
    /// Only print hours that hold at least one activity
    pub compact: bool,
}

impl Default for WeekViewRenderer {
    fn default() -> Self {
        Self {
            column_width: 16,
            compact: false,
        }
    }
}

impl WeekViewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure day column width (minimum 6)
    pub fn column_width(mut self, width: usize) -> Self {
        self.column_width = width.max(6);
        self
    }

    /// Skip empty hour rows
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }

    /// Render the grid as a table with one row per hour slot
    pub fn render(&self, grid: &ActivityGrid) -> String {
        let mut out = String::new();

        out.push_str("Hour ");
        for day in Day::ALL {
            out.push_str(" | ");
            out.push_str(&self.pad(day.label()));
        }
        out.push('\n');
        out.push_str(&"-".repeat(5 + Day::COUNT * (self.column_width + 3)));
        out.push('\n');

        for hour in HourSlot::all() {
            let row_empty = Day::ALL.iter().all(|&day| grid.get_cell(day, hour).is_none());
            if self.compact && row_empty {
                continue;
            }

            out.push_str(&hour.label());
            for day in Day::ALL {
                out.push_str(" | ");
                let content = grid
                    .get_cell(day, hour)
                    .map(Self::cell_summary)
                    .unwrap_or_default();
                out.push_str(&self.pad(&content));
            }
            out.push('\n');
        }

        out
    }

    /// `[x] text @HH:MM` style summary of one cell
    fn cell_summary(cell: &ActivityCell) -> String {
        let mark = if cell.is_completed() { "[x]" } else { "[ ]" };
        match cell.notification_time() {
            Some(time) => format!("{mark} {} @{time}", cell.text()),
            None => format!("{mark} {}", cell.text()),
        }
    }

    /// Fit `text` to the column width, truncating with `~`
    fn pad(&self, text: &str) -> String {
        let width = self.column_width;
        let count = text.chars().count();
        if count > width {
            let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
            cut.push('~');
            cut
        } else {
            format!("{text}{}", " ".repeat(width - count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_truncates_long_text() {
        let renderer = WeekViewRenderer::new().column_width(8);
        assert_eq!(renderer.pad("abc"), "abc     ");
        assert_eq!(renderer.pad("abcdefghij"), "abcdefg~");
        assert_eq!(renderer.pad("ñandú"), "ñandú   ");
    }

    #[test]
    fn zero_width_field_does_not_panic() {
        let mut renderer = WeekViewRenderer::new();
        renderer.column_width = 0;
        assert_eq!(renderer.pad("Standup"), "~");
        assert_eq!(renderer.pad(""), "");
        assert_eq!(renderer.render(&ActivityGrid::new()).lines().count(), 20);
    }

    #[test]
    fn column_width_has_a_floor() {
        assert_eq!(WeekViewRenderer::new().column_width(2).column_width, 6);
    }
}
