//! Spreadsheet export rows
//!
//! Flattens the populated cells of an [`ActivityGrid`] into the row set that
//! the persisted planner file holds:
//!
//! ```text
//! | Day | Hour  | Activity | Completed | Color  |
//! |-----|-------|----------|-----------|--------|
//! | Mon | 09:00 | Standup  | false     | green  |
//! | Wed | 14:00 | Gym      | true      | orange |
//! ```
//!
//! Rows follow grid iteration order (day, then hour). Writing them somewhere
//! is left to a [`SheetWriter`].

use serde::Serialize;

use crate::{ActivityGrid, Day, ExportError, HourSlot, PriorityColor, SheetWriter};

/// Column headers of the persisted sheet, in order
pub const COLUMNS: [&str; 5] = ["Day", "Hour", "Activity", "Completed", "Color"];

/// One exported grid cell
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub day: Day,
    pub hour: HourSlot,
    pub text: String,
    pub completed: bool,
    pub color: PriorityColor,
}

impl ExportRow {
    /// Cell values as written to the sheet, matching [`COLUMNS`]
    pub fn fields(&self) -> [String; 5] {
        [
            self.day.label().to_string(),
            self.hour.label(),
            self.text.clone(),
            self.completed.to_string(),
            self.color.css_name().to_string(),
        ]
    }
}

/// Builds export rows from a grid
pub struct SpreadsheetExporter;

impl SpreadsheetExporter {
    /// One row per populated cell, in (day, hour) order
    pub fn rows(grid: &ActivityGrid) -> Vec<ExportRow> {
        grid.iter()
            .map(|(day, hour, cell)| ExportRow {
                day,
                hour,
                text: cell.text().to_string(),
                completed: cell.is_completed(),
                color: cell.priority(),
            })
            .collect()
    }

    /// Build the rows and hand them to `writer`, returning the row count
    pub fn export<W: SheetWriter + ?Sized>(
        grid: &ActivityGrid,
        writer: &mut W,
    ) -> Result<usize, ExportError> {
        let rows = Self::rows(grid);
        writer.write_rows(&rows)?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivityCell, MemorySheet};
    use pretty_assertions::assert_eq;

    fn two_cell_grid() -> ActivityGrid {
        let mut grid = ActivityGrid::new();
        // inserted out of order on purpose
        grid.set_cell(
            Day::Wed,
            "14:00".parse().unwrap(),
            ActivityCell::new("Gym")
                .unwrap()
                .with_completed(true)
                .with_priority(PriorityColor::Orange),
        );
        grid.set_cell(
            Day::Mon,
            "09:00".parse().unwrap(),
            ActivityCell::new("Standup")
                .unwrap()
                .with_priority(PriorityColor::Green),
        );
        grid
    }

    #[test]
    fn exports_rows_in_day_order_with_verbatim_fields() {
        let rows = SpreadsheetExporter::rows(&two_cell_grid());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields(), ["Mon", "09:00", "Standup", "false", "green"].map(String::from));
        assert_eq!(rows[1].fields(), ["Wed", "14:00", "Gym", "true", "orange"].map(String::from));
    }

    #[test]
    fn empty_grid_exports_no_rows() {
        assert!(SpreadsheetExporter::rows(&ActivityGrid::new()).is_empty());
    }

    #[test]
    fn export_hands_rows_to_writer_without_touching_grid() {
        let grid = two_cell_grid();
        let before = grid.clone();
        let mut sheet = MemorySheet::default();

        let count = SpreadsheetExporter::export(&grid, &mut sheet).unwrap();

        assert_eq!(count, 2);
        assert_eq!(sheet.writes, 1);
        assert_eq!(sheet.rows, SpreadsheetExporter::rows(&grid));
        assert_eq!(grid, before);
    }

    #[test]
    fn untagged_cells_export_default_background() {
        let mut grid = ActivityGrid::new();
        grid.set_cell(Day::Sat, "00:00".parse().unwrap(), ActivityCell::new("Sleep").unwrap());

        let rows = SpreadsheetExporter::rows(&grid);
        assert_eq!(rows[0].fields()[4], "#cce5ff");
    }

    #[test]
    fn rows_serialize_with_labels() {
        let rows = SpreadsheetExporter::rows(&two_cell_grid());
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "day": "Mon",
                "hour": "09:00",
                "text": "Standup",
                "completed": false,
                "color": "green"
            })
        );
    }
}
