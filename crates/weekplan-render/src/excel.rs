//! XLSX planner writer
//!
//! Writes the exported grid to a single-sheet workbook:
//!
//! ```text
//! Sheet: Planner
//! | Day | Hour  | Activity | Completed | Color  |
//! |-----|-------|----------|-----------|--------|
//! | Mon | 09:00 | Standup  | FALSE     | green  |
//! | Wed | 14:00 | Gym      | TRUE      | orange |
//! ```
//!
//! The Color cell of each row is filled with the priority color. The target
//! file is replaced on every write: the workbook goes to a sibling temp file
//! first and is then renamed over the old one, so readers never see a
//! half-written planner.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::info;
use weekplan_core::{ExportError, ExportRow, SheetWriter, COLUMNS};

/// Writes planner rows to an `.xlsx` file
#[derive(Clone, Debug)]
pub struct XlsxWriter {
    /// Target workbook path
    pub path: PathBuf,
    /// Worksheet name
    pub sheet_name: String,
    /// Whether to fill the Color column with the priority color
    pub color_fill: bool,
}

impl XlsxWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet_name: "Planner".into(),
            color_fill: true,
        }
    }

    /// Set the worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Leave the Color column unstyled
    pub fn no_color_fill(mut self) -> Self {
        self.color_fill = false;
        self
    }

    /// Generate workbook bytes for `rows`
    pub fn render_to_bytes(&self, rows: &[ExportRow]) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let formats = PlannerFormats::new();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| ExportError::Format(e.to_string()))?;

        Self::write_headers(sheet, &formats)?;

        for (index, row) in rows.iter().enumerate() {
            self.write_row(sheet, index as u32 + 1, row, &formats)?;
        }

        workbook
            .save_to_buffer()
            .map_err(|e| ExportError::Format(format!("Failed to create Excel: {e}")))
    }

    fn write_headers(sheet: &mut Worksheet, formats: &PlannerFormats) -> Result<(), ExportError> {
        for (col, header) in COLUMNS.iter().enumerate() {
            sheet
                .write_with_format(0, col as u16, *header, &formats.header)
                .map_err(|e| ExportError::Format(e.to_string()))?;
        }

        sheet.set_column_width(0, 8).ok();
        sheet.set_column_width(1, 8).ok();
        sheet.set_column_width(2, 40).ok();
        sheet.set_column_width(3, 12).ok();
        sheet.set_column_width(4, 12).ok();
        sheet
            .set_freeze_panes(1, 0)
            .map_err(|e| ExportError::Format(e.to_string()))?;

        Ok(())
    }

    fn write_row(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        data: &ExportRow,
        formats: &PlannerFormats,
    ) -> Result<(), ExportError> {
        sheet
            .write_with_format(row, 0, data.day.label(), &formats.centered)
            .map_err(|e| ExportError::Format(e.to_string()))?;
        sheet
            .write_with_format(row, 1, data.hour.label(), &formats.centered)
            .map_err(|e| ExportError::Format(e.to_string()))?;
        sheet
            .write_with_format(row, 2, data.text.as_str(), &formats.text)
            .map_err(|e| ExportError::Format(e.to_string()))?;
        sheet
            .write_with_format(row, 3, data.completed, &formats.centered)
            .map_err(|e| ExportError::Format(e.to_string()))?;

        let color_format = if self.color_fill {
            Format::new()
                .set_background_color(data.color.rgb())
                .set_border(FormatBorder::Thin)
        } else {
            formats.text.clone()
        };
        sheet
            .write_with_format(row, 4, data.color.css_name(), &color_format)
            .map_err(|e| ExportError::Format(e.to_string()))?;

        Ok(())
    }

    /// Replace the target file with `bytes` (temp file, fsync, rename).
    ///
    /// The temp file is removed whenever a step fails.
    fn write_atomic(&self, bytes: &[u8]) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = temp_path(&self.path);

        let result = File::create(&tmp_path).and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&tmp_path, &self.path)
        });
        if let Err(e) = result {
            fs::remove_file(&tmp_path).ok();
            return Err(e.into());
        }
        Ok(())
    }
}

impl SheetWriter for XlsxWriter {
    fn write_rows(&mut self, rows: &[ExportRow]) -> Result<(), ExportError> {
        let bytes = self.render_to_bytes(rows)?;
        self.write_atomic(&bytes)?;
        info!(path = %self.path.display(), rows = rows.len(), "planner workbook written");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reusable cell formats
struct PlannerFormats {
    header: Format,
    text: Format,
    centered: Format,
}

impl PlannerFormats {
    fn new() -> Self {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let text = Format::new().set_border(FormatBorder::Thin);

        let centered = Format::new()
            .set_align(FormatAlign::Center)
            .set_border(FormatBorder::Thin);

        Self {
            header,
            text,
            centered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekplan_core::{Day, PriorityColor};

    fn rows() -> Vec<ExportRow> {
        vec![
            ExportRow {
                day: Day::Mon,
                hour: "09:00".parse().unwrap(),
                text: "Standup".into(),
                completed: false,
                color: PriorityColor::Green,
            },
            ExportRow {
                day: Day::Wed,
                hour: "14:00".parse().unwrap(),
                text: "Gym".into(),
                completed: true,
                color: PriorityColor::Orange,
            },
        ]
    }

    #[test]
    fn writer_defaults() {
        let writer = XlsxWriter::new("planner.xlsx");
        assert_eq!(writer.sheet_name, "Planner");
        assert!(writer.color_fill);

        let writer = writer.sheet_name("Week 42").no_color_fill();
        assert_eq!(writer.sheet_name, "Week 42");
        assert!(!writer.color_fill);
    }

    #[test]
    fn produces_valid_xlsx() {
        let bytes = XlsxWriter::new("unused.xlsx").render_to_bytes(&rows()).unwrap();
        // XLSX files start with PK (ZIP header)
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn empty_row_set_still_has_header_sheet() {
        let bytes = XlsxWriter::new("unused.xlsx").render_to_bytes(&[]).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn invalid_sheet_name_is_format_error() {
        let writer = XlsxWriter::new("unused.xlsx").sheet_name("bad/name");
        assert!(matches!(
            writer.render_to_bytes(&rows()),
            Err(ExportError::Format(_))
        ));
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("planner.xlsx");
        // a non-empty directory cannot be replaced by a file
        fs::create_dir_all(target.join("occupied")).unwrap();

        let mut writer = XlsxWriter::new(&target);
        assert!(matches!(writer.write_rows(&rows()), Err(ExportError::Io(_))));
        assert!(!temp_path(&target).exists());
        assert!(target.is_dir());
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let tmp = temp_path(Path::new("/data/planner.xlsx"));
        assert_eq!(tmp, PathBuf::from("/data/planner.xlsx.tmp"));
    }
}
