//! Planner controller
//!
//! [`Planner`] owns the activity grid together with its two collaborators: a
//! [`SheetWriter`] that persists the grid and an [`AlertPresenter`] that shows
//! due notifications. Every successful mutation is followed by a full export
//! (write-through, no batching). If that export fails the error is returned
//! and the in-memory edit stays applied.
//!
//! All calls happen on one logical thread: an edit and a [`Planner::tick`]
//! never interleave, so a notification change is visible to the next scan.

use tracing::{debug, info};

use crate::{
    ActivityCell, ActivityGrid, Alert, AlertPresenter, ClockTime, Day, GridError, HourSlot,
    NotificationScanner, PlannerError, PriorityColor, SheetWriter, SpreadsheetExporter,
};

pub struct Planner<W, P> {
    grid: ActivityGrid,
    writer: W,
    presenter: P,
}

impl<W: SheetWriter, P: AlertPresenter> Planner<W, P> {
    /// Planner with an empty grid
    pub fn new(writer: W, presenter: P) -> Self {
        Self {
            grid: ActivityGrid::new(),
            writer,
            presenter,
        }
    }

    /// Read-only view for display layers
    pub fn grid(&self) -> &ActivityGrid {
        &self.grid
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Put a new activity in a slot, replacing whatever was there
    pub fn add(&mut self, day: Day, hour: HourSlot, text: impl Into<String>) -> Result<(), PlannerError> {
        let cell = ActivityCell::new(text)?;
        info!(%day, %hour, text = cell.text(), "activity added");
        self.grid.set_cell(day, hour, cell);
        self.save()
    }

    /// Replace the text of an existing activity
    pub fn edit(&mut self, day: Day, hour: HourSlot, text: impl Into<String>) -> Result<(), PlannerError> {
        let cell = self.cell_mut(day, hour)?;
        cell.set_text(text)?;
        info!(%day, %hour, text = cell.text(), "activity edited");
        self.save()
    }

    /// Remove the activity in a slot. Returns whether anything was removed.
    pub fn delete(&mut self, day: Day, hour: HourSlot) -> Result<bool, PlannerError> {
        let removed = self.grid.remove_cell(day, hour).is_some();
        info!(%day, %hour, removed, "activity deleted");
        self.save()?;
        Ok(removed)
    }

    pub fn recolor(&mut self, day: Day, hour: HourSlot, color: PriorityColor) -> Result<(), PlannerError> {
        self.cell_mut(day, hour)?.set_priority(color);
        info!(%day, %hour, color = color.css_name(), "priority color set");
        self.save()
    }

    pub fn configure_notification(
        &mut self,
        day: Day,
        hour: HourSlot,
        time: ClockTime,
    ) -> Result<(), PlannerError> {
        self.cell_mut(day, hour)?.set_notification(time)?;
        info!(%day, %hour, %time, "notification configured");
        self.save()
    }

    pub fn remove_notification(&mut self, day: Day, hour: HourSlot) -> Result<(), PlannerError> {
        self.cell_mut(day, hour)?.clear_notification();
        info!(%day, %hour, "notification removed");
        self.save()
    }

    /// Flip completion, returning the new state
    pub fn toggle_completed(&mut self, day: Day, hour: HourSlot) -> Result<bool, PlannerError> {
        let completed = self.cell_mut(day, hour)?.toggle_completed();
        info!(%day, %hour, completed, "completion toggled");
        self.save()?;
        Ok(completed)
    }

    /// Present every notification due at `now`.
    ///
    /// A cell is latched only once its alert has been presented. When the
    /// presenter fails, that alert and the ones after it stay armed.
    pub fn tick(&mut self, now: ClockTime) -> Result<Vec<Alert>, PlannerError> {
        let due = NotificationScanner::due(&self.grid, now);
        debug!(time = %now, due = due.len(), "notification scan");

        let mut shown = Vec::with_capacity(due.len());
        for alert in due {
            self.presenter.present(&alert).map_err(PlannerError::Alert)?;
            NotificationScanner::latch(&mut self.grid, &alert);
            info!(day = %alert.day, hour = %alert.hour, text = %alert.text, "notification shown");
            shown.push(alert);
        }
        Ok(shown)
    }

    /// Export the whole grid to the sheet writer
    pub fn save(&mut self) -> Result<(), PlannerError> {
        let rows = SpreadsheetExporter::export(&self.grid, &mut self.writer)?;
        info!(rows, "planner saved");
        Ok(())
    }

    fn cell_mut(&mut self, day: Day, hour: HourSlot) -> Result<&mut ActivityCell, GridError> {
        self.grid
            .get_cell_mut(day, hour)
            .ok_or(GridError::EmptySlot { day, hour })
    }
}
