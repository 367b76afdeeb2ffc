//! Due-notification scanning
//!
//! A scan compares the current wall-clock minute with every configured
//! notification time in the grid. Matching is exact: a tick that misses the
//! configured minute (suspended process, clock change) skips the alert for
//! good. Each cell's `notified` latch stops the same alert from firing twice;
//! configuring the notification again re-arms it.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::{ActivityCell, ActivityGrid, ClockTime, Day, HourSlot};

/// A notification that came due
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub day: Day,
    pub hour: HourSlot,
    pub text: String,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.day, self.hour, self.text)
    }
}

/// Scans a grid for due notifications
pub struct NotificationScanner;

impl NotificationScanner {
    /// Whether `cell` should fire at `now`
    pub fn is_due(cell: &ActivityCell, now: ClockTime) -> bool {
        !cell.is_notified() && cell.notification_time() == Some(now)
    }

    /// Alerts due at `now`, in grid order, without latching anything
    pub fn due(grid: &ActivityGrid, now: ClockTime) -> Vec<Alert> {
        grid.iter()
            .filter(|(_, _, cell)| Self::is_due(cell, now))
            .map(|(day, hour, cell)| Alert {
                day,
                hour,
                text: cell.text().to_string(),
            })
            .collect()
    }

    /// Mark the cell behind `alert` as notified
    pub fn latch(grid: &mut ActivityGrid, alert: &Alert) {
        if let Some(cell) = grid.get_cell_mut(alert.day, alert.hour) {
            cell.mark_notified();
        }
    }

    /// Emit an alert for every due cell and latch it
    pub fn scan(grid: &mut ActivityGrid, now: ClockTime) -> Vec<Alert> {
        let alerts = Self::due(grid, now);
        for alert in &alerts {
            Self::latch(grid, alert);
        }
        debug!(time = %now, due = alerts.len(), "notification scan");
        alerts
    }

    /// Armed notifications that have not fired yet, ordered by time
    pub fn pending(grid: &ActivityGrid) -> Vec<(ClockTime, Day, HourSlot)> {
        let mut pending: Vec<_> = grid
            .iter()
            .filter(|(_, _, cell)| !cell.is_notified())
            .filter_map(|(day, hour, cell)| cell.notification_time().map(|t| (t, day, hour)))
            .collect();
        pending.sort();
        pending
    }
}
