//! Whole-week scenarios through the public API

use pretty_assertions::assert_eq;
use weekplan_core::{
    ActivityCell, ActivityGrid, Alert, ClockTime, Day, GridError, HourSlot, MemorySheet, Planner,
    PlannerError, PriorityColor, SpreadsheetExporter,
};

fn hour(label: &str) -> HourSlot {
    label.parse().unwrap()
}

fn time(label: &str) -> ClockTime {
    label.parse().unwrap()
}

#[test]
fn k_distinct_cells_iterate_in_order() {
    let mut grid = ActivityGrid::new();
    let mut expected = Vec::new();

    // every third slot, walking the grid backwards
    for day_index in (0..Day::COUNT).rev() {
        for hour_index in (0..HourSlot::COUNT).rev().step_by(3) {
            let (day, slot) = ActivityGrid::slot(day_index, hour_index).unwrap();
            grid.set_cell(day, slot, ActivityCell::new(format!("{day}-{slot}")).unwrap());
            expected.push((day, slot));
        }
    }
    expected.sort();

    let seen: Vec<(Day, HourSlot)> = grid.iter().map(|(d, h, _)| (d, h)).collect();
    assert_eq!(seen.len(), expected.len());
    assert_eq!(seen, expected);
}

#[test]
fn week_of_edits_and_reminders() {
    let mut planner = Planner::new(MemorySheet::default(), Vec::<Alert>::new());

    planner.add(Day::Mon, hour("09:00"), "Standup").unwrap();
    planner.recolor(Day::Mon, hour("09:00"), PriorityColor::Green).unwrap();
    planner
        .configure_notification(Day::Mon, hour("09:00"), time("09:00"))
        .unwrap();

    planner.add(Day::Wed, hour("14:00"), "Gym").unwrap();
    planner.recolor(Day::Wed, hour("14:00"), PriorityColor::Orange).unwrap();
    planner.toggle_completed(Day::Wed, hour("14:00")).unwrap();

    planner.add(Day::Fri, hour("23:00"), "Movie").unwrap();
    planner.delete(Day::Fri, hour("23:00")).unwrap();

    let rows: Vec<[String; 5]> = planner.writer().rows.iter().map(|r| r.fields()).collect();
    assert_eq!(
        rows,
        vec![
            ["Mon", "09:00", "Standup", "false", "green"].map(String::from),
            ["Wed", "14:00", "Gym", "true", "orange"].map(String::from),
        ]
    );

    assert!(planner.tick(time("08:59")).unwrap().is_empty());
    let fired = planner.tick(time("09:00")).unwrap();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].to_string(), "Mon 09:00: Standup");
    assert!(planner.tick(time("09:00")).unwrap().is_empty());

    // reconfiguring re-arms the latch
    planner
        .configure_notification(Day::Mon, hour("09:00"), time("09:00"))
        .unwrap();
    assert_eq!(planner.tick(time("09:00")).unwrap().len(), 1);
    assert_eq!(planner.presenter().len(), 2);

    assert_eq!(SpreadsheetExporter::rows(planner.grid()), planner.writer().rows);
}

#[test]
fn out_of_range_coordinates_are_rejected_at_the_boundary() {
    assert!(matches!(
        ActivityGrid::slot(Day::COUNT, 0),
        Err(GridError::OutOfRange { .. })
    ));
    assert!(matches!(
        "6:00".parse::<HourSlot>(),
        Err(GridError::OutOfRange { .. })
    ));

    let mut planner = Planner::new(MemorySheet::default(), Vec::<Alert>::new());
    let err = planner
        .configure_notification(Day::Mon, hour("07:00"), time("07:00"))
        .unwrap_err();
    assert!(matches!(err, PlannerError::Grid(GridError::EmptySlot { .. })));
}
