//! Read-side views over generated slots.
//!
//! - [`timetable_grid`]: slots grouped by batch title, then weekday,
//!   each day ordered by start time.
//! - [`batch_status`]: slot counts per batch.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::Serialize;

use crate::models::{Catalog, TimetableSlot, Weekday};

/// One row of a batch's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableEntry {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub course: String,
    /// Lecturer display name.
    pub lecturer: String,
    pub classroom: String,
    pub program: String,
}

/// Batch title → weekday → entries.
pub type TimetableGrid = BTreeMap<String, BTreeMap<Weekday, Vec<TimetableEntry>>>;

/// Groups slots by batch and day.
///
/// With `batch` set, only that batch's slots are included. Slots whose
/// offering or batch is missing from the catalog fall back to raw IDs.
pub fn timetable_grid(catalog: &Catalog, slots: &[TimetableSlot], batch: Option<&str>) -> TimetableGrid {
    let mut grid = TimetableGrid::new();

    for slot in slots {
        if batch.is_some_and(|b| b != slot.batch) {
            continue;
        }
        let title = catalog
            .batch(&slot.batch)
            .map(|b| b.title.clone())
            .unwrap_or_else(|| slot.batch.clone());
        let offering = catalog.offering(&slot.offering);

        let entry = TimetableEntry {
            start: slot.window.start,
            end: slot.window.end,
            course: offering
                .map(|o| o.course.clone())
                .unwrap_or_else(|| slot.offering.clone()),
            lecturer: catalog.lecturer_name(&slot.lecturer),
            classroom: slot.classroom.clone(),
            program: offering.map(|o| o.program.clone()).unwrap_or_default(),
        };

        grid.entry(title)
            .or_default()
            .entry(slot.day)
            .or_default()
            .push(entry);
    }

    for days in grid.values_mut() {
        for entries in days.values_mut() {
            entries.sort_by(|a, b| (a.start, &a.classroom).cmp(&(b.start, &b.classroom)));
        }
    }
    grid
}

/// Timetable status of one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchStatus {
    pub id: String,
    pub title: String,
    pub program: String,
    pub has_timetable: bool,
    pub slot_count: usize,
}

/// Slot counts for every catalog batch, in catalog order.
pub fn batch_status(catalog: &Catalog, slots: &[TimetableSlot]) -> Vec<BatchStatus> {
    catalog
        .batches
        .iter()
        .map(|b| {
            let slot_count = slots.iter().filter(|s| s.batch == b.id).count();
            BatchStatus {
                id: b.id.clone(),
                title: b.title.clone(),
                program: b.program.clone(),
                has_timetable: slot_count > 0,
                slot_count,
            }
        })
        .collect()
}
