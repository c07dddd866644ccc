//! Timetable slot model.
//!
//! A slot books one offering into one classroom for one (day, window).
//! The offering's lecturer and batch are denormalized onto the slot so
//! clash queries and per-batch deletes need no catalog lookup.

use serde::{Deserialize, Serialize};

use super::{Classroom, CourseOffering, TimeWindow, Weekday};

/// Store-assigned slot identifier.
pub type SlotId = u64;

/// A booked (day, window, classroom, offering).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSlot {
    /// Identifier, assigned on insert.
    pub id: SlotId,
    pub day: Weekday,
    pub window: TimeWindow,
    /// Classroom name.
    pub classroom: String,
    /// Offering ID.
    pub offering: String,
    /// Lecturer ID of the offering.
    pub lecturer: String,
    /// Batch ID of the offering.
    pub batch: String,
}

/// A slot not yet inserted into a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlot {
    pub day: Weekday,
    pub window: TimeWindow,
    pub classroom: String,
    pub offering: String,
    pub lecturer: String,
    pub batch: String,
}

impl NewSlot {
    /// Books `offering` into `classroom` at (`day`, `window`).
    pub fn new(
        day: Weekday,
        window: TimeWindow,
        classroom: &Classroom,
        offering: &CourseOffering,
    ) -> Self {
        Self {
            day,
            window,
            classroom: classroom.name.clone(),
            offering: offering.id.clone(),
            lecturer: offering.lecturer.clone(),
            batch: offering.batch.clone(),
        }
    }

    /// Attaches a store ID.
    pub fn with_id(self, id: SlotId) -> TimetableSlot {
        TimetableSlot {
            id,
            day: self.day,
            window: self.window,
            classroom: self.classroom,
            offering: self.offering,
            lecturer: self.lecturer,
            batch: self.batch,
        }
    }
}

impl std::fmt::Display for TimetableSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.day, self.window, self.classroom, self.offering
        )
    }
}
