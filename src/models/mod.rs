//! Timetabling domain models.
//!
//! Provides the input types (classrooms, batches, lecturers, offerings,
//! gathered in a [`Catalog`]), the weekly grid ([`WeekPlan`]), and the
//! output rows ([`TimetableSlot`]).
//!
//! # Domain Mappings
//!
//! | college-timetable | Generic scheduling |
//! |-------------------|--------------------|
//! | CourseOffering | Task |
//! | Classroom | Resource |
//! | TimeWindow × Weekday | Time bucket |
//! | TimetableSlot | Assignment |

mod catalog;
mod classroom;
mod offering;
mod slot;
mod week;

pub use catalog::Catalog;
pub use classroom::Classroom;
pub use offering::{Batch, CourseOffering, Lecturer};
pub use slot::{NewSlot, SlotId, TimetableSlot};
pub use week::{HourlyPlan, TimeWindow, WeekPlan, Weekday};
