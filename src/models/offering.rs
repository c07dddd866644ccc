//! Batches, lecturers, and course offerings.
//!
//! A [`CourseOffering`] is the unit being scheduled: one course, taught by
//! one lecturer to one batch, with a target number of lectures per week.

use serde::{Deserialize, Serialize};

/// A cohort of students following the same program track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch identifier.
    pub id: String,
    /// Display title (e.g., "BSc CS 2024").
    pub title: String,
    /// Program title.
    pub program: String,
}

impl Batch {
    /// Creates a batch.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        program: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            program: program.into(),
        }
    }
}

/// A lecturer who teaches offerings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    /// Unique lecturer identifier.
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Lecturer {
    /// Creates a lecturer.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last", trimmed when either part is missing.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn default_lectures_per_week() -> u32 {
    3
}

/// A course taught by a lecturer to a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOffering {
    /// Unique offering identifier.
    pub id: String,
    /// Program title.
    pub program: String,
    /// Course title.
    pub course: String,
    /// Teaching lecturer ID.
    pub lecturer: String,
    /// Batch ID.
    pub batch: String,
    /// Target lectures per week (default: 3).
    #[serde(default = "default_lectures_per_week")]
    pub lectures_per_week: u32,
}

impl CourseOffering {
    /// Creates an offering with the default of 3 lectures per week.
    pub fn new(
        id: impl Into<String>,
        course: impl Into<String>,
        lecturer: impl Into<String>,
        batch: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            program: String::new(),
            course: course.into(),
            lecturer: lecturer.into(),
            batch: batch.into(),
            lectures_per_week: default_lectures_per_week(),
        }
    }

    /// Sets the program title.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the weekly lecture target.
    pub fn with_lectures_per_week(mut self, lectures: u32) -> Self {
        self.lectures_per_week = lectures;
        self
    }
}
