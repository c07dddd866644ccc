//! Input validation for timetable generation.
//!
//! Checks structural integrity of the catalog and week plan before any
//! slot is cleared. Detects:
//! - Duplicate classroom names and duplicate batch, lecturer, or offering IDs
//! - Offerings referencing unknown batches or lecturers
//! - Offerings with zero lectures per week
//! - Malformed or duplicated time windows
//! - Teaching days listed twice
//!
//! Lecturer references are only checked when the catalog lists lecturers;
//! a catalog without a lecturer roster treats lecturer IDs as opaque.

use std::collections::HashSet;

use crate::models::{Catalog, WeekPlan};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID (or classroom name).
    DuplicateId,
    /// An offering references a batch that doesn't exist.
    UnknownBatch,
    /// An offering references a lecturer that doesn't exist.
    UnknownLecturer,
    /// An offering asks for zero lectures per week.
    ZeroLectures,
    /// A time window ends at or before its start, or repeats a start time.
    InvalidWindow,
    /// A teaching day is listed more than once.
    DuplicateDay,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the catalog.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    let mut rooms = HashSet::new();
    for room in &catalog.classrooms {
        if !rooms.insert(room.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate classroom name: {}", room.name),
            ));
        }
    }

    let mut batch_ids = HashSet::new();
    for batch in &catalog.batches {
        if !batch_ids.insert(batch.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate batch ID: {}", batch.id),
            ));
        }
    }

    let mut lecturer_ids = HashSet::new();
    for lecturer in &catalog.lecturers {
        if !lecturer_ids.insert(lecturer.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate lecturer ID: {}", lecturer.id),
            ));
        }
    }

    let mut offering_ids = HashSet::new();
    for offering in &catalog.offerings {
        if !offering_ids.insert(offering.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate offering ID: {}", offering.id),
            ));
        }

        if !batch_ids.contains(offering.batch.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownBatch,
                format!(
                    "Offering '{}' references unknown batch '{}'",
                    offering.id, offering.batch
                ),
            ));
        }

        if !lecturer_ids.is_empty() && !lecturer_ids.contains(offering.lecturer.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownLecturer,
                format!(
                    "Offering '{}' references unknown lecturer '{}'",
                    offering.id, offering.lecturer
                ),
            ));
        }

        if offering.lectures_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroLectures,
                format!("Offering '{}' has zero lectures per week", offering.id),
            ));
        }
    }

    finish(errors)
}

/// Validates a week plan's days and windows.
///
/// Windows must be non-empty intervals with distinct start times, since
/// slot uniqueness is keyed on the start time. Each day may appear once.
pub fn validate_week(plan: &WeekPlan) -> ValidationResult {
    let mut errors = Vec::new();

    let mut days = HashSet::new();
    for day in &plan.days {
        if !days.insert(*day) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateDay,
                format!("Day {day} appears more than once"),
            ));
        }
    }

    let mut starts = HashSet::new();

    for window in &plan.windows {
        if !window.is_valid() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!("Window {window} ends before it starts"),
            ));
        }
        if !starts.insert(window.start) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidWindow,
                format!("Window start {} appears more than once", window.start.format("%H:%M")),
            ));
        }
    }

    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Batch, Classroom, CourseOffering, Lecturer, TimeWindow, Weekday};
    use chrono::NaiveTime;

    fn sample_catalog() -> Catalog {
        Catalog::new()
            .with_classroom(Classroom::new("LH-1"))
            .with_classroom(Classroom::new("LH-2"))
            .with_batch(Batch::new("B1", "CS 2024", "BSc CS"))
            .with_lecturer(Lecturer::new("L1", "Alan", "Turing"))
            .with_offering(CourseOffering::new("O1", "Automata", "L1", "B1"))
    }

    #[test]
    fn test_valid_catalog() {
        assert!(validate_catalog(&sample_catalog()).is_ok());
    }

    #[test]
    fn test_duplicate_classroom() {
        let catalog = sample_catalog().with_classroom(Classroom::new("LH-1"));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("classroom")));
    }

    #[test]
    fn test_duplicate_offering() {
        let catalog =
            sample_catalog().with_offering(CourseOffering::new("O1", "Again", "L1", "B1"));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("offering")));
    }

    #[test]
    fn test_unknown_batch() {
        let catalog =
            sample_catalog().with_offering(CourseOffering::new("O2", "Graphs", "L1", "B9"));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownBatch));
    }

    #[test]
    fn test_unknown_lecturer_only_with_roster() {
        let catalog =
            sample_catalog().with_offering(CourseOffering::new("O2", "Graphs", "L9", "B1"));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownLecturer));

        let mut no_roster = catalog.clone();
        no_roster.lecturers.clear();
        assert!(validate_catalog(&no_roster).is_ok());
    }

    #[test]
    fn test_zero_lectures() {
        let catalog = sample_catalog().with_offering(
            CourseOffering::new("O2", "Seminar", "L1", "B1").with_lectures_per_week(0),
        );
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::ZeroLectures));
    }

    #[test]
    fn test_multiple_errors() {
        let catalog = Catalog::new()
            .with_batch(Batch::new("B1", "A", "P"))
            .with_batch(Batch::new("B1", "B", "P"))
            .with_offering(CourseOffering::new("O1", "C", "L1", "B7"));
        let errors = validate_catalog(&catalog).unwrap_err();
        assert!(errors.len() >= 2);
    }

    #[test]
    fn test_standard_week_is_valid() {
        assert!(validate_week(&WeekPlan::standard()).is_ok());
    }

    #[test]
    fn test_inverted_and_repeated_windows() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let eight = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        let plan = WeekPlan::new(
            vec![Weekday::Mon],
            vec![
                TimeWindow { start: nine, end: eight },
                TimeWindow::hm((9, 0), (10, 0)).unwrap(),
            ],
        );
        let errors = validate_week(&plan).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::InvalidWindow));
    }

    #[test]
    fn test_repeated_day() {
        let plan = WeekPlan::new(
            vec![Weekday::Mon, Weekday::Tue, Weekday::Mon],
            WeekPlan::standard().windows,
        );
        let errors = validate_week(&plan).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateDay);
        assert!(errors[0].message.contains("Mon"));
    }
}
