//! Clash audit over a set of slots.
//!
//! Independent of how the slots were produced, reports:
//!
//! - two slots in one classroom with overlapping windows on the same day
//! - one offering booked twice in overlapping windows on the same day
//! - one lecturer teaching two different offerings in overlapping windows
//!
//! The last case is not prevented by the store's uniqueness constraints,
//! so under [`crate::conflict::ClashKey::Offering`] a generated timetable
//! can contain lecturer double bookings. The audit surfaces them.

use serde::{Deserialize, Serialize};

use crate::models::TimetableSlot;

/// A clash found in a slot set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Classroom, offering, or lecturer involved.
    pub entity_id: String,
    /// The two slot IDs involved.
    pub slots: (u64, u64),
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of clashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    RoomClash,
    OfferingClash,
    LecturerDoubleBooking,
}

impl Violation {
    fn between(
        violation_type: ViolationType,
        entity_id: &str,
        a: &TimetableSlot,
        b: &TimetableSlot,
    ) -> Self {
        let (what, severity) = match violation_type {
            ViolationType::RoomClash => ("classroom", 95),
            ViolationType::OfferingClash => ("offering", 90),
            ViolationType::LecturerDoubleBooking => ("lecturer", 80),
        };
        Self {
            violation_type,
            entity_id: entity_id.to_string(),
            slots: (a.id, b.id),
            message: format!(
                "{what} '{entity_id}' double booked on {}: {} and {}",
                a.day, a.window, b.window
            ),
            severity,
        }
    }
}

/// Finds every pairwise clash in `slots`.
///
/// # Complexity
/// O(n²) pair checks within each day.
pub fn audit(slots: &[TimetableSlot]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if a.day != b.day || !a.window.overlaps(&b.window) {
                continue;
            }
            if a.classroom == b.classroom {
                violations.push(Violation::between(
                    ViolationType::RoomClash,
                    &a.classroom,
                    a,
                    b,
                ));
            }
            if a.offering == b.offering {
                violations.push(Violation::between(
                    ViolationType::OfferingClash,
                    &a.offering,
                    a,
                    b,
                ));
            } else if a.lecturer == b.lecturer {
                violations.push(Violation::between(
                    ViolationType::LecturerDoubleBooking,
                    &a.lecturer,
                    a,
                    b,
                ));
            }
        }
    }

    violations
}

/// Number of violations of one type.
pub fn count_of(violations: &[Violation], violation_type: ViolationType) -> usize {
    violations
        .iter()
        .filter(|v| v.violation_type == violation_type)
        .count()
}
