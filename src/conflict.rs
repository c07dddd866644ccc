//! Clash checks run before every placement.
//!
//! The checker issues two existence queries against the store:
//!
//! 1. Is the classroom already booked at (day, start)?
//! 2. Is the teaching party already booked at (day, start)?
//!
//! What "teaching party" means is selected by [`ClashKey`]. The slot
//! uniqueness constraint is keyed on the offering, so under the default
//! [`ClashKey::Offering`] two different offerings taught by the same
//! lecturer can land in the same window. [`ClashKey::Lecturer`] closes
//! that gap by querying the lecturer instead.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::{Classroom, CourseOffering, Weekday};
use crate::store::SlotStore;

/// Key used for the teaching clash query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClashKey {
    /// Same offering at the same (day, start).
    #[default]
    Offering,
    /// Same lecturer at the same (day, start), across offerings.
    Lecturer,
}

/// A reason a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conflict {
    /// Classroom already booked.
    Room,
    /// Offering already booked.
    Offering,
    /// Lecturer already teaching another offering.
    Lecturer,
}

/// Runs the room and teaching clash queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictChecker {
    key: ClashKey,
}

impl ConflictChecker {
    pub fn new(key: ClashKey) -> Self {
        Self { key }
    }

    /// Whether the classroom is already booked at (`day`, `start`).
    pub fn room_clash<S: SlotStore + ?Sized>(
        &self,
        store: &S,
        day: Weekday,
        start: NaiveTime,
        classroom: &Classroom,
    ) -> bool {
        store.room_booked(day, start, &classroom.name)
    }

    /// Whether the offering (or its lecturer, per the clash key) is busy.
    pub fn teaching_clash<S: SlotStore + ?Sized>(
        &self,
        store: &S,
        day: Weekday,
        start: NaiveTime,
        offering: &CourseOffering,
    ) -> bool {
        match self.key {
            ClashKey::Offering => store.offering_booked(day, start, &offering.id),
            ClashKey::Lecturer => store.lecturer_booked(day, start, &offering.lecturer),
        }
    }

    /// Returns the first conflict, room check first.
    pub fn check<S: SlotStore + ?Sized>(
        &self,
        store: &S,
        day: Weekday,
        start: NaiveTime,
        classroom: &Classroom,
        offering: &CourseOffering,
    ) -> Option<Conflict> {
        if self.room_clash(store, day, start, classroom) {
            return Some(Conflict::Room);
        }
        if self.teaching_clash(store, day, start, offering) {
            return Some(match self.key {
                ClashKey::Offering => Conflict::Offering,
                ClashKey::Lecturer => Conflict::Lecturer,
            });
        }
        None
    }
}
