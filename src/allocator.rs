//! Greedy first-fit slot allocation.
//!
//! # Algorithm
//!
//! For one day and a list of offerings:
//!
//! 1. Order the offerings ([`Placement::Shuffled`] shuffles them,
//!    [`Placement::Sequential`] keeps the given order).
//! 2. The i-th offering is offered window `i` and classroom `i mod rooms`.
//! 3. If the conflict checker reports a clash, the offering is skipped for
//!    that day. There is no retry and no backtracking.
//!
//! Every offering considered ends up either booked or recorded as an
//! [`Omission`], so `created + omitted.len()` always equals the number of
//! offerings passed in.
//!
//! # Complexity
//! O(n) store queries per day, n = offerings.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::conflict::{Conflict, ConflictChecker};
use crate::error::{Result, TimetableError};
use crate::models::{Classroom, CourseOffering, NewSlot, TimeWindow, Weekday};
use crate::store::SlotStore;

/// How offerings are mapped to window positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Shuffle, then offering `i` gets window `i`; offerings past the last
    /// window are not placed.
    #[default]
    Shuffled,
    /// Keep input order; offering `i` gets window `i mod windows`.
    Sequential,
}

/// Why an offering was not placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OmissionReason {
    /// More offerings than windows that day.
    NoWindow,
    /// The conflict checker refused the placement.
    Clash(Conflict),
}

/// An offering left unplaced on a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Omission {
    pub offering: String,
    pub day: Weekday,
    pub reason: OmissionReason,
}

/// Result of allocating one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOutcome {
    pub day: Weekday,
    /// Slots booked.
    pub created: usize,
    /// Offerings not booked, with reasons.
    pub omitted: Vec<Omission>,
}

impl DayOutcome {
    fn empty(day: Weekday) -> Self {
        Self {
            day,
            created: 0,
            omitted: Vec::new(),
        }
    }

    /// Offerings considered: booked plus omitted.
    pub fn considered(&self) -> usize {
        self.created + self.omitted.len()
    }
}

/// Assigns offerings to (window, classroom) pairs for a day.
///
/// # Example
///
/// ```
/// use college_timetable::allocator::SlotAllocator;
/// use college_timetable::models::{Classroom, CourseOffering, WeekPlan, Weekday};
/// use college_timetable::store::MemoryStore;
/// use rand::SeedableRng;
///
/// let rooms = vec![Classroom::new("LH-1"), Classroom::new("LH-2")];
/// let plan = WeekPlan::standard();
/// let a = CourseOffering::new("O1", "Calculus", "L1", "B1");
/// let b = CourseOffering::new("O2", "Physics", "L2", "B1");
///
/// let mut store = MemoryStore::new();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let allocator = SlotAllocator::new(&rooms, &plan.windows);
/// let outcome = allocator
///     .allocate_day(&mut store, Weekday::Mon, &[&a, &b], &mut rng)
///     .unwrap();
/// assert_eq!(outcome.created, 2);
/// ```
#[derive(Debug, Clone)]
pub struct SlotAllocator<'a> {
    classrooms: &'a [Classroom],
    windows: &'a [TimeWindow],
    checker: ConflictChecker,
    placement: Placement,
}

impl<'a> SlotAllocator<'a> {
    /// Creates a shuffling allocator with the default conflict checker.
    pub fn new(classrooms: &'a [Classroom], windows: &'a [TimeWindow]) -> Self {
        Self {
            classrooms,
            windows,
            checker: ConflictChecker::default(),
            placement: Placement::default(),
        }
    }

    pub fn with_checker(mut self, checker: ConflictChecker) -> Self {
        self.checker = checker;
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Books offerings for one day.
    ///
    /// Fails only when there are no classrooms or the store rejects an
    /// insert; unplaceable offerings are reported in the outcome.
    pub fn allocate_day<S, R>(
        &self,
        store: &mut S,
        day: Weekday,
        offerings: &[&CourseOffering],
        rng: &mut R,
    ) -> Result<DayOutcome>
    where
        S: SlotStore + ?Sized,
        R: Rng + ?Sized,
    {
        if self.classrooms.is_empty() {
            return Err(TimetableError::NoClassrooms);
        }

        let mut order: Vec<&CourseOffering> = offerings.to_vec();
        if self.placement == Placement::Shuffled {
            order.shuffle(rng);
        }

        let mut outcome = DayOutcome::empty(day);
        for (i, offering) in order.into_iter().enumerate() {
            let Some(window) = self.window_at(i) else {
                outcome.omitted.push(Omission {
                    offering: offering.id.clone(),
                    day,
                    reason: OmissionReason::NoWindow,
                });
                continue;
            };
            let classroom = &self.classrooms[i % self.classrooms.len()];

            let conflict = self
                .checker
                .check(&*store, day, window.start, classroom, offering);
            if let Some(conflict) = conflict {
                debug!(
                    offering = %offering.id,
                    %day,
                    %window,
                    classroom = %classroom.name,
                    ?conflict,
                    "placement skipped"
                );
                outcome.omitted.push(Omission {
                    offering: offering.id.clone(),
                    day,
                    reason: OmissionReason::Clash(conflict),
                });
                continue;
            }

            let id = store.insert(NewSlot::new(day, window, classroom, offering))?;
            debug!(
                slot = id,
                offering = %offering.id,
                %day,
                %window,
                classroom = %classroom.name,
                "slot created"
            );
            outcome.created += 1;
        }

        if !outcome.omitted.is_empty() {
            warn!(
                %day,
                created = outcome.created,
                omitted = outcome.omitted.len(),
                "some offerings were not placed"
            );
        }
        Ok(outcome)
    }

    /// Books offerings for each of `days` in turn.
    pub fn allocate_days<S, R>(
        &self,
        store: &mut S,
        days: &[Weekday],
        offerings: &[&CourseOffering],
        rng: &mut R,
    ) -> Result<Vec<DayOutcome>>
    where
        S: SlotStore + ?Sized,
        R: Rng + ?Sized,
    {
        days.iter()
            .map(|&day| self.allocate_day(store, day, offerings, rng))
            .collect()
    }

    fn window_at(&self, i: usize) -> Option<TimeWindow> {
        if self.windows.is_empty() {
            return None;
        }
        match self.placement {
            Placement::Shuffled => self.windows.get(i).copied(),
            Placement::Sequential => Some(self.windows[i % self.windows.len()]),
        }
    }
}
