//! Timetable quality metrics (KPIs).
//!
//! Computes indicators from a set of slots and the catalog they were
//! generated from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Room Utilization | slots in room / (days × windows) |
//! | Weekly Count | slots per offering across the week |
//! | Shortfall | Σ max(0, lectures_per_week − weekly count) |
//! | Surplus | Σ max(0, weekly count − lectures_per_week) |
//! | Unscheduled | offerings with no slot at all |
//! | Double Bookings | lecturer clashes found by the audit |

use std::collections::BTreeMap;

use serde::Serialize;

use crate::audit::{audit, count_of, ViolationType};
use crate::models::{Catalog, TimetableSlot, WeekPlan};

/// Timetable performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct TimetableKpi {
    /// Number of slots.
    pub total_slots: usize,
    /// Per-classroom utilization (0.0..1.0), for every catalog classroom.
    pub utilization_by_room: BTreeMap<String, f64>,
    /// Mean of `utilization_by_room`.
    pub avg_utilization: f64,
    /// Slots per offering, for every catalog offering.
    pub weekly_count_by_offering: BTreeMap<String, usize>,
    /// Lectures missing against `lectures_per_week`.
    pub total_shortfall: usize,
    /// Lectures scheduled beyond `lectures_per_week`.
    pub total_surplus: usize,
    /// Offerings with no slot.
    pub unscheduled: Vec<String>,
    /// Lecturer double bookings.
    pub lecturer_double_bookings: usize,
}

impl TimetableKpi {
    /// Computes KPIs for `slots`.
    ///
    /// # Arguments
    /// * `slots` - The generated timetable.
    /// * `catalog` - Classrooms and offerings (for targets).
    /// * `week` - The grid slots were drawn from (for utilization).
    pub fn calculate(slots: &[TimetableSlot], catalog: &Catalog, week: &WeekPlan) -> Self {
        let cells = week.cells_per_room();

        let mut room_slots: BTreeMap<String, usize> = catalog
            .classrooms
            .iter()
            .map(|r| (r.name.clone(), 0))
            .collect();
        let mut weekly: BTreeMap<String, usize> = catalog
            .offerings
            .iter()
            .map(|o| (o.id.clone(), 0))
            .collect();
        for slot in slots {
            *room_slots.entry(slot.classroom.clone()).or_insert(0) += 1;
            *weekly.entry(slot.offering.clone()).or_insert(0) += 1;
        }

        let utilization_by_room: BTreeMap<String, f64> = room_slots
            .into_iter()
            .map(|(room, n)| {
                let util = if cells == 0 {
                    0.0
                } else {
                    n as f64 / cells as f64
                };
                (room, util)
            })
            .collect();
        let avg_utilization = if utilization_by_room.is_empty() {
            0.0
        } else {
            utilization_by_room.values().sum::<f64>() / utilization_by_room.len() as f64
        };

        let mut total_shortfall = 0;
        let mut total_surplus = 0;
        let mut unscheduled = Vec::new();
        for offering in &catalog.offerings {
            let count = weekly.get(&offering.id).copied().unwrap_or(0);
            let target = offering.lectures_per_week as usize;
            total_shortfall += target.saturating_sub(count);
            total_surplus += count.saturating_sub(target);
            if count == 0 {
                unscheduled.push(offering.id.clone());
            }
        }

        let violations = audit(slots);

        Self {
            total_slots: slots.len(),
            utilization_by_room,
            avg_utilization,
            weekly_count_by_offering: weekly,
            total_shortfall,
            total_surplus,
            unscheduled,
            lecturer_double_bookings: count_of(&violations, ViolationType::LecturerDoubleBooking),
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_shortfall: usize, min_utilization: f64) -> bool {
        self.total_shortfall <= max_shortfall && self.avg_utilization >= min_utilization
    }
}
