//! Timetable generation and KPI evaluation.
//!
//! # Algorithm
//!
//! `TimetableGenerator` clears a scope (everything, one day, or one
//! batch) and refills it with [`crate::allocator::SlotAllocator`], a
//! greedy first-fit heuristic with random shuffling. It is not optimal
//! and does not backtrack; offerings that cannot be placed are reported
//! as omissions.
//!
//! # KPI
//!
//! `TimetableKpi` computes room utilization, weekly coverage against
//! each offering's lecture target, and lecturer double bookings.

mod generator;
mod kpi;

pub use generator::{GenerationReport, GenerationScope, GroupReport, TimetableGenerator};
pub use kpi::TimetableKpi;
