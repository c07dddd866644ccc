//! Weekdays, teaching windows, and week plans.
//!
//! A [`WeekPlan`] fixes the grid the allocator fills: the teaching days and
//! the ordered list of daily [`TimeWindow`]s. The allocator hands out
//! windows by position, so breaks (tea, lunch) are gaps between
//! consecutive windows.

use std::fmt;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// Teaching day, Monday (0) through Saturday (5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All days a slot may fall on.
    pub const ALL: [Weekday; 6] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Monday to Friday.
    pub const WORKWEEK: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Converts a day index (0 = Mon) to a weekday.
    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(TimetableError::InvalidDay(index))
    }

    /// Day index (0 = Mon).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Three-letter display name.
    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A teaching window [start, end) within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a window, rejecting empty or inverted intervals.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        if end <= start {
            return Err(TimetableError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a window from hour/minute pairs.
    ///
    /// Returns an error if either time is out of range or the window is empty.
    pub fn hm(start: (u32, u32), end: (u32, u32)) -> Result<Self> {
        let start_t = hm(start.0, start.1)?;
        let end_t = hm(end.0, end.1)?;
        Self::new(start_t, end_t)
    }

    /// Length of the window in minutes.
    #[inline]
    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether the window is well formed (end after start).
    ///
    /// Windows built through [`TimeWindow::new`] always are; deserialized
    /// ones are checked by catalog validation.
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

fn hm(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(TimetableError::InvalidTime { hour, minute })
}

/// Teaching days and the ordered daily windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    /// Days the allocator fills, in order.
    pub days: Vec<Weekday>,
    /// Daily windows, in allocation order.
    pub windows: Vec<TimeWindow>,
}

impl WeekPlan {
    /// Creates a plan from explicit days and windows.
    pub fn new(days: Vec<Weekday>, windows: Vec<TimeWindow>) -> Self {
        Self { days, windows }
    }

    /// The college's standard week: Monday to Friday, eight windows with a tea
    /// break after the second and a lunch break after the fourth.
    pub fn standard() -> Self {
        let windows = [
            ((9, 30), (10, 15)),
            ((10, 15), (11, 0)),
            ((11, 15), (12, 0)),
            ((12, 0), (12, 45)),
            ((13, 30), (14, 15)),
            ((14, 15), (15, 0)),
            ((15, 0), (15, 45)),
            ((15, 45), (16, 15)),
        ]
        .into_iter()
        .filter_map(|(s, e)| TimeWindow::hm(s, e).ok())
        .collect();

        Self::new(Weekday::WORKWEEK.to_vec(), windows)
    }

    /// Number of (day, window) cells per room.
    pub fn cells_per_room(&self) -> usize {
        self.days.len() * self.windows.len()
    }
}

impl Default for WeekPlan {
    fn default() -> Self {
        Self::standard()
    }
}

/// Back-to-back hourly windows used by single-day regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyPlan {
    /// First window starts at this hour.
    pub start_hour: u32,
    /// No window starts at or after this hour.
    pub end_hour: u32,
    /// Length of each window.
    pub slot_minutes: u32,
}

impl HourlyPlan {
    /// Builds one window per hour in `[start_hour, end_hour)`, each
    /// `slot_minutes` long.
    ///
    /// Windows that would run past midnight are rejected.
    pub fn windows(&self) -> Result<Vec<TimeWindow>> {
        (self.start_hour..self.end_hour)
            .map(|hour| {
                let start = hm(hour, 0)?;
                let (end, wrapped) =
                    start.overflowing_add_signed(Duration::minutes(i64::from(self.slot_minutes)));
                if wrapped != 0 {
                    return Err(TimetableError::InvalidWindow { start, end });
                }
                TimeWindow::new(start, end)
            })
            .collect()
    }
}

impl Default for HourlyPlan {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 16,
            slot_minutes: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_weekday_index_roundtrip() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_index(day.index()).unwrap(), day);
        }
        assert!(matches!(
            Weekday::from_index(6),
            Err(TimetableError::InvalidDay(6))
        ));
    }

    #[test]
    fn test_window_rejects_inverted() {
        assert!(TimeWindow::new(t(10, 0), t(9, 0)).is_err());
        assert!(TimeWindow::new(t(10, 0), t(10, 0)).is_err());
        let w = TimeWindow::hm((9, 30), (10, 15)).unwrap();
        assert_eq!(w.minutes(), 45);
        assert_eq!(w.to_string(), "09:30-10:15");
    }

    #[test]
    fn test_window_overlap() {
        let a = TimeWindow::hm((9, 0), (10, 0)).unwrap();
        let b = TimeWindow::hm((9, 30), (10, 30)).unwrap();
        let c = TimeWindow::hm((10, 0), (11, 0)).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // half-open
    }

    #[test]
    fn test_standard_week() {
        let plan = WeekPlan::standard();
        assert_eq!(plan.days.len(), 5);
        assert_eq!(plan.windows.len(), 8);
        assert_eq!(plan.cells_per_room(), 40);
        assert_eq!(plan.windows[0].start, t(9, 30));
        assert_eq!(plan.windows[2].start, t(11, 15)); // after tea break
        assert_eq!(plan.windows[4].start, t(13, 30)); // after lunch
        assert_eq!(plan.windows[7].end, t(16, 15));
        assert!(plan.windows.iter().all(TimeWindow::is_valid));
        assert!(plan.windows.windows(2).all(|w| !w[0].overlaps(&w[1])));
    }

    #[test]
    fn test_hourly_plan_default() {
        let windows = HourlyPlan::default().windows().unwrap();
        assert_eq!(windows.len(), 7);
        assert_eq!(windows[0].start, t(9, 0));
        assert_eq!(windows[0].end, t(10, 0));
        assert_eq!(windows[6].start, t(15, 0));
    }

    #[test]
    fn test_hourly_plan_past_midnight() {
        let plan = HourlyPlan {
            start_hour: 23,
            end_hour: 24,
            slot_minutes: 90,
        };
        assert!(plan.windows().is_err());
    }

    #[test]
    fn test_hourly_plan_empty_range() {
        let plan = HourlyPlan {
            start_hour: 16,
            end_hour: 9,
            slot_minutes: 60,
        };
        assert!(plan.windows().unwrap().is_empty());
    }
}
