//! Generator configuration.
//!
//! Every field has a default matching the college's standard timetable,
//! so an empty YAML document is a valid configuration:
//!
//! ```yaml
//! week:
//!   days: [Mon, Tue, Wed, Thu, Fri]
//!   windows:
//!     - { start: "09:30:00", end: "10:15:00" }
//! day_plan: { start_hour: 9, end_hour: 16, slot_minutes: 60 }
//! clash_key: offering   # or: lecturer
//! seed: 42
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::conflict::ClashKey;
use crate::error::Result;
use crate::models::{HourlyPlan, WeekPlan};

/// Settings for timetable generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableConfig {
    /// Days and windows used by whole-system and per-batch generation.
    pub week: WeekPlan,
    /// Hourly windows used by single-day generation.
    pub day_plan: HourlyPlan,
    /// Teaching clash query key.
    pub clash_key: ClashKey,
    /// Fixed RNG seed; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl TimetableConfig {
    /// Reads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parses YAML text. Empty input yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_clash_key(mut self, key: ClashKey) -> Self {
        self.clash_key = key;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
