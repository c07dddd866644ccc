//! Crate error type.

use chrono::NaiveTime;
use thiserror::Error;

use crate::models::Weekday;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("batch not found: {0}")]
    UnknownBatch(String),

    #[error("duplicate slot id {0}")]
    DuplicateSlotId(u64),

    #[error("no classrooms available")]
    NoClassrooms,

    #[error("invalid day index {0}: expected 0 (Mon) to 5 (Sat)")]
    InvalidDay(u8),

    #[error("invalid time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("invalid time window {start}-{end}: end must be after start")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("room clash: classroom '{classroom}' is already booked on {day} at {start}")]
    RoomClash {
        day: Weekday,
        start: NaiveTime,
        classroom: String,
    },

    #[error("offering clash: '{offering}' is already scheduled on {day} at {start}")]
    OfferingClash {
        day: Weekday,
        start: NaiveTime,
        offering: String,
    },

    #[error("invalid catalog: {}", summarize(.0))]
    InvalidCatalog(Vec<ValidationError>),

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, TimetableError>;
