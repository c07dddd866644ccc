//! Classroom model.
//!
//! Classrooms are the rooms slots are booked into. They are managed by
//! administrators and rarely change; the name is the unique key.

use serde::{Deserialize, Serialize};

fn default_capacity() -> u32 {
    40
}

/// A bookable classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique room name.
    pub name: String,
    /// Seats available.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

impl Classroom {
    /// Creates a classroom with the default capacity of 40.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: default_capacity(),
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}
