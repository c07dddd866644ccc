//! Input catalog: everything the generator reads.
//!
//! The catalog is plain data (classrooms, batches, lecturers, offerings)
//! loaded from YAML or JSON. Structural checks live in
//! [`crate::validation`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Batch, Classroom, CourseOffering, Lecturer};
use crate::error::Result;

/// The timetable input data set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub lecturers: Vec<Lecturer>,
    #[serde(default)]
    pub offerings: Vec<CourseOffering>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classroom(mut self, classroom: Classroom) -> Self {
        self.classrooms.push(classroom);
        self
    }

    pub fn with_batch(mut self, batch: Batch) -> Self {
        self.batches.push(batch);
        self
    }

    pub fn with_lecturer(mut self, lecturer: Lecturer) -> Self {
        self.lecturers.push(lecturer);
        self
    }

    pub fn with_offering(mut self, offering: CourseOffering) -> Self {
        self.offerings.push(offering);
        self
    }

    /// Loads a catalog, choosing JSON for `.json` files and YAML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&text)?)
        } else {
            Ok(serde_yaml::from_str(&text)?)
        }
    }

    pub fn batch(&self, id: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.id == id)
    }

    pub fn lecturer(&self, id: &str) -> Option<&Lecturer> {
        self.lecturers.iter().find(|l| l.id == id)
    }

    pub fn offering(&self, id: &str) -> Option<&CourseOffering> {
        self.offerings.iter().find(|o| o.id == id)
    }

    /// Offerings taught to one batch, in catalog order.
    pub fn offerings_for_batch(&self, batch_id: &str) -> Vec<&CourseOffering> {
        self.offerings
            .iter()
            .filter(|o| o.batch == batch_id)
            .collect()
    }

    /// Offerings grouped by batch ID.
    ///
    /// Groups appear in the order their first offering appears in the
    /// catalog; offerings keep catalog order within a group.
    pub fn offerings_by_batch(&self) -> Vec<(&str, Vec<&CourseOffering>)> {
        let mut groups: Vec<(&str, Vec<&CourseOffering>)> = Vec::new();
        for offering in &self.offerings {
            match groups.iter_mut().find(|(id, _)| *id == offering.batch) {
                Some((_, members)) => members.push(offering),
                None => groups.push((offering.batch.as_str(), vec![offering])),
            }
        }
        groups
    }

    /// Display name of a lecturer, falling back to the raw ID.
    pub fn lecturer_name(&self, id: &str) -> String {
        self.lecturer(id)
            .map(Lecturer::display_name)
            .unwrap_or_else(|| id.to_string())
    }
}
