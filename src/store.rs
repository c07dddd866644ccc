//! Slot persistence.
//!
//! [`SlotStore`] is the seam between the generator and storage: the
//! existence queries the conflict checker runs, inserts, and scoped
//! deletes. [`MemoryStore`] implements it with hash indexes that enforce
//! the two slot uniqueness constraints:
//!
//! - (day, start, classroom): room clash
//! - (day, start, offering): offering clash
//!
//! Lecturer bookings are indexed for queries but are not unique.
//!
//! [`SharedStore`] wraps a `MemoryStore` behind a mutex and runs each
//! regeneration as a transaction on a staged copy, so a clear and its
//! recreate are committed together or not at all.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::NaiveTime;
use tracing::debug;

use crate::error::{Result, TimetableError};
use crate::models::{NewSlot, SlotId, TimetableSlot, Weekday};

/// Which slots a delete or count applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotScope {
    /// Every slot.
    All,
    /// Slots on one day, across all batches.
    Day(Weekday),
    /// Slots of one batch, across all days.
    Batch(String),
}

impl SlotScope {
    /// Whether a slot falls in this scope.
    pub fn contains(&self, slot: &TimetableSlot) -> bool {
        match self {
            SlotScope::All => true,
            SlotScope::Day(day) => slot.day == *day,
            SlotScope::Batch(batch) => slot.batch == *batch,
        }
    }
}

/// Storage for timetable slots.
pub trait SlotStore {
    /// Whether `classroom` is booked at (`day`, `start`).
    fn room_booked(&self, day: Weekday, start: NaiveTime, classroom: &str) -> bool;

    /// Whether `offering` is booked at (`day`, `start`).
    fn offering_booked(&self, day: Weekday, start: NaiveTime, offering: &str) -> bool;

    /// Whether any offering taught by `lecturer` is booked at (`day`, `start`).
    fn lecturer_booked(&self, day: Weekday, start: NaiveTime, lecturer: &str) -> bool;

    /// Inserts a slot, enforcing the uniqueness constraints.
    fn insert(&mut self, slot: NewSlot) -> Result<SlotId>;

    /// Deletes every slot in `scope`, returning how many were removed.
    fn clear(&mut self, scope: &SlotScope) -> Result<usize>;

    /// All slots, ordered by day then start time then classroom.
    fn slots(&self) -> Vec<TimetableSlot>;

    /// Number of slots in `scope`.
    fn count(&self, scope: &SlotScope) -> usize {
        self.slots().iter().filter(|s| scope.contains(s)).count()
    }
}

type Key = (Weekday, NaiveTime, String);

/// In-memory slot store with uniqueness indexes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: BTreeMap<SlotId, TimetableSlot>,
    next_id: SlotId,
    rooms: HashSet<Key>,
    offerings: HashSet<Key>,
    lecturers: HashMap<Key, usize>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Rebuilds a store from previously saved slots.
    ///
    /// Slot IDs are preserved. Saved data that violates a uniqueness
    /// constraint is rejected.
    pub fn from_slots(slots: Vec<TimetableSlot>) -> Result<Self> {
        let mut store = Self::new();
        for slot in slots {
            if store.slots.contains_key(&slot.id) {
                return Err(TimetableError::DuplicateSlotId(slot.id));
            }
            store.check_unique(slot.day, slot.window.start, &slot.classroom, &slot.offering)?;
            store.next_id = store.next_id.max(slot.id + 1);
            store.index(slot);
        }
        Ok(store)
    }

    /// Loads slots saved with [`MemoryStore::save`]. A missing file yields
    /// an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(path)?;
        let slots: Vec<TimetableSlot> = serde_json::from_str(&text)?;
        Self::from_slots(slots)
    }

    /// Writes all slots as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.slots())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Number of stored slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn check_unique(
        &self,
        day: Weekday,
        start: NaiveTime,
        classroom: &str,
        offering: &str,
    ) -> Result<()> {
        if self.room_booked(day, start, classroom) {
            return Err(TimetableError::RoomClash {
                day,
                start,
                classroom: classroom.to_string(),
            });
        }
        if self.offering_booked(day, start, offering) {
            return Err(TimetableError::OfferingClash {
                day,
                start,
                offering: offering.to_string(),
            });
        }
        Ok(())
    }

    fn index(&mut self, slot: TimetableSlot) {
        let (day, start) = (slot.day, slot.window.start);
        self.rooms.insert((day, start, slot.classroom.clone()));
        self.offerings.insert((day, start, slot.offering.clone()));
        *self
            .lecturers
            .entry((day, start, slot.lecturer.clone()))
            .or_insert(0) += 1;
        self.slots.insert(slot.id, slot);
    }

    fn unindex(&mut self, slot: &TimetableSlot) {
        let (day, start) = (slot.day, slot.window.start);
        self.rooms.remove(&(day, start, slot.classroom.clone()));
        self.offerings.remove(&(day, start, slot.offering.clone()));
        let key = (day, start, slot.lecturer.clone());
        if let Some(n) = self.lecturers.get_mut(&key) {
            *n -= 1;
            if *n == 0 {
                self.lecturers.remove(&key);
            }
        }
    }
}

impl SlotStore for MemoryStore {
    fn room_booked(&self, day: Weekday, start: NaiveTime, classroom: &str) -> bool {
        self.rooms.contains(&(day, start, classroom.to_string()))
    }

    fn offering_booked(&self, day: Weekday, start: NaiveTime, offering: &str) -> bool {
        self.offerings.contains(&(day, start, offering.to_string()))
    }

    fn lecturer_booked(&self, day: Weekday, start: NaiveTime, lecturer: &str) -> bool {
        self.lecturers
            .contains_key(&(day, start, lecturer.to_string()))
    }

    fn insert(&mut self, slot: NewSlot) -> Result<SlotId> {
        self.check_unique(slot.day, slot.window.start, &slot.classroom, &slot.offering)?;
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.index(slot.with_id(id));
        Ok(id)
    }

    fn clear(&mut self, scope: &SlotScope) -> Result<usize> {
        let doomed: Vec<TimetableSlot> = self
            .slots
            .values()
            .filter(|s| scope.contains(s))
            .cloned()
            .collect();
        for slot in &doomed {
            self.unindex(slot);
            self.slots.remove(&slot.id);
        }
        Ok(doomed.len())
    }

    fn slots(&self) -> Vec<TimetableSlot> {
        let mut all: Vec<TimetableSlot> = self.slots.values().cloned().collect();
        all.sort_by(|a, b| {
            (a.day, a.window.start, &a.classroom).cmp(&(b.day, b.window.start, &b.classroom))
        });
        all
    }

    fn count(&self, scope: &SlotScope) -> usize {
        self.slots.values().filter(|s| scope.contains(s)).count()
    }
}

/// A mutex-guarded [`MemoryStore`] shared between callers.
///
/// All writes go through [`SharedStore::transaction`].
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    /// Wraps an existing store.
    pub fn new(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` against a staged copy of the store while holding the lock.
    ///
    /// On `Ok` the staged copy replaces the store; on `Err` it is dropped
    /// and the store is left unchanged.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut MemoryStore) -> Result<T>) -> Result<T> {
        let mut guard = self.inner.lock().map_err(|_| TimetableError::LockPoisoned)?;
        let mut staged = guard.clone();
        match f(&mut staged) {
            Ok(value) => {
                *guard = staged;
                debug!(slots = guard.len(), "transaction committed");
                Ok(value)
            }
            Err(e) => {
                debug!(error = %e, "transaction rolled back");
                Err(e)
            }
        }
    }

    /// Copy of all slots at this moment.
    pub fn snapshot(&self) -> Result<Vec<TimetableSlot>> {
        let guard = self.inner.lock().map_err(|_| TimetableError::LockPoisoned)?;
        Ok(guard.slots())
    }

    /// Consumes the handle and returns a copy of the underlying store.
    pub fn into_store(self) -> Result<MemoryStore> {
        let guard = self.inner.lock().map_err(|_| TimetableError::LockPoisoned)?;
        Ok(guard.clone())
    }
}
