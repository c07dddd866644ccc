//! Timetable generation entry points.
//!
//! # Scopes
//!
//! | Scope | Clears | Windows | Order |
//! |-------|--------|---------|-------|
//! | `All` | every slot | week plan | shuffled, per batch |
//! | `Day(d)` | slots on `d` | hourly plan | catalog order, wrapping |
//! | `Batch(b)` | slots of `b` | week plan | shuffled |
//!
//! Every run is destructive: the scope is cleared, then regenerated.
//! Input problems (empty classroom list, unknown batch, invalid catalog)
//! are reported before anything is cleared.

use std::collections::BTreeMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocator::{DayOutcome, Omission, Placement, SlotAllocator};
use crate::config::TimetableConfig;
use crate::conflict::ConflictChecker;
use crate::error::{Result, TimetableError};
use crate::models::{Catalog, CourseOffering, Weekday};
use crate::store::{SharedStore, SlotScope, SlotStore};
use crate::validation::{validate_catalog, validate_week};

/// What a generation run regenerates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationScope {
    /// Every batch, every day of the week plan.
    All,
    /// One day, all offerings.
    Day(Weekday),
    /// One batch, every day of the week plan.
    Batch(String),
}

impl GenerationScope {
    fn slot_scope(&self) -> SlotScope {
        match self {
            GenerationScope::All => SlotScope::All,
            GenerationScope::Day(day) => SlotScope::Day(*day),
            GenerationScope::Batch(id) => SlotScope::Batch(id.clone()),
        }
    }
}

impl fmt::Display for GenerationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationScope::All => f.write_str("all batches"),
            GenerationScope::Day(day) => write!(f, "day {day}"),
            GenerationScope::Batch(id) => write!(f, "batch {id}"),
        }
    }
}

/// Allocation outcomes for one group of offerings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    /// Batch ID, or `None` for a single-day run across batches.
    pub batch: Option<String>,
    /// Per-day outcomes, in plan order.
    pub days: Vec<DayOutcome>,
}

impl GroupReport {
    /// Slots created across all days.
    pub fn created(&self) -> usize {
        self.days.iter().map(|d| d.created).sum()
    }

    /// Every omission across all days.
    pub fn omitted(&self) -> Vec<&Omission> {
        self.days.iter().flat_map(|d| d.omitted.iter()).collect()
    }
}

/// Summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub scope: GenerationScope,
    /// Slots deleted before regenerating.
    pub cleared: usize,
    pub groups: Vec<GroupReport>,
}

impl GenerationReport {
    fn new(scope: GenerationScope, cleared: usize) -> Self {
        Self {
            scope,
            cleared,
            groups: Vec::new(),
        }
    }

    /// Total slots created.
    pub fn created(&self) -> usize {
        self.groups.iter().map(GroupReport::created).sum()
    }

    /// Total placements omitted.
    pub fn omitted(&self) -> usize {
        self.groups.iter().map(|g| g.omitted().len()).sum()
    }

    /// Slots created per batch (batch-scoped groups only).
    pub fn created_by_batch(&self) -> BTreeMap<String, usize> {
        self.groups
            .iter()
            .filter_map(|g| g.batch.as_ref().map(|b| (b.clone(), g.created())))
            .collect()
    }
}

/// Regenerates timetable slots from a catalog.
///
/// # Example
///
/// ```
/// use college_timetable::config::TimetableConfig;
/// use college_timetable::models::{Batch, Catalog, Classroom, CourseOffering};
/// use college_timetable::scheduler::{GenerationScope, TimetableGenerator};
/// use college_timetable::store::MemoryStore;
/// use rand::SeedableRng;
///
/// let catalog = Catalog::new()
///     .with_classroom(Classroom::new("LH-1"))
///     .with_batch(Batch::new("B1", "CS 2024", "BSc CS"))
///     .with_offering(CourseOffering::new("O1", "Compilers", "L1", "B1"));
/// let config = TimetableConfig::default();
/// let generator = TimetableGenerator::new(&catalog, &config).unwrap();
///
/// let mut store = MemoryStore::new();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let report = generator
///     .generate(&mut store, &GenerationScope::All, &mut rng)
///     .unwrap();
/// assert_eq!(report.created(), 5); // once per weekday
/// ```
#[derive(Debug, Clone)]
pub struct TimetableGenerator<'a> {
    catalog: &'a Catalog,
    config: &'a TimetableConfig,
}

impl<'a> TimetableGenerator<'a> {
    /// Creates a generator after validating the catalog and week plan.
    pub fn new(catalog: &'a Catalog, config: &'a TimetableConfig) -> Result<Self> {
        let mut errors = Vec::new();
        if let Err(e) = validate_catalog(catalog) {
            errors.extend(e);
        }
        if let Err(e) = validate_week(&config.week) {
            errors.extend(e);
        }
        if !errors.is_empty() {
            return Err(TimetableError::InvalidCatalog(errors));
        }
        Ok(Self { catalog, config })
    }

    /// Runs one generation scope against `store`.
    pub fn generate<S, R>(
        &self,
        store: &mut S,
        scope: &GenerationScope,
        rng: &mut R,
    ) -> Result<GenerationReport>
    where
        S: SlotStore + ?Sized,
        R: Rng + ?Sized,
    {
        match scope {
            GenerationScope::All => self.regenerate_all(store, rng),
            GenerationScope::Day(day) => self.regenerate_day(store, *day),
            GenerationScope::Batch(id) => self.regenerate_batch(store, id, rng),
        }
    }

    /// Runs `scope` as one transaction on a shared store, with an RNG
    /// seeded from the configuration.
    pub fn generate_shared(
        &self,
        store: &SharedStore,
        scope: &GenerationScope,
    ) -> Result<GenerationReport> {
        let mut rng = self.rng();
        store.transaction(|staged| self.generate(staged, scope, &mut rng))
    }

    /// Clears every slot and regenerates each batch across the week.
    pub fn regenerate_all<S, R>(&self, store: &mut S, rng: &mut R) -> Result<GenerationReport>
    where
        S: SlotStore + ?Sized,
        R: Rng + ?Sized,
    {
        self.require_classrooms()?;
        let scope = GenerationScope::All;
        let cleared = store.clear(&scope.slot_scope())?;
        let mut report = GenerationReport::new(scope, cleared);

        let allocator = self.week_allocator();
        for (batch_id, offerings) in self.catalog.offerings_by_batch() {
            let days = allocator.allocate_days(store, &self.config.week.days, &offerings, rng)?;
            let group = GroupReport {
                batch: Some(batch_id.to_string()),
                days,
            };
            info!(
                batch = batch_id,
                created = group.created(),
                omitted = group.omitted().len(),
                "batch timetable generated"
            );
            report.groups.push(group);
        }

        info!(
            cleared = report.cleared,
            created = report.created(),
            batches = report.groups.len(),
            "timetable regenerated"
        );
        Ok(report)
    }

    /// Clears one day and regenerates it from hourly windows.
    ///
    /// Offerings are taken in catalog order; offering `i` gets hourly
    /// window `i mod windows` and classroom `i mod rooms`. With no
    /// offerings or no classrooms the day is left untouched.
    pub fn regenerate_day<S>(&self, store: &mut S, day: Weekday) -> Result<GenerationReport>
    where
        S: SlotStore + ?Sized,
    {
        let scope = GenerationScope::Day(day);
        if self.catalog.offerings.is_empty() || self.catalog.classrooms.is_empty() {
            info!(%day, "no offerings or classrooms; day left unchanged");
            return Ok(GenerationReport::new(scope, 0));
        }
        let windows = self.config.day_plan.windows()?;

        let cleared = store.clear(&scope.slot_scope())?;
        let mut report = GenerationReport::new(scope, cleared);

        let offerings: Vec<&CourseOffering> = self.catalog.offerings.iter().collect();
        let allocator = SlotAllocator::new(&self.catalog.classrooms, &windows)
            .with_checker(self.checker())
            .with_placement(Placement::Sequential);
        // Sequential placement never draws from the RNG.
        let mut rng = StdRng::seed_from_u64(0);
        let outcome = allocator.allocate_day(store, day, &offerings, &mut rng)?;

        info!(
            %day,
            cleared,
            created = outcome.created,
            omitted = outcome.omitted.len(),
            "day timetable regenerated"
        );
        report.groups.push(GroupReport {
            batch: None,
            days: vec![outcome],
        });
        Ok(report)
    }

    /// Clears one batch's slots and regenerates them across the week.
    pub fn regenerate_batch<S, R>(
        &self,
        store: &mut S,
        batch_id: &str,
        rng: &mut R,
    ) -> Result<GenerationReport>
    where
        S: SlotStore + ?Sized,
        R: Rng + ?Sized,
    {
        let batch = self
            .catalog
            .batch(batch_id)
            .ok_or_else(|| TimetableError::UnknownBatch(batch_id.to_string()))?;
        self.require_classrooms()?;

        let scope = GenerationScope::Batch(batch.id.clone());
        let cleared = store.clear(&scope.slot_scope())?;
        let mut report = GenerationReport::new(scope, cleared);

        let offerings = self.catalog.offerings_for_batch(&batch.id);
        let days = self
            .week_allocator()
            .allocate_days(store, &self.config.week.days, &offerings, rng)?;
        let group = GroupReport {
            batch: Some(batch.id.clone()),
            days,
        };
        info!(
            batch = %batch.id,
            title = %batch.title,
            cleared,
            created = group.created(),
            omitted = group.omitted().len(),
            "batch timetable regenerated"
        );
        report.groups.push(group);
        Ok(report)
    }

    /// RNG for this run: seeded from the config when a seed is set.
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    fn checker(&self) -> ConflictChecker {
        ConflictChecker::new(self.config.clash_key)
    }

    fn week_allocator(&self) -> SlotAllocator<'_> {
        SlotAllocator::new(&self.catalog.classrooms, &self.config.week.windows)
            .with_checker(self.checker())
    }

    fn require_classrooms(&self) -> Result<()> {
        if self.catalog.classrooms.is_empty() {
            return Err(TimetableError::NoClassrooms);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::OmissionReason;
    use crate::audit::{audit, count_of, ViolationType};
    use crate::conflict::ClashKey;
    use crate::models::{Batch, Classroom, CourseOffering};
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    fn catalog(batches: usize, per_batch: usize, rooms: usize) -> Catalog {
        let mut c = Catalog::new();
        for r in 1..=rooms {
            c = c.with_classroom(Classroom::new(format!("R{r}")));
        }
        for b in 1..=batches {
            c = c.with_batch(Batch::new(format!("B{b}"), format!("Batch {b}"), "BSc"));
            for o in 1..=per_batch {
                c = c.with_offering(CourseOffering::new(
                    format!("B{b}-O{o}"),
                    format!("Course {o}"),
                    format!("L{b}-{o}"),
                    format!("B{b}"),
                ));
            }
        }
        c
    }

    fn assert_no_room_clash(slots: &[crate::models::TimetableSlot]) {
        let mut seen = HashSet::new();
        for s in slots {
            assert!(
                seen.insert((s.day, s.window.start, s.classroom.clone())),
                "room clash on {s}"
            );
        }
    }

    #[test]
    fn test_regenerate_all_no_room_clash() {
        let c = catalog(3, 6, 4);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(17);

        let report = generator.regenerate_all(&mut store, &mut rng).unwrap();

        assert_eq!(report.groups.len(), 3);
        assert_eq!(report.created(), store.len());
        assert_no_room_clash(&store.slots());
        assert_eq!(count_of(&audit(&store.slots()), ViolationType::RoomClash), 0);
    }

    #[test]
    fn test_created_plus_omitted_equals_considered() {
        // 12 offerings per batch, 8 windows, 2 rooms: heavy contention.
        let c = catalog(3, 12, 2);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(23);

        let report = generator.regenerate_all(&mut store, &mut rng).unwrap();

        for group in &report.groups {
            for day in &group.days {
                assert_eq!(day.considered(), 12);
            }
        }
        assert!(report.omitted() > 0);
        assert_eq!(report.created(), store.len());
        assert_no_room_clash(&store.slots());
    }

    #[test]
    fn test_rerun_is_valid_and_replaces() {
        let c = catalog(2, 5, 3);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();

        let first = generator
            .regenerate_all(&mut store, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let second = generator
            .regenerate_all(&mut store, &mut StdRng::seed_from_u64(2))
            .unwrap();

        assert_eq!(second.cleared, first.created());
        assert_eq!(store.len(), second.created());
        assert_no_room_clash(&store.slots());
    }

    #[test]
    fn test_same_seed_same_timetable() {
        let c = catalog(2, 7, 3);
        let cfg = TimetableConfig::default().with_seed(99);
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();

        let run = || {
            let mut store = MemoryStore::new();
            generator
                .regenerate_all(&mut store, &mut generator.rng())
                .unwrap();
            store.slots()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_no_classrooms_leaves_store_untouched() {
        let c = catalog(1, 2, 0);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();

        let seeded = catalog(1, 2, 1);
        let seeded_gen = TimetableGenerator::new(&seeded, &cfg).unwrap();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(0);
        seeded_gen.regenerate_all(&mut store, &mut rng).unwrap();
        let before = store.len();

        assert!(matches!(
            generator.regenerate_all(&mut store, &mut rng),
            Err(TimetableError::NoClassrooms)
        ));
        assert!(matches!(
            generator.regenerate_batch(&mut store, "B1", &mut rng),
            Err(TimetableError::NoClassrooms)
        ));
        assert_eq!(store.len(), before);

        let report = generator.regenerate_day(&mut store, Weekday::Mon).unwrap();
        assert_eq!(report.cleared, 0);
        assert_eq!(report.created(), 0);
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_regenerate_batch_only_touches_batch() {
        // B1 holds window positions 0-1 each day; B2's extra offerings
        // land in positions 2-4.
        let mut c = catalog(2, 2, 4);
        for o in 3..=5 {
            c.offerings.push(CourseOffering::new(
                format!("B2-O{o}"),
                "Extra",
                format!("L2-{o}"),
                "B2",
            ));
        }
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(5);
        generator.regenerate_all(&mut store, &mut rng).unwrap();

        let b2_before: Vec<_> = store
            .slots()
            .into_iter()
            .filter(|s| s.batch == "B2")
            .collect();
        let b1_before = store.count(&SlotScope::Batch("B1".into()));

        let report = generator
            .regenerate_batch(&mut store, "B1", &mut rng)
            .unwrap();

        assert_eq!(b1_before, 10);
        assert_eq!(b2_before.len(), 15);
        assert_eq!(report.cleared, b1_before);
        assert_eq!(report.created_by_batch()["B1"], 10);
        let b2_after: Vec<_> = store
            .slots()
            .into_iter()
            .filter(|s| s.batch == "B2")
            .collect();
        assert_eq!(b2_before, b2_after);
        assert_no_room_clash(&store.slots());
    }

    #[test]
    fn test_regenerate_batch_unknown() {
        let c = catalog(1, 1, 1);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();
        let result = generator.regenerate_batch(&mut store, "nope", &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(TimetableError::UnknownBatch(id)) if id == "nope"));
    }

    #[test]
    fn test_regenerate_day_hourly_sequential() {
        let c = catalog(2, 3, 2);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();

        let report = generator.regenerate_day(&mut store, Weekday::Sat).unwrap();

        // 6 offerings, 7 hourly windows: all placed in catalog order.
        assert_eq!(report.created(), 6);
        let slots = store.slots();
        assert!(slots.iter().all(|s| s.day == Weekday::Sat));
        assert_eq!(slots[0].offering, "B1-O1");
        assert_eq!(slots[0].window.start.format("%H:%M").to_string(), "09:00");
        assert_eq!(slots[0].classroom, "R1");
        assert_eq!(slots[1].classroom, "R2");
        assert!(report.created_by_batch().is_empty());
    }

    #[test]
    fn test_regenerate_day_only_clears_that_day() {
        let c = catalog(1, 3, 3);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();
        generator
            .regenerate_all(&mut store, &mut StdRng::seed_from_u64(8))
            .unwrap();
        let tuesday = store.count(&SlotScope::Day(Weekday::Tue));

        let report = generator.regenerate_day(&mut store, Weekday::Mon).unwrap();

        assert_eq!(report.cleared, 3);
        assert_eq!(store.count(&SlotScope::Day(Weekday::Tue)), tuesday);
        assert_eq!(store.count(&SlotScope::Day(Weekday::Mon)), 3);
    }

    #[test]
    fn test_regenerate_day_wraps_and_omits() {
        // 9 offerings, 7 hourly windows, 1 room: the two wrapped offerings
        // collide with the first two placements.
        let c = catalog(1, 9, 1);
        let cfg = TimetableConfig::default();
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let mut store = MemoryStore::new();

        let report = generator.regenerate_day(&mut store, Weekday::Mon).unwrap();
        assert_eq!(report.created(), 7);
        assert_eq!(report.omitted(), 2);
        let omitted = report.groups[0].omitted();
        assert!(omitted
            .iter()
            .all(|o| matches!(o.reason, OmissionReason::Clash(_))));
    }

    #[test]
    fn test_regenerate_day_without_offerings_is_noop() {
        let mut c = catalog(1, 2, 2);
        let cfg = TimetableConfig::default();
        let mut store = MemoryStore::new();
        TimetableGenerator::new(&c, &cfg)
            .unwrap()
            .regenerate_day(&mut store, Weekday::Mon)
            .unwrap();

        c.offerings.clear();
        let report = TimetableGenerator::new(&c, &cfg)
            .unwrap()
            .regenerate_day(&mut store, Weekday::Mon)
            .unwrap();
        assert_eq!(report.cleared, 0);
        assert_eq!(report.created(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_lecturer_double_booking_depends_on_clash_key() {
        // 8 offerings, 7 hourly windows, 2 rooms: offering 8 wraps to the
        // first window in the second room. Give it offering 1's lecturer.
        let mut c = catalog(1, 8, 2);
        c.offerings[7].lecturer = c.offerings[0].lecturer.clone();

        let offering_cfg = TimetableConfig::default();
        let mut store = MemoryStore::new();
        let report = TimetableGenerator::new(&c, &offering_cfg)
            .unwrap()
            .regenerate_day(&mut store, Weekday::Mon)
            .unwrap();
        assert_eq!(report.created(), 8);
        assert_eq!(
            count_of(&audit(&store.slots()), ViolationType::LecturerDoubleBooking),
            1
        );

        let lecturer_cfg = TimetableConfig::default().with_clash_key(ClashKey::Lecturer);
        let mut store = MemoryStore::new();
        let report = TimetableGenerator::new(&c, &lecturer_cfg)
            .unwrap()
            .regenerate_day(&mut store, Weekday::Mon)
            .unwrap();
        assert_eq!(report.created(), 7);
        assert_eq!(
            report.groups[0].omitted()[0].reason,
            OmissionReason::Clash(crate::conflict::Conflict::Lecturer)
        );
        assert!(audit(&store.slots()).is_empty());
    }

    #[test]
    fn test_invalid_catalog_rejected() {
        let c = catalog(1, 1, 1).with_offering(CourseOffering::new("X", "Y", "L", "B404"));
        let cfg = TimetableConfig::default();
        assert!(matches!(
            TimetableGenerator::new(&c, &cfg),
            Err(TimetableError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_repeated_week_day_rejected() {
        let c = catalog(1, 1, 1);
        let mut cfg = TimetableConfig::default();
        cfg.week.days = vec![Weekday::Mon, Weekday::Mon];
        assert!(matches!(
            TimetableGenerator::new(&c, &cfg),
            Err(TimetableError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_generate_shared_commits() {
        let c = catalog(2, 3, 2);
        let cfg = TimetableConfig::default().with_seed(4);
        let generator = TimetableGenerator::new(&c, &cfg).unwrap();
        let shared = SharedStore::default();

        let report = generator
            .generate_shared(&shared, &GenerationScope::All)
            .unwrap();
        assert_eq!(shared.snapshot().unwrap().len(), report.created());

        let err = generator.generate_shared(&shared, &GenerationScope::Batch("B9".into()));
        assert!(err.is_err());
        assert_eq!(shared.snapshot().unwrap().len(), report.created());
    }

    #[test]
    fn test_concurrent_regenerations_never_clash() {
        let c = catalog(3, 6, 3);
        let cfg = TimetableConfig::default();
        let shared = SharedStore::default();

        std::thread::scope(|s| {
            for i in 0..4 {
                let shared = shared.clone();
                let c = &c;
                let cfg = &cfg;
                s.spawn(move || {
                    let generator = TimetableGenerator::new(c, cfg).unwrap();
                    let scope = if i % 2 == 0 {
                        GenerationScope::All
                    } else {
                        GenerationScope::Batch(format!("B{}", i % 3 + 1))
                    };
                    generator.generate_shared(&shared, &scope).unwrap();
                });
            }
        });

        assert_no_room_clash(&shared.snapshot().unwrap());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(GenerationScope::All.to_string(), "all batches");
        assert_eq!(GenerationScope::Day(Weekday::Fri).to_string(), "day Fri");
        assert_eq!(GenerationScope::Batch("B1".into()).to_string(), "batch B1");
    }
}
