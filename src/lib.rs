//! Weekly timetable generation for a college.
//!
//! Assigns course offerings to (day, time window, classroom) slots with a
//! greedy first-fit allocator, avoiding room clashes and teaching clashes.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Classroom`, `Batch`, `Lecturer`,
//!   `CourseOffering`, `Catalog`, `WeekPlan`, `TimetableSlot`
//! - **`store`**: Slot storage with uniqueness constraints and transactions
//! - **`conflict`**: Room and teaching clash queries
//! - **`allocator`**: Per-day greedy slot allocation
//! - **`scheduler`**: Whole-system, per-day, and per-batch regeneration; KPIs
//! - **`audit`**: Clash detection over an existing slot set
//! - **`view`**: Timetable grid and batch status views
//! - **`validation`**: Input integrity checks (duplicate IDs, dangling references)
//! - **`config`**: YAML configuration
//!
//! # Example
//!
//! ```
//! use college_timetable::config::TimetableConfig;
//! use college_timetable::models::{Batch, Catalog, Classroom, CourseOffering};
//! use college_timetable::scheduler::{GenerationScope, TimetableGenerator};
//! use college_timetable::store::SharedStore;
//!
//! let catalog = Catalog::new()
//!     .with_classroom(Classroom::new("LH-1"))
//!     .with_classroom(Classroom::new("LH-2"))
//!     .with_batch(Batch::new("B1", "CS 2024", "BSc CS"))
//!     .with_offering(CourseOffering::new("O1", "Compilers", "L1", "B1"))
//!     .with_offering(CourseOffering::new("O2", "Databases", "L2", "B1"));
//! let config = TimetableConfig::default().with_seed(7);
//!
//! let store = SharedStore::default();
//! let generator = TimetableGenerator::new(&catalog, &config).unwrap();
//! let report = generator.generate_shared(&store, &GenerationScope::All).unwrap();
//! assert_eq!(report.created(), 10);
//! ```

pub mod allocator;
pub mod audit;
pub mod config;
pub mod conflict;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;
pub mod view;

pub use error::{Result, TimetableError};
