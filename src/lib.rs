//! Resource planning for task tables.
//!
//! Assigns developers or testers to the rows of a planning table and stamps
//! each assignment with a working-day date span. Assignment is greedy:
//! heaviest tasks first, first eligible resource in catalog order, subject to
//! a per-resource task ceiling and a no-overlap rule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TaskTable`, `Cell`, `ColumnMap`,
//!   `Resource`, `ResourcePool`, `WorkingCalendar`, `Span`
//! - **`scheduler`**: `AssignmentEngine` plus run summaries and per-resource load
//! - **`validation`**: Catalog and column checks, post-run audit
//! - **`config`**: TOML plan files and CLI arguments
//! - **`records`**: JSON record I/O for task tables
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_resplan::models::{Cell, ColumnMap, HolidaySet, Resource, ResourcePool, TaskTable, WorkingCalendar};
//! use u_resplan::scheduler::AssignmentEngine;
//!
//! let columns = ColumnMap::new("dev", "hours", "available", "plan", "start", "end");
//! let pool = ResourcePool::flat(vec![Resource::new("Alice")]);
//! let engine = AssignmentEngine::new(columns, pool, WorkingCalendar::new(HolidaySet::new()));
//!
//! let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let table = TaskTable::new(["hours", "available"])
//!     .with_row([Cell::Number(16.0), Cell::Date(monday)]);
//!
//! let outcome = engine.assign(&table).unwrap();
//! assert_eq!(outcome.summary().newly_assigned, 1);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", ch. 9
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

pub mod config;
pub mod error;
pub mod models;
pub mod records;
pub mod scheduler;
pub mod validation;

pub use error::PlanError;
