//! Greedy assignment engine and run metrics.
//!
//! # Algorithm
//!
//! `AssignmentEngine` makes a single sequential pass: heaviest unassigned
//! task first, first eligible resource in pool order, no backtracking.
//! It is not optimal, but it is deterministic and never exceeds a resource's
//! task ceiling or double-books a working day.
//!
//! # Metrics
//!
//! `RunSummary` counts rows per terminal state; `ResourceLoad` reports task
//! count, effort and utilization per resource.

mod engine;
mod summary;

pub use engine::{AssignmentEngine, AssignmentOutcome, SkipReason, TaskState};
pub use summary::{ResourceLoad, RunSummary};
