//! Run counts and per-resource load.
//!
//! The caller reports these instead of per-task diagnostics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Newly assigned | Rows given a resource by the pass |
//! | Already assigned | Rows whose input resource was preserved |
//! | Left unassigned | Rows with data but no eligible resource |
//! | Skipped | Rows missing a base date or positive hours |
//! | Task count | Rows holding a resource |
//! | Hours sum / mean | Effort over those rows |
//! | Utilization | Task count / `max_tasks` |

use chrono::NaiveDate;
use serde::Serialize;

use super::TaskState;
use crate::models::{ColumnMap, ResourcePool, TaskTable};

/// Counts per terminal task state for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Rows in the table.
    pub total: usize,
    /// Rows assigned by this pass.
    pub newly_assigned: usize,
    /// Rows assigned on input.
    pub already_assigned: usize,
    /// Already-assigned rows whose dates were filled in.
    pub backfilled: usize,
    /// Rows no resource could take.
    pub left_unassigned: usize,
    /// Rows excluded for missing data.
    pub skipped: usize,
}

impl RunSummary {
    /// Tallies per-row states.
    pub fn from_states(states: &[TaskState]) -> Self {
        let mut summary = Self {
            total: states.len(),
            ..Self::default()
        };
        for state in states {
            match state {
                TaskState::NewlyAssigned => summary.newly_assigned += 1,
                TaskState::AlreadyAssigned { backfilled } => {
                    summary.already_assigned += 1;
                    if *backfilled {
                        summary.backfilled += 1;
                    }
                }
                TaskState::LeftUnassigned => summary.left_unassigned += 1,
                TaskState::Skipped(_) => summary.skipped += 1,
            }
        }
        summary
    }

    /// Rows holding a resource after the pass.
    pub fn assigned(&self) -> usize {
        self.newly_assigned + self.already_assigned
    }

    /// Rows without a resource after the pass.
    pub fn unassigned(&self) -> usize {
        self.left_unassigned + self.skipped
    }
}

/// Workload of one resource in a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceLoad {
    /// Resource name.
    pub resource: String,
    /// Rows assigned to the resource.
    pub task_count: usize,
    /// Sum of hours over those rows (missing hours count as zero).
    pub total_hours: f64,
    /// Mean hours per row; zero when there are no rows.
    pub mean_hours: f64,
    /// Catalog ceiling, if the resource is in the catalog.
    pub max_tasks: Option<u32>,
    /// `task_count / max_tasks`, if the ceiling is known and positive.
    pub utilization: Option<f64>,
    /// Earliest start date among the rows.
    pub first_start: Option<NaiveDate>,
    /// Latest end date among the rows.
    pub last_end: Option<NaiveDate>,
}

impl ResourceLoad {
    fn empty(resource: &str, max_tasks: Option<u32>) -> Self {
        Self {
            resource: resource.to_string(),
            task_count: 0,
            total_hours: 0.0,
            mean_hours: 0.0,
            max_tasks,
            utilization: None,
            first_start: None,
            last_end: None,
        }
    }

    /// Computes the load of every resource.
    ///
    /// Catalog resources come first in default-pool order (including idle
    /// ones), followed by resources found only in the table, in order of
    /// first appearance.
    pub fn calculate(table: &TaskTable, columns: &ColumnMap, pool: &ResourcePool) -> Vec<Self> {
        let mut loads: Vec<Self> = pool
            .default_pool()
            .iter()
            .map(|r| Self::empty(&r.name, Some(r.max_tasks)))
            .collect();

        let Some(resource_col) = table.column_index(&columns.resource_col) else {
            return loads;
        };
        let hours_col = table.column_index(&columns.hours_col);
        let start_col = table.column_index(&columns.start_date_col);
        let end_col = table.column_index(&columns.end_date_col);

        for row in 0..table.row_count() {
            let Some(name) = table.cell(row, resource_col).as_label() else {
                continue;
            };
            let idx = match loads.iter().position(|l| l.resource == name) {
                Some(idx) => idx,
                None => {
                    loads.push(Self::empty(&name, None));
                    loads.len() - 1
                }
            };
            let load = &mut loads[idx];
            load.task_count += 1;
            load.total_hours += table.cell_or_empty(row, hours_col).as_hours().unwrap_or(0.0);
            if let Some(start) = table.cell_or_empty(row, start_col).as_date() {
                load.first_start = Some(load.first_start.map_or(start, |s| s.min(start)));
            }
            if let Some(end) = table.cell_or_empty(row, end_col).as_date() {
                load.last_end = Some(load.last_end.map_or(end, |e| e.max(end)));
            }
        }

        for load in &mut loads {
            if load.task_count > 0 {
                load.mean_hours = load.total_hours / load.task_count as f64;
            }
            load.utilization = load
                .max_tasks
                .filter(|&m| m > 0)
                .map(|m| load.task_count as f64 / f64::from(m));
        }
        loads
    }

    /// Whether the resource holds more tasks than its ceiling allows.
    pub fn is_over_capacity(&self) -> bool {
        self.max_tasks
            .is_some_and(|m| self.task_count > m as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, Resource};
    use crate::scheduler::SkipReason;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let states = [
            TaskState::NewlyAssigned,
            TaskState::NewlyAssigned,
            TaskState::AlreadyAssigned { backfilled: true },
            TaskState::AlreadyAssigned { backfilled: false },
            TaskState::LeftUnassigned,
            TaskState::Skipped(SkipReason::MissingBaseDate),
        ];
        let s = RunSummary::from_states(&states);
        assert_eq!(s.total, 6);
        assert_eq!(s.newly_assigned, 2);
        assert_eq!(s.already_assigned, 2);
        assert_eq!(s.backfilled, 1);
        assert_eq!(s.left_unassigned, 1);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.assigned(), 4);
        assert_eq!(s.unassigned(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let s = RunSummary::from_states(&[]);
        assert_eq!(s, RunSummary::default());
    }

    #[test]
    fn test_resource_load() {
        let columns = ColumnMap::new("dev", "hours", "available", "plan", "start", "end");
        let table = TaskTable::new(["dev", "hours", "start", "end"])
            .with_row([
                Cell::from("Alice"),
                Cell::Number(16.0),
                Cell::Date(d(6)),
                Cell::Date(d(7)),
            ])
            .with_row([
                Cell::from("Alice"),
                Cell::Number(8.0),
                Cell::Date(d(9)),
                Cell::Date(d(9)),
            ])
            .with_row([Cell::from("Guest"), Cell::Number(4.0)])
            .with_row([Cell::Empty, Cell::Number(40.0)]);
        let pool = ResourcePool::flat(vec![
            Resource::new("Alice").with_max_tasks(4),
            Resource::new("Bob"),
        ]);

        let loads = ResourceLoad::calculate(&table, &columns, &pool);
        let names: Vec<&str> = loads.iter().map(|l| l.resource.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Guest"]);

        let alice = &loads[0];
        assert_eq!(alice.task_count, 2);
        assert!((alice.total_hours - 24.0).abs() < 1e-10);
        assert!((alice.mean_hours - 12.0).abs() < 1e-10);
        assert_eq!(alice.utilization, Some(0.5));
        assert_eq!(alice.first_start, Some(d(6)));
        assert_eq!(alice.last_end, Some(d(9)));
        assert!(!alice.is_over_capacity());

        let bob = &loads[1];
        assert_eq!(bob.task_count, 0);
        assert_eq!(bob.utilization, Some(0.0));

        let guest = &loads[2];
        assert_eq!(guest.max_tasks, None);
        assert_eq!(guest.utilization, None);
        assert_eq!(guest.first_start, None);
    }

    #[test]
    fn test_over_capacity() {
        let columns = ColumnMap::new("dev", "hours", "available", "plan", "start", "end");
        let table = TaskTable::new(["dev"]).with_row(["A"]).with_row(["A"]);
        let pool = ResourcePool::flat(vec![Resource::new("A").with_max_tasks(1)]);
        let loads = ResourceLoad::calculate(&table, &columns, &pool);
        assert!(loads[0].is_over_capacity());
    }
}
