//! Greedy capacity- and calendar-aware assignment engine.
//!
//! # Algorithm
//!
//! 1. Copy the input table; create the resource/start/end columns if absent.
//! 2. Split rows into already-assigned (non-empty resource) and unassigned.
//! 3. Backfill missing dates of already-assigned rows from their base date.
//!    Their resource is never changed.
//! 4. Sort unassigned rows by hours, descending (stable: ties keep input order).
//! 5. For each unassigned row, compute its working-date span and take the
//!    first resource of its pool, in declaration order, that has spare
//!    capacity and no overlapping span. Write the assignment immediately so
//!    later rows see it.
//!
//! Capacity and conflicts are counted across the whole table, not per group.
//! A per-resource ledger carries this state between steps; it is updated in
//! the same order the rows are visited, so the pass is strictly sequential.
//!
//! # Complexity
//! O(n log n + n * c * k) where n=rows, c=pool size, k=tasks per resource.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::RunSummary;
use crate::error::PlanError;
use crate::models::{
    has_conflict, Cell, ColumnMap, Resource, ResourcePool, Span, TaskTable, WorkingCalendar,
};
use crate::validation::validate_columns;

/// Why a row was left out of scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither the available date nor the plan date is set.
    MissingBaseDate,
    /// The base date is set but is not a recognizable date.
    UnparseableBaseDate,
    /// Hours are missing, zero, or negative.
    NonPositiveHours,
    /// The effort is too large to lay out as a span of working days.
    SpanOutOfRange,
}

/// Terminal state of one row after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not scheduled because of missing or invalid data.
    Skipped(SkipReason),
    /// Resource given on input and preserved.
    AlreadyAssigned {
        /// Whether missing dates were filled in.
        backfilled: bool,
    },
    /// Resource and dates written by this pass.
    NewlyAssigned,
    /// Every candidate was full or conflicting; left for manual handling.
    LeftUnassigned,
}

impl TaskState {
    /// Whether the row ends the pass with a resource.
    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::AlreadyAssigned { .. } | Self::NewlyAssigned)
    }
}

/// Result of an assignment pass.
#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    /// The updated copy of the input table.
    pub table: TaskTable,
    /// Per-row terminal states, indexed like the table rows.
    pub states: Vec<TaskState>,
}

impl AssignmentOutcome {
    /// Counts per terminal state.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_states(&self.states)
    }

    /// Rows that end the pass without a resource.
    pub fn unassigned_rows(&self) -> Vec<usize> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_assigned())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Resolved column positions for one pass.
#[derive(Debug, Clone, Copy)]
struct Columns {
    resource: usize,
    hours: usize,
    available: Option<usize>,
    plan: Option<usize>,
    start: usize,
    end: usize,
    group: Option<usize>,
}

/// Assigns unassigned tasks to resources.
///
/// # Example
///
/// ```
/// use u_resplan::models::{Cell, ColumnMap, Resource, ResourcePool, TaskTable, WorkingCalendar};
/// use u_resplan::scheduler::AssignmentEngine;
///
/// let columns = ColumnMap::new("dev", "hours", "available", "plan", "start", "end");
/// let tasks = TaskTable::new(["id", "hours", "available"])
///     .with_row([Cell::from("T1"), Cell::Number(16.0), Cell::from("2025-01-06")]);
/// let pool = ResourcePool::flat(vec![Resource::new("Alice").with_max_tasks(2)]);
///
/// let engine = AssignmentEngine::new(columns, pool, WorkingCalendar::default());
/// let outcome = engine.assign(&tasks).unwrap();
/// assert_eq!(outcome.table.get(0, "dev"), Some(&Cell::from("Alice")));
/// assert_eq!(outcome.summary().newly_assigned, 1);
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    columns: ColumnMap,
    pool: ResourcePool,
    calendar: WorkingCalendar,
    group_partitioning: bool,
}

impl AssignmentEngine {
    /// Creates an engine without group partitioning.
    pub fn new(columns: ColumnMap, pool: ResourcePool, calendar: WorkingCalendar) -> Self {
        Self {
            columns,
            pool,
            calendar,
            group_partitioning: false,
        }
    }

    /// Enables or disables selecting the pool by the task's group.
    pub fn with_group_partitioning(mut self, enabled: bool) -> Self {
        self.group_partitioning = enabled;
        self
    }

    /// The column mapping.
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// The resource catalog.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// The working calendar.
    pub fn calendar(&self) -> &WorkingCalendar {
        &self.calendar
    }

    /// Runs one assignment pass over a copy of `tasks`.
    ///
    /// # Errors
    /// Returns [`PlanError::AssignmentFailed`] wrapping the cause when the
    /// column mapping is invalid or a required column is missing. Per-row
    /// data problems never fail the pass.
    pub fn assign(&self, tasks: &TaskTable) -> Result<AssignmentOutcome, PlanError> {
        self.run(tasks).map_err(PlanError::into_assignment_failure)
    }

    fn run(&self, tasks: &TaskTable) -> Result<AssignmentOutcome, PlanError> {
        validate_columns(&self.columns).map_err(|errors| {
            PlanError::InvalidColumns(errors.into_iter().map(|e| e.message).collect())
        })?;

        let hours = tasks
            .column_index(&self.columns.hours_col)
            .ok_or_else(|| PlanError::MissingColumn {
                column: self.columns.hours_col.clone(),
            })?;
        let available = tasks.column_index(&self.columns.available_date_col);
        let plan = tasks.column_index(&self.columns.plan_date_col);
        if available.is_none() && plan.is_none() {
            return Err(PlanError::MissingColumn {
                column: self.columns.available_date_col.clone(),
            });
        }

        let mut table = tasks.clone();
        let cols = Columns {
            resource: table.ensure_column(&self.columns.resource_col),
            hours,
            available,
            plan,
            start: table.ensure_column(&self.columns.start_date_col),
            end: table.ensure_column(&self.columns.end_date_col),
            group: if self.group_partitioning {
                table.column_index(&self.columns.group_col)
            } else {
                None
            },
        };

        let mut states = vec![TaskState::LeftUnassigned; table.row_count()];
        let mut unassigned = Vec::new();
        for row in 0..table.row_count() {
            if table.cell(row, cols.resource).is_empty() {
                unassigned.push(row);
            } else {
                let backfilled = self.backfill(&mut table, row, &cols);
                states[row] = TaskState::AlreadyAssigned { backfilled };
            }
        }

        let mut ledger = Ledger::from_table(&table, &cols);

        let sort_key = |row: usize| {
            table
                .cell(row, cols.hours)
                .as_hours()
                .unwrap_or(f64::NEG_INFINITY)
        };
        unassigned.sort_by(|&a, &b| sort_key(b).total_cmp(&sort_key(a)));

        for row in unassigned {
            states[row] = self.place(&mut table, &mut ledger, row, &cols);
        }

        let summary = RunSummary::from_states(&states);
        info!(
            total = summary.total,
            newly_assigned = summary.newly_assigned,
            already_assigned = summary.already_assigned,
            left_unassigned = summary.left_unassigned,
            skipped = summary.skipped,
            "assignment pass complete"
        );

        Ok(AssignmentOutcome { table, states })
    }

    /// Fills missing dates of a pre-assigned row. Returns whether it wrote.
    fn backfill(&self, table: &mut TaskTable, row: usize, cols: &Columns) -> bool {
        let dated = table.cell(row, cols.start).as_date().is_some()
            && table.cell(row, cols.end).as_date().is_some();
        if dated {
            return false;
        }

        let span = match self.span_for(table, row, cols) {
            Ok(span) => span,
            Err(reason) => {
                debug!(row, ?reason, "pre-assigned task left undated");
                return false;
            }
        };
        table.set(row, cols.start, span.start);
        table.set(row, cols.end, span.end);
        true
    }

    /// Chooses a resource for an unassigned row and writes the result.
    fn place(
        &self,
        table: &mut TaskTable,
        ledger: &mut Ledger,
        row: usize,
        cols: &Columns,
    ) -> TaskState {
        let span = match self.span_for(table, row, cols) {
            Ok(span) => span,
            Err(reason) => {
                debug!(row, ?reason, "task skipped");
                return TaskState::Skipped(reason);
            }
        };

        let group = cols
            .group
            .and_then(|g| table.cell(row, g).as_label())
            .map(|g| g.into_owned());
        if let Some(g) = group.as_deref() {
            if self.pool.group(g).is_none() {
                debug!(row, group = g, "unknown group, using default pool");
            }
        }
        let candidates = self.pool.candidates(group.as_deref());

        let Some(resource) = candidates.iter().find(|r| ledger.admits(r, &span)) else {
            debug!(row, candidates = candidates.len(), "no eligible resource");
            return TaskState::LeftUnassigned;
        };

        debug!(
            row,
            resource = %resource.name,
            start = %span.start,
            end = %span.end,
            "task assigned"
        );
        table.set(row, cols.resource, Cell::Text(resource.name.clone()));
        table.set(row, cols.start, span.start);
        table.set(row, cols.end, span.end);
        ledger.record(&resource.name, span);
        TaskState::NewlyAssigned
    }

    /// Working-date span of a row, from its base date and hours.
    fn span_for(&self, table: &TaskTable, row: usize, cols: &Columns) -> Result<Span, SkipReason> {
        let base = base_date(table, row, cols)?;
        let hours = table
            .cell(row, cols.hours)
            .as_hours()
            .filter(|&h| self.calendar.rounding().working_days(h).is_some())
            .ok_or(SkipReason::NonPositiveHours)?;
        self.calendar
            .working_date_span(base, hours)
            .ok_or(SkipReason::SpanOutOfRange)
    }
}

/// Available date if set, otherwise plan date.
fn base_date(table: &TaskTable, row: usize, cols: &Columns) -> Result<NaiveDate, SkipReason> {
    let available = table.cell_or_empty(row, cols.available);
    let cell = if available.is_empty() {
        table.cell_or_empty(row, cols.plan)
    } else {
        available
    };
    if cell.is_empty() {
        return Err(SkipReason::MissingBaseDate);
    }
    cell.as_date().ok_or(SkipReason::UnparseableBaseDate)
}

type Bounds = (Option<NaiveDate>, Option<NaiveDate>);

/// Per-resource bookings seen so far in a pass.
#[derive(Debug, Default)]
struct Ledger {
    bookings: HashMap<String, Vec<Bounds>>,
}

impl Ledger {
    fn from_table(table: &TaskTable, cols: &Columns) -> Self {
        let mut ledger = Self::default();
        for row in 0..table.row_count() {
            if let Some(name) = table.cell(row, cols.resource).as_label() {
                ledger.bookings.entry(name.into_owned()).or_default().push((
                    table.cell(row, cols.start).as_date(),
                    table.cell(row, cols.end).as_date(),
                ));
            }
        }
        ledger
    }

    fn booked(&self, name: &str) -> &[Bounds] {
        self.bookings.get(name).map_or(&[][..], Vec::as_slice)
    }

    /// Capacity first, then conflicts.
    fn admits(&self, resource: &Resource, span: &Span) -> bool {
        let booked = self.booked(&resource.name);
        resource.has_capacity(booked.len()) && !has_conflict(span, booked.iter().copied())
    }

    fn record(&mut self, name: &str, span: Span) {
        self.bookings
            .entry(name.to_string())
            .or_default()
            .push((Some(span.start), Some(span.end)));
    }
}
