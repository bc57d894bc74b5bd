//! Resource-planning domain models.
//!
//! Provides the data types the assignment engine reads and writes: the
//! loosely typed task table produced by CSV ingestion, the column-role
//! mapping, the resource catalog, and the working-day calendar.
//!
//! # Domain Mappings
//!
//! | u-resplan | Development plan | Test plan |
//! |-----------|------------------|-----------|
//! | Task row | RICEFW object | Test case |
//! | Resource | ABAP developer | QA tester |
//! | Group | Module (GRID, ERP, ...) | (unused) |
//! | Span | Build window | Test window |

mod calendar;
mod cell;
mod columns;
mod pool;
mod resource;
mod span;
mod table;

pub use calendar::{
    DayRounding, HolidaySet, WorkingCalendar, HOURS_PER_DAY, MAX_SPAN_WORKING_DAYS,
};
pub use cell::{parse_date, Cell, EMPTY_SENTINELS};
pub use columns::{ColumnMap, DEFAULT_GROUP_COLUMN};
pub use pool::{ResourceGroup, ResourcePool};
pub use resource::{Level, Resource, DEFAULT_MAX_TASKS};
pub use span::{has_conflict, Span};
pub use table::TaskTable;
