//! Plan configuration.
//!
//! A plan file describes everything a pass needs besides the task table:
//! column names, holidays, the resource catalog, and engine options.
//! Resolution priority (highest first):
//! 1. CLI arguments
//! 2. TOML plan file
//! 3. Preset defaults (`development` or `testing`)
//!
//! ```toml
//! [plan]
//! preset = "development"
//! rounding = "ceil"
//!
//! [columns]
//! hours = "effort_hours"
//!
//! [holidays]
//! "2025-12-25" = "Christmas"
//!
//! [[groups]]
//! name = "GRID"
//! [[groups.resources]]
//! name = "Norman Tinco"
//! max_tasks = 4
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::PlanError;
use crate::models::{
    ColumnMap, DayRounding, HolidaySet, Resource, ResourcePool, WorkingCalendar,
};
use crate::scheduler::AssignmentEngine;
use crate::validation::{validate_catalog, validate_columns};

// ---------------------------------------------------------------------------
// TOML file structs (all fields optional for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level plan file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlanFile {
    plan: PlanSection,
    columns: ColumnsSection,
    holidays: BTreeMap<String, String>,
    groups: Vec<GroupSection>,
    resources: Vec<Resource>,
}

/// `[plan]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlanSection {
    preset: Option<String>,
    group_partitioning: Option<bool>,
    rounding: Option<DayRounding>,
}

/// `[columns]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ColumnsSection {
    resource: Option<String>,
    hours: Option<String>,
    available_date: Option<String>,
    plan_date: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    group: Option<String>,
}

/// `[[groups]]` entry.
#[derive(Debug, Deserialize)]
struct GroupSection {
    name: String,
    #[serde(default)]
    resources: Vec<Resource>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the `resplan` binary.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Assign planned tasks to developers and testers")]
pub struct CliArgs {
    /// Plan file (TOML): columns, holidays, resource catalog.
    #[arg(short, long, env = "RESPLAN_PLAN")]
    pub plan: PathBuf,

    /// Task table as a JSON array of records.
    #[arg(short, long)]
    pub tasks: PathBuf,

    /// Where to write the planned table (default: stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the plan file's group partitioning setting.
    #[arg(long)]
    pub group_partitioning: Option<bool>,

    /// Re-check the result and log every violation.
    #[arg(long)]
    pub audit: bool,

    /// Log per-resource load after the pass.
    #[arg(long)]
    pub loads: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "RESPLAN_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved inputs for an assignment pass.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Column-role mapping.
    pub columns: ColumnMap,
    /// Resource catalog.
    pub pool: ResourcePool,
    /// Working calendar (holidays and rounding).
    pub calendar: WorkingCalendar,
    /// Whether tasks draw from their group's pool.
    pub group_partitioning: bool,
}

impl PlanConfig {
    /// Loads a plan file, applying CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError`] if the file cannot be read or parsed, or if the
    /// resolved columns, holidays, or catalog are invalid.
    pub fn load(cli: &CliArgs) -> Result<Self, PlanError> {
        let mut config = Self::from_path(&cli.plan)?;
        if let Some(enabled) = cli.group_partitioning {
            config.group_partitioning = enabled;
        }
        Ok(config)
    }

    /// Loads a plan file.
    ///
    /// # Errors
    ///
    /// See [`PlanConfig::load`].
    pub fn from_path(path: &Path) -> Result<Self, PlanError> {
        let contents = std::fs::read_to_string(path).map_err(|e| PlanError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses a plan from TOML text.
    ///
    /// # Errors
    ///
    /// See [`PlanConfig::load`].
    pub fn from_toml_str(contents: &str) -> Result<Self, PlanError> {
        let file: PlanFile = toml::from_str(contents)?;
        Self::resolve(file)
    }

    /// Builds an engine from this configuration.
    pub fn engine(&self) -> AssignmentEngine {
        AssignmentEngine::new(
            self.columns.clone(),
            self.pool.clone(),
            self.calendar.clone(),
        )
        .with_group_partitioning(self.group_partitioning)
    }

    fn resolve(file: PlanFile) -> Result<Self, PlanError> {
        let (base, preset_partitioning) = match file.plan.preset.as_deref() {
            Some("development") => (ColumnMap::development(), true),
            Some("testing") => (ColumnMap::testing(), false),
            Some(other) => return Err(PlanError::UnknownPreset(other.to_string())),
            None => (ColumnMap::new("", "", "", "", "", ""), false),
        };

        let c = file.columns;
        let columns = ColumnMap {
            resource_col: c.resource.unwrap_or(base.resource_col),
            hours_col: c.hours.unwrap_or(base.hours_col),
            available_date_col: c.available_date.unwrap_or(base.available_date_col),
            plan_date_col: c.plan_date.unwrap_or(base.plan_date_col),
            start_date_col: c.start_date.unwrap_or(base.start_date_col),
            end_date_col: c.end_date.unwrap_or(base.end_date_col),
            group_col: c.group.unwrap_or(base.group_col),
        };
        validate_columns(&columns).map_err(|errors| {
            PlanError::InvalidColumns(errors.into_iter().map(|e| e.message).collect())
        })?;

        let mut pool = ResourcePool::new();
        for resource in file.resources {
            pool = pool.with_resource(resource);
        }
        for group in file.groups {
            pool = pool.with_group(group.name, group.resources);
        }
        validate_catalog(&pool).map_err(|errors| {
            PlanError::InvalidCatalog(errors.into_iter().map(|e| e.message).collect())
        })?;

        let holidays = HolidaySet::from_iso_map(file.holidays)?;
        let calendar = WorkingCalendar::new(holidays)
            .with_rounding(file.plan.rounding.unwrap_or_default());

        let config = Self {
            columns,
            pool,
            calendar,
            group_partitioning: file.plan.group_partitioning.unwrap_or(preset_partitioning),
        };
        debug!(
            groups = config.pool.groups().len(),
            resources = config.pool.default_pool().len(),
            holidays = config.calendar.holidays().len(),
            group_partitioning = config.group_partitioning,
            "plan resolved"
        );
        Ok(config)
    }
}
