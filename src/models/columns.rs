//! Column-role mapping.
//!
//! Development and test plans store the same roles (assigned resource,
//! effort, base dates, computed span) under different column names. The
//! mapping is configuration, never a code branch.

use serde::{Deserialize, Serialize};

/// Default name of the grouping column.
pub const DEFAULT_GROUP_COLUMN: &str = "grupo_dev";

/// Names of the task-table columns the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    /// Assigned resource (read and written).
    pub resource_col: String,
    /// Effort estimate in hours.
    pub hours_col: String,
    /// Preferred base date.
    pub available_date_col: String,
    /// Fallback base date.
    pub plan_date_col: String,
    /// Computed span start (written).
    pub start_date_col: String,
    /// Computed span end (written).
    pub end_date_col: String,
    /// Resource-pool partition key.
    pub group_col: String,
}

impl ColumnMap {
    /// Creates a mapping with the default group column.
    pub fn new(
        resource_col: impl Into<String>,
        hours_col: impl Into<String>,
        available_date_col: impl Into<String>,
        plan_date_col: impl Into<String>,
        start_date_col: impl Into<String>,
        end_date_col: impl Into<String>,
    ) -> Self {
        Self {
            resource_col: resource_col.into(),
            hours_col: hours_col.into(),
            available_date_col: available_date_col.into(),
            plan_date_col: plan_date_col.into(),
            start_date_col: start_date_col.into(),
            end_date_col: end_date_col.into(),
            group_col: DEFAULT_GROUP_COLUMN.to_string(),
        }
    }

    /// Column names of the development plan export.
    pub fn development() -> Self {
        Self::new(
            "abap_asignado",
            "plan_abap_dev_time",
            "esfu_disponible",
            "plan_abap_dev_ini",
            "Fecha Inicio Plan",
            "Fecha Fin Plan",
        )
    }

    /// Column names of the test plan export.
    pub fn testing() -> Self {
        Self::new(
            "abap_asignado",
            "plan_abap_pu_time",
            "available_test_date",
            "plan_abap_pu_ini",
            "pu_ini",
            "Fecha Fin Real",
        )
    }

    /// Sets the grouping column.
    pub fn with_group_col(mut self, group_col: impl Into<String>) -> Self {
        self.group_col = group_col.into();
        self
    }

    /// `(role, column name)` pairs, in declaration order.
    pub fn roles(&self) -> [(&'static str, &str); 7] {
        [
            ("resource", self.resource_col.as_str()),
            ("hours", self.hours_col.as_str()),
            ("available_date", self.available_date_col.as_str()),
            ("plan_date", self.plan_date_col.as_str()),
            ("start_date", self.start_date_col.as_str()),
            ("end_date", self.end_date_col.as_str()),
            ("group", self.group_col.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let dev = ColumnMap::development();
        assert_eq!(dev.hours_col, "plan_abap_dev_time");
        assert_eq!(dev.start_date_col, "Fecha Inicio Plan");
        assert_eq!(dev.group_col, DEFAULT_GROUP_COLUMN);

        let test = ColumnMap::testing();
        assert_eq!(test.available_date_col, "available_test_date");
        assert_eq!(test.end_date_col, "Fecha Fin Real");
        assert_eq!(dev.resource_col, test.resource_col);
    }

    #[test]
    fn test_roles_order() {
        let cols = ColumnMap::new("r", "h", "a", "p", "s", "e").with_group_col("g");
        let names: Vec<&str> = cols.roles().iter().map(|(_, n)| *n).collect();
        assert_eq!(names, vec!["r", "h", "a", "p", "s", "e", "g"]);
    }
}
