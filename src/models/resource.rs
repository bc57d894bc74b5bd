//! Resource model.
//!
//! Resources are the people tasks are assigned to: developers and testers.
//! Each resource has a seniority level, a ceiling on how many tasks it may
//! hold at once, and a display color.

use serde::{Deserialize, Serialize};

/// Task ceiling used when a catalog entry does not set one.
pub const DEFAULT_MAX_TASKS: u32 = 15;

/// A person that can be assigned tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique name; also the value written to the resource column.
    pub name: String,
    /// Seniority (informational).
    #[serde(default)]
    pub level: Level,
    /// Maximum number of tasks assigned at the same time.
    #[serde(default = "default_max_tasks")]
    pub max_tasks: u32,
    /// Display color (e.g. `#FF6B6B`).
    #[serde(default)]
    pub color: Option<String>,
}

fn default_max_tasks() -> u32 {
    DEFAULT_MAX_TASKS
}

/// Seniority level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Level {
    /// Junior.
    #[serde(alias = "JUNIOR")]
    Junior,
    /// Mid-level ("pleno").
    #[serde(alias = "PLENO")]
    Pleno,
    /// Between mid-level and senior.
    #[serde(alias = "SEMI_SENIOR")]
    SemiSenior,
    /// Senior.
    #[default]
    #[serde(alias = "SENIOR")]
    Senior,
    /// Domain-specific level, written as a bare string (`level = "lead"`).
    #[serde(untagged)]
    Custom(String),
}

impl Resource {
    /// Creates a senior resource with the default task ceiling.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Level::default(),
            max_tasks: DEFAULT_MAX_TASKS,
            color: None,
        }
    }

    /// Sets the level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the task ceiling.
    pub fn with_max_tasks(mut self, max_tasks: u32) -> Self {
        self.max_tasks = max_tasks;
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Whether `current` assigned tasks leave room for one more.
    #[inline]
    pub fn has_capacity(&self, current: usize) -> bool {
        current < self.max_tasks as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new("Norman Tinco")
            .with_level(Level::Pleno)
            .with_max_tasks(4)
            .with_color("#FFEAA7");

        assert_eq!(r.name, "Norman Tinco");
        assert_eq!(r.level, Level::Pleno);
        assert_eq!(r.max_tasks, 4);
        assert_eq!(r.color.as_deref(), Some("#FFEAA7"));
    }

    #[test]
    fn test_defaults() {
        let r = Resource::new("FSM1");
        assert_eq!(r.level, Level::Senior);
        assert_eq!(r.max_tasks, DEFAULT_MAX_TASKS);
        assert!(r.color.is_none());
    }

    #[test]
    fn test_level_from_strings() {
        let levels: Vec<Level> =
            serde_json::from_str(r#"["senior", "SEMI_SENIOR", "pleno", "lead"]"#).unwrap();
        assert_eq!(
            levels,
            vec![
                Level::Senior,
                Level::SemiSenior,
                Level::Pleno,
                Level::Custom("lead".into()),
            ]
        );
        assert_eq!(
            serde_json::to_string(&Level::Custom("lead".into())).unwrap(),
            r#""lead""#
        );
    }

    #[test]
    fn test_has_capacity() {
        let r = Resource::new("A").with_max_tasks(2);
        assert!(r.has_capacity(0));
        assert!(r.has_capacity(1));
        assert!(!r.has_capacity(2));
        assert!(!Resource::new("B").with_max_tasks(0).has_capacity(0));
    }
}
