//! Crate error type.
//!
//! Per-row data problems (missing dates, zero hours) are never errors: the
//! engine records them as skipped tasks. `PlanError` covers configuration
//! mistakes, I/O in the front end, and the single terminal failure of an
//! assignment pass.

use std::path::PathBuf;

/// Errors raised while configuring or running a planning pass.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The column-role mapping is unusable (empty or clashing names).
    #[error("invalid column mapping: {}", .0.join("; "))]
    InvalidColumns(Vec<String>),

    /// A column the caller must provide is absent from the task table.
    #[error("required column `{column}` is missing from the task table")]
    MissingColumn {
        /// Configured column name.
        column: String,
    },

    /// The resource catalog failed validation.
    #[error("invalid resource catalog: {}", .0.join("; "))]
    InvalidCatalog(Vec<String>),

    /// A holiday key is not an ISO `YYYY-MM-DD` date.
    #[error("invalid holiday date `{0}` (expected YYYY-MM-DD)")]
    InvalidHoliday(String),

    /// Unknown plan preset name.
    #[error("unknown plan preset `{0}` (expected `development` or `testing`)")]
    UnknownPreset(String),

    /// Terminal failure of an assignment pass. The result must be discarded.
    #[error("resource assignment failed: {0}")]
    AssignmentFailed(#[source] Box<PlanError>),

    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML plan file.
    #[error("failed to parse plan file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// Failed to parse or render JSON task records.
    #[error("invalid task records: {0}")]
    ParseJson(#[from] serde_json::Error),
}

impl PlanError {
    /// Wraps an error as the terminal failure of an assignment pass.
    ///
    /// Already-wrapped errors are returned unchanged.
    pub fn into_assignment_failure(self) -> Self {
        match self {
            Self::AssignmentFailed(_) => self,
            other => Self::AssignmentFailed(Box::new(other)),
        }
    }
}
