//! Input validation and result auditing.
//!
//! Checks the configuration before a pass and re-checks a result table
//! afterwards. Detects:
//! - Empty or clashing column names in the column mapping
//! - Empty, duplicate, or zero-capacity resources in the catalog
//! - Capacity overruns, double-booked resources, and spans that start or
//!   end on a non-working day in a planned table
//!
//! Configuration checks collect every problem instead of stopping at the
//! first. Audits return violations; a result edited by hand, or one whose
//! pre-assigned rows already broke the rules, can be reported rather than
//! rejected.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{ColumnMap, ResourcePool, Span, TaskTable, WorkingCalendar};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A column role has an empty name.
    EmptyColumnName,
    /// Two column roles share a name.
    DuplicateColumn,
    /// A resource or group has an empty name.
    EmptyName,
    /// A resource name has leading or trailing whitespace.
    UntrimmedName,
    /// Two resources in one list, or two groups, share a name.
    DuplicateId,
    /// A resource can never take a task.
    ZeroCapacity,
    /// The catalog has no resources.
    EmptyCatalog,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a column mapping.
///
/// Checks:
/// 1. Every role has a non-blank column name
/// 2. No two roles share a column name
pub fn validate_columns(columns: &ColumnMap) -> ValidationResult {
    let mut errors = Vec::new();
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for (role, name) in columns.roles() {
        if name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyColumnName,
                format!("Column for role '{role}' is empty"),
            ));
            continue;
        }
        if let Some(other) = seen.insert(name, role) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateColumn,
                format!("Roles '{other}' and '{role}' both use column '{name}'"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a resource catalog.
///
/// Checks:
/// 1. The catalog has at least one resource
/// 2. Group names are non-blank and unique (ignoring case)
/// 3. Resource names are non-blank, carry no surrounding whitespace, and are
///    unique within their list
/// 4. Every resource allows at least one task
pub fn validate_catalog(pool: &ResourcePool) -> ValidationResult {
    let mut errors = Vec::new();

    if pool.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "Resource catalog has no resources",
        ));
    }

    let mut group_names = HashSet::new();
    for group in pool.groups() {
        if group.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                "Group with empty name",
            ));
        } else if !group_names.insert(group.name.trim().to_uppercase()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate group: {}", group.name),
            ));
        }
    }

    let lists = std::iter::once(("ungrouped", pool.ungrouped())).chain(
        pool.groups()
            .iter()
            .map(|g| (g.name.as_str(), g.resources.as_slice())),
    );
    for (list, resources) in lists {
        let mut names = HashSet::new();
        for r in resources {
            if r.name.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::EmptyName,
                    format!("Resource with empty name in '{list}'"),
                ));
                continue;
            }
            // Table cells are trimmed on input; a padded name would never match one.
            if r.name.trim() != r.name {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UntrimmedName,
                    format!("Resource '{}' in '{list}' has surrounding whitespace", r.name),
                ));
            }
            if !names.insert(r.name.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate resource '{}' in '{list}'", r.name),
                ));
            }
            if r.max_tasks == 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ZeroCapacity,
                    format!("Resource '{}' in '{list}' has max_tasks = 0", r.name),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// A rule broken by a planned table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Resource name, or `row N` for row-level problems.
    pub entity_id: String,
    /// Table rows involved.
    pub rows: Vec<usize>,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    /// Resource holds more tasks than its ceiling.
    CapacityExceeded,
    /// Two spans of one resource share a day.
    Overlap,
    /// A span starts or ends on a weekend or holiday.
    NonWorkingDay,
    /// A span ends before it starts.
    InvertedSpan,
}

impl Violation {
    /// Creates a capacity violation.
    pub fn capacity_exceeded(resource: &str, rows: Vec<usize>, max_tasks: u32) -> Self {
        Self {
            violation_type: ViolationType::CapacityExceeded,
            entity_id: resource.to_string(),
            message: format!(
                "'{resource}' holds {} tasks, ceiling is {max_tasks}",
                rows.len()
            ),
            rows,
            severity: 90,
        }
    }

    /// Creates an overlap violation.
    pub fn overlap(resource: &str, a: (usize, Span), b: (usize, Span)) -> Self {
        Self {
            violation_type: ViolationType::Overlap,
            entity_id: resource.to_string(),
            rows: vec![a.0, b.0],
            message: format!(
                "'{resource}' is booked {}..{} (row {}) and {}..{} (row {})",
                a.1.start, a.1.end, a.0, b.1.start, b.1.end, b.0
            ),
            severity: 90,
        }
    }

    /// Creates a non-working-day violation.
    pub fn non_working_day(row: usize, which: &str, day: chrono::NaiveDate) -> Self {
        Self {
            violation_type: ViolationType::NonWorkingDay,
            entity_id: format!("row {row}"),
            rows: vec![row],
            message: format!("Span {which} {day} is not a working day"),
            severity: 70,
        }
    }

    /// Creates an inverted-span violation.
    pub fn inverted_span(row: usize, span: Span) -> Self {
        Self {
            violation_type: ViolationType::InvertedSpan,
            entity_id: format!("row {row}"),
            rows: vec![row],
            message: format!("Span ends {} before it starts {}", span.end, span.start),
            severity: 95,
        }
    }
}

/// Audits a planned table against the assignment rules.
///
/// Capacity is checked only for resources present in the catalog. Rows with
/// a missing date bound are not checked for overlap or working days.
pub fn audit_assignments(
    table: &TaskTable,
    columns: &ColumnMap,
    pool: &ResourcePool,
    calendar: &WorkingCalendar,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let Some(resource_col) = table.column_index(&columns.resource_col) else {
        return violations;
    };
    let start_col = table.column_index(&columns.start_date_col);
    let end_col = table.column_index(&columns.end_date_col);

    // resource → (rows, dated spans), in order of first appearance
    let mut order: Vec<String> = Vec::new();
    let mut by_resource: HashMap<String, (Vec<usize>, Vec<(usize, Span)>)> = HashMap::new();

    for row in 0..table.row_count() {
        let span = Span::from_bounds(
            table.cell_or_empty(row, start_col).as_date(),
            table.cell_or_empty(row, end_col).as_date(),
        );

        if let Some(span) = span {
            if span.end < span.start {
                violations.push(Violation::inverted_span(row, span));
            }
            if !calendar.is_working_day(span.start) {
                violations.push(Violation::non_working_day(row, "start", span.start));
            }
            if !calendar.is_working_day(span.end) {
                violations.push(Violation::non_working_day(row, "end", span.end));
            }
        }

        let Some(name) = table.cell(row, resource_col).as_label() else {
            continue;
        };
        let entry = by_resource.entry(name.to_string()).or_insert_with(|| {
            order.push(name.to_string());
            (Vec::new(), Vec::new())
        });
        entry.0.push(row);
        if let Some(span) = span {
            entry.1.push((row, span));
        }
    }

    for name in &order {
        let Some((rows, spans)) = by_resource.get(name) else {
            continue;
        };
        if let Some(resource) = pool.resource(name) {
            if rows.len() > resource.max_tasks as usize {
                violations.push(Violation::capacity_exceeded(
                    name,
                    rows.clone(),
                    resource.max_tasks,
                ));
            }
        }
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                if a.1.overlaps(&b.1) {
                    violations.push(Violation::overlap(name, *a, *b));
                }
            }
        }
    }

    violations
}
