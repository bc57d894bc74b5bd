//! Task table model.
//!
//! A task table is the tabular dataset produced by CSV ingestion: named
//! columns and rows of [`Cell`]s. The engine only touches the columns named
//! by a [`ColumnMap`](super::ColumnMap); every other column passes through
//! unchanged for display.

use super::Cell;

/// Column-oriented task dataset.
///
/// Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TaskTable {
    /// Creates an empty table with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Adds a row (builder form of [`push_row`](Self::push_row)).
    pub fn with_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.push_row(cells);
        self
    }

    /// Appends a row. Short rows are padded with empty cells, long rows
    /// are truncated to the column count.
    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut row: Vec<Cell> = cells
            .into_iter()
            .take(self.columns.len())
            .map(Into::into)
            .collect();
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Column names in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Whether a column is present.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the index of `name`, appending it as an all-empty column
    /// if absent.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Cell::Empty);
        }
        self.columns.len() - 1
    }

    /// Number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at a row and column index.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.rows[row][column]
    }

    /// Cell at a row and optional column index. Absent columns read as empty.
    pub fn cell_or_empty(&self, row: usize, column: Option<usize>) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        column.map_or(&EMPTY, |c| self.cell(row, c))
    }

    /// Cell at a row, looked up by column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Overwrites a cell.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn set(&mut self, row: usize, column: usize, value: impl Into<Cell>) {
        self.rows[row][column] = value.into();
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterates over one column's cells, or nothing if the column is absent.
    pub fn column_values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Cell> + 'a {
        let idx = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| idx.map(|i| &row[i]))
    }
}
