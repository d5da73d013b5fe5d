//! Row storage seen by the edit session.
//!
//! The session never keeps rows itself; it reads snapshots and writes cells
//! through `RowStore`. `RowList` is the plain in-memory store.

use crate::row::{CellWrite, Field, TaskRow};

/// External row store.
pub trait RowStore {
    fn row_count(&self) -> usize;

    fn row(&self, index: usize) -> Option<&TaskRow>;

    /// Commit one cell. Writes to rows past the end are ignored.
    fn set_cell(&mut self, index: usize, write: CellWrite);
}

/// In-memory list of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowList {
    rows: Vec<TaskRow>,
}

impl RowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` empty rows with ids "1".."count".
    pub fn seeded(count: usize) -> Self {
        let mut list = Self::new();
        list.add_rows(count);
        list
    }

    pub fn from_rows(rows: Vec<TaskRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// Append `count` empty rows, continuing the id sequence.
    pub fn add_rows(&mut self, count: usize) {
        let first = self.rows.len();
        self.rows
            .extend((first..first + count).map(|i| TaskRow::empty((i + 1).to_string())));
    }

    /// Reset the given cells to empty. Unknown rows are skipped.
    pub fn clear_cells(&mut self, targets: &[(usize, Field)]) {
        for &(index, field) in targets {
            if let Some(row) = self.rows.get_mut(index) {
                row.clear(field);
            }
        }
    }
}

impl RowStore for RowList {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, index: usize) -> Option<&TaskRow> {
        self.rows.get(index)
    }

    fn set_cell(&mut self, index: usize, write: CellWrite) {
        if let Some(row) = self.rows.get_mut(index) {
            row.apply(&write);
        }
    }
}
