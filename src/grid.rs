//! Grid Module
//!
//! Dense, immutable 2-D grid of heterogeneous cell values. This is the sole
//! input shape of the extraction core: no header row is assumed, and cells
//! are addressed by zero-based (row, column).

use serde::{Deserialize, Serialize};

/// A single untyped cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Numeric cell (f64).
    Number(f64),

    /// Text cell.
    Text(String),

    /// Boolean cell.
    Bool(bool),

    /// Spreadsheet error value (e.g. `#DIV/0!`).
    Error(String),

    /// Empty or missing cell.
    Empty,
}

impl CellValue {
    /// Whether the cell is empty/missing.
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text rendition used for keyword and name scans. Numbers render with
    /// their natural `f64` formatting; empty cells render as `""`.
    pub fn as_display_text(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Immutable raw grid of cell values, indexed by (row, column).
///
/// Rows are padded to a rectangular shape at construction; out-of-range reads
/// return [`CellValue::Empty`] so callers never have to bounds-check.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    cells: Vec<Vec<CellValue>>,
    rows: usize,
    cols: usize,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl RawGrid {
    /// Build a grid from row vectors, padding short rows with empty cells.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut cells = rows;
        for row in &mut cells {
            row.resize(n_cols, CellValue::Empty);
        }

        Self {
            cells,
            rows: n_rows,
            cols: n_cols,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the grid cannot hold any table at all (zero rows or columns).
    pub fn is_unusable(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Cell at (row, col); [`CellValue::Empty`] when out of range.
    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Text rendition of a cell, trimmed.
    pub fn text(&self, row: usize, col: usize) -> String {
        self.get(row, col).as_display_text().trim().to_string()
    }

    /// Whether any cell in the row carries an ASCII digit (numbers count).
    pub(crate) fn row_has_digit(&self, row: usize) -> bool {
        if row >= self.rows {
            return false;
        }
        self.cells[row].iter().any(|cell| match cell {
            CellValue::Number(_) => true,
            CellValue::Text(s) => s.chars().any(|c| c.is_ascii_digit()),
            _ => false,
        })
    }
}
