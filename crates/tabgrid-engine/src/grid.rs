use crate::token::Token;

/// Number of guitar strings in a column
pub const STRING_COUNT: usize = 6;

/// String labels from top (high E, index 0) to bottom (low E, index 5)
pub const STRING_NAMES: [&str; STRING_COUNT] = ["E", "B", "G", "D", "A", "E"];

/// Index of the bottom (low E) string
pub const BOTTOM_STRING: usize = STRING_COUNT - 1;

/// One time-slice across all six strings
pub type Column = [Token; STRING_COUNT];

pub const EMPTY_COLUMN: Column = [Token::EMPTY; STRING_COUNT];

/// The (column, string) address being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub column: usize,
    pub string: usize,
}

impl Cursor {
    pub fn new(column: usize, string: usize) -> Self {
        Self { column, string }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            column: 0,
            string: BOTTOM_STRING,
        }
    }
}

/// Sparse column/string token matrix.
///
/// Columns are append-only at the tail and the grid always holds at least one
/// column. Reads past the end yield the empty token, so the grid behaves as if
/// it extends infinitely to the right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: Vec<Column>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// A grid holding a single empty column
    pub fn new() -> Self {
        Self {
            columns: vec![EMPTY_COLUMN],
        }
    }

    /// Build a grid from existing columns; an empty list yields one empty column
    pub fn from_columns(columns: Vec<Column>) -> Self {
        if columns.is_empty() {
            return Self::new();
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Token at `(col, string)`, empty when out of range
    pub fn get_token(&self, col: usize, string: usize) -> Token {
        self.columns
            .get(col)
            .and_then(|column| column.get(string))
            .copied()
            .unwrap_or(Token::EMPTY)
    }

    /// Store `value` at `(col, string)`, growing the grid with empty columns as needed
    pub fn set_token(&mut self, col: usize, string: usize, value: Token) {
        if string >= STRING_COUNT {
            log::debug!("ignoring write to string {string} (only {STRING_COUNT} strings)");
            return;
        }
        if col >= self.columns.len() {
            self.columns.resize(col + 1, EMPTY_COLUMN);
        }
        self.columns[col][string] = value;
    }

    /// True iff every string in the column is empty; absent columns are empty
    pub fn is_column_empty(&self, col: usize) -> bool {
        self.columns
            .get(col)
            .is_none_or(|column| column.iter().all(Token::is_empty))
    }

    pub fn push_empty_column(&mut self) {
        self.columns.push(EMPTY_COLUMN);
    }

    /// Pop trailing empty columns while more than `keep` columns remain.
    ///
    /// Stops at the first non-empty trailing column. Never drops below one column.
    pub fn truncate_trailing_empty(&mut self, keep: usize) {
        let keep = keep.max(1);
        while self.columns.len() > keep && self.is_column_empty(self.columns.len() - 1) {
            self.columns.pop();
        }
    }

    /// Reset to a single empty column
    pub fn clear(&mut self) {
        self.columns.clear();
        self.columns.push(EMPTY_COLUMN);
    }
}
