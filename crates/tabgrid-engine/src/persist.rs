//! Persisted editor state.
//!
//! The stored blob is a single JSON object:
//!
//! ```json
//! {
//!   "data": [["", "", "", "", "", "3"], [null, "12"]],
//!   "currentColumn": 1,
//!   "currentString": 5,
//!   "columnSpacing": 2,
//!   "lineWidth": 72
//! }
//! ```
//!
//! Each entry of `data` is a column; a column may list fewer than six strings
//! and any string may be `null`. Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::editing::Session;
use crate::grid::{BOTTOM_STRING, Column, Cursor, EMPTY_COLUMN, Grid, STRING_COUNT};
use crate::layout::{DEFAULT_COLUMN_SPACING, DEFAULT_LINE_WIDTH, LayoutError, LayoutParameters};
use crate::token::Token;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Malformed state JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Column {column} lists {count} strings (max {STRING_COUNT})")]
    TooManyStrings { column: usize, count: usize },
    #[error("Cursor string {0} is out of range")]
    StringOutOfRange(usize),
    #[error("Cursor column {column} is outside a grid of {count} columns")]
    ColumnOutOfRange { column: usize, count: usize },
    #[error("Invalid layout settings: {0}")]
    Layout(#[from] LayoutError),
}

/// Snapshot of grid, cursor and layout settings as stored by the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub data: Vec<Vec<Option<Token>>>,
    #[serde(default)]
    pub current_column: usize,
    #[serde(default = "default_string")]
    pub current_string: usize,
    #[serde(default = "default_column_spacing")]
    pub column_spacing: i64,
    #[serde(default = "default_line_width")]
    pub line_width: i64,
}

fn default_string() -> usize {
    BOTTOM_STRING
}

fn default_column_spacing() -> i64 {
    DEFAULT_COLUMN_SPACING as i64
}

fn default_line_width() -> i64 {
    DEFAULT_LINE_WIDTH as i64
}

impl Default for PersistedState {
    fn default() -> Self {
        Self::from_session(&Session::default())
    }
}

impl PersistedState {
    pub fn from_session(session: &Session) -> Self {
        let data = session
            .grid()
            .columns()
            .iter()
            .map(|column| column.iter().copied().map(Some).collect())
            .collect();
        let cursor = session.cursor();
        let params = session.params();

        Self {
            data,
            current_column: cursor.column,
            current_string: cursor.string,
            column_spacing: params.column_spacing() as i64,
            line_width: params.line_width() as i64,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validate and rebuild a session
    pub fn into_session(self) -> Result<Session, StateError> {
        if self.current_string > BOTTOM_STRING {
            return Err(StateError::StringOutOfRange(self.current_string));
        }
        let params = LayoutParameters::new(self.column_spacing, self.line_width)?;
        let count = self.data.len().max(1);
        if self.current_column >= count {
            return Err(StateError::ColumnOutOfRange {
                column: self.current_column,
                count,
            });
        }

        let mut columns = Vec::with_capacity(self.data.len());
        for (index, stored) in self.data.into_iter().enumerate() {
            if stored.len() > STRING_COUNT {
                return Err(StateError::TooManyStrings {
                    column: index,
                    count: stored.len(),
                });
            }
            let mut column: Column = EMPTY_COLUMN;
            for (string, token) in stored.into_iter().enumerate() {
                column[string] = token.unwrap_or(Token::EMPTY);
            }
            columns.push(column);
        }

        Ok(Session::from_parts(
            Grid::from_columns(columns),
            Cursor::new(self.current_column, self.current_string),
            params,
        ))
    }
}

impl Session {
    /// Rebuild a session from a stored blob, falling back to a fresh session
    /// with `defaults` when the blob is absent or malformed
    pub fn restore_or_default(json: Option<&str>, defaults: LayoutParameters) -> Session {
        let Some(json) = json else {
            return Session::new(defaults);
        };
        match PersistedState::from_json(json).and_then(PersistedState::into_session) {
            Ok(session) => session,
            Err(err) => {
                log::warn!("Ignoring stored state: {err}");
                Session::new(defaults)
            }
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState::from_session(self)
    }
}
