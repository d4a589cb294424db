pub mod cursor_map;
pub mod editing;
pub mod grid;
pub mod io;
pub mod layout;
pub mod persist;
pub mod token;

// Re-export key types for easier usage
pub use cursor_map::{DisplayLine, Highlight, annotate, map_cursor};
pub use editing::{Action, Outcome, Session};
pub use grid::{BOTTOM_STRING, Column, Cursor, Grid, STRING_COUNT, STRING_NAMES};
pub use layout::{
    CursorSpan, Layout, LayoutError, LayoutParameters, Stave, format_tab, layout, parse_layout_value,
};
pub use persist::{PersistedState, StateError};
pub use token::{Token, TokenError};
