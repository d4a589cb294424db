use crate::cursor_map::{self, DisplayLine, Highlight};
use crate::editing::{Action, Outcome};
use crate::grid::{BOTTOM_STRING, Cursor, Grid};
use crate::layout::{self, Layout, LayoutError, LayoutParameters};
use crate::token::Token;

/// One editing session: the grid, the cursor and the layout settings.
///
/// Constructed by the host and passed by reference to whatever needs it. All
/// mutation goes through [`Session::apply`] or the named operations it
/// dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    grid: Grid,
    cursor: Cursor,
    params: LayoutParameters,
}

impl Session {
    /// Empty grid, cursor at (0, bottom string)
    pub fn new(params: LayoutParameters) -> Self {
        Self {
            grid: Grid::new(),
            cursor: Cursor::default(),
            params,
        }
    }

    /// Assemble a session from restored parts.
    ///
    /// The cursor is clamped into the grid: its string to the bottom string and
    /// its column to the last column.
    pub fn from_parts(grid: Grid, cursor: Cursor, params: LayoutParameters) -> Self {
        let last_column = grid.column_count().saturating_sub(1);
        let cursor = Cursor::new(
            cursor.column.min(last_column),
            cursor.string.min(BOTTOM_STRING),
        );
        Self {
            grid,
            cursor,
            params,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn params(&self) -> &LayoutParameters {
        &self.params
    }

    /// Token under the cursor
    pub fn current_token(&self) -> Token {
        self.grid.get_token(self.cursor.column, self.cursor.string)
    }

    pub fn apply(&mut self, action: Action) -> Outcome {
        log::debug!("applying {action:?} at {:?}", self.cursor);
        match action {
            Action::MoveRight => Outcome::from_changed(self.move_right()),
            Action::MoveLeft => Outcome::from_changed(self.move_left()),
            Action::MoveUp => Outcome::from_changed(self.move_up()),
            Action::MoveDown => Outcome::from_changed(self.move_down()),
            Action::Space => Outcome::from_changed(self.space()),
            Action::AddDigit(digit) => Outcome::from_changed(self.add_digit(digit)),
            Action::DeleteNote => Outcome::from_changed(self.delete_note()),
            Action::ClearAll => Outcome::from_changed(self.clear_all()),
            Action::SetColumnSpacing(value) => self.update_params(|p| p.set_column_spacing(value)),
            Action::SetLineWidth(value) => self.update_params(|p| p.set_line_width(value)),
        }
    }

    /// Advance one column, growing the grid by exactly one column when needed
    pub fn move_right(&mut self) -> bool {
        self.cursor.column += 1;
        if self.cursor.column >= self.grid.column_count() {
            self.grid.push_empty_column();
        }
        true
    }

    /// Step back one column and prune empty columns right of the cursor
    pub fn move_left(&mut self) -> bool {
        if self.cursor.column == 0 {
            return false;
        }
        self.cursor.column -= 1;
        self.grid.truncate_trailing_empty(self.cursor.column + 1);
        true
    }

    pub fn move_up(&mut self) -> bool {
        if self.cursor.string == 0 {
            return false;
        }
        self.cursor.string -= 1;
        true
    }

    pub fn move_down(&mut self) -> bool {
        if self.cursor.string >= BOTTOM_STRING {
            return false;
        }
        self.cursor.string += 1;
        true
    }

    /// Finish the column from the top string, otherwise climb one string
    pub fn space(&mut self) -> bool {
        if self.cursor.string == 0 {
            self.move_right();
            self.cursor.string = BOTTOM_STRING;
            true
        } else {
            self.move_up()
        }
    }

    pub fn add_digit(&mut self, digit: u8) -> bool {
        let current = self.current_token();
        let Some(next) = enter_digit(current, digit) else {
            log::debug!("ignoring non-digit value {digit}");
            return false;
        };
        self.set_current(next);
        next != current
    }

    /// Drop the last character of the token under the cursor
    pub fn delete_note(&mut self) -> bool {
        let current = self.current_token();
        if current.is_empty() {
            return false;
        }
        self.set_current(current.truncated());
        true
    }

    /// Reset to one empty column with the cursor at (0, bottom string); layout settings survive
    pub fn clear_all(&mut self) -> bool {
        let cleared = Session::new(self.params);
        if *self == cleared {
            return false;
        }
        *self = cleared;
        true
    }

    /// Layout of the current grid with the cursor cell tracked
    pub fn layout(&self) -> Layout {
        layout::layout(&self.grid, &self.params, Some(self.cursor))
    }

    pub fn highlight(&self) -> Option<Highlight> {
        cursor_map::map_cursor(&self.layout())
    }

    /// Output lines for the presentation layer, cursor line annotated
    pub fn render(&self) -> Vec<DisplayLine> {
        cursor_map::annotate(&self.layout())
    }

    /// Plain formatted tablature for the clipboard
    pub fn formatted_text(&self) -> String {
        layout::format_tab(&self.grid, &self.params)
    }

    fn set_current(&mut self, token: Token) {
        self.grid
            .set_token(self.cursor.column, self.cursor.string, token);
    }

    fn update_params(
        &mut self,
        update: impl FnOnce(&mut LayoutParameters) -> Result<(), LayoutError>,
    ) -> Outcome {
        let before = self.params;
        match update(&mut self.params) {
            Ok(()) => Outcome::from_changed(self.params != before),
            Err(err) => {
                log::warn!("rejected layout update: {err}");
                Outcome::Rejected(err)
            }
        }
    }
}

/// Token produced by typing `digit` over `current`.
///
/// A lone `0` or a full two-digit token is overwritten, a single non-zero digit
/// is extended, an empty cell takes the digit. `None` if `digit` is not 0-9.
pub fn enter_digit(current: Token, digit: u8) -> Option<Token> {
    if current.len() == 1 && !current.is_zero() {
        current.appended(digit)
    } else {
        Token::from_digit(digit)
    }
}
