//! # Tablature Layout Engine
//!
//! Turns a [`Grid`] plus [`LayoutParameters`] into fixed-width ASCII staves.
//!
//! Each stave is six lines, one per string, every line opening with the
//! `"<label>|--"` prefix. Columns are laid out left to right as *segments*:
//! the token text (or a single `-` for an empty cell) followed by dash fill.
//!
//! ```text
//! E|-----------
//! B|-----------
//! G|-----------
//! D|-----------
//! A|-----12----
//! E|--3--------
//! ```
//!
//! ## Wrapping
//!
//! The column boundary of a stave is decided on the top string and reused for
//! the other five, so a stave is always rectangular in columns. A column whose
//! segment would push the line past `line_width` starts the next stave, unless it
//! is the first column on the line (a stave always places at least one column).
//! Staves cut short by width are padded with dashes to exactly `line_width`;
//! the final stave keeps its natural length.
//!
//! ## Cursor tracking
//!
//! When a cursor cell is supplied the engine records the character span of
//! that cell while laying it out. The [`crate::cursor_map`] module turns that span
//! into a highlight on the flat output.

pub mod params;

pub use params::{
    DEFAULT_COLUMN_SPACING, DEFAULT_LINE_WIDTH, LayoutError, LayoutParameters, MAX_COLUMN_SPACING,
    MAX_LINE_WIDTH, parse_layout_value,
};

use crate::grid::{Cursor, Grid, STRING_COUNT, STRING_NAMES};
use crate::token::Token;

/// Width of the `E|--` prefix opening every line
pub const LABEL_PREFIX_WIDTH: usize = 4;

/// Blank lines emitted between consecutive staves
pub const SEPARATOR_LINES: usize = 2;

/// Fill applied after the very last grid column, regardless of spacing
const LAST_COLUMN_FILL: usize = 2;

const PLACEHOLDER: &str = "-";

/// Character span of the cursor cell inside one rendered stave line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSpan {
    pub stave_index: usize,
    pub string_index: usize,
    pub char_start: usize,
    pub char_end: usize,
}

/// One horizontal block of six lines covering columns `start_column..end_column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stave {
    pub start_column: usize,
    pub end_column: usize,
    /// True when the stave ended because of `line_width` rather than the grid ending
    pub truncated: bool,
    pub lines: Vec<String>,
}

/// Output of the layout engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    staves: Vec<Stave>,
    cursor: Option<CursorSpan>,
}

impl Layout {
    pub fn staves(&self) -> &[Stave] {
        &self.staves
    }

    /// Span of the annotated cursor cell, if one was requested and is in range
    pub fn cursor(&self) -> Option<CursorSpan> {
        self.cursor
    }

    /// Flat output: stave lines in order with blank separator lines between staves
    pub fn lines(&self) -> Vec<&str> {
        let mut lines = Vec::with_capacity(self.line_count());
        for (index, stave) in self.staves.iter().enumerate() {
            if index > 0 {
                lines.extend(std::iter::repeat_n("", SEPARATOR_LINES));
            }
            lines.extend(stave.lines.iter().map(String::as_str));
        }
        lines
    }

    pub fn line_count(&self) -> usize {
        let staves = self.staves.len();
        staves * STRING_COUNT + staves.saturating_sub(1) * SEPARATOR_LINES
    }

    /// Plain text export: one rendered line per output line, no trailing newline
    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

/// Lay out `grid`, optionally recording the span of the `cursor` cell
pub fn layout(grid: &Grid, params: &LayoutParameters, cursor: Option<Cursor>) -> Layout {
    let column_count = grid.column_count();
    let mut staves = Vec::new();
    let mut cursor_span = None;
    let mut line_start = 0;

    loop {
        let stave_index = staves.len();
        let (line_end, truncated) = stave_boundary(grid, params, line_start);
        let mut lines = Vec::with_capacity(STRING_COUNT);
        let capacity =
            LABEL_PREFIX_WIDTH + (line_end - line_start) * (params.column_spacing() + 2);

        for (string, label) in STRING_NAMES.iter().enumerate() {
            let mut line = String::with_capacity(capacity);
            line.push_str(label);
            line.push_str("|--");

            for col in line_start..line_end {
                let token = grid.get_token(col, string);
                let display = note_display(&token);
                let char_start = line.len();
                line.push_str(display);
                let fill = fill_width(display.len(), col + 1 == column_count, params);
                line.extend(std::iter::repeat_n('-', fill));

                if cursor == Some(Cursor::new(col, string)) {
                    cursor_span = Some(CursorSpan {
                        stave_index,
                        string_index: string,
                        char_start,
                        char_end: char_start + display.len(),
                    });
                }
            }

            if truncated && line.len() < params.line_width() {
                let padding = params.line_width() - line.len();
                line.extend(std::iter::repeat_n('-', padding));
            }
            lines.push(line);
        }

        staves.push(Stave {
            start_column: line_start,
            end_column: line_end,
            truncated,
            lines,
        });

        line_start = line_end;
        if line_start >= column_count {
            break;
        }
    }

    log::debug!(
        "laid out {column_count} columns into {} staves (spacing {}, width {})",
        staves.len(),
        params.column_spacing(),
        params.line_width()
    );

    Layout {
        staves,
        cursor: cursor_span,
    }
}

/// Formatted tablature with no cursor annotation, ready for the clipboard
pub fn format_tab(grid: &Grid, params: &LayoutParameters) -> String {
    layout(grid, params, None).to_text()
}

/// Find where the stave starting at `line_start` ends, measured on the top string.
///
/// Returns the first column not placed and whether the stave was cut by width.
fn stave_boundary(grid: &Grid, params: &LayoutParameters, line_start: usize) -> (usize, bool) {
    let column_count = grid.column_count();
    let mut position = LABEL_PREFIX_WIDTH;

    for col in line_start..column_count {
        let token = grid.get_token(col, 0);
        let display = note_display(&token).len();
        let segment = display + fill_width(display, col + 1 == column_count, params);

        if position + segment > params.line_width() && col > line_start {
            return (col, true);
        }
        position += segment;
    }

    (column_count, false)
}

fn note_display(token: &Token) -> &str {
    if token.is_empty() {
        PLACEHOLDER
    } else {
        token.as_str()
    }
}

/// Dash fill after a segment's text; wider tokens eat into the fill
fn fill_width(display_len: usize, is_last_column: bool, params: &LayoutParameters) -> usize {
    let base = if is_last_column {
        LAST_COLUMN_FILL
    } else {
        params.column_spacing()
    };
    base.saturating_sub(display_len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::BOTTOM_STRING;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn token(text: &str) -> Token {
        Token::parse(text).unwrap()
    }

    fn params(spacing: i64, width: i64) -> LayoutParameters {
        LayoutParameters::new(spacing, width).unwrap()
    }

    /// Grid with the given token on the bottom string of every column
    fn bottom_row(tokens: &[&str]) -> Grid {
        let mut grid = Grid::new();
        for (col, text) in tokens.iter().enumerate() {
            grid.set_token(col, BOTTOM_STRING, token(text));
        }
        grid
    }

    #[test]
    fn test_single_column_two_digit_token() {
        let mut grid = Grid::new();
        grid.set_token(0, BOTTOM_STRING, token("12"));

        let layout = layout(&grid, &LayoutParameters::default(), None);

        assert_eq!(
            layout.lines(),
            vec!["E|-----", "B|-----", "G|-----", "D|-----", "A|-----", "E|--12-"]
        );
        assert_eq!(layout.staves().len(), 1);
        assert!(!layout.staves()[0].truncated);
    }

    #[test]
    fn test_empty_grid_renders_one_stave() {
        let layout = layout(&Grid::new(), &LayoutParameters::default(), None);

        assert_eq!(layout.staves().len(), 1);
        assert_eq!(layout.line_count(), 6);
        assert_eq!(layout.lines()[0], "E|-----");
        assert_eq!(layout.lines()[5], "E|-----");
    }

    #[test]
    fn test_mixed_widths_single_stave() {
        let mut grid = Grid::new();
        grid.set_token(0, BOTTOM_STRING, token("3"));
        grid.set_token(1, 4, token("12"));
        grid.push_empty_column();

        let layout = layout(&grid, &LayoutParameters::default(), None);

        assert_eq!(
            layout.lines(),
            vec![
                "E|-----------",
                "B|-----------",
                "G|-----------",
                "D|-----------",
                "A|-----12----",
                "E|--3--------",
            ]
        );
    }

    #[test]
    fn test_column_spacing_applies_to_all_but_last_column() {
        let grid = bottom_row(&["1", "2", "3"]);

        let layout = layout(&grid, &params(4, 72), None);

        assert_eq!(layout.lines()[5], "E|--1----2----3--");
    }

    #[test]
    fn test_wrap_into_multiple_staves() {
        let mut grid = Grid::new();
        grid.set_token(0, BOTTOM_STRING, token("3"));
        grid.set_token(1, 4, token("12"));
        grid.set_token(2, 3, token("0"));
        grid.set_token(3, BOTTOM_STRING, token("7"));

        let layout = layout(&grid, &params(2, 12), None);

        insta::assert_snapshot!(layout.to_text(), @r"
E|----------
B|----------
G|----------
D|----------
A|-----12---
E|--3-------


E|--------
B|--------
G|--------
D|--0-----
A|--------
E|-----7--
");
        assert_eq!(layout.staves()[0].start_column, 0);
        assert_eq!(layout.staves()[0].end_column, 2);
        assert!(layout.staves()[0].truncated);
        assert_eq!(layout.staves()[1].start_column, 2);
        assert_eq!(layout.staves()[1].end_column, 4);
        assert!(!layout.staves()[1].truncated);
    }

    #[rstest]
    #[case(22, 1)]
    #[case(23, 2)]
    #[case(30, 2)]
    #[case(100, 5)]
    fn test_wrap_boundary_at_default_width(#[case] columns: usize, #[case] staves: usize) {
        let tokens = vec!["5"; columns];
        let grid = bottom_row(&tokens);

        let layout = layout(&grid, &LayoutParameters::default(), None);

        assert_eq!(layout.staves().len(), staves);
        for line in layout.lines() {
            assert!(line.len() <= 72, "line too long: {line:?}");
        }
        let placed: usize = layout
            .staves()
            .iter()
            .map(|s| s.end_column - s.start_column)
            .sum();
        assert_eq!(placed, columns);
    }

    #[test]
    fn test_truncated_staves_padded_to_line_width() {
        let tokens = vec!["5"; 30];
        let grid = bottom_row(&tokens);

        let layout = layout(&grid, &LayoutParameters::default(), None);
        let first = &layout.staves()[0];
        let last = &layout.staves()[1];

        assert!(first.truncated);
        assert_eq!(first.end_column, 22);
        assert!(first.lines.iter().all(|line| line.len() == 72));

        assert!(!last.truncated);
        assert!(last.lines.iter().all(|line| line.len() == 4 + 8 * 3));
    }

    #[test]
    fn test_separator_lines_between_staves() {
        let tokens = vec!["5"; 30];
        let layout = layout(&bottom_row(&tokens), &LayoutParameters::default(), None);
        let lines = layout.lines();

        assert_eq!(lines.len(), 14);
        assert_eq!(layout.line_count(), 14);
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "");
        assert!(lines[8].starts_with("E|--"));
        assert!(!layout.to_text().ends_with('\n'));
    }

    #[test]
    fn test_segment_ending_exactly_at_width_is_placed() {
        let grid = bottom_row(&["1", "2", "3"]);

        let layout = layout(&grid, &params(2, 13), None);

        assert_eq!(layout.staves().len(), 1);
        assert!(!layout.staves()[0].truncated);
        assert_eq!(layout.lines()[5], "E|--1--2--3--");
        assert_eq!(layout.lines()[5].len(), 13);

        let narrower = super::layout(&grid, &params(2, 12), None);
        assert_eq!(narrower.staves().len(), 2);
        assert_eq!(narrower.staves()[0].end_column, 2);
    }

    #[test]
    fn test_oversized_first_column_still_placed() {
        let grid = bottom_row(&["12", "3"]);

        let layout = layout(&grid, &params(2, 5), None);

        assert_eq!(layout.staves().len(), 2);
        assert_eq!(layout.staves()[0].end_column, 1);
        assert_eq!(layout.staves()[1].end_column, 2);
    }

    #[test]
    fn test_cursor_span_on_token() {
        let grid = bottom_row(&["3", "12"]);

        let layout = layout(
            &grid,
            &LayoutParameters::default(),
            Some(Cursor::new(1, BOTTOM_STRING)),
        );

        assert_eq!(
            layout.cursor(),
            Some(CursorSpan {
                stave_index: 0,
                string_index: BOTTOM_STRING,
                char_start: 7,
                char_end: 9,
            })
        );
    }

    #[test]
    fn test_cursor_span_on_empty_cell_covers_placeholder() {
        let grid = bottom_row(&["3", "12"]);

        let layout = layout(&grid, &LayoutParameters::default(), Some(Cursor::new(1, 0)));
        let span = layout.cursor().unwrap();

        assert_eq!(span.char_end, span.char_start + 1);
        assert_eq!(&layout.lines()[0][span.char_start..span.char_end], "-");
    }

    #[test]
    fn test_cursor_span_in_later_stave() {
        let tokens = vec!["5"; 30];
        let grid = bottom_row(&tokens);

        let layout = layout(&grid, &LayoutParameters::default(), Some(Cursor::new(25, 3)));

        assert_eq!(
            layout.cursor(),
            Some(CursorSpan {
                stave_index: 1,
                string_index: 3,
                char_start: 13,
                char_end: 14,
            })
        );
    }

    #[test]
    fn test_cursor_outside_grid_has_no_span() {
        let layout = layout(
            &Grid::new(),
            &LayoutParameters::default(),
            Some(Cursor::new(5, 0)),
        );
        assert_eq!(layout.cursor(), None);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let grid = bottom_row(&["1", "12", "0", "7", "24"]);
        let params = params(3, 20);

        assert_eq!(format_tab(&grid, &params), format_tab(&grid, &params));
    }
}
