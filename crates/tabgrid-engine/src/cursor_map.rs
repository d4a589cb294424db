//! Maps the cursor span recorded during layout onto the flat list of output
//! lines, so a presentation layer can highlight one sub-range of one line.

use std::ops::Range;

use crate::grid::STRING_COUNT;
use crate::layout::{Layout, SEPARATOR_LINES};

/// Highlighted character range on one line of the flat output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub line_index: usize,
    pub char_start: usize,
    pub char_end: usize,
}

impl Highlight {
    pub fn range(&self) -> Range<usize> {
        self.char_start..self.char_end
    }
}

/// A rendered line plus an optional highlighted range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub text: String,
    pub highlight: Option<Range<usize>>,
}

impl DisplayLine {
    /// Split into (before, highlighted, after); a line without a highlight is all `before`
    pub fn split(&self) -> (&str, &str, &str) {
        match &self.highlight {
            Some(range) if range.end <= self.text.len() && range.start <= range.end => (
                &self.text[..range.start],
                &self.text[range.clone()],
                &self.text[range.end..],
            ),
            _ => (self.text.as_str(), "", ""),
        }
    }
}

/// Index in the flat output of `string_index` within stave `stave_index`
pub fn line_index(stave_index: usize, string_index: usize) -> usize {
    stave_index * (STRING_COUNT + SEPARATOR_LINES) + string_index
}

/// Locate the cursor highlight, `None` if the layout carries no cursor span
pub fn map_cursor(layout: &Layout) -> Option<Highlight> {
    layout.cursor().map(|span| Highlight {
        line_index: line_index(span.stave_index, span.string_index),
        char_start: span.char_start,
        char_end: span.char_end,
    })
}

/// Flat output lines, with the cursor line annotated
pub fn annotate(layout: &Layout) -> Vec<DisplayLine> {
    let highlight = map_cursor(layout);
    layout
        .lines()
        .into_iter()
        .enumerate()
        .map(|(index, text)| DisplayLine {
            text: text.to_string(),
            highlight: highlight
                .filter(|h| h.line_index == index)
                .map(|h| h.range()),
        })
        .collect()
}
