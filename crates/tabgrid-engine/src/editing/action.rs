use crate::layout::LayoutError;

/// A discrete editor action delivered by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveRight,
    MoveLeft,
    MoveUp,
    MoveDown,
    /// At the top string: next column, bottom string. Otherwise: move up.
    Space,
    /// Enter a digit 0-9 at the cursor
    AddDigit(u8),
    /// Remove the last digit of the token under the cursor
    DeleteNote,
    ClearAll,
    SetColumnSpacing(i64),
    SetLineWidth(i64),
}

impl Action {
    /// `AddDigit` for an ASCII digit character
    pub fn digit(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Action::AddDigit(d as u8))
    }
}

/// Result of applying an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Grid, cursor or layout parameters changed
    Changed,
    /// Valid action with no effect (e.g. moving up from the top string)
    Unchanged,
    /// Layout parameter update refused; the previous value is kept
    Rejected(LayoutError),
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed)
    }

    pub(crate) fn from_changed(changed: bool) -> Self {
        if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }
}
