//! # Edit Operations
//!
//! Cursor navigation and token editing over a [`Session`].
//!
//! Input arrives as a closed set of [`Action`]s, independent of whatever device
//! or key binding produced them. [`Session::apply`] runs one action to
//! completion and reports an [`Outcome`]; the host re-renders and persists
//! after every `Changed` outcome.
//!
//! ## Column growth and cleanup
//!
//! The grid grows lazily one column ahead of the cursor on `MoveRight`. Moving
//! left prunes trailing empty columns strictly right of the cursor, stopping at
//! the first column holding a note, so leftward navigation never leaves a tail
//! of blank columns behind.
//!
//! ## Digit entry
//!
//! Two keystrokes build a two-digit fret (`1`, `2` → `12`). A full token or a
//! lone `0` is overwritten by the next digit instead of extended.

pub mod action;
pub mod session;

pub use action::{Action, Outcome};
pub use session::{Session, enter_digit};
