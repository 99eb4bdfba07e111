//! UI / rendering layer — everything that touches Ratatui widgets.
//!
//! Prompt state and key handling live in [`prompt`]; the widgets in
//! [`popup`] only read that state and draw it.  No process or filesystem
//! I/O happens here.

pub mod layout;
pub mod popup;
pub mod prompt;
pub mod theme;
