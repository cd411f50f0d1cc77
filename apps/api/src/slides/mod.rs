//! Slide deck planning: page order operations and run-level text edits.
//!
//! The deck itself lives in the presentation file; this module works on an
//! explicit order of slide ids and a text outline, so callers can preview and
//! validate a plan before touching the file.

pub mod handlers;
pub mod order;
pub mod text;

pub use order::{Slide, SlideOp, SlideOrder, SlideOrderError};
pub use text::{
    replace_in_deck, replace_per_slide, set_runs, PageReplacements, Replacement, RunEdit,
    SlideText, SlideTextError,
};
