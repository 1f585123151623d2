#![forbid(unsafe_code)]

//! cellfit public facade crate.
//!
//! Re-exports the text and layout crates and offers a prelude for day-to-day
//! use. Every function here is total: widths and heights are `usize`, and
//! degenerate inputs produce empty or clamped results instead of errors.
//!
//! # Example
//! ```
//! use cellfit::prelude::*;
//!
//! let widths = distribute_space(40, &[FlexItem::fixed(10), FlexItem::new()], 1);
//! assert_eq!(widths, vec![10, 29]);
//!
//! let cell = constrain_text("a long description that will not fit", widths[1], 1);
//! assert!(cell.truncated);
//! assert!(display_width(&cell.lines[0]) <= widths[1]);
//! ```

// --- Text re-exports -------------------------------------------------------

pub use cellfit_text::escape;
pub use cellfit_text::reflow;
pub use cellfit_text::width;
pub use cellfit_text::{
    ConstrainOptions, Constrained, DEFAULT_ELLIPSIS, EscapeKind, EscapeSpan, constrain_text,
    constrain_with_options, display_width, grapheme_width, has_escapes, has_wide_chars, pad_text,
    scan, segments, strip_ansi, truncate, truncate_text, wrap_text,
};

// --- Layout re-exports -----------------------------------------------------

pub use cellfit_layout::scroll;
pub use cellfit_layout::{
    FlexItem, FlexRow, ScrollConfig, ScrollWindow, Slot, VisibleItem, calculate_scroll_state,
    calculate_scroll_state_with, distribute_space,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ConstrainOptions, Constrained, FlexItem, FlexRow, ScrollConfig, ScrollWindow,
        calculate_scroll_state, calculate_scroll_state_with, constrain_text,
        constrain_with_options, display_width, distribute_space, pad_text, strip_ansi, truncate,
        truncate_text, wrap_text,
    };
}
