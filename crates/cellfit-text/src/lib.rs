#![forbid(unsafe_code)]

//! Cell-width aware text reflow for terminal output.
//!
//! Strings may carry SGR styling (`ESC [ ... m`) and OSC-8 hyperlinks. Both are
//! treated as zero-width and are never split or dropped from the kept text.
//!
//! - [`escape`] - escape sequence scanner and [`strip_ansi`]
//! - [`width`] - grapheme-aware [`display_width`]
//! - [`reflow`] - [`wrap_text`], [`truncate_text`], [`pad_text`], [`constrain_text`]
//!
//! # Example
//! ```
//! use cellfit_text::{constrain_text, display_width, strip_ansi, truncate, wrap_text};
//!
//! let styled = "\x1b[1mHello\x1b[0m world";
//! assert_eq!(strip_ansi(styled), "Hello world");
//! assert_eq!(display_width(styled), 11);
//!
//! assert_eq!(wrap_text("A\n\nB", 20), vec!["A", "", "B"]);
//! assert_eq!(truncate("Hello World", 8), "Hello W…");
//!
//! let boxed = constrain_text("Line1\nLine2\nLine3", 20, 2);
//! assert!(boxed.truncated);
//! assert_eq!(boxed.lines, vec!["Line1", "Line2…"]);
//! ```

pub mod escape;
pub mod reflow;
pub mod width;

pub use escape::{
    EscapeKind, EscapeSpan, HYPERLINK_CLOSE, Piece, SGR_RESET, Segments, has_escapes, scan,
    segments, strip_ansi,
};
pub use reflow::{
    ConstrainOptions, Constrained, DEFAULT_ELLIPSIS, constrain_text, constrain_with_options,
    pad_text, truncate, truncate_text, wrap_text,
};
pub use width::{display_width, grapheme_width, has_wide_chars};
