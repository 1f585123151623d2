#![forbid(unsafe_code)]

//! Wrapping, truncation and padding of styled text.
//!
//! Every operation works on display cells, never splits an escape sequence,
//! and never drops one from the kept part of the text:
//! - grapheme clusters stay whole (emoji, ZWJ sequences, combining marks)
//! - CJK characters count as 2 cells
//! - OSC-8 hyperlinks cut by truncation are closed before the ellipsis
//!
//! # Example
//! ```
//! use cellfit_text::reflow::{constrain_text, truncate, wrap_text};
//!
//! let lines = wrap_text("Hello world foo bar", 10);
//! assert_eq!(lines, vec!["Hello", "world foo", "bar"]);
//!
//! assert_eq!(truncate("Hello World", 8), "Hello W…");
//!
//! let out = constrain_text("one two three four", 8, 1);
//! assert!(out.truncated);
//! assert_eq!(out.lines, vec!["one two…"]);
//! ```

use std::borrow::Cow;

use smallvec::SmallVec;
use unicode_segmentation::UnicodeSegmentation;

use crate::escape::{EscapeKind, HYPERLINK_CLOSE, Piece, SGR_RESET, escapes_only, segments};
use crate::width::{display_width, grapheme_width};

/// Ellipsis appended by [`truncate`] and by default in [`ConstrainOptions`].
pub const DEFAULT_ELLIPSIS: &str = "…";

/// Options for [`constrain_with_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstrainOptions {
    /// Maximum line width in cells.
    pub width: usize,
    /// Maximum number of lines kept.
    pub max_lines: usize,
    /// Pad every kept line with spaces up to `width`.
    pub pad: bool,
    /// Marker appended to the last kept line when lines were dropped.
    pub ellipsis: Cow<'static, str>,
}

impl ConstrainOptions {
    /// Create options for a `width` x `max_lines` box.
    #[must_use]
    pub fn new(width: usize, max_lines: usize) -> Self {
        Self {
            width,
            max_lines,
            pad: false,
            ellipsis: Cow::Borrowed(DEFAULT_ELLIPSIS),
        }
    }

    /// Set whether lines are padded to the full width.
    #[must_use]
    pub fn pad(mut self, pad: bool) -> Self {
        self.pad = pad;
        self
    }

    /// Set the truncation marker.
    #[must_use]
    pub fn ellipsis(mut self, ellipsis: impl Into<Cow<'static, str>>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }
}

impl Default for ConstrainOptions {
    fn default() -> Self {
        Self::new(80, usize::MAX)
    }
}

/// Result of [`constrain_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constrained {
    /// The kept lines.
    pub lines: Vec<String>,
    /// Whether wrapping produced more lines than were kept.
    pub truncated: bool,
}

/// Open/closed state of an OSC-8 hyperlink while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    Closed,
    Open,
}

/// A run of visible text (word or whitespace) with the escapes attached to it.
#[derive(Debug)]
struct Token {
    text: String,
    width: usize,
    is_space: bool,
}

/// Wrap text to `width` cells.
///
/// Source lines are split on `\n` and word-wrapped greedily. Words wider than
/// `width` are broken at grapheme boundaries. Trailing spaces are trimmed from
/// each line, and trailing empty lines are dropped. Returns no lines for empty
/// input or a zero width.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("wrap_text", width, bytes = text.len()).entered();

    if width == 0 || text.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        let source_line = source_line.strip_suffix('\r').unwrap_or(source_line);
        wrap_line(source_line, width, &mut lines);
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }

    lines
}

/// Wrap a single source line (no embedded newlines), appending to `lines`.
///
/// Always appends at least one line, so an empty source line becomes a
/// paragraph break.
fn wrap_line(line: &str, width: usize, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_width = 0usize;

    for token in split_tokens(line) {
        if token.is_space {
            if current_width + token.width <= width {
                current.push_str(&token.text);
                current_width += token.width;
            } else {
                // Break at the whitespace; it is swallowed, its escapes are not.
                if current_width > 0 {
                    finish_line(&mut current, lines);
                    current_width = 0;
                }
                current.push_str(&escapes_only(&token.text));
            }
            continue;
        }

        if current_width + token.width <= width {
            current.push_str(&token.text);
            current_width += token.width;
            continue;
        }

        if current_width > 0 {
            finish_line(&mut current, lines);
            current_width = 0;
        }

        if token.width <= width {
            current.push_str(&token.text);
            current_width = token.width;
        } else {
            break_long_token(&token.text, width, &mut current, &mut current_width, lines);
        }
    }

    finish_line(&mut current, lines);
}

/// Split a line into alternating word and whitespace tokens.
///
/// Escapes met inside a word stay with that word. Escapes met in whitespace or
/// before any text attach to the grapheme that follows them, and escapes at the
/// very end attach to the last token.
fn split_tokens(line: &str) -> SmallVec<[Token; 8]> {
    let mut tokens = SmallVec::<[Token; 8]>::new();
    let mut current = String::new();
    let mut current_width = 0usize;
    let mut in_space = false;
    let mut has_visible = false;
    let mut pending = String::new();

    for piece in segments(line) {
        match piece {
            Piece::Escape(span) if has_visible && !in_space => current.push_str(span.raw),
            Piece::Escape(span) => pending.push_str(span.raw),
            Piece::Text(literal) => {
                for grapheme in literal.graphemes(true) {
                    let is_space = grapheme.chars().all(char::is_whitespace);
                    if is_space != in_space && has_visible {
                        tokens.push(Token {
                            text: std::mem::take(&mut current),
                            width: current_width,
                            is_space: in_space,
                        });
                        current_width = 0;
                    }
                    current.push_str(&pending);
                    pending.clear();
                    current.push_str(grapheme);
                    current_width += grapheme_width(grapheme);
                    in_space = is_space;
                    has_visible = true;
                }
            }
        }
    }

    current.push_str(&pending);
    if !current.is_empty() {
        tokens.push(Token {
            text: current,
            width: current_width,
            is_space: in_space && has_visible,
        });
    }

    tokens
}

/// Break a token wider than `width` at grapheme boundaries.
///
/// Full pieces are pushed to `lines`; the remainder stays in `current`.
fn break_long_token(
    token: &str,
    width: usize,
    current: &mut String,
    current_width: &mut usize,
    lines: &mut Vec<String>,
) {
    for piece in segments(token) {
        match piece {
            Piece::Escape(span) => current.push_str(span.raw),
            Piece::Text(literal) => {
                for grapheme in literal.graphemes(true) {
                    let gw = grapheme_width(grapheme);
                    if *current_width + gw > width && *current_width > 0 {
                        finish_line(current, lines);
                        *current_width = 0;
                    }
                    current.push_str(grapheme);
                    *current_width += gw;
                }
            }
        }
    }
}

/// Trim trailing spaces and move the line into `lines`.
fn finish_line(current: &mut String, lines: &mut Vec<String>) {
    let kept = current.trim_end_matches(' ').len();
    current.truncate(kept);
    lines.push(std::mem::take(current));
}

/// Truncate text to `width` cells using [`DEFAULT_ELLIPSIS`].
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    truncate_text(text, width, DEFAULT_ELLIPSIS)
}

/// Truncate text to `width` cells, appending `ellipsis` when anything is cut.
///
/// Text that already fits is returned unchanged. Otherwise the body keeps
/// `width - display_width(ellipsis)` cells and every escape sequence met on
/// the way. A hyperlink still open at the cut is closed, and a style reset is
/// emitted before the ellipsis when the body carries SGR codes.
///
/// When the ellipsis alone is at least `width` cells the body is empty and the
/// ellipsis is appended as is, even if it overflows.
#[must_use]
pub fn truncate_text(text: &str, width: usize, ellipsis: &str) -> String {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("truncate_text", width, bytes = text.len()).entered();

    if display_width(text) <= width {
        return text.to_string();
    }

    let ellipsis_width = display_width(ellipsis);
    let target = width.saturating_sub(ellipsis_width);
    #[cfg(feature = "tracing")]
    {
        if ellipsis_width >= width {
            tracing::trace!(width, ellipsis_width, "ellipsis fills the whole budget");
        }
    }

    let mut out = String::with_capacity(text.len().min(width.saturating_mul(4)) + ellipsis.len() + 16);
    let mut used = 0usize;
    let mut link = LinkState::Closed;
    let mut saw_sgr = false;

    'scan: for piece in segments(text) {
        if used >= target {
            break;
        }
        match piece {
            Piece::Escape(span) => {
                out.push_str(span.raw);
                match span.kind {
                    EscapeKind::Sgr => saw_sgr = true,
                    EscapeKind::HyperlinkOpen => link = LinkState::Open,
                    EscapeKind::HyperlinkClose => link = LinkState::Closed,
                }
            }
            Piece::Text(literal) => {
                for grapheme in literal.graphemes(true) {
                    let gw = grapheme_width(grapheme);
                    if used + gw > target {
                        break 'scan;
                    }
                    out.push_str(grapheme);
                    used += gw;
                }
            }
        }
    }

    if link == LinkState::Open {
        out.push_str(HYPERLINK_CLOSE);
    }
    if saw_sgr {
        out.push_str(SGR_RESET);
    }
    out.push_str(ellipsis);
    out
}

/// Pad text with spaces up to `width` cells. Never truncates.
#[must_use]
pub fn pad_text(text: &str, width: usize) -> String {
    let missing = width.saturating_sub(display_width(text));
    let mut out = String::with_capacity(text.len().saturating_add(missing));
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', missing));
    out
}

/// Wrap text into at most `max_lines` lines of `width` cells.
///
/// Convenience for [`constrain_with_options`] without padding and with the
/// default ellipsis.
#[must_use]
pub fn constrain_text(text: &str, width: usize, max_lines: usize) -> Constrained {
    constrain_with_options(text, &ConstrainOptions::new(width, max_lines))
}

/// Wrap text into a `width` x `max_lines` box.
///
/// When lines are dropped, only the last kept line changes: the ellipsis is
/// appended directly if it fits, otherwise the line is shortened first so the
/// result stays within `width`.
#[must_use]
pub fn constrain_with_options(text: &str, options: &ConstrainOptions) -> Constrained {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "constrain_text",
        width = options.width,
        max_lines = options.max_lines,
        pad = options.pad
    )
    .entered();

    let width = options.width;
    let mut lines = wrap_text(text, width);
    let truncated = lines.len() > options.max_lines;
    lines.truncate(options.max_lines);

    if truncated && let Some(last) = lines.last_mut() {
        let ellipsis = options.ellipsis.as_ref();
        let ellipsis_width = display_width(ellipsis);
        if display_width(last) + ellipsis_width <= width {
            last.push_str(ellipsis);
        } else {
            let mut shortened = truncate_text(last, width.saturating_sub(ellipsis_width), "");
            shortened.push_str(ellipsis);
            *last = shortened;
        }
    }

    if options.pad {
        for line in &mut lines {
            *line = pad_text(line, width);
        }
    }

    #[cfg(feature = "tracing")]
    {
        if truncated {
            tracing::trace!(kept = lines.len(), "dropped wrapped lines beyond max_lines");
        }
    }

    Constrained { lines, truncated }
}
