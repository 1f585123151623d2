#![forbid(unsafe_code)]

//! Display width measurement for styled strings.
//!
//! Widths are computed per grapheme cluster over the literal text of a
//! string; recognized escape sequences contribute nothing. Cell widths come
//! from the `unicode-width` tables.
//!
//! # Example
//! ```
//! use cellfit_text::width::display_width;
//!
//! assert_eq!(display_width("hello"), 5);
//! assert_eq!(display_width("你好"), 4);
//! assert_eq!(display_width("\x1b[31mred\x1b[0m"), 3);
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::escape::{Piece, segments, strip_ansi};

/// Rendered width of a string in terminal cells, ignoring escape sequences.
///
/// Measures the text left by [`strip_ansi`], so
/// `display_width(strip_ansi(s)) == display_width(s)` for every `s`.
#[must_use]
pub fn display_width(text: &str) -> usize {
    literal_width(&strip_ansi(text))
}

/// Width of text known to contain no escape sequences.
#[inline]
#[must_use]
pub(crate) fn literal_width(text: &str) -> usize {
    if let Some(width) = ascii_width(text) {
        return width;
    }
    text.graphemes(true).map(grapheme_width).sum()
}

/// Width of a single grapheme cluster.
///
/// Multi-codepoint emoji clusters (ZWJ sequences, presentation selectors,
/// skin-tone modifiers) occupy one 2-cell unit.
#[inline]
#[must_use]
pub fn grapheme_width(grapheme: &str) -> usize {
    if let Some(width) = ascii_width(grapheme) {
        return width;
    }
    let width = grapheme.width();
    if width > 2 || (width > 0 && is_emoji_cluster(grapheme)) {
        return 2;
    }
    width
}

/// Whether any grapheme in the literal text is wider than one cell.
#[must_use]
pub fn has_wide_chars(text: &str) -> bool {
    segments(text).any(|piece| match piece {
        Piece::Text(literal) => literal.graphemes(true).any(|g| grapheme_width(g) > 1),
        Piece::Escape(_) => false,
    })
}

/// Fast path: every byte is printable ASCII.
#[inline]
fn ascii_width(text: &str) -> Option<usize> {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        Some(text.len())
    } else {
        None
    }
}

#[inline]
fn is_emoji_cluster(grapheme: &str) -> bool {
    let mut chars = grapheme.chars();
    if chars.next().is_none() || chars.next().is_none() {
        return false;
    }
    grapheme.chars().any(|c| {
        let u = c as u32;
        // ZWJ, VS16, skin-tone modifiers, pictographs.
        u == 0x200D
            || u == 0xFE0F
            || (0x1F3FB..=0x1F3FF).contains(&u)
            || (0x1F000..=0x1FAFF).contains(&u)
    })
}
