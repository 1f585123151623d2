#![forbid(unsafe_code)]

//! Escape sequence scanning.
//!
//! Only two sequence shapes are recognized, because they are the only styling
//! forms that must survive wrapping and truncation:
//!
//! - SGR: `ESC [ <digits ; :>* m`
//! - OSC-8 hyperlinks: `ESC ] 8 ; ; <payload> ESC \`
//!
//! Everything else, including other CSI sequences and unterminated OSC
//! strings, is ordinary text. It is neither stripped nor protected.
//!
//! # Example
//! ```
//! use cellfit_text::escape::{scan, strip_ansi, EscapeKind};
//!
//! let text = "\x1b[1mbold\x1b[0m";
//! let spans = scan(text);
//! assert_eq!(spans.len(), 2);
//! assert_eq!(spans[0].kind, EscapeKind::Sgr);
//! assert_eq!(strip_ansi(text), "bold");
//! ```

use std::borrow::Cow;

const ESC: u8 = 0x1b;

/// Resets every SGR attribute.
pub const SGR_RESET: &str = "\x1b[0m";

/// Closes the currently open OSC-8 hyperlink.
pub const HYPERLINK_CLOSE: &str = "\x1b]8;;\x1b\\";

/// The kind of a recognized escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeKind {
    /// Select Graphic Rendition (colors, bold, ...).
    Sgr,
    /// OSC-8 with a non-empty target; the link stays open until closed.
    HyperlinkOpen,
    /// OSC-8 with an empty target.
    HyperlinkClose,
}

/// A recognized escape sequence inside a string.
///
/// `start..end` is a byte range of the scanned text and `raw` is the
/// sequence occupying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeSpan<'a> {
    /// Byte offset of the `ESC` byte.
    pub start: usize,
    /// Byte offset one past the final byte.
    pub end: usize,
    /// The literal sequence.
    pub raw: &'a str,
    /// What the sequence does.
    pub kind: EscapeKind,
}

impl EscapeSpan<'_> {
    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Recognized spans are never empty; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether this span opens or closes a hyperlink.
    #[must_use]
    pub fn is_hyperlink(&self) -> bool {
        matches!(
            self.kind,
            EscapeKind::HyperlinkOpen | EscapeKind::HyperlinkClose
        )
    }
}

/// One piece of a scanned string: literal text or an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Literal text (never empty).
    Text(&'a str),
    /// A recognized escape sequence.
    Escape(EscapeSpan<'a>),
}

/// Iterator over the pieces of a string, in order.
///
/// Concatenating every piece reproduces the input exactly.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        if self.pos >= bytes.len() {
            return None;
        }

        if let Some((len, kind)) = sequence_at(bytes, self.pos) {
            let start = self.pos;
            let end = start + len;
            self.pos = end;
            return Some(Piece::Escape(EscapeSpan {
                start,
                end,
                raw: &self.text[start..end],
                kind,
            }));
        }

        // Literal run up to the next recognized sequence. An ESC that does not
        // start a recognized sequence is part of the literal run.
        let start = self.pos;
        let mut from = start + 1;
        let end = loop {
            match memchr::memchr(ESC, &bytes[from..]) {
                Some(offset) if sequence_at(bytes, from + offset).is_some() => break from + offset,
                Some(offset) => from += offset + 1,
                None => break bytes.len(),
            }
        };
        // Sequences are pure ASCII, so `end` always lands on a char boundary.
        self.pos = end;
        Some(Piece::Text(&self.text[start..end]))
    }
}

/// Split a string into literal text and escape sequences.
#[must_use]
pub fn segments(text: &str) -> Segments<'_> {
    Segments { text, pos: 0 }
}

/// Locate every recognized escape sequence, ordered by `start`.
#[must_use]
pub fn scan(text: &str) -> Vec<EscapeSpan<'_>> {
    if memchr::memchr(ESC, text.as_bytes()).is_none() {
        return Vec::new();
    }

    let spans: Vec<EscapeSpan<'_>> = segments(text)
        .filter_map(|piece| match piece {
            Piece::Escape(span) => Some(span),
            Piece::Text(_) => None,
        })
        .collect();

    debug_assert!(spans.windows(2).all(|w| w[0].end <= w[1].start));
    spans
}

/// Whether the string contains at least one recognized escape sequence.
#[must_use]
pub fn has_escapes(text: &str) -> bool {
    let bytes = text.as_bytes();
    memchr::memchr_iter(ESC, bytes).any(|i| sequence_at(bytes, i).is_some())
}

/// Remove every recognized escape sequence.
///
/// A stray `ESC` left in front of a removed sequence can join the text after
/// it into a new sequence, so stripping repeats until none remain. The result
/// never contains a recognized sequence. Borrows the input when there is
/// nothing to remove.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !has_escapes(text) {
        return Cow::Borrowed(text);
    }

    let mut out = strip_once(text);
    while has_escapes(&out) {
        out = strip_once(&out);
    }
    Cow::Owned(out)
}

fn strip_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for piece in segments(text) {
        if let Piece::Text(literal) = piece {
            out.push_str(literal);
        }
    }
    out
}

/// Keep only the escape sequences of a string, dropping its literal text.
#[must_use]
pub fn escapes_only(text: &str) -> String {
    let mut out = String::new();
    for piece in segments(text) {
        if let Piece::Escape(span) = piece {
            out.push_str(span.raw);
        }
    }
    out
}

/// Recognize a sequence starting at `pos`. Returns its byte length and kind.
fn sequence_at(bytes: &[u8], pos: usize) -> Option<(usize, EscapeKind)> {
    if bytes.get(pos) != Some(&ESC) {
        return None;
    }
    match bytes.get(pos + 1)? {
        b'[' => sgr_len(bytes, pos).map(|len| (len, EscapeKind::Sgr)),
        b']' => osc8_len(bytes, pos),
        _ => None,
    }
}

/// `ESC [ <digits ; :>* m`
fn sgr_len(bytes: &[u8], pos: usize) -> Option<usize> {
    for (i, &b) in bytes[pos + 2..].iter().enumerate() {
        match b {
            b'0'..=b'9' | b';' | b':' => {}
            b'm' => return Some(i + 3),
            _ => return None,
        }
    }
    None
}

/// `ESC ] 8 ; ; <payload> ESC \`
fn osc8_len(bytes: &[u8], pos: usize) -> Option<(usize, EscapeKind)> {
    let body = bytes.get(pos + 2..)?;
    if !body.starts_with(b"8;;") {
        return None;
    }
    let payload_start = pos + 5;
    let mut i = payload_start;
    while i < bytes.len() {
        if bytes[i] == ESC {
            if bytes.get(i + 1) == Some(&b'\\') {
                let kind = if i == payload_start {
                    EscapeKind::HyperlinkClose
                } else {
                    EscapeKind::HyperlinkOpen
                };
                return Some((i + 2 - pos, kind));
            }
            // Any other ESC inside the payload makes the sequence malformed.
            return None;
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK_OPEN: &str = "\x1b]8;;https://example.com\x1b\\";

    #[test]
    fn scan_plain_text_is_empty() {
        assert!(scan("hello world").is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn scan_sgr_offsets() {
        let text = "a\x1b[31mb\x1b[0m";
        let spans = scan(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].start, 1);
        assert_eq!(spans[0].end, 6);
        assert_eq!(spans[0].raw, "\x1b[31m");
        assert_eq!(spans[1].raw, SGR_RESET);
        assert!(spans.iter().all(|s| s.kind == EscapeKind::Sgr));
    }

    #[test]
    fn scan_sgr_with_colon_params() {
        let spans = scan("\x1b[38:2:255:0:0mred");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].raw, "\x1b[38:2:255:0:0m");
    }

    #[test]
    fn scan_bare_sgr() {
        let spans = scan("\x1b[m");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].len(), 3);
    }

    #[test]
    fn scan_hyperlink_open_and_close() {
        let text = format!("{LINK_OPEN}site{HYPERLINK_CLOSE}");
        let spans = scan(&text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].kind, EscapeKind::HyperlinkOpen);
        assert_eq!(spans[0].raw, LINK_OPEN);
        assert_eq!(spans[1].kind, EscapeKind::HyperlinkClose);
        assert!(spans[1].is_hyperlink());
    }

    #[test]
    fn other_csi_is_literal() {
        // Cursor movement is not a styling sequence.
        assert!(scan("\x1b[2Jclear").is_empty());
        assert_eq!(strip_ansi("\x1b[2Jclear"), "\x1b[2Jclear");
    }

    #[test]
    fn unterminated_sequences_are_literal() {
        assert!(scan("\x1b[31").is_empty());
        assert!(scan("\x1b]8;;https://x").is_empty());
        assert!(scan("\x1b").is_empty());
    }

    #[test]
    fn osc_with_params_is_literal() {
        // Only the empty-params form is recognized.
        assert!(scan("\x1b]8;id=1;https://x\x1b\\").is_empty());
    }

    #[test]
    fn bel_terminated_osc8_is_literal() {
        assert!(scan("\x1b]8;;https://x\x07").is_empty());
    }

    #[test]
    fn stray_esc_before_sequence() {
        let text = "\x1b\x1b[1mx";
        let spans = scan(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 1);
        assert_eq!(strip_ansi(text), "\x1bx");
    }

    #[test]
    fn segments_reassemble_input() {
        let text = format!("pre\x1b[1m{LINK_OPEN}mid{HYPERLINK_CLOSE}\x1b[0mpost");
        let rebuilt: String = segments(&text)
            .map(|piece| match piece {
                Piece::Text(t) => t.to_string(),
                Piece::Escape(span) => span.raw.to_string(),
            })
            .collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn segments_keep_multibyte_text_intact() {
        let pieces: Vec<_> = segments("你\x1b[1m好").collect();
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[0], Piece::Text("你"));
        assert_eq!(pieces[2], Piece::Text("好"));
    }

    #[test]
    fn strip_borrows_when_clean() {
        assert!(matches!(strip_ansi("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn strip_removes_all_spans() {
        let text = format!("\x1b[1;32m{LINK_OPEN}ok{HYPERLINK_CLOSE}\x1b[0m");
        assert_eq!(strip_ansi(&text), "ok");
    }

    #[test]
    fn escapes_only_drops_text() {
        assert_eq!(escapes_only("a\x1b[1mb c\x1b[0m"), "\x1b[1m\x1b[0m");
    }

    #[test]
    fn strip_removes_sequences_formed_by_stripping() {
        let text = "\x1b\x1b[1m[31mX";
        assert_eq!(strip_ansi(text), "X");
        assert_eq!(strip_ansi("\x1b\x1b[0m]8;;\x1b[1m\x1b\\ok"), "ok");
    }

    #[test]
    fn has_escapes_detects_recognized_only() {
        assert!(has_escapes("x\x1b[0m"));
        assert!(!has_escapes("x\x1b[5A"));
    }
}
