//! Locates the object literal assigned to `module.exports` inside a text file.
//!
//! # Brace matching (for beginners)
//!
//! The config file is hand-written JavaScript, so the object we want may be
//! followed by a `;`, comments, or even more code.  To find exactly where the
//! object ends we walk forward from its opening `{` keeping a *depth* counter:
//!
//! ```text
//! module.exports = { mqtt: { host: "a" }, devices: [ { id: "x" } ] };
//!                  1       2          1            2          1   0
//!                  ^ start                                        ^ end
//! ```
//!
//! Every `{` increments the depth, every `}` decrements it, and the span ends
//! at the brace that brings the depth back to zero.  Braces that appear inside
//! string literals or comments are skipped, so a password such as `"p}ss"`
//! cannot end the span early.
//!
//! If the depth never returns to zero the span runs to the end of the text.
//! The literal parser then reports the truncated object as a syntax error.

/// The exact text that introduces the exported object.
pub const EXPORT_MARKER: &str = "module.exports = {";

/// Returns the `module.exports` object literal, braces included.
///
/// Returns `None` when [`EXPORT_MARKER`] does not occur in `text`.
pub fn extract_object_literal(text: &str) -> Option<&str> {
    let marker = text.find(EXPORT_MARKER)?;
    // The marker ends with the opening brace.
    let open = marker + EXPORT_MARKER.len() - 1;
    let end = find_matching_brace(text, open).map_or(text.len(), |close| close + 1);
    Some(&text[open..end])
}

/// Returns the byte index of the `}` that closes the `{` at `open`.
///
/// `None` means the text ended before the depth returned to zero.
pub fn find_matching_brace(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut state = ScanState::Code;
    let mut i = open;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            ScanState::Code => match b {
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                b'"' | b'\'' | b'`' => state = ScanState::Quoted(b),
                b'/' if next == Some(b'/') => {
                    state = ScanState::LineComment;
                    i += 1;
                }
                b'/' if next == Some(b'*') => {
                    state = ScanState::BlockComment;
                    i += 1;
                }
                _ => {}
            },
            ScanState::Quoted(quote) => match b {
                // Skip whatever the backslash escapes, including a quote.
                b'\\' => i += 1,
                _ if b == quote => state = ScanState::Code,
                _ => {}
            },
            ScanState::LineComment => {
                if b == b'\n' {
                    state = ScanState::Code;
                }
            }
            ScanState::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    state = ScanState::Code;
                    i += 1;
                }
            }
        }
        i += 1;
    }
    None
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Code,
    Quoted(u8),
    LineComment,
    BlockComment,
}
