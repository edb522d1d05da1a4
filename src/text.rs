//! Text resolution helpers.
//!
//! The tokenizer encodes inline substitutions (entity references, backslash
//! escapes) in-band as replacement-marker triples so that the original
//! source form stays recoverable:
//!
//! ```text
//! \u{1} original-source-form \u{2} replacement-to-emit \u{3}
//! ```
//!
//! The transformer consumes the resolved form only. Resolution is a pure
//! function of the text; no state is threaded through.

use memchr::memchr_iter;

/// Opens a replacement-marker triple; the original source form follows.
pub const REPLACEMENT_START: char = '\u{1}';
/// Separates the original source form from the replacement to emit.
pub const REPLACEMENT_MID: char = '\u{2}';
/// Closes a replacement-marker triple.
pub const REPLACEMENT_END: char = '\u{3}';
/// Appended by the tokenizer to the last text token of a force-closed
/// fenced code block.
pub const PARAGRAPH_TERMINATOR: char = '\u{4}';

/// Resolve all replacement-marker triples to their replacement part.
///
/// Text outside markers passes through unchanged, newlines included.
pub fn resolve_all_from_text(text: &str) -> String {
    if !text.contains(REPLACEMENT_START) {
        return text.to_owned();
    }
    let mut resolved = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != REPLACEMENT_START {
            resolved.push(ch);
            continue;
        }
        // Discard the original part, keep the replacement part.
        for skipped in chars.by_ref() {
            if skipped == REPLACEMENT_MID {
                break;
            }
        }
        for kept in chars.by_ref() {
            if kept == REPLACEMENT_END {
                break;
            }
            resolved.push(kept);
        }
    }
    resolved
}

/// Number of `\n` characters in `text`.
pub fn count_newlines_in_text(text: &str) -> usize {
    memchr_iter(b'\n', text.as_bytes()).count()
}

/// Re-interleave a multi-line text token with its per-line trailing
/// whitespace.
///
/// `raw_text` is the unresolved token text (markers intact), `end_whitespace`
/// the unresolved per-line whitespace. Both are resolved here; the line
/// counts of the two resolved strings must agree, except when a replacement
/// part embeds newlines of its own, in which case the raw text is
/// re-segmented so that only source-line newlines split segments.
///
/// Panics if the segment counts still disagree after re-segmentation; that
/// indicates a tokenizer bug, not a recoverable condition.
pub fn reconcile_text_and_whitespace(raw_text: &str, end_whitespace: &str) -> String {
    let resolved_text = resolve_all_from_text(raw_text);
    let resolved_whitespace = resolve_all_from_text(end_whitespace);

    let whitespace_segments: Vec<&str> = resolved_whitespace.split('\n').collect();
    let text_segments: Vec<String> =
        if count_newlines_in_text(&resolved_text) == whitespace_segments.len() - 1 {
            resolved_text.split('\n').map(str::to_owned).collect()
        } else {
            resegment_marked_text(raw_text)
        };

    assert_eq!(
        text_segments.len(),
        whitespace_segments.len(),
        "text/whitespace line counts diverge; tokenizer produced inconsistent token"
    );

    let mut combined = String::with_capacity(resolved_text.len() + resolved_whitespace.len());
    for (index, (text_part, whitespace_part)) in
        text_segments.iter().zip(whitespace_segments.iter()).enumerate()
    {
        if index > 0 {
            combined.push('\n');
        }
        combined.push_str(text_part);
        combined.push_str(whitespace_part);
    }
    combined
}

/// Split marked text into per-source-line segments.
///
/// Newlines inside a replacement part belong to the emitted content, not to
/// the source line structure, so they stay inside the current segment.
/// The original part of each marker is discarded entirely; any newline it
/// carries was never a source line boundary either (the tokenizer only
/// markers intra-line substitutions).
fn resegment_marked_text(raw_text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = raw_text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\n' => segments.push(std::mem::take(&mut current)),
            REPLACEMENT_START => {
                for skipped in chars.by_ref() {
                    if skipped == REPLACEMENT_MID {
                        break;
                    }
                }
                for kept in chars.by_ref() {
                    if kept == REPLACEMENT_END {
                        break;
                    }
                    current.push(kept);
                }
            }
            _ => current.push(ch),
        }
    }
    segments.push(current);
    segments
}
