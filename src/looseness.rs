//! List-looseness resolution.
//!
//! A list is loose when any of its items are separated by a blank line, or
//! when an item contains two block-level elements separated by a blank line
//! (transitively through nested containers, but not across an inner list's
//! own boundary). Loose lists wrap item content in `<p>` tags.
//!
//! The resolver scans forward from the list-start token over the flat
//! stream, tracking the depth of nested list/block-quote containers so that
//! only the measured list's own item boundaries count. CommonMark's own
//! list-tightness examples are the ground truth for this algorithm; a
//! couple of deliberate edge cases are called out inline.

use rustc_hash::FxHashMap;

use crate::scan;
use crate::token::Token;

/// Decide whether the list starting at `list_index` renders loose.
///
/// The result is recorded in `looseness` under `list_index` so that
/// [`reset_list_looseness`] can recover it when an inner container closes.
pub fn calculate_list_looseness(
    tokens: &[Token],
    list_index: usize,
    looseness: &mut FxHashMap<usize, bool>,
) -> bool {
    debug_assert!(tokens[list_index].is_list_start());

    let mut is_loose = false;
    let mut stack_count = 0usize;
    let mut index = list_index + 1;

    while index < tokens.len() {
        let token = &tokens[index];
        let mut check_index = None;
        let mut stop = false;

        if token.is_list_start() {
            if stack_count == 0 {
                check_index = Some(index);
            }
            stack_count += 1;
        } else if token.is_new_list_item() {
            if stack_count == 0 {
                check_index = Some(index);
            }
        } else if token.is_block_quote_start() {
            stack_count += 1;
        } else if token.is_block_quote_end() {
            stack_count = stack_count.saturating_sub(1);
        } else if token.is_list_end() {
            if stack_count == 0 {
                // The measured list's own end token.
                stop = true;
            } else {
                stack_count -= 1;
                if stack_count == 0 {
                    check_index = nested_list_end_checkpoint(tokens, index);
                }
            }
        } else if token.is_blank_line() && stack_count == 0 {
            check_index = blank_line_checkpoint(tokens, index);
        }

        if let Some(checkpoint) = check_index {
            if is_token_loose(tokens, checkpoint) {
                is_loose = true;
                stop = true;
            }
        }
        if stop {
            break;
        }
        index += 1;
    }

    looseness.insert(list_index, is_loose);
    is_loose
}

/// When a nested list closes the outermost tracked level, a trailing block
/// in the enclosing item may still make the enclosing list loose. The
/// boundary itself is the checkpoint, unless the very next token closes
/// another list (then the enclosing list ends too and its own end-token
/// handling decides).
fn nested_list_end_checkpoint(tokens: &[Token], end_index: usize) -> Option<usize> {
    let next = scan::skip_link_reference_definitions(tokens, end_index + 1)?;
    if tokens[next].is_list_end() { None } else { Some(end_index) }
}

/// A blank line at the measured level is a checkpoint when it separates two
/// block-level elements. Link reference definitions are invisible here.
fn blank_line_checkpoint(tokens: &[Token], blank_index: usize) -> Option<usize> {
    let next = scan::skip_link_reference_definitions(tokens, blank_index + 1)?;
    if !is_block_start(&tokens[next]) {
        return None;
    }
    if blank_index == 0 || !counts_as_block(&tokens[blank_index - 1]) {
        return None;
    }
    Some(next)
}

/// Walk backward from a checkpoint to the nearest visible token; the list
/// is loose when that token is a blank line, unless the blank is the very
/// first thing inside an item (immediately after the item's own
/// list-start/new-item marker).
fn is_token_loose(tokens: &[Token], check_index: usize) -> bool {
    let before = scan::previous_visible_index(tokens, check_index);
    if !tokens[before].is_blank_line() || before == 0 {
        return false;
    }
    let before_blank = &tokens[before - 1];
    !(before_blank.is_list_start() || before_blank.is_new_list_item())
}

/// Determine the looseness context that resumes after the container ending
/// at `end_index` closes.
///
/// Scans forward for the enclosing list's end token (nested sibling lists
/// balance out), then walks backward from it to the owning list-start and
/// returns that list's recorded looseness. Running off the end of the
/// stream means no list encloses this point; the resumed context is loose
/// so that top-level paragraphs keep their `<p>` wrappers.
pub fn reset_list_looseness(
    tokens: &[Token],
    end_index: usize,
    looseness: &FxHashMap<usize, bool>,
) -> bool {
    let mut depth = 0usize;
    let mut index = end_index + 1;
    let mut enclosing_end = None;
    while index < tokens.len() {
        let token = &tokens[index];
        if token.is_list_start() {
            depth += 1;
        } else if token.is_list_end() {
            if depth == 0 {
                enclosing_end = Some(index);
                break;
            }
            depth -= 1;
        }
        index += 1;
    }

    let Some(enclosing_end) = enclosing_end else {
        return true;
    };

    // Backward stack-balanced search for the list-start owning that end.
    let mut balance = 0usize;
    let mut scan_index = enclosing_end;
    while scan_index > 0 {
        scan_index -= 1;
        let token = &tokens[scan_index];
        if token.is_list_end() {
            balance += 1;
        } else if token.is_list_start() {
            if balance == 0 {
                return looseness.get(&scan_index).copied().unwrap_or(false);
            }
            balance -= 1;
        }
    }
    panic!(
        "list end at index {enclosing_end} has no owning list start; token stream is malformed"
    );
}

/// Start tokens that open a block-level element.
fn is_block_start(token: &Token) -> bool {
    use crate::token::TokenKind::*;
    token.is_start()
        && matches!(
            token.kind(),
            ThematicBreak
                | AtxHeading
                | SetextHeading
                | Paragraph
                | BlockQuote
                | IndentedCodeBlock
                | FencedCodeBlock
                | UnorderedList
                | OrderedList
                | NewListItem
                | HtmlBlock
        )
}

/// Block-level for the purposes of the blank-line rule: block starts plus
/// the end tokens that close a block. Blank lines and link reference
/// definitions never count.
fn counts_as_block(token: &Token) -> bool {
    use crate::token::TokenKind::*;
    if is_block_start(token) {
        return true;
    }
    token.is_end()
        && matches!(
            token.kind(),
            AtxHeading
                | SetextHeading
                | Paragraph
                | BlockQuote
                | IndentedCodeBlock
                | FencedCodeBlock
                | UnorderedList
                | OrderedList
                | HtmlBlock
        )
}
