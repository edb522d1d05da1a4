//! Index-arithmetic helpers for locating related tokens in the flat stream.
//!
//! The token sequence is properly nested, so a matching start token always
//! exists for every end token. Callers must uphold that precondition; these
//! helpers panic on violation rather than produce wrong HTML.

use crate::token::{StartToken, Token, TokenKind};

/// Find the start token matched by the end token at `end_index`.
///
/// Walks backward keeping a balance of intervening same-kind end/start
/// pairs, so nested spans of the same kind (emphasis inside emphasis,
/// links inside links) resolve to the correct start.
///
/// Precondition: `tokens[end_index]` is an end token of `kind` and the
/// stream is properly nested up to that point.
pub fn find_matching_start(tokens: &[Token], end_index: usize, kind: TokenKind) -> &StartToken {
    debug_assert!(tokens[end_index].is_end_of(kind));
    let mut balance = 0usize;
    let mut index = end_index;
    while index > 0 {
        index -= 1;
        match &tokens[index] {
            Token::End { kind: k, .. } if *k == kind => balance += 1,
            Token::Start(start) if start.kind() == kind => {
                if balance == 0 {
                    return start;
                }
                balance -= 1;
            }
            _ => {}
        }
    }
    panic!("no matching {kind:?} start token before index {end_index}; token stream is malformed");
}

/// Index of the next token at or after `index` that is not a link
/// reference definition, or `None` when the stream ends first.
pub fn skip_link_reference_definitions(tokens: &[Token], mut index: usize) -> Option<usize> {
    while index < tokens.len() {
        if !tokens[index].is_link_reference_definition() {
            return Some(index);
        }
        index += 1;
    }
    None
}

/// Index of the nearest token before `index` that is not a link reference
/// definition.
///
/// Precondition: such a token exists (`index` is inside a container, so at
/// minimum the container's start token precedes it).
pub fn previous_visible_index(tokens: &[Token], index: usize) -> usize {
    let mut scan = index;
    loop {
        assert!(scan > 0, "no visible token before index {index}");
        scan -= 1;
        if !tokens[scan].is_link_reference_definition() {
            return scan;
        }
    }
}
