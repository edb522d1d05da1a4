//! Mutable context threaded through one transformation pass.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::token::Token;

/// Per-pass transformation state.
///
/// Created fresh for every [`crate::GfmTransformer::transform`] call and
/// discarded afterward; it lives exactly as long as the single
/// left-to-right pass over the token slice.
pub struct TransformState<'a> {
    /// The full token sequence, read-only.
    pub actual_tokens: &'a [Token],
    /// Cursor into the sequence; advanced by one per loop iteration.
    pub actual_token_index: usize,
    /// Token at `actual_token_index + 1`, recomputed each iteration.
    pub next_token: Option<&'a Token>,
    /// Token processed in the previous iteration.
    pub last_token: Option<&'a Token>,
    /// Text a handler wants appended after the deferred-splice step.
    pub add_trailing_text: Option<&'static str>,
    /// Text a handler wants prepended before the next content.
    pub add_leading_text: Option<String>,
    /// Save points for deferred container wrappers: when leading text is
    /// injected the accumulated output is pushed here and rendering starts
    /// over on an empty string; the matching trailing text pops and
    /// recombines.
    pub transform_stack: SmallVec<[String; 4]>,
    /// Computed looseness per list-start token index, written once by the
    /// looseness resolver when the list starts rendering.
    pub list_looseness: FxHashMap<usize, bool>,
    pub is_in_code_block: bool,
    pub is_in_fenced_code_block: bool,
    pub is_in_html_block: bool,
    pub is_in_setext_block: bool,
    /// Whether paragraphs currently render with `<p>` wrappers. Starts
    /// `true`: top-level paragraphs always get them; tight lists turn the
    /// flag off for their items.
    pub is_in_loose_list: bool,
}

impl<'a> TransformState<'a> {
    pub fn new(actual_tokens: &'a [Token]) -> Self {
        Self {
            actual_tokens,
            actual_token_index: 0,
            next_token: None,
            last_token: None,
            add_trailing_text: None,
            add_leading_text: None,
            transform_stack: SmallVec::new(),
            list_looseness: FxHashMap::default(),
            is_in_code_block: false,
            is_in_fenced_code_block: false,
            is_in_html_block: false,
            is_in_setext_block: false,
            is_in_loose_list: true,
        }
    }

    /// Token processed immediately before the current one, if any.
    pub fn previous_token(&self) -> Option<&'a Token> {
        self.actual_token_index
            .checked_sub(1)
            .map(|index| &self.actual_tokens[index])
    }
}
