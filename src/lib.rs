//! tokamark: token-stream to GitHub-Flavored-Markdown HTML transformer
//!
//! Consumes the flat, properly nested token sequence produced by a Markdown
//! tokenizer and assembles GFM-compliant HTML in a single forward pass.
//!
//! # Design principles
//! - No AST: one linear pass over the token slice, with bounded
//!   backward/forward scans at container boundaries
//! - Deferred splice: list wrappers are stashed on a stack until looseness
//!   is known, then recombined around the rendered item content
//! - Closed token enum: handler dispatch is an exhaustive `match`, checked
//!   by the compiler; only extension tokens dispatch through a registry
//! - Contract violations are fatal: an unhandled token kind aborts the
//!   transform instead of producing silently wrong HTML

pub mod escape;
pub mod looseness;
pub mod scan;
pub mod state;
pub mod text;
pub mod token;

pub use looseness::{calculate_list_looseness, reset_list_looseness};
pub use state::TransformState;
pub use text::{count_newlines_in_text, resolve_all_from_text};
pub use token::{ExtensionToken, ListKind, StartToken, Token, TokenKind};

use rustc_hash::FxHashMap;

use text::PARAGRAPH_TERMINATOR;
use token::TokenKind as Kind;

/// Handler for an extension token, with the same shape as the built-in
/// handlers: takes the accumulated HTML, returns the new accumulated HTML.
pub type ExtensionHandler =
    Box<dyn Fn(String, &ExtensionToken, &mut TransformState<'_>) -> String + Send + Sync>;

/// Transform a token sequence to HTML with the default transformer.
///
/// # Example
/// ```
/// use tokamark::{transform, Token, TokenKind};
///
/// let tokens = [
///     Token::atx_heading(1),
///     Token::text("foo"),
///     Token::end(TokenKind::AtxHeading),
/// ];
/// assert_eq!(transform(&tokens), "<h1>foo</h1>");
/// ```
pub fn transform(tokens: &[Token]) -> String {
    GfmTransformer::new().transform(tokens)
}

/// Token-to-HTML transformer.
///
/// Holds only the extension-handler registry; all per-pass state lives in a
/// fresh [`TransformState`], so one transformer can process any number of
/// independent token sequences.
pub struct GfmTransformer {
    extension_handlers: FxHashMap<String, ExtensionHandler>,
}

impl GfmTransformer {
    /// Create a transformer with the built-in extension handlers
    /// registered (front matter renders nothing).
    pub fn new() -> Self {
        let mut transformer = Self {
            extension_handlers: FxHashMap::default(),
        };
        transformer.register_extension("front-matter", Box::new(|output, _token, _state| output));
        transformer
    }

    /// Register a handler for an extension token name.
    ///
    /// Panics when the name is empty or already registered; both indicate a
    /// programming error at the registration call site.
    pub fn register_extension(&mut self, name: &str, handler: ExtensionHandler) {
        assert!(!name.is_empty(), "extension name must be non-empty");
        let previous = self.extension_handlers.insert(name.to_owned(), handler);
        assert!(
            previous.is_none(),
            "extension handler for {name:?} registered twice"
        );
    }

    /// Transform `tokens` into a single HTML string.
    ///
    /// The output uses `\n` as the sole line terminator and never ends in a
    /// trailing newline. Panics on a token the transformer has no handler
    /// for; by the time tokens reach this stage they are assumed
    /// well-formed, so that is a tokenizer/transformer version skew, not an
    /// input error.
    pub fn transform(&self, tokens: &[Token]) -> String {
        let mut state = TransformState::new(tokens);
        let mut output = String::with_capacity(tokens.len() * 16);

        for index in 0..tokens.len() {
            state.actual_token_index = index;
            state.next_token = tokens.get(index + 1);
            state.add_leading_text = None;
            state.add_trailing_text = None;

            let token = &tokens[index];
            output = match token {
                Token::Start(start) => self.dispatch_start(output, start, &mut state),
                Token::End { kind, forced } => dispatch_end(output, *kind, *forced, &mut state),
            };

            if state.add_trailing_text.is_some() {
                output = apply_trailing_text(output, &mut state);
            }
            if state.add_leading_text.is_some() {
                output = apply_leading_text(output, &mut state);
            }
            state.last_token = Some(token);
        }

        if output.ends_with('\n') {
            output.pop();
        }
        output
    }

    fn dispatch_start(
        &self,
        output: String,
        start: &StartToken,
        state: &mut TransformState<'_>,
    ) -> String {
        match start {
            StartToken::ThematicBreak => handle_thematic_break(output),
            StartToken::AtxHeading { hash_count } => {
                handle_atx_heading_start(output, *hash_count, state)
            }
            StartToken::SetextHeading { marker } => {
                handle_setext_heading_start(output, *marker, state)
            }
            StartToken::Paragraph => handle_paragraph_start(output, state),
            StartToken::BlankLine => handle_blank_line(output, state),
            StartToken::BlockQuote => handle_block_quote_start(output, state),
            StartToken::IndentedCodeBlock => handle_indented_code_block_start(output, state),
            StartToken::FencedCodeBlock { info, .. } => {
                handle_fenced_code_block_start(output, info.as_deref(), state)
            }
            StartToken::List(kind) => handle_list_start(output, *kind, state),
            StartToken::NewListItem => handle_new_list_item(output, state),
            StartToken::HtmlBlock => handle_html_block_start(output, state),
            StartToken::LinkReferenceDefinition | StartToken::Pragma => output,
            StartToken::Text {
                text,
                extracted_whitespace,
                end_whitespace,
            } => handle_text(output, text, extracted_whitespace, end_whitespace.as_deref(), state),
            StartToken::Emphasis { length } => handle_emphasis_start(output, *length),
            StartToken::Link { uri, title } => handle_link_start(output, uri, title.as_deref()),
            StartToken::Image { uri, alt, title } => {
                handle_image(output, uri, alt, title.as_deref())
            }
            StartToken::InlineCodeSpan { text } => handle_inline_code_span(output, text),
            StartToken::RawHtml { tag } => handle_raw_html(output, tag),
            StartToken::UriAutolink { uri } => handle_uri_autolink(output, uri),
            StartToken::EmailAutolink { address } => handle_email_autolink(output, address),
            StartToken::HardBreak => handle_hard_break(output),
            StartToken::Extension(extension) => {
                let handler = self.extension_handlers.get(&extension.name).unwrap_or_else(|| {
                    panic!(
                        "no handler registered for extension token {:?}; \
                         tokenizer/transformer version mismatch",
                        extension.name
                    )
                });
                handler(output, extension, state)
            }
        }
    }
}

impl Default for GfmTransformer {
    fn default() -> Self {
        Self::new()
    }
}

fn dispatch_end(
    output: String,
    kind: TokenKind,
    forced: bool,
    state: &mut TransformState<'_>,
) -> String {
    match kind {
        Kind::AtxHeading => handle_atx_heading_end(output, state),
        Kind::SetextHeading => handle_setext_heading_end(output, state),
        Kind::Paragraph => handle_paragraph_end(output, state),
        Kind::BlockQuote => handle_block_quote_end(output, state),
        Kind::IndentedCodeBlock => handle_indented_code_block_end(output, state),
        Kind::FencedCodeBlock => handle_fenced_code_block_end(output, forced, state),
        Kind::UnorderedList | Kind::OrderedList => handle_list_end(output, kind, state),
        Kind::HtmlBlock => handle_html_block_end(output, state),
        Kind::Emphasis => handle_emphasis_end(output, state),
        Kind::Link => handle_link_end(output),
        unsupported => panic!(
            "no end handler registered for {unsupported:?} token; \
             tokenizer/transformer version mismatch"
        ),
    }
}

/// Tags that open a block element when they lead the freshly rendered
/// fragment; the trailing-text splice inserts a newline after the saved
/// `<li>` in that case.
const BLOCK_OPENINGS: [&str; 13] = [
    "<hr />", "<p>", "<h1>", "<h2>", "<h3>", "<h4>", "<h5>", "<h6>", "<pre>", "<ul>", "<ol>",
    "<blockquote>", "<a href=\"",
];

/// Pop the save point and splice the rendered fragment between it and the
/// requested trailing text.
fn apply_trailing_text(output: String, state: &mut TransformState<'_>) -> String {
    let stack_text = state
        .transform_stack
        .pop()
        .expect("trailing text requested with an empty transform stack");
    let trailing = state
        .add_trailing_text
        .take()
        .expect("apply_trailing_text called without a request");

    let mut combined = stack_text;
    if BLOCK_OPENINGS.iter().any(|tag| output.starts_with(tag)) {
        combined.push('\n');
    }
    combined.push_str(&output);
    if output.ends_with("</ul>") || output.ends_with("</ol>") {
        combined.push('\n');
    }
    combined.push_str(trailing);
    combined
}

/// Save the accumulated output (newline-terminated) plus the requested
/// leading text, and restart rendering on an empty string.
fn apply_leading_text(mut output: String, state: &mut TransformState<'_>) -> String {
    let leading = state
        .add_leading_text
        .take()
        .expect("apply_leading_text called without a request");
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str(&leading);
    state.transform_stack.push(output);
    String::new()
}

fn handle_thematic_break(mut output: String) -> String {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str("<hr />\n");
    output
}

fn handle_hard_break(mut output: String) -> String {
    output.push_str("<br />\n");
    output
}

fn handle_atx_heading_start(
    mut output: String,
    hash_count: u8,
    state: &mut TransformState<'_>,
) -> String {
    if let Some(previous) = state.previous_token() {
        if previous.is_list_end() || (previous.is_paragraph_end() && !state.is_in_loose_list) {
            output.push('\n');
        }
    }
    output.push_str("<h");
    output.push((b'0' + hash_count) as char);
    output.push('>');
    output
}

fn handle_atx_heading_end(mut output: String, state: &mut TransformState<'_>) -> String {
    let start = scan::find_matching_start(
        state.actual_tokens,
        state.actual_token_index,
        Kind::AtxHeading,
    );
    let StartToken::AtxHeading { hash_count } = start else {
        unreachable!("find_matching_start returned a non-heading token");
    };
    output.push_str("</h");
    output.push((b'0' + hash_count) as char);
    output.push_str(">\n");
    output
}

fn setext_level(marker: u8) -> u8 {
    if marker == b'=' { 1 } else { 2 }
}

fn handle_setext_heading_start(
    mut output: String,
    marker: u8,
    state: &mut TransformState<'_>,
) -> String {
    state.is_in_setext_block = true;
    output.push_str("<h");
    output.push((b'0' + setext_level(marker)) as char);
    output.push('>');
    output
}

fn handle_setext_heading_end(mut output: String, state: &mut TransformState<'_>) -> String {
    let start = scan::find_matching_start(
        state.actual_tokens,
        state.actual_token_index,
        Kind::SetextHeading,
    );
    let StartToken::SetextHeading { marker } = start else {
        unreachable!("find_matching_start returned a non-heading token");
    };
    output.push_str("</h");
    output.push((b'0' + setext_level(*marker)) as char);
    output.push_str(">\n");
    state.is_in_setext_block = false;
    output
}

fn handle_paragraph_start(mut output: String, state: &mut TransformState<'_>) -> String {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    if state.is_in_loose_list {
        output.push_str("<p>");
    }
    output
}

fn handle_paragraph_end(mut output: String, state: &mut TransformState<'_>) -> String {
    if state.is_in_loose_list {
        output.push_str("</p>\n");
    }
    output
}

fn handle_blank_line(mut output: String, state: &mut TransformState<'_>) -> String {
    if state.is_in_html_block {
        output.push('\n');
    }
    output
}

fn handle_block_quote_start(mut output: String, state: &mut TransformState<'_>) -> String {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str("<blockquote>\n");
    state.is_in_loose_list = true;
    output
}

fn handle_block_quote_end(mut output: String, state: &mut TransformState<'_>) -> String {
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str("</blockquote>\n");
    state.is_in_loose_list = reset_list_looseness(
        state.actual_tokens,
        state.actual_token_index,
        &state.list_looseness,
    );
    output
}

fn handle_indented_code_block_start(
    mut output: String,
    state: &mut TransformState<'_>,
) -> String {
    let at_item_start = output.is_empty()
        && state
            .transform_stack
            .last()
            .is_some_and(|saved| saved.ends_with("<li>"));
    if at_item_start {
        output.push('\n');
    } else if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str("<pre><code>");
    state.is_in_code_block = true;
    state.is_in_fenced_code_block = false;
    output
}

fn handle_indented_code_block_end(mut output: String, state: &mut TransformState<'_>) -> String {
    output.push_str("\n</code></pre>\n");
    state.is_in_code_block = false;
    output
}

fn fenced_inner_tag(info: Option<&str>) -> String {
    match info {
        Some(language) => format!("<code class=\"language-{language}\">"),
        None => "<code>".to_owned(),
    }
}

fn handle_fenced_code_block_start(
    mut output: String,
    info: Option<&str>,
    state: &mut TransformState<'_>,
) -> String {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str("<pre>");
    output.push_str(&fenced_inner_tag(info));
    state.is_in_code_block = true;
    state.is_in_fenced_code_block = true;
    output
}

fn handle_fenced_code_block_end(
    mut output: String,
    forced: bool,
    state: &mut TransformState<'_>,
) -> String {
    let start = scan::find_matching_start(
        state.actual_tokens,
        state.actual_token_index,
        Kind::FencedCodeBlock,
    );
    let StartToken::FencedCodeBlock { info, .. } = start else {
        unreachable!("find_matching_start returned a non-fence token");
    };
    let inner_tag = fenced_inner_tag(info.as_deref());

    // A force-closed fence whose final text already carries the
    // paragraph-terminator marker supplies its own line ending.
    let terminator_present = state.last_token.is_some_and(|token| {
        matches!(
            token,
            Token::Start(StartToken::Text { text, .. }) if text.ends_with(PARAGRAPH_TERMINATOR)
        )
    });
    let suppress_newline = forced && terminator_present;

    if !output.ends_with(&inner_tag) && !output.ends_with('\n') && !suppress_newline {
        output.push('\n');
    }
    output.push_str("</code></pre>\n");
    state.is_in_code_block = false;
    state.is_in_fenced_code_block = false;
    output
}

fn handle_list_start(output: String, kind: ListKind, state: &mut TransformState<'_>) -> String {
    state.is_in_loose_list = calculate_list_looseness(
        state.actual_tokens,
        state.actual_token_index,
        &mut state.list_looseness,
    );
    state.add_leading_text = Some(match kind {
        ListKind::Unordered => "<ul>\n<li>".to_owned(),
        ListKind::Ordered { start } if start != 1 => format!("<ol start=\"{start}\">\n<li>"),
        ListKind::Ordered { .. } => "<ol>\n<li>".to_owned(),
    });
    output
}

fn handle_new_list_item(output: String, state: &mut TransformState<'_>) -> String {
    state.add_trailing_text = Some("</li>");
    state.add_leading_text = Some("<li>".to_owned());
    output
}

fn handle_list_end(output: String, kind: TokenKind, state: &mut TransformState<'_>) -> String {
    state.is_in_loose_list = reset_list_looseness(
        state.actual_tokens,
        state.actual_token_index,
        &state.list_looseness,
    );
    state.add_trailing_text = Some(match kind {
        Kind::UnorderedList => "</li>\n</ul>",
        Kind::OrderedList => "</li>\n</ol>",
        _ => unreachable!("handle_list_end dispatched for {kind:?}"),
    });
    output
}

fn handle_html_block_start(mut output: String, state: &mut TransformState<'_>) -> String {
    state.is_in_html_block = true;
    let at_item_start = output.is_empty()
        && state
            .transform_stack
            .last()
            .is_some_and(|saved| saved.ends_with("<li>"));
    if at_item_start {
        output.push('\n');
    } else if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

fn handle_html_block_end(output: String, state: &mut TransformState<'_>) -> String {
    state.is_in_html_block = false;
    output
}

fn handle_text(
    mut output: String,
    raw_text: &str,
    extracted_whitespace: &str,
    end_whitespace: Option<&str>,
    state: &mut TransformState<'_>,
) -> String {
    if state.is_in_code_block {
        output.push_str(&resolve_all_from_text(extracted_whitespace));
        let resolved = resolve_all_from_text(raw_text);
        let resolved = resolved
            .strip_suffix(PARAGRAPH_TERMINATOR)
            .unwrap_or(&resolved);
        output.push_str(resolved);
    } else if state.is_in_html_block {
        output.push_str(extracted_whitespace);
        output.push_str(raw_text);
        output.push('\n');
    } else if state.is_in_setext_block {
        output.push_str(&resolve_all_from_text(raw_text));
    } else {
        match end_whitespace {
            Some(whitespace) => {
                output.push_str(&text::reconcile_text_and_whitespace(raw_text, whitespace));
            }
            None => output.push_str(&resolve_all_from_text(raw_text)),
        }
    }
    output
}

fn handle_emphasis_start(mut output: String, length: u8) -> String {
    output.push_str(if length == 1 { "<em>" } else { "<strong>" });
    output
}

fn handle_emphasis_end(mut output: String, state: &mut TransformState<'_>) -> String {
    let start = scan::find_matching_start(
        state.actual_tokens,
        state.actual_token_index,
        Kind::Emphasis,
    );
    let StartToken::Emphasis { length } = start else {
        unreachable!("find_matching_start returned a non-emphasis token");
    };
    output.push_str(if *length == 1 { "</em>" } else { "</strong>" });
    output
}

fn handle_link_start(mut output: String, uri: &str, title: Option<&str>) -> String {
    output.push_str("<a href=\"");
    output.push_str(uri);
    output.push('"');
    if let Some(title) = title {
        output.push_str(" title=\"");
        output.push_str(title);
        output.push('"');
    }
    output.push('>');
    output
}

fn handle_link_end(mut output: String) -> String {
    output.push_str("</a>");
    output
}

fn handle_image(mut output: String, uri: &str, alt: &str, title: Option<&str>) -> String {
    output.push_str("<img src=\"");
    output.push_str(uri);
    output.push_str("\" alt=\"");
    output.push_str(alt);
    output.push('"');
    if let Some(title) = title {
        output.push_str(" title=\"");
        output.push_str(title);
        output.push('"');
    }
    output.push_str(" />");
    output
}

fn handle_inline_code_span(mut output: String, raw_text: &str) -> String {
    output.push_str("<code>");
    output.push_str(&resolve_all_from_text(raw_text));
    output.push_str("</code>");
    output
}

fn handle_raw_html(mut output: String, tag: &str) -> String {
    output.push('<');
    output.push_str(&resolve_all_from_text(tag));
    output.push('>');
    output
}

fn handle_uri_autolink(mut output: String, uri: &str) -> String {
    output.push_str("<a href=\"");
    output.push_str(&escape::percent_encode_uri(uri));
    output.push_str("\">");
    output.push_str(&escape::escape_display_text(uri));
    output.push_str("</a>");
    output
}

fn handle_email_autolink(mut output: String, address: &str) -> String {
    output.push_str("<a href=\"mailto:");
    output.push_str(address);
    output.push_str("\">");
    output.push_str(address);
    output.push_str("</a>");
    output
}
