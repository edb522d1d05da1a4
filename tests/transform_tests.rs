//! End-to-end transformation tests over hand-built token streams.

use tokamark::{transform, Token, TokenKind};

fn para(text: &str) -> Vec<Token> {
    vec![
        Token::paragraph(),
        Token::text(text),
        Token::end(TokenKind::Paragraph),
    ]
}

#[test]
fn thematic_break() {
    // "***"
    assert_eq!(transform(&[Token::thematic_break()]), "<hr />");
}

#[test]
fn thematic_break_after_paragraph() {
    let mut tokens = para("foo");
    tokens.push(Token::blank_line());
    tokens.push(Token::thematic_break());
    assert_eq!(transform(&tokens), "<p>foo</p>\n<hr />");
}

#[test]
fn atx_heading_level_one() {
    // "# foo"
    let tokens = [
        Token::atx_heading(1),
        Token::text("foo"),
        Token::end(TokenKind::AtxHeading),
    ];
    assert_eq!(transform(&tokens), "<h1>foo</h1>");
}

#[test]
fn atx_heading_all_levels() {
    for level in 1..=6u8 {
        let tokens = [
            Token::atx_heading(level),
            Token::text("Heading"),
            Token::end(TokenKind::AtxHeading),
        ];
        assert_eq!(
            transform(&tokens),
            format!("<h{level}>Heading</h{level}>")
        );
    }
}

#[test]
fn atx_heading_after_list_gets_separating_newline() {
    let tokens = [
        Token::unordered_list(),
        Token::paragraph(),
        Token::text("foo"),
        Token::end(TokenKind::Paragraph),
        Token::end(TokenKind::UnorderedList),
        Token::atx_heading(1),
        Token::text("bar"),
        Token::end(TokenKind::AtxHeading),
    ];
    assert_eq!(
        transform(&tokens),
        "<ul>\n<li>foo</li>\n</ul>\n<h1>bar</h1>"
    );
}

#[test]
fn setext_heading_equals_renders_h1() {
    let tokens = [
        Token::setext_heading(b'='),
        Token::text("foo"),
        Token::end(TokenKind::SetextHeading),
    ];
    assert_eq!(transform(&tokens), "<h1>foo</h1>");
}

#[test]
fn setext_heading_dash_renders_h2() {
    let tokens = [
        Token::setext_heading(b'-'),
        Token::text("foo"),
        Token::end(TokenKind::SetextHeading),
    ];
    assert_eq!(transform(&tokens), "<h2>foo</h2>");
}

#[test]
fn paragraph_single() {
    assert_eq!(transform(&para("hello world")), "<p>hello world</p>");
}

#[test]
fn paragraphs_separated_by_blank_line() {
    let mut tokens = para("first");
    tokens.push(Token::blank_line());
    tokens.extend(para("second"));
    assert_eq!(transform(&tokens), "<p>first</p>\n<p>second</p>");
}

#[test]
fn block_quote_with_paragraph() {
    let tokens = [
        Token::block_quote(),
        Token::paragraph(),
        Token::text("foo"),
        Token::end(TokenKind::Paragraph),
        Token::end(TokenKind::BlockQuote),
    ];
    assert_eq!(
        transform(&tokens),
        "<blockquote>\n<p>foo</p>\n</blockquote>"
    );
}

#[test]
fn nested_block_quotes() {
    let tokens = [
        Token::block_quote(),
        Token::block_quote(),
        Token::paragraph(),
        Token::text("foo"),
        Token::end(TokenKind::Paragraph),
        Token::end(TokenKind::BlockQuote),
        Token::end(TokenKind::BlockQuote),
    ];
    assert_eq!(
        transform(&tokens),
        "<blockquote>\n<blockquote>\n<p>foo</p>\n</blockquote>\n</blockquote>"
    );
}

#[test]
fn indented_code_block() {
    let tokens = [
        Token::indented_code_block(),
        Token::text("foo"),
        Token::end(TokenKind::IndentedCodeBlock),
    ];
    assert_eq!(transform(&tokens), "<pre><code>foo\n</code></pre>");
}

#[test]
fn indented_code_block_preserves_extra_whitespace() {
    let tokens = [
        Token::indented_code_block(),
        Token::text_with_whitespace("foo", "  ", None),
        Token::end(TokenKind::IndentedCodeBlock),
    ];
    assert_eq!(transform(&tokens), "<pre><code>  foo\n</code></pre>");
}

#[test]
fn fenced_code_block_plain() {
    let tokens = [
        Token::fenced_code_block(b'`', None),
        Token::text("aaa"),
        Token::end(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(transform(&tokens), "<pre><code>aaa\n</code></pre>");
}

#[test]
fn fenced_code_block_empty() {
    let tokens = [
        Token::fenced_code_block(b'`', None),
        Token::end(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(transform(&tokens), "<pre><code></code></pre>");
}

#[test]
fn fenced_code_block_with_info_string() {
    // Info string "foo+bar" passes through into the class attribute.
    let tokens = [
        Token::fenced_code_block(b'`', Some("foo+bar")),
        Token::text("x"),
        Token::end(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(
        transform(&tokens),
        "<pre><code class=\"language-foo+bar\">x\n</code></pre>"
    );
}

#[test]
fn fenced_code_block_multiline_content() {
    let tokens = [
        Token::fenced_code_block(b'~', Some("rust")),
        Token::text("fn main() {}\nlet x = 1;"),
        Token::end(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(
        transform(&tokens),
        "<pre><code class=\"language-rust\">fn main() {}\nlet x = 1;\n</code></pre>"
    );
}

#[test]
fn force_closed_fence_with_terminator_suppresses_newline() {
    let tokens = [
        Token::fenced_code_block(b'`', None),
        Token::text("aaa\u{4}"),
        Token::end_forced(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(transform(&tokens), "<pre><code>aaa</code></pre>");
}

#[test]
fn force_closed_fence_without_terminator_keeps_newline() {
    let tokens = [
        Token::fenced_code_block(b'`', None),
        Token::text("aaa"),
        Token::end_forced(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(transform(&tokens), "<pre><code>aaa\n</code></pre>");
}

#[test]
fn html_block_passes_content_through_raw() {
    let tokens = [
        Token::html_block(),
        Token::text("<div>"),
        Token::text("<b>raw & unescaped</b>"),
        Token::text("</div>"),
        Token::end(TokenKind::HtmlBlock),
    ];
    assert_eq!(
        transform(&tokens),
        "<div>\n<b>raw & unescaped</b>\n</div>"
    );
}

#[test]
fn blank_line_inside_html_block_is_kept() {
    let tokens = [
        Token::html_block(),
        Token::text("<div>"),
        Token::blank_line(),
        Token::text("</div>"),
        Token::end(TokenKind::HtmlBlock),
    ];
    assert_eq!(transform(&tokens), "<div>\n\n</div>");
}

#[test]
fn fenced_code_block_after_list() {
    let tokens = [
        Token::unordered_list(),
        Token::paragraph(),
        Token::text("foo"),
        Token::end(TokenKind::Paragraph),
        Token::end(TokenKind::UnorderedList),
        Token::fenced_code_block(b'`', None),
        Token::text("bar"),
        Token::end(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(
        transform(&tokens),
        "<ul>\n<li>foo</li>\n</ul>\n<pre><code>bar\n</code></pre>"
    );
}

#[test]
fn html_block_after_paragraph() {
    let mut tokens = para("foo");
    tokens.extend([
        Token::html_block(),
        Token::text("<hr>"),
        Token::end(TokenKind::HtmlBlock),
    ]);
    assert_eq!(transform(&tokens), "<p>foo</p>\n<hr>");
}

#[test]
fn emphasis_length_one_renders_em() {
    let tokens = [
        Token::paragraph(),
        Token::emphasis(1),
        Token::text("foo"),
        Token::end(TokenKind::Emphasis),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p><em>foo</em></p>");
}

#[test]
fn emphasis_length_two_renders_strong() {
    let tokens = [
        Token::paragraph(),
        Token::emphasis(2),
        Token::text("foo"),
        Token::end(TokenKind::Emphasis),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p><strong>foo</strong></p>");
}

#[test]
fn nested_emphasis_closes_in_order() {
    // *foo **bar***
    let tokens = [
        Token::paragraph(),
        Token::emphasis(1),
        Token::text("foo "),
        Token::emphasis(2),
        Token::text("bar"),
        Token::end(TokenKind::Emphasis),
        Token::end(TokenKind::Emphasis),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(
        transform(&tokens),
        "<p><em>foo <strong>bar</strong></em></p>"
    );
}

#[test]
fn link_with_title() {
    // "[link](/uri \"title\")"
    let tokens = [
        Token::paragraph(),
        Token::link("/uri", Some("title")),
        Token::text("link"),
        Token::end(TokenKind::Link),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(
        transform(&tokens),
        "<p><a href=\"/uri\" title=\"title\">link</a></p>"
    );
}

#[test]
fn link_without_title() {
    let tokens = [
        Token::paragraph(),
        Token::link("/uri", None),
        Token::text("link"),
        Token::end(TokenKind::Link),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p><a href=\"/uri\">link</a></p>");
}

#[test]
fn image_with_title() {
    let tokens = [
        Token::paragraph(),
        Token::image("/url", "foo", Some("title")),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(
        transform(&tokens),
        "<p><img src=\"/url\" alt=\"foo\" title=\"title\" /></p>"
    );
}

#[test]
fn image_without_title() {
    let tokens = [
        Token::paragraph(),
        Token::image("/url", "foo", None),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p><img src=\"/url\" alt=\"foo\" /></p>");
}

#[test]
fn inline_code_span() {
    let tokens = [
        Token::paragraph(),
        Token::inline_code_span("foo bar"),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p><code>foo bar</code></p>");
}

#[test]
fn raw_inline_html() {
    let tokens = [
        Token::paragraph(),
        Token::raw_html("a href=\"x\""),
        Token::text("hi"),
        Token::raw_html("/a"),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p><a href=\"x\">hi</a></p>");
}

#[test]
fn hard_break_inside_paragraph() {
    let tokens = [
        Token::paragraph(),
        Token::text("foo"),
        Token::hard_break(),
        Token::text("bar"),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p>foo<br />\nbar</p>");
}

#[test]
fn link_reference_definition_renders_nothing() {
    let mut tokens = vec![Token::link_reference_definition(), Token::blank_line()];
    tokens.extend(para("foo"));
    assert_eq!(transform(&tokens), "<p>foo</p>");
}

#[test]
fn pragma_renders_nothing() {
    let mut tokens = vec![Token::pragma()];
    tokens.extend(para("foo"));
    assert_eq!(transform(&tokens), "<p>foo</p>");
}

#[test]
fn text_with_trailing_whitespace_is_reinterleaved() {
    // Two source lines, the first ending in two spaces that survived
    // because they sat literally at end-of-source-line.
    let tokens = [
        Token::paragraph(),
        Token::text_with_whitespace("foo\nbar", "", Some("  \n")),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p>foo  \nbar</p>");
}

#[test]
fn text_with_replacement_markers_resolves_to_replacement() {
    // Tokenizer encoded "&amp;" with replacement "&".
    let tokens = [
        Token::paragraph(),
        Token::text("a\u{1}&amp;\u{2}&\u{3}b"),
        Token::end(TokenKind::Paragraph),
    ];
    assert_eq!(transform(&tokens), "<p>a&b</p>");
}

#[test]
fn setext_text_resolves_markers() {
    let tokens = [
        Token::setext_heading(b'='),
        Token::text("a\u{1}\\*\u{2}*\u{3}b"),
        Token::end(TokenKind::SetextHeading),
    ];
    assert_eq!(transform(&tokens), "<h1>a*b</h1>");
}

#[test]
fn document_mixing_block_types() {
    let tokens = [
        Token::atx_heading(1),
        Token::text("Title"),
        Token::end(TokenKind::AtxHeading),
        Token::blank_line(),
        Token::paragraph(),
        Token::text("intro"),
        Token::end(TokenKind::Paragraph),
        Token::blank_line(),
        Token::thematic_break(),
        Token::blank_line(),
        Token::fenced_code_block(b'`', Some("python")),
        Token::text("print(\"hi\")"),
        Token::end(TokenKind::FencedCodeBlock),
    ];
    assert_eq!(
        transform(&tokens),
        "<h1>Title</h1>\n<p>intro</p>\n<hr />\n\
         <pre><code class=\"language-python\">print(\"hi\")\n</code></pre>"
    );
}
