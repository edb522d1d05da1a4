//! Token model for the transformation engine.
//!
//! Tokens arrive fully materialized from the tokenizer as a flat, properly
//! nested sequence: every container type has a start token and a matching
//! end token at the correct depth, leaf types have a start token only.

/// Discriminant for every token type the transformer understands.
///
/// End tokens carry only this discriminant; parameters of the paired start
/// token (heading level, fence info, emphasis length) are recovered with a
/// backward scan over the token slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Thematic break (`***`, `---`, `___`).
    ThematicBreak,
    /// ATX heading (`# ...`).
    AtxHeading,
    /// Setext heading (underlined with `=` or `-`).
    SetextHeading,
    /// Paragraph container.
    Paragraph,
    /// Blank line.
    BlankLine,
    /// Block quote container.
    BlockQuote,
    /// Indented code block.
    IndentedCodeBlock,
    /// Fenced code block.
    FencedCodeBlock,
    /// Unordered list container.
    UnorderedList,
    /// Ordered list container.
    OrderedList,
    /// Boundary between two items of the same list.
    NewListItem,
    /// HTML block container.
    HtmlBlock,
    /// Link reference definition (renders nothing).
    LinkReferenceDefinition,
    /// Text run.
    Text,
    /// Emphasis span (`<em>` or `<strong>` depending on length).
    Emphasis,
    /// Inline link.
    Link,
    /// Inline image (self-closing, no end token).
    Image,
    /// Inline code span.
    InlineCodeSpan,
    /// Raw inline HTML tag.
    RawHtml,
    /// URI autolink (`<http://...>`).
    UriAutolink,
    /// Email autolink (`<user@host>`).
    EmailAutolink,
    /// Hard line break.
    HardBreak,
    /// Pragma comment (renders nothing).
    Pragma,
    /// Externally handled extension token (e.g. front matter).
    Extension,
}

/// Ordered vs. unordered list, with the ordered start number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Unordered list (bullet points).
    Unordered,
    /// Ordered list with starting number.
    Ordered {
        /// Starting number; rendered as `start="N"` when not 1.
        start: u32,
    },
}

impl ListKind {
    /// Token kind of the container this list opens.
    pub fn token_kind(self) -> TokenKind {
        match self {
            Self::Unordered => TokenKind::UnorderedList,
            Self::Ordered { .. } => TokenKind::OrderedList,
        }
    }
}

/// Payload of a token type not known to the core transformer.
///
/// Extension tokens dispatch through handlers registered on the
/// transformer; `name` selects the handler and `data` carries whatever the
/// producing extension tokenized (front matter text, pragma body, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionToken {
    /// Registry key, e.g. `"front-matter"`.
    pub name: String,
    /// Raw payload captured by the extension's tokenizer.
    pub data: String,
}

/// A start token with its type-specific payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartToken {
    ThematicBreak,
    AtxHeading {
        /// Number of leading `#` characters (1-6).
        hash_count: u8,
    },
    SetextHeading {
        /// Underline character: `b'='` (h1) or `b'-'` (h2).
        marker: u8,
    },
    Paragraph,
    BlankLine,
    BlockQuote,
    IndentedCodeBlock,
    FencedCodeBlock {
        /// Fence character (`` b'`' `` or `b'~'`).
        fence_char: u8,
        /// Info string, already trimmed to the language word.
        info: Option<String>,
    },
    List(ListKind),
    NewListItem,
    HtmlBlock,
    LinkReferenceDefinition,
    Text {
        /// Token text; may contain replacement-marker triples (see
        /// [`crate::text`]).
        text: String,
        /// Leading whitespace stripped from the source line; emitted
        /// verbatim inside code and HTML blocks.
        extracted_whitespace: String,
        /// Per-line trailing whitespace for multi-line tokens, one segment
        /// per source line, joined with `\n`. `None` for single-line text.
        end_whitespace: Option<String>,
    },
    Emphasis {
        /// Delimiter run length: 1 renders `<em>`, 2 or more `<strong>`.
        length: u8,
    },
    Link {
        uri: String,
        title: Option<String>,
    },
    Image {
        uri: String,
        alt: String,
        title: Option<String>,
    },
    InlineCodeSpan {
        text: String,
    },
    RawHtml {
        /// Tag content without the surrounding angle brackets.
        tag: String,
    },
    UriAutolink {
        uri: String,
    },
    EmailAutolink {
        address: String,
    },
    HardBreak,
    Pragma,
    Extension(ExtensionToken),
}

impl StartToken {
    /// Discriminant of this start token.
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::ThematicBreak => TokenKind::ThematicBreak,
            Self::AtxHeading { .. } => TokenKind::AtxHeading,
            Self::SetextHeading { .. } => TokenKind::SetextHeading,
            Self::Paragraph => TokenKind::Paragraph,
            Self::BlankLine => TokenKind::BlankLine,
            Self::BlockQuote => TokenKind::BlockQuote,
            Self::IndentedCodeBlock => TokenKind::IndentedCodeBlock,
            Self::FencedCodeBlock { .. } => TokenKind::FencedCodeBlock,
            Self::List(kind) => kind.token_kind(),
            Self::NewListItem => TokenKind::NewListItem,
            Self::HtmlBlock => TokenKind::HtmlBlock,
            Self::LinkReferenceDefinition => TokenKind::LinkReferenceDefinition,
            Self::Text { .. } => TokenKind::Text,
            Self::Emphasis { .. } => TokenKind::Emphasis,
            Self::Link { .. } => TokenKind::Link,
            Self::Image { .. } => TokenKind::Image,
            Self::InlineCodeSpan { .. } => TokenKind::InlineCodeSpan,
            Self::RawHtml { .. } => TokenKind::RawHtml,
            Self::UriAutolink { .. } => TokenKind::UriAutolink,
            Self::EmailAutolink { .. } => TokenKind::EmailAutolink,
            Self::HardBreak => TokenKind::HardBreak,
            Self::Pragma => TokenKind::Pragma,
            Self::Extension(_) => TokenKind::Extension,
        }
    }
}

/// One element of the flat token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Start of a container or a complete leaf token.
    Start(StartToken),
    /// End of the container opened by the matching start token.
    End {
        /// Kind of the start token this closes.
        kind: TokenKind,
        /// Whether the tokenizer force-closed the container (e.g. an
        /// unterminated code fence at end of input).
        forced: bool,
    },
}

impl Token {
    /// Discriminant of this token (for end tokens, of the start it closes).
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Start(start) => start.kind(),
            Self::End { kind, .. } => *kind,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End { .. })
    }

    /// True for an end token closing `kind`.
    pub fn is_end_of(&self, kind: TokenKind) -> bool {
        matches!(self, Self::End { kind: k, .. } if *k == kind)
    }

    pub fn is_blank_line(&self) -> bool {
        matches!(self, Self::Start(StartToken::BlankLine))
    }

    pub fn is_list_start(&self) -> bool {
        matches!(self, Self::Start(StartToken::List(_)))
    }

    pub fn is_new_list_item(&self) -> bool {
        matches!(self, Self::Start(StartToken::NewListItem))
    }

    pub fn is_list_end(&self) -> bool {
        matches!(
            self,
            Self::End { kind: TokenKind::UnorderedList | TokenKind::OrderedList, .. }
        )
    }

    pub fn is_block_quote_start(&self) -> bool {
        matches!(self, Self::Start(StartToken::BlockQuote))
    }

    pub fn is_block_quote_end(&self) -> bool {
        self.is_end_of(TokenKind::BlockQuote)
    }

    pub fn is_paragraph_end(&self) -> bool {
        self.is_end_of(TokenKind::Paragraph)
    }

    pub fn is_link_reference_definition(&self) -> bool {
        matches!(self, Self::Start(StartToken::LinkReferenceDefinition))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Start(StartToken::Text { .. }))
    }

    // --- Constructors used by the tokenizer and by tests ---

    pub fn thematic_break() -> Self {
        Self::Start(StartToken::ThematicBreak)
    }

    pub fn atx_heading(hash_count: u8) -> Self {
        debug_assert!((1..=6).contains(&hash_count));
        Self::Start(StartToken::AtxHeading { hash_count })
    }

    pub fn setext_heading(marker: u8) -> Self {
        debug_assert!(marker == b'=' || marker == b'-');
        Self::Start(StartToken::SetextHeading { marker })
    }

    pub fn paragraph() -> Self {
        Self::Start(StartToken::Paragraph)
    }

    pub fn blank_line() -> Self {
        Self::Start(StartToken::BlankLine)
    }

    pub fn block_quote() -> Self {
        Self::Start(StartToken::BlockQuote)
    }

    pub fn indented_code_block() -> Self {
        Self::Start(StartToken::IndentedCodeBlock)
    }

    pub fn fenced_code_block(fence_char: u8, info: Option<&str>) -> Self {
        Self::Start(StartToken::FencedCodeBlock {
            fence_char,
            info: info.map(str::to_owned),
        })
    }

    pub fn unordered_list() -> Self {
        Self::Start(StartToken::List(ListKind::Unordered))
    }

    pub fn ordered_list(start: u32) -> Self {
        Self::Start(StartToken::List(ListKind::Ordered { start }))
    }

    pub fn new_list_item() -> Self {
        Self::Start(StartToken::NewListItem)
    }

    pub fn html_block() -> Self {
        Self::Start(StartToken::HtmlBlock)
    }

    pub fn link_reference_definition() -> Self {
        Self::Start(StartToken::LinkReferenceDefinition)
    }

    /// Single-line text token with no whitespace bookkeeping.
    pub fn text(text: &str) -> Self {
        Self::Start(StartToken::Text {
            text: text.to_owned(),
            extracted_whitespace: String::new(),
            end_whitespace: None,
        })
    }

    /// Text token with full whitespace bookkeeping.
    pub fn text_with_whitespace(
        text: &str,
        extracted_whitespace: &str,
        end_whitespace: Option<&str>,
    ) -> Self {
        Self::Start(StartToken::Text {
            text: text.to_owned(),
            extracted_whitespace: extracted_whitespace.to_owned(),
            end_whitespace: end_whitespace.map(str::to_owned),
        })
    }

    pub fn emphasis(length: u8) -> Self {
        Self::Start(StartToken::Emphasis { length })
    }

    pub fn link(uri: &str, title: Option<&str>) -> Self {
        Self::Start(StartToken::Link {
            uri: uri.to_owned(),
            title: title.map(str::to_owned),
        })
    }

    pub fn image(uri: &str, alt: &str, title: Option<&str>) -> Self {
        Self::Start(StartToken::Image {
            uri: uri.to_owned(),
            alt: alt.to_owned(),
            title: title.map(str::to_owned),
        })
    }

    pub fn inline_code_span(text: &str) -> Self {
        Self::Start(StartToken::InlineCodeSpan { text: text.to_owned() })
    }

    pub fn raw_html(tag: &str) -> Self {
        Self::Start(StartToken::RawHtml { tag: tag.to_owned() })
    }

    pub fn uri_autolink(uri: &str) -> Self {
        Self::Start(StartToken::UriAutolink { uri: uri.to_owned() })
    }

    pub fn email_autolink(address: &str) -> Self {
        Self::Start(StartToken::EmailAutolink { address: address.to_owned() })
    }

    pub fn hard_break() -> Self {
        Self::Start(StartToken::HardBreak)
    }

    pub fn pragma() -> Self {
        Self::Start(StartToken::Pragma)
    }

    pub fn extension(name: &str, data: &str) -> Self {
        Self::Start(StartToken::Extension(ExtensionToken {
            name: name.to_owned(),
            data: data.to_owned(),
        }))
    }

    pub fn end(kind: TokenKind) -> Self {
        Self::End { kind, forced: false }
    }

    pub fn end_forced(kind: TokenKind) -> Self {
        Self::End { kind, forced: true }
    }
}
