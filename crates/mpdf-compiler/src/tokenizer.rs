//! Flat block-token stream built on `pulldown-cmark`.
//!
//! Block structure becomes paired `Open`/`Close` tokens in document order,
//! code blocks become single `Fence`/`CodeBlock` tokens, and every run of
//! inline content becomes one `Inline` token holding its children. Children
//! are one level deep; an image nested inside a link is still a direct child.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use std::mem;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Paragraph,
    /// Heading level 1..=6.
    Heading(u8),
    BlockQuote,
    BulletList,
    OrderedList,
    ListItem,
    Table,
    TableHead,
    TableRow,
    TableCell,
    FootnoteDefinition,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Emphasis,
    Strong,
    Strikethrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineToken {
    Text(String),
    Code(String),
    Image { src: String, alt: String },
    LinkOpen { href: String },
    LinkClose,
    Open(Style),
    Close(Style),
    SoftBreak,
    HardBreak,
    Html(String),
    FootnoteRef(String),
    TaskMarker(bool),
    Math(String),
}

impl InlineToken {
    /// Image source, for image tokens.
    pub fn src(&self) -> Option<&str> {
        match self {
            InlineToken::Image { src, .. } => Some(src),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open(Block),
    Close(Block),
    Fence { info: String, content: String },
    CodeBlock { content: String },
    Html { content: String },
    Rule,
    Inline { children: Vec<InlineToken> },
}

impl Token {
    /// Direct children; empty for everything but `Inline`.
    pub fn children(&self) -> &[InlineToken] {
        match self {
            Token::Inline { children } => children,
            _ => &[],
        }
    }
}

/// Parser configuration. Build once, share by reference.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    options: Options,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        Self { options }
    }

    /// The process-wide instance.
    pub fn shared() -> &'static Tokenizer {
        static SHARED: OnceLock<Tokenizer> = OnceLock::new();
        SHARED.get_or_init(Tokenizer::new)
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut builder = Builder::default();
        for event in Parser::new_ext(text, self.options) {
            builder.event(event);
        }
        builder.finish()
    }
}

/// Tokenize with the shared instance.
pub fn tokenize(text: &str) -> Vec<Token> {
    Tokenizer::shared().tokenize(text)
}

enum Frame {
    Block(Block),
    Style(Style),
    Link,
    Image { src: String, alt: String },
    Code { info: Option<String>, content: String },
    Html(String),
    /// Markup nested inside an image description; contributes only alt text.
    Alt,
}

enum Start {
    Block(Block),
    Style(Style),
    Link(String),
    Image(String),
    Code(Option<String>),
    Html,
}

fn classify(tag: Tag<'_>) -> Start {
    match tag {
        Tag::Paragraph => Start::Block(Block::Paragraph),
        Tag::Heading { level, .. } => Start::Block(Block::Heading(level as u8)),
        Tag::BlockQuote(_) => Start::Block(Block::BlockQuote),
        Tag::List(None) => Start::Block(Block::BulletList),
        Tag::List(Some(_)) => Start::Block(Block::OrderedList),
        Tag::Item => Start::Block(Block::ListItem),
        Tag::Table(_) => Start::Block(Block::Table),
        Tag::TableHead => Start::Block(Block::TableHead),
        Tag::TableRow => Start::Block(Block::TableRow),
        Tag::TableCell => Start::Block(Block::TableCell),
        Tag::FootnoteDefinition(_) => Start::Block(Block::FootnoteDefinition),
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Start::Code(Some(info.into_string())),
        Tag::CodeBlock(CodeBlockKind::Indented) => Start::Code(None),
        Tag::HtmlBlock => Start::Html,
        Tag::Emphasis => Start::Style(Style::Emphasis),
        Tag::Strong => Start::Style(Style::Strong),
        Tag::Strikethrough => Start::Style(Style::Strikethrough),
        Tag::Link { dest_url, .. } => Start::Link(dest_url.into_string()),
        Tag::Image { dest_url, .. } => Start::Image(dest_url.into_string()),
        _ => Start::Block(Block::Other),
    }
}

#[derive(Default)]
struct Builder {
    tokens: Vec<Token>,
    inline: Vec<InlineToken>,
    stack: Vec<Frame>,
}

impl Builder {
    fn flush(&mut self) {
        if !self.inline.is_empty() {
            let children = mem::take(&mut self.inline);
            self.tokens.push(Token::Inline { children });
        }
    }

    /// Route literal text to whatever currently owns it.
    fn text(&mut self, text: &str, as_code: bool) {
        let owner = self.stack.iter_mut().rev().find(|f| !matches!(f, Frame::Alt));
        match owner {
            Some(Frame::Image { alt, .. }) => alt.push_str(text),
            Some(Frame::Code { content, .. }) => content.push_str(text),
            Some(Frame::Html(content)) => content.push_str(text),
            _ if as_code => self.inline.push(InlineToken::Code(text.to_owned())),
            _ => self.inline.push(InlineToken::Text(text.to_owned())),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text, false),
            Event::Code(code) => self.text(&code, true),
            Event::Html(html) => {
                if matches!(self.stack.last(), Some(Frame::Html(_))) {
                    self.text(&html, false);
                } else {
                    self.flush();
                    self.tokens.push(Token::Html {
                        content: html.into_string(),
                    });
                }
            }
            Event::InlineHtml(html) => self.inline.push(InlineToken::Html(html.into_string())),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.inline.push(InlineToken::Math(math.into_string()));
            }
            Event::FootnoteReference(label) => {
                self.inline
                    .push(InlineToken::FootnoteRef(label.into_string()));
            }
            Event::SoftBreak => self.inline.push(InlineToken::SoftBreak),
            Event::HardBreak => self.inline.push(InlineToken::HardBreak),
            Event::TaskListMarker(checked) => self.inline.push(InlineToken::TaskMarker(checked)),
            Event::Rule => {
                self.flush();
                self.tokens.push(Token::Rule);
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        if matches!(self.stack.last(), Some(Frame::Image { .. } | Frame::Alt)) {
            self.stack.push(Frame::Alt);
            return;
        }
        match classify(tag) {
            Start::Block(block) => {
                self.flush();
                self.tokens.push(Token::Open(block));
                self.stack.push(Frame::Block(block));
            }
            Start::Style(style) => {
                self.inline.push(InlineToken::Open(style));
                self.stack.push(Frame::Style(style));
            }
            Start::Link(href) => {
                self.inline.push(InlineToken::LinkOpen { href });
                self.stack.push(Frame::Link);
            }
            Start::Image(src) => self.stack.push(Frame::Image {
                src,
                alt: String::new(),
            }),
            Start::Code(info) => {
                self.flush();
                self.stack.push(Frame::Code {
                    info,
                    content: String::new(),
                });
            }
            Start::Html => {
                self.flush();
                self.stack.push(Frame::Html(String::new()));
            }
        }
    }

    fn end(&mut self) {
        match self.stack.pop() {
            Some(Frame::Block(block)) => {
                self.flush();
                self.tokens.push(Token::Close(block));
            }
            Some(Frame::Style(style)) => self.inline.push(InlineToken::Close(style)),
            Some(Frame::Link) => self.inline.push(InlineToken::LinkClose),
            Some(Frame::Image { src, alt }) => self.inline.push(InlineToken::Image { src, alt }),
            Some(Frame::Code { info, content }) => self.tokens.push(match info {
                Some(info) => Token::Fence { info, content },
                None => Token::CodeBlock { content },
            }),
            Some(Frame::Html(content)) => self.tokens.push(Token::Html { content }),
            Some(Frame::Alt) | None => {}
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush();
        self.tokens
    }
}
