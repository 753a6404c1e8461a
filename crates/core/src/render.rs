//! Turning stored bytes into something a browser can display.

use pulldown_cmark::{html, Options, Parser};

use crate::naming::{extension, MARKDOWN_EXTENSION, TEXT_EXTENSION};

/// How a rendered body should be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Rendered markdown.
    Html,
    /// Plain text, served verbatim.
    PlainText,
    /// Unknown extension, served verbatim.
    Binary,
}

impl ContentKind {
    /// `Content-Type` header value.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::PlainText => "text/plain",
            Self::Binary => "application/octet-stream",
        }
    }
}

/// A document or snapshot ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub body: Vec<u8>,
    pub kind: ContentKind,
}

/// Render markdown to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Render `content` according to the extension of `name`.
pub fn render_by_name(name: &str, content: Vec<u8>) -> RenderedContent {
    match extension(name) {
        MARKDOWN_EXTENSION => {
            let source = String::from_utf8_lossy(&content);
            RenderedContent {
                body: render_markdown(&source).into_bytes(),
                kind: ContentKind::Html,
            }
        }
        TEXT_EXTENSION => RenderedContent {
            body: content,
            kind: ContentKind::PlainText,
        },
        _ => RenderedContent {
            body: content,
            kind: ContentKind::Binary,
        },
    }
}
