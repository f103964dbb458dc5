//! HTML query capability used by the extractors
//!
//! Every query tolerates absence: lookups return `Option`/empty `Vec`, and
//! text is always trimmed. An unparseable selector behaves like "not found".

use scraper::{ElementRef, Html, Selector};
use std::ops::Deref;

/// A parsed HTML document
pub struct Page {
    document: Html,
}

impl Page {
    /// Parses an HTML document; html5ever recovers from any malformed markup
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// The `<html>` element
    pub fn root(&self) -> Node<'_> {
        Node {
            element: self.document.root_element(),
        }
    }
}

/// An element inside a parsed page
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

/// Structured lookups over an element subtree
///
/// Required lookups are expressed by the caller matching on `Option`;
/// optional ones use the `_or_default` helpers.
pub trait Scope<'a> {
    /// First descendant matching `css`
    fn select_first(&self, css: &str) -> Option<Node<'a>>;

    /// All descendants matching `css`, in document order
    fn select_all(&self, css: &str) -> Vec<Node<'a>>;

    /// Trimmed text of the first descendant matching `css`
    fn text_of(&self, css: &str) -> Option<String> {
        self.select_first(css).map(|node| node.text())
    }

    /// Trimmed text of the first match, or an empty string
    fn text_or_default(&self, css: &str) -> String {
        self.text_of(css).unwrap_or_default()
    }
}

impl<'a> Scope<'a> for Node<'a> {
    fn select_first(&self, css: &str) -> Option<Node<'a>> {
        let selector = Selector::parse(css).ok()?;
        self.element
            .select(&selector)
            .next()
            .map(|element| Node { element })
    }

    fn select_all(&self, css: &str) -> Vec<Node<'a>> {
        match Selector::parse(css) {
            Ok(selector) => self
                .element
                .select(&selector)
                .map(|element| Node { element })
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl<'a> Node<'a> {
    /// Lowercase tag name
    pub fn name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Attribute value, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Concatenated text content, trimmed
    pub fn text(&self) -> String {
        self.element.text().collect::<String>().trim().to_string()
    }

    /// Text content with every whitespace run collapsed to one space
    pub fn inline_text(&self) -> String {
        collapse_whitespace(&self.element.text().collect::<String>())
    }

    /// Nearest preceding sibling element with the given tag name
    pub fn previous_sibling_named(&self, tag: &str) -> Option<Node<'a>> {
        self.element
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| sibling.value().name() == tag)
            .map(|element| Node { element })
    }

    /// First element with the given tag name after this one in document
    /// order (descendants included)
    pub fn next_in_document(&self, tag: &str) -> Option<Node<'a>> {
        let node = *self.element.deref();
        let own_id = node.id();
        node.tree()
            .root()
            .descendants()
            .skip_while(|node| node.id() != own_id)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == tag)
            .map(|element| Node { element })
    }
}

/// Collapses whitespace runs to single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
