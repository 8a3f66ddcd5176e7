//! A minimal element tree for template markup, read with quick-xml.
//!
//! Comments, processing instructions and declarations are dropped while
//! reading; CDATA sections become plain text.

use std::fmt::Write;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::MarkupError;

/// A child of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Unescaped character data.
    Text(String),
    /// A nested element.
    Element(Element),
}

/// A markup element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// The tag name, as written.
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Text and elements in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// An element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            ..Element::default()
        }
    }

    fn open(start: &BytesStart<'_>) -> Result<Self, MarkupError> {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
        for attribute in start.attributes() {
            let attribute = attribute?;
            element.attributes.push((
                String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
                attribute.unescape_value()?.into_owned(),
            ));
        }
        Ok(element)
    }

    /// The value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// The first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// Renders an element around already-rendered content:
    /// `<name a="b">content</name>`, or `<name a="b"/>` when empty.
    pub fn wrap(&self, content: &str) -> String {
        let mut rendered = format!("<{}", self.name);
        for (key, value) in &self.attributes {
            let _ = write!(rendered, " {key}=\"{}\"", escape(value.as_str()));
        }
        if content.is_empty() {
            rendered.push_str("/>");
        } else {
            let _ = write!(rendered, ">{content}</{}>", self.name);
        }
        rendered
    }

    /// Serializes the element and everything under it back to markup.
    pub fn to_markup(&self) -> String {
        let content = self
            .children
            .iter()
            .map(Node::to_markup)
            .collect::<String>();
        self.wrap(&content)
    }
}

impl Node {
    /// Serializes the element, escaping text and attribute values.
    pub fn to_markup(&self) -> String {
        match self {
            Node::Text(text) => escape(text.as_str()).into_owned(),
            Node::Element(element) => element.to_markup(),
        }
    }
}

/// Reads markup with exactly one root element.
pub fn parse(markup: &str) -> Result<Element, MarkupError> {
    let mut reader = Reader::from_str(markup);
    let mut open: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => open.push(Element::open(&start)?),
            Event::Empty(start) => close(&mut open, &mut root, Element::open(&start)?)?,
            Event::End(_) => {
                let element = open.pop().ok_or(MarkupError::Root)?;
                close(&mut open, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?.into_owned();
                push_text(&mut open, text)?;
            }
            Event::CData(data) => {
                push_text(&mut open, String::from_utf8_lossy(&data).into_owned())?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(element) = open.pop() {
        return Err(MarkupError::Unclosed(element.name));
    }
    root.ok_or(MarkupError::Root)
}

fn close(
    open: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), MarkupError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(MarkupError::Root),
    }
    Ok(())
}

fn push_text(open: &mut [Element], text: String) -> Result<(), MarkupError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Text(text)),
        None if text.trim().is_empty() => {}
        None => return Err(MarkupError::Root),
    }
    Ok(())
}
