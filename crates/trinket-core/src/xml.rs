//! Minimal element tree for the source markup dialect
//!
//! Source files are a bare sequence of sibling nodes rather than a single
//! document, so content is wrapped in a synthetic `<root>` before parsing.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Name of the synthetic wrapper element
pub const SYNTHETIC_ROOT: &str = "root";

/// A parsed element with its attributes, direct text and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, String> {
        let tag = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            attributes.push((key, value.to_string()));
        }
        Ok(Self {
            tag,
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    /// Get an attribute value
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Shorthand for the `name` attribute
    pub fn name_attr(&self) -> Option<&str> {
        self.attr("name")
    }

    /// Direct text, trimmed
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    /// First child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All children with the given tag
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// First child with the given tag and `name` attribute
    pub fn named_child(&self, tag: &str, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.tag == tag && c.name_attr() == Some(name))
    }
}

/// Parse source content, wrapped in the synthetic root
///
/// Returns the synthetic root element. Mismatched or unclosed tags,
/// malformed attributes and unknown entities are errors.
pub fn parse_wrapped(content: &str) -> Result<Element, String> {
    let wrapped = format!("<{0}>{1}</{0}>", SYNTHETIC_ROOT, content);
    let mut reader = Reader::from_str(&wrapped);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if root.is_some() {
                    return Err("content after the document end".to_string());
                }
                stack.push(Element::from_start(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let element = Element::from_start(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Err("element outside the document".to_string()),
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                ))
            }
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(format!("unclosed element <{}>", unclosed.tag));
    }

    root.ok_or_else(|| "empty document".to_string())
}
