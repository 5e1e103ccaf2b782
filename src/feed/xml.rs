//! Minimal typed element tree with a single serialization step.
//!
//! Renderers build an [`Element`] tree and hand it to [`to_document`], which
//! writes it through `quick_xml::Writer`. Escaping of text and attribute
//! values is the writer's job; characters XML 1.0 cannot carry at all are
//! removed before writing.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use thiserror::Error;

use crate::util::strip_invalid_xml_chars;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to write XML: {0}")]
    Write(String),

    #[error("Generated XML contains invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Shorthand for an element holding only text.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    /// Appends a text node. Empty text still produces an open/close pair.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), RenderError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            let value = strip_invalid_xml_chars(value);
            start.push_attribute((key.as_str(), &*value));
        }

        if self.children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }

        write_event(writer, Event::Start(start))?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer)?,
                Node::Text(text) => {
                    let text = strip_invalid_xml_chars(text);
                    write_event(writer, Event::Text(BytesText::new(&text)))?;
                }
            }
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

fn write_event<W: std::io::Write>(
    writer: &mut Writer<W>,
    event: Event<'_>,
) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Write(e.to_string()))
}

/// Serializes `root` as a complete document, prefixed with
/// `<?xml version="1.0" encoding="UTF-8"?>`. No indentation is added.
pub fn to_document(root: &Element) -> Result<String, RenderError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    root.write(&mut writer)?;

    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_document() {
        let root = Element::new("root")
            .attr("version", "2.0")
            .child(Element::with_text("title", "Hello"))
            .child(Element::new("empty").attr("rel", "self"));

        assert_eq!(
            to_document(&root).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?><root version="2.0"><title>Hello</title><empty rel="self"/></root>"#
        );
    }

    #[test]
    fn test_text_and_attributes_escaped() {
        let root = Element::new("a")
            .attr("href", "https://x.test/?a=1&b=\"2\"")
            .text("Fish & <Chips>");

        let doc = to_document(&root).unwrap();
        assert!(doc.contains(r#"href="https://x.test/?a=1&amp;b=&quot;2&quot;""#), "{}", doc);
        assert!(doc.contains("Fish &amp; &lt;Chips&gt;"), "{}", doc);
    }

    #[test]
    fn test_empty_text_keeps_open_close_pair() {
        let doc = to_document(&Element::with_text("summary", "")).unwrap();
        assert!(doc.ends_with("<summary></summary>"), "{}", doc);
    }

    #[test]
    fn test_control_characters_removed() {
        let doc = to_document(&Element::with_text("title", "bell\u{7} tab\t")).unwrap();
        assert!(doc.ends_with("<title>bell tab\t</title>"), "{}", doc);
    }

    #[test]
    fn test_children_preserve_order() {
        let root = Element::new("list").children(
            ["one", "two", "three"]
                .into_iter()
                .map(|t| Element::with_text("item", t)),
        );
        let doc = to_document(&root).unwrap();
        assert!(doc.ends_with("<list><item>one</item><item>two</item><item>three</item></list>"));
    }
}
