//! Generic XML element tree
//!
//! Model documents are read into a plain element tree first and only then
//! interpreted by the typed layer in [`crate::pmml`]. Everything the typed
//! layer does not understand (model bodies, transformation expressions)
//! stays in this form and is written back verbatim.
//!
//! Reading rules:
//! - Namespace prefixes are stripped from element and attribute names
//! - `xmlns` declarations, comments, processing instructions and doctype
//!   declarations are dropped
//! - Whitespace-only text is dropped, other text is kept verbatim

use crate::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Write};

/// A node of the tree: either a child element or a run of text
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// XML element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes and no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style child appender
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder-style text appender
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }

    /// Attribute that must be present
    pub fn required_attribute(&self, key: &str) -> Result<&str> {
        self.attribute(key).ok_or_else(|| Error::MissingAttribute {
            element: self.name.clone(),
            attribute: key.to_string(),
        })
    }

    /// Iterate over child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Consume the element, yielding its child elements
    pub fn into_child_elements(self) -> impl Iterator<Item = Element> {
        self.children.into_iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given name
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|child| child.name == name)
    }

    /// Concatenated text content of the direct children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    /// Visit this element and all descendant elements in document order
    pub fn walk<F: FnMut(&Element)>(&self, visit: &mut F) {
        visit(self);
        for child in self.child_elements() {
            child.walk(visit);
        }
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Parse a complete XML document and return its root element
pub fn parse_reader<R: BufRead>(source: R) -> Result<Element> {
    let mut reader = Reader::from_reader(source);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                stack.push(start_element(&start)?);
            }
            Event::Empty(start) => {
                let element = start_element(&start)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::InvalidDocument("unbalanced closing tag".to_string())
                })?;
                close_element(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                push_text(&mut stack, &text);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::InvalidDocument(format!(
            "unexpected end of document inside <{}>",
            stack.last().map(|e| e.name.as_str()).unwrap_or_default()
        )));
    }

    root.ok_or_else(|| Error::InvalidDocument("document has no root element".to_string()))
}

/// Parse an XML document held in memory
pub fn parse_str(source: &str) -> Result<Element> {
    parse_reader(source.as_bytes())
}

fn start_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(decode_name(start.local_name().as_ref())?);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = attribute.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") {
            continue;
        }
        let name = decode_name(attribute.key.local_name().as_ref())?;
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((name, value));
    }

    Ok(element)
}

fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(Error::InvalidDocument(format!(
                "second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    // Text outside the root element is ignored
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Text(text.to_string()));
    }
}

fn decode_name(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| Error::InvalidDocument(format!("non UTF-8 name: {}", e)))
}

// ============================================================================
// Writing
// ============================================================================

/// Write `root` as a standalone UTF-8 document
///
/// `indent` is the number of spaces per nesting level; zero writes the
/// document on a single line.
pub fn write_document<W: Write>(root: &Element, sink: W, indent: usize) -> Result<()> {
    if indent > 0 {
        let mut writer = Writer::new_with_indent(sink, b' ', indent);
        write_root(&mut writer, root)
    } else {
        let mut writer = Writer::new(sink);
        write_root(&mut writer, root)
    }
}

/// Render `root` to a string
pub fn to_string(root: &Element, indent: usize) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(root, &mut buffer, indent)?;
    String::from_utf8(buffer).map_err(|e| Error::InvalidDocument(e.to_string()))
}

fn write_root<W: Write>(writer: &mut Writer<W>, root: &Element) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write_element(writer, root)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_namespaces_and_comments() {
        let root = parse_str(
            r#"<?xml version="1.0"?>
            <!-- generated -->
            <p:PMML xmlns:p="http://www.dmg.org/PMML-4_1" version="4.1">
                <p:Header copyright="x"/>
            </p:PMML>"#,
        )
        .unwrap();

        assert_eq!(root.name, "PMML");
        assert_eq!(root.attributes, vec![("version".to_string(), "4.1".to_string())]);
        assert_eq!(root.child_elements().count(), 1);
        assert_eq!(root.find_child("Header").unwrap().attribute("copyright"), Some("x"));
    }

    #[test]
    fn test_parse_keeps_text_verbatim() {
        let root = parse_str("<Constant> a </Constant>").unwrap();
        assert_eq!(root.text(), " a ");

        let root = parse_str("<Array n=\"2\" type=\"string\">\"a b\"  c\n</Array>").unwrap();
        assert_eq!(root.text(), "\"a b\"  c\n");
    }

    #[test]
    fn test_parse_drops_whitespace_only_text() {
        let root = parse_str("<Apply>\n    <Constant>1</Constant>\n</Apply>").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.find_child("Constant").unwrap().text(), "1");
    }

    #[test]
    fn test_padded_text_survives_write() {
        let tree = Element::new("Constant").with_text(" a ");
        for indent in [0, 2] {
            let text = to_string(&tree, indent).unwrap();
            assert_eq!(parse_str(&text).unwrap(), tree);
        }
    }

    #[test]
    fn test_parse_unescapes_attributes() {
        let root = parse_str(r#"<Value value="a &amp; b"/>"#).unwrap();
        assert_eq!(root.attribute("value"), Some("a & b"));
    }

    #[test]
    fn test_parse_rejects_unbalanced_document() {
        let result = parse_str("<PMML><Header></PMML>");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_empty_document() {
        let result = parse_str("<?xml version=\"1.0\"?>");
        assert!(matches!(result, Err(Error::InvalidDocument(_))));
    }

    #[test]
    fn test_write_then_parse_preserves_tree() {
        let tree = Element::new("Apply")
            .with_attribute("function", "+")
            .with_child(Element::new("FieldRef").with_attribute("field", "x<1"))
            .with_child(Element::new("Constant").with_text("1.5"));

        for indent in [0, 2] {
            let text = to_string(&tree, indent).unwrap();
            assert!(text.starts_with("<?xml"));
            assert_eq!(parse_str(&text).unwrap(), tree);
        }
    }

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut element = Element::new("x").with_attribute("a", "1").with_attribute("b", "2");
        element.set_attribute("a", "3");
        assert_eq!(element.attributes[0], ("a".to_string(), "3".to_string()));
        assert_eq!(element.remove_attribute("b"), Some("2".to_string()));
        assert_eq!(element.attributes.len(), 1);
    }

    #[test]
    fn test_walk_visits_descendants_in_order() {
        let tree = Element::new("a")
            .with_child(Element::new("b").with_child(Element::new("c")))
            .with_child(Element::new("d"));
        let mut names = Vec::new();
        tree.walk(&mut |e| names.push(e.name.clone()));
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }
}
