//! Minimal owned XML tree on top of the quick-xml event reader.
//!
//! The metadata document is small, and two of its sections (free-form key
//! values and the legacy blob) must be re-emitted as raw markup, so parsing
//! into a tree is simpler than a one-pass state machine.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::MetadataError;

/// One node of a parsed document
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum XmlNode {
    /// Nested element
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
}

/// An element with its attributes and children
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, MetadataError> {
        let name = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element called `name`
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element matching any of `names`, tried in order
    pub fn child_any(&self, names: &[&str]) -> Option<&XmlElement> {
        names.iter().find_map(|name| self.child(name))
    }

    /// Follow a path of child names
    pub fn descend(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }

    /// Text of the first child called `name`, if present and non-empty
    pub fn child_text(&self, names: &[&str]) -> Option<String> {
        self.child_any(names)
            .map(|e| e.text().trim().to_string())
            .filter(|t| !t.is_empty())
    }

    /// Value of attribute `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Serialize this element (and its subtree) without whitespace
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        write_nodes(&self.children, out);
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Serialize this element to a new string
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

/// Serialize a node list
pub(crate) fn write_nodes(nodes: &[XmlNode], out: &mut String) {
    for node in nodes {
        match node {
            XmlNode::Element(e) => e.write_to(out),
            XmlNode::Text(t) => out.push_str(&escape(t.as_str())),
        }
    }
}

/// Parse `text` into its top-level nodes.
///
/// Comments, processing instructions and the declaration are dropped;
/// whitespace-only text is dropped as well.
pub(crate) fn parse_fragment(text: &str) -> Result<Vec<XmlNode>, MetadataError> {
    let mut reader = Reader::from_reader(text.as_bytes());
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut roots: Vec<XmlNode> = Vec::new();

    fn attach(stack: &mut [XmlElement], roots: &mut Vec<XmlNode>, node: XmlNode) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                stack.push(XmlElement::from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = XmlElement::from_start(e)?;
                attach(&mut stack, &mut roots, XmlNode::Element(element));
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| {
                    MetadataError::InvalidFormat("unbalanced end tag".to_string())
                })?;
                attach(&mut stack, &mut roots, XmlNode::Element(element));
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape()?.into_owned();
                if !text.trim().is_empty() {
                    attach(&mut stack, &mut roots, XmlNode::Text(text));
                }
            }
            Ok(Event::CData(c)) => {
                let text = std::str::from_utf8(&c)?.to_string();
                attach(&mut stack, &mut roots, XmlNode::Text(text));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(MetadataError::XmlError(e)),
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(MetadataError::InvalidFormat(format!(
            "element <{}> is not closed",
            open.name
        )));
    }
    Ok(roots)
}

/// Parse a document and return its first root element
pub(crate) fn parse_root(text: &str) -> Result<XmlElement, MetadataError> {
    parse_fragment(text)?
        .into_iter()
        .find_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
        .ok_or_else(|| MetadataError::InvalidFormat("document has no root element".to_string()))
}

/// Whether `text` is well-formed markup: it parses, holds at least one
/// element and has no character data outside of elements.
pub fn is_valid_xml(text: &str) -> bool {
    match parse_fragment(text) {
        Ok(nodes) => {
            !nodes.is_empty() && nodes.iter().all(|n| matches!(n, XmlNode::Element(_)))
        }
        Err(_) => false,
    }
}
