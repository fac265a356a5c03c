//! Tree types and navigation/mutation helpers.

use thiserror::Error;

/// Error while reading or writing an XML document
#[derive(Debug, Error)]
pub enum XmlError {
  #[error(transparent)]
  Xml(#[from] quick_xml::Error),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error("document is not valid UTF-8: {0}")]
  Utf8(#[from] std::str::Utf8Error),

  #[error("document has no root element")]
  NoRoot,

  #[error("closing tag without matching opening tag")]
  UnexpectedEnd,
}

/// The `<?xml ...?>` declaration of the source document
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDecl {
  pub version: String,
  pub encoding: Option<String>,
  pub standalone: Option<String>,
}

/// A node in the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
  Element(Element),
  Text(String),
  CData(String),
  Comment(String),
}

impl XmlNode {
  pub fn as_element(&self) -> Option<&Element> {
    match self {
      XmlNode::Element(el) => Some(el),
      _ => None,
    }
  }

  pub fn as_element_mut(&mut self) -> Option<&mut Element> {
    match self {
      XmlNode::Element(el) => Some(el),
      _ => None,
    }
  }
}

/// An element with attributes and ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
  pub name: String,
  /// Attributes in document order
  pub attrs: Vec<(String, String)>,
  /// Child nodes in document order, whitespace text included
  pub children: Vec<XmlNode>,
}

impl Element {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      attrs: Vec::new(),
      children: Vec::new(),
    }
  }

  pub fn attr(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }

  /// Set an attribute, replacing an existing one of the same name
  pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    let value = value.into();
    match self.attrs.iter_mut().find(|(key, _)| *key == name) {
      Some(entry) => entry.1 = value,
      None => self.attrs.push((name, value)),
    }
  }

  /// Content of the first text or CDATA child
  pub fn text(&self) -> Option<&str> {
    self.children.iter().find_map(|child| match child {
      XmlNode::Text(text) | XmlNode::CData(text) => Some(text.as_str()),
      _ => None,
    })
  }

  /// Replace all children with a single text node
  pub fn set_text(&mut self, text: impl Into<String>) {
    self.children = vec![XmlNode::Text(text.into())];
  }

  /// Whether the element has any children at all. An element is treated as
  /// present only when it has children; `<URL/>` counts as absent.
  pub fn has_children(&self) -> bool {
    !self.children.is_empty()
  }

  /// First child element with the given name
  pub fn child(&self, name: &str) -> Option<&Element> {
    self
      .children
      .iter()
      .filter_map(XmlNode::as_element)
      .find(|el| el.name == name)
  }

  pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
    self
      .children
      .iter_mut()
      .filter_map(XmlNode::as_element_mut)
      .find(|el| el.name == name)
  }

  /// All child elements with the given name, in document order
  pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
    self
      .children
      .iter()
      .filter_map(XmlNode::as_element)
      .filter(move |el| el.name == name)
  }

  pub fn children_named_mut<'a>(
    &'a mut self,
    name: &'a str,
  ) -> impl Iterator<Item = &'a mut Element> {
    self
      .children
      .iter_mut()
      .filter_map(XmlNode::as_element_mut)
      .filter(move |el| el.name == name)
  }

  /// Index of the first child element with the given name
  pub fn position_of_first(&self, name: &str) -> Option<usize> {
    self.children.iter().position(|child| {
      child
        .as_element()
        .is_some_and(|el| el.name == name)
    })
  }

  /// Index of the last child element with the given name
  pub fn position_of_last(&self, name: &str) -> Option<usize> {
    self
      .children
      .iter()
      .rposition(|child| child.as_element().is_some_and(|el| el.name == name))
  }

  pub fn insert(&mut self, index: usize, node: XmlNode) {
    self.children.insert(index, node);
  }

  pub fn push(&mut self, node: XmlNode) {
    self.children.push(node);
  }
}

/// A parsed document: optional XML declaration plus the root element
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
  pub decl: Option<XmlDecl>,
  pub root: Element,
}
