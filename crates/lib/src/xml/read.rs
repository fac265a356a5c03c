//! Event-stream parsing into the owned tree.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::tree::{Document, Element, XmlDecl, XmlError, XmlNode};

/// Parse a byte slice into a [`Document`].
///
/// Text and attribute values are unescaped; whitespace-only text nodes are
/// kept so serialization reproduces the source layout. Comments and CDATA
/// sections survive the round trip.
pub fn parse(bytes: &[u8]) -> Result<Document, XmlError> {
  let mut reader = Reader::from_reader(bytes);
  let mut buf = Vec::new();

  let mut decl: Option<XmlDecl> = None;
  let mut stack: Vec<Element> = Vec::new();
  let mut root: Option<Element> = None;

  loop {
    match reader.read_event_into(&mut buf)? {
      Event::Decl(d) => {
        let version = decode(d.version()?.as_ref())?;
        let encoding = match d.encoding() {
          Some(enc) => Some(decode(enc?.as_ref())?),
          None => None,
        };
        let standalone = match d.standalone() {
          Some(sa) => Some(decode(sa?.as_ref())?),
          None => None,
        };
        decl = Some(XmlDecl {
          version,
          encoding,
          standalone,
        });
      }
      Event::Start(start) => {
        stack.push(element_from_start(&start)?);
      }
      Event::Empty(start) => {
        let element = element_from_start(&start)?;
        attach(&mut stack, &mut root, element);
      }
      Event::End(_) => {
        let element = stack.pop().ok_or(XmlError::UnexpectedEnd)?;
        attach(&mut stack, &mut root, element);
      }
      Event::Text(text) => {
        let content = text.unescape()?.into_owned();
        if let Some(parent) = stack.last_mut() {
          parent.push(XmlNode::Text(content));
        }
      }
      Event::CData(cdata) => {
        let content = decode(&cdata.into_inner())?;
        if let Some(parent) = stack.last_mut() {
          parent.push(XmlNode::CData(content));
        }
      }
      Event::Comment(comment) => {
        let content = decode(&comment.into_inner())?;
        if let Some(parent) = stack.last_mut() {
          parent.push(XmlNode::Comment(content));
        }
      }
      Event::PI(_) | Event::DocType(_) => {}
      Event::Eof => break,
    }
    buf.clear();
  }

  let root = root.ok_or(XmlError::NoRoot)?;
  Ok(Document { decl, root })
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, XmlError> {
  let mut element = Element::new(decode(start.name().as_ref())?);
  for attr in start.attributes() {
    let attr = attr.map_err(quick_xml::Error::from)?;
    let name = decode(attr.key.as_ref())?;
    let value = attr.unescape_value()?.into_owned();
    element.attrs.push((name, value));
  }
  Ok(element)
}

/// Strict UTF-8 decode; invalid bytes are a parse failure, not data loss.
fn decode(bytes: &[u8]) -> Result<String, XmlError> {
  Ok(std::str::from_utf8(bytes)?.to_owned())
}

/// Hand a completed element to its parent, or make it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
  match stack.last_mut() {
    Some(parent) => parent.push(XmlNode::Element(element)),
    None => *root = Some(element),
  }
}
