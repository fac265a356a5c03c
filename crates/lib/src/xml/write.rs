//! Serialization of the owned tree back to XML text.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::tree::{Document, Element, XmlError, XmlNode};

impl Document {
  /// Serialize the document to canonical text.
  ///
  /// The source declaration is reproduced when one was present (a plain
  /// `<?xml version="1.0" encoding="utf-8" ?>` otherwise), text and attribute
  /// values are re-escaped, and the output ends with a newline.
  pub fn to_xml(&self) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());

    let decl = match &self.decl {
      Some(d) => BytesDecl::new(&d.version, d.encoding.as_deref(), d.standalone.as_deref()),
      None => BytesDecl::new("1.0", Some("utf-8"), None),
    };
    writer.write_event(Event::Decl(decl))?;
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;

    write_element(&mut writer, &self.root)?;

    let mut out = String::from_utf8_lossy(&writer.into_inner()).into_owned();
    if !out.ends_with('\n') {
      out.push('\n');
    }
    Ok(out)
  }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), XmlError> {
  let mut start = BytesStart::new(element.name.as_str());
  for (name, value) in &element.attrs {
    start.push_attribute((name.as_str(), value.as_str()));
  }

  if element.children.is_empty() {
    writer.write_event(Event::Empty(start))?;
    return Ok(());
  }

  writer.write_event(Event::Start(start))?;
  for child in &element.children {
    match child {
      XmlNode::Element(el) => write_element(writer, el)?,
      XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
      XmlNode::CData(content) => writer.write_event(Event::CData(BytesCData::new(content.as_str())))?,
      XmlNode::Comment(content) => {
        writer.write_event(Event::Comment(BytesText::from_escaped(content.as_str())))?
      }
    }
  }
  writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
  Ok(())
}
