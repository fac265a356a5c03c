//! Owned XML tree with a quick-xml based reader and writer.
//!
//! SOPM mutation semantics depend on sibling order (changelog entries are
//! inserted before existing ones, build info before the file list), so the
//! engine works on a real tree rather than on a stream of events. Whitespace
//! text nodes are kept, which lets a parse/serialize round trip preserve the
//! original file layout.

mod read;
mod tree;
mod write;

pub use read::parse;
pub use tree::{Document, Element, XmlDecl, XmlError, XmlNode};
