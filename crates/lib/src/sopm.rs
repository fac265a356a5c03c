//! The SOPM engine: exclusive owner of a manifest file and its parsed tree.
//!
//! Every mutation follows the same write-through cycle: mutate the tree,
//! serialize it to the backing file, then re-parse and re-derive the
//! [`Manifest`] snapshot. The snapshot therefore never reflects a write that
//! did not actually happen. There is no rollback; if a write fails midway the
//! tree and the file may disagree.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::SopmError;
use crate::manifest::Manifest;
use crate::xml::{self, Document, Element, XmlNode};

/// Attribute timestamp format used for ChangeLog dates and BuildDate
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Indentation of the direct children of `<otrs_package>`
const PACKAGE_INDENT: &str = "\n    ";
/// Indentation of `<File>` entries inside `<Filelist>`
const FILELIST_INDENT: &str = "\n        ";

/// An open SOPM file.
///
/// Owns the document tree exclusively; all mutation goes through `&mut self`,
/// so aliased edits of the tree are impossible. Operations are synchronous
/// and unbuffered; callers serialize access themselves.
pub struct Sopm {
  path: PathBuf,
  document: Document,
  manifest: Manifest,
  clock: Box<dyn Clock>,
}

impl Sopm {
  /// Open and parse a SOPM file, stamping timestamps from the system clock.
  pub fn open(path: impl Into<PathBuf>) -> crate::Result<Self> {
    Self::open_with_clock(path, Box::new(SystemClock))
  }

  /// Open with an explicit clock. Tests pass a [`crate::FixedClock`] to make
  /// changelog dates and build dates deterministic.
  pub fn open_with_clock(path: impl Into<PathBuf>, clock: Box<dyn Clock>) -> crate::Result<Self> {
    let path = path.into();
    if !path.exists() {
      return Err(SopmError::NotFound(path));
    }

    let bytes = fs::read(&path).map_err(|source| SopmError::Io {
      path: path.clone(),
      source,
    })?;
    let document = xml::parse(&bytes)?;
    let manifest = Manifest::from_document(&document)?;

    debug!(path = %path.display(), "loaded sopm file");
    Ok(Self {
      path,
      document,
      manifest,
      clock,
    })
  }

  /// The manifest snapshot derived from the current tree
  pub fn manifest(&self) -> &Manifest {
    &self.manifest
  }

  /// Path of the backing file
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Append a new version and its changelog entry.
  ///
  /// Overwrites the top-level Version text, normalizes the changelog text
  /// (tabs become two spaces, surrounding whitespace is trimmed; the caller's
  /// string is left untouched), and inserts one ChangeLog element carrying
  /// the version and the current timestamp immediately before the existing
  /// entries, so the newest entry comes first. With no existing entries the
  /// new one lands before the first Framework element.
  ///
  /// Strictly additive: N calls grow the changelog by exactly N entries,
  /// even when a version number repeats.
  pub fn append_version(&mut self, version: &str, change_log: &str) -> crate::Result<&Manifest> {
    if version.trim().is_empty() {
      return Err(SopmError::InvalidArgument(
        "version must not be empty".to_string(),
      ));
    }

    let log = normalize_change_log(change_log);
    let date = self.timestamp();

    let root = &mut self.document.root;
    root
      .child_mut("Version")
      .ok_or(SopmError::MissingRequiredField("Version"))?
      .set_text(version);

    let mut entry = Element::new("ChangeLog");
    entry.set_attr("Version", version);
    entry.set_attr("Date", date);
    entry.set_text(log);

    let anchor = root
      .position_of_first("ChangeLog")
      .or_else(|| root.position_of_first("Framework"))
      .unwrap_or(root.children.len());
    root.insert(anchor, XmlNode::Element(entry));
    root.insert(anchor + 1, XmlNode::Text(PACKAGE_INDENT.to_string()));

    info!(version, "appended changelog entry");
    self.store()?;
    Ok(&self.manifest)
  }

  /// Stamp build host and build date.
  ///
  /// Upsert semantics: each element is created immediately before Filelist
  /// when absent and text-overwritten in place when present, so at most one
  /// BuildHost and one BuildDate exist afterwards.
  pub fn add_build_information(&mut self, build_host: &str) -> crate::Result<&Manifest> {
    if build_host.trim().is_empty() {
      return Err(SopmError::InvalidArgument(
        "build host must not be empty".to_string(),
      ));
    }

    let date = self.timestamp();
    let root = &mut self.document.root;
    upsert_before_filelist(root, "BuildHost", build_host);
    upsert_before_filelist(root, "BuildDate", &date);

    info!(build_host, "stamped build information");
    self.store()?;
    Ok(&self.manifest)
  }

  /// Register a file in the file list.
  ///
  /// A file entry with the same location and the same permission already
  /// present makes this a silent no-op with no write. A matching location
  /// with a different permission is a distinct entry and is appended after
  /// the last existing File element (or as the first child of Filelist when
  /// the list is empty).
  pub fn add_file(&mut self, location: &str, permission: u32) -> crate::Result<()> {
    if location.trim().is_empty() {
      return Err(SopmError::InvalidArgument(
        "file location must not be empty".to_string(),
      ));
    }

    let permission = permission.to_string();
    let root = &mut self.document.root;
    if root.child("Filelist").is_none() {
      root.push(XmlNode::Element(Element::new("Filelist")));
    }
    let Some(filelist) = root.child_mut("Filelist") else {
      return Err(SopmError::MissingRequiredField("Filelist"));
    };

    let duplicate = filelist.children_named("File").any(|el| {
      el.attr("Location") == Some(location) && el.attr("Permission") == Some(permission.as_str())
    });
    if duplicate {
      debug!(location, permission = %permission, "file entry already present");
      return Ok(());
    }

    let mut entry = Element::new("File");
    entry.set_attr("Permission", permission);
    entry.set_attr("Location", location);

    let anchor = match filelist.position_of_last("File") {
      Some(last) => last + 1,
      None => 0,
    };
    filelist.insert(anchor, XmlNode::Text(FILELIST_INDENT.to_string()));
    filelist.insert(anchor + 1, XmlNode::Element(entry));

    info!(location, "registered file entry");
    self.store()
  }

  /// Serialize the tree, overwrite the backing file, and re-derive the
  /// manifest from a fresh parse of what was written.
  pub fn store(&mut self) -> crate::Result<()> {
    let text = self.document.to_xml()?;
    fs::write(&self.path, &text).map_err(|source| SopmError::Io {
      path: self.path.clone(),
      source,
    })?;

    self.document = xml::parse(text.as_bytes())?;
    self.manifest = Manifest::from_document(&self.document)?;

    debug!(path = %self.path.display(), "stored sopm file");
    Ok(())
  }

  /// Produce the packed OPM document with file contents inlined.
  ///
  /// Works on a clone of the live tree; packing never leaves the engine in a
  /// packed state. Every File entry's location is resolved against
  /// `base_dir`, read, and embedded as unwrapped standard Base64 under an
  /// `Encode="Base64"` marker. Returns the serialized document; writing it
  /// anywhere is the caller's business.
  pub fn pack(&self, base_dir: &Path) -> crate::Result<String> {
    let mut packed = self.document.clone();

    if let Some(filelist) = packed.root.child_mut("Filelist") {
      for entry in filelist.children_named_mut("File") {
        let location = entry.attr("Location").unwrap_or_default().to_string();
        let path = base_dir.join(&location);
        let bytes = fs::read(&path).map_err(|source| match source.kind() {
          std::io::ErrorKind::NotFound => SopmError::FileNotFound(path.clone()),
          _ => SopmError::Io {
            path: path.clone(),
            source,
          },
        })?;

        entry.set_attr("Encode", "Base64");
        entry.set_text(STANDARD.encode(&bytes));
        debug!(location = %location, size = bytes.len(), "embedded file");
      }
    }

    info!(base_dir = %base_dir.display(), "packed opm document");
    Ok(packed.to_xml()?)
  }

  fn timestamp(&self) -> String {
    self.clock.now().format(TIMESTAMP_FORMAT).to_string()
  }
}

/// Tabs become two spaces, surrounding whitespace goes away. Returns a new
/// string; the input is never modified.
fn normalize_change_log(change_log: &str) -> String {
  change_log.replace('\t', "  ").trim().to_string()
}

fn upsert_before_filelist(root: &mut Element, name: &str, text: &str) {
  match root.child_mut(name) {
    Some(el) => el.set_text(text),
    None => {
      let mut el = Element::new(name);
      el.set_text(text);
      let anchor = root
        .position_of_first("Filelist")
        .unwrap_or(root.children.len());
      root.insert(anchor, XmlNode::Element(el));
      root.insert(anchor + 1, XmlNode::Text(PACKAGE_INDENT.to_string()));
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use chrono::Utc;

  use crate::clock::FixedClock;

  use super::*;

  #[test]
  fn normalize_replaces_tabs_and_trims() {
    assert_eq!(
      normalize_change_log("\tAdded\texception handling.\n "),
      "Added  exception handling."
    );
    assert_eq!(normalize_change_log("   "), "");
  }

  #[test]
  fn timestamp_uses_injected_clock() {
    let clock = FixedClock(Utc.with_ymd_and_hms(2016, 1, 13, 8, 15, 0).unwrap());
    assert_eq!(
      clock.now().format(TIMESTAMP_FORMAT).to_string(),
      "2016-01-13 08:15:00"
    );
  }

  #[test]
  fn upsert_overwrites_in_place() {
    let mut root = Element::new("otrs_package");
    root.push(XmlNode::Element(Element::new("Filelist")));

    upsert_before_filelist(&mut root, "BuildHost", "first.example.com");
    upsert_before_filelist(&mut root, "BuildHost", "second.example.com");

    let hosts: Vec<_> = root.children_named("BuildHost").collect();
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].text(), Some("second.example.com"));
    assert_eq!(root.position_of_first("BuildHost"), Some(0));
  }
}
