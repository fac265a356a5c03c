//! Manifest field types.
//!
//! One fixed struct per SOPM concept: presence of optional fields is encoded
//! in the type, and the four lifecycle stages
//! (Install/Upgrade/Reinstall/Uninstall) get one field per block kind. Intro
//! blocks live in their own `intro_<stage>` fields rather than sharing
//! `code_<stage>` with code blocks; see DESIGN.md.

use serde::{Deserialize, Serialize};

/// One `<ChangeLog Version=".." Date="..">` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date: Option<String>,
  pub log: String,
}

/// A `<PackageRequired>` or `<ModuleRequired>` dependency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
}

/// A `<Description Lang="..">` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language: Option<String>,
  pub text: String,
}

/// One `<Filelist>/<File>` entry.
///
/// `content` is populated only when the source element carries
/// `Encode="Base64"`; it then holds the decoded bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
  pub location: String,
  pub permission: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content: Option<Vec<u8>>,
}

/// A `<Code<Stage>>` lifecycle script block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub code_type: Option<String>,
  pub code: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub if_package: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub if_not_package: Option<String>,
}

/// An `<Intro<Stage>>` text block shown during package installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntroBlock {
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub intro_type: Option<String>,
  pub intro: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub language: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,
}

/// The complete manifest record.
///
/// Required fields are plain values; every optional field maps presence of
/// its element (with children) in the source document. Ordered sequences
/// preserve document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  pub name: String,
  pub version: String,
  pub vendor: String,
  pub license: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_date: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub build_host: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package_is_visible: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package_is_downloadable: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package_is_removable: Option<bool>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub change_log: Option<Vec<ChangeLogEntry>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub os: Option<Vec<String>>,
  pub framework: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package_required: Option<Vec<Requirement>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub module_required: Option<Vec<Requirement>>,
  pub description: Vec<Description>,
  pub files: Vec<FileEntry>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code_install: Option<Vec<CodeBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code_upgrade: Option<Vec<CodeBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code_reinstall: Option<Vec<CodeBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub code_uninstall: Option<Vec<CodeBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub intro_install: Option<Vec<IntroBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub intro_upgrade: Option<Vec<IntroBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub intro_reinstall: Option<Vec<IntroBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub intro_uninstall: Option<Vec<IntroBlock>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub database_install: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub database_upgrade: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub database_reinstall: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub database_uninstall: Option<Vec<String>>,
}
