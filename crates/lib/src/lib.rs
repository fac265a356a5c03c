//! sopm-lib: Core types and logic for working with OTRS SOPM package files.
//!
//! This crate provides the building blocks of the `sopm` tool:
//! - `xml`: a small owned XML tree with a quick-xml based reader and writer
//! - `Manifest`: the typed record derived from a parsed SOPM document
//! - `Sopm`: the engine owning a SOPM file, its tree, and the derived manifest
//!
//! The engine supports targeted mutations (changelog append, build-info
//! upsert, file registration) and the pack transform producing an OPM
//! document with Base64-inlined file contents.

mod clock;
mod error;
pub mod manifest;
mod sopm;
pub mod xml;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::SopmError;
pub use manifest::{
  ChangeLogEntry, CodeBlock, Description, FileEntry, IntroBlock, Manifest, Requirement,
};
pub use sopm::Sopm;

/// Result type for SOPM operations
pub type Result<T> = std::result::Result<T, SopmError>;
