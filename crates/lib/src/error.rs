//! Error types for sopm-lib

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading, mutating, or packing a SOPM file
#[derive(Debug, Error)]
pub enum SopmError {
  #[error("sopm file not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("failed to access '{}': {}", .path.display(), .source)]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed sopm document: {0}")]
  Parse(#[from] crate::xml::XmlError),

  #[error("invalid base64 content for file '{location}': {source}")]
  Decode {
    location: String,
    #[source]
    source: base64::DecodeError,
  },

  #[error("required field '{0}' is missing or empty")]
  MissingRequiredField(&'static str),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("packaged file not found: {}", .0.display())]
  FileNotFound(PathBuf),
}
