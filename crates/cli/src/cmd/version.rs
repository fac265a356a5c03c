//! Implementation of the `sopm version` command.

use std::path::Path;

use anyhow::{Context, Result};

use sopm_lib::Sopm;

use crate::output;

pub fn cmd_version(file: &Path, version: &str, message: &str) -> Result<()> {
  let mut sopm = Sopm::open(file).with_context(|| format!("Failed to load {}", file.display()))?;

  let manifest = sopm
    .append_version(version, message)
    .with_context(|| format!("Failed to append version {}", version))?;

  let entries = manifest.change_log.as_deref().map(<[_]>::len).unwrap_or(0);
  output::print_success(&format!(
    "{} is now {} ({} changelog entries)",
    manifest.name, manifest.version, entries
  ));
  Ok(())
}
