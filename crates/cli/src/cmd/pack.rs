//! Implementation of the `sopm pack` command.
//!
//! Produces the OPM distributable: the SOPM document with every listed file
//! read from disk and embedded as Base64. File locations are resolved
//! relative to the SOPM file's directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sopm_lib::Sopm;

use crate::output;

pub fn cmd_pack(file: &Path, output_path: Option<PathBuf>) -> Result<()> {
  let sopm = Sopm::open(file).with_context(|| format!("Failed to load {}", file.display()))?;

  let base_dir = file.parent().unwrap_or(Path::new("."));
  let opm = sopm
    .pack(base_dir)
    .with_context(|| format!("Failed to pack {}", file.display()))?;

  let manifest = sopm.manifest();
  let output_path = output_path
    .unwrap_or_else(|| base_dir.join(format!("{}-{}.opm", manifest.name, manifest.version)));

  fs::write(&output_path, &opm)
    .with_context(|| format!("Failed to write {}", output_path.display()))?;

  output::print_success(&format!(
    "Packed {} file(s) into {}",
    manifest.files.len(),
    output_path.display()
  ));
  Ok(())
}
