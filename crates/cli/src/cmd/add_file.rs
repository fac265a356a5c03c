//! Implementation of the `sopm add-file` command.

use std::path::Path;

use anyhow::{Context, Result};

use sopm_lib::Sopm;

use crate::output;

pub fn cmd_add_file(file: &Path, location: &str, permission: u32) -> Result<()> {
  let mut sopm = Sopm::open(file).with_context(|| format!("Failed to load {}", file.display()))?;

  let before = sopm.manifest().files.len();
  sopm
    .add_file(location, permission)
    .with_context(|| format!("Failed to register {}", location))?;

  if sopm.manifest().files.len() == before {
    output::print_info(&format!("{} ({}) already listed", location, permission));
  } else {
    output::print_success(&format!("Registered {} ({})", location, permission));
  }
  Ok(())
}
