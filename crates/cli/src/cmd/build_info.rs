//! Implementation of the `sopm build-info` command.

use std::path::Path;

use anyhow::{Context, Result};

use sopm_lib::Sopm;

use crate::output;

pub fn cmd_build_info(file: &Path, host: Option<String>) -> Result<()> {
  let host = match host {
    Some(host) => host,
    None => whoami::fallible::hostname().context("Failed to detect local hostname")?,
  };

  let mut sopm = Sopm::open(file).with_context(|| format!("Failed to load {}", file.display()))?;
  let manifest = sopm
    .add_build_information(&host)
    .context("Failed to stamp build information")?;

  output::print_success(&format!(
    "Stamped build on {} at {}",
    host,
    manifest.build_date.as_deref().unwrap_or("-")
  ));
  Ok(())
}
