//! Implementation of the `sopm show` command.

use std::path::Path;

use anyhow::{Context, Result};

use sopm_lib::Sopm;

use crate::output::{self, OutputFormat};

pub fn cmd_show(file: &Path, format: OutputFormat) -> Result<()> {
  let sopm = Sopm::open(file).with_context(|| format!("Failed to load {}", file.display()))?;
  let manifest = sopm.manifest();

  if format.is_json() {
    return output::print_json(manifest);
  }

  println!("{} {}", manifest.name, manifest.version);
  output::print_stat("Vendor", &manifest.vendor);
  output::print_stat("License", &manifest.license);
  if let Some(url) = &manifest.url {
    output::print_stat("URL", url);
  }
  if let Some(host) = &manifest.build_host {
    output::print_stat("Build host", host);
  }
  if let Some(date) = &manifest.build_date {
    output::print_stat("Build date", date);
  }
  output::print_stat("Frameworks", &manifest.framework.join(", "));
  output::print_stat("Files", &manifest.files.len().to_string());

  if let Some(entries) = &manifest.change_log {
    println!();
    println!("Changelog:");
    for entry in entries {
      println!(
        "  {}  {}  {}",
        entry.version.as_deref().unwrap_or("-"),
        entry.date.as_deref().unwrap_or("-"),
        entry.log
      );
    }
  }

  Ok(())
}
