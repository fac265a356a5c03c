//! sopm: inspect and maintain OTRS SOPM package files.

mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// Inspect and maintain OTRS SOPM package files
#[derive(Parser)]
#[command(name = "sopm")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the parsed manifest
  Show {
    /// Path to the SOPM file
    file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Append a version and its changelog entry
  Version {
    /// Path to the SOPM file
    file: PathBuf,

    /// The new version number
    version: String,

    /// Changelog text for the new version
    #[arg(short, long)]
    message: String,
  },

  /// Stamp build host and build date
  BuildInfo {
    /// Path to the SOPM file
    file: PathBuf,

    /// Build host to record (defaults to the local hostname)
    #[arg(long)]
    host: Option<String>,
  },

  /// Register a file in the file list
  AddFile {
    /// Path to the SOPM file
    file: PathBuf,

    /// File location relative to the package root
    location: String,

    /// Permission digits for the installed file
    #[arg(long, default_value_t = 644)]
    permission: u32,
  },

  /// Write the packed OPM document with embedded file contents
  Pack {
    /// Path to the SOPM file
    file: PathBuf,

    /// Output path (defaults to <Name>-<Version>.opm next to the SOPM file)
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Show { file, format } => cmd::cmd_show(&file, format),
    Commands::Version {
      file,
      version,
      message,
    } => cmd::cmd_version(&file, &version, &message),
    Commands::BuildInfo { file, host } => cmd::cmd_build_info(&file, host),
    Commands::AddFile {
      file,
      location,
      permission,
    } => cmd::cmd_add_file(&file, &location, permission),
    Commands::Pack { file, output } => cmd::cmd_pack(&file, output),
  }
}
