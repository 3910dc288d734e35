//! Implementation of the `imgbuild import` command.

use anyhow::{Context, Result};

use super::HostOptions;
use crate::output::print_state;

/// Seed the state file with an existing identity.
pub fn cmd_import(identity: &str, options: &HostOptions) -> Result<()> {
  if identity.is_empty() {
    anyhow::bail!("Identity must not be empty");
  }

  let state_file = options.state_file();
  if state_file.exists() {
    anyhow::bail!("State already exists at {}", state_file.path().display());
  }

  let imported = options.lifecycle().import(identity);
  state_file
    .save(&imported)
    .with_context(|| format!("Failed to save state {}", state_file.path().display()))?;

  print_state("Image build imported", &imported, options.format)
}
