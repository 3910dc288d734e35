//! Implementation of the `imgbuild create` command.

use std::path::Path;

use anyhow::{Context, Result};

use super::{HostOptions, diagnostic_error, load_config, runtime};
use crate::output::print_state;

/// Build a new image from the declaration file and persist the stamped state.
///
/// Refuses to run when state already exists. Nothing is written on failure.
pub fn cmd_create(config: &Path, options: &HostOptions) -> Result<()> {
  let state_file = options.state_file();
  if state_file.exists() {
    anyhow::bail!(
      "State already exists at {}; use 'imgbuild update' or 'imgbuild delete'",
      state_file.path().display()
    );
  }

  let decl = load_config(config)?;
  let lifecycle = options.lifecycle();

  let created = runtime()?
    .block_on(lifecycle.create(decl))
    .map_err(diagnostic_error)?;

  state_file
    .save(&created)
    .with_context(|| format!("Failed to save state {}", state_file.path().display()))?;

  print_state("Image build created", &created, options.format)
}
