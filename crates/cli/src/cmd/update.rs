//! Implementation of the `imgbuild update` command.

use std::path::Path;

use anyhow::{Context, Result};

use super::{HostOptions, diagnostic_error, load_config, load_required_state, runtime};
use crate::output::print_state;

/// Rebuild with the declaration file as the plan, keeping the stored identity.
///
/// On failure the previous state file is left as it was.
pub fn cmd_update(config: &Path, options: &HostOptions) -> Result<()> {
  let state_file = options.state_file();
  let prior = load_required_state(&state_file)?;
  let plan = load_config(config)?;
  let lifecycle = options.lifecycle();

  let updated = runtime()?
    .block_on(lifecycle.update(plan, &prior))
    .map_err(diagnostic_error)?;

  state_file
    .save(&updated)
    .with_context(|| format!("Failed to save state {}", state_file.path().display()))?;

  print_state("Image build updated", &updated, options.format)
}
