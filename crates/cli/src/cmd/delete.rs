//! Implementation of the `imgbuild delete` command.

use anyhow::{Context, Result};
use tracing::warn;

use super::HostOptions;
use crate::output::{print_info, print_success};

/// Forget the resource: remove its state file.
///
/// The built image itself is left alone. Succeeds when there is no state,
/// and removes a state file even if it can no longer be parsed.
pub fn cmd_delete(options: &HostOptions) -> Result<()> {
  let state_file = options.state_file();

  let prior = match state_file.load() {
    Ok(prior) => prior,
    Err(e) => {
      warn!(path = %state_file.path().display(), error = %e, "unreadable state, removing it anyway");
      None
    }
  };
  let existed = state_file.exists();

  if let Some(prior) = prior {
    options.lifecycle().delete(prior);
  }
  state_file
    .remove()
    .with_context(|| format!("Failed to remove state {}", state_file.path().display()))?;

  if existed {
    print_success(&format!("Removed state {}", state_file.path().display()));
  } else {
    print_info("Nothing to delete.");
  }
  Ok(())
}
