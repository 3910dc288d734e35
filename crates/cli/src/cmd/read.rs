//! Implementation of the `imgbuild read` command.

use anyhow::Result;

use super::{HostOptions, load_required_state};
use crate::output::print_state;

/// Show the persisted state. The build tool is not run.
pub fn cmd_read(options: &HostOptions) -> Result<()> {
  let state = load_required_state(&options.state_file())?;
  let state = options.lifecycle().read(state);
  print_state("Image build state", &state, options.format)
}
