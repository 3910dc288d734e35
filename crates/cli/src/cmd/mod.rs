mod create;
mod delete;
mod import;
mod proxy;
mod read;
mod schema;
mod update;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use imgbuild_lib::consts::{DEFAULT_STATE_FILE, STATE_ENV, TOOL_ENV};
use imgbuild_lib::declaration::{ResourceDeclaration, load_declaration};
use imgbuild_lib::execute::ProcessInvoker;
use imgbuild_lib::state::StateFile;
use imgbuild_lib::{Lifecycle, LifecycleError};

use crate::output::OutputFormat;

pub use create::cmd_create;
pub use delete::cmd_delete;
pub use import::cmd_import;
pub use proxy::{cmd_proxy, is_tool_subcommand};
pub use read::cmd_read;
pub use schema::cmd_schema;
pub use update::cmd_update;

/// Options shared by the lifecycle commands.
#[derive(Debug, Clone)]
pub struct HostOptions {
  /// Explicit state file; falls back to `IMGBUILD_STATE`, then the default name.
  pub state: Option<PathBuf>,
  /// Build tool deadline per subcommand.
  pub timeout: Option<Duration>,
  pub format: OutputFormat,
}

impl HostOptions {
  pub fn state_file(&self) -> StateFile {
    let path = self.state.clone().unwrap_or_else(|| {
      std::env::var_os(STATE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
    });
    StateFile::new(path)
  }

  /// Lifecycle that re-invokes this binary as the build tool.
  ///
  /// The tool is resolved here and handed to the proxy explicitly, since a
  /// declaration may not inherit this process's environment.
  pub fn lifecycle(&self) -> Lifecycle {
    let invoker = match self.timeout {
      Some(timeout) => ProcessInvoker::new().with_timeout(timeout),
      None => ProcessInvoker::new(),
    };
    Lifecycle::with_parts(invoker, imgbuild_lib::execute::CurrentExe)
      .with_env(TOOL_ENV, proxy::tool().to_string_lossy().into_owned())
  }
}

fn load_config(path: &Path) -> Result<ResourceDeclaration> {
  load_declaration(path).with_context(|| format!("Failed to load declaration {}", path.display()))
}

fn load_required_state(file: &StateFile) -> Result<ResourceDeclaration> {
  file
    .load()
    .with_context(|| format!("Failed to load state {}", file.path().display()))?
    .with_context(|| format!("No state found at {}", file.path().display()))
}

/// Flatten a lifecycle failure into its diagnostic text.
fn diagnostic_error(err: LifecycleError) -> anyhow::Error {
  anyhow::anyhow!("{}", err.diagnostic())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
  tokio::runtime::Runtime::new().context("Failed to create async runtime")
}
