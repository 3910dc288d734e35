//! Build tool executable lookup.
//!
//! By default the lifecycle re-invokes the running binary, which doubles as the
//! build tool entry point (see the CLI's proxy mode). Tests and embedders can
//! point at any other executable instead.

use std::path::PathBuf;

use crate::execute::types::InvokeError;

/// Resolves the executable the build tool subcommands are run with.
pub trait ExecutableLocator {
  fn locate(&self) -> Result<PathBuf, InvokeError>;
}

/// The currently running executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrentExe;

impl ExecutableLocator for CurrentExe {
  fn locate(&self) -> Result<PathBuf, InvokeError> {
    std::env::current_exe().map_err(InvokeError::Locate)
  }
}

/// A fixed executable path or name (resolved through `PATH` by the OS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedExecutable(pub PathBuf);

impl FixedExecutable {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self(path.into())
  }
}

impl ExecutableLocator for FixedExecutable {
  fn locate(&self) -> Result<PathBuf, InvokeError> {
    Ok(self.0.clone())
  }
}

impl<L: ExecutableLocator + ?Sized> ExecutableLocator for &L {
  fn locate(&self) -> Result<PathBuf, InvokeError> {
    (**self).locate()
  }
}
