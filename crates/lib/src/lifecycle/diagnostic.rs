//! Lifecycle errors and their user-facing diagnostics.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::execute::InvokeError;
use crate::params::Subcommand;

/// Errors that abort a create or update.
///
/// Either variant means nothing was stamped and no new state exists.
#[derive(Debug, Error)]
pub enum LifecycleError {
  #[error("initialize failed: {0}")]
  Initialize(#[source] InvokeError),

  #[error("build failed: {0}")]
  Build(#[source] InvokeError),
}

impl LifecycleError {
  pub(crate) fn at(subcommand: Subcommand, err: InvokeError) -> Self {
    match subcommand {
      Subcommand::Initialize => LifecycleError::Initialize(err),
      Subcommand::Build => LifecycleError::Build(err),
    }
  }

  /// Subcommand that failed.
  pub fn subcommand(&self) -> Subcommand {
    match self {
      LifecycleError::Initialize(_) => Subcommand::Initialize,
      LifecycleError::Build(_) => Subcommand::Build,
    }
  }

  pub fn invoke_error(&self) -> &InvokeError {
    match self {
      LifecycleError::Initialize(err) | LifecycleError::Build(err) => err,
    }
  }

  /// Summary and detail for the host to show the user.
  pub fn diagnostic(&self) -> Diagnostic {
    let err = self.invoke_error();
    let output = err.output_lossy();
    let detail = if output.is_empty() {
      format!("could not run build tool command: {}", err)
    } else {
      format!("could not run build tool command: {}; output:\n{}", err, output.trim_end())
    };

    Diagnostic {
      summary: format!("{} failed", self.subcommand()),
      detail,
    }
  }
}

/// A short title plus a detail string carrying the wrapped error and the
/// captured build tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub summary: String,
  pub detail: String,
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.summary, self.detail)
  }
}
