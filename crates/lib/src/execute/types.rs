//! Types for build tool invocation.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running the build tool.
#[derive(Debug, Error)]
pub enum InvokeError {
  /// The build tool executable could not be determined.
  #[error("failed to locate build tool executable: {0}")]
  Locate(#[source] std::io::Error),

  /// The process could not be started.
  #[error("failed to start {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// The process exited non-zero or was killed by a signal.
  #[error("{program} failed ({status})")]
  Failed {
    program: String,
    status: ExitStatus,
    output: Vec<u8>,
  },

  /// The process outlived its deadline and was killed.
  #[error("{program} timed out after {timeout:?}")]
  TimedOut {
    program: String,
    timeout: Duration,
    output: Vec<u8>,
  },

  /// I/O error while collecting output or waiting on the process.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl InvokeError {
  /// Combined output captured before the failure, empty if the process never ran.
  pub fn output(&self) -> &[u8] {
    match self {
      InvokeError::Failed { output, .. } | InvokeError::TimedOut { output, .. } => output,
      _ => &[],
    }
  }

  /// Captured output decoded as lossy UTF-8.
  pub fn output_lossy(&self) -> String {
    String::from_utf8_lossy(self.output()).into_owned()
  }
}

/// One build tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
  pub program: PathBuf,
  pub working_dir: PathBuf,
  /// Complete environment of the child; nothing else is inherited.
  pub env: BTreeMap<String, String>,
  pub args: Vec<String>,
}

impl InvokeRequest {
  /// Program and arguments as a single display string.
  pub fn command_line(&self) -> String {
    let mut line = self.program.display().to_string();
    for arg in &self.args {
      line.push(' ');
      line.push_str(arg);
    }
    line
  }
}

/// Output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Interleaved stdout and stderr.
  pub combined: Vec<u8>,
}

impl CommandOutput {
  pub fn combined_str(&self) -> String {
    String::from_utf8_lossy(&self.combined).into_owned()
  }
}
