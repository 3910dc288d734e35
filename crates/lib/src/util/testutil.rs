//! Test utilities for imgbuild-lib.
//!
//! Helpers for tests that run real shell commands, plus a recording invoker
//! that stands in for the build tool.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Mutex;

use crate::execute::{CommandInvoker, CommandOutput, InvokeError, InvokeRequest};

/// Minimal `PATH` for shell scripts run with a cleared environment.
#[cfg(unix)]
const TEST_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

/// A request that runs `script` with `/bin/sh -c` in the current directory.
#[cfg(unix)]
pub fn shell_request(script: &str) -> InvokeRequest {
  InvokeRequest {
    program: PathBuf::from("/bin/sh"),
    working_dir: PathBuf::from("."),
    env: [("PATH".to_string(), TEST_PATH.to_string())].into_iter().collect(),
    args: vec!["-c".to_string(), script.to_string()],
  }
}

/// Write an executable shell script and return its path.
#[cfg(unix)]
pub fn write_script(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  let mut perms = std::fs::metadata(&path).unwrap().permissions();
  perms.set_mode(0o755);
  std::fs::set_permissions(&path, perms).unwrap();
  path
}

/// An exit status of 1.
pub fn failed_status() -> ExitStatus {
  #[cfg(unix)]
  {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(1 << 8)
  }
  #[cfg(windows)]
  {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(1)
  }
}

/// Invoker that records every request and never spawns a process.
///
/// Requests whose first argument matches `fail_on` fail with the configured
/// output; everything else succeeds with empty output.
#[derive(Debug, Default)]
pub struct RecordingInvoker {
  calls: Mutex<Vec<InvokeRequest>>,
  fail_on: Option<String>,
  failure_output: Vec<u8>,
}

impl RecordingInvoker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail invocations of `subcommand` (e.g. `"init"`) with `output`.
  pub fn failing(subcommand: &str, output: &str) -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      fail_on: Some(subcommand.to_string()),
      failure_output: output.as_bytes().to_vec(),
    }
  }

  pub fn calls(&self) -> Vec<InvokeRequest> {
    self.calls.lock().unwrap().clone()
  }

  /// First argument of every recorded call.
  pub fn subcommands(&self) -> Vec<String> {
    self
      .calls()
      .iter()
      .map(|call| call.args.first().cloned().unwrap_or_default())
      .collect()
  }
}

impl CommandInvoker for RecordingInvoker {
  async fn run(&self, request: &InvokeRequest) -> Result<CommandOutput, InvokeError> {
    self.calls.lock().unwrap().push(request.clone());

    let subcommand = request.args.first().map(String::as_str);
    if self.fail_on.is_some() && subcommand == self.fail_on.as_deref() {
      return Err(InvokeError::Failed {
        program: request.program.display().to_string(),
        status: failed_status(),
        output: self.failure_output.clone(),
      });
    }

    Ok(CommandOutput::default())
  }
}

/// Environment map from string pairs.
pub fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
  pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
