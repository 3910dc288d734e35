//! Shared test helpers for CLI integration tests.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Build tool stand-in: logs its arguments and fails on `$FAIL_ON`.
const FAKE_TOOL: &str = r#"#!/bin/sh
echo "$@" >> "$CALL_LOG"
echo "fake tool: $1"
if [ -n "$FAIL_ON" ] && [ "$1" = "$FAIL_ON" ]; then
  echo "tool error: boom" >&2
  exit 1
fi
"#;

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding the declaration, the
/// state file, the fake build tool and its call log.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
  pub state_path: PathBuf,
  pub tool_path: PathBuf,
  pub call_log: PathBuf,
}

impl TestEnv {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("imgbuild.json");
    let state_path = temp.path().join("imgbuild.state.json");
    let tool_path = temp.path().join("fake-packer");
    let call_log = temp.path().join("calls.log");

    std::fs::write(&tool_path, FAKE_TOOL).unwrap();
    let mut perms = std::fs::metadata(&tool_path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&tool_path, perms).unwrap();

    Self {
      temp,
      config_path,
      state_path,
      tool_path,
      call_log,
    }
  }

  /// Write the declaration file; `working_directory` is set to the temp dir.
  pub fn declare(&self, mut declaration: serde_json::Value) {
    declaration["working_directory"] = serde_json::Value::from(self.temp.path().display().to_string());
    std::fs::write(&self.config_path, declaration.to_string()).unwrap();
  }

  /// Command wired to this environment's state file and fake tool.
  pub fn imgbuild(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("imgbuild");
    cmd
      .env("IMGBUILD_TOOL", &self.tool_path)
      .env("IMGBUILD_STATE", &self.state_path)
      .env("CALL_LOG", &self.call_log)
      .env_remove("FAIL_ON")
      .env_remove("RUST_LOG");
    cmd
  }

  /// Arguments the fake tool was called with, one line per call.
  pub fn calls(&self) -> Vec<String> {
    std::fs::read_to_string(&self.call_log)
      .unwrap_or_default()
      .lines()
      .map(str::to_string)
      .collect()
  }

  pub fn state(&self) -> Option<serde_json::Value> {
    let content = std::fs::read_to_string(&self.state_path).ok()?;
    Some(serde_json::from_str(&content).unwrap())
  }
}
