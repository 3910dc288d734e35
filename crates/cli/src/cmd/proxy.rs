//! Build tool proxy mode.
//!
//! The lifecycle runs `init` and `build` against the current executable, so
//! `imgbuild init ...` and `imgbuild build ...` forward their arguments,
//! unchanged, to the real build tool named by `IMGBUILD_TOOL` (default
//! `packer`). Stdio, working directory and environment are inherited.

use std::ffi::OsString;
use std::process::ExitCode;

use tracing::debug;

use imgbuild_lib::consts::{BUILD_SUBCOMMAND, DEFAULT_TOOL, INIT_SUBCOMMAND, TOOL_ENV};

use crate::output::print_error;

/// Exit code when the build tool could not be started.
const EXIT_NOT_STARTED: u8 = 127;

pub fn is_tool_subcommand(arg: &str) -> bool {
  arg == INIT_SUBCOMMAND || arg == BUILD_SUBCOMMAND
}

/// Build tool named by `IMGBUILD_TOOL`, or the default.
pub fn tool() -> OsString {
  std::env::var_os(TOOL_ENV)
    .filter(|tool| !tool.is_empty())
    .unwrap_or_else(|| OsString::from(DEFAULT_TOOL))
}

/// Run the build tool with `args` (starting at the subcommand) and mirror its exit code.
pub fn cmd_proxy(args: &[OsString]) -> ExitCode {
  let tool = tool();
  debug!(tool = ?tool, args = ?args, "forwarding to build tool");

  let runtime = match tokio::runtime::Runtime::new() {
    Ok(runtime) => runtime,
    Err(e) => {
      print_error(&format!("Failed to create async runtime: {}", e));
      return ExitCode::FAILURE;
    }
  };

  let status = runtime.block_on(async { tokio::process::Command::new(&tool).args(args).status().await });

  match status {
    Ok(status) => match status.code() {
      Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
      // Killed by a signal.
      None => ExitCode::FAILURE,
    },
    Err(e) => {
      print_error(&format!("Failed to start {}: {}", tool.to_string_lossy(), e));
      ExitCode::from(EXIT_NOT_STARTED)
    }
  }
}
