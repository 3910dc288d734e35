//! Build tool argument construction.
//!
//! Turns a [`ResourceDeclaration`] into the argument vector for one of the two
//! build tool subcommands. Nothing here touches the filesystem: a bad path only
//! surfaces when the subprocess runs.

use std::fmt;

use crate::consts::{BUILD_SUBCOMMAND, CURRENT_DIR, FORCE_FLAG, INIT_SUBCOMMAND, VAR_FLAG};
use crate::declaration::ResourceDeclaration;

/// Build tool subcommand run during create and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
  Initialize,
  Build,
}

impl Subcommand {
  /// Name passed to the build tool.
  pub fn as_str(&self) -> &'static str {
    match self {
      Subcommand::Initialize => INIT_SUBCOMMAND,
      Subcommand::Build => BUILD_SUBCOMMAND,
    }
  }
}

impl fmt::Display for Subcommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Subcommand::Initialize => write!(f, "initialize"),
      Subcommand::Build => write!(f, "build"),
    }
  }
}

/// Definition path argument, `.` when unset or empty.
pub fn definition_path(decl: &ResourceDeclaration) -> &str {
  non_empty_or_current(decl.definition_path.as_deref())
}

/// Directory the build tool runs in, `.` when unset or empty.
pub fn working_dir(decl: &ResourceDeclaration) -> &str {
  non_empty_or_current(decl.working_directory.as_deref())
}

fn non_empty_or_current(value: Option<&str>) -> &str {
  match value {
    Some(value) if !value.is_empty() => value,
    _ => CURRENT_DIR,
  }
}

/// Argument vector for `subcommand`.
///
/// - initialize: `init <definition>`
/// - build: `build [-var k=v]... [-force] <definition> [extra]...`
///
/// Variables are emitted in key order.
pub fn arguments(decl: &ResourceDeclaration, subcommand: Subcommand) -> Vec<String> {
  let mut args = vec![subcommand.as_str().to_string()];

  match subcommand {
    Subcommand::Initialize => {
      args.push(definition_path(decl).to_string());
    }
    Subcommand::Build => {
      for (key, value) in &decl.variables {
        args.push(VAR_FLAG.to_string());
        args.push(format!("{}={}", key, value));
      }
      if decl.force_overwrite {
        args.push(FORCE_FLAG.to_string());
      }
      args.push(definition_path(decl).to_string());
      args.extend(decl.extra_arguments.iter().cloned());
    }
  }

  args
}
