//! Shared constants.

/// Environment variable naming the real build tool used by proxy mode.
pub const TOOL_ENV: &str = "IMGBUILD_TOOL";

/// Build tool invoked by proxy mode when [`TOOL_ENV`] is unset.
pub const DEFAULT_TOOL: &str = "packer";

/// Environment variable overriding the host's default state file.
pub const STATE_ENV: &str = "IMGBUILD_STATE";

pub const DEFAULT_STATE_FILE: &str = "imgbuild.state.json";

pub const DEFAULT_DECLARATION_FILE: &str = "imgbuild.json";

/// Used for both the definition path and the working directory when unset.
pub const CURRENT_DIR: &str = ".";

pub const INIT_SUBCOMMAND: &str = "init";

pub const BUILD_SUBCOMMAND: &str = "build";

pub const VAR_FLAG: &str = "-var";

pub const FORCE_FLAG: &str = "-force";
