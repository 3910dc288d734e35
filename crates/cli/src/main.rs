mod cmd;
mod output;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use imgbuild_lib::consts::DEFAULT_DECLARATION_FILE;

use cmd::HostOptions;
use output::{OutputFormat, print_error};

/// imgbuild - image build resources driven by an external build tool
///
/// `imgbuild init ...` and `imgbuild build ...` are forwarded to the build
/// tool named by IMGBUILD_TOOL (default: packer).
#[derive(Parser)]
#[command(name = "imgbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  /// State file (default: $IMGBUILD_STATE or imgbuild.state.json)
  #[arg(long, global = true)]
  state: Option<PathBuf>,

  /// Kill the build tool if a subcommand runs longer than this (e.g. "45m")
  #[arg(long, global = true, value_parser = humantime::parse_duration)]
  timeout: Option<Duration>,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the image and record its state
  Create {
    /// Declaration file (JSON, or YAML by extension)
    #[arg(short, long, default_value = DEFAULT_DECLARATION_FILE)]
    config: PathBuf,
  },

  /// Show the recorded state without running the build tool
  Read,

  /// Rebuild the image from the declaration, keeping its identity
  Update {
    /// Declaration file (JSON, or YAML by extension)
    #[arg(short, long, default_value = DEFAULT_DECLARATION_FILE)]
    config: PathBuf,
  },

  /// Forget the recorded state
  Delete,

  /// Record an existing image by identity
  Import {
    /// Identity to adopt
    identity: String,
  },

  /// Print the resource attribute schema
  Schema {
    /// Show only this attribute
    name: Option<String>,
  },
}

fn init_tracing(verbose: u8) {
  let default_level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let args: Vec<OsString> = std::env::args_os().collect();

  // Proxy mode: the lifecycle re-invokes this binary as the build tool.
  let proxy = args
    .get(1)
    .and_then(|arg| arg.to_str())
    .is_some_and(cmd::is_tool_subcommand);
  if proxy {
    init_tracing(0);
    return cmd::cmd_proxy(&args[1..]);
  }

  let cli = Cli::parse_from(args);
  init_tracing(cli.verbose);

  let options = HostOptions {
    state: cli.state,
    timeout: cli.timeout,
    format: cli.output,
  };

  let result = match cli.command {
    Commands::Create { config } => cmd::cmd_create(&config, &options),
    Commands::Read => cmd::cmd_read(&options),
    Commands::Update { config } => cmd::cmd_update(&config, &options),
    Commands::Delete => cmd::cmd_delete(&options),
    Commands::Import { identity } => cmd::cmd_import(&identity, &options),
    Commands::Schema { name } => cmd::cmd_schema(name.as_deref(), options.format),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
