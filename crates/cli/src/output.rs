//! CLI output formatting utilities.
//!
//! Status messages go to stdout, errors and warnings to stderr. JSON output
//! is pretty-printed to stdout so it can be piped.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use imgbuild_lib::ResourceDeclaration;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

/// Print a resource state with a headline, or as JSON.
pub fn print_state(headline: &str, state: &ResourceDeclaration, format: OutputFormat) -> anyhow::Result<()> {
  if format.is_json() {
    return print_json(state);
  }

  print_success(headline);
  print_stat("Identity", state.identity().unwrap_or("-"));
  print_stat("Version", state.version_marker().unwrap_or("-"));
  if let Some(name) = &state.display_name {
    print_stat("Name", name);
  }
  print_stat("Definition", imgbuild_lib::params::definition_path(state));
  print_stat("Directory", imgbuild_lib::params::working_dir(state));
  if !state.change_triggers.is_empty() {
    let triggers: Vec<String> = state
      .change_triggers
      .iter()
      .map(|(key, value)| format!("{}={}", key, value))
      .collect();
    print_stat("Triggers", &triggers.join(", "));
  }
  Ok(())
}
