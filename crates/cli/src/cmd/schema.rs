//! Implementation of the `imgbuild schema` command.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use imgbuild_lib::schema::{ATTRIBUTES, Attribute, Presence, attribute};

use crate::output::{OutputFormat, print_json};

/// Print every attribute, or only `name` when given.
pub fn cmd_schema(name: Option<&str>, format: OutputFormat) -> Result<()> {
  let selected: Vec<&Attribute> = match name {
    Some(name) => match attribute(name) {
      Some(attribute) => vec![attribute],
      None => anyhow::bail!("Unknown attribute '{}'", name),
    },
    None => ATTRIBUTES.iter().collect(),
  };

  if format.is_json() {
    return print_json(&selected);
  }

  for attribute in selected {
    let presence = match attribute.presence {
      Presence::Optional => "optional",
      Presence::Computed => "computed",
    };
    println!(
      "{} ({:?}, {})",
      attribute.name.if_supports_color(Stream::Stdout, |s| s.bold()),
      attribute.kind,
      presence
    );
    println!("    {}", attribute.description);
  }
  Ok(())
}
