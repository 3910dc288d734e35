//! Attribute schema of the image build resource.
//!
//! Hosts that declare resource types (and the CLI `schema` command) use this
//! table. `name` is the attribute's external name; `field` the matching
//! [`ResourceDeclaration`](crate::declaration::ResourceDeclaration) field.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
  String,
  Bool,
  StringMap,
  StringList,
}

/// Host-computed attributes cannot be set by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
  Optional,
  Computed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Attribute {
  pub name: &'static str,
  pub field: &'static str,
  pub kind: AttributeKind,
  pub presence: Presence,
  pub description: &'static str,
}

const fn attr(
  name: &'static str,
  field: &'static str,
  kind: AttributeKind,
  presence: Presence,
  description: &'static str,
) -> Attribute {
  Attribute {
    name,
    field,
    kind,
    presence,
    description,
  }
}

pub const ATTRIBUTES: &[Attribute] = &[
  attr(
    "id",
    "identity",
    AttributeKind::String,
    Presence::Computed,
    "Identifier assigned when the image is first built.",
  ),
  attr(
    "name",
    "display_name",
    AttributeKind::String,
    Presence::Optional,
    "Name of this build. This value is not passed to the build tool.",
  ),
  attr(
    "variables",
    "variables",
    AttributeKind::StringMap,
    Presence::Optional,
    "Variables to pass to the build tool.",
  ),
  attr(
    "additional_params",
    "extra_arguments",
    AttributeKind::StringList,
    Presence::Optional,
    "Additional parameters appended to the build command.",
  ),
  attr(
    "directory",
    "working_directory",
    AttributeKind::String,
    Presence::Optional,
    "Working directory to run the build tool in. Default is the current directory.",
  ),
  attr(
    "file",
    "definition_path",
    AttributeKind::String,
    Presence::Optional,
    "Build definition file or directory. Default is the current directory.",
  ),
  attr(
    "force",
    "force_overwrite",
    AttributeKind::Bool,
    Presence::Optional,
    "Force overwriting existing images.",
  ),
  attr(
    "environment",
    "environment",
    AttributeKind::StringMap,
    Presence::Optional,
    "Environment variables for the build tool.",
  ),
  attr(
    "inherit_ambient_environment",
    "inherit_ambient_environment",
    AttributeKind::Bool,
    Presence::Optional,
    "Pass the host's own environment through to the build tool. Default is true.",
  ),
  attr(
    "triggers",
    "change_triggers",
    AttributeKind::StringMap,
    Presence::Optional,
    "Values that, when changed, trigger an update of this resource.",
  ),
  attr(
    "build_uuid",
    "version_marker",
    AttributeKind::String,
    Presence::Computed,
    "Identifier refreshed whenever a build finishes. Allows detecting changes.",
  ),
];

/// Look up an attribute by its external name.
pub fn attribute(name: &str) -> Option<&'static Attribute> {
  ATTRIBUTES.iter().find(|a| a.name == name)
}
