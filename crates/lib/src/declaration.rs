//! The image build resource declaration.
//!
//! A [`ResourceDeclaration`] is the desired-state record supplied by the host on
//! every lifecycle operation. The same record, once stamped with an identity and
//! a version marker, is what gets persisted as the resource's state.
//!
//! # Example Declaration
//!
//! ```json
//! {
//!   "display_name": "base image",
//!   "definition_path": "images/base.pkr.hcl",
//!   "working_directory": "infra",
//!   "variables": { "region": "eu-west-1" },
//!   "environment": { "PKR_VAR_size": "small" },
//!   "force_overwrite": true
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Desired state of one image build.
///
/// Maps are `BTreeMap`s so that anything derived from them (argument vectors,
/// serialized state) is ordered by key and reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDeclaration {
  /// Assigned on first successful creation, immutable afterwards.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub identity: Option<String>,

  /// Free-text label. Never passed to the build tool.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,

  /// Passed to the build subcommand as `-var key=value` pairs.
  #[serde(default)]
  pub variables: BTreeMap<String, String>,

  /// Appended verbatim after all computed arguments.
  #[serde(default)]
  pub extra_arguments: Vec<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub working_directory: Option<String>,

  /// Build definition file or directory.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub definition_path: Option<String>,

  /// Additional environment variables for the subprocess.
  #[serde(default)]
  pub environment: BTreeMap<String, String>,

  /// Merge the ambient process environment under `environment`.
  #[serde(default = "default_inherit")]
  pub inherit_ambient_environment: bool,

  /// Inert here: the host diffs these and calls update when any value changes.
  #[serde(default)]
  pub change_triggers: BTreeMap<String, String>,

  #[serde(default)]
  pub force_overwrite: bool,

  /// Refreshed on every successful build. Never read by the lifecycle engine.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version_marker: Option<String>,
}

fn default_inherit() -> bool {
  true
}

impl Default for ResourceDeclaration {
  fn default() -> Self {
    Self {
      identity: None,
      display_name: None,
      variables: BTreeMap::new(),
      extra_arguments: Vec::new(),
      working_directory: None,
      definition_path: None,
      environment: BTreeMap::new(),
      inherit_ambient_environment: true,
      change_triggers: BTreeMap::new(),
      force_overwrite: false,
      version_marker: None,
    }
  }
}

impl ResourceDeclaration {
  /// Seed a declaration carrying only an identity (import passthrough).
  pub fn with_identity(identity: impl Into<String>) -> Self {
    Self {
      identity: Some(identity.into()),
      ..Self::default()
    }
  }

  /// Identity if it is set and non-empty.
  pub fn identity(&self) -> Option<&str> {
    self.identity.as_deref().filter(|id| !id.is_empty())
  }

  /// Version marker if it is set and non-empty.
  pub fn version_marker(&self) -> Option<&str> {
    self.version_marker.as_deref().filter(|v| !v.is_empty())
  }
}

/// Errors that can occur when loading a declaration file.
#[derive(Debug, Error)]
pub enum DeclarationError {
  #[error("failed to read declaration: {0}")]
  Read(#[source] io::Error),

  #[error("failed to parse declaration as JSON: {0}")]
  Json(#[source] serde_json::Error),

  #[error("failed to parse declaration as YAML: {0}")]
  Yaml(#[source] serde_yaml::Error),
}

/// Load a declaration from a JSON or YAML file.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else as JSON.
pub fn load_declaration(path: &Path) -> Result<ResourceDeclaration, DeclarationError> {
  let content = fs::read_to_string(path).map_err(DeclarationError::Read)?;
  debug!(path = %path.display(), content_len = content.len(), "loaded declaration file");

  let is_yaml = matches!(
    path.extension().and_then(|ext| ext.to_str()),
    Some("yaml") | Some("yml")
  );

  if is_yaml {
    serde_yaml::from_str(&content).map_err(DeclarationError::Yaml)
  } else {
    serde_json::from_str(&content).map_err(DeclarationError::Json)
  }
}
