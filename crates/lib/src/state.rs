//! Persisted resource state for hosts.
//!
//! The lifecycle itself never touches disk; a host stores the declaration
//! returned by create/update and hands it back on the next operation. This
//! module is the file-backed store the CLI host uses.
//!
//! # Example State File
//!
//! ```json
//! {
//!   "identity": "6f0c2b7e-5d1a-4c43-9a53-0b3f1b2f4a11",
//!   "definition_path": "base.pkr.hcl",
//!   "variables": { "region": "eu-west-1" },
//!   "extra_arguments": [],
//!   "environment": {},
//!   "inherit_ambient_environment": true,
//!   "change_triggers": {},
//!   "force_overwrite": false,
//!   "version_marker": "0d9b3c55-86a4-4b0e-bc2b-8f1f3bb1c0de"
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::declaration::ResourceDeclaration;

/// Errors that can occur when working with persisted state.
#[derive(Debug, Error)]
pub enum StateError {
  #[error("failed to read state: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write state: {0}")]
  Write(#[source] io::Error),

  #[error("failed to create state directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to parse state: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize state: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to remove state: {0}")]
  Remove(#[source] io::Error),
}

/// A JSON state file holding at most one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateFile {
  path: PathBuf,
}

impl StateFile {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn exists(&self) -> bool {
    self.path.exists()
  }

  /// Load the persisted state.
  ///
  /// Returns `Ok(None)` if the file doesn't exist.
  pub fn load(&self) -> Result<Option<ResourceDeclaration>, StateError> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "state file not found");
        return Ok(None);
      }
      Err(e) => return Err(StateError::Read(e)),
    };

    let state: ResourceDeclaration = serde_json::from_str(&content).map_err(StateError::Parse)?;
    debug!(
      path = %self.path.display(),
      identity = state.identity().unwrap_or_default(),
      "state loaded"
    );
    Ok(Some(state))
  }

  /// Persist `state`, replacing any previous one.
  ///
  /// Writes to a sibling temp file and renames it over the target, so a
  /// failed write leaves the previous state intact.
  pub fn save(&self, state: &ResourceDeclaration) -> Result<(), StateError> {
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(StateError::CreateDir)?;
    }

    let content = serde_json::to_string_pretty(state).map_err(StateError::Serialize)?;

    let mut temp_name = self.path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = self.path.with_file_name(temp_name);
    fs::write(&temp_path, &content).map_err(StateError::Write)?;
    fs::rename(&temp_path, &self.path).map_err(StateError::Write)?;

    info!(
      path = %self.path.display(),
      identity = state.identity().unwrap_or_default(),
      "state saved"
    );
    Ok(())
  }

  /// Remove the state file. Silently succeeds if it doesn't exist.
  pub fn remove(&self) -> Result<(), StateError> {
    match fs::remove_file(&self.path) {
      Ok(()) => {
        info!(path = %self.path.display(), "state removed");
        Ok(())
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "state already gone");
        Ok(())
      }
      Err(e) => Err(StateError::Remove(e)),
    }
  }
}
