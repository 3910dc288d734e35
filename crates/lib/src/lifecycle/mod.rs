//! Image build resource lifecycle.
//!
//! [`Lifecycle`] maps the four host operations onto build tool runs:
//!
//! - `create` - run `init` then `build`, then assign identity and version
//! - `read` - return the persisted state unchanged, no subprocess
//! - `update` - same protocol as create, keeping the identity
//! - `delete` - discard the state, no subprocess
//!
//! Create and update are all-or-nothing from the state's point of view: a
//! failed `init` or `build` returns an error and no stamped declaration, even
//! though the build tool may already have had side effects.
//!
//! Drift detection is not done here. The host compares `change_triggers` (and
//! the version marker) between runs and decides when to call `update`.
//!
//! # Submodules
//!
//! - [`diagnostic`] - errors and user-facing diagnostics

pub mod diagnostic;

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::declaration::ResourceDeclaration;
use crate::env;
use crate::execute::{CommandInvoker, CurrentExe, ExecutableLocator, InvokeRequest, ProcessInvoker};
use crate::params::{self, Subcommand};
use crate::stamp::{is_first_creation, stamp};

pub use diagnostic::{Diagnostic, LifecycleError};

/// Lifecycle controller for image build resources.
///
/// Operations run one at a time and block on the build tool; the controller
/// holds no state of its own and does no locking.
#[derive(Debug, Clone)]
pub struct Lifecycle<I = ProcessInvoker, L = CurrentExe> {
  invoker: I,
  locator: L,
  host_env: BTreeMap<String, String>,
}

impl<I: CommandInvoker, L: ExecutableLocator> Lifecycle<I, L> {
  pub fn with_parts(invoker: I, locator: L) -> Self {
    Self {
      invoker,
      locator,
      host_env: BTreeMap::new(),
    }
  }

  /// Pass `key=value` to every build tool run, even when the declaration does
  /// not inherit the ambient environment. A declared value for `key` wins.
  pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.host_env.insert(key.into(), value.into());
    self
  }

  /// Build a new resource and stamp it with a fresh identity and version.
  ///
  /// Identity and version are host-computed: values carried by `decl` are
  /// discarded.
  pub async fn create(&self, mut decl: ResourceDeclaration) -> Result<ResourceDeclaration, LifecycleError> {
    info!(name = decl.display_name.as_deref().unwrap_or_default(), "creating image build");
    decl.identity = None;
    decl.version_marker = None;

    self.run_build_tool(&decl).await?;
    let created = stamp(decl, true);

    info!(
      identity = created.identity.as_deref().unwrap_or_default(),
      version = created.version_marker.as_deref().unwrap_or_default(),
      "image build created"
    );
    Ok(created)
  }

  /// Return the persisted state unchanged.
  ///
  /// The build tool is not consulted, so drift in the built artifact is not
  /// detected here.
  pub fn read(&self, state: ResourceDeclaration) -> ResourceDeclaration {
    debug!(identity = state.identity().unwrap_or_default(), "reading image build state");
    state
  }

  /// Rebuild with the planned declaration, keeping the prior identity.
  ///
  /// Identity always comes from `prior`; one set on `plan` is ignored. A prior
  /// without an identity is treated as a first creation.
  pub async fn update(
    &self,
    mut plan: ResourceDeclaration,
    prior: &ResourceDeclaration,
  ) -> Result<ResourceDeclaration, LifecycleError> {
    plan.identity = prior.identity().map(str::to_string);
    plan.version_marker = None;
    info!(identity = plan.identity().unwrap_or_default(), "updating image build");

    self.run_build_tool(&plan).await?;
    let updated = stamp(plan, is_first_creation(prior));

    info!(
      identity = updated.identity.as_deref().unwrap_or_default(),
      version = updated.version_marker.as_deref().unwrap_or_default(),
      "image build updated"
    );
    Ok(updated)
  }

  /// Discard the persisted state. Always succeeds; the built image is left alone.
  pub fn delete(&self, prior: ResourceDeclaration) {
    info!(identity = prior.identity().unwrap_or_default(), "deleting image build state");
  }

  /// Seed a state from an identity alone; the host reconciles the rest.
  pub fn import(&self, identity: &str) -> ResourceDeclaration {
    info!(identity = %identity, "importing image build");
    ResourceDeclaration::with_identity(identity)
  }

  /// Request for one subcommand of `decl`.
  pub fn request(&self, decl: &ResourceDeclaration, subcommand: Subcommand) -> Result<InvokeRequest, LifecycleError> {
    let program = self
      .locator
      .locate()
      .map_err(|err| LifecycleError::at(subcommand, err))?;

    let mut env = env::compose(&decl.environment, decl.inherit_ambient_environment);
    for (key, value) in &self.host_env {
      if !decl.environment.contains_key(key) {
        env.insert(key.clone(), value.clone());
      }
    }

    Ok(InvokeRequest {
      program,
      working_dir: PathBuf::from(params::working_dir(decl)),
      env,
      args: params::arguments(decl, subcommand),
    })
  }

  async fn run_build_tool(&self, decl: &ResourceDeclaration) -> Result<(), LifecycleError> {
    for subcommand in [Subcommand::Initialize, Subcommand::Build] {
      let request = self.request(decl, subcommand)?;
      info!(subcommand = %subcommand, "running build tool subcommand");

      let output = self
        .invoker
        .run(&request)
        .await
        .map_err(|err| LifecycleError::at(subcommand, err))?;

      debug!(subcommand = %subcommand, output = %output.combined_str(), "subcommand finished");
    }
    Ok(())
  }
}
