//! Identity and version marker assignment.
//!
//! Both tokens are random v4 UUIDs with no embedded meaning.

use tracing::debug;
use uuid::Uuid;

use crate::declaration::ResourceDeclaration;

/// Whether the declaration has never been assigned an identity.
pub fn is_first_creation(decl: &ResourceDeclaration) -> bool {
  decl.identity().is_none()
}

fn fresh_token() -> String {
  Uuid::new_v4().to_string()
}

/// Stamp a declaration after a successful build.
///
/// On first creation the identity is replaced with a fresh one, whatever it
/// held; afterwards it is left alone. The version marker is always replaced.
pub fn stamp(mut decl: ResourceDeclaration, first_creation: bool) -> ResourceDeclaration {
  if first_creation {
    decl.identity = Some(fresh_token());
  }
  decl.version_marker = Some(fresh_token());

  debug!(
    identity = decl.identity.as_deref().unwrap_or_default(),
    version = decl.version_marker.as_deref().unwrap_or_default(),
    "stamped declaration"
  );
  decl
}
