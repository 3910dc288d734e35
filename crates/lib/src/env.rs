//! Subprocess environment composition.
//!
//! The build tool runs with exactly the environment returned by [`compose`]:
//! the invoker clears the inherited environment before applying it.

use std::collections::BTreeMap;

/// Snapshot of the current process environment.
///
/// Variables whose name or value is not valid unicode are skipped.
pub fn ambient() -> BTreeMap<String, String> {
  std::env::vars_os()
    .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
    .collect()
}

/// Derive the subprocess environment from the declared variables.
///
/// With `inherit_ambient` the ambient environment is used as the base and the
/// declared variables are laid over it, so declared values win on collision.
/// Otherwise the declared map is returned as-is.
pub fn compose(declared: &BTreeMap<String, String>, inherit_ambient: bool) -> BTreeMap<String, String> {
  if !inherit_ambient {
    return declared.clone();
  }

  let mut composed = ambient();
  composed.extend(declared.iter().map(|(key, value)| (key.clone(), value.clone())));
  composed
}
