//! Structural identity of a map's declarations.

use michi_core::MapError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 digest identifying a map's declared structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Footprint(String);

impl Footprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Footprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Computes the footprint of a map from its unresolved declarations.
///
/// Declarations are hashed as compact JSON. `serde_json` objects keep their
/// keys sorted, so the digest only depends on content. Array order
/// (declaration order) is significant.
///
/// # Errors
///
/// Returns [`MapError::Configuration`] if a declaration cannot be
/// serialized.
pub fn footprint<S: Serialize, P: Serialize>(
    name: &str,
    steps: &S,
    paths: &P,
) -> Result<Footprint, MapError> {
    let steps = serde_json::to_vec(steps).map_err(|e| MapError::configuration("steps", e))?;
    let paths = serde_json::to_vec(paths).map_err(|e| MapError::configuration("paths", e))?;

    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(&steps);
    hasher.update([0u8]);
    hasher.update(&paths);
    Ok(Footprint(format!("{:x}", hasher.finalize())))
}
