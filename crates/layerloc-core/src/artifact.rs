//! Artifact identifiers derived from structural fingerprints.
//!
//! An [`ArtifactId`] is computed by streaming the canonical JSON encoding of
//! a value into a BLAKE3 hasher. Only the fields a value chooses to
//! serialize contribute, so types control their identity by handing a
//! reduced view to [`derive_id`].

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::FingerprintError;

/// Number of digest bytes kept in an identifier.
const ID_BYTES: usize = 8;

/// Stable identifier for a cataloged artifact.
///
/// An empty identifier means no stable identity is available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(CompactString);

impl ArtifactId {
    /// Create an identifier from an existing token.
    pub fn new(token: impl Into<CompactString>) -> Self {
        Self(token.into())
    }

    /// The empty identifier.
    pub fn empty() -> Self {
        Self(CompactString::default())
    }

    /// Check if no identity is available.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the identifier token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Types with a stable artifact identity.
pub trait Identifiable {
    /// Derive the artifact identifier. Returns the empty id when none is available.
    fn id(&self) -> ArtifactId;
}

/// Fingerprint a value into an [`ArtifactId`].
pub fn derive_id<T: Serialize + ?Sized>(value: &T) -> Result<ArtifactId, FingerprintError> {
    let mut hasher = blake3::Hasher::new();
    serde_json::to_writer(&mut hasher, value)?;
    let digest = hasher.finalize();
    let token: String = digest.as_bytes()[..ID_BYTES]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect();
    Ok(ArtifactId(token.into()))
}

/// Fingerprint a value, logging and returning the empty id on failure.
pub fn derive_id_or_empty<T, C>(value: &T, context: &C) -> ArtifactId
where
    T: Serialize + ?Sized,
    C: fmt::Debug + ?Sized,
{
    match derive_id(value) {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(
                target: "layerloc::artifact",
                "unable to get fingerprint of {:?}: {}",
                context,
                err
            );
            ArtifactId::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot encode"))
        }
    }

    #[test]
    fn test_derive_id_deterministic() {
        let a = derive_id(&("/etc/passwd", "")).unwrap();
        let b = derive_id(&("/etc/passwd", "")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), ID_BYTES * 2);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_derive_id_distinguishes_values() {
        let a = derive_id(&("/etc/passwd", "")).unwrap();
        let b = derive_id(&("/etc/shadow", "")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_derive_id_failure() {
        assert!(derive_id(&Unencodable).is_err());
    }

    #[test]
    fn test_derive_id_or_empty_failure() {
        let id = derive_id_or_empty(&Unencodable, "unencodable");
        assert!(id.is_empty());
        assert_eq!(id, ArtifactId::empty());
    }

    #[test]
    fn test_artifact_id_display_and_serde() {
        let id = ArtifactId::new("00ff");
        assert_eq!(id.to_string(), "00ff");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"00ff\"");
    }
}
