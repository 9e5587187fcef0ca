//! Error types for catalog lookups and identity derivation.

use thiserror::Error;

/// Errors returned by a [`FileCatalog`](crate::FileCatalog) lookup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No entry exists for the reference.
    #[error("No catalog entry for reference id={id} ({real_path})")]
    NotFound { id: u64, real_path: String },

    /// The catalog backend could not answer.
    #[error("Catalog unavailable: {message}")]
    Unavailable { message: String },
}

impl CatalogError {
    /// Create a not-found error for a reference.
    pub fn not_found(id: u64, real_path: impl Into<String>) -> Self {
        Self::NotFound {
            id,
            real_path: real_path.into(),
        }
    }

    /// Check if this error means the reference is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that can occur while fingerprinting a value.
#[derive(Debug, Error)]
pub enum FingerprintError {
    /// The value could not be encoded into its canonical form.
    #[error("Unable to encode value for fingerprinting: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for FingerprintError {
    fn from(source: serde_json::Error) -> Self {
        Self::Encode { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_not_found() {
        let err = CatalogError::not_found(7, "/bin/sh");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("id=7"));
        assert!(err.to_string().contains("/bin/sh"));
    }

    #[test]
    fn test_catalog_unavailable_is_not_not_found() {
        let err = CatalogError::Unavailable {
            message: "closed".to_string(),
        };
        assert!(!err.is_not_found());
    }
}
