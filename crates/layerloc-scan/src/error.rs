//! Errors and warnings produced while resolving a directory.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort a directory resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Permission denied for the root.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Root not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl ResolveError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of resolve warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Error reading a directory entry.
    ReadError,
    /// Error reading metadata.
    MetadataError,
    /// Symbolic link target does not exist.
    BrokenSymlink,
    /// Link resolves to a file outside the root.
    OutsideRoot,
}

/// Non-fatal problem with a single entry. The entry is skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveWarning {
    pub path: PathBuf,
    pub message: String,
    pub kind: WarningKind,
}

impl ResolveWarning {
    /// Create a new warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a broken symlink warning.
    pub fn broken_symlink(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        Self {
            message: format!("Broken symlink {}: {error}", path.display()),
            path,
            kind: WarningKind::BrokenSymlink,
        }
    }

    /// Create a warning for a link that escapes the root.
    pub fn outside_root(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let target = target.into();
        Self {
            message: format!("{} resolves outside root: {}", path.display(), target.display()),
            path,
            kind: WarningKind::OutsideRoot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_error_io() {
        let err = ResolveError::io(
            "/missing",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, ResolveError::NotFound { .. }));
    }

    #[test]
    fn test_outside_root_warning() {
        let warning = ResolveWarning::outside_root("/root/link", "/etc/passwd");
        assert_eq!(warning.kind, WarningKind::OutsideRoot);
        assert!(warning.message.contains("/etc/passwd"));
    }
}
