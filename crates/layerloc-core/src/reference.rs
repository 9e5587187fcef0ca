//! Opaque file references handed out by traversal backends.

use std::fmt;

use compact_str::CompactString;

/// A backend-specific handle to a resolved file.
///
/// References let a catalog re-fetch richer metadata for a file. They are
/// meaningful only to the backend that produced them and never contribute
/// to a location's identity.
pub trait FileRef: Clone + fmt::Debug {
    /// Backend-assigned numeric id. Zero means no meaningful id.
    fn id(&self) -> u64;

    /// The resolved path with no link indirection left.
    fn real_path(&self) -> &str;
}

/// Default file reference: a numeric id plus the resolved real path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileReference {
    /// Backend-assigned id.
    pub id: u64,
    /// Resolved real path.
    pub real_path: CompactString,
}

impl FileReference {
    /// Create a new file reference.
    pub fn new(id: u64, real_path: impl Into<CompactString>) -> Self {
        Self {
            id,
            real_path: real_path.into(),
        }
    }
}

impl FileRef for FileReference {
    fn id(&self) -> u64 {
        self.id
    }

    fn real_path(&self) -> &str {
        &self.real_path
    }
}
