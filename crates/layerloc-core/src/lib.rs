//! Core location and identity types for layerloc.
//!
//! This crate describes where a cataloged file lives (a real path plus the
//! image layer that owns it) and derives a stable identifier from exactly
//! those facts, so the same file found through different links or backend
//! handles maps to the same key.

mod artifact;
mod catalog;
mod error;
mod location;
mod metadata;
mod reference;
mod set;

pub use artifact::{derive_id, derive_id_or_empty, ArtifactId, Identifiable};
pub use catalog::{CatalogEntry, FileCatalog, LayerMetadata, MemoryCatalog};
pub use error::{CatalogError, FingerprintError};
pub use location::{Location, LocationIdentity};
pub use metadata::{FileSourceMetadata, ImageMetadata, Scheme, SourceMetadata};
pub use reference::{FileRef, FileReference};
pub use set::LocationSet;
