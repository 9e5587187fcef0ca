//! File catalogs mapping references to their owning layer.

use compact_str::CompactString;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::reference::FileRef;

/// Description of a single image layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMetadata {
    /// Position of the layer in the image, base layer first.
    pub index: usize,
    /// Content digest of the layer (e.g. "sha256:...").
    pub digest: String,
    /// Layer media type.
    #[serde(default, rename = "mediaType")]
    pub media_type: String,
    /// Layer size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl LayerMetadata {
    /// Create layer metadata with an index and digest.
    pub fn new(index: usize, digest: impl Into<String>) -> Self {
        Self {
            index,
            digest: digest.into(),
            ..Self::default()
        }
    }
}

/// What a catalog knows about a referenced file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Layer that owns the file.
    pub layer: LayerMetadata,
}

impl CatalogEntry {
    /// Create an entry owned by the given layer.
    pub fn new(layer: LayerMetadata) -> Self {
        Self { layer }
    }
}

/// Lookup from a file reference to its catalog entry.
///
/// Implementations are responsible for their own synchronization; lookups
/// may arrive concurrently from many threads.
pub trait FileCatalog<R: FileRef> {
    /// Look up the entry for a reference.
    fn get(&self, reference: &R) -> Result<CatalogEntry, CatalogError>;
}

impl<R: FileRef, C: FileCatalog<R> + ?Sized> FileCatalog<R> for &C {
    fn get(&self, reference: &R) -> Result<CatalogEntry, CatalogError> {
        (**self).get(reference)
    }
}

/// In-memory catalog keyed by reference id and real path.
///
/// The real path is part of the key because id zero carries no meaning and
/// may be shared by unrelated references. Backed by a concurrent map so it
/// can be populated and queried from several threads at once.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: DashMap<(u64, CompactString), CatalogEntry>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record the entry for a reference, returning any previous entry.
    pub fn insert<R: FileRef>(&self, reference: &R, entry: CatalogEntry) -> Option<CatalogEntry> {
        self.entries.insert(catalog_key(reference), entry)
    }

    /// Forget a reference, returning its entry if present.
    pub fn remove<R: FileRef>(&self, reference: &R) -> Option<CatalogEntry> {
        self.entries.remove(&catalog_key(reference)).map(|(_, entry)| entry)
    }

    /// Get the number of cataloged references.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R: FileRef> FileCatalog<R> for MemoryCatalog {
    fn get(&self, reference: &R) -> Result<CatalogEntry, CatalogError> {
        self.entries
            .get(&catalog_key(reference))
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CatalogError::not_found(reference.id(), reference.real_path()))
    }
}

fn catalog_key<R: FileRef>(reference: &R) -> (u64, CompactString) {
    (reference.id(), CompactString::from(reference.real_path()))
}
