//! File locations and their identity.
//!
//! A [`Location`] pins a file to the path that was physically read and the
//! filesystem (image layer) it came from. Only those two facts make up its
//! identity: the path a consumer used to reach the file and the backend
//! reference used to re-query it are carried along but never compared,
//! hashed, or serialized.

use std::fmt;
use std::hash::{Hash, Hasher};

use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::artifact::{derive_id_or_empty, ArtifactId, Identifiable};
use crate::catalog::FileCatalog;
use crate::reference::{FileRef, FileReference};

/// A path relative to a particular filesystem, resolved to a specific file.
#[derive(Debug, Clone)]
pub struct Location<R = FileReference> {
    /// Path with no hardlinks or symlinks among its ancestors.
    real_path: CompactString,
    /// Path as presented to the consumer, possibly through links.
    virtual_path: CompactString,
    /// Owning filesystem; a layer digest for images, empty otherwise.
    file_system_id: CompactString,
    /// Backend handle for re-fetching metadata.
    reference: Option<R>,
}

/// The identity-bearing view of a [`Location`].
///
/// This is also the canonical serialized form of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LocationIdentity<'a> {
    /// Real path of the file.
    #[serde(rename = "path")]
    pub real_path: &'a str,
    /// Owning filesystem id.
    #[serde(rename = "layerID", skip_serializing_if = "str::is_empty")]
    pub file_system_id: &'a str,
}

impl Location {
    /// Create a location for a bare path with no filesystem or reference.
    pub fn new(path: impl Into<CompactString>) -> Self {
        Self::from_path(path)
    }
}

impl<R: FileRef> Location<R> {
    /// Create a location for a bare path, for any reference type.
    pub fn from_path(path: impl Into<CompactString>) -> Self {
        Self {
            real_path: path.into(),
            virtual_path: CompactString::default(),
            file_system_id: CompactString::default(),
            reference: None,
        }
    }

    /// Create a location for a file inside a container image.
    ///
    /// The owning layer is looked up in `catalog`. A lookup failure is not
    /// an error: the location is still built from the reference's real path,
    /// just without a filesystem id.
    pub fn from_image<C>(virtual_path: impl Into<CompactString>, reference: R, catalog: &C) -> Self
    where
        C: FileCatalog<R> + ?Sized,
    {
        let virtual_path = virtual_path.into();
        let real_path = CompactString::from(reference.real_path());

        let file_system_id = match catalog.get(&reference) {
            Ok(entry) => CompactString::from(entry.layer.digest),
            Err(err) => {
                tracing::warn!(
                    target: "layerloc::location",
                    "unable to find file catalog entry for ref={:?}: {}",
                    reference,
                    err
                );
                CompactString::default()
            }
        };

        Self {
            real_path,
            virtual_path,
            file_system_id,
            reference: Some(reference),
        }
    }

    /// Create a location for a file inside a plain directory tree.
    pub fn from_directory(response_path: impl Into<CompactString>, reference: R) -> Self {
        Self {
            real_path: response_path.into(),
            virtual_path: CompactString::default(),
            file_system_id: CompactString::default(),
            reference: Some(reference),
        }
    }

    /// Get the real path.
    pub fn real_path(&self) -> &str {
        &self.real_path
    }

    /// Get the virtual path (empty when not known).
    pub fn virtual_path(&self) -> &str {
        &self.virtual_path
    }

    /// Get the filesystem id (empty for directories and failed lookups).
    pub fn file_system_id(&self) -> &str {
        &self.file_system_id
    }

    /// Get the backend reference, if one is attached.
    pub fn reference(&self) -> Option<&R> {
        self.reference.as_ref()
    }

    /// Check if the location is tied to an image layer.
    pub fn has_layer(&self) -> bool {
        !self.file_system_id.is_empty()
    }

    /// Get the identity-bearing view of this location.
    pub fn identity(&self) -> LocationIdentity<'_> {
        LocationIdentity {
            real_path: &self.real_path,
            file_system_id: &self.file_system_id,
        }
    }
}

impl<R: FileRef> Identifiable for Location<R> {
    fn id(&self) -> ArtifactId {
        derive_id_or_empty(&self.identity(), self)
    }
}

impl<R: FileRef> fmt::Display for Location<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Location<")?;
        if let Some(id) = self.reference.as_ref().map(|r| r.id()).filter(|id| *id != 0) {
            write!(f, "id={id} ")?;
        }

        write!(f, "RealPath={:?}", self.real_path.as_str())?;

        if !self.virtual_path.is_empty() {
            write!(f, " VirtualPath={:?}", self.virtual_path.as_str())?;
        }

        if !self.file_system_id.is_empty() {
            write!(f, " Layer={:?}", self.file_system_id.as_str())?;
        }
        f.write_str(">")
    }
}

impl<R: FileRef> PartialEq for Location<R> {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl<R: FileRef> Eq for Location<R> {}

impl<R: FileRef> Hash for Location<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl<R: FileRef> Serialize for Location<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.identity().serialize(serializer)
    }
}

/// Owned form of [`LocationIdentity`] used when reading locations back.
#[derive(Deserialize)]
struct LocationRecord {
    #[serde(rename = "path")]
    real_path: CompactString,
    #[serde(rename = "layerID", default)]
    file_system_id: CompactString,
}

impl<'de, R: FileRef> Deserialize<'de> for Location<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = LocationRecord::deserialize(deserializer)?;
        Ok(Self {
            real_path: record.real_path,
            virtual_path: CompactString::default(),
            file_system_id: record.file_system_id,
            reference: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, LayerMetadata, MemoryCatalog};

    fn catalog_with(reference: &FileReference, digest: &str) -> MemoryCatalog {
        let catalog = MemoryCatalog::new();
        catalog.insert(reference, CatalogEntry::new(LayerMetadata::new(0, digest)));
        catalog
    }

    #[test]
    fn test_bare_path() {
        let location = Location::new("/etc/passwd");
        assert_eq!(location.real_path(), "/etc/passwd");
        assert_eq!(location.virtual_path(), "");
        assert_eq!(location.file_system_id(), "");
        assert!(location.reference().is_none());
    }

    #[test]
    fn test_from_image_found() {
        let reference = FileReference::new(4, "/bin/busybox");
        let catalog = catalog_with(&reference, "sha256:aaa");

        let location = Location::from_image("/bin/sh", reference.clone(), &catalog);
        assert_eq!(location.real_path(), "/bin/busybox");
        assert_eq!(location.virtual_path(), "/bin/sh");
        assert_eq!(location.file_system_id(), "sha256:aaa");
        assert_eq!(location.reference(), Some(&reference));
        assert!(location.has_layer());
    }

    #[test]
    fn test_from_image_missing_entry() {
        let reference = FileReference::new(5, "/bin/busybox");
        let catalog = MemoryCatalog::new();

        let location = Location::from_image("/bin/sh", reference, &catalog);
        assert_eq!(location.real_path(), "/bin/busybox");
        assert_eq!(location.virtual_path(), "/bin/sh");
        assert_eq!(location.file_system_id(), "");
        assert!(location.reference().is_some());
        assert!(!location.has_layer());
    }

    #[test]
    fn test_from_directory() {
        let location = Location::from_directory("/src/main.rs", FileReference::new(1, "/src/main.rs"));
        assert_eq!(location.real_path(), "/src/main.rs");
        assert_eq!(location.virtual_path(), "");
        assert_eq!(location.file_system_id(), "");
        assert_eq!(location.reference().map(|r| r.id), Some(1));
    }

    #[test]
    fn test_id_ignores_virtual_path_and_reference() {
        let first = FileReference::new(1, "/bin/busybox");
        let second = FileReference::new(2, "/bin/busybox");
        let catalog = MemoryCatalog::new();
        catalog.insert(&first, CatalogEntry::new(LayerMetadata::new(0, "sha256:aaa")));
        catalog.insert(&second, CatalogEntry::new(LayerMetadata::new(0, "sha256:aaa")));

        let a = Location::from_image("/bin/sh", first, &catalog);
        let b = Location::from_image("/usr/bin/sh", second, &catalog);
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
    }

    #[test]
    fn test_id_distinguishes_layers() {
        let reference = FileReference::new(1, "/bin/sh");
        let a = Location::from_image("/bin/sh", reference.clone(), &catalog_with(&reference, "sha256:aaa"));
        let b = Location::from_image("/bin/sh", reference.clone(), &catalog_with(&reference, "sha256:bbb"));
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let reference = FileReference::new(7, "/bin/busybox");
        let location = Location::from_image("/bin/sh", reference.clone(), &catalog_with(&reference, "sha256:aaa"));
        assert_eq!(
            location.to_string(),
            r#"Location<id=7 RealPath="/bin/busybox" VirtualPath="/bin/sh" Layer="sha256:aaa">"#
        );

        assert_eq!(Location::new("/etc/passwd").to_string(), r#"Location<RealPath="/etc/passwd">"#);
    }

    #[test]
    fn test_display_skips_zero_reference_id() {
        let location = Location::from_directory("/a", FileReference::new(0, "/a"));
        assert_eq!(location.to_string(), r#"Location<RealPath="/a">"#);
    }

    #[test]
    fn test_serialize_canonical_form() {
        let reference = FileReference::new(7, "/bin/busybox");
        let location = Location::from_image("/bin/sh", reference.clone(), &catalog_with(&reference, "sha256:aaa"));
        assert_eq!(
            serde_json::to_string(&location).unwrap(),
            r#"{"path":"/bin/busybox","layerID":"sha256:aaa"}"#
        );
        assert_eq!(serde_json::to_string(&Location::new("/x")).unwrap(), r#"{"path":"/x"}"#);
    }

    #[test]
    fn test_deserialize_keeps_identity() {
        let reference = FileReference::new(7, "/bin/busybox");
        let location = Location::from_image("/bin/sh", reference.clone(), &catalog_with(&reference, "sha256:aaa"));
        let json = serde_json::to_string(&location).unwrap();

        let restored: Location = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, location);
        assert_eq!(restored.id(), location.id());
        assert_eq!(restored.virtual_path(), "");
        assert!(restored.reference().is_none());
    }

    #[test]
    fn test_location_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Location>();
    }
}
