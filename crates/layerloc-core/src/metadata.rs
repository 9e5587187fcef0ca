//! Descriptive metadata about what was cataloged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::catalog::LayerMetadata;

/// How a source was discovered.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    /// A plain directory tree.
    Directory,
    /// A container image.
    Image,
    /// A single file.
    File,
    /// Not yet determined.
    #[default]
    Unknown,
}

/// Description of a container image source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageMetadata {
    /// Image reference as given by the user.
    pub user_input: String,
    /// Image id.
    #[serde(rename = "imageID")]
    pub id: String,
    /// Digest of the image manifest.
    pub manifest_digest: String,
    /// Manifest media type.
    pub media_type: String,
    /// Tags pointing at the image.
    pub tags: Vec<String>,
    /// Total image size in bytes.
    pub size: u64,
    /// Layers, base layer first.
    pub layers: Vec<LayerMetadata>,
    /// Repository digests.
    pub repo_digests: Vec<String>,
    /// Target CPU architecture.
    pub architecture: String,
    /// Target operating system.
    pub os: String,
}

impl ImageMetadata {
    /// Find a layer by digest.
    pub fn layer(&self, digest: &str) -> Option<&LayerMetadata> {
        self.layers.iter().find(|layer| layer.digest == digest)
    }
}

/// Description of a single-file source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileSourceMetadata {
    pub name: String,
    pub version: String,
    pub user_input: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    pub hash_alg: String,
}

/// Static description of the source that was cataloged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Discovery scheme.
    pub scheme: Scheme,
    /// Image description (image scheme only).
    #[serde(default)]
    pub image: ImageMetadata,
    /// File description (file scheme only).
    #[serde(default)]
    pub file: FileSourceMetadata,
    /// Free-form package description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<serde_json::Value>,
    /// Root path that was cataloged (directory scheme only).
    #[serde(default)]
    pub path: PathBuf,
}

impl SourceMetadata {
    /// Describe a directory source.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            scheme: Scheme::Directory,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Describe an image source.
    pub fn image(image: ImageMetadata) -> Self {
        Self {
            scheme: Scheme::Image,
            image,
            ..Self::default()
        }
    }

    /// Describe a single-file source.
    pub fn file(file: FileSourceMetadata) -> Self {
        Self {
            scheme: Scheme::File,
            file,
            ..Self::default()
        }
    }

    /// Attach a package description.
    pub fn with_package(mut self, package: serde_json::Value) -> Self {
        self.package = Some(package);
        self
    }
}
