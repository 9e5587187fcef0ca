//! JWalk-based directory resolver.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use compact_str::CompactString;
use jwalk::{Parallelism, WalkDir};

use layerloc_core::{FileReference, Location, LocationSet, SourceMetadata};

use crate::config::ResolverConfig;
use crate::error::{ResolveError, ResolveWarning, WarningKind};

/// Locations found under a directory root.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Canonical root that was resolved.
    pub root: PathBuf,
    /// Distinct file locations, in walk order.
    pub locations: LocationSet,
    /// Entries that were skipped.
    pub warnings: Vec<ResolveWarning>,
}

impl Resolution {
    /// Describe the resolved source.
    pub fn metadata(&self) -> SourceMetadata {
        SourceMetadata::directory(&self.root)
    }

    /// Check if any entries were skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Resolves every regular file under a root into a directory-relative location.
///
/// Locations are keyed by their root-relative real path. Symlinks to files
/// inside the root collapse onto their target; reference ids are unique
/// across all resolutions made by the same resolver.
#[derive(Debug)]
pub struct DirectoryResolver {
    next_id: AtomicU64,
}

impl DirectoryResolver {
    /// Create a new resolver.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
        }
    }

    /// Resolve all files under the configured root.
    pub fn resolve(&self, config: &ResolverConfig) -> Result<Resolution, ResolveError> {
        let root = config
            .root
            .canonicalize()
            .map_err(|e| ResolveError::io(&config.root, e))?;

        if !root.is_dir() {
            return Err(ResolveError::NotADirectory { path: root });
        }

        let parallelism = match config.threads {
            0 => Parallelism::RayonDefaultPool {
                busy_timeout: std::time::Duration::from_millis(100),
            },
            n => Parallelism::RayonNewPool(n),
        };

        let walker = WalkDir::new(&root)
            .parallelism(parallelism)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .sort(true)
            .min_depth(1)
            .max_depth(config.max_depth.map(|d| d as usize).unwrap_or(usize::MAX));

        let mut locations = LocationSet::new();
        let mut warnings = Vec::new();

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
                    let kind = walk_error_kind(&path);
                    warnings.push(ResolveWarning::new(path, err.to_string(), kind));
                    continue;
                }
            };

            let path = entry.path();
            let file_type = entry.file_type();

            let real_path = if file_type.is_file() && !config.follow_symlinks {
                path.clone()
            } else if file_type.is_file() || file_type.is_symlink() {
                match path.canonicalize() {
                    Ok(p) => p,
                    Err(err) => {
                        warnings.push(ResolveWarning::broken_symlink(&path, &err));
                        continue;
                    }
                }
            } else {
                continue;
            };

            // Links to directories are not locations.
            if file_type.is_symlink() && !real_path.is_file() {
                continue;
            }

            let Some(response_path) = root_relative(&root, &real_path) else {
                warnings.push(ResolveWarning::outside_root(&path, &real_path));
                continue;
            };

            let reference = FileReference::new(self.next_id(), response_path.clone());
            if !locations.insert(Location::from_directory(response_path, reference)) {
                tracing::debug!(
                    target: "layerloc::scan",
                    "{} already resolved via its real path",
                    path.display()
                );
            }
        }

        for warning in &warnings {
            tracing::debug!(target: "layerloc::scan", "skipped {}: {}", warning.path.display(), warning.message);
        }

        Ok(Resolution {
            root,
            locations,
            warnings,
        })
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for DirectoryResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify a walker error. Links that fail to resolve while being followed
/// are reported the same way as when they are not followed.
fn walk_error_kind(path: &Path) -> WarningKind {
    let is_symlink = path
        .symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        WarningKind::BrokenSymlink
    } else {
        WarningKind::ReadError
    }
}

/// Render `path` as an absolute, `/`-separated path relative to `root`.
fn root_relative(root: &Path, path: &Path) -> Option<CompactString> {
    let relative = path.strip_prefix(root).ok()?;
    let mut out = CompactString::default();
    for component in relative.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    if out.is_empty() {
        out.push('/');
    }
    Some(out)
}
