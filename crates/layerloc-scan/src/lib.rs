//! Directory traversal producing layerloc locations.
//!
//! This crate walks a plain directory tree and hands back one
//! directory-relative [`Location`] per distinct regular file. Paths are
//! reported relative to the root, so the same tree resolved from two
//! different mount points yields the same artifact ids.
//!
//! # Example
//!
//! ```rust,no_run
//! use layerloc_scan::{DirectoryResolver, Identifiable, ResolverConfig};
//!
//! let config = ResolverConfig::new("/path/to/rootfs");
//! let resolution = DirectoryResolver::new().resolve(&config).unwrap();
//!
//! for location in resolution.locations.iter() {
//!     println!("{} {}", location.id(), location);
//! }
//! ```

mod config;
mod error;
mod resolver;

pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use error::{ResolveError, ResolveWarning, WarningKind};
pub use resolver::{DirectoryResolver, Resolution};

// Re-export core types for convenience
pub use layerloc_core::{ArtifactId, FileReference, Identifiable, Location, LocationSet};
