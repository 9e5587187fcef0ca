//! Identity-deduplicated collections of locations.

use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::artifact::{ArtifactId, Identifiable};
use crate::location::Location;
use crate::reference::{FileRef, FileReference};

/// An insertion-ordered set of locations keyed by identity.
///
/// Two locations with the same real path and filesystem id occupy a single
/// slot; the first one inserted keeps its virtual path and reference.
#[derive(Debug, Clone)]
pub struct LocationSet<R: FileRef = FileReference> {
    locations: IndexSet<Location<R>>,
}

impl<R: FileRef> Default for LocationSet<R> {
    fn default() -> Self {
        Self {
            locations: IndexSet::new(),
        }
    }
}

impl<R: FileRef> LocationSet<R> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a location. Returns `true` if its identity was not yet present.
    pub fn insert(&mut self, location: Location<R>) -> bool {
        self.locations.insert(location)
    }

    /// Check if a location with the same identity is present.
    pub fn contains(&self, location: &Location<R>) -> bool {
        self.locations.contains(location)
    }

    /// Get the number of distinct locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Iterate over locations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Location<R>> {
        self.locations.iter()
    }

    /// Artifact ids of all locations, in insertion order.
    pub fn ids(&self) -> Vec<ArtifactId> {
        self.locations.iter().map(Identifiable::id).collect()
    }

    /// Consume the set into a vector in insertion order.
    pub fn into_vec(self) -> Vec<Location<R>> {
        self.locations.into_iter().collect()
    }
}

impl<R: FileRef> FromIterator<Location<R>> for LocationSet<R> {
    fn from_iter<I: IntoIterator<Item = Location<R>>>(iter: I) -> Self {
        Self {
            locations: iter.into_iter().collect(),
        }
    }
}

impl<R: FileRef> Extend<Location<R>> for LocationSet<R> {
    fn extend<I: IntoIterator<Item = Location<R>>>(&mut self, iter: I) {
        self.locations.extend(iter);
    }
}

impl<R: FileRef> IntoIterator for LocationSet<R> {
    type Item = Location<R>;
    type IntoIter = indexmap::set::IntoIter<Location<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.into_iter()
    }
}

impl<'a, R: FileRef> IntoIterator for &'a LocationSet<R> {
    type Item = &'a Location<R>;
    type IntoIter = indexmap::set::Iter<'a, Location<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

impl<R: FileRef> Serialize for LocationSet<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.locations)
    }
}

impl<'de, R: FileRef> Deserialize<'de> for LocationSet<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let locations = Vec::<Location<R>>::deserialize(deserializer)?;
        Ok(locations.into_iter().collect())
    }
}
