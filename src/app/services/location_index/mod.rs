//! Name-ordered location index
//!
//! Keeps locations sorted by name and then county code so a place can be
//! found by binary search, and so every location sharing a name sits in one
//! contiguous run. Each location owns its observations; removing a location
//! discards them.

use crate::app::models::Location;
use crate::app::services::comparators::{Comparator, LocationComparator};
use crate::{Error, Result};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

pub mod extremes;
pub mod query;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use extremes::{ExtremeQuery, LocationAverage, Period, Scope};
pub use query::LocationObservation;

/// Locations sorted by name, then county code
///
/// (name, county) pairs are unique. Filtered results are fresh indexes that
/// share the `Arc<Location>` entities of the source, so observations recorded
/// through either one are visible in both.
#[derive(Debug, Clone)]
pub struct LocationIndex {
    /// Locations in ascending (name, county) order
    pub(crate) locations: Vec<Arc<Location>>,

    comparator: LocationComparator,
}

impl Default for LocationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            locations: Vec::new(),
            comparator: LocationComparator::by_name_then_county(),
        }
    }

    /// Wrap a vector already sorted and unique by (name, county)
    fn from_sorted(locations: Vec<Arc<Location>>) -> Self {
        let index = Self {
            locations,
            comparator: LocationComparator::by_name_then_county(),
        };
        debug_assert!(index.is_sorted());
        index
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Iterate in (name, county) order
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Location>> {
        self.locations.iter()
    }

    /// Insert a location at its sorted position
    ///
    /// # Errors
    /// Returns [`Error::DuplicateKey`] if a location with the same name and
    /// county is already present.
    pub fn insert(&mut self, location: impl Into<Arc<Location>>) -> Result<()> {
        let location = location.into();

        match self.comparator.search(&self.locations, &location) {
            Ok(_) => Err(Error::duplicate_key(format!(
                "location '{}' in county {}",
                location.name(),
                location.county()
            ))),
            Err(position) => {
                debug!("Inserting location {} at position {}", location, position);
                self.locations.insert(position, location);
                Ok(())
            }
        }
    }

    /// Find a location by exact name and county
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the name is blank. A location
    /// that does not exist is `Ok(None)`.
    pub fn find_by_name_and_county(&self, name: &str, county: u32) -> Result<Option<&Arc<Location>>> {
        Ok(self
            .position(name, county)?
            .ok()
            .map(|index| &self.locations[index]))
    }

    /// Every location with this exact name, ordered by county
    pub fn find_by_name(&self, name: &str) -> Result<Vec<&Arc<Location>>> {
        let probe = probe(name, 0)?;
        let by_name = LocationComparator::by_name();

        let start = self
            .locations
            .partition_point(|location| by_name.compare(location, &probe) == Ordering::Less);
        let end = self
            .locations
            .partition_point(|location| by_name.compare(location, &probe) != Ordering::Greater);

        Ok(self.locations[start..end].iter().collect())
    }

    /// Remove a location and all of its observations
    ///
    /// Matching is by (name, county); the removed location is returned.
    pub fn remove(&mut self, location: &Location) -> Option<Arc<Location>> {
        let index = self.comparator.search(&self.locations, location).ok()?;
        let removed = self.locations.remove(index);
        self.sort();

        debug!(
            "Removed location {} with {} observations",
            removed,
            removed.observations().len()
        );
        Some(removed)
    }

    /// Re-sort by (name, county); a no-op on an already sorted index
    pub fn sort(&mut self) {
        let comparator = self.comparator;
        self.locations.sort_by(|a, b| comparator.compare(a, b));
    }

    /// Check the ordering invariant
    pub fn is_sorted(&self) -> bool {
        self.comparator.is_sorted(&self.locations)
    }

    /// Total number of observations across all locations
    pub fn observation_count(&self) -> usize {
        self.locations
            .iter()
            .map(|location| location.observations().len())
            .sum()
    }

    fn position(&self, name: &str, county: u32) -> Result<std::result::Result<usize, usize>> {
        let probe = probe(name, county)?;
        Ok(self.comparator.search(&self.locations, &probe))
    }
}

/// Lookup key for a location; blank names are a caller error, as in [`Location::new`]
fn probe(name: &str, county: u32) -> Result<Location> {
    if name.trim().is_empty() {
        return Err(Error::invalid_argument(
            "Cannot search for a location with an empty name",
        ));
    }
    Ok(Location::probe(name, county))
}

impl<'a> IntoIterator for &'a LocationIndex {
    type Item = &'a Arc<Location>;
    type IntoIter = std::slice::Iter<'a, Arc<Location>>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}
