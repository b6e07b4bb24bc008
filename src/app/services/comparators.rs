//! Ordering rules for the sorted indexes
//!
//! Both indexes keep their entries sorted by a [`Comparator`] and look entries
//! up by binary search against a probe value built with the same comparator,
//! so ordering and equality can never disagree.

use crate::app::models::{Location, Observation};
use std::cmp::Ordering;
use std::sync::Arc;

/// Total order over one entity type
pub trait Comparator {
    type Item;

    fn compare(&self, a: &Self::Item, b: &Self::Item) -> Ordering;

    /// Check whether two values are equal under this ordering
    fn equivalent(&self, a: &Self::Item, b: &Self::Item) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Binary search over a slice sorted by this comparator
    ///
    /// Returns `Ok(index)` of a matching entry or `Err(index)` where the probe
    /// would be inserted to keep the slice sorted. The result is meaningless
    /// if the slice is not sorted by `self`.
    fn search(&self, items: &[Arc<Self::Item>], probe: &Self::Item) -> Result<usize, usize> {
        items.binary_search_by(|item| self.compare(item, probe))
    }

    /// Check that a slice is non-decreasing under this comparator
    fn is_sorted(&self, items: &[Arc<Self::Item>]) -> bool {
        items
            .windows(2)
            .all(|pair| self.compare(&pair[0], &pair[1]) != Ordering::Greater)
    }
}

/// Orders observations by calendar date: year, then month, then day
///
/// Readings are ignored, so two observations of the same day are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateComparator;

impl Comparator for DateComparator {
    type Item = Observation;

    fn compare(&self, a: &Observation, b: &Observation) -> Ordering {
        a.year()
            .cmp(&b.year())
            .then_with(|| a.month().cmp(&b.month()))
            .then_with(|| a.day().cmp(&b.day()))
    }
}

/// Orders locations by name, optionally breaking ties by county code
///
/// Names compare case-sensitively in natural string order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationComparator {
    by_county: bool,
}

impl LocationComparator {
    /// Name only; places sharing a name in different counties are equal
    pub fn by_name() -> Self {
        Self { by_county: false }
    }

    /// Name, then county code
    pub fn by_name_then_county() -> Self {
        Self { by_county: true }
    }

    /// Whether county codes break name ties
    pub fn uses_county(&self) -> bool {
        self.by_county
    }
}

impl Default for LocationComparator {
    fn default() -> Self {
        Self::by_name_then_county()
    }
}

impl Comparator for LocationComparator {
    type Item = Location;

    fn compare(&self, a: &Location, b: &Location) -> Ordering {
        let by_name = a.name().cmp(b.name());
        if self.by_county {
            by_name.then_with(|| a.county().cmp(&b.county()))
        } else {
            by_name
        }
    }
}
