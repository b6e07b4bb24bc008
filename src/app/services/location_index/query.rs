//! County filters and cross-location lookups
//!
//! These queries scan the whole index; results keep the (name, county) order
//! of the source.

use super::LocationIndex;
use crate::app::models::{Location, Observation};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// An observation together with the location it was recorded at
#[derive(Debug, Clone, Serialize)]
pub struct LocationObservation {
    pub location: Arc<Location>,
    pub observation: Arc<Observation>,
}

impl LocationIndex {
    /// Locations in one county, as a fresh index sharing the same entities
    pub fn filter_by_county(&self, county: u32) -> LocationIndex {
        LocationIndex::from_sorted(
            self.locations
                .iter()
                .filter(|location| location.county() == county)
                .cloned()
                .collect(),
        )
    }

    /// Names of the locations in one county, in sorted order
    ///
    /// A county without locations gives an empty vector.
    pub fn names_in_county(&self, county: u32) -> Vec<String> {
        self.locations
            .iter()
            .filter(|location| location.county() == county)
            .map(|location| location.name().to_string())
            .collect()
    }

    /// Distinct county codes present, ascending
    pub fn counties(&self) -> Vec<u32> {
        let mut counties: Vec<u32> = self.locations.iter().map(|l| l.county()).collect();
        counties.sort_unstable();
        counties.dedup();
        counties
    }

    /// Every location with an observation on `date`, optionally within one county
    pub fn observations_on(&self, date: NaiveDate, county: Option<u32>) -> Vec<LocationObservation> {
        self.locations
            .iter()
            .filter(|location| county.is_none_or(|c| location.county() == c))
            .filter_map(|location| {
                let observation = Arc::clone(location.observations().find(date)?);
                Some(LocationObservation {
                    location: Arc::clone(location),
                    observation,
                })
            })
            .collect()
    }
}
