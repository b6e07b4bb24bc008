//! Extreme-value queries across locations
//!
//! A query names a scope (every location, one county or one place), a
//! calendar period and a measure. It either looks for the most extreme single
//! reading in scope, or compares per-location averages over the period. Ties
//! are always kept.

use super::LocationIndex;
use super::query::LocationObservation;
use crate::app::models::{Extremum, Location, Measure, calendar_date};
use crate::app::services::observation_index::ObservationIndex;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Which locations a query covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    County(u32),
    Location { name: String, county: u32 },
}

/// Calendar period a query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    /// A single day from 1-based components
    pub fn day(year: i32, month: u32, day: u32) -> Result<Self> {
        Ok(Period::Day(calendar_date(year, month, day)?))
    }

    /// A month (1-based) of a year
    pub fn month(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid_argument(format!(
                "Invalid month {}: must be between 1 and 12",
                month
            )));
        }
        Ok(Period::Month { year, month })
    }

    /// Observations of `index` that fall in this period
    pub fn select(&self, index: &ObservationIndex) -> Result<ObservationIndex> {
        match *self {
            Period::Day(date) => Ok(index.filter_by_range(date, date)),
            Period::Month { year, month } => index.filter_by_year_month(year, month),
            Period::Year(year) => Ok(index.filter_by_year(year)),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day(date) => write!(f, "{}", date),
            Period::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Period::Year(year) => write!(f, "{}", year),
        }
    }
}

/// A complete cross-location extreme query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtremeQuery {
    pub scope: Scope,
    pub period: Period,
    pub measure: Measure,
    pub extremum: Extremum,
}

/// A location's average of one measure over a period
#[derive(Debug, Clone, Serialize)]
pub struct LocationAverage {
    pub location: Arc<Location>,
    pub average: f64,
    /// Number of valid readings behind the average
    pub readings: usize,
}

impl LocationIndex {
    /// Locations covered by a scope, in index order
    pub fn locations_in_scope(&self, scope: &Scope) -> Result<Vec<&Arc<Location>>> {
        Ok(match scope {
            Scope::All => self.locations.iter().collect(),
            Scope::County(county) => self
                .locations
                .iter()
                .filter(|location| location.county() == *county)
                .collect(),
            Scope::Location { name, county } => {
                self.find_by_name_and_county(name, *county)?.into_iter().collect()
            }
        })
    }

    /// Every single reading tied at the extreme value within the query scope
    ///
    /// Returns an empty vector when no location in scope has a valid reading
    /// in the period.
    pub fn extreme_readings(&self, query: &ExtremeQuery) -> Result<Vec<LocationObservation>> {
        let measure = query.measure;
        let mut candidates: Vec<(&Arc<Location>, ObservationIndex)> = Vec::new();

        for location in self.locations_in_scope(&query.scope)? {
            let in_period = query.period.select(&location.observations())?;
            let extremes = in_period.extremes_of(|o| o.reading(measure), query.extremum);
            if !extremes.is_empty() {
                candidates.push((location, extremes));
            }
        }

        // Every location's extremes share one value, readable from the first entry
        let Some(extreme) = candidates
            .iter()
            .filter_map(|(_, extremes)| extremes.first().and_then(|o| o.reading(measure)))
            .reduce(|best, value| query.extremum.pick(best, value))
        else {
            return Ok(Vec::new());
        };

        let hits: Vec<LocationObservation> = candidates
            .into_iter()
            .filter(|(_, extremes)| {
                extremes.first().and_then(|o| o.reading(measure)) == Some(extreme)
            })
            .flat_map(|(location, extremes)| {
                extremes
                    .iter()
                    .map(|observation| LocationObservation {
                        location: Arc::clone(location),
                        observation: Arc::clone(observation),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        debug!(
            "Extreme {} {:?} for {}: {} ({} hits)",
            measure,
            query.extremum,
            query.period,
            extreme,
            hits.len()
        );
        Ok(hits)
    }

    /// Locations whose average over the period is the extreme within scope
    ///
    /// Locations without valid readings in the period are skipped.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for a single-day period.
    pub fn extreme_averages(&self, query: &ExtremeQuery) -> Result<Vec<LocationAverage>> {
        if matches!(query.period, Period::Day(_)) {
            return Err(Error::invalid_argument(
                "Averages need a month or a year, not a single day",
            ));
        }

        let measure = query.measure;
        let mut averages = Vec::new();

        for location in self.locations_in_scope(&query.scope)? {
            let in_period = query.period.select(&location.observations())?;
            if let Some(average) = in_period.average_of(|o| o.reading(measure)) {
                let readings = in_period.iter().filter(|o| o.reading(measure).is_some()).count();
                averages.push(LocationAverage {
                    location: Arc::clone(location),
                    average,
                    readings,
                });
            }
        }

        let Some(extreme) = averages
            .iter()
            .map(|entry| entry.average)
            .reduce(|best, value| query.extremum.pick(best, value))
        else {
            return Ok(Vec::new());
        };

        averages.retain(|entry| entry.average == extreme);
        Ok(averages)
    }
}
