//! Data models for the weather index
//!
//! This module contains the core entities: a dated weather [`Observation`] and a
//! named [`Location`] owning its observations, plus the closed enumerations used
//! to select which reading a query works on.

use crate::app::services::observation_index::ObservationIndex;
use crate::constants::{self, counties, precipitation, temperature};
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// =============================================================================
// Observation Record Structure
// =============================================================================

/// One dated weather record for one location
///
/// Readings outside their documented valid range are stored as `None` and
/// never take part in averages or extremes. Observations are immutable once
/// built; indexes share them through `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Calendar date of the record
    date: NaiveDate,

    /// Mean temperature for the day in degrees Celsius
    mean_temperature: Option<f64>,

    /// Minimum temperature for the day in degrees Celsius
    min_temperature: Option<f64>,

    /// Maximum temperature for the day in degrees Celsius
    max_temperature: Option<f64>,

    /// Precipitation amount in millimetres
    precipitation: Option<f64>,
}

impl Observation {
    /// Create an observation from raw numbers
    ///
    /// Any reading outside its valid range (including the documented
    /// `MISSING` encodings) is treated as not recorded. The month is 1-based.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when the date components do not form
    /// a calendar date.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        mean_temperature: f64,
        min_temperature: f64,
        max_temperature: f64,
        precipitation: f64,
    ) -> Result<Self> {
        let date = calendar_date(year, month, day)?;
        Ok(Self::from_readings(
            date,
            Some(mean_temperature),
            Some(min_temperature),
            Some(max_temperature),
            Some(precipitation),
        ))
    }

    /// Create an observation from optional readings
    ///
    /// Present readings outside their valid range are discarded.
    pub fn from_readings(
        date: NaiveDate,
        mean_temperature: Option<f64>,
        min_temperature: Option<f64>,
        max_temperature: Option<f64>,
        precipitation: Option<f64>,
    ) -> Self {
        Self {
            date,
            mean_temperature: mean_temperature.filter(|&t| temperature::is_valid(t)),
            min_temperature: min_temperature.filter(|&t| temperature::is_valid(t)),
            max_temperature: max_temperature.filter(|&t| temperature::is_valid(t)),
            precipitation: precipitation.filter(|&p| precipitation::is_valid(p)),
        }
    }

    /// Search key carrying only a date
    pub(crate) fn probe(date: NaiveDate) -> Self {
        Self::from_readings(date, None, None, None, None)
    }

    /// Calendar date of the observation
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month of the observation, 1-based
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn mean_temperature(&self) -> Option<f64> {
        self.mean_temperature
    }

    pub fn min_temperature(&self) -> Option<f64> {
        self.min_temperature
    }

    pub fn max_temperature(&self) -> Option<f64> {
        self.max_temperature
    }

    pub fn precipitation(&self) -> Option<f64> {
        self.precipitation
    }

    /// Temperature reading selected by kind
    pub fn temperature(&self, kind: TemperatureKind) -> Option<f64> {
        match kind {
            TemperatureKind::Mean => self.mean_temperature,
            TemperatureKind::Min => self.min_temperature,
            TemperatureKind::Max => self.max_temperature,
        }
    }

    /// Reading selected by measure
    pub fn reading(&self, measure: Measure) -> Option<f64> {
        match measure {
            Measure::Precipitation => self.precipitation,
            Measure::MinTemperature => self.min_temperature,
            Measure::MaxTemperature => self.max_temperature,
        }
    }

    /// Check whether the observation has no valid reading at all
    pub fn is_empty(&self) -> bool {
        self.mean_temperature.is_none()
            && self.min_temperature.is_none()
            && self.max_temperature.is_none()
            && self.precipitation.is_none()
    }
}

/// Build a calendar date from 1-based components
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(Error::invalid_argument(format!(
            "Invalid month {}: must be between 1 and 12",
            month
        )));
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        Error::invalid_argument(format!(
            "Invalid date {:04}-{:02}-{:02}: no such calendar day",
            year, month, day
        ))
    })
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), constants::DATE_FORMAT).map_err(|e| {
        Error::invalid_argument(format!("Invalid date '{}': {} (expected YYYY-MM-DD)", value, e))
    })
}

// =============================================================================
// Reading Selectors
// =============================================================================

/// Which temperature field an average is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureKind {
    Mean,
    Min,
    Max,
}

/// Reading used by cross-location extreme queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Daily precipitation amount
    Precipitation,
    /// Daily minimum temperature
    MinTemperature,
    /// Daily maximum temperature
    MaxTemperature,
}

impl Measure {
    pub fn label(&self) -> &'static str {
        match self {
            Measure::Precipitation => "precipitation",
            Measure::MinTemperature => "min-temperature",
            Measure::MaxTemperature => "max-temperature",
        }
    }

    /// Unit suffix for display
    pub fn unit(&self) -> &'static str {
        match self {
            Measure::Precipitation => "mm",
            Measure::MinTemperature | Measure::MaxTemperature => "°C",
        }
    }
}

/// Which end of the range an extreme query looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extremum {
    Lowest,
    Highest,
}

impl Extremum {
    /// Pick the more extreme of two readings
    pub fn pick(&self, a: f64, b: f64) -> f64 {
        match self {
            Extremum::Lowest => a.min(b),
            Extremum::Highest => a.max(b),
        }
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "precipitation" | "precip" | "rain" => Ok(Measure::Precipitation),
            "min-temperature" | "min-temp" | "min" => Ok(Measure::MinTemperature),
            "max-temperature" | "max-temp" | "max" => Ok(Measure::MaxTemperature),
            other => Err(Error::invalid_argument(format!(
                "Unknown measure '{}'. Available measures: precipitation, min-temperature, max-temperature",
                other
            ))),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Location Structure
// =============================================================================

/// A named place in a county, owning its observations
///
/// Identity is the case-sensitive name together with the county code.
/// Indexes share locations through `Arc`, so observations sit behind a lock
/// and every index holding the location sees the same records.
#[derive(Debug, Serialize)]
pub struct Location {
    /// Place name, never empty
    name: String,

    /// County code (see [`crate::constants::counties`])
    county: u32,

    /// Observations recorded at this location
    #[serde(skip)]
    observations: RwLock<ObservationIndex>,
}

impl Location {
    /// Create a location with no observations
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when the name is empty or whitespace.
    pub fn new(name: impl Into<String>, county: u32) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_argument("Location name cannot be empty"));
        }

        Ok(Self::probe(name, county))
    }

    /// Search key; the caller has already checked the name
    pub(crate) fn probe(name: impl Into<String>, county: u32) -> Self {
        Self {
            name: name.into(),
            county,
            observations: RwLock::new(ObservationIndex::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn county(&self) -> u32 {
        self.county
    }

    /// County name if the code is a known county
    pub fn county_name(&self) -> Option<&'static str> {
        counties::name(self.county)
    }

    /// Observations recorded at this location, ordered by date
    ///
    /// Holds a read lock until the guard is dropped.
    pub fn observations(&self) -> RwLockReadGuard<'_, ObservationIndex> {
        // An index is never left half-updated, so a poisoned lock is still usable
        self.observations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn observations_mut(&self) -> RwLockWriteGuard<'_, ObservationIndex> {
        self.observations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a new observation
    ///
    /// # Errors
    /// Returns [`Error::DuplicateKey`] if the date is already recorded.
    pub fn add_observation(&self, observation: impl Into<Arc<Observation>>) -> Result<()> {
        self.observations_mut().insert(observation)
    }

    /// Check whether this location has the given key
    pub fn has_key(&self, name: &str, county: u32) -> bool {
        self.name == name && self.county == county
    }
}

impl Clone for Location {
    /// A separate location with a copy of the current observations
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            county: self.county,
            observations: RwLock::new(self.observations().clone()),
        }
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.county == other.county
    }
}

impl Eq for Location {}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.county_name() {
            Some(county) => write!(f, "{} ({})", self.name, county),
            None => write!(f, "{} (county {})", self.name, self.county),
        }
    }
}
