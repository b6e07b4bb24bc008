//! Averages and extreme values over an observation index
//!
//! Missing readings are `None` on the observation and are skipped by every
//! aggregate here. An aggregate over zero valid readings is `None`, and an
//! extreme query over zero valid readings is an empty index, so "no data" can
//! never be mistaken for a real reading.

use super::ObservationIndex;
use crate::app::models::{Extremum, Observation, TemperatureKind};
use chrono::NaiveDate;
use serde::Serialize;

impl ObservationIndex {
    /// Average of one temperature field over all valid readings
    pub fn average_temperature(&self, kind: TemperatureKind) -> Option<f64> {
        self.average_of(|observation| observation.temperature(kind))
    }

    /// Average precipitation over all valid readings
    pub fn average_precipitation(&self) -> Option<f64> {
        self.average_of(Observation::precipitation)
    }

    /// Sum of all valid precipitation readings
    pub fn total_precipitation(&self) -> Option<f64> {
        self.observations
            .iter()
            .filter_map(|observation| observation.precipitation())
            .fold(None, |total, value| Some(total.unwrap_or(0.0) + value))
    }

    /// Observations holding the lowest valid minimum temperature
    pub fn extreme_min_temperature(&self) -> ObservationIndex {
        self.extremes_of(Observation::min_temperature, Extremum::Lowest)
    }

    /// Observations holding the highest valid maximum temperature
    pub fn extreme_max_temperature(&self) -> ObservationIndex {
        self.extremes_of(Observation::max_temperature, Extremum::Highest)
    }

    /// Observations holding the lowest valid precipitation
    pub fn extreme_min_precipitation(&self) -> ObservationIndex {
        self.extremes_of(Observation::precipitation, Extremum::Lowest)
    }

    /// Observations holding the highest valid precipitation
    pub fn extreme_max_precipitation(&self) -> ObservationIndex {
        self.extremes_of(Observation::precipitation, Extremum::Highest)
    }

    /// Average of the readings selected by `reading`, skipping missing ones
    pub fn average_of<F>(&self, reading: F) -> Option<f64>
    where
        F: Fn(&Observation) -> Option<f64>,
    {
        let (sum, count) = self
            .observations
            .iter()
            .filter_map(|observation| reading(observation))
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    /// Most extreme valid reading selected by `reading`
    pub fn extreme_value<F>(&self, reading: F, extremum: Extremum) -> Option<f64>
    where
        F: Fn(&Observation) -> Option<f64>,
    {
        self.observations
            .iter()
            .filter_map(|observation| reading(observation))
            .reduce(|best, value| extremum.pick(best, value))
    }

    /// Every observation tied at the extreme reading, in date order
    ///
    /// The first pass finds the extreme value, the second collects all
    /// observations holding it. Ties are all kept.
    pub fn extremes_of<F>(&self, reading: F, extremum: Extremum) -> ObservationIndex
    where
        F: Fn(&Observation) -> Option<f64>,
    {
        match self.extreme_value(&reading, extremum) {
            Some(extreme) => self.filtered(|observation| reading(observation) == Some(extreme)),
            None => ObservationIndex::new(),
        }
    }

    /// All aggregates of this index in one report
    pub fn summary(&self) -> PeriodSummary {
        PeriodSummary {
            observation_count: self.len(),
            first_date: self.first().map(|o| o.date()),
            last_date: self.last().map(|o| o.date()),
            mean_temperature: self.average_temperature(TemperatureKind::Mean),
            mean_min_temperature: self.average_temperature(TemperatureKind::Min),
            mean_max_temperature: self.average_temperature(TemperatureKind::Max),
            lowest_temperature: ExtremeSummary::from_index(
                &self.extreme_min_temperature(),
                Observation::min_temperature,
            ),
            highest_temperature: ExtremeSummary::from_index(
                &self.extreme_max_temperature(),
                Observation::max_temperature,
            ),
            mean_precipitation: self.average_precipitation(),
            total_precipitation: self.total_precipitation(),
            lowest_precipitation: ExtremeSummary::from_index(
                &self.extreme_min_precipitation(),
                Observation::precipitation,
            ),
            highest_precipitation: ExtremeSummary::from_index(
                &self.extreme_max_precipitation(),
                Observation::precipitation,
            ),
        }
    }
}

/// Aggregates of one period of observations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub observation_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub mean_temperature: Option<f64>,
    pub mean_min_temperature: Option<f64>,
    pub mean_max_temperature: Option<f64>,
    pub lowest_temperature: Option<ExtremeSummary>,
    pub highest_temperature: Option<ExtremeSummary>,
    pub mean_precipitation: Option<f64>,
    pub total_precipitation: Option<f64>,
    pub lowest_precipitation: Option<ExtremeSummary>,
    pub highest_precipitation: Option<ExtremeSummary>,
}

/// An extreme reading and every date it occurred on
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtremeSummary {
    pub value: f64,
    pub dates: Vec<NaiveDate>,
}

impl ExtremeSummary {
    /// Read the shared value back out of an extreme-query result
    fn from_index<F>(extremes: &ObservationIndex, reading: F) -> Option<Self>
    where
        F: Fn(&Observation) -> Option<f64>,
    {
        let value = extremes.first().and_then(|first| reading(first))?;
        Some(Self {
            value,
            dates: extremes.iter().map(|o| o.date()).collect(),
        })
    }
}
