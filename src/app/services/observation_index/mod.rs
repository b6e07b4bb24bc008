//! Date-ordered observation index
//!
//! Holds one location's observations sorted by calendar date. Every mutation
//! leaves the sequence fully sorted, which is what makes the binary-search
//! lookups valid. At most one observation exists per date.

use crate::app::models::{Observation, calendar_date};
use crate::app::services::comparators::{Comparator, DateComparator};
use crate::{Error, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

pub mod aggregates;

#[cfg(test)]
pub mod tests;

// Re-export key types for convenience
pub use aggregates::{ExtremeSummary, PeriodSummary};

/// Observations of one location, sorted by [`DateComparator`]
///
/// Filtered results are fresh indexes sharing the same `Arc<Observation>`
/// entities as the source; nothing is deep-copied.
#[derive(Debug, Clone, Default)]
pub struct ObservationIndex {
    /// Observations in ascending date order, unique per date
    pub(crate) observations: Vec<Arc<Observation>>,
}

impl ObservationIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            observations: Vec::new(),
        }
    }

    /// Wrap a vector that is already sorted and unique by date
    fn from_sorted(observations: Vec<Arc<Observation>>) -> Self {
        debug_assert!(DateComparator.is_sorted(&observations));
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterate in chronological order
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Observation>> {
        self.observations.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Observation>] {
        &self.observations
    }

    /// Insert an observation at its chronological position
    ///
    /// # Errors
    /// Returns [`Error::DuplicateKey`] if an observation with the same date is
    /// already present; the index is left unchanged.
    pub fn insert(&mut self, observation: impl Into<Arc<Observation>>) -> Result<()> {
        let observation = observation.into();

        match DateComparator.search(&self.observations, &observation) {
            Ok(_) => Err(Error::duplicate_key(format!(
                "observation dated {}",
                observation.date()
            ))),
            Err(position) => {
                debug!("Inserting observation {} at position {}", observation.date(), position);
                self.observations.insert(position, observation);
                Ok(())
            }
        }
    }

    /// Insert many observations with a single sort
    ///
    /// The batch is applied all-or-nothing: a date repeated inside the batch
    /// or already present in the index rejects the whole batch.
    ///
    /// # Returns
    /// Number of observations inserted
    pub fn insert_batch<I, O>(&mut self, observations: I) -> Result<usize>
    where
        I: IntoIterator<Item = O>,
        O: Into<Arc<Observation>>,
    {
        let mut batch: Vec<Arc<Observation>> = observations.into_iter().map(Into::into).collect();
        batch.sort_by(|a, b| DateComparator.compare(a, b));

        if let Some(pair) = batch
            .windows(2)
            .find(|pair| DateComparator.equivalent(&pair[0], &pair[1]))
        {
            return Err(Error::duplicate_key(format!(
                "observation dated {} appears twice in batch",
                pair[0].date()
            )));
        }

        if let Some(existing) = batch
            .iter()
            .find(|observation| self.find(observation.date()).is_some())
        {
            return Err(Error::duplicate_key(format!(
                "observation dated {}",
                existing.date()
            )));
        }

        let inserted = batch.len();
        self.observations.extend(batch);
        self.sort();

        debug!("Inserted batch of {} observations ({} total)", inserted, self.len());
        Ok(inserted)
    }

    /// Re-sort by date; a no-op on an already sorted index
    pub fn sort(&mut self) {
        self.observations.sort_by(|a, b| DateComparator.compare(a, b));
    }

    /// Check the ordering invariant
    pub fn is_sorted(&self) -> bool {
        DateComparator.is_sorted(&self.observations)
    }

    /// Find the observation recorded on a date
    pub fn find(&self, date: NaiveDate) -> Option<&Arc<Observation>> {
        let probe = Observation::probe(date);
        DateComparator
            .search(&self.observations, &probe)
            .ok()
            .map(|index| &self.observations[index])
    }

    /// Find the observation for a year, month (1-based) and day
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the components are not a calendar
    /// date. A valid date with no observation is `Ok(None)`.
    pub fn find_by_date(&self, year: i32, month: u32, day: u32) -> Result<Option<&Arc<Observation>>> {
        let date = calendar_date(year, month, day)?;
        Ok(self.find(date))
    }

    /// Remove the observation recorded on a date
    pub fn remove(&mut self, year: i32, month: u32, day: u32) -> Result<Option<Arc<Observation>>> {
        let probe = Observation::probe(calendar_date(year, month, day)?);

        Ok(
            match DateComparator.search(&self.observations, &probe) {
                Ok(index) => {
                    debug!("Removing observation {}", probe.date());
                    Some(self.observations.remove(index))
                }
                Err(_) => None,
            },
        )
    }

    /// Observations recorded in a year, in date order
    pub fn filter_by_year(&self, year: i32) -> ObservationIndex {
        self.filtered(|observation| observation.year() == year)
    }

    /// Observations recorded in a month (1-based) of a year, in date order
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if the month is outside 1-12.
    pub fn filter_by_year_month(&self, year: i32, month: u32) -> Result<ObservationIndex> {
        if !(1..=12).contains(&month) {
            return Err(Error::invalid_argument(format!(
                "Invalid month {}: must be between 1 and 12",
                month
            )));
        }

        Ok(self.filtered(|observation| observation.year() == year && observation.month() == month))
    }

    /// Observations between two dates, both inclusive
    pub fn filter_by_range(&self, start: NaiveDate, end: NaiveDate) -> ObservationIndex {
        let from = self.observations.partition_point(|o| o.date() < start);
        let to = self.observations.partition_point(|o| o.date() <= end);

        if from >= to {
            return ObservationIndex::new();
        }
        Self::from_sorted(self.observations[from..to].to_vec())
    }

    /// Fresh index of the observations matching `predicate`
    pub(crate) fn filtered<P>(&self, predicate: P) -> ObservationIndex
    where
        P: Fn(&Observation) -> bool,
    {
        Self::from_sorted(
            self.observations
                .iter()
                .filter(|observation| predicate(observation))
                .cloned()
                .collect(),
        )
    }

    /// Chronologically earliest observation
    ///
    /// In an index produced by an extreme query every entry shares the
    /// extreme value, so this is also how the value is read back.
    pub fn first(&self) -> Option<&Arc<Observation>> {
        self.observations.first()
    }

    /// Chronologically latest observation
    pub fn last(&self) -> Option<&Arc<Observation>> {
        self.observations.last()
    }

    /// First and last recorded dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => Some((first.date(), last.date())),
            _ => None,
        }
    }

    /// Distinct years with observations, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.observations.iter().map(|o| o.year()).collect();
        years.dedup();
        years
    }
}

impl<'a> IntoIterator for &'a ObservationIndex {
    type Item = &'a Arc<Observation>;
    type IntoIter = std::slice::Iter<'a, Arc<Observation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
