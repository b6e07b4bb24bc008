//! Statistics collected while loading a dataset

use serde::Serialize;
use std::time::Duration;

/// Counts and problems from one load
#[derive(Debug, Clone, Serialize)]
pub struct LoadStats {
    /// Data rows read, including rejected ones
    pub rows_read: usize,

    /// Distinct locations created
    pub locations_loaded: usize,

    /// Observations added to the index
    pub observations_loaded: usize,

    /// Rows skipped because their location already had that date
    pub duplicates_skipped: usize,

    /// Time taken to load
    #[serde(serialize_with = "serialize_seconds")]
    pub load_duration: Duration,

    /// One message per rejected row
    pub errors: Vec<String>,
}

impl LoadStats {
    /// Create new empty load statistics
    pub fn new() -> Self {
        Self {
            rows_read: 0,
            locations_loaded: 0,
            observations_loaded: 0,
            duplicates_skipped: 0,
            load_duration: Duration::ZERO,
            errors: Vec::new(),
        }
    }

    /// Rows that produced neither an observation nor a skipped duplicate
    pub fn rows_rejected(&self) -> usize {
        self.errors.len()
    }

    /// Percentage of rows that made it into the index
    pub fn acceptance_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.observations_loaded as f64 / self.rows_read as f64) * 100.0
        }
    }

    /// Observations loaded per second
    pub fn loading_rate(&self) -> f64 {
        if self.load_duration.is_zero() {
            0.0
        } else {
            self.observations_loaded as f64 / self.load_duration.as_secs_f64()
        }
    }
}

impl Default for LoadStats {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_seconds<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
