//! Dataset loading from delimited text
//!
//! Each row carries one observation for one location:
//!
//! ```text
//! name,county,date,mean_temp,min_temp,max_temp,precipitation
//! Blindern,3,2010-01-01,-6.2,-9.0,-3.5,0.0
//! ```
//!
//! Empty reading cells and readings outside the valid range are stored as
//! missing. Locations are created the first time they appear. Rows that
//! cannot be parsed are recorded in [`LoadStats`] and skipped.

use crate::app::models::{Location, Observation, parse_date};
use crate::app::services::location_index::LocationIndex;
use crate::config::DataConfig;
use crate::{Error, Result};
use serde::Deserialize;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub mod stats;

#[cfg(test)]
pub mod tests;

pub use stats::LoadStats;

/// How rows are read and how duplicate dates are treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter, a single ASCII character
    pub delimiter: u8,

    /// Whether the first row is a header row
    pub has_headers: bool,

    /// Skip rows whose location already has an observation for that date;
    /// when false such a row aborts the load
    pub skip_duplicates: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
            skip_duplicates: true,
        }
    }
}

impl From<&DataConfig> for LoadOptions {
    fn from(config: &DataConfig) -> Self {
        Self {
            // Non-ASCII delimiters are rejected by config validation
            delimiter: u8::try_from(config.delimiter).unwrap_or(b','),
            has_headers: config.has_headers,
            skip_duplicates: config.skip_duplicates,
        }
    }
}

/// One data row, in column order
#[derive(Debug, Deserialize)]
struct ObservationRow {
    name: String,
    county: u32,
    date: String,
    mean_temp: Option<f64>,
    min_temp: Option<f64>,
    max_temp: Option<f64>,
    precipitation: Option<f64>,
}

/// What happened to a row that parsed cleanly
enum RowOutcome {
    Added { new_location: bool },
    Duplicate,
}

/// Load a dataset file into a new location index
///
/// # Errors
/// * Returns `Error::Csv` if the file cannot be opened or read
/// * Returns `Error::DuplicateKey` for a repeated date when duplicates are
///   not skipped
pub fn load_from_path(path: &Path, options: &LoadOptions) -> Result<(LocationIndex, LoadStats)> {
    info!("Loading observations from {}", path.display());

    let reader = csv_reader(options).from_path(path).map_err(|e| {
        Error::csv(
            path.display().to_string(),
            "Failed to open CSV file",
            Some(e),
        )
    })?;

    load_records(reader, &path.display().to_string(), options)
}

/// Load a dataset from any reader; `source` names it in messages
pub fn load_from_reader<R: io::Read>(
    reader: R,
    source: &str,
    options: &LoadOptions,
) -> Result<(LocationIndex, LoadStats)> {
    load_records(csv_reader(options).from_reader(reader), source, options)
}

fn csv_reader(options: &LoadOptions) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .trim(csv::Trim::All)
        .comment(Some(b'#'));
    builder
}

fn load_records<R: io::Read>(
    mut reader: csv::Reader<R>,
    source: &str,
    options: &LoadOptions,
) -> Result<(LocationIndex, LoadStats)> {
    let start_time = Instant::now();
    let mut index = LocationIndex::new();
    let mut stats = LoadStats::new();

    let headers = if options.has_headers {
        let headers = reader
            .headers()
            .map_err(|e| Error::csv(source, "Failed to read header row", Some(e)))?;
        Some(headers.clone())
    } else {
        None
    };

    for record in reader.records() {
        stats.rows_read += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(Error::csv(source, "Failed to read row", Some(e)));
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                warn!("{}:{}: unreadable row: {}", source, line, e);
                stats.errors.push(format!("line {}: {}", line, e));
                continue;
            }
        };

        // Physical line in the source, counting comments and quoted newlines
        let line = record.position().map_or(0, |p| p.line());

        let row = match record.deserialize::<ObservationRow>(headers.as_ref()) {
            Ok(row) => row,
            Err(e) => {
                warn!("{}:{}: unreadable row: {}", source, line, e);
                stats.errors.push(format!("line {}: {}", line, e));
                continue;
            }
        };

        match add_row(&mut index, row) {
            Ok(RowOutcome::Added { new_location }) => {
                stats.observations_loaded += 1;
                if new_location {
                    stats.locations_loaded += 1;
                }
            }
            Ok(RowOutcome::Duplicate) if options.skip_duplicates => {
                warn!("{}:{}: duplicate date skipped", source, line);
                stats.duplicates_skipped += 1;
            }
            Ok(RowOutcome::Duplicate) => {
                return Err(Error::duplicate_key(format!(
                    "{}:{}: date already recorded for this location",
                    source, line
                )));
            }
            Err(e) => {
                warn!("{}:{}: {}", source, line, e);
                stats.errors.push(format!("line {}: {}", line, e));
            }
        }
    }

    stats.load_duration = start_time.elapsed();

    info!(
        "Loaded {} observations for {} locations from {} in {:.2}s",
        stats.observations_loaded,
        stats.locations_loaded,
        source,
        stats.load_duration.as_secs_f64()
    );
    if !stats.errors.is_empty() {
        warn!("{} rows rejected while loading {}", stats.errors.len(), source);
    }

    Ok((index, stats))
}

fn add_row(index: &mut LocationIndex, row: ObservationRow) -> Result<RowOutcome> {
    let date = parse_date(&row.date)?;
    let observation = Observation::from_readings(
        date,
        row.mean_temp,
        row.min_temp,
        row.max_temp,
        row.precipitation,
    );

    let (location, new_location) = match index.find_by_name_and_county(&row.name, row.county)? {
        Some(location) => (Arc::clone(location), false),
        None => {
            debug!("New location {} in county {}", row.name, row.county);
            let location = Arc::new(Location::new(row.name.as_str(), row.county)?);
            index.insert(Arc::clone(&location))?;
            (location, true)
        }
    };

    match location.add_observation(observation) {
        Ok(()) => Ok(RowOutcome::Added { new_location }),
        Err(Error::DuplicateKey { .. }) => Ok(RowOutcome::Duplicate),
        Err(e) => Err(e),
    }
}
