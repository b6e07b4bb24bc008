//! Shared test utilities and fixtures for observation index tests

use crate::app::models::Observation;
use crate::app::services::observation_index::ObservationIndex;
use crate::constants::{precipitation, temperature};


/// Create a test observation with every reading present
pub fn create_test_observation(
    year: i32,
    month: u32,
    day: u32,
    min_temp: f64,
    max_temp: f64,
    precip: f64,
) -> Observation {
    Observation::new(
        year,
        month,
        day,
        (min_temp + max_temp) / 2.0,
        min_temp,
        max_temp,
        precip,
    )
    .unwrap()
}

/// Create a test observation with no valid readings
pub fn create_missing_observation(year: i32, month: u32, day: u32) -> Observation {
    Observation::new(
        year,
        month,
        day,
        temperature::MISSING,
        temperature::MISSING,
        temperature::MISSING,
        precipitation::MISSING,
    )
    .unwrap()
}

/// Index with observations spread over two years, inserted out of order
pub fn create_test_index() -> ObservationIndex {
    let mut index = ObservationIndex::new();

    for observation in [
        create_test_observation(2010, 3, 15, 1.0, 9.0, 4.2),
        create_test_observation(2009, 12, 31, -8.0, -1.5, 0.0),
        create_test_observation(2010, 1, 10, -12.5, -3.0, 12.0),
        create_test_observation(2010, 3, 1, -2.0, 6.0, 0.4),
        create_test_observation(2009, 7, 14, 12.0, 27.5, 0.0),
        create_test_observation(2010, 1, 11, -12.5, -6.0, 2.2),
    ] {
        index.insert(observation).unwrap();
    }

    index
}
