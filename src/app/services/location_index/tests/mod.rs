//! Shared test utilities and fixtures for location index tests

use crate::app::models::{Location, Observation};
use crate::app::services::location_index::LocationIndex;

pub mod index_tests;

/// Create a test location with the given daily (min, max, precipitation) readings
///
/// Readings are recorded on consecutive days starting at `start`.
pub fn create_test_location(
    name: &str,
    county: u32,
    start: (i32, u32, u32),
    readings: &[(f64, f64, f64)],
) -> Location {
    let location = Location::new(name, county).unwrap();
    let (year, month, day) = start;

    for (offset, &(min, max, precip)) in readings.iter().enumerate() {
        let observation = Observation::new(
            year,
            month,
            day + offset as u32,
            (min + max) / 2.0,
            min,
            max,
            precip,
        )
        .unwrap();
        location.add_observation(observation).unwrap();
    }

    location
}

/// Index with five locations in three counties, two of them named "Springfield"
pub fn create_test_registry() -> LocationIndex {
    let mut index = LocationIndex::new();

    let locations = vec![
        create_test_location(
            "Tromsø",
            19,
            (2010, 1, 1),
            &[(-14.0, -6.0, 3.0), (-18.5, -9.0, 0.0), (-11.0, -2.0, 8.5)],
        ),
        create_test_location(
            "Springfield",
            12,
            (2010, 1, 1),
            &[(-2.0, 4.0, 22.0), (0.5, 6.5, 41.0), (-1.0, 3.0, 17.5)],
        ),
        create_test_location(
            "Blindern",
            3,
            (2010, 1, 1),
            &[(-9.0, -3.5, 0.0), (-18.5, -8.0, 1.5), (-12.0, -4.0, 0.0)],
        ),
        create_test_location(
            "Springfield",
            3,
            (2010, 1, 2),
            &[(-6.0, 1.0, 2.0), (-7.5, 0.0, 4.0)],
        ),
        create_test_location("Bergen", 12, (2010, 7, 1), &[(11.0, 19.0, 12.0)]),
    ];

    for location in locations {
        index.insert(location).unwrap();
    }

    index
}
