//! Integration tests: load a dataset file and query it end to end
//!
//! The dataset is written to a temporary directory so the tests run without
//! any external data.

use chrono::NaiveDate;
use clap::Parser;
use std::fs;
use tempfile::TempDir;
use weather_index::app::models::{Extremum, Measure, TemperatureKind};
use weather_index::app::services::loader::{LoadOptions, load_from_path};
use weather_index::app::services::location_index::{ExtremeQuery, Period, Scope};
use weather_index::cli::args::Args;
use weather_index::cli::commands::{self, OutputSettings, shared};

const DATASET: &str = "\
# Daily observations, three places in two counties
name,county,date,mean_temp,min_temp,max_temp,precipitation
Blindern,3,2009-12-31,-4.0,-7.0,-1.0,2.0
Blindern,3,2010-01-01,-6.2,-9.0,-3.5,0.0
Blindern,3,2010-01-02,-13.0,-18.5,-8.0,1.5
Blindern,3,2010-02-01,-8.0,-12.0,-4.0,
Springfield,3,2010-01-01,-5.0,-8.0,-2.0,4.0
Springfield,3,2010-01-02,-12.0,-18.5,-6.0,6.0
Springfield,12,2010-01-01,2.0,-1.0,5.0,22.0
Springfield,12,2010-01-02,3.5,0.5,6.5,41.0
Springfield,12,2010-01-02,9.0,8.0,10.0,0.0
Springfield,12,2010-01-03,,,,-999
";

fn write_dataset(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("observations.csv");
    fs::write(&path, DATASET).unwrap();
    path
}

#[test]
fn test_load_and_query_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_dataset(&temp_dir);

    let (index, stats) = load_from_path(&path, &LoadOptions::default()).unwrap();

    assert_eq!(stats.rows_read, 10);
    assert_eq!(stats.locations_loaded, 3);
    assert_eq!(stats.observations_loaded, 9);
    assert_eq!(stats.duplicates_skipped, 1);
    assert!(stats.errors.is_empty());

    // Same name, different counties
    let oslo = index.find_by_name_and_county("Springfield", 3).unwrap().unwrap();
    let hordaland = index.find_by_name_and_county("Springfield", 12).unwrap().unwrap();
    assert_eq!(oslo.observations().len(), 2);
    assert_eq!(hordaland.observations().len(), 3);
    assert!(index.find_by_name_and_county("springfield", 3).unwrap().is_none());

    // Year and month filters
    let blindern = index.find_by_name_and_county("Blindern", 3).unwrap().unwrap();
    assert_eq!(blindern.observations().filter_by_year(2010).len(), 3);
    let january = blindern.observations().filter_by_year_month(2010, 1).unwrap();
    assert_eq!(january.len(), 2);
    assert_eq!(january.average_temperature(TemperatureKind::Min), Some(-13.75));

    // A row with no valid readings is kept but contributes nothing
    let hordaland_days = hordaland.observations();
    let empty_day = hordaland_days.find_by_date(2010, 1, 3).unwrap().unwrap();
    assert!(empty_day.is_empty());
    assert_eq!(hordaland_days.average_precipitation(), Some(31.5));
}

#[test]
fn test_cross_location_extremes() {
    let temp_dir = TempDir::new().unwrap();
    let (index, _) = load_from_path(&write_dataset(&temp_dir), &LoadOptions::default()).unwrap();

    let coldest = index
        .extreme_readings(&ExtremeQuery {
            scope: Scope::County(3),
            period: Period::Year(2010),
            measure: Measure::MinTemperature,
            extremum: Extremum::Lowest,
        })
        .unwrap();

    assert_eq!(coldest.len(), 2);
    assert!(
        coldest
            .iter()
            .all(|hit| hit.observation.date() == NaiveDate::from_ymd_opt(2010, 1, 2).unwrap())
    );

    let wettest = index
        .extreme_averages(&ExtremeQuery {
            scope: Scope::All,
            period: Period::month(2010, 1).unwrap(),
            measure: Measure::Precipitation,
            extremum: Extremum::Highest,
        })
        .unwrap();

    assert_eq!(wettest.len(), 1);
    assert_eq!(wettest[0].location.county(), 12);
    assert_eq!(wettest[0].average, 31.5);
}

#[test]
fn test_cli_pipeline_csv_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_dataset(&temp_dir);

    let args = Args::try_parse_from([
        "weather-index",
        "--data",
        path.to_str().unwrap(),
        "--format",
        "csv",
        "period",
        "--name",
        "Blindern",
        "--county",
        "3",
        "--year",
        "2010",
        "--month",
        "1",
    ])
    .unwrap();

    let config = shared::load_configuration(&args).unwrap();
    let (index, _) = shared::load_index(&config).unwrap();
    let output = OutputSettings::resolve(&args, &config);

    let csv = commands::execute(&args.command, &index, &output).unwrap();
    assert_eq!(
        csv,
        "date,mean_temp,min_temp,max_temp,precipitation\n\
         2010-01-01,-6.2,-9.0,-3.5,0.0\n\
         2010-01-02,-13.0,-18.5,-8.0,1.5\n"
    );
}

#[test]
fn test_config_file_controls_loading() {
    let temp_dir = TempDir::new().unwrap();
    let data_path = temp_dir.path().join("observations.ssv");
    fs::write(&data_path, "Bergen;12;2010-07-01;15.0;11.0;19.0;12.0\n").unwrap();

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[data]\npath = {:?}\ndelimiter = \";\"\nhas_headers = false\n\n[output]\nformat = \"json\"\n",
            data_path.to_str().unwrap()
        ),
    )
    .unwrap();

    let args = Args::try_parse_from([
        "weather-index",
        "--config",
        config_path.to_str().unwrap(),
        "locations",
    ])
    .unwrap();

    let config = shared::load_configuration(&args).unwrap();
    let (index, _) = shared::load_index(&config).unwrap();
    let output = OutputSettings::resolve(&args, &config);

    let json = commands::execute(&args.command, &index, &output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["counties"][0]["locations"][0], "Bergen");
}

#[test]
fn test_missing_dataset_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let args = Args::try_parse_from([
        "weather-index",
        "--data",
        temp_dir.path().join("absent.csv").to_str().unwrap(),
        "locations",
    ])
    .unwrap();

    let config = shared::load_configuration(&args).unwrap();
    let result = shared::load_index(&config);

    assert!(matches!(result, Err(weather_index::Error::Configuration { .. })));
}
