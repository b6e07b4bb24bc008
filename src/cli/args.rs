//! Command-line argument definitions for the weather index
//!
//! This module defines the CLI interface using the clap derive API. Global
//! flags select the dataset, configuration and output format; each subcommand
//! runs one kind of query against the loaded index.

use crate::app::models::{Extremum, Measure, parse_date};
use crate::app::services::location_index::{ExtremeQuery, Period, Scope};
use crate::constants::FIRST_YEAR;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// CLI arguments for the weather index
#[derive(Debug, Clone, Parser)]
#[command(
    name = "weather-index",
    version,
    about = "Query historical weather observations by place, date and period",
    long_about = "Loads daily weather observations for named places and answers exact-date, \
                  monthly and yearly queries, averages and extreme values. Extreme queries can \
                  cover every place, one county or a single place."
)]
pub struct Args {
    /// Dataset file (CSV: name,county,date,mean_temp,min_temp,max_temp,precipitation)
    ///
    /// Overrides the configured path and the WEATHER_INDEX_DATA environment variable.
    #[arg(short = 'd', long = "data", value_name = "FILE", global = true)]
    pub data: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/weather-index/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format, overriding the configured one
    #[arg(short = 'f', long = "format", value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress log output except errors"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List counties and the places in them
    Locations(LocationsArgs),
    /// Show the observation for one place on one date
    Day(DayArgs),
    /// Show every place's observation on one date, optionally within a county
    Date(DateArgs),
    /// List a place's observations for a year or a month
    Period(PeriodArgs),
    /// Averages and extremes for a place, optionally within a year or month
    Summary(SummaryArgs),
    /// Find extreme readings or averages across places
    Extremes(ExtremesArgs),
}

/// A place, identified by name and county code
#[derive(Debug, Clone, Parser)]
pub struct PlaceArgs {
    /// Place name (case-sensitive)
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: String,

    /// County code
    #[arg(short = 'C', long = "county", value_name = "CODE")]
    pub county: u32,
}

#[derive(Debug, Clone, Parser)]
pub struct LocationsArgs {
    /// Only list places in this county
    #[arg(short = 'C', long = "county", value_name = "CODE")]
    pub county: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub struct DayArgs {
    #[command(flatten)]
    pub place: PlaceArgs,

    /// Date as YYYY-MM-DD
    #[arg(long = "date", value_name = "DATE", value_parser = parse_date_arg)]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Parser)]
pub struct DateArgs {
    /// Date as YYYY-MM-DD
    #[arg(long = "date", value_name = "DATE", value_parser = parse_date_arg)]
    pub date: NaiveDate,

    /// Only show places in this county
    #[arg(short = 'C', long = "county", value_name = "CODE")]
    pub county: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub struct PeriodArgs {
    #[command(flatten)]
    pub place: PlaceArgs,

    #[arg(short = 'y', long = "year", value_name = "YEAR")]
    pub year: i32,

    /// Month of the year, 1-12
    #[arg(short = 'm', long = "month", value_name = "MONTH")]
    pub month: Option<u32>,
}

#[derive(Debug, Clone, Parser)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub place: PlaceArgs,

    /// Restrict the summary to one year
    #[arg(short = 'y', long = "year", value_name = "YEAR")]
    pub year: Option<i32>,

    /// Restrict the summary to one month of the year
    #[arg(short = 'm', long = "month", value_name = "MONTH", requires = "year")]
    pub month: Option<u32>,
}

/// Arguments for cross-place extreme queries
#[derive(Debug, Clone, Parser)]
#[command(group(ArgGroup::new("extremum").required(true).args(["lowest", "highest"])))]
#[command(group(ArgGroup::new("period").required(true).args(["date", "year"])))]
pub struct ExtremesArgs {
    /// Reading to compare: precipitation, min-temperature or max-temperature
    #[arg(long = "measure", value_name = "MEASURE")]
    pub measure: Measure,

    /// Look for the lowest value
    #[arg(long = "lowest")]
    pub lowest: bool,

    /// Look for the highest value
    #[arg(long = "highest")]
    pub highest: bool,

    /// Limit the search to one county
    #[arg(short = 'C', long = "county", value_name = "CODE")]
    pub county: Option<u32>,

    /// Limit the search to one place (needs --county)
    #[arg(short = 'n', long = "name", value_name = "NAME", requires = "county")]
    pub name: Option<String>,

    /// A single day, YYYY-MM-DD
    #[arg(long = "date", value_name = "DATE", value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    #[arg(short = 'y', long = "year", value_name = "YEAR")]
    pub year: Option<i32>,

    #[arg(short = 'm', long = "month", value_name = "MONTH", requires = "year")]
    pub month: Option<u32>,

    /// Compare per-place averages over the period instead of single readings
    #[arg(long = "average", conflicts_with = "date")]
    pub average: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

fn parse_date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

fn validate_year(year: i32) -> Result<()> {
    if year < FIRST_YEAR {
        return Err(Error::invalid_argument(format!(
            "Year {} is before the earliest supported year {}",
            year, FIRST_YEAR
        )));
    }
    Ok(())
}

/// Build a month or year period from optional CLI values
fn period_from(year: i32, month: Option<u32>) -> Result<Period> {
    validate_year(year)?;
    match month {
        Some(month) => Period::month(year, month),
        None => Ok(Period::Year(year)),
    }
}

impl Args {
    /// Determine the log level from verbosity flags, falling back to `configured`
    pub fn log_level(&self, configured: &str) -> String {
        if self.quiet {
            return "error".to_string();
        }
        match self.verbose {
            0 => configured.to_lowercase(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

impl PeriodArgs {
    pub fn period(&self) -> Result<Period> {
        period_from(self.year, self.month)
    }
}

impl SummaryArgs {
    /// The requested period, or `None` for the whole record
    pub fn period(&self) -> Result<Option<Period>> {
        self.year
            .map(|year| period_from(year, self.month))
            .transpose()
    }
}

impl ExtremesArgs {
    pub fn extremum(&self) -> Extremum {
        if self.lowest {
            Extremum::Lowest
        } else {
            Extremum::Highest
        }
    }

    pub fn scope(&self) -> Scope {
        match (&self.name, self.county) {
            (Some(name), Some(county)) => Scope::Location {
                name: name.clone(),
                county,
            },
            (_, Some(county)) => Scope::County(county),
            _ => Scope::All,
        }
    }

    pub fn period(&self) -> Result<Period> {
        match (self.date, self.year) {
            (Some(date), _) => {
                validate_year(date.year())?;
                Ok(Period::Day(date))
            }
            (None, Some(year)) => period_from(year, self.month),
            (None, None) => Err(Error::invalid_argument(
                "Either --date or --year must be given",
            )),
        }
    }

    /// Assemble the query described by these arguments
    pub fn to_query(&self) -> Result<ExtremeQuery> {
        Ok(ExtremeQuery {
            scope: self.scope(),
            period: self.period()?,
            measure: self.measure,
            extremum: self.extremum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&[
            "weather-index",
            "locations",
            "--county",
            "3",
            "--format",
            "json",
            "-vv",
        ]);

        assert_eq!(args.format, Some(OutputFormat::Json));
        assert_eq!(args.verbose, 2);
        match args.command {
            Commands::Locations(locations) => assert_eq!(locations.county, Some(3)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_day_command_parses_date() {
        let args = parse(&[
            "weather-index",
            "day",
            "--name",
            "Blindern",
            "--county",
            "3",
            "--date",
            "2010-01-02",
        ]);

        let Commands::Day(day) = args.command else {
            panic!("expected day command");
        };
        assert_eq!(day.place.name, "Blindern");
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2010, 1, 2).unwrap());

        let bad = Args::try_parse_from([
            "weather-index", "day", "--name", "Blindern", "--county", "3", "--date", "2010-13-02",
        ]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_date_command_county_is_optional() {
        let args = parse(&["weather-index", "date", "--date", "2010-01-02"]);
        let Commands::Date(date) = args.command else {
            panic!("expected date command");
        };
        assert_eq!(date.county, None);

        let args = parse(&["weather-index", "date", "--date", "2010-01-02", "-C", "12"]);
        let Commands::Date(date) = args.command else {
            panic!("expected date command");
        };
        assert_eq!(date.county, Some(12));

        assert!(Args::try_parse_from(["weather-index", "date", "-C", "12"]).is_err());
    }

    #[test]
    fn test_period_validation() {
        let args = parse(&[
            "weather-index", "period", "-n", "Bergen", "-C", "12", "-y", "2010", "-m", "7",
        ]);
        let Commands::Period(period) = args.command else {
            panic!("expected period command");
        };
        assert_eq!(
            period.period().unwrap(),
            Period::Month {
                year: 2010,
                month: 7
            }
        );

        let mut invalid = period.clone();
        invalid.month = Some(13);
        assert!(invalid.period().is_err());

        invalid.month = None;
        invalid.year = 1850;
        assert!(invalid.period().is_err());
    }

    #[test]
    fn test_summary_month_requires_year() {
        let result = Args::try_parse_from([
            "weather-index", "summary", "-n", "Bergen", "-C", "12", "-m", "7",
        ]);
        assert!(result.is_err());

        let args = parse(&["weather-index", "summary", "-n", "Bergen", "-C", "12"]);
        let Commands::Summary(summary) = args.command else {
            panic!("expected summary command");
        };
        assert_eq!(summary.period().unwrap(), None);
    }

    #[test]
    fn test_extremes_query() {
        let args = parse(&[
            "weather-index",
            "extremes",
            "--measure",
            "min-temp",
            "--lowest",
            "--county",
            "19",
            "--year",
            "2010",
            "--month",
            "1",
        ]);
        let Commands::Extremes(extremes) = args.command else {
            panic!("expected extremes command");
        };

        let query = extremes.to_query().unwrap();
        assert_eq!(query.scope, Scope::County(19));
        assert_eq!(
            query.period,
            Period::Month {
                year: 2010,
                month: 1
            }
        );
        assert_eq!(query.measure, Measure::MinTemperature);
        assert_eq!(query.extremum, Extremum::Lowest);
    }

    #[test]
    fn test_extremes_argument_groups() {
        // Needs exactly one of --lowest / --highest
        assert!(
            Args::try_parse_from(["weather-index", "extremes", "--measure", "rain", "--year", "2010"])
                .is_err()
        );
        assert!(
            Args::try_parse_from([
                "weather-index", "extremes", "--measure", "rain", "--lowest", "--highest",
                "--year", "2010",
            ])
            .is_err()
        );

        // Needs a period
        assert!(
            Args::try_parse_from(["weather-index", "extremes", "--measure", "rain", "--highest"])
                .is_err()
        );

        // Averages over a single day are rejected
        assert!(
            Args::try_parse_from([
                "weather-index", "extremes", "--measure", "rain", "--highest", "--date",
                "2010-01-01", "--average",
            ])
            .is_err()
        );

        // A place needs its county
        assert!(
            Args::try_parse_from([
                "weather-index", "extremes", "--measure", "rain", "--highest", "--year", "2010",
                "--name", "Bergen",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_extremes_scope_for_single_place() {
        let args = parse(&[
            "weather-index", "extremes", "--measure", "max", "--highest", "--date", "2010-07-01",
            "--name", "Bergen", "--county", "12",
        ]);
        let Commands::Extremes(extremes) = args.command else {
            panic!("expected extremes command");
        };

        assert_eq!(
            extremes.scope(),
            Scope::Location {
                name: "Bergen".to_string(),
                county: 12
            }
        );
        assert!(matches!(extremes.period().unwrap(), Period::Day(_)));
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["weather-index", "locations"]);

        assert_eq!(args.log_level("WARN"), "warn");

        args.verbose = 1;
        assert_eq!(args.log_level("warn"), "info");

        args.verbose = 2;
        assert_eq!(args.log_level("warn"), "debug");

        args.verbose = 3;
        assert_eq!(args.log_level("warn"), "trace");

        args.quiet = true;
        assert_eq!(args.log_level("warn"), "error");
    }
}
