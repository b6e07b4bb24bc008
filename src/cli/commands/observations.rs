//! Day, date and period commands: raw observations

use super::shared::{
    OBSERVATION_COLUMNS, OutputSettings, county_label, find_place, observation_cells,
    observation_json, observation_table, to_csv, to_json,
};
use crate::Result;
use crate::app::services::location_index::LocationIndex;
use crate::cli::args::{DateArgs, DayArgs, OutputFormat, PeriodArgs};
use colored::*;
use serde_json::json;
use tracing::debug;

/// Show one place's observation on one date
pub fn run_day(args: &DayArgs, index: &LocationIndex, output: &OutputSettings) -> Result<String> {
    let place = find_place(index, &args.place.name, args.place.county)?;
    let recorded = place.observations();
    let observation = recorded.find(args.date);
    debug!("Day lookup for {} on {}: found = {}", place, args.date, observation.is_some());

    match output.format {
        OutputFormat::Human => Ok(match observation {
            Some(observation) => format!(
                "{} {}\n{}",
                place.to_string().bright_green().bold(),
                args.date,
                observation_table([observation], output)
            ),
            None => format!(
                "{} {} {}\n",
                "No observation for".bright_yellow(),
                place,
                args.date
            ),
        }),
        OutputFormat::Json => to_json(&json!({
            "location": place,
            "date": args.date.to_string(),
            "observation": observation.map(|o| observation_json(o)),
        })),
        OutputFormat::Csv => to_csv(
            &OBSERVATION_COLUMNS,
            observation.map(|o| observation_cells(o, output)),
        ),
    }
}

/// Show what every place recorded on one date
pub fn run_date(args: &DateArgs, index: &LocationIndex, output: &OutputSettings) -> Result<String> {
    let found = index.observations_on(args.date, args.county);
    debug!("{} places recorded {}", found.len(), args.date);

    match output.format {
        OutputFormat::Human => {
            let scope = match args.county {
                Some(county) => format!("county {}", county_label(county)),
                None => "all counties".to_string(),
            };
            let mut text = format!(
                "{} {}, {}: {} places\n",
                "Observations on".bright_green().bold(),
                args.date,
                scope,
                found.len().to_string().bright_white().bold()
            );
            for entry in &found {
                text.push_str(&format!(
                    "  {:<24} {:>8} {:>8} {:>8} {:>9}\n",
                    entry.location.to_string(),
                    output.reading(entry.observation.mean_temperature()),
                    output.reading(entry.observation.min_temperature()),
                    output.reading(entry.observation.max_temperature()),
                    output.reading(entry.observation.precipitation())
                ));
            }
            Ok(text)
        }
        OutputFormat::Json => to_json(&json!({
            "date": args.date.to_string(),
            "county": args.county,
            "observations": found
                .iter()
                .map(|entry| json!({
                    "location": entry.location,
                    "observation": observation_json(&entry.observation),
                }))
                .collect::<Vec<_>>(),
        })),
        OutputFormat::Csv => {
            let mut header = vec!["name", "county"];
            header.extend(OBSERVATION_COLUMNS);
            to_csv(
                &header,
                found.iter().map(|entry| {
                    let mut row = vec![
                        entry.location.name().to_string(),
                        entry.location.county().to_string(),
                    ];
                    row.extend(observation_cells(&entry.observation, output));
                    row
                }),
            )
        }
    }
}

/// List one place's observations for a year or a month
pub fn run_period(args: &PeriodArgs, index: &LocationIndex, output: &OutputSettings) -> Result<String> {
    let period = args.period()?;
    let place = find_place(index, &args.place.name, args.place.county)?;
    let observations = period.select(&place.observations())?;

    match output.format {
        OutputFormat::Human => {
            let heading = format!(
                "{} {}: {} observations\n",
                place.to_string().bright_green().bold(),
                period,
                observations.len().to_string().bright_white().bold()
            );
            if observations.is_empty() {
                Ok(heading)
            } else {
                Ok(heading + &observation_table(&observations, output))
            }
        }
        OutputFormat::Json => to_json(&json!({
            "location": place,
            "period": period.to_string(),
            "observations": observations.iter().map(|o| observation_json(o)).collect::<Vec<_>>(),
        })),
        OutputFormat::Csv => to_csv(
            &OBSERVATION_COLUMNS,
            observations.iter().map(|o| observation_cells(o, output)),
        ),
    }
}
