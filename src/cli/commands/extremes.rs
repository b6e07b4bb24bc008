//! Extremes command: extreme readings or averages across places

use super::shared::{OutputSettings, county_label, find_place, to_csv, to_json};
use crate::Result;
use crate::app::models::Extremum;
use crate::app::services::location_index::{
    ExtremeQuery, LocationAverage, LocationIndex, LocationObservation, Scope,
};
use crate::cli::args::{ExtremesArgs, OutputFormat};
use colored::*;
use serde_json::json;
use tracing::info;

pub fn run_extremes(args: &ExtremesArgs, index: &LocationIndex, output: &OutputSettings) -> Result<String> {
    let query = args.to_query()?;

    // A named place must exist; an empty county simply has no results
    if let Scope::Location { name, county } = &query.scope {
        find_place(index, name, *county)?;
    }

    if args.average {
        let averages = index.extreme_averages(&query)?;
        info!("{} locations tied at the extreme average", averages.len());
        render_averages(&query, &averages, output)
    } else {
        let hits = index.extreme_readings(&query)?;
        info!("{} readings tied at the extreme", hits.len());
        render_readings(&query, &hits, output)
    }
}

/// Heading such as "Lowest min-temperature in county 19 (Troms), 2010-01"
fn describe_query(query: &ExtremeQuery, average: bool) -> String {
    let extremum = match query.extremum {
        Extremum::Lowest => "Lowest",
        Extremum::Highest => "Highest",
    };
    let scope = match &query.scope {
        Scope::All => "all locations".to_string(),
        Scope::County(county) => format!("county {}", county_label(*county)),
        Scope::Location { name, county } => format!("{} in county {}", name, county_label(*county)),
    };
    let kind = if average { "average " } else { "" };
    format!("{} {}{} in {}, {}", extremum, kind, query.measure, scope, query.period)
}

fn render_readings(
    query: &ExtremeQuery,
    hits: &[LocationObservation],
    output: &OutputSettings,
) -> Result<String> {
    let value = hits.first().and_then(|hit| hit.observation.reading(query.measure));

    match output.format {
        OutputFormat::Human => {
            let mut text = format!("{}\n", describe_query(query, false).bright_green().bold());
            match value {
                Some(value) => {
                    text.push_str(&format!(
                        "  {} {} {}\n",
                        "Value:".bright_cyan(),
                        output.reading(Some(value)).bright_white().bold(),
                        query.measure.unit()
                    ));
                    for hit in hits {
                        text.push_str(&format!("  {}  {}\n", hit.observation.date(), hit.location));
                    }
                }
                None => text.push_str(&format!("  {}\n", "No valid readings".bright_yellow())),
            }
            Ok(text)
        }
        OutputFormat::Json => to_json(&json!({
            "query": describe_query(query, false),
            "measure": query.measure,
            "extremum": query.extremum,
            "value": value,
            "readings": hits
                .iter()
                .map(|hit| json!({
                    "name": hit.location.name(),
                    "county": hit.location.county(),
                    "date": hit.observation.date().to_string(),
                }))
                .collect::<Vec<_>>(),
        })),
        OutputFormat::Csv => to_csv(
            &["name", "county", "date", "value"],
            hits.iter().map(|hit| {
                vec![
                    hit.location.name().to_string(),
                    hit.location.county().to_string(),
                    hit.observation.date().to_string(),
                    output.cell(hit.observation.reading(query.measure)),
                ]
            }),
        ),
    }
}

fn render_averages(
    query: &ExtremeQuery,
    averages: &[LocationAverage],
    output: &OutputSettings,
) -> Result<String> {
    match output.format {
        OutputFormat::Human => {
            let mut text = format!("{}\n", describe_query(query, true).bright_green().bold());
            if averages.is_empty() {
                text.push_str(&format!("  {}\n", "No valid readings".bright_yellow()));
            }
            for entry in averages {
                text.push_str(&format!(
                    "  {} {}  {} ({} readings)\n",
                    output.reading(Some(entry.average)).bright_white().bold(),
                    query.measure.unit(),
                    entry.location,
                    entry.readings
                ));
            }
            Ok(text)
        }
        OutputFormat::Json => to_json(&json!({
            "query": describe_query(query, true),
            "measure": query.measure,
            "extremum": query.extremum,
            "locations": averages,
        })),
        OutputFormat::Csv => to_csv(
            &["name", "county", "average", "readings"],
            averages.iter().map(|entry| {
                vec![
                    entry.location.name().to_string(),
                    entry.location.county().to_string(),
                    output.cell(Some(entry.average)),
                    entry.readings.to_string(),
                ]
            }),
        ),
    }
}
