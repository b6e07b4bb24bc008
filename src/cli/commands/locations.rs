//! Locations command: counties and the places in them

use super::shared::{OutputSettings, county_label, to_csv, to_json};
use crate::Result;
use crate::app::services::location_index::LocationIndex;
use crate::cli::args::{LocationsArgs, OutputFormat};
use crate::constants::counties;
use colored::*;
use serde_json::json;

pub fn run_locations(
    args: &LocationsArgs,
    index: &LocationIndex,
    output: &OutputSettings,
) -> Result<String> {
    let listing: Vec<(u32, Vec<String>)> = match args.county {
        Some(county) => vec![(county, index.names_in_county(county))],
        None => index
            .counties()
            .into_iter()
            .map(|county| (county, index.names_in_county(county)))
            .collect(),
    };

    match output.format {
        OutputFormat::Human => Ok(render_human(&listing)),
        OutputFormat::Json => {
            let counties: Vec<_> = listing
                .iter()
                .map(|(county, names)| {
                    json!({
                        "county": county,
                        "county_name": counties::name(*county),
                        "locations": names,
                    })
                })
                .collect();
            to_json(&json!({ "counties": counties }))
        }
        OutputFormat::Csv => to_csv(
            &["county", "county_name", "name"],
            listing.iter().flat_map(|(county, names)| {
                names.iter().map(move |name| {
                    vec![
                        county.to_string(),
                        counties::name(*county).unwrap_or_default().to_string(),
                        name.clone(),
                    ]
                })
            }),
        ),
    }
}

fn render_human(listing: &[(u32, Vec<String>)]) -> String {
    let total: usize = listing.iter().map(|(_, names)| names.len()).sum();
    let mut output = format!(
        "{} {}\n",
        "Locations:".bright_green().bold(),
        total.to_string().bright_white().bold()
    );

    for (county, names) in listing {
        output.push_str(&format!(
            "\n{} {}\n",
            "County".bright_cyan(),
            county_label(*county).bright_cyan()
        ));
        if names.is_empty() {
            output.push_str(&format!("  {}\n", "(no locations)".dimmed()));
        }
        for name in names {
            output.push_str(&format!("  {}\n", name));
        }
    }
    output
}
