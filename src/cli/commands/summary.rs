//! Summary command: averages and extremes for one place

use super::shared::{OutputSettings, find_place, to_csv, to_json};
use crate::Result;
use crate::app::services::location_index::LocationIndex;
use crate::app::services::observation_index::{ExtremeSummary, PeriodSummary};
use crate::cli::args::{OutputFormat, SummaryArgs};
use colored::*;
use serde_json::json;

pub fn run_summary(args: &SummaryArgs, index: &LocationIndex, output: &OutputSettings) -> Result<String> {
    let period = args.period()?;
    let place = find_place(index, &args.place.name, args.place.county)?;

    let summary = match &period {
        Some(period) => period.select(&place.observations())?.summary(),
        None => place.observations().summary(),
    };
    let period_label = period
        .map(|period| period.to_string())
        .unwrap_or_else(|| "all records".to_string());

    match output.format {
        OutputFormat::Human => Ok(render_human(
            &format!("{}, {}", place, period_label),
            &summary,
            output,
        )),
        OutputFormat::Json => to_json(&json!({
            "location": place,
            "period": period_label,
            "summary": summary,
        })),
        OutputFormat::Csv => to_csv(&["statistic", "value", "dates"], csv_rows(&summary, output)),
    }
}

fn render_human(heading: &str, summary: &PeriodSummary, output: &OutputSettings) -> String {
    let mut text = format!("{}\n", heading.bright_green().bold());

    let span = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!(" ({} to {})", first, last),
        _ => String::new(),
    };
    text.push_str(&format!(
        "  {} {}{}\n",
        "Observations:".bright_cyan(),
        summary.observation_count.to_string().bright_white(),
        span
    ));

    let averages = [
        ("Mean temperature:", summary.mean_temperature, "°C"),
        ("Mean minimum:", summary.mean_min_temperature, "°C"),
        ("Mean maximum:", summary.mean_max_temperature, "°C"),
        ("Mean precipitation:", summary.mean_precipitation, "mm"),
        ("Total precipitation:", summary.total_precipitation, "mm"),
    ];
    for (label, value, unit) in averages {
        text.push_str(&format!(
            "  {:<22} {}\n",
            label.bright_cyan(),
            with_unit(output.reading(value), value.is_some(), unit)
        ));
    }

    let extremes = [
        ("Lowest temperature:", &summary.lowest_temperature, "°C"),
        ("Highest temperature:", &summary.highest_temperature, "°C"),
        ("Lowest precipitation:", &summary.lowest_precipitation, "mm"),
        ("Highest precipitation:", &summary.highest_precipitation, "mm"),
    ];
    for (label, extreme, unit) in extremes {
        let line = match extreme {
            Some(extreme) => format!(
                "{:.*} {} on {}",
                output.decimals,
                extreme.value,
                unit,
                describe_dates(extreme)
            ),
            None => "-".to_string(),
        };
        text.push_str(&format!("  {:<22} {}\n", label.bright_cyan(), line));
    }

    text
}

fn with_unit(reading: String, present: bool, unit: &str) -> String {
    if present {
        format!("{} {}", reading, unit)
    } else {
        reading
    }
}

/// First few dates of an extreme, with a count of the rest
fn describe_dates(extreme: &ExtremeSummary) -> String {
    const SHOWN: usize = 3;

    let mut dates: Vec<String> = extreme
        .dates
        .iter()
        .take(SHOWN)
        .map(|date| date.to_string())
        .collect();
    if extreme.dates.len() > SHOWN {
        dates.push(format!("{} more", extreme.dates.len() - SHOWN));
    }
    dates.join(", ")
}

fn csv_rows(summary: &PeriodSummary, output: &OutputSettings) -> Vec<Vec<String>> {
    let plain = |name: &str, value: Option<f64>| vec![name.to_string(), output.cell(value), String::new()];
    let extreme = |name: &str, extreme: &Option<ExtremeSummary>| match extreme {
        Some(extreme) => vec![
            name.to_string(),
            output.cell(Some(extreme.value)),
            extreme
                .dates
                .iter()
                .map(|date| date.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        ],
        None => vec![name.to_string(), String::new(), String::new()],
    };

    vec![
        vec![
            "observation_count".to_string(),
            summary.observation_count.to_string(),
            String::new(),
        ],
        plain("mean_temperature", summary.mean_temperature),
        plain("mean_min_temperature", summary.mean_min_temperature),
        plain("mean_max_temperature", summary.mean_max_temperature),
        extreme("lowest_temperature", &summary.lowest_temperature),
        extreme("highest_temperature", &summary.highest_temperature),
        plain("mean_precipitation", summary.mean_precipitation),
        plain("total_precipitation", summary.total_precipitation),
        extreme("lowest_precipitation", &summary.lowest_precipitation),
        extreme("highest_precipitation", &summary.highest_precipitation),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Location, Observation};
    use crate::cli::args::PlaceArgs;

    fn create_test_index() -> LocationIndex {
        let bergen = Location::new("Bergen", 12).unwrap();
        for (year, day, min, max, precip) in [
            (2009, 1, 1.0, 5.0, 30.0),
            (2010, 1, -2.0, 4.0, 12.0),
            (2010, 2, -2.0, 6.0, 30.0),
            (2010, 3, 0.0, 3.0, -1.0),
        ] {
            let mean = (min + max) / 2.0;
            bergen
                .add_observation(Observation::new(year, 1, day, mean, min, max, precip).unwrap())
                .unwrap();
        }

        let mut index = LocationIndex::new();
        index.insert(bergen).unwrap();
        index
    }

    fn args(year: Option<i32>) -> SummaryArgs {
        SummaryArgs {
            place: PlaceArgs {
                name: "Bergen".to_string(),
                county: 12,
            },
            year,
            month: None,
        }
    }

    #[test]
    fn test_summary_json_for_year() {
        let output = OutputSettings {
            format: OutputFormat::Json,
            ..OutputSettings::default()
        };
        let json = run_summary(&args(Some(2010)), &create_test_index(), &output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let summary = &value["summary"];
        assert_eq!(summary["observation_count"], 3);
        assert_eq!(summary["lowest_temperature"]["value"], -2.0);
        assert_eq!(summary["lowest_temperature"]["dates"].as_array().unwrap().len(), 2);
        assert_eq!(summary["mean_precipitation"], 21.0);
    }

    #[test]
    fn test_summary_csv_whole_record() {
        let output = OutputSettings {
            format: OutputFormat::Csv,
            decimals: 1,
        };
        let csv = run_summary(&args(None), &create_test_index(), &output).unwrap();

        assert!(csv.starts_with("statistic,value,dates\nobservation_count,4,\n"));
        assert!(csv.contains("highest_precipitation,30.0,2009-01-01 2010-01-02\n"));
        assert!(csv.contains("total_precipitation,72.0,\n"));
    }

    #[test]
    fn test_summary_human_without_data() {
        let output = OutputSettings::default();
        let text = run_summary(&args(Some(1999)), &create_test_index(), &output).unwrap();

        assert!(text.contains("Bergen"));
        assert!(text.contains("1999"));
    }

    #[test]
    fn test_describe_dates_truncates() {
        let extreme = ExtremeSummary {
            value: 0.0,
            dates: (1..=5)
                .map(|day| chrono::NaiveDate::from_ymd_opt(2010, 1, day).unwrap())
                .collect(),
        };

        assert_eq!(
            describe_dates(&extreme),
            "2010-01-01, 2010-01-02, 2010-01-03, 2 more"
        );
    }
}
