//! Shared utilities for CLI commands
//!
//! Logging setup, layered configuration, dataset loading and the small
//! formatting helpers every command's renderers use.

use crate::app::models::{Location, Observation};
use crate::app::services::loader::{self, LoadOptions, LoadStats};
use crate::app::services::location_index::LocationIndex;
use crate::cli::args::{Args, OutputFormat};
use crate::config::Config;
use crate::constants::counties;
use crate::{Error, Result};
use colored::*;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a command should print its results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub decimals: usize,
}

impl OutputSettings {
    /// Configured output, with the `--format` flag taking precedence
    pub fn resolve(args: &Args, config: &Config) -> Self {
        Self {
            format: args.format.unwrap_or(config.output.format),
            decimals: config.output.decimals,
        }
    }

    /// A reading for human output; missing readings show as a dash
    pub fn reading(&self, value: Option<f64>) -> String {
        match value {
            Some(value) => format!("{:.*}", self.decimals, value),
            None => "-".to_string(),
        }
    }

    /// A reading for CSV output; missing readings are empty cells
    pub fn cell(&self, value: Option<f64>) -> String {
        value
            .map(|value| format!("{:.*}", self.decimals, value))
            .unwrap_or_default()
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            decimals: crate::constants::DEFAULT_DECIMALS,
        }
    }
}

/// Set up logging to stderr
///
/// `RUST_LOG` wins over `level` when set.
pub fn setup_logging(level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weather_index={}", level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Load configuration layers and apply command-line overrides
pub fn load_configuration(args: &Args) -> Result<Config> {
    let mut config = Config::load_layered(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

/// Apply command-line flags on top of the loaded configuration
pub fn apply_cli_overrides(config: &mut Config, args: &Args) {
    if let Some(path) = &args.data {
        config.data.path = Some(path.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
}

/// Load the configured dataset
pub fn load_index(config: &Config) -> Result<(LocationIndex, LoadStats)> {
    let path = config.data.path.as_deref().ok_or_else(|| {
        Error::configuration(
            "No dataset given: use --data, set WEATHER_INDEX_DATA or data.path in the config file",
        )
    })?;

    if !path.is_file() {
        return Err(Error::configuration(format!(
            "Dataset file does not exist: {}",
            path.display()
        )));
    }

    let (index, stats) = loader::load_from_path(path, &LoadOptions::from(&config.data))?;

    info!(
        "{} locations, {} observations ({:.1}% of rows accepted)",
        index.len(),
        index.observation_count(),
        stats.acceptance_rate()
    );
    if stats.duplicates_skipped > 0 {
        warn!("Skipped {} duplicate rows", stats.duplicates_skipped);
    }

    Ok((index, stats))
}

/// Look up a place the user named, failing if it does not exist
pub fn find_place<'a>(index: &'a LocationIndex, name: &str, county: u32) -> Result<&'a Arc<Location>> {
    index
        .find_by_name_and_county(name, county)?
        .ok_or_else(|| Error::not_found(format!("location '{}' in county {}", name, county)))
}

/// County code followed by its name when known
pub fn county_label(county: u32) -> String {
    match counties::name(county) {
        Some(name) => format!("{} ({})", county, name),
        None => county.to_string(),
    }
}

/// Serialize a report as pretty JSON
pub fn to_json(value: &serde_json::Value) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::serialization(format!("Failed to serialize report: {}", e)))
}

/// Write a header and rows as CSV text
pub fn to_csv(header: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(|e| Error::csv("<output>", "Failed to write CSV header", Some(e)))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| Error::csv("<output>", "Failed to write CSV row", Some(e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::serialization(format!("Failed to flush CSV output: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::serialization(format!("CSV output is not UTF-8: {}", e)))
}

/// Column headers shared by every observation table
pub const OBSERVATION_COLUMNS: [&str; 5] = ["date", "mean_temp", "min_temp", "max_temp", "precipitation"];

/// One observation as CSV cells, in [`OBSERVATION_COLUMNS`] order
pub fn observation_cells(observation: &Observation, output: &OutputSettings) -> Vec<String> {
    vec![
        observation.date().to_string(),
        output.cell(observation.mean_temperature()),
        output.cell(observation.min_temperature()),
        output.cell(observation.max_temperature()),
        output.cell(observation.precipitation()),
    ]
}

/// Observations as an aligned human-readable table
pub fn observation_table<'a>(
    observations: impl IntoIterator<Item = &'a Arc<Observation>>,
    output: &OutputSettings,
) -> String {
    let mut table = format!(
        "  {:<12} {:>8} {:>8} {:>8} {:>9}\n",
        "Date".bright_cyan(),
        "Mean".bright_cyan(),
        "Min".bright_cyan(),
        "Max".bright_cyan(),
        "Precip".bright_cyan()
    );
    for observation in observations {
        table.push_str(&format!(
            "  {:<12} {:>8} {:>8} {:>8} {:>9}\n",
            observation.date().to_string(),
            output.reading(observation.mean_temperature()),
            output.reading(observation.min_temperature()),
            output.reading(observation.max_temperature()),
            output.reading(observation.precipitation())
        ));
    }
    table
}

/// Observation readings as a JSON object
pub fn observation_json(observation: &Observation) -> serde_json::Value {
    serde_json::json!({
        "date": observation.date().to_string(),
        "mean_temperature": observation.mean_temperature(),
        "min_temperature": observation.min_temperature(),
        "max_temperature": observation.max_temperature(),
        "precipitation": observation.precipitation(),
    })
}
