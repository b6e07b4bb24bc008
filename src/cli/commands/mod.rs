//! Command implementations for the weather index CLI
//!
//! Each command is implemented in its own module and renders its result to a
//! string in the requested output format; [`run`] prints it.

pub mod extremes;
pub mod locations;
pub mod observations;
pub mod shared;
pub mod summary;

pub use shared::OutputSettings;

use crate::Result;
use crate::app::services::location_index::LocationIndex;
use crate::cli::args::{Args, Commands};
use tracing::{debug, info};

/// Main command runner
///
/// Loads configuration, sets up logging, loads the dataset and dispatches
/// to the subcommand handler.
pub fn run(args: Args) -> Result<()> {
    let config = shared::load_configuration(&args)?;
    shared::setup_logging(&args.log_level(&config.logging.level), args.quiet)?;

    info!("Starting weather index");
    debug!("Command line arguments: {:?}", args);
    debug!("Loaded configuration: {:?}", config);

    let output = OutputSettings::resolve(&args, &config);
    let (index, _stats) = shared::load_index(&config)?;

    let report = execute(&args.command, &index, &output)?;
    print!("{}", report);
    if !report.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Run one subcommand against a loaded index and return its rendered output
pub fn execute(command: &Commands, index: &LocationIndex, output: &OutputSettings) -> Result<String> {
    match command {
        Commands::Locations(args) => locations::run_locations(args, index, output),
        Commands::Day(args) => observations::run_day(args, index, output),
        Commands::Date(args) => observations::run_date(args, index, output),
        Commands::Period(args) => observations::run_period(args, index, output),
        Commands::Summary(args) => summary::run_summary(args, index, output),
        Commands::Extremes(args) => extremes::run_extremes(args, index, output),
    }
}
