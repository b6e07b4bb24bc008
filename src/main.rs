use anyhow::Context;
use clap::Parser;
use std::process;
use weather_index::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    if let Err(error) = run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let command = command_name(&args);
    commands::run(args).with_context(|| format!("{} command failed", command))
}

fn command_name(args: &Args) -> &'static str {
    use weather_index::cli::args::Commands;

    match args.command {
        Commands::Locations(_) => "locations",
        Commands::Day(_) => "day",
        Commands::Date(_) => "date",
        Commands::Period(_) => "period",
        Commands::Summary(_) => "summary",
        Commands::Extremes(_) => "extremes",
    }
}
