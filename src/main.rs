use std::path::PathBuf;
use std::process::ExitCode;

use cardcat::ingest::merge_cards;
use cardcat::{CardMap, ExportOptions, Result, export_catalog, parse_csv_dir, parse_csv_file};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(version, about = "Export card spreadsheets as a Cockatrice card database", long_about = None)]
struct Cli {
    /// CSV files, or directories to scan for `*.csv`. By default, the current working directory is scanned.
    inputs: Vec<PathBuf>,
    /// Path to the output XML file.
    #[arg(long)]
    output: PathBuf,
    /// TOML file with the set options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Set code. Overrides the config file.
    #[arg(long)]
    set: Option<String>,
    /// Long set name. Overrides the config file.
    #[arg(long)]
    long_name: Option<String>,
    /// Release date, written verbatim. Overrides the config file.
    #[arg(long)]
    date: Option<String>,
    /// Write card names in place of `~` in rule text.
    #[arg(long)]
    expand_names: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut options = match &cli.config {
        Some(path) => ExportOptions::from_file(path)?,
        None => ExportOptions::default(),
    };
    if let Some(set) = cli.set {
        if cli.long_name.is_none() && cli.config.is_none() {
            options.long_name = set.clone();
        }
        options.set_code = set;
    }
    if let Some(long_name) = cli.long_name {
        options.long_name = long_name;
    }
    if let Some(date) = cli.date {
        options.release_date = date;
    }
    options.expand_rule_names |= cli.expand_names;

    let inputs = if cli.inputs.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.inputs
    };

    let mut cards = CardMap::new();
    for input in &inputs {
        let found = if input.is_dir() {
            parse_csv_dir(input, &options.set_code)?
        } else {
            parse_csv_file(input, &options.set_code)?
        };
        merge_cards(&mut cards, found);
    }
    info!("exporting {} cards as set {}", cards.len(), options.set_code);

    export_catalog(&cli.output, cards.values(), &options)
}
