//! Command-line interface definitions and argument parsing

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Interactive e-commerce sales dashboard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV data file, overrides `data_path` from the config
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Print the report to stdout instead of opening a window
    #[arg(long)]
    pub headless: bool,

    /// Start date (YYYY-MM-DD), headless only; defaults to the first day in the data
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD), headless only; defaults to the last day in the data
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Country to keep, repeatable; headless only
    #[arg(long = "country")]
    pub countries: Vec<String>,

    /// Write the filtered rows as CSV, headless only
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}': {} (expected YYYY-MM-DD)", s, e))
}
