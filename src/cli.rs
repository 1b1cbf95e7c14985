use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "trailwatch",
    version,
    about = "Trailing high/low price alerts for a single asset"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Use this price instead of fetching a live quote
    #[arg(long, value_parser = parse_amount, allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// Manually set the high watermark
    #[arg(long = "set-high", value_parser = parse_amount, allow_negative_numbers = true)]
    pub set_high: Option<f64>,

    /// Manually set the low watermark
    #[arg(long = "set-low", value_parser = parse_amount, allow_negative_numbers = true)]
    pub set_low: Option<f64>,

    /// Clear both watermarks before evaluating
    #[arg(long)]
    pub reset: bool,

    /// Path of the persisted watermark record
    #[arg(long = "state-file")]
    pub state_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show price and distance from the watermarks without updating state
    Status,
}

fn parse_amount(value: &str) -> Result<f64, String> {
    let amount: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !amount.is_finite() {
        return Err(format!("'{value}' is not a finite number"));
    }
    Ok(amount)
}
