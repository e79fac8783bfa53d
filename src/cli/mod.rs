//! Command-line parsing for the `laborstat` binary.
//!
//! Argument parsing and command dispatch stay separate from acquisition code:
//! this module only describes the surface, `app` wires it to the service.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::FallbackPolicy;
use crate::domain::MetricId;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "laborstat",
    version,
    about = "Construction labor-market data from BLS, FRED and USAspending, with synthetic fallback"
)]
pub struct Cli {
    /// Override the fallback policy from the environment.
    #[arg(long, global = true, value_enum)]
    pub policy: Option<FallbackPolicy>,

    /// Override the synthetic-data seed from the environment.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one metric series and print it as a table.
    Series(SeriesArgs),
    /// Print the headline dashboard for a region.
    Overview(RangeArgs),
    /// List the largest federal construction awards for a region.
    Awards(AwardsArgs),
    /// Report which provider credentials are configured.
    Status,
}

/// Region and date window shared by every data command.
#[derive(Debug, Args, Clone)]
pub struct RangeArgs {
    /// Two-letter state code.
    #[arg(short = 'r', long, default_value = "NJ")]
    pub region: String,

    /// First date of the window (YYYY-MM-DD).
    #[arg(long, default_value = "2020-01-01")]
    pub start: NaiveDate,

    /// Last date of the window (YYYY-MM-DD).
    #[arg(long, default_value = "2024-12-31")]
    pub end: NaiveDate,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    #[arg(short = 'm', long, value_enum)]
    pub metric: MetricId,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Export the series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the series to JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Print only the summary line, not every observation.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AwardsArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Number of awards to show.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export the full award list to JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}
