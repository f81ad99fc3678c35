//! CLI argument definitions for datesample.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `sample` | Draw a reproducible batch of dates |
//! | `candidates` | List the dates a batch would be drawn from |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, text, csv) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! # Five dates from the first ten days of 2021
//! datesample sample --start 2021-01-01 --end 2021-01-10 --size 5 --seed 111
//!
//! # Weekdays only, Luxembourg holidays removed, one date per line
//! datesample sample --start 2021-01-01 --end 2021-03-31 --size 10 --seed 7 \
//!     --exclude-weekends --exclude-holidays --country LU --format text
//! ```
//!
//! Values are accepted as raw text and checked by the core validator, so a
//! bad seed or date is reported with the same messages a form would show.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Deterministic random date sampler
#[derive(Debug, Parser)]
#[command(
    name = "datesample",
    author,
    version,
    about = "Deterministic random date sampler",
    long_about = "Draws a reproducible batch of distinct dates from a date range. \
The same range, size and seed always produce the same dates.\n\
\n\
Logging goes to stderr and is controlled by RUST_LOG (default: warn)."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Envelope with metadata, data and errors.
    Json,
    /// One date per line.
    Text,
    /// `date` header followed by one date per row.
    Csv,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Draw a batch of dates.
    Sample(SampleArgs),
    /// List candidate dates after weekend and holiday filtering.
    Candidates(RangeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// First date of the range (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Last date of the range, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<String>,

    /// Drop Saturdays and Sundays.
    #[arg(long, default_value_t = false)]
    pub exclude_weekends: bool,

    /// Drop public holidays of `--country`.
    #[arg(long, default_value_t = false)]
    pub exclude_holidays: bool,

    /// Two-letter holiday calendar (defaults to DATESAMPLE_HOLIDAY_COUNTRY or LU).
    #[arg(long)]
    pub country: Option<String>,

    /// Use these holiday dates instead of querying a provider. Repeatable.
    #[arg(long = "holiday", value_name = "DATE")]
    pub holidays: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct SampleArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Number of dates to draw.
    #[arg(long, allow_hyphen_values = true)]
    pub size: Option<String>,

    /// PRNG seed, 1 to 4294967295.
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<String>,
}
