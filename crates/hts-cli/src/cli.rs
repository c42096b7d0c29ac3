//! CLI argument definitions for the HTS risk screener.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hts-risk",
    version,
    about = "HTS risk screening - encode client attributes and score HIV-test risk",
    long_about = "Encode HIV Testing Services client attributes into the scoring model's\n\
                  feature schema, score them against a remote model and classify the\n\
                  returned probability into a risk tier."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow raw clinical codes to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the feature schema sent to the scoring model.
    Features,

    /// Encode a raw input file into a feature vector.
    Encode(EncodeArgs),

    /// Classify a probability into a risk tier.
    Classify(ClassifyArgs),

    /// Encode a raw input file and score it against the remote model.
    Assess(AssessArgs),
}

#[derive(Parser)]
pub struct EncodeArgs {
    /// JSON file holding the positional raw input array ("-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Print a table of set features instead of JSON.
    #[arg(long = "table")]
    pub table: bool,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Positive-class probability in [0, 1].
    #[arg(value_name = "PROBABILITY")]
    pub probability: f64,

    /// Scoring config supplying custom thresholds.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the assessment as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct AssessArgs {
    /// JSON file holding the positional raw input array ("-" for stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Scoring config (TOML) naming the endpoint and model.
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// Override the configured endpoint URL.
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Override the configured facility identifier.
    #[arg(long = "facility", value_name = "ID")]
    pub facility: Option<String>,

    /// Encounter date (YYYY-MM-DD, default: today).
    #[arg(long = "date", value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Request deadline in seconds (default: from config).
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Print the outcome as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
