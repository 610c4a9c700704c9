//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ilr_validate::DefectPolicy;

#[derive(Parser)]
#[command(
    name = "ilr",
    version,
    about = "Validate ILR learner batches against the rule catalogue",
    long_about = "Validate Individualised Learner Record batches.\n\n\
                  Rules are evaluated against a pinned, checksummed reference \
                  directory (rule settings, postcodes, LARS, FCS contracts and \
                  organisations)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a learner batch and report violations.
    Validate(ValidateArgs),

    /// List the rule catalogue.
    Rules,

    /// Verify a reference directory and print what it contains.
    Reference(ReferenceArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Learner batch as JSON.
    #[arg(value_name = "BATCH_JSON")]
    pub batch: PathBuf,

    /// Reference directory (default: $ILR_REFERENCE_DIR, then ./reference).
    #[arg(long = "reference-dir", value_name = "DIR")]
    pub reference_dir: Option<PathBuf>,

    /// Number of worker threads.
    #[arg(long = "workers", default_value_t = 1)]
    pub workers: usize,

    /// What to do when a rule fails internally.
    #[arg(long = "on-defect", value_enum, default_value = "abort")]
    pub on_defect: DefectPolicyArg,

    /// Disable memoization of derived values.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Provider UKPRN (overrides the batch's own).
    #[arg(long = "ukprn")]
    pub ukprn: Option<i64>,

    /// Print the outcome as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ReferenceArgs {
    /// Reference directory (default: $ILR_REFERENCE_DIR, then ./reference).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Print the verification summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DefectPolicyArg {
    Abort,
    Quarantine,
}

impl From<DefectPolicyArg> for DefectPolicy {
    fn from(value: DefectPolicyArg) -> Self {
        match value {
            DefectPolicyArg::Abort => Self::Abort,
            DefectPolicyArg::Quarantine => Self::Quarantine,
        }
    }
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
