//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "salesprep",
    version,
    about = "Classify, normalize and combine dental lab sales exports",
    long_about = "Classify dental lab sales exports by their column layout, normalize each \
                  table into a canonical transaction shape and combine the results per \
                  source system.\n\n\
                  Triage reports list every file that was skipped."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: salesprep.toml in the working directory, if present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify every table below the raw folder and write the triage reports.
    Classify(ClassifyArgs),

    /// Classify, normalize and write per-table outputs, then combine them.
    Preprocess(PreprocessArgs),

    /// Combine an existing preprocessed folder per bucket.
    Combine(CombineArgs),

    /// Build the Aesthetic World and Woodford NHS/private mapping tables.
    NhsMapping,

    /// List the schema registry and the normalizer each schema dispatches to.
    Schemas,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Raw sales folder (default: paths.raw from the settings).
    #[arg(value_name = "RAW")]
    pub raw: Option<PathBuf>,
}

#[derive(Parser)]
pub struct PreprocessArgs {
    /// Raw sales folder (default: paths.raw from the settings).
    #[arg(value_name = "RAW")]
    pub raw: Option<PathBuf>,

    /// Add the nhs_private_tag column to order-level tables of labs with a
    /// price list.
    #[arg(long = "tag-nhs")]
    pub tag_nhs: bool,

    /// Skip the combination stage.
    #[arg(long = "no-combine")]
    pub no_combine: bool,
}

#[derive(Parser)]
pub struct CombineArgs {
    /// Preprocessed folder (default: paths.preprocessed from the settings).
    #[arg(value_name = "PREPROCESSED")]
    pub preprocessed: Option<PathBuf>,
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
