//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Map nested data with declarative mapping documents",
    long_about = "Build an output structure from an input structure using a YAML or JSON\n\
                  mapping document. Each output field is read from an input path, computed\n\
                  by a built-in capability, or filled from a default."
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
    /// Run a mapping document over input data and print the output.
    Run(RunArgs),

    /// Check a mapping document for configuration errors.
    Check(CheckArgs),

    /// List the built-in capabilities.
    Capabilities,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Mapping document (.yaml, .yml or .json).
    #[arg(short = 'm', long = "mapping", value_name = "FILE")]
    pub mapping: PathBuf,

    /// Input data (.json, .yaml or .yml). Reads JSON from stdin when omitted.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write output to a file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report every violation instead of stopping at the first one.
    ///
    /// Overrides `parameters.show_all_errors` from the document.
    #[arg(long = "show-all-errors")]
    pub show_all_errors: bool,

    /// Print single-line JSON.
    #[arg(long = "compact")]
    pub compact: bool,

    /// Print a per-node outcome table to stderr after the run.
    #[arg(long = "summary")]
    pub summary: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Mapping document (.yaml, .yml or .json).
    #[arg(short = 'm', long = "mapping", value_name = "FILE")]
    pub mapping: PathBuf,
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
