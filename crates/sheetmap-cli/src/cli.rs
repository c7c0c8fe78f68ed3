//! Command-line arguments for `sheetmap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sheetmap_cli::pipeline::Preset;

#[derive(Parser)]
#[command(
    name = "sheetmap",
    version,
    about = "Map uploaded spreadsheets onto inventory, vendor and order tables",
    long_about = "Classify each uploaded sheet as one of the target tables \
                  (inventory, vendor, purchase order, sales order) and map its \
                  columns onto that table's fields.\n\n\
                  Unmapped columns are listed with a reason and ranked suggestions."
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
    /// Classify CSV sheets and map their columns.
    Map(MapArgs),

    /// Show how individual headers are categorized.
    Categorize(CategorizeArgs),

    /// List the target tables, their columns and header patterns.
    Schema(SchemaArgs),
}

/// Where the target schema and tuning come from.
#[derive(Args)]
pub struct EngineArgs {
    /// Custom target schema TOML (default: built-in schema).
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// TOML config file with a `[mapping]` table.
    #[arg(long = "config", value_name = "FILE", conflicts_with_all = ["strict", "relaxed"])]
    pub config: Option<PathBuf>,

    /// Fewer, more certain mappings.
    #[arg(long = "strict", conflicts_with = "relaxed")]
    pub strict: bool,

    /// More mappings and suggestions for exploratory review.
    #[arg(long = "relaxed")]
    pub relaxed: bool,
}

impl EngineArgs {
    pub fn preset(&self) -> Preset {
        if self.strict {
            Preset::Strict
        } else if self.relaxed {
            Preset::Relaxed
        } else {
            Preset::Default
        }
    }
}

#[derive(Args)]
pub struct MapArgs {
    /// CSV files, one sheet each.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Print the mapping results as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct CategorizeArgs {
    /// Header texts to categorize.
    #[arg(value_name = "HEADER", required = true)]
    pub headers: Vec<String>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Custom target schema TOML (default: built-in schema).
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,
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
