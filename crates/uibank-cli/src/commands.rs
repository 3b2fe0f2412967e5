//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ColorChoice;
use crate::output::OutputFormat;

/// uibank: end-to-end scenarios for the UiBank web app
#[derive(Parser, Debug)]
#[command(name = "uibank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Harness configuration file (YAML)
    #[arg(short, long, global = true, env = "UIBANK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List catalog scenarios
    List(ListArgs),

    /// Run scenarios
    Run(RunArgs),

    /// Print the declared screen transitions
    Graph(GraphArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only this suite (login, account-summary, new-account, registration)
    #[arg(short, long)]
    pub suite: Option<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Scenarios to run, as `suite/name` or bare name (default: all)
    pub names: Vec<String>,

    /// Only scenarios whose `suite/name` matches this regex
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Scenarios run at the same time
    #[arg(short = 'j', long)]
    pub parallel: Option<usize>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,

    /// Stop starting scenarios after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Page driver
    #[arg(long, default_value = "chromium")]
    pub driver: DriverArg,

    /// Application origin (overrides config and environment)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Per-scenario budget in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the graph command
#[derive(Parser, Debug)]
pub struct GraphArgs {
    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,
}

/// Color argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Page driver argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// Headless Chromium over CDP
    #[default]
    Chromium,
    /// In-memory model of the application
    Mock,
}
