//! UiBank CLI Library
//!
//! Command-line interface for the UiBank page-object harness: list the
//! scenario catalog, print the navigation graph and run scenarios against
//! chromium or the in-memory mock of the application.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, DriverArg, FormatArg, GraphArgs, ListArgs, RunArgs,
};
pub use config::{harness_config, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{
    describe, render_graph, render_list, render_summary_json, summary_line, OutputFormat,
    ProgressReporter,
};
pub use runner::{select, session_factory, CliRunner};
