//! CLI configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use uibank_pom::HarnessConfig;

use crate::commands::{DriverArg, RunArgs};
use crate::error::{CliError, CliResult};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures and errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - step-level logs
    Verbose,
    /// Debug - locator-level logs
    Debug,
}

impl Verbosity {
    /// Map `-q` and the `-v` count to a level
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Log filter used when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

/// Build the harness configuration: file, then environment, then flags
///
/// # Errors
///
/// Returns an error if the file cannot be read or the merged result is invalid.
pub fn harness_config(path: Option<&Path>, args: Option<&RunArgs>) -> CliResult<HarnessConfig> {
    let base = match path {
        Some(path) if !path.is_file() => {
            return Err(CliError::config(format!(
                "config file {} does not exist",
                path.display()
            )))
        }
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    let mut config = base.apply_env();

    if let Some(args) = args {
        if let Some(ref url) = args.base_url {
            config = config.with_base_url(url.as_str());
        }
        if let Some(parallel) = args.parallel {
            config = config.with_parallel(parallel);
        }
        if let Some(ms) = args.timeout {
            config = config.with_scenario_timeout(ms);
        }
        if args.headed {
            config.browser = config.browser.with_headless(false);
        }
        if args.driver == DriverArg::Mock {
            // the in-memory app settles immediately
            config.timeouts = config.timeouts.with_settle(config.timeouts.settle_ms.min(200));
        }
    }

    config.validate()?;
    Ok(config)
}
