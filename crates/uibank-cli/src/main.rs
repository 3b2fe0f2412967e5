//! uibank: end-to-end scenarios for the UiBank web app
//!
//! ## Usage
//!
//! ```bash
//! uibank list                                # Show the scenario catalog
//! uibank run                                 # Run everything in chromium
//! uibank run --filter '^login/' -j 2         # Two login scenarios in parallel
//! uibank run apply-checking --driver mock    # Against the in-memory app
//! uibank graph --format json                 # Declared screen transitions
//! ```

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uibank_cli::{
    harness_config, render_graph, render_list, Cli, CliConfig, CliError, CliResult, CliRunner,
    ColorChoice, Commands, Verbosity,
};
use uibank_pom::{scenarios, TRANSITIONS};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);

    match cli.command {
        Commands::List(ref args) => {
            let defs = match args.suite {
                Some(ref name) => {
                    let defs = scenarios::suite(name);
                    if defs.is_empty() {
                        return Err(CliError::invalid_argument(format!(
                            "unknown suite '{name}' (expected one of: {})",
                            scenarios::SUITES.join(", ")
                        )));
                    }
                    defs
                }
                None => scenarios::catalog(),
            };
            println!("{}", render_list(&defs, args.format.into())?);
            Ok(())
        }
        Commands::Graph(ref args) => {
            println!("{}", render_graph(TRANSITIONS, args.format.into())?);
            Ok(())
        }
        Commands::Run(ref args) => {
            let harness = harness_config(cli.config.as_deref(), Some(args))?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(CliRunner::new(config, harness).run(args))?;
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// `RUST_LOG` wins unless `-v`/`-q` was given
fn init_logging(verbosity: Verbosity) {
    let filter = if verbosity == Verbosity::Normal {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
    } else {
        EnvFilter::new(verbosity.log_filter())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
