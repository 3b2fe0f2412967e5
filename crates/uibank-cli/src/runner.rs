//! Scenario selection and execution for the `run` command

use std::collections::HashSet;
use std::sync::Arc;

use uibank_pom::{
    scenarios, HarnessConfig, MockSessionFactory, RunSummary, ScenarioDef, ScenarioReport,
    ScenarioRunner, SessionFactory,
};

use crate::commands::{DriverArg, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_summary_json, OutputFormat, ProgressReporter};

/// Pick scenarios: explicit names first, then the filter, else the whole catalog
///
/// # Errors
///
/// Returns an error for an unknown name, an invalid filter or an empty selection.
pub fn select(names: &[String], filter: Option<&str>) -> CliResult<Vec<ScenarioDef>> {
    let mut selected = if names.is_empty() {
        scenarios::catalog()
    } else {
        let mut seen = HashSet::new();
        let mut defs = Vec::with_capacity(names.len());
        for name in names {
            let def = scenarios::find(name)?;
            if seen.insert(def.id()) {
                defs.push(def);
            }
        }
        defs
    };

    if let Some(pattern) = filter {
        let matching: HashSet<String> = scenarios::filter(pattern)?
            .iter()
            .map(ScenarioDef::id)
            .collect();
        selected.retain(|def| matching.contains(&def.id()));
    }

    if selected.is_empty() {
        return Err(CliError::invalid_argument("no scenarios selected"));
    }
    Ok(selected)
}

/// Session factory for the chosen driver
///
/// # Errors
///
/// Returns an error if the browser cannot be launched, or if chromium was
/// requested from a build without the `browser` feature.
pub async fn session_factory(
    driver: DriverArg,
    config: &HarnessConfig,
) -> CliResult<Arc<dyn SessionFactory>> {
    match driver {
        DriverArg::Mock => Ok(Arc::new(MockSessionFactory::new(config.credentials.clone()))),
        #[cfg(feature = "browser")]
        DriverArg::Chromium => {
            let factory = uibank_pom::ChromiumSessionFactory::launch(config.browser.clone()).await?;
            Ok(Arc::new(factory))
        }
        #[cfg(not(feature = "browser"))]
        DriverArg::Chromium => Err(CliError::invalid_argument(
            "built without the `browser` feature; use --driver mock",
        )),
    }
}

/// Runs the selected scenarios and reports progress
#[derive(Debug)]
pub struct CliRunner {
    config: CliConfig,
    harness: HarnessConfig,
}

impl CliRunner {
    /// Create a runner
    #[must_use]
    pub const fn new(config: CliConfig, harness: HarnessConfig) -> Self {
        Self { config, harness }
    }

    /// Harness configuration in use
    #[must_use]
    pub const fn harness(&self) -> &HarnessConfig {
        &self.harness
    }

    /// Execute the `run` command
    ///
    /// # Errors
    ///
    /// Returns [`CliError::ScenariosFailed`] when any selected scenario did not
    /// pass, or the selection/launch error that prevented the run.
    pub async fn run(self, args: &RunArgs) -> CliResult<RunSummary> {
        let selected = select(&args.names, args.filter.as_deref())?;
        let format = OutputFormat::from(args.format);
        let quiet = self.config.verbosity.is_quiet();

        tracing::info!(
            scenarios = selected.len(),
            base_url = %self.harness.base_url,
            driver = ?args.driver,
            "starting run"
        );

        let factory = session_factory(args.driver, &self.harness).await?;

        let mut reporter = ProgressReporter::new(self.config.color.should_color(), quiet);
        reporter.header(&format!(
            "Running {} scenarios against {}",
            selected.len(),
            self.harness.base_url
        ));
        reporter.start_progress(selected.len() as u64, "scenarios");
        let reporter = Arc::new(reporter);

        let observer = {
            let reporter = Arc::clone(&reporter);
            let print_lines = format == OutputFormat::Text;
            Arc::new(move |report: &ScenarioReport| {
                if print_lines {
                    reporter.report(report);
                }
                reporter.set_message(&report.id());
                reporter.increment(1);
            })
        };

        let runner = ScenarioRunner::new(factory, self.harness)
            .with_fail_fast(args.fail_fast)
            .with_observer(observer);
        let summary = runner.run(&selected).await;
        reporter.finish();

        if let Err(e) = runner.shutdown().await {
            reporter.warning(&format!("browser shutdown failed: {e}"));
        }

        match format {
            OutputFormat::Json => println!("{}", render_summary_json(&summary)?),
            OutputFormat::Text => reporter.summary(&summary),
        }

        if summary.all_passed() {
            Ok(summary)
        } else {
            Err(CliError::ScenariosFailed {
                failed: summary.total() - summary.passed(),
                total: summary.total(),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uibank_pom::PomError;

    mod select_tests {
        use super::*;

        #[test]
        fn test_select_all_by_default() {
            assert_eq!(select(&[], None).unwrap().len(), 15);
        }

        #[test]
        fn test_select_names_dedupes_and_keeps_order() {
            let names = vec![
                "apply-savings".to_string(),
                "login/valid-credentials".to_string(),
                "new-account/apply-savings".to_string(),
            ];
            let ids: Vec<String> = select(&names, None)
                .unwrap()
                .iter()
                .map(ScenarioDef::id)
                .collect();
            assert_eq!(
                ids,
                ["new-account/apply-savings", "login/valid-credentials"]
            );
        }

        #[test]
        fn test_select_filter_narrows_names() {
            let names = vec![
                "valid-credentials".to_string(),
                "invalid-credentials".to_string(),
            ];
            let defs = select(&names, Some("^login/invalid")).unwrap();
            assert_eq!(defs.len(), 1);
        }

        #[test]
        fn test_select_unknown_name() {
            let err = select(&["checkout".to_string()], None).unwrap_err();
            assert!(matches!(
                err,
                CliError::Pom(PomError::UnknownScenario { .. })
            ));
        }

        #[test]
        fn test_select_empty_result() {
            let err = select(&[], Some("^nothing-matches$")).unwrap_err();
            assert!(matches!(err, CliError::InvalidArgument { .. }));
        }
    }

    mod run_tests {
        use super::*;
        use crate::commands::{Cli, Commands};
        use crate::config::harness_config;
        use clap::Parser;

        fn run_args(argv: &[&str]) -> RunArgs {
            match Cli::try_parse_from(argv).unwrap().command {
                Commands::Run(args) => args,
                other => panic!("expected run, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_mock_run_passes() {
            let args = run_args(&[
                "uibank",
                "run",
                "--driver",
                "mock",
                "--filter",
                "^login/",
                "--format",
                "json",
            ]);
            let harness = harness_config(None, Some(&args)).unwrap();
            let config = CliConfig::new().with_verbosity(crate::config::Verbosity::Quiet);
            let summary = CliRunner::new(config, harness).run(&args).await.unwrap();
            assert_eq!(summary.passed(), 2);
        }
    }
}
