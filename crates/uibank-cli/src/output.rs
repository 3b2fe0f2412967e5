//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use uibank_pom::{RunSummary, ScenarioDef, ScenarioOutcome, ScenarioReport, Transition};

use crate::error::CliResult;

/// Output format for listings and run results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Progress reporter for scenario runs (writes to stderr)
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Increment progress
    pub fn increment(&self, delta: u64) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(delta);
        }
    }

    /// Update progress message
    pub fn set_message(&self, message: &str) {
        if let Some(ref pb) = self.progress_bar {
            pb.set_message(message.to_string());
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write_line(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(|| {
                let _ = self.term.write_line(line);
            }),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    fn prefixed(&self, plain: &str, styled: console::StyledObject<&str>, message: &str) {
        let prefix = if self.use_color {
            styled.bold().to_string()
        } else {
            plain.to_string()
        };
        self.write_line(&format!("{prefix} {message}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.prefixed("PASS", style("✓").green(), message);
    }

    /// Print a failure message (even in quiet mode)
    pub fn failure(&self, message: &str) {
        self.prefixed("FAIL", style("✗").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.prefixed("WARN", style("⚠").yellow(), message);
    }

    /// Print a section header
    pub fn header(&self, title: &str) {
        if self.quiet {
            return;
        }

        let styled = if self.use_color {
            style(title).bold().underlined().to_string()
        } else {
            format!("=== {title} ===")
        };

        self.write_line(&styled);
    }

    /// Print one finished scenario
    pub fn report(&self, report: &ScenarioReport) {
        let detail = describe(report);
        match report.outcome {
            ScenarioOutcome::Passed => self.success(&detail),
            ScenarioOutcome::Skipped => {
                if !self.quiet {
                    self.prefixed("SKIP", style("-").dim(), &detail);
                }
            }
            ScenarioOutcome::TimedOut { .. } => {
                self.prefixed("TIME", style("⏱").red(), &detail);
            }
            ScenarioOutcome::Failed { .. } => self.failure(&detail),
        }
    }

    /// Print the run summary
    pub fn summary(&self, summary: &RunSummary) {
        let failed = summary.failed() + summary.timed_out();
        if self.quiet && failed == 0 {
            return;
        }

        let _ = self.term.write_line("");
        let line = summary_line(summary);

        if self.use_color {
            let status_style = if summary.all_passed() {
                Style::new().green().bold()
            } else {
                Style::new().red().bold()
            };
            let (status, rest) = line.split_once(' ').unwrap_or((line.as_str(), ""));
            let _ = self
                .term
                .write_line(&format!("{} {rest}", status_style.apply_to(status)));
        } else {
            let _ = self.term.write_line(&line);
        }
    }
}

/// One-line description of a finished scenario
#[must_use]
pub fn describe(report: &ScenarioReport) -> String {
    let id = report.id();
    match &report.outcome {
        ScenarioOutcome::Passed => format!("{id} ({}ms)", report.duration_ms),
        ScenarioOutcome::Failed {
            step,
            kind,
            message,
        } => format!("{id} at step '{step}': {kind}: {message}"),
        ScenarioOutcome::TimedOut { step, budget_ms } => {
            format!("{id} exceeded {budget_ms}ms during step '{step}'")
        }
        ScenarioOutcome::Skipped => format!("{id} (skipped after an earlier failure)"),
    }
}

/// Final status line of a run
#[must_use]
pub fn summary_line(summary: &RunSummary) -> String {
    let status = if summary.all_passed() {
        "PASSED"
    } else {
        "FAILED"
    };
    #[allow(clippy::cast_precision_loss)]
    let secs = summary.duration_ms as f64 / 1000.0;
    format!(
        "{status} {} scenarios in {secs:.2}s ({} passed, {} failed, {} timed out, {} skipped)",
        summary.total(),
        summary.passed(),
        summary.failed(),
        summary.timed_out(),
        summary.skipped()
    )
}

#[derive(Serialize)]
struct ScenarioEntry<'a> {
    id: String,
    suite: &'a str,
    name: &'a str,
    description: &'a str,
}

/// Render the scenario listing
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_list(defs: &[ScenarioDef], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<ScenarioEntry<'_>> = defs
                .iter()
                .map(|def| ScenarioEntry {
                    id: def.id(),
                    suite: def.suite,
                    name: def.name,
                    description: def.description,
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
        OutputFormat::Text => {
            let width = defs.iter().map(|d| d.id().len()).max().unwrap_or(0);
            Ok(defs
                .iter()
                .map(|def| format!("{:<width$}  {}", def.id(), def.description))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}

/// Render the transition table
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_graph(transitions: &[Transition], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(transitions)?),
        OutputFormat::Text => Ok(transitions
            .iter()
            .map(|t| {
                format!(
                    "{:<24} --{}--> {}",
                    t.from.as_str(),
                    t.action.as_str(),
                    t.to.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render run results as JSON
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_summary_json(summary: &RunSummary) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use fixtures::report;
    use uibank_pom::{ErrorKind, TRANSITIONS};

    mod fixtures {
        use super::*;

        pub(super) fn report(name: &str, outcome: ScenarioOutcome) -> ScenarioReport {
            let mut summary: RunSummary = serde_json::from_value(serde_json::json!({
                "reports": [{
                    "suite": "login",
                    "name": name,
                    "outcome": { "status": "passed" },
                    "started_at": "2026-01-01T00:00:00Z",
                    "duration_ms": 42,
                    "steps": [],
                    "diagnostics": {}
                }],
                "duration_ms": 42
            }))
            .unwrap();
            let mut report = summary.reports.remove(0);
            report.outcome = outcome;
            report
        }
    }

    mod describe_tests {
        use super::*;

        #[test]
        fn test_passed() {
            let r = report("valid-credentials", ScenarioOutcome::Passed);
            assert_eq!(describe(&r), "login/valid-credentials (42ms)");
        }

        #[test]
        fn test_failed_names_step_and_kind() {
            let r = report(
                "invalid-credentials",
                ScenarioOutcome::Failed {
                    step: "error message".into(),
                    kind: ErrorKind::ElementNotFound,
                    message: "Element not found".into(),
                },
            );
            let line = describe(&r);
            assert!(line.contains("step 'error message'"));
            assert!(line.contains("ElementNotFound"));
        }

        #[test]
        fn test_timed_out() {
            let r = report(
                "valid-credentials",
                ScenarioOutcome::TimedOut {
                    step: "login".into(),
                    budget_ms: 500,
                },
            );
            assert!(describe(&r).contains("exceeded 500ms"));
        }

        #[test]
        fn test_summary_line() {
            let summary = RunSummary {
                reports: vec![
                    report("a", ScenarioOutcome::Passed),
                    report("b", ScenarioOutcome::Skipped),
                ],
                duration_ms: 1500,
            };
            assert_eq!(
                summary_line(&summary),
                "FAILED 2 scenarios in 1.50s (1 passed, 0 failed, 0 timed out, 1 skipped)"
            );
        }
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_list_text() {
            let text = render_list(&uibank_pom::scenarios::catalog(), OutputFormat::Text).unwrap();
            assert_eq!(text.lines().count(), 15);
            assert!(text.starts_with("login/valid-credentials"));
        }

        #[test]
        fn test_list_json() {
            let json = render_list(
                &uibank_pom::scenarios::suite("registration"),
                OutputFormat::Json,
            )
            .unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value[0]["id"], "registration/valid-details");
        }

        #[test]
        fn test_graph_text() {
            let text = render_graph(TRANSITIONS, OutputFormat::Text).unwrap();
            assert_eq!(text.lines().count(), TRANSITIONS.len());
            assert!(text.contains("--submit-login--> account-summary"));
        }

        #[test]
        fn test_graph_json() {
            let json = render_graph(TRANSITIONS, OutputFormat::Json).unwrap();
            let value: serde_json::Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value[0]["action"], "submit-login");
        }

        #[test]
        fn test_reporter_lines_do_not_panic() {
            let reporter = ProgressReporter::new(false, true);
            reporter.report(&report("a", ScenarioOutcome::Passed));
            reporter.report(&report("b", ScenarioOutcome::Skipped));
            reporter.finish();
        }
    }
}
