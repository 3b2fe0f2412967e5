//! Scenario Runner
//!
//! A scenario is a named async function over a [`ScenarioContext`]. The
//! runner opens a fresh session per scenario from a [`SessionFactory`], runs
//! scenarios concurrently up to the configured limit, bounds each one with a
//! budget, and reports outcomes in catalog order. Failed scenarios are never
//! retried.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::HarnessConfig;
use crate::driver::PageDriver;
use crate::expect::expect_page;
use crate::pages::{
    AccountCreateResultsPage, AccountSummaryPage, LoginOutcome, LoginPage, NewAccountPage,
    PageObject, RegistrationPage,
};
use crate::result::{ErrorKind, PomError, PomResult};
use crate::screen::{NavAction, NavigationGraph, Screen};
use crate::session::Session;

// =============================================================================
// SESSION FACTORY
// =============================================================================

/// Source of independent browser sessions
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a new, isolated page
    async fn open(&self) -> PomResult<Arc<dyn PageDriver>>;

    /// Release whatever backs the sessions (browser process, ...)
    async fn shutdown(&self) -> PomResult<()> {
        Ok(())
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// One executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step name
    pub name: String,
    /// Whether the step succeeded
    pub passed: bool,
    /// Step duration
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
struct ScenarioLog {
    screen: Option<Screen>,
    current_step: Option<String>,
    failed_step: Option<String>,
    steps: Vec<StepRecord>,
    diagnostics: BTreeMap<String, String>,
}

/// Everything a running scenario can touch
pub struct ScenarioContext {
    name: String,
    session: Session,
    config: Arc<HarnessConfig>,
    graph: NavigationGraph,
    log: Arc<Mutex<ScenarioLog>>,
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("name", &self.name)
            .field("session", &self.session)
            .field("screen", &self.screen())
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    /// Context for scenario `name` over `session`
    #[must_use]
    pub fn new(name: impl Into<String>, session: Session, config: Arc<HarnessConfig>) -> Self {
        Self {
            name: name.into(),
            session,
            config,
            graph: NavigationGraph::default(),
            log: Arc::new(Mutex::new(ScenarioLog::default())),
        }
    }

    fn log(&self) -> MutexGuard<'_, ScenarioLog> {
        self.log.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Scenario name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Session shared by every page object of this scenario
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Harness configuration
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Bind a page object to this scenario's session
    #[must_use]
    pub fn page<P: PageObject>(&self) -> P {
        P::new(&self.session)
    }

    /// Screen the scenario last arrived on
    #[must_use]
    pub fn screen(&self) -> Option<Screen> {
        self.log().screen
    }

    /// Steps executed so far
    #[must_use]
    pub fn steps(&self) -> Vec<StepRecord> {
        self.log().steps.clone()
    }

    /// Diagnostics recorded so far
    #[must_use]
    pub fn diagnostics(&self) -> BTreeMap<String, String> {
        self.log().diagnostics.clone()
    }

    /// Run one named step; a failure is attributed to the innermost step
    pub async fn step<T, Fut>(&self, name: &str, fut: Fut) -> PomResult<T>
    where
        Fut: Future<Output = PomResult<T>>,
    {
        let (outer, first_nested) = {
            let mut log = self.log();
            (log.current_step.replace(name.to_string()), log.steps.len())
        };
        tracing::info!(scenario = %self.name, step = name, "step");
        let start = Instant::now();
        let result = fut.await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let mut log = self.log();
        if let Err(e) = &result {
            tracing::warn!(scenario = %self.name, step = name, kind = %e.kind(), error = %e, "step failed");
            // keep the attribution only if the last nested step failed and nothing ran after it
            let nested_failed = log.steps.len() > first_nested
                && log.steps.last().is_some_and(|step| !step.passed);
            if !nested_failed {
                log.failed_step = Some(name.to_string());
            }
        }
        log.steps.push(StepRecord {
            name: name.to_string(),
            passed: result.is_ok(),
            duration_ms,
        });
        log.current_step = outer;
        result
    }

    /// Record a diagnostic (created account ids and the like)
    pub fn note(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        tracing::info!(scenario = %self.name, key, value = %value, "note");
        self.log().diagnostics.insert(key.to_string(), value);
    }

    /// Open a screen by its route and wait until it rendered
    pub async fn open(&self, screen: Screen) -> PomResult<()> {
        if !screen.has_fixed_route() {
            return Err(PomError::config(format!(
                "screen {screen} has no fixed route ({})",
                screen.route()
            )));
        }
        self.session.goto(screen.route()).await?;
        expect_page(&self.session).to_be_on(screen).await?;
        self.log().screen = Some(screen);
        Ok(())
    }

    /// Take a declared action from the current screen and wait for its target
    pub async fn navigate(&self, action: NavAction) -> PomResult<Screen> {
        let from = match self.screen() {
            Some(screen) => screen,
            None => Screen::from_url(&self.session.current_url().await?).ok_or_else(|| {
                PomError::InvalidTransition {
                    from: "unknown".to_string(),
                    action: action.to_string(),
                }
            })?,
        };
        let to = self
            .graph
            .target(from, action)
            .ok_or_else(|| PomError::InvalidTransition {
                from: from.to_string(),
                action: action.to_string(),
            })?;

        tracing::debug!(scenario = %self.name, %from, %action, %to, "navigate");
        self.perform(action).await?;
        expect_page(&self.session).to_be_on(to).await?;
        self.log().screen = Some(to);
        Ok(to)
    }

    async fn perform(&self, action: NavAction) -> PomResult<()> {
        match action {
            NavAction::SubmitLogin => {
                let creds = &self.config.credentials;
                match self
                    .page::<LoginPage>()
                    .login(&creds.username, &creds.password)
                    .await?
                {
                    LoginOutcome::Accepted => Ok(()),
                    other => Err(PomError::assertion(format!(
                        "login as {} was not accepted ({other:?})",
                        creds.username
                    ))),
                }
            }
            NavAction::RegisterForAccount => self.page::<LoginPage>().click_register_link().await,
            NavAction::ApplyForNewAccount => {
                self.page::<AccountSummaryPage>()
                    .click_apply_for_new_account_button()
                    .await
            }
            NavAction::TransferFunds => {
                self.page::<AccountSummaryPage>()
                    .click_transfer_funds_link()
                    .await
            }
            NavAction::ApplyForLoan => {
                self.page::<AccountSummaryPage>()
                    .click_apply_for_a_loan_link()
                    .await
            }
            NavAction::LoanStatus => self.page::<AccountSummaryPage>().click_loan_status_link().await,
            NavAction::SubmitNewAccount => self.page::<NewAccountPage>().click_apply_button().await,
            NavAction::NewAccountBack => self.page::<NewAccountPage>().click_back_button().await,
            NavAction::ViewYourAccounts => {
                self.page::<AccountCreateResultsPage>()
                    .click_view_your_accounts_button()
                    .await
            }
            NavAction::ResultsBack => {
                self.page::<AccountCreateResultsPage>()
                    .click_back_button()
                    .await
            }
            NavAction::SubmitRegistration => {
                self.page::<RegistrationPage>().click_register_button().await
            }
            NavAction::RegistrationBack => self.page::<RegistrationPage>().click_back_button().await,
        }
    }

    /// Precondition: signed in with the configured credentials, on the account summary
    pub async fn login(&self) -> PomResult<()> {
        self.open(Screen::Login).await?;
        self.navigate(NavAction::SubmitLogin).await?;
        Ok(())
    }
}

// =============================================================================
// SCENARIO DEFINITIONS
// =============================================================================

/// Body of a scenario
pub type ScenarioFn = for<'a> fn(&'a ScenarioContext) -> BoxFuture<'a, PomResult<()>>;

/// A named, independently runnable scenario
#[derive(Clone, Copy)]
pub struct ScenarioDef {
    /// Suite (screen under test)
    pub suite: &'static str,
    /// Name, unique within the suite
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Body
    pub run: ScenarioFn,
}

impl ScenarioDef {
    /// `suite/name`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.suite, self.name)
    }
}

impl fmt::Debug for ScenarioDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioDef")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// How a scenario ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// Every step succeeded
    Passed,
    /// A step failed
    Failed {
        /// Failing step
        step: String,
        /// Error kind
        kind: ErrorKind,
        /// Error message
        message: String,
    },
    /// The scenario budget elapsed
    TimedOut {
        /// Step running when the budget elapsed
        step: String,
        /// Budget in milliseconds
        budget_ms: u64,
    },
    /// Not run because an earlier scenario failed in fail-fast mode
    Skipped,
}

impl ScenarioOutcome {
    /// Whether the scenario passed
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Suite name
    pub suite: String,
    /// Scenario name
    pub name: String,
    /// Outcome
    pub outcome: ScenarioOutcome,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Duration
    pub duration_ms: u64,
    /// Executed steps
    pub steps: Vec<StepRecord>,
    /// Recorded diagnostics
    pub diagnostics: BTreeMap<String, String>,
}

impl ScenarioReport {
    /// `suite/name`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}/{}", self.suite, self.name)
    }

    fn new(def: &ScenarioDef, outcome: ScenarioOutcome) -> Self {
        Self {
            suite: def.suite.to_string(),
            name: def.name.to_string(),
            outcome,
            started_at: Utc::now(),
            duration_ms: 0,
            steps: Vec::new(),
            diagnostics: BTreeMap::new(),
        }
    }
}

/// Results of a run, in the order the scenarios were given
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Individual reports
    pub reports: Vec<ScenarioReport>,
    /// Total duration
    pub duration_ms: u64,
}

impl RunSummary {
    /// Check if every scenario passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(|r| r.outcome.is_passed())
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, ScenarioOutcome::Passed))
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ScenarioOutcome::Failed { .. }))
    }

    /// Count timed-out scenarios
    #[must_use]
    pub fn timed_out(&self) -> usize {
        self.count(|o| matches!(o, ScenarioOutcome::TimedOut { .. }))
    }

    /// Count skipped scenarios
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ScenarioOutcome::Skipped))
    }

    /// Get total scenario count
    #[must_use]
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Reports that did not pass
    #[must_use]
    pub fn failures(&self) -> Vec<&ScenarioReport> {
        self.reports
            .iter()
            .filter(|r| !r.outcome.is_passed())
            .collect()
    }

    fn count(&self, pred: impl Fn(&ScenarioOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Callback invoked as each scenario finishes
pub type Observer = Arc<dyn Fn(&ScenarioReport) + Send + Sync>;

/// Runs scenarios against sessions from a factory
pub struct ScenarioRunner {
    factory: Arc<dyn SessionFactory>,
    config: Arc<HarnessConfig>,
    fail_fast: bool,
    observer: Option<Observer>,
}

impl fmt::Debug for ScenarioRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioRunner")
            .field("config", &self.config)
            .field("fail_fast", &self.fail_fast)
            .finish_non_exhaustive()
    }
}

impl ScenarioRunner {
    /// Create a runner
    #[must_use]
    pub fn new(factory: Arc<dyn SessionFactory>, config: HarnessConfig) -> Self {
        Self {
            factory,
            config: Arc::new(config),
            fail_fast: false,
            observer: None,
        }
    }

    /// Stop starting new scenarios after the first failure
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Call `observer` as each scenario finishes
    #[must_use]
    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run `scenarios`, at most `config.parallel` at a time
    pub async fn run(&self, scenarios: &[ScenarioDef]) -> RunSummary {
        let start = Instant::now();
        let stop = AtomicBool::new(false);
        let parallel = self.config.parallel.max(1);
        tracing::info!(count = scenarios.len(), parallel, "running scenarios");

        let mut reports: Vec<(usize, ScenarioReport)> = stream::iter(scenarios.iter().enumerate())
            .map(|(index, def)| {
                let stop = &stop;
                async move { (index, self.run_guarded(def, stop).await) }
            })
            .buffer_unordered(parallel)
            .inspect(|(_, report)| {
                if let Some(observer) = &self.observer {
                    observer(report);
                }
            })
            .collect()
            .await;
        reports.sort_by_key(|(index, _)| *index);

        RunSummary {
            reports: reports.into_iter().map(|(_, report)| report).collect(),
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn run_guarded(&self, def: &ScenarioDef, stop: &AtomicBool) -> ScenarioReport {
        if stop.load(Ordering::SeqCst) {
            return ScenarioReport::new(def, ScenarioOutcome::Skipped);
        }
        let report = self.run_one(def).await;
        if self.fail_fast && !report.outcome.is_passed() {
            stop.store(true, Ordering::SeqCst);
        }
        report
    }

    /// Run a single scenario in a fresh session
    pub async fn run_one(&self, def: &ScenarioDef) -> ScenarioReport {
        let started_at = Utc::now();
        let start = Instant::now();
        let id = def.id();

        let driver = match self.factory.open().await {
            Ok(driver) => driver,
            Err(e) => {
                tracing::warn!(scenario = %id, error = %e, "could not open session");
                let mut report = ScenarioReport::new(
                    def,
                    ScenarioOutcome::Failed {
                        step: "open session".to_string(),
                        kind: e.kind(),
                        message: e.to_string(),
                    },
                );
                report.started_at = started_at;
                return report;
            }
        };

        let session = Session::new(Arc::clone(&driver), &self.config.base_url)
            .with_timeouts(self.config.timeouts);
        let ctx = ScenarioContext::new(id.clone(), session, Arc::clone(&self.config));
        let budget_ms = self.config.scenario_timeout_ms;
        let result =
            tokio::time::timeout(Duration::from_millis(budget_ms), (def.run)(&ctx)).await;

        if let Err(e) = driver.close().await {
            tracing::warn!(scenario = %id, error = %e, "closing session failed");
        }

        let log = ctx.log();
        let outcome = match result {
            Ok(Ok(())) => ScenarioOutcome::Passed,
            Ok(Err(e)) => ScenarioOutcome::Failed {
                step: log
                    .steps
                    .last()
                    .filter(|step| !step.passed)
                    .and(log.failed_step.clone())
                    .unwrap_or_else(|| "scenario".to_string()),
                kind: e.kind(),
                message: e.to_string(),
            },
            Err(_) => ScenarioOutcome::TimedOut {
                step: log
                    .current_step
                    .clone()
                    .unwrap_or_else(|| "scenario".to_string()),
                budget_ms,
            },
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            ScenarioOutcome::Passed => tracing::info!(scenario = %id, duration_ms, "passed"),
            other => tracing::warn!(scenario = %id, duration_ms, outcome = ?other, "did not pass"),
        }

        ScenarioReport {
            suite: def.suite.to_string(),
            name: def.name.to_string(),
            outcome,
            started_at,
            duration_ms,
            steps: log.steps.clone(),
            diagnostics: log.diagnostics.clone(),
        }
    }

    /// Release the session factory
    pub async fn shutdown(&self) -> PomResult<()> {
        self.factory.shutdown().await
    }
}
