//! Auto-retrying assertions (Playwright's `expect()`).
//!
//! ```ignore
//! expect(&page.welcome_message_heading).to_have_text("Welcome!").await?;
//! expect_page(&session).to_be_on(Screen::AccountSummary).await?;
//! ```
//!
//! Every assertion polls until it holds or its timeout elapses. Element
//! assertions fail with `AssertionFailed` carrying the last observation;
//! URL assertions fail with `NavigationTimeout`.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::locator::Locator;
use crate::result::{PomError, PomResult};
use crate::screen::Screen;
use crate::session::Session;
use crate::wait::{poll_for, wait_until, UrlPattern, WaitOptions};

/// What an element assertion checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectAssertion {
    /// Text equals (whitespace-normalized)
    HasText {
        /// Expected text
        expected: String,
    },
    /// Text contains
    ContainsText {
        /// Text to find
        expected: String,
    },
    /// Element is visible
    IsVisible,
    /// Element is hidden or absent
    IsHidden,
    /// Candidate count
    HasCount {
        /// Expected count
        expected: usize,
    },
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ExpectAssertion {
    /// Validate a text observation
    pub fn validate(&self, actual: &str) -> PomResult<()> {
        match self {
            Self::HasText { expected } => {
                if normalize(actual) == normalize(expected) {
                    Ok(())
                } else {
                    Err(PomError::assertion(format!(
                        "Expected text '{expected}' but got '{}'",
                        normalize(actual)
                    )))
                }
            }
            Self::ContainsText { expected } => {
                if normalize(actual).contains(&normalize(expected)) {
                    Ok(())
                } else {
                    Err(PomError::assertion(format!(
                        "Expected text to contain '{expected}' but got '{}'",
                        normalize(actual)
                    )))
                }
            }
            Self::IsVisible | Self::IsHidden | Self::HasCount { .. } => Ok(()),
        }
    }

    /// Validate a count observation
    pub fn validate_count(&self, actual: usize) -> PomResult<()> {
        match self {
            Self::HasCount { expected } if actual != *expected => Err(PomError::assertion(
                format!("Expected count {expected} but got {actual}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Assertion builder for one locator
#[derive(Debug, Clone)]
pub struct Expect<'a> {
    locator: &'a Locator,
    timeout_ms: Option<u64>,
}

/// Create an expectation for a locator
#[must_use]
pub const fn expect(locator: &Locator) -> Expect<'_> {
    Expect {
        locator,
        timeout_ms: None,
    }
}

impl Expect<'_> {
    /// Override the locator's timeout for this assertion
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Assert the element has this text
    pub async fn to_have_text(&self, expected: &str) -> PomResult<()> {
        self.check(ExpectAssertion::HasText {
            expected: expected.to_string(),
        })
        .await
    }

    /// Assert the element's text contains this value
    pub async fn to_contain_text(&self, expected: &str) -> PomResult<()> {
        self.check(ExpectAssertion::ContainsText {
            expected: expected.to_string(),
        })
        .await
    }

    /// Assert the element is visible
    pub async fn to_be_visible(&self) -> PomResult<()> {
        self.check(ExpectAssertion::IsVisible).await
    }

    /// Assert the element is hidden or absent
    pub async fn to_be_hidden(&self) -> PomResult<()> {
        self.check(ExpectAssertion::IsHidden).await
    }

    /// Assert the number of candidates
    pub async fn to_have_count(&self, expected: usize) -> PomResult<()> {
        self.check(ExpectAssertion::HasCount { expected }).await
    }

    fn options(&self) -> WaitOptions {
        let options = self.locator.wait_options();
        self.timeout_ms
            .map_or(options, |ms| options.with_timeout(ms))
    }

    /// One observation; `Err(AssertionFailed)` describes why it does not hold yet
    async fn observe(&self, assertion: &ExpectAssertion) -> PomResult<Result<(), PomError>> {
        let locator = self.locator;
        let verdict = match assertion {
            ExpectAssertion::HasText { .. } | ExpectAssertion::ContainsText { .. } => {
                match locator.peek().await? {
                    Some(el) => assertion.validate(el.text.as_deref().unwrap_or_default()),
                    None => Err(PomError::assertion(format!(
                        "no element matched {}",
                        locator.describe()
                    ))),
                }
            }
            ExpectAssertion::IsVisible => {
                if locator.is_visible().await? {
                    Ok(())
                } else {
                    Err(PomError::assertion(format!(
                        "{} is not visible",
                        locator.describe()
                    )))
                }
            }
            ExpectAssertion::IsHidden => {
                if locator.is_visible().await? {
                    Err(PomError::assertion(format!("{} is visible", locator.describe())))
                } else {
                    Ok(())
                }
            }
            ExpectAssertion::HasCount { .. } => assertion.validate_count(locator.count().await?),
        };
        Ok(verdict)
    }

    async fn check(&self, assertion: ExpectAssertion) -> PomResult<()> {
        let options = self.options();
        let last: Mutex<Option<String>> = Mutex::new(None);
        let description = format!("{assertion:?} on {}", self.locator.describe());
        let outcome = poll_for(&options, &description, || async {
            match self.observe(&assertion).await? {
                Ok(()) => Ok::<_, PomError>(Some(())),
                Err(reason) => {
                    let reason = match reason {
                        PomError::AssertionFailed { message } => message,
                        other => other.to_string(),
                    };
                    if let Ok(mut slot) = last.lock() {
                        *slot = Some(reason);
                    }
                    Ok(None)
                }
            }
        })
        .await;

        match outcome {
            Ok(_) => Ok(()),
            Err(PomError::Timeout { ms }) => {
                let reason = last
                    .into_inner()
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| "no observation".to_string());
                Err(PomError::assertion(format!("{reason} (after {ms}ms)")))
            }
            Err(e) => Err(e),
        }
    }
}

/// Assertion builder for the current page
#[derive(Debug, Clone)]
pub struct ExpectPage<'a> {
    session: &'a Session,
    timeout_ms: Option<u64>,
}

/// Create an expectation for the session's current page
#[must_use]
pub const fn expect_page(session: &Session) -> ExpectPage<'_> {
    ExpectPage {
        session,
        timeout_ms: None,
    }
}

impl ExpectPage<'_> {
    /// Override the navigation timeout for this assertion
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    fn options(&self) -> WaitOptions {
        let timeouts = self.session.timeouts();
        WaitOptions::new()
            .with_timeout(self.timeout_ms.unwrap_or(timeouts.navigation_ms))
            .with_poll_interval(timeouts.poll_ms)
    }

    async fn navigation_timeout(&self, expected: String, options: &WaitOptions) -> PomError {
        PomError::NavigationTimeout {
            expected,
            last_url: self.session.current_url().await.unwrap_or_default(),
            timeout_ms: options.timeout_ms,
        }
    }

    /// Assert the current URL matches `pattern`
    pub async fn to_have_url(&self, pattern: &UrlPattern) -> PomResult<()> {
        let options = self.options();
        let description = format!("url {pattern}");
        match wait_until(&options, &description, || async {
            Ok::<_, PomError>(pattern.matches(&self.session.current_url().await?))
        })
        .await
        {
            Ok(_) => Ok(()),
            Err(PomError::Timeout { .. }) => {
                Err(self.navigation_timeout(pattern.to_string(), &options).await)
            }
            Err(e) => Err(e),
        }
    }

    /// Assert the URL matches the screen's route and its landmark is visible
    pub async fn to_be_on(&self, screen: Screen) -> PomResult<()> {
        let options = self.options();
        let pattern = screen.pattern();
        let landmark = screen.landmark().map(|spec| self.session.locate(spec));
        let description = format!("screen {screen}");
        let ready = wait_until(&options, &description, || async {
            if !pattern.matches(&self.session.current_url().await?) {
                return Ok(false);
            }
            match &landmark {
                Some(locator) => locator.is_visible().await,
                None => Ok(true),
            }
        })
        .await;

        match ready {
            Ok(result) => {
                tracing::debug!(%screen, elapsed_ms = result.elapsed.as_millis() as u64, "screen ready");
                Ok(())
            }
            Err(PomError::Timeout { .. }) => Err(self
                .navigation_timeout(format!("{screen} ({})", screen.route()), &options)
                .await),
            Err(e) => Err(e),
        }
    }

    /// Assert the URL keeps matching the screen's route for the settle window
    pub async fn to_stay_on(&self, screen: Screen) -> PomResult<()> {
        let timeouts = self.session.timeouts();
        let settle = Duration::from_millis(self.timeout_ms.unwrap_or(timeouts.settle_ms));
        let poll = Duration::from_millis(timeouts.poll_ms.max(1));
        let pattern = screen.pattern();
        let deadline = Instant::now() + settle;
        loop {
            let url = self.session.current_url().await?;
            if !pattern.matches(&url) {
                return Err(PomError::assertion(format!(
                    "expected to stay on {screen} ({}) but navigated to {url}",
                    screen.route()
                )));
            }
            if Instant::now() >= deadline {
                return Ok(());
            }
            tokio::time::sleep(poll).await;
        }
    }
}
