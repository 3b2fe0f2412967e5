//! Shared browser session handle.
//!
//! A [`Session`] is what page objects hold: a reference-counted driver plus
//! the application's base URL and the bounded timeouts every wait uses.
//! Cloning is cheap and the session outlives any page object built on it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::driver::PageDriver;
use crate::locator::{Locator, LocatorSpec};
use crate::result::PomResult;
use crate::wait::{
    url_path, DEFAULT_ACTION_TIMEOUT_MS, DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
};

/// Bounded timeouts applied at every suspension point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Element waits (resolve, actions, text queries)
    pub action_ms: u64,
    /// Route + landmark waits after a navigation
    pub navigation_ms: u64,
    /// Polling interval for all waits
    pub poll_ms: u64,
    /// How long to watch a screen when asserting that it does not change
    pub settle_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: DEFAULT_ACTION_TIMEOUT_MS,
            navigation_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            poll_ms: DEFAULT_POLL_INTERVAL_MS,
            settle_ms: 1_500,
        }
    }
}

impl Timeouts {
    /// Explicit action / navigation / poll timeouts; settle defaults to the action timeout
    #[must_use]
    pub const fn new(action_ms: u64, navigation_ms: u64, poll_ms: u64) -> Self {
        Self {
            action_ms,
            navigation_ms,
            poll_ms,
            settle_ms: action_ms,
        }
    }

    /// Set the settle window
    #[must_use]
    pub const fn with_settle(mut self, settle_ms: u64) -> Self {
        self.settle_ms = settle_ms;
        self
    }
}

/// Shared handle to one browser page
#[derive(Clone)]
pub struct Session {
    driver: Arc<dyn PageDriver>,
    base_url: Arc<str>,
    timeouts: Timeouts,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap a driver; `base_url` is the application origin (trailing slash ignored)
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, base_url: &str) -> Self {
        Self {
            driver,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            timeouts: Timeouts::default(),
        }
    }

    /// Replace the timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Driver behind this session
    #[must_use]
    pub fn driver(&self) -> &dyn PageDriver {
        self.driver.as_ref()
    }

    /// Application origin
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Timeouts
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Absolute URL for an application route
    #[must_use]
    pub fn url_for(&self, route: &str) -> String {
        if route.starts_with("http://") || route.starts_with("https://") {
            return route.to_string();
        }
        let route = if route.starts_with('/') {
            route.to_string()
        } else {
            format!("/{route}")
        };
        format!("{}{route}", self.base_url)
    }

    /// Navigate to an application route
    pub async fn goto(&self, route: &str) -> PomResult<()> {
        let url = self.url_for(route);
        tracing::debug!(%url, "goto");
        self.driver.navigate(&url).await
    }

    /// Current absolute URL
    pub async fn current_url(&self) -> PomResult<String> {
        self.driver.current_url().await
    }

    /// Path part of the current URL
    pub async fn route(&self) -> PomResult<String> {
        let url = self.current_url().await?;
        Ok(url_path(&url).to_string())
    }

    /// Bind a registry entry to this session
    #[must_use]
    pub fn locate(&self, spec: &LocatorSpec) -> Locator {
        Locator::bind(spec, self)
    }

    /// Release the underlying page
    pub async fn close(&self) -> PomResult<()> {
        self.driver.close().await
    }
}
