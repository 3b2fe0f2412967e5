//! Wait Mechanisms
//!
//! Bounded, polling waits used by locators, expectations and the scenario
//! runner. Every suspension point in the harness goes through here, so a
//! missing element or a stuck navigation ends in a timeout, never a hang.

use crate::result::{PomError, PomResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element waits (5 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 5_000;

/// Default timeout for navigation waits (30 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_ACTION_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// URL PATTERNS
// =============================================================================

/// Pattern used to check the current page URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlPattern {
    /// Exact URL match
    Exact(String),
    /// Path part of the URL equals this value (trailing slash ignored)
    Path(String),
    /// Contains substring
    Contains(String),
    /// Regex match against the full URL
    Regex(String),
    /// Glob pattern (e.g., "*/register-account/success/*")
    Glob(String),
}

impl UrlPattern {
    /// Path pattern
    #[must_use]
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Regex pattern
    #[must_use]
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex(pattern.into())
    }

    /// Glob pattern; `*` matches any run of characters
    #[must_use]
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    /// Check if a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        match self {
            Self::Exact(pattern) => url == pattern,
            Self::Path(pattern) => normalize_path(url_path(url)) == normalize_path(pattern),
            Self::Contains(pattern) => url.contains(pattern.as_str()),
            Self::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(url))
                .unwrap_or(false),
            Self::Glob(pattern) => glob_matches(pattern, url),
        }
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(p) | Self::Path(p) | Self::Contains(p) | Self::Glob(p) => f.write_str(p),
            Self::Regex(p) => write!(f, "/{p}/"),
        }
    }
}

/// Extract the path component of a URL (no origin, query or fragment)
#[must_use]
pub fn url_path(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(idx) => {
            let after = &url[idx + 3..];
            after.find('/').map_or("/", |slash| &after[slash..])
        }
        None => url,
    };
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    if end == 0 {
        "/"
    } else {
        &rest[..end]
    }
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn glob_matches(pattern: &str, url: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    let (first, last) = match parts.as_slice() {
        [only] => return url == *only,
        [first, .., last] => (*first, *last),
        [] => return true,
    };
    if !url.starts_with(first) || !url[first.len()..].ends_with(last) {
        return false;
    }
    // middle segments must fit between the anchored ends
    let end = url.len() - last.len();
    let mut pos = first.len();
    for part in &parts[1..parts.len() - 1] {
        match url[pos..end].find(part) {
            Some(found) => pos += found + part.len(),
            None => return false,
        }
    }
    true
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
    /// Number of times the condition was evaluated
    pub polls: u32,
}

// =============================================================================
// WAITING
// =============================================================================

/// Poll `attempt` until it yields `Some(value)` or the timeout elapses.
///
/// The attempt is evaluated at least once. [`PomError::Driver`] failures
/// (a page that is mid-navigation, a detached frame) count as "not yet" and
/// are polled again; any other error ends the wait immediately. An attempt
/// that itself never completes is cut off by the same deadline.
pub async fn poll_for<T, F, Fut>(
    options: &WaitOptions,
    description: &str,
    mut attempt: F,
) -> PomResult<(T, WaitResult)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PomResult<Option<T>>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let poll = options.poll_interval();
    let mut polls = 0u32;
    let mut last_error: Option<String> = None;

    let polling = async {
        loop {
            polls += 1;
            match attempt().await {
                Ok(Some(value)) => return Ok::<_, PomError>((value, polls)),
                Ok(None) => {}
                Err(PomError::Driver { message }) => {
                    tracing::trace!(waited_for = description, error = %message, "driver not ready");
                    last_error = Some(message);
                }
                Err(e) => return Err(e),
            }
            if start.elapsed() >= timeout {
                return Err(PomError::Timeout {
                    ms: options.timeout_ms,
                });
            }
            tokio::time::sleep(poll).await;
        }
    };

    let outcome = tokio::time::timeout(timeout + poll, polling)
        .await
        .unwrap_or(Err(PomError::Timeout {
            ms: options.timeout_ms,
        }));

    match outcome {
        Ok((value, polls)) => {
            tracing::trace!(waited_for = description, polls, "wait satisfied");
            Ok((
                value,
                WaitResult {
                    elapsed: start.elapsed(),
                    waited_for: description.to_string(),
                    polls,
                },
            ))
        }
        Err(e @ PomError::Timeout { .. }) => {
            if let Some(error) = last_error {
                tracing::debug!(waited_for = description, last_error = %error, "wait timed out");
            }
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Poll `predicate` until it yields `true` or the timeout elapses.
pub async fn wait_until<F, Fut>(
    options: &WaitOptions,
    description: &str,
    mut predicate: F,
) -> PomResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = PomResult<bool>>,
{
    let (_, result) = poll_for(options, description, || {
        let check = predicate();
        async move { Ok::<_, PomError>(check.await?.then_some(())) }
    })
    .await?;
    Ok(result)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    mod options_tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, DEFAULT_ACTION_TIMEOUT_MS);
            assert_eq!(opts.poll_interval(), Duration::from_millis(50));
        }

        #[test]
        fn test_builder() {
            let opts = WaitOptions::new().with_timeout(100).with_poll_interval(10);
            assert_eq!(opts.timeout(), Duration::from_millis(100));
            assert_eq!(opts.poll_interval_ms, 10);
        }
    }

    mod url_pattern_tests {
        use super::*;

        #[test]
        fn test_url_path_extraction() {
            assert_eq!(url_path("https://uibank.uipath.com/accounts"), "/accounts");
            assert_eq!(url_path("https://uibank.uipath.com"), "/");
            assert_eq!(url_path("https://uibank.uipath.com/?x=1"), "/");
            assert_eq!(url_path("http://localhost:4200/loans/lookup#top"), "/loans/lookup");
            assert_eq!(url_path("/register-account"), "/register-account");
        }

        #[test]
        fn test_path_pattern_ignores_origin_and_trailing_slash() {
            let pattern = UrlPattern::path("/accounts");
            assert!(pattern.matches("https://uibank.uipath.com/accounts"));
            assert!(pattern.matches("https://uibank.uipath.com/accounts/"));
            assert!(!pattern.matches("https://uibank.uipath.com/accounts/account-apply"));
        }

        #[test]
        fn test_root_path() {
            let pattern = UrlPattern::path("/");
            assert!(pattern.matches("https://uibank.uipath.com/"));
            assert!(pattern.matches("https://uibank.uipath.com"));
            assert!(!pattern.matches("https://uibank.uipath.com/loans"));
        }

        #[test]
        fn test_regex_pattern() {
            let pattern = UrlPattern::regex(".*account-create-results");
            assert!(pattern.matches("https://uibank.uipath.com/accounts/account-create-results"));
            assert!(!pattern.matches("https://uibank.uipath.com/accounts"));
        }

        #[test]
        fn test_invalid_regex_never_matches() {
            assert!(!UrlPattern::regex("(").matches("anything"));
        }

        #[test]
        fn test_glob_pattern() {
            let pattern = UrlPattern::glob("*/register-account/success/*");
            assert!(pattern.matches("https://uibank.uipath.com/register-account/success/jdoe"));
            assert!(!pattern.matches("https://uibank.uipath.com/register-account"));
        }

        #[test]
        fn test_glob_suffix_is_anchored_at_end() {
            let pattern = UrlPattern::glob("*/accounts");
            assert!(pattern.matches("https://uibank.uipath.com/accounts/accounts"));
            assert!(pattern.matches("https://uibank.uipath.com/accounts"));
            assert!(!pattern.matches("https://uibank.uipath.com/accounts/account-apply"));
        }

        #[test]
        fn test_glob_segments_do_not_overlap() {
            assert!(UrlPattern::Glob("https://*/loans*lookup".into())
                .matches("https://bank.test/loans/lookup"));
            assert!(!UrlPattern::Glob("*abab".into()).matches("aba"));
            assert!(!UrlPattern::Glob("ab*ba".into()).matches("aba"));
            assert!(UrlPattern::Glob("*".into()).matches("anything"));
        }

        #[test]
        fn test_exact_and_contains() {
            assert!(UrlPattern::Exact("a/b".into()).matches("a/b"));
            assert!(!UrlPattern::Exact("a/b".into()).matches("a/b/"));
            assert!(UrlPattern::Contains("loans".into()).matches("https://x/loans/lookup"));
        }
    }

    mod wait_until_tests {
        use super::*;

        #[tokio::test]
        async fn test_poll_for_returns_value() {
            let counter = AtomicU32::new(0);
            let opts = WaitOptions::new().with_timeout(1_000).with_poll_interval(1);
            let (value, result) = poll_for(&opts, "value", || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok((n == 1).then(|| "ready".to_string())) }
            })
            .await
            .unwrap();
            assert_eq!(value, "ready");
            assert_eq!(result.polls, 2);
        }

        #[tokio::test]
        async fn test_immediate_success() {
            let opts = WaitOptions::new().with_timeout(100).with_poll_interval(5);
            let result = wait_until(&opts, "always", || async { Ok(true) })
                .await
                .unwrap();
            assert_eq!(result.polls, 1);
            assert_eq!(result.waited_for, "always");
        }

        #[tokio::test]
        async fn test_eventual_success() {
            let counter = AtomicU32::new(0);
            let opts = WaitOptions::new().with_timeout(1_000).with_poll_interval(1);
            let result = wait_until(&opts, "third poll", || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n >= 2) }
            })
            .await
            .unwrap();
            assert_eq!(result.polls, 3);
        }

        #[tokio::test]
        async fn test_times_out() {
            let opts = WaitOptions::new().with_timeout(20).with_poll_interval(5);
            let err = wait_until(&opts, "never", || async { Ok(false) })
                .await
                .unwrap_err();
            assert!(matches!(err, PomError::Timeout { ms: 20 }));
        }

        #[tokio::test]
        async fn test_predicate_error_short_circuits() {
            let opts = WaitOptions::new().with_timeout(1_000);
            let err = wait_until(&opts, "broken", || async {
                Err::<bool, _>(PomError::assertion("wrong page"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, PomError::AssertionFailed { .. }));
        }

        #[tokio::test]
        async fn test_driver_error_is_polled_again() {
            let counter = AtomicU32::new(0);
            let opts = WaitOptions::new().with_timeout(1_000).with_poll_interval(1);
            let result = wait_until(&opts, "context restored", || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(PomError::driver("execution context was destroyed"))
                    } else {
                        Ok(true)
                    }
                }
            })
            .await
            .unwrap();
            assert_eq!(result.polls, 2);
        }

        #[tokio::test]
        async fn test_persistent_driver_error_times_out() {
            let opts = WaitOptions::new().with_timeout(20).with_poll_interval(5);
            let err = wait_until(&opts, "gone", || async {
                Err::<bool, _>(PomError::driver("target closed"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, PomError::Timeout { ms: 20 }));
        }

        #[tokio::test]
        async fn test_hanging_predicate_is_bounded() {
            let opts = WaitOptions::new().with_timeout(20).with_poll_interval(5);
            let err = wait_until(&opts, "hang", || async {
                futures::future::pending::<()>().await;
                Ok(true)
            })
            .await
            .unwrap_err();
            assert!(matches!(err, PomError::Timeout { .. }));
        }
    }
}
