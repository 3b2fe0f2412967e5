//! Harness configuration
//!
//! Defaults target the public UiBank deployment. A YAML file can override
//! any subset of fields, and `UIBANK_*` environment variables override the
//! file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::browser::BrowserConfig;
use crate::forms::Credentials;
use crate::result::{PomError, PomResult};
use crate::session::Timeouts;

/// Default application origin
pub const DEFAULT_BASE_URL: &str = "https://uibank.uipath.com";

/// Default per-scenario budget (60 seconds)
pub const DEFAULT_SCENARIO_TIMEOUT_MS: u64 = 60_000;

/// Environment variable overriding [`HarnessConfig::base_url`]
pub const ENV_BASE_URL: &str = "UIBANK_BASE_URL";
/// Environment variable overriding the username
pub const ENV_USERNAME: &str = "UIBANK_USERNAME";
/// Environment variable overriding the password
pub const ENV_PASSWORD: &str = "UIBANK_PASSWORD";
/// Environment variable overriding headless mode
pub const ENV_HEADLESS: &str = "UIBANK_HEADLESS";

/// Everything a scenario run needs to know about its environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Application origin
    pub base_url: String,
    /// Pre-seeded account used by logged-in scenarios
    pub credentials: Credentials,
    /// Credentials the application must reject
    pub invalid_credentials: Credentials,
    /// Bounded waits
    pub timeouts: Timeouts,
    /// Browser launch settings
    pub browser: BrowserConfig,
    /// Scenarios run concurrently (each with its own session)
    pub parallel: usize,
    /// Budget for a whole scenario
    pub scenario_timeout_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::new("johndoe1750095679944", "Password123!"),
            invalid_credentials: Credentials::new("invaliduser", "invalidpassword"),
            timeouts: Timeouts::default(),
            browser: BrowserConfig::default(),
            parallel: 1,
            scenario_timeout_ms: DEFAULT_SCENARIO_TIMEOUT_MS,
        }
    }
}

impl HarnessConfig {
    /// Create default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a YAML file; missing fields keep their defaults
    pub fn load(path: impl AsRef<Path>) -> PomResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml_ng::from_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded harness config");
        Ok(config)
    }

    /// Apply `UIBANK_*` overrides from the process environment
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    #[must_use]
    pub fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(username) = lookup(ENV_USERNAME) {
            self.credentials.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.credentials.password = password;
        }
        if let Some(headless) = lookup(ENV_HEADLESS) {
            self.browser.headless = !matches!(
                headless.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        self
    }

    /// Set base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set credentials
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set timeouts
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set scenario concurrency
    #[must_use]
    pub const fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the per-scenario budget
    #[must_use]
    pub const fn with_scenario_timeout(mut self, ms: u64) -> Self {
        self.scenario_timeout_ms = ms;
        self
    }

    /// Reject configurations that would make every wait fail or hang
    pub fn validate(&self) -> PomResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(PomError::config("base_url is empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(PomError::config(format!(
                "base_url must be http(s): {base}"
            )));
        }
        let t = &self.timeouts;
        for (name, value) in [
            ("timeouts.action_ms", t.action_ms),
            ("timeouts.navigation_ms", t.navigation_ms),
            ("timeouts.poll_ms", t.poll_ms),
            ("scenario_timeout_ms", self.scenario_timeout_ms),
        ] {
            if value == 0 {
                return Err(PomError::config(format!("{name} must be greater than zero")));
            }
        }
        if self.parallel == 0 {
            return Err(PomError::config("parallel must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    mod default_tests {
        use super::*;

        #[test]
        fn test_defaults_are_valid() {
            let config = HarnessConfig::default();
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.timeouts.action_ms, 5_000);
            assert_eq!(config.timeouts.navigation_ms, 30_000);
            assert_eq!(config.scenario_timeout_ms, 60_000);
            assert!(config.browser.headless);
            config.validate().unwrap();
        }

        #[test]
        fn test_debug_masks_passwords() {
            let text = format!("{:?}", HarnessConfig::default());
            assert!(!text.contains("Password123!"));
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                "base_url: http://localhost:4200\nparallel: 4\ntimeouts:\n  action_ms: 2000\nbrowser:\n  headless: false"
            )
            .unwrap();

            let config = HarnessConfig::load(file.path()).unwrap();
            assert_eq!(config.base_url, "http://localhost:4200");
            assert_eq!(config.parallel, 4);
            assert_eq!(config.timeouts.action_ms, 2_000);
            assert_eq!(config.timeouts.navigation_ms, 30_000);
            assert!(!config.browser.headless);
            assert_eq!(config.credentials.username, "johndoe1750095679944");
        }

        #[test]
        fn test_missing_file_is_io_error() {
            let dir = tempfile::tempdir().unwrap();
            let err = HarnessConfig::load(dir.path().join("nope.yaml")).unwrap_err();
            assert!(matches!(err, PomError::Io(_)));
        }

        #[test]
        fn test_malformed_yaml() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "parallel: [not a number").unwrap();
            let err = HarnessConfig::load(file.path()).unwrap_err();
            assert!(matches!(err, PomError::Yaml(_)));
        }
    }

    mod env_tests {
        use super::*;

        #[test]
        fn test_overrides() {
            let vars: HashMap<&str, &str> = [
                (ENV_BASE_URL, "http://127.0.0.1:8080"),
                (ENV_USERNAME, "qa"),
                (ENV_PASSWORD, "secret"),
                (ENV_HEADLESS, "false"),
            ]
            .into_iter()
            .collect();
            let config =
                HarnessConfig::default().apply_vars(|k| vars.get(k).map(|v| (*v).to_string()));
            assert_eq!(config.base_url, "http://127.0.0.1:8080");
            assert_eq!(config.credentials, Credentials::new("qa", "secret"));
            assert!(!config.browser.headless);
        }

        #[test]
        fn test_absent_vars_change_nothing() {
            let config = HarnessConfig::default().apply_vars(|_| None);
            assert_eq!(config, HarnessConfig::default());
        }
    }

    mod validate_tests {
        use super::*;

        #[test]
        fn test_rejects_empty_base_url() {
            let err = HarnessConfig::default()
                .with_base_url("  ")
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("base_url"));
        }

        #[test]
        fn test_rejects_zero_timeouts() {
            let err = HarnessConfig::default()
                .with_timeouts(Timeouts::new(0, 100, 10))
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("action_ms"));

            let err = HarnessConfig::default()
                .with_scenario_timeout(0)
                .validate()
                .unwrap_err();
            assert!(err.to_string().contains("scenario_timeout_ms"));
        }

        #[test]
        fn test_rejects_zero_parallel() {
            assert!(HarnessConfig::default().with_parallel(0).validate().is_err());
        }
    }
}
