//! Scenario catalog
//!
//! Every end-to-end check of the UiBank application, grouped by the screen
//! it exercises. Each scenario is independent and addressable as
//! `suite/name` or, since names are unique, by its bare name.

use regex::RegexBuilder;

use crate::result::{PomError, PomResult};
use crate::scenario::ScenarioDef;

mod account_summary;
mod login;
mod new_account;
mod registration;

/// Suite names, in catalog order
pub const SUITES: [&str; 4] = [
    login::SUITE,
    account_summary::SUITE,
    new_account::SUITE,
    registration::SUITE,
];

/// Every scenario, grouped by suite
#[must_use]
pub fn catalog() -> Vec<ScenarioDef> {
    [
        login::SCENARIOS,
        account_summary::SCENARIOS,
        new_account::SCENARIOS,
        registration::SCENARIOS,
    ]
    .concat()
}

/// Look a scenario up by `suite/name` or bare name
pub fn find(name: &str) -> PomResult<ScenarioDef> {
    catalog()
        .into_iter()
        .find(|def| def.id() == name || def.name == name)
        .ok_or_else(|| PomError::UnknownScenario {
            name: name.to_string(),
        })
}

/// Scenarios whose `suite/name` matches `pattern` (case-insensitive regex)
pub fn filter(pattern: &str) -> PomResult<Vec<ScenarioDef>> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| PomError::config(format!("invalid scenario filter {pattern:?}: {e}")))?;
    Ok(catalog()
        .into_iter()
        .filter(|def| re.is_match(&def.id()))
        .collect())
}

/// Scenarios of one suite
#[must_use]
pub fn suite(name: &str) -> Vec<ScenarioDef> {
    catalog()
        .into_iter()
        .filter(|def| def.suite == name)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::HarnessConfig;
    use crate::forms::Credentials;
    use crate::mock_app::MockSessionFactory;
    use crate::scenario::{ScenarioOutcome, ScenarioRunner};
    use crate::session::Timeouts;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn mock_runner(parallel: usize) -> ScenarioRunner {
        let config = HarnessConfig::default()
            .with_base_url("https://uibank.test")
            .with_credentials(Credentials::new("johndoe", "Password123!"))
            .with_timeouts(Timeouts::new(200, 600, 5).with_settle(50))
            .with_scenario_timeout(10_000)
            .with_parallel(parallel);
        let factory = MockSessionFactory::new(config.credentials.clone());
        ScenarioRunner::new(Arc::new(factory), config)
    }

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_catalog_contents() {
            let ids: Vec<String> = catalog().iter().map(ScenarioDef::id).collect();
            assert_eq!(ids.len(), 15);
            assert_eq!(ids[0], "login/valid-credentials");
            assert!(ids.contains(&"new-account/empty-nickname".to_string()));
            assert_eq!(ids.last().map(String::as_str), Some("registration/valid-details"));
        }

        #[test]
        fn test_names_are_unique() {
            let names: HashSet<_> = catalog().iter().map(|d| d.name).collect();
            assert_eq!(names.len(), catalog().len());
        }

        #[test]
        fn test_suites_cover_catalog() {
            let total: usize = SUITES.iter().map(|s| suite(s).len()).sum();
            assert_eq!(total, catalog().len());
            assert_eq!(suite("account-summary").len(), 6);
        }

        #[test]
        fn test_find() {
            assert_eq!(find("apply-savings").unwrap().suite, "new-account");
            assert_eq!(find("login/invalid-credentials").unwrap().name, "invalid-credentials");
            let err = find("checkout").unwrap_err();
            assert!(matches!(err, PomError::UnknownScenario { .. }));
        }

        #[test]
        fn test_filter() {
            let navigation = filter("^account-summary/navigate").unwrap();
            assert_eq!(navigation.len(), 4);
            assert_eq!(filter("APPLY-").unwrap().len(), 4);
            assert!(filter("(").is_err());
        }
    }

    mod mock_run_tests {
        use super::*;

        #[tokio::test]
        async fn test_full_catalog_passes_against_mock_app() {
            let summary = mock_runner(4).run(&catalog()).await;
            for report in summary.failures() {
                panic!("{} did not pass: {:?}", report.id(), report.outcome);
            }
            assert_eq!(summary.passed(), 15);
        }

        #[tokio::test]
        async fn test_created_account_is_noted() {
            let summary = mock_runner(1).run(&[find("apply-checking").unwrap()]).await;
            let report = &summary.reports[0];
            assert_eq!(report.outcome, ScenarioOutcome::Passed);
            assert_eq!(report.diagnostics["account_id"], "7300001");
            assert!(report.diagnostics["account_name"].starts_with("MyChecking"));
            assert!(report.steps.iter().any(|s| s.name == "opening balance"));
        }

        #[tokio::test]
        async fn test_wrong_seeded_user_fails_at_login_step() {
            let config = HarnessConfig::default()
                .with_base_url("https://uibank.test")
                .with_timeouts(Timeouts::new(100, 300, 5).with_settle(30));
            let factory = MockSessionFactory::new(Credentials::new("someone", "else"));
            let summary = ScenarioRunner::new(Arc::new(factory), config)
                .run(&[find("help-section").unwrap()])
                .await;
            match &summary.reports[0].outcome {
                ScenarioOutcome::Failed { step, .. } => assert_eq!(step, "login"),
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
