//! UiBank POM: Page-Object Harness for the UiBank Web App
//!
//! Page objects wrap the locators and user actions of one UiBank screen;
//! scenarios compose them into end-to-end user flows (login, registration,
//! account creation, navigation checks).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     UIBANK-POM Architecture                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Scenario   │    │ Page       │    │ PageDriver │            │
//! │   │ Runner     │───►│ Objects    │───►│ (chromium  │            │
//! │   │ + Screens  │    │ + Forms    │    │  or mock)  │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use uibank_pom::prelude::*;
//!
//! let config = HarnessConfig::default().apply_env();
//! let factory = ChromiumSessionFactory::launch(config.browser.clone()).await?;
//! let summary = ScenarioRunner::new(Arc::new(factory), config)
//!     .run(&scenarios::catalog())
//!     .await;
//! assert!(summary.all_passed());
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod browser;
mod config;
mod driver;
mod expect;
mod forms;
#[allow(clippy::cast_possible_truncation)]
mod locator;
mod mock_app;
mod result;
#[allow(clippy::cast_possible_truncation)]
mod scenario;
mod screen;
mod session;
mod wait;

/// Page Object Model, one module per screen
pub mod pages;

/// Catalog of named end-to-end scenarios
pub mod scenarios;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumSessionFactory};
pub use config::{
    HarnessConfig, DEFAULT_BASE_URL, DEFAULT_SCENARIO_TIMEOUT_MS, ENV_BASE_URL, ENV_HEADLESS,
    ENV_PASSWORD, ENV_USERNAME,
};
pub use driver::{
    ClickEffect, ElementHandle, MockDriver, MockElement, MockScreen, MockScript, MockState,
    PageDriver,
};
pub use expect::{expect, expect_page, Expect, ExpectAssertion, ExpectPage};
pub use forms::{
    unique_email, unique_nickname, unique_username, AccountType, Credentials, FormStep,
    NewAccountField, NewAccountForm, RegistrationField, RegistrationForm,
};
pub use locator::{
    AriaRole, Disambiguation, Locator, LocatorSpec, Selector, WaitState,
};
pub use mock_app::{fast_session, uibank_app, MockSessionFactory};
pub use result::{ErrorKind, PomError, PomResult};
pub use scenario::{
    Observer, RunSummary, ScenarioContext, ScenarioDef, ScenarioFn, ScenarioOutcome,
    ScenarioReport, ScenarioRunner, SessionFactory, StepRecord,
};
pub use screen::{NavAction, NavigationGraph, Screen, Transition, TRANSITIONS};
pub use session::{Session, Timeouts};
pub use wait::{
    poll_for, url_path, wait_until, UrlPattern, WaitOptions, WaitResult,
    DEFAULT_ACTION_TIMEOUT_MS, DEFAULT_NAVIGATION_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::pages::{
        AccountCreateResultsPage, AccountSummary, AccountSummaryPage, LoginOutcome, LoginPage,
        NewAccountPage, PageObject, RegistrationPage, RegistrationSuccessPage,
    };
    pub use super::scenarios;
    pub use super::{
        expect, expect_page, AccountType, BrowserConfig, Credentials, HarnessConfig, Locator,
        LocatorSpec, MockSessionFactory, NavAction, NewAccountForm, PageDriver, PomError,
        PomResult, RegistrationForm, RunSummary, ScenarioContext, ScenarioOutcome,
        ScenarioRunner, Screen, Selector, Session, SessionFactory, Timeouts, UrlPattern,
    };
    #[cfg(feature = "browser")]
    pub use super::{ChromiumDriver, ChromiumSessionFactory};
    pub use std::sync::Arc;
}
