//! Declared navigation graph.
//!
//! Every UiBank screen the harness knows about, the route it lives on, the
//! landmark element that proves it rendered, and the table of user actions
//! that move between screens. Page objects never construct each other; the
//! scenario runner looks targets up here.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::locator::LocatorSpec;
use crate::pages::{
    account_create_results, account_summary, login, new_account, registration,
    registration_success,
};
use crate::wait::UrlPattern;

/// A screen of the application, identified by its route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Screen {
    /// `/`
    Login,
    /// `/accounts`
    AccountSummary,
    /// `/accounts/account-apply`
    NewAccount,
    /// `/accounts/account-create-results`
    AccountCreateResults,
    /// `/accounts/transfer-money`
    TransferFunds,
    /// `/loans`
    LoanCenter,
    /// `/loans/lookup`
    LoanStatus,
    /// `/register-account`
    Registration,
    /// `/register-account/success/{username}`
    RegistrationSuccess,
}

impl Screen {
    /// Every screen, in route order
    pub const ALL: [Self; 9] = [
        Self::Login,
        Self::AccountSummary,
        Self::NewAccount,
        Self::AccountCreateResults,
        Self::TransferFunds,
        Self::LoanCenter,
        Self::LoanStatus,
        Self::Registration,
        Self::RegistrationSuccess,
    ];

    /// Route template
    #[must_use]
    pub const fn route(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::AccountSummary => "/accounts",
            Self::NewAccount => "/accounts/account-apply",
            Self::AccountCreateResults => "/accounts/account-create-results",
            Self::TransferFunds => "/accounts/transfer-money",
            Self::LoanCenter => "/loans",
            Self::LoanStatus => "/loans/lookup",
            Self::Registration => "/register-account",
            Self::RegistrationSuccess => "/register-account/success/{username}",
        }
    }

    /// Whether the route can be opened directly (no path parameters)
    #[must_use]
    pub const fn has_fixed_route(&self) -> bool {
        !matches!(self, Self::RegistrationSuccess)
    }

    /// Pattern matched against the current URL
    #[must_use]
    pub fn pattern(&self) -> UrlPattern {
        match self {
            Self::RegistrationSuccess => UrlPattern::regex(r"/register-account/success/[^/?#]+/?([?#].*)?$"),
            other => UrlPattern::path(other.route()),
        }
    }

    /// Element whose visibility proves the screen rendered
    #[must_use]
    pub fn landmark(&self) -> Option<&'static LocatorSpec> {
        match self {
            Self::Login => Some(&login::SIGN_IN_BUTTON),
            Self::AccountSummary => Some(&account_summary::WELCOME_HEADING),
            Self::NewAccount => Some(&new_account::PAGE_TITLE),
            Self::AccountCreateResults => Some(&account_create_results::CONGRATULATIONS_HEADING),
            Self::Registration => Some(&registration::REGISTER_BUTTON),
            Self::RegistrationSuccess => Some(&registration_success::WELCOME_HEADING),
            Self::TransferFunds | Self::LoanCenter | Self::LoanStatus => None,
        }
    }

    /// Screen whose pattern matches `url`
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.pattern().matches(url))
    }

    /// Kebab-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::AccountSummary => "account-summary",
            Self::NewAccount => "new-account",
            Self::AccountCreateResults => "account-create-results",
            Self::TransferFunds => "transfer-funds",
            Self::LoanCenter => "loan-center",
            Self::LoanStatus => "loan-status",
            Self::Registration => "registration",
            Self::RegistrationSuccess => "registration-success",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User action that leaves a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavAction {
    /// Sign in on the login screen
    SubmitLogin,
    /// "Register For Account" link
    RegisterForAccount,
    /// "Apply For New Account" button
    ApplyForNewAccount,
    /// "Transfer Funds" link
    TransferFunds,
    /// "Apply For A Loan" link
    ApplyForLoan,
    /// "Loan Status" link
    LoanStatus,
    /// Apply button of the new-account form
    SubmitNewAccount,
    /// Back link of the new-account form
    NewAccountBack,
    /// "View Your Accounts" button
    ViewYourAccounts,
    /// Back link of the results screen
    ResultsBack,
    /// Register button of the registration form
    SubmitRegistration,
    /// Back link of the registration form
    RegistrationBack,
}

impl NavAction {
    /// Kebab-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SubmitLogin => "submit-login",
            Self::RegisterForAccount => "register-for-account",
            Self::ApplyForNewAccount => "apply-for-new-account",
            Self::TransferFunds => "transfer-funds",
            Self::ApplyForLoan => "apply-for-loan",
            Self::LoanStatus => "loan-status",
            Self::SubmitNewAccount => "submit-new-account",
            Self::NewAccountBack => "new-account-back",
            Self::ViewYourAccounts => "view-your-accounts",
            Self::ResultsBack => "results-back",
            Self::SubmitRegistration => "submit-registration",
            Self::RegistrationBack => "registration-back",
        }
    }
}

impl fmt::Display for NavAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One edge of the navigation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Screen the action starts on
    pub from: Screen,
    /// Action taken
    pub action: NavAction,
    /// Screen the action lands on when it succeeds
    pub to: Screen,
}

const fn edge(from: Screen, action: NavAction, to: Screen) -> Transition {
    Transition { from, action, to }
}

/// Declared transitions of the application
pub const TRANSITIONS: &[Transition] = &[
    edge(Screen::Login, NavAction::SubmitLogin, Screen::AccountSummary),
    edge(Screen::Login, NavAction::RegisterForAccount, Screen::Registration),
    edge(Screen::AccountSummary, NavAction::ApplyForNewAccount, Screen::NewAccount),
    edge(Screen::AccountSummary, NavAction::TransferFunds, Screen::TransferFunds),
    edge(Screen::AccountSummary, NavAction::ApplyForLoan, Screen::LoanCenter),
    edge(Screen::AccountSummary, NavAction::LoanStatus, Screen::LoanStatus),
    edge(Screen::NewAccount, NavAction::SubmitNewAccount, Screen::AccountCreateResults),
    edge(Screen::NewAccount, NavAction::NewAccountBack, Screen::AccountSummary),
    edge(Screen::AccountCreateResults, NavAction::ViewYourAccounts, Screen::AccountSummary),
    edge(Screen::AccountCreateResults, NavAction::ResultsBack, Screen::AccountSummary),
    edge(Screen::Registration, NavAction::SubmitRegistration, Screen::RegistrationSuccess),
    edge(Screen::Registration, NavAction::RegistrationBack, Screen::Login),
];

/// Queries over a transition table
#[derive(Debug, Clone, Copy)]
pub struct NavigationGraph {
    transitions: &'static [Transition],
}

impl Default for NavigationGraph {
    fn default() -> Self {
        Self::new(TRANSITIONS)
    }
}

impl NavigationGraph {
    /// Graph over an explicit table
    #[must_use]
    pub const fn new(transitions: &'static [Transition]) -> Self {
        Self { transitions }
    }

    /// All edges
    #[must_use]
    pub const fn transitions(&self) -> &'static [Transition] {
        self.transitions
    }

    /// Where `action` leads from `from`, if declared
    #[must_use]
    pub fn target(&self, from: Screen, action: NavAction) -> Option<Screen> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.action == action)
            .map(|t| t.to)
    }

    /// Declared actions leaving `from`
    #[must_use]
    pub fn actions_from(&self, from: Screen) -> Vec<(NavAction, Screen)> {
        self.transitions
            .iter()
            .filter(|t| t.from == from)
            .map(|t| (t.action, t.to))
            .collect()
    }

    /// Shortest action sequence from `from` to `to` (empty when equal)
    #[must_use]
    pub fn path(&self, from: Screen, to: Screen) -> Option<Vec<NavAction>> {
        let mut previous: HashMap<Screen, (Screen, NavAction)> = HashMap::new();
        let mut queue = VecDeque::from([from]);
        while let Some(screen) = queue.pop_front() {
            if screen == to {
                let mut actions = Vec::new();
                let mut cursor = to;
                while cursor != from {
                    let (prev, action) = previous[&cursor];
                    actions.push(action);
                    cursor = prev;
                }
                actions.reverse();
                return Some(actions);
            }
            for (action, next) in self.actions_from(screen) {
                if next != from && !previous.contains_key(&next) {
                    previous.insert(next, (screen, action));
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod screen_tests {
        use super::*;

        #[test]
        fn test_from_url() {
            let base = "https://uibank.uipath.com";
            assert_eq!(Screen::from_url(&format!("{base}/")), Some(Screen::Login));
            assert_eq!(Screen::from_url(base), Some(Screen::Login));
            assert_eq!(
                Screen::from_url(&format!("{base}/accounts/account-apply")),
                Some(Screen::NewAccount)
            );
            assert_eq!(
                Screen::from_url(&format!("{base}/register-account/success/johndoe1")),
                Some(Screen::RegistrationSuccess)
            );
            assert_eq!(Screen::from_url(&format!("{base}/password-request")), None);
        }

        #[test]
        fn test_success_pattern_needs_username() {
            let pattern = Screen::RegistrationSuccess.pattern();
            assert!(!pattern.matches("https://uibank.uipath.com/register-account/success/"));
            assert!(!pattern.matches("https://uibank.uipath.com/register-account"));
        }

        #[test]
        fn test_landmarks() {
            assert!(Screen::Login.landmark().is_some());
            assert!(Screen::LoanCenter.landmark().is_none());
            assert!(!Screen::RegistrationSuccess.has_fixed_route());
        }

        #[test]
        fn test_serde_names_match_display() {
            for screen in Screen::ALL {
                let json = serde_json::to_string(&screen).unwrap();
                assert_eq!(json, format!("\"{screen}\""));
            }
        }
    }

    mod graph_tests {
        use super::*;

        #[test]
        fn test_target() {
            let graph = NavigationGraph::default();
            assert_eq!(
                graph.target(Screen::AccountSummary, NavAction::LoanStatus),
                Some(Screen::LoanStatus)
            );
            assert_eq!(graph.target(Screen::Login, NavAction::LoanStatus), None);
        }

        #[test]
        fn test_every_edge_is_unique() {
            for (i, a) in TRANSITIONS.iter().enumerate() {
                for b in &TRANSITIONS[i + 1..] {
                    assert!(!(a.from == b.from && a.action == b.action), "{a:?} / {b:?}");
                }
            }
        }

        #[test]
        fn test_actions_from() {
            let graph = NavigationGraph::default();
            assert_eq!(graph.actions_from(Screen::AccountSummary).len(), 4);
            assert!(graph.actions_from(Screen::LoanStatus).is_empty());
        }

        #[test]
        fn test_path() {
            let graph = NavigationGraph::default();
            assert_eq!(
                graph.path(Screen::Login, Screen::AccountCreateResults).unwrap(),
                vec![
                    NavAction::SubmitLogin,
                    NavAction::ApplyForNewAccount,
                    NavAction::SubmitNewAccount
                ]
            );
            assert!(graph.path(Screen::Login, Screen::Login).unwrap().is_empty());
            assert!(graph.path(Screen::LoanStatus, Screen::Login).is_none());
        }
    }
}
