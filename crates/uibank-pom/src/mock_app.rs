//! In-memory model of the UiBank application.
//!
//! [`uibank_app`] builds a [`MockDriver`] that serves every route the page
//! objects target, with the same landmarks, duplicate ids and transitions as
//! the live site. It backs the crate's own tests and the CLI's
//! `--driver mock` mode, so the whole scenario catalog can run without a
//! browser.

use async_trait::async_trait;
use std::sync::Arc;

use crate::driver::{ClickEffect, MockDriver, MockElement, MockState, PageDriver};
use crate::forms::Credentials;
use crate::result::PomResult;
use crate::scenario::SessionFactory;
use crate::session::{Session, Timeouts};
use crate::wait::UrlPattern;

const ACCOUNTS: &str = "/accounts";
const RESULTS: &str = "/accounts/account-create-results";
const SUCCESS: &str = "/register-account/success";

fn script(f: impl Fn(&mut MockState) + Send + Sync + 'static) -> ClickEffect {
    ClickEffect::Script(Arc::new(f))
}

fn goto(route: &str) -> ClickEffect {
    ClickEffect::Navigate(route.to_string())
}

fn input(id: &str) -> MockElement {
    MockElement::new("input").id(id)
}

fn select(id: &str, options: &[&str]) -> MockElement {
    MockElement::new("select").id(id).options(options)
}

fn login_screen(credentials: &Credentials) -> Vec<MockElement> {
    let expected = credentials.clone();
    vec![
        MockElement::new("h1").text("UiBank"),
        input("username"),
        input("password").attr("type", "password"),
        MockElement::new("button")
            .text("Sign In")
            .on_click(script(move |state| {
                let accepted = state.value_of("username") == expected.username
                    && state.value_of("password") == expected.password;
                if accepted {
                    state.reveal("mat-dialog-content");
                    state.reveal("agree");
                } else {
                    state.reveal("login-error");
                }
            })),
        MockElement::new("span")
            .css("login-error")
            .text("Error: login failed")
            .hidden(),
        MockElement::new("a")
            .attr("href", "/password-request")
            .text("Forgot Password?"),
        MockElement::new("a")
            .attr("href", "/register-account")
            .text("Register For Account")
            .on_click(goto("/register-account")),
        MockElement::new("mat-dialog-content")
            .css("mat-dialog-content")
            .text("Important Notice: this site is for testing purposes only.")
            .hidden(),
        MockElement::new("button")
            .css("agree")
            .text("I agree to the Privacy Policy")
            .hidden()
            .on_click(goto(ACCOUNTS)),
    ]
}

fn accounts_screen() -> Vec<MockElement> {
    vec![
        MockElement::new("h3").text("Welcome!"),
        MockElement::new("p").text("Here is your account summary:"),
        MockElement::new("p")
            .css("no-accounts")
            .text("No accounts at this time, apply for a new account today!"),
        MockElement::new("button")
            .text("Apply For New Account")
            .on_click(goto("/accounts/account-apply")),
        MockElement::new("h3").text("How can we help?"),
        MockElement::new("h5").text("Payment Center"),
        MockElement::new("a")
            .attr("href", "/accounts/transfer-money")
            .text("Transfer Funds")
            .on_click(goto("/accounts/transfer-money")),
        MockElement::new("h5").text("Loan Center"),
        MockElement::new("a")
            .id("applyForLoan")
            .text("Apply For A Loan")
            .on_click(goto("/loans")),
        MockElement::new("a")
            .id("applyForLoan")
            .text("Loan Status")
            .on_click(goto("/loans/lookup")),
    ]
}

fn open_account(state: &mut MockState) {
    let nickname = state.value_of("accountNickname").to_string();
    let kind = state.value_of("typeOfAccount").to_string();
    if nickname.is_empty() || kind.is_empty() {
        state.reveal("nickname-error");
        return;
    }

    let Some(summary) = state.screen_mut(ACCOUNTS) else {
        return;
    };
    let opened = summary
        .elements
        .iter()
        .filter(|e| e.has_key(".account-row"))
        .count();
    let id = format!("{}", 7_300_001 + opened);
    for element in summary.elements.iter_mut().filter(|e| e.has_key("no-accounts")) {
        element.visible = false;
    }
    summary.elements.push(
        MockElement::new("div")
            .css(".account-row")
            .text(format!("{nickname} ...{} $100.00", &id[id.len() - 4..])),
    );
    summary
        .elements
        .push(MockElement::new("strong").text(nickname.clone()));

    if let Some(results) = state.screen_mut(RESULTS) {
        for element in &mut results.elements {
            if element.has_key("accountId") {
                element.text.clone_from(&id);
            } else if element.has_key("accountName") {
                element.text.clone_from(&nickname);
            }
        }
    }
    state.navigate(RESULTS);
}

fn apply_screen() -> Vec<MockElement> {
    vec![
        MockElement::new("a")
            .css("div.card-header a")
            .text("arrow_back")
            .on_click(goto(ACCOUNTS)),
        MockElement::new("h1").text("Apply For A New Account"),
        MockElement::new("p").text("We need to gather some more details."),
        input("accountNickname"),
        select("typeOfAccount", &["checking", "savings"]),
        MockElement::new("mat-error")
            .css("nickname-error")
            .text("Account nickname is required")
            .hidden(),
        MockElement::new("button").text("Apply").on_click(script(open_account)),
    ]
}

fn results_screen() -> Vec<MockElement> {
    vec![
        MockElement::new("a")
            .css("div.card-header a")
            .text("arrow_back")
            .on_click(goto(ACCOUNTS)),
        MockElement::new("h1").text("Congratulations!"),
        MockElement::new("p").text("You've been approved for a new account!"),
        MockElement::new("span").text("Your new account id is:"),
        MockElement::new("span").id("accountId"),
        MockElement::new("span").text("Account Name:"),
        MockElement::new("span").id("accountName"),
        MockElement::new("button")
            .id("viewAccounts")
            .text("View Your Accounts")
            .on_click(goto(ACCOUNTS)),
    ]
}

fn register(state: &mut MockState) {
    let username = state.value_of("username").to_string();
    let complete = ["email", "password", "firstName", "lastName", "username"]
        .iter()
        .all(|id| !state.value_of(id).is_empty());
    if complete && state.is_checked("agreeCheckbox") {
        state.navigate(&format!("{SUCCESS}/{username}"));
    } else {
        state.reveal("registration-error");
    }
}

fn registration_screen() -> Vec<MockElement> {
    vec![
        MockElement::new("a")
            .css("div.back-container a")
            .text("arrow_back")
            .on_click(goto("/")),
        input("email").attr("type", "email"),
        input("password").attr("type", "password"),
        input("firstName"),
        input("lastName"),
        input("middleName"),
        select("sex", &["male", "female"]),
        select("title", &["mr", "ms", "mrs"]),
        select("employmentStatus", &["Full-time", "Part-time", "Unemployed"]),
        input("age"),
        select("maritalStatus", &["Single", "Married", "Divorced", "Widowed"]),
        input("numberOfDependents").attr("type", "number"),
        input("username"),
        input("agreeCheckbox").attr("type", "checkbox"),
        MockElement::new("a")
            .attr("href", "/privacy-policy")
            .text("Privacy Policy"),
        MockElement::new("span")
            .css("registration-error")
            .text("Please complete all required fields")
            .hidden(),
        MockElement::new("button").text("Register").on_click(script(register)),
    ]
}

fn success_screen() -> Vec<MockElement> {
    vec![
        MockElement::new("h2").text("Welcome To The UiBank Family!"),
        MockElement::new("h5")
            .text("Before you can apply for an account we need you to verify your email!"),
        MockElement::new("p")
            .css("p.text-white")
            .text("Check your inbox for a verification link."),
    ]
}

/// UiBank model where `credentials` is the only registered user
#[must_use]
pub fn uibank_app(credentials: &Credentials) -> MockDriver {
    MockDriver::new()
        .with_screen("/", login_screen(credentials))
        .with_screen(ACCOUNTS, accounts_screen())
        .with_screen("/accounts/account-apply", apply_screen())
        .with_screen(RESULTS, results_screen())
        .with_screen(
            "/accounts/transfer-money",
            vec![MockElement::new("h1").text("Transfer Funds")],
        )
        .with_screen("/loans", vec![MockElement::new("h1").text("Loan Application")])
        .with_screen(
            "/loans/lookup",
            vec![MockElement::new("h1").text("Loan Status Lookup")],
        )
        .with_screen("/register-account", registration_screen())
        .with_screen_pattern(
            SUCCESS,
            UrlPattern::glob("*/register-account/success/*"),
            success_screen(),
        )
}

/// Session over `driver` with timeouts sized for in-memory runs
#[must_use]
pub fn fast_session(driver: MockDriver) -> Session {
    Session::new(Arc::new(driver), "https://uibank.test")
        .with_timeouts(Timeouts::new(150, 500, 5).with_settle(40))
}

/// Hands every scenario a fresh [`uibank_app`]
#[derive(Debug, Clone)]
pub struct MockSessionFactory {
    credentials: Credentials,
}

impl MockSessionFactory {
    /// Factory whose apps accept `credentials`
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    async fn open(&self) -> PomResult<Arc<dyn PageDriver>> {
        Ok(Arc::new(uibank_app(&self.credentials)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::locator::{AriaRole, Selector};

    #[tokio::test]
    async fn test_every_declared_route_is_served() {
        let driver = uibank_app(&Credentials::new("u", "p"));
        for route in [
            "/",
            "/accounts",
            "/accounts/account-apply",
            "/accounts/account-create-results",
            "/accounts/transfer-money",
            "/loans",
            "/loans/lookup",
            "/register-account",
            "/register-account/success/jdoe",
        ] {
            driver
                .navigate(&format!("https://uibank.test{route}"))
                .await
                .unwrap();
            let visible = driver.query_all(&Selector::css("h1")).await.unwrap().len()
                + driver.query_all(&Selector::css("h2")).await.unwrap().len()
                + driver.query_all(&Selector::css("h3")).await.unwrap().len()
                + driver.query_all(&Selector::css("button")).await.unwrap().len();
            assert!(visible > 0, "{route} is empty");
        }
    }

    #[tokio::test]
    async fn test_open_account_updates_templates() {
        let driver = uibank_app(&Credentials::new("u", "p"));
        driver
            .navigate("https://uibank.test/accounts/account-apply")
            .await
            .unwrap();
        driver
            .fill(&Selector::css("#accountNickname"), 0, "Rainy Day")
            .await
            .unwrap();
        driver
            .select_option(&Selector::css("#typeOfAccount"), 0, "savings")
            .await
            .unwrap();
        driver
            .click(&Selector::role(AriaRole::Button, "Apply"), 0)
            .await
            .unwrap();

        assert!(driver.current_url().await.unwrap().ends_with(RESULTS));
        let name = driver.query_all(&Selector::css("#accountName")).await.unwrap();
        assert_eq!(name[0].text.as_deref(), Some("Rainy Day"));

        driver.navigate("https://uibank.test/accounts").await.unwrap();
        let rows = driver.query_all(&Selector::css(".account-row")).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text.as_deref(), Some("Rainy Day ...0001 $100.00"));
    }

    #[tokio::test]
    async fn test_factory_sessions_are_independent() {
        let factory = MockSessionFactory::new(Credentials::new("u", "p"));
        let a = factory.open().await.unwrap();
        let b = factory.open().await.unwrap();
        a.navigate("https://uibank.test/loans").await.unwrap();
        assert_eq!(b.current_url().await.unwrap(), "about:blank");
    }
}
