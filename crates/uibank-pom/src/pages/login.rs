//! Login screen (`/`).

use crate::locator::{AriaRole, Locator, LocatorSpec, Selector};
use crate::pages::PageObject;
use crate::result::{PomError, PomResult};
use crate::screen::Screen;
use crate::session::Session;
use crate::wait::poll_for;

/// `#username`
pub static USERNAME_INPUT: LocatorSpec =
    LocatorSpec::new("username_input", Selector::css("#username"));
/// `#password`
pub static PASSWORD_INPUT: LocatorSpec =
    LocatorSpec::new("password_input", Selector::css("#password"));
/// Sign In button; also the screen's landmark
pub static SIGN_IN_BUTTON: LocatorSpec =
    LocatorSpec::new("sign_in_button", Selector::role(AriaRole::Button, "Sign In"));
/// Forgot password link
pub static FORGOT_PASSWORD_LINK: LocatorSpec = LocatorSpec::new(
    "forgot_password_link",
    Selector::attribute("href", "/password-request"),
);
/// Register For Account link
pub static REGISTER_LINK: LocatorSpec = LocatorSpec::new(
    "register_for_account_link",
    Selector::attribute("href", "/register-account"),
);
/// "Important Notice" dialog body
pub static PRIVACY_DIALOG: LocatorSpec =
    LocatorSpec::new("privacy_dialog", Selector::css("mat-dialog-content"));
/// Dialog button accepting the privacy policy
pub static AGREE_BUTTON: LocatorSpec = LocatorSpec::scoped(
    "agree_button",
    Selector::css("button"),
    "I agree to the Privacy Policy",
);
/// Error shown after a rejected login
pub static LOGIN_FAILED_MESSAGE: LocatorSpec =
    LocatorSpec::first_match("login_failed_message", Selector::text("login failed"));

static REGISTRY: [&LocatorSpec; 8] = [
    &USERNAME_INPUT,
    &PASSWORD_INPUT,
    &SIGN_IN_BUTTON,
    &FORGOT_PASSWORD_LINK,
    &REGISTER_LINK,
    &PRIVACY_DIALOG,
    &AGREE_BUTTON,
    &LOGIN_FAILED_MESSAGE,
];

/// What the application showed after Sign In
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Privacy notice appeared and was accepted
    Accepted,
    /// The login-failed message appeared
    Rejected,
    /// Neither appeared within the action timeout
    NoResponse,
}

/// Login page object
#[derive(Debug, Clone)]
pub struct LoginPage {
    session: Session,
    /// `#username`
    pub username_input: Locator,
    /// `#password`
    pub password_input: Locator,
    /// Sign In button
    pub sign_in_button: Locator,
    /// Forgot password link
    pub forgot_password_link: Locator,
    /// Register For Account link
    pub register_for_account_link: Locator,
    /// Privacy notice dialog
    pub privacy_dialog: Locator,
    /// Privacy notice agree button
    pub agree_button: Locator,
    /// Login failed message
    pub login_failed_message: Locator,
}

impl PageObject for LoginPage {
    const SCREEN: Screen = Screen::Login;

    fn registry() -> &'static [&'static LocatorSpec] {
        &REGISTRY
    }

    fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            username_input: session.locate(&USERNAME_INPUT),
            password_input: session.locate(&PASSWORD_INPUT),
            sign_in_button: session.locate(&SIGN_IN_BUTTON),
            forgot_password_link: session.locate(&FORGOT_PASSWORD_LINK),
            register_for_account_link: session.locate(&REGISTER_LINK),
            privacy_dialog: session.locate(&PRIVACY_DIALOG),
            agree_button: session.locate(&AGREE_BUTTON),
            login_failed_message: session.locate(&LOGIN_FAILED_MESSAGE),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

impl LoginPage {
    /// Open the login route
    pub async fn goto(&self) -> PomResult<()> {
        self.session.goto(Screen::Login.route()).await
    }

    /// Fill both fields, sign in, and accept the privacy notice if it shows up
    pub async fn login(&self, username: &str, password: &str) -> PomResult<LoginOutcome> {
        self.username_input.fill(username).await?;
        self.password_input.fill(password).await?;
        self.sign_in_button.click().await?;

        let options = self.privacy_dialog.wait_options();
        let response = poll_for(&options, "privacy notice or login error", || async {
            if self.privacy_dialog.is_visible().await? {
                return Ok(Some(LoginOutcome::Accepted));
            }
            if self.login_failed_message.is_visible().await? {
                return Ok(Some(LoginOutcome::Rejected));
            }
            Ok::<_, PomError>(None)
        })
        .await;

        match response {
            Ok((LoginOutcome::Accepted, _)) => {
                self.agree_button.click().await?;
                tracing::debug!(username, "privacy notice accepted");
                Ok(LoginOutcome::Accepted)
            }
            Ok((outcome, _)) => Ok(outcome),
            Err(PomError::Timeout { .. }) => Ok(LoginOutcome::NoResponse),
            Err(e) => Err(e),
        }
    }

    /// Whether the login-failed message is visible right now
    pub async fn login_error_visible(&self) -> PomResult<bool> {
        self.login_failed_message.is_visible().await
    }

    /// Follow the Register For Account link
    pub async fn click_register_link(&self) -> PomResult<()> {
        self.register_for_account_link.click().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::forms::Credentials;
    use crate::mock_app::{fast_session, uibank_app};

    fn creds() -> Credentials {
        Credentials::new("johndoe", "Password123!")
    }

    #[tokio::test]
    async fn test_valid_login_reaches_accounts() {
        let session = fast_session(uibank_app(&creds()));
        let page = LoginPage::new(&session);
        page.goto().await.unwrap();
        assert!(page.is_page_visible().await.unwrap());

        let outcome = page.login("johndoe", "Password123!").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Accepted);
        assert_eq!(session.route().await.unwrap(), "/accounts");
    }

    #[tokio::test]
    async fn test_invalid_login_stays_on_root() {
        let session = fast_session(uibank_app(&creds()));
        let page = LoginPage::new(&session);
        page.goto().await.unwrap();

        let outcome = page.login("invaliduser", "invalidpassword").await.unwrap();
        assert_eq!(outcome, LoginOutcome::Rejected);
        assert!(page.login_error_visible().await.unwrap());
        assert_eq!(session.route().await.unwrap(), "/");
    }

    #[tokio::test]
    async fn test_accessors_before_navigation() {
        let session = fast_session(uibank_app(&creds()));
        let page = LoginPage::new(&session);
        assert!(!page.login_error_visible().await.unwrap());
        assert!(!page.is_page_visible().await.unwrap());
        assert!(page.username_input.input_value().await.is_err());
    }

    #[tokio::test]
    async fn test_register_link() {
        let session = fast_session(uibank_app(&creds()));
        let page = LoginPage::new(&session);
        page.goto().await.unwrap();
        page.click_register_link().await.unwrap();
        assert_eq!(session.route().await.unwrap(), "/register-account");
    }

    #[test]
    fn test_registry_lookup() {
        assert_eq!(LoginPage::registry().len(), 8);
        let session = fast_session(uibank_app(&creds()));
        let page = LoginPage::new(&session);
        assert!(page.locator("agree_button").is_some());
        assert!(page.locator("nope").is_none());
        assert_eq!(page.page_name(), "login");
    }
}
