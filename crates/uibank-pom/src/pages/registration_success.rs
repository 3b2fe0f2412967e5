//! Registration success screen (`/register-account/success/{username}`).

use crate::locator::{Locator, LocatorSpec, Selector};
use crate::pages::PageObject;
use crate::result::PomResult;
use crate::screen::Screen;
use crate::session::Session;

/// Welcome heading (h2); the screen's landmark
pub static WELCOME_HEADING: LocatorSpec = LocatorSpec::new("welcome_heading", Selector::css("h2"));
/// Verify-email heading (h5)
pub static VERIFY_EMAIL_HEADING: LocatorSpec =
    LocatorSpec::new("verify_email_heading", Selector::css("h5"));
/// Inbox hint paragraph
pub static INBOX_HINT: LocatorSpec = LocatorSpec::new("inbox_hint", Selector::css("p.text-white"));

static REGISTRY: [&LocatorSpec; 3] = [&WELCOME_HEADING, &VERIFY_EMAIL_HEADING, &INBOX_HINT];

/// Registration success page object
#[derive(Debug, Clone)]
pub struct RegistrationSuccessPage {
    session: Session,
    /// Welcome heading
    pub welcome_heading: Locator,
    /// Verify-email heading
    pub verify_email_heading: Locator,
    /// Inbox hint
    pub inbox_hint: Locator,
}

impl PageObject for RegistrationSuccessPage {
    const SCREEN: Screen = Screen::RegistrationSuccess;

    fn registry() -> &'static [&'static LocatorSpec] {
        &REGISTRY
    }

    fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            welcome_heading: session.locate(&WELCOME_HEADING),
            verify_email_heading: session.locate(&VERIFY_EMAIL_HEADING),
            inbox_hint: session.locate(&INBOX_HINT),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

impl RegistrationSuccessPage {
    /// Username from the current route, if on this screen
    pub async fn registered_username(&self) -> PomResult<Option<String>> {
        let route = self.session.route().await?;
        Ok(route
            .strip_prefix("/register-account/success/")
            .map(|rest| rest.trim_end_matches('/').to_string())
            .filter(|name| !name.is_empty()))
    }

    /// Welcome heading text
    pub async fn welcome_heading_text(&self) -> PomResult<String> {
        self.welcome_heading.text_content().await
    }
}
