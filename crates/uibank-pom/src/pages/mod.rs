//! Page Object Model
//!
//! One module per UiBank screen. Each module declares its locator registry
//! as `pub static` [`LocatorSpec`]s and a page struct that binds them to a
//! [`Session`] at construction time. Action methods return once the engine
//! applied the action; accessors read text, visibility or parsed rows and
//! tolerate zero matches.
//!
//! Page objects never reference each other; cross-screen sequencing lives in
//! [`crate::screen`] and [`crate::scenario`].

use async_trait::async_trait;

use crate::forms::FormStep;
use crate::locator::{Locator, LocatorSpec};
use crate::result::PomResult;
use crate::screen::Screen;
use crate::session::Session;

pub mod account_create_results;
pub mod account_summary;
pub mod login;
pub mod new_account;
pub mod registration;
pub mod registration_success;

pub use account_create_results::AccountCreateResultsPage;
pub use account_summary::{AccountSummary, AccountSummaryPage};
pub use login::{LoginOutcome, LoginPage};
pub use new_account::NewAccountPage;
pub use registration::RegistrationPage;
pub use registration_success::RegistrationSuccessPage;

/// A page object bound to one screen
#[async_trait]
pub trait PageObject: Sized + Send + Sync {
    /// Screen this page object drives
    const SCREEN: Screen;

    /// Locator registry, in declaration order
    fn registry() -> &'static [&'static LocatorSpec];

    /// Bind every registry entry to `session`
    fn new(session: &Session) -> Self;

    /// Session the page is bound to
    fn session(&self) -> &Session;

    /// Look a registry entry up by name and bind it
    fn locator(&self, name: &str) -> Option<Locator> {
        Self::registry()
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| self.session().locate(spec))
    }

    /// Whether the screen's landmark is visible right now (route match when it has none)
    async fn is_page_visible(&self) -> PomResult<bool> {
        match Self::SCREEN.landmark() {
            Some(spec) => self.session().locate(spec).is_visible().await,
            None => Ok(Self::SCREEN
                .pattern()
                .matches(&self.session().current_url().await?)),
        }
    }

    /// Page name for logs
    fn page_name(&self) -> &'static str {
        Self::SCREEN.as_str()
    }
}

/// Replay form steps against the controls `control` maps them to
pub(crate) async fn apply_steps<F: Copy + Send + Sync>(
    steps: Vec<FormStep<F>>,
    control: impl Fn(F) -> &'static LocatorSpec + Send + Sync,
    session: &Session,
) -> PomResult<()> {
    for step in steps {
        let locator = session.locate(control(step.field()));
        match step {
            FormStep::Fill(_, value) => locator.fill(&value).await?,
            FormStep::Select(_, value) => locator.select_option(&value).await?,
            FormStep::Check(_) => locator.check().await?,
        }
    }
    Ok(())
}
