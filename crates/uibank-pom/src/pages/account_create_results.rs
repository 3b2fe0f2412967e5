//! Account creation results screen (`/accounts/account-create-results`).

use crate::locator::{Locator, LocatorSpec, Selector};
use crate::pages::PageObject;
use crate::result::PomResult;
use crate::screen::Screen;
use crate::session::Session;

/// Back arrow in the card header
pub static BACK_BUTTON: LocatorSpec =
    LocatorSpec::first_match("back_button", Selector::css("div.card-header a"));
/// "Congratulations!" (h1); the screen's landmark
pub static CONGRATULATIONS_HEADING: LocatorSpec = LocatorSpec::new(
    "congratulations_heading",
    Selector::heading("Congratulations!", 1),
);
/// Approval message
pub static APPROVED_MESSAGE: LocatorSpec = LocatorSpec::new(
    "approved_message",
    Selector::text("You've been approved for a new account!"),
);
/// Account id label
pub static ACCOUNT_ID_LABEL: LocatorSpec =
    LocatorSpec::new("account_id_label", Selector::text("Your new account id is:"));
/// `#accountId`
pub static ACCOUNT_ID: LocatorSpec = LocatorSpec::new("account_id", Selector::css("#accountId"));
/// Account name label
pub static ACCOUNT_NAME_LABEL: LocatorSpec =
    LocatorSpec::new("account_name_label", Selector::text("Account Name:"));
/// `#accountName`
pub static ACCOUNT_NAME: LocatorSpec =
    LocatorSpec::new("account_name", Selector::css("#accountName"));
/// `#viewAccounts`
pub static VIEW_ACCOUNTS_BUTTON: LocatorSpec =
    LocatorSpec::new("view_your_accounts_button", Selector::css("#viewAccounts"));

static REGISTRY: [&LocatorSpec; 8] = [
    &BACK_BUTTON,
    &CONGRATULATIONS_HEADING,
    &APPROVED_MESSAGE,
    &ACCOUNT_ID_LABEL,
    &ACCOUNT_ID,
    &ACCOUNT_NAME_LABEL,
    &ACCOUNT_NAME,
    &VIEW_ACCOUNTS_BUTTON,
];

/// Results page object
#[derive(Debug, Clone)]
pub struct AccountCreateResultsPage {
    session: Session,
    /// Back link
    pub back_button: Locator,
    /// Congratulations heading
    pub congratulations_heading: Locator,
    /// Approval message
    pub approved_message: Locator,
    /// Account id label
    pub account_id_label: Locator,
    /// Account id value
    pub account_id_span: Locator,
    /// Account name label
    pub account_name_label: Locator,
    /// Account name value
    pub account_name_span: Locator,
    /// View Your Accounts button
    pub view_your_accounts_button: Locator,
}

impl PageObject for AccountCreateResultsPage {
    const SCREEN: Screen = Screen::AccountCreateResults;

    fn registry() -> &'static [&'static LocatorSpec] {
        &REGISTRY
    }

    fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            back_button: session.locate(&BACK_BUTTON),
            congratulations_heading: session.locate(&CONGRATULATIONS_HEADING),
            approved_message: session.locate(&APPROVED_MESSAGE),
            account_id_label: session.locate(&ACCOUNT_ID_LABEL),
            account_id_span: session.locate(&ACCOUNT_ID),
            account_name_label: session.locate(&ACCOUNT_NAME_LABEL),
            account_name_span: session.locate(&ACCOUNT_NAME),
            view_your_accounts_button: session.locate(&VIEW_ACCOUNTS_BUTTON),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

impl AccountCreateResultsPage {
    /// Click the back arrow
    pub async fn click_back_button(&self) -> PomResult<()> {
        self.back_button.click().await
    }

    /// Click View Your Accounts
    pub async fn click_view_your_accounts_button(&self) -> PomResult<()> {
        self.view_your_accounts_button.click().await
    }

    /// Congratulations heading text
    pub async fn congratulations_heading_text(&self) -> PomResult<String> {
        self.congratulations_heading.text_content().await
    }

    /// Approval message text
    pub async fn approved_message_text(&self) -> PomResult<String> {
        self.approved_message.text_content().await
    }

    /// New account id, trimmed
    pub async fn account_id(&self) -> PomResult<String> {
        Ok(self.account_id_span.text_content().await?.trim().to_string())
    }

    /// New account name, trimmed
    pub async fn account_name(&self) -> PomResult<String> {
        Ok(self.account_name_span.text_content().await?.trim().to_string())
    }
}
