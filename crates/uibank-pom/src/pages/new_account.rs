//! New-account application screen (`/accounts/account-apply`).

use crate::forms::{AccountType, NewAccountField, NewAccountForm};
use crate::locator::{AriaRole, Locator, LocatorSpec, Selector};
use crate::pages::{apply_steps, PageObject};
use crate::result::PomResult;
use crate::screen::Screen;
use crate::session::Session;

/// Back arrow in the card header
pub static BACK_BUTTON: LocatorSpec =
    LocatorSpec::first_match("back_button", Selector::css("div.card-header a"));
/// "Apply For A New Account" (h1); the screen's landmark
pub static PAGE_TITLE: LocatorSpec =
    LocatorSpec::new("page_title", Selector::heading("Apply For A New Account", 1));
/// Form description
pub static PAGE_DESCRIPTION: LocatorSpec = LocatorSpec::new(
    "page_description",
    Selector::text("We need to gather some more details."),
);
/// `#accountNickname`
pub static NICKNAME_INPUT: LocatorSpec =
    LocatorSpec::new("account_nickname_input", Selector::css("#accountNickname"));
/// `#typeOfAccount`
pub static ACCOUNT_TYPE_SELECT: LocatorSpec =
    LocatorSpec::new("type_of_account_dropdown", Selector::css("#typeOfAccount"));
/// Apply button
pub static APPLY_BUTTON: LocatorSpec =
    LocatorSpec::new("apply_button", Selector::role(AriaRole::Button, "Apply"));

static REGISTRY: [&LocatorSpec; 6] = [
    &BACK_BUTTON,
    &PAGE_TITLE,
    &PAGE_DESCRIPTION,
    &NICKNAME_INPUT,
    &ACCOUNT_TYPE_SELECT,
    &APPLY_BUTTON,
];

fn control(field: NewAccountField) -> &'static LocatorSpec {
    match field {
        NewAccountField::Nickname => &NICKNAME_INPUT,
        NewAccountField::AccountType => &ACCOUNT_TYPE_SELECT,
    }
}

/// New-account page object
#[derive(Debug, Clone)]
pub struct NewAccountPage {
    session: Session,
    /// Back link
    pub back_button: Locator,
    /// Page title
    pub page_title: Locator,
    /// Page description
    pub page_description: Locator,
    /// Nickname input
    pub account_nickname_input: Locator,
    /// Account type select
    pub type_of_account_dropdown: Locator,
    /// Apply button
    pub apply_button: Locator,
}

impl PageObject for NewAccountPage {
    const SCREEN: Screen = Screen::NewAccount;

    fn registry() -> &'static [&'static LocatorSpec] {
        &REGISTRY
    }

    fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            back_button: session.locate(&BACK_BUTTON),
            page_title: session.locate(&PAGE_TITLE),
            page_description: session.locate(&PAGE_DESCRIPTION),
            account_nickname_input: session.locate(&NICKNAME_INPUT),
            type_of_account_dropdown: session.locate(&ACCOUNT_TYPE_SELECT),
            apply_button: session.locate(&APPLY_BUTTON),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

impl NewAccountPage {
    /// Click the back link
    pub async fn click_back_button(&self) -> PomResult<()> {
        self.back_button.click().await
    }

    /// Type the account nickname
    pub async fn fill_account_nickname(&self, nickname: &str) -> PomResult<()> {
        self.account_nickname_input.fill(nickname).await
    }

    /// Choose the account type
    pub async fn select_type_of_account(&self, account_type: AccountType) -> PomResult<()> {
        self.type_of_account_dropdown
            .select_option(account_type.as_str())
            .await
    }

    /// Click Apply
    pub async fn click_apply_button(&self) -> PomResult<()> {
        self.apply_button.click().await
    }

    /// Fill nickname, choose type, click Apply
    pub async fn apply_for_new_account(
        &self,
        nickname: &str,
        account_type: AccountType,
    ) -> PomResult<()> {
        self.apply(&NewAccountForm::new(nickname, account_type)).await
    }

    /// Apply the present fields of `form`, then click Apply
    pub async fn apply(&self, form: &NewAccountForm) -> PomResult<()> {
        apply_steps(form.steps(), control, &self.session).await?;
        self.click_apply_button().await
    }
}
