//! Account summary screen (`/accounts`).
//!
//! Both loan links carry `id="applyForLoan"`. They are distinct targets, so
//! each registry entry says how it picks its element: the loan application
//! link takes the first link named "Apply For A Loan", the status link
//! narrows the shared id by its visible text.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::locator::{AriaRole, Disambiguation, Locator, LocatorSpec, Selector};
use crate::pages::PageObject;
use crate::result::PomResult;
use crate::screen::Screen;
use crate::session::Session;

/// "Welcome!" (h3); the screen's landmark
pub static WELCOME_HEADING: LocatorSpec =
    LocatorSpec::new("welcome_heading", Selector::heading("Welcome!", 3));
/// Summary intro paragraph
pub static SUMMARY_PARAGRAPH: LocatorSpec = LocatorSpec::new(
    "account_summary_paragraph",
    Selector::text("Here is your account summary:"),
);
/// Apply For New Account button
pub static APPLY_FOR_NEW_ACCOUNT_BUTTON: LocatorSpec = LocatorSpec::new(
    "apply_for_new_account_button",
    Selector::text("Apply For New Account"),
);
/// Empty-state message
pub static NO_ACCOUNTS_MESSAGE: LocatorSpec = LocatorSpec::new(
    "no_accounts_message",
    Selector::text("No accounts at this time, apply for a new account today!"),
);
/// "How can we help?" (h3)
pub static HELP_HEADING: LocatorSpec =
    LocatorSpec::new("how_can_we_help_heading", Selector::heading("How can we help?", 3));
/// "Payment Center" (h5)
pub static PAYMENT_CENTER_HEADING: LocatorSpec =
    LocatorSpec::new("payment_center_heading", Selector::heading("Payment Center", 5));
/// Transfer Funds link
pub static TRANSFER_FUNDS_LINK: LocatorSpec = LocatorSpec::new(
    "transfer_funds_link",
    Selector::role(AriaRole::Link, "Transfer Funds"),
);
/// "Loan Center" (h5)
pub static LOAN_CENTER_HEADING: LocatorSpec =
    LocatorSpec::new("loan_center_heading", Selector::heading("Loan Center", 5));
/// Apply For A Loan link (shares its id with the status link)
pub static APPLY_FOR_LOAN_LINK: LocatorSpec = LocatorSpec::first_match(
    "apply_for_a_loan_link",
    Selector::role(AriaRole::Link, "Apply For A Loan"),
);
/// Loan Status link (shares its id with the application link)
pub static LOAN_STATUS_LINK: LocatorSpec =
    LocatorSpec::scoped("loan_status_link", Selector::css("#applyForLoan"), "Loan Status");
/// One element per opened account
pub static ACCOUNT_ROWS: LocatorSpec = LocatorSpec::with(
    "account_rows",
    Selector::css(".account-row"),
    Disambiguation::FirstMatch,
);

static REGISTRY: [&LocatorSpec; 11] = [
    &WELCOME_HEADING,
    &SUMMARY_PARAGRAPH,
    &APPLY_FOR_NEW_ACCOUNT_BUTTON,
    &NO_ACCOUNTS_MESSAGE,
    &HELP_HEADING,
    &PAYMENT_CENTER_HEADING,
    &TRANSFER_FUNDS_LINK,
    &LOAN_CENTER_HEADING,
    &APPLY_FOR_LOAN_LINK,
    &LOAN_STATUS_LINK,
    &ACCOUNT_ROWS,
];

/// One row of the account list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Account nickname
    pub name: String,
    /// Masked account number, e.g. `...0001`
    pub partial_id: String,
    /// Balance as displayed, e.g. `$100.00`
    pub balance: String,
}

const ROW_PATTERN: &str =
    r"^\s*(?P<name>.+?)\s+(?P<partial_id>(?:\.{3}|[x*]{2,})\w+)\s+(?P<balance>-?\$[\d,]+\.\d{2})\s*$";

impl AccountSummary {
    /// Parse a row's text (`<name> <partial id> <balance>`)
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let caps = Regex::new(ROW_PATTERN).ok()?.captures(&text)?;
        Some(Self {
            name: caps["name"].to_string(),
            partial_id: caps["partial_id"].to_string(),
            balance: caps["balance"].to_string(),
        })
    }
}

/// Account summary page object
#[derive(Debug, Clone)]
pub struct AccountSummaryPage {
    session: Session,
    /// Welcome heading
    pub welcome_message_heading: Locator,
    /// Summary paragraph
    pub account_summary_paragraph: Locator,
    /// Apply For New Account button
    pub apply_for_new_account_button: Locator,
    /// No-accounts message
    pub no_accounts_message: Locator,
    /// Help heading
    pub how_can_we_help_heading: Locator,
    /// Payment Center heading
    pub payment_center_heading: Locator,
    /// Transfer Funds link
    pub transfer_funds_link: Locator,
    /// Loan Center heading
    pub loan_center_heading: Locator,
    /// Apply For A Loan link
    pub apply_for_a_loan_link: Locator,
    /// Loan Status link
    pub loan_status_link: Locator,
    /// Account rows
    pub account_rows: Locator,
}

impl PageObject for AccountSummaryPage {
    const SCREEN: Screen = Screen::AccountSummary;

    fn registry() -> &'static [&'static LocatorSpec] {
        &REGISTRY
    }

    fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            welcome_message_heading: session.locate(&WELCOME_HEADING),
            account_summary_paragraph: session.locate(&SUMMARY_PARAGRAPH),
            apply_for_new_account_button: session.locate(&APPLY_FOR_NEW_ACCOUNT_BUTTON),
            no_accounts_message: session.locate(&NO_ACCOUNTS_MESSAGE),
            how_can_we_help_heading: session.locate(&HELP_HEADING),
            payment_center_heading: session.locate(&PAYMENT_CENTER_HEADING),
            transfer_funds_link: session.locate(&TRANSFER_FUNDS_LINK),
            loan_center_heading: session.locate(&LOAN_CENTER_HEADING),
            apply_for_a_loan_link: session.locate(&APPLY_FOR_LOAN_LINK),
            loan_status_link: session.locate(&LOAN_STATUS_LINK),
            account_rows: session.locate(&ACCOUNT_ROWS),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

impl AccountSummaryPage {
    /// Welcome heading text
    pub async fn welcome_message_text(&self) -> PomResult<String> {
        self.welcome_message_heading.text_content().await
    }

    /// Summary paragraph text
    pub async fn account_summary_text(&self) -> PomResult<String> {
        self.account_summary_paragraph.text_content().await
    }

    /// No-accounts message text
    pub async fn no_accounts_message_text(&self) -> PomResult<String> {
        self.no_accounts_message.text_content().await
    }

    /// Help heading text
    pub async fn how_can_we_help_heading_text(&self) -> PomResult<String> {
        self.how_can_we_help_heading.text_content().await
    }

    /// Payment Center heading text
    pub async fn payment_center_heading_text(&self) -> PomResult<String> {
        self.payment_center_heading.text_content().await
    }

    /// Loan Center heading text
    pub async fn loan_center_heading_text(&self) -> PomResult<String> {
        self.loan_center_heading.text_content().await
    }

    /// Click Apply For New Account
    pub async fn click_apply_for_new_account_button(&self) -> PomResult<()> {
        self.apply_for_new_account_button.click().await
    }

    /// Click Transfer Funds
    pub async fn click_transfer_funds_link(&self) -> PomResult<()> {
        self.transfer_funds_link.click().await
    }

    /// Click Apply For A Loan
    pub async fn click_apply_for_a_loan_link(&self) -> PomResult<()> {
        self.apply_for_a_loan_link.click().await
    }

    /// Click Loan Status
    pub async fn click_loan_status_link(&self) -> PomResult<()> {
        self.loan_status_link.click().await
    }

    /// A first-time user sees the empty-state message
    pub async fn is_first_time_user(&self) -> PomResult<bool> {
        self.no_accounts_message.is_visible().await
    }

    /// Whether the empty-state message is visible right now
    pub async fn has_no_accounts_message(&self) -> PomResult<bool> {
        self.no_accounts_message.is_visible().await
    }

    /// Number of account rows right now
    pub async fn number_of_accounts(&self) -> PomResult<usize> {
        self.account_rows.count().await
    }

    /// Parsed account rows; rows that do not parse are skipped
    pub async fn all_account_details(&self) -> PomResult<Vec<AccountSummary>> {
        let rows = self.account_rows.all_text_contents().await?;
        Ok(rows.iter().filter_map(|row| AccountSummary::parse(row)).collect())
    }

    /// Locator for an account's name on the list
    #[must_use]
    pub fn account_named(&self, name: &str) -> Locator {
        Locator::adhoc(
            &self.session,
            format!("account {name:?}"),
            Selector::text_owned(name),
            Disambiguation::FirstMatch,
        )
    }

    /// Whether an account with this name is listed right now
    pub async fn is_account_visible(&self, name: &str) -> PomResult<bool> {
        self.account_named(name).is_visible().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::forms::Credentials;
    use crate::mock_app::{fast_session, uibank_app};
    use crate::result::PomError;

    async fn accounts() -> (Session, AccountSummaryPage) {
        let session = fast_session(uibank_app(&Credentials::new("u", "p")));
        session.goto("/accounts").await.unwrap();
        let page = AccountSummaryPage::new(&session);
        (session, page)
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parse_row() {
            let row = AccountSummary::parse("MyChecking1750 ...0001   $100.00").unwrap();
            assert_eq!(row.name, "MyChecking1750");
            assert_eq!(row.partial_id, "...0001");
            assert_eq!(row.balance, "$100.00");
        }

        #[test]
        fn test_parse_row_with_spaces_in_name() {
            let row = AccountSummary::parse("Rainy Day Fund\nxxxx4821\n$1,250.50").unwrap();
            assert_eq!(row.name, "Rainy Day Fund");
            assert_eq!(row.balance, "$1,250.50");
        }

        #[test]
        fn test_unparseable_row() {
            assert!(AccountSummary::parse("Loading...").is_none());
            assert!(AccountSummary::parse("").is_none());
        }
    }

    mod page_tests {
        use super::*;

        #[tokio::test]
        async fn test_first_time_user() {
            let (_, page) = accounts().await;
            assert!(page.is_page_visible().await.unwrap());
            assert_eq!(page.welcome_message_text().await.unwrap(), "Welcome!");
            assert!(page.is_first_time_user().await.unwrap());
            assert_eq!(page.number_of_accounts().await.unwrap(), 0);
            assert!(page.all_account_details().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_duplicate_id_links_go_to_distinct_routes() {
            let (session, page) = accounts().await;
            page.click_apply_for_a_loan_link().await.unwrap();
            assert_eq!(session.route().await.unwrap(), "/loans");

            session.goto("/accounts").await.unwrap();
            page.click_loan_status_link().await.unwrap();
            assert_eq!(session.route().await.unwrap(), "/loans/lookup");
        }

        #[tokio::test]
        async fn test_shared_id_is_ambiguous_without_policy() {
            let (session, _) = accounts().await;
            let strict = session.locate(&LocatorSpec::new("loan", Selector::css("#applyForLoan")));
            assert!(matches!(
                strict.click().await.unwrap_err(),
                PomError::ElementAmbiguous { count: 2, .. }
            ));
        }

        #[tokio::test]
        async fn test_accessors_off_screen() {
            let session = fast_session(uibank_app(&Credentials::new("u", "p")));
            session.goto("/loans").await.unwrap();
            let page = AccountSummaryPage::new(&session);
            assert!(!page.has_no_accounts_message().await.unwrap());
            assert!(!page.is_account_visible("anything").await.unwrap());
            assert!(matches!(
                page.welcome_message_text().await.unwrap_err(),
                PomError::ElementNotFound { .. }
            ));
        }
    }
}
