//! Account summary scenarios for a signed-in first-time user.

use futures::future::{BoxFuture, FutureExt};

use crate::expect::{expect, expect_page};
use crate::locator::Locator;
use crate::pages::AccountSummaryPage;
use crate::result::PomResult;
use crate::scenario::{ScenarioContext, ScenarioDef};
use crate::screen::{NavAction, Screen};
use crate::wait::UrlPattern;

pub(super) const SUITE: &str = "account-summary";

pub(super) const SCENARIOS: &[ScenarioDef] = &[
    ScenarioDef {
        suite: SUITE,
        name: "first-time-user",
        description: "Welcome heading, summary paragraph, no-accounts message and apply button",
        run: first_time_user,
    },
    ScenarioDef {
        suite: SUITE,
        name: "help-section",
        description: "\"How can we help?\" section with payment and loan links",
        run: help_section,
    },
    ScenarioDef {
        suite: SUITE,
        name: "navigate-apply-new-account",
        description: "Apply For New Account opens the application form",
        run: navigate_apply_new_account,
    },
    ScenarioDef {
        suite: SUITE,
        name: "navigate-transfer-funds",
        description: "Transfer Funds opens the transfer screen",
        run: navigate_transfer_funds,
    },
    ScenarioDef {
        suite: SUITE,
        name: "navigate-apply-for-loan",
        description: "Apply For A Loan opens the loan center",
        run: navigate_apply_for_loan,
    },
    ScenarioDef {
        suite: SUITE,
        name: "navigate-loan-status",
        description: "Loan Status opens the loan lookup",
        run: navigate_loan_status,
    },
];

async fn visible_with_text(locator: &Locator, text: &str) -> PomResult<()> {
    expect(locator).to_be_visible().await?;
    expect(locator).to_have_text(text).await
}

fn first_time_user(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        ctx.step("login", ctx.login()).await?;
        let page = ctx.page::<AccountSummaryPage>();
        ctx.step(
            "welcome heading",
            visible_with_text(&page.welcome_message_heading, "Welcome!"),
        )
        .await?;
        ctx.step(
            "summary paragraph",
            visible_with_text(&page.account_summary_paragraph, "Here is your account summary:"),
        )
        .await?;
        ctx.step(
            "no accounts message",
            visible_with_text(
                &page.no_accounts_message,
                "No accounts at this time, apply for a new account today!",
            ),
        )
        .await?;
        ctx.step(
            "apply button",
            visible_with_text(&page.apply_for_new_account_button, "Apply For New Account"),
        )
        .await
    }
    .boxed()
}

fn help_section(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        ctx.step("login", ctx.login()).await?;
        let page = ctx.page::<AccountSummaryPage>();
        ctx.step(
            "help heading",
            visible_with_text(&page.how_can_we_help_heading, "How can we help?"),
        )
        .await?;
        ctx.step("payment center", async {
            visible_with_text(&page.payment_center_heading, "Payment Center").await?;
            expect(&page.transfer_funds_link).to_be_visible().await
        })
        .await?;
        ctx.step("loan center", async {
            visible_with_text(&page.loan_center_heading, "Loan Center").await?;
            expect(&page.apply_for_a_loan_link).to_be_visible().await?;
            expect(&page.loan_status_link).to_be_visible().await
        })
        .await
    }
    .boxed()
}

/// Sign in, take `action` from the summary and check the landing route
async fn navigate_from_summary(
    ctx: &ScenarioContext,
    action: NavAction,
    route: &str,
) -> PomResult<()> {
    ctx.step("login", ctx.login()).await?;
    ctx.step(&format!("click {action}"), ctx.navigate(action))
        .await?;
    ctx.step(
        &format!("on {route}"),
        expect_page(ctx.session()).to_have_url(&UrlPattern::path(route)),
    )
    .await
}

fn navigate_apply_new_account(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    navigate_from_summary(ctx, NavAction::ApplyForNewAccount, Screen::NewAccount.route()).boxed()
}

fn navigate_transfer_funds(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    navigate_from_summary(ctx, NavAction::TransferFunds, Screen::TransferFunds.route()).boxed()
}

fn navigate_apply_for_loan(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    navigate_from_summary(ctx, NavAction::ApplyForLoan, Screen::LoanCenter.route()).boxed()
}

fn navigate_loan_status(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    navigate_from_summary(ctx, NavAction::LoanStatus, Screen::LoanStatus.route()).boxed()
}
