//! New-account application scenarios.
//!
//! Every scenario starts signed in on the application form.

use futures::future::{BoxFuture, FutureExt};

use crate::expect::{expect, expect_page};
use crate::forms::{unique_nickname, AccountType, NewAccountForm};
use crate::pages::{AccountCreateResultsPage, AccountSummaryPage, NewAccountPage};
use crate::result::{PomError, PomResult};
use crate::scenario::{ScenarioContext, ScenarioDef};
use crate::screen::{NavAction, Screen};

pub(super) const SUITE: &str = "new-account";

/// Opening balance of every new account
const OPENING_BALANCE: &str = "$100.00";

pub(super) const SCENARIOS: &[ScenarioDef] = &[
    ScenarioDef {
        suite: SUITE,
        name: "summary-hidden-on-account-form",
        description: "Account rows and the no-accounts message are absent while the form is shown",
        run: summary_hidden_on_account_form,
    },
    ScenarioDef {
        suite: SUITE,
        name: "page-elements",
        description: "Title, description, nickname, type and Apply are shown",
        run: page_elements,
    },
    ScenarioDef {
        suite: SUITE,
        name: "apply-checking",
        description: "Apply for a checking account and find it on the summary",
        run: apply_checking,
    },
    ScenarioDef {
        suite: SUITE,
        name: "apply-savings",
        description: "Apply for a savings account and find it on the summary",
        run: apply_savings,
    },
    ScenarioDef {
        suite: SUITE,
        name: "back-button",
        description: "The back link returns to the account summary",
        run: back_button,
    },
    ScenarioDef {
        suite: SUITE,
        name: "empty-nickname",
        description: "Applying without a nickname keeps the form open",
        run: empty_nickname,
    },
];

async fn on_application_form(ctx: &ScenarioContext) -> PomResult<()> {
    ctx.step("login", ctx.login()).await?;
    ctx.step(
        "open application form",
        ctx.navigate(NavAction::ApplyForNewAccount),
    )
    .await?;
    Ok(())
}

fn summary_hidden_on_account_form(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        on_application_form(ctx).await?;
        let summary = ctx.page::<AccountSummaryPage>();
        ctx.step("account count", async {
            match summary.number_of_accounts().await? {
                0 => Ok(()),
                n => Err(PomError::assertion(format!(
                    "Expected count 0 but got {n}"
                ))),
            }
        })
        .await?;
        ctx.step("no stray summary content", async {
            if summary.has_no_accounts_message().await? {
                Err(PomError::assertion(
                    "account summary content visible on the application form",
                ))
            } else {
                Ok(())
            }
        })
        .await
    }
    .boxed()
}

fn page_elements(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        on_application_form(ctx).await?;
        let page = ctx.page::<NewAccountPage>();
        ctx.step("title", async {
            expect(&page.page_title).to_be_visible().await?;
            expect(&page.page_title)
                .to_have_text("Apply For A New Account")
                .await
        })
        .await?;
        ctx.step("description", async {
            expect(&page.page_description).to_be_visible().await?;
            expect(&page.page_description)
                .to_have_text("We need to gather some more details.")
                .await
        })
        .await?;
        ctx.step("form controls", async {
            expect(&page.account_nickname_input).to_be_visible().await?;
            expect(&page.type_of_account_dropdown).to_be_visible().await?;
            expect(&page.apply_button).to_be_visible().await
        })
        .await
    }
    .boxed()
}

/// Apply for `account_type`, then verify the results screen and the summary row
async fn apply_and_verify(ctx: &ScenarioContext, account_type: AccountType) -> PomResult<()> {
    on_application_form(ctx).await?;
    let nickname = unique_nickname(account_type);
    let form_page = ctx.page::<NewAccountPage>();

    ctx.step("fill form", async {
        form_page.fill_account_nickname(&nickname).await?;
        form_page.select_type_of_account(account_type).await
    })
    .await?;
    ctx.step("apply", ctx.navigate(NavAction::SubmitNewAccount))
        .await?;

    let results = ctx.page::<AccountCreateResultsPage>();
    ctx.step("congratulations", async {
        expect(&results.congratulations_heading).to_be_visible().await?;
        expect(&results.congratulations_heading)
            .to_have_text("Congratulations!")
            .await
    })
    .await?;
    let (account_id, account_name) = ctx
        .step("read new account", async {
            Ok::<_, PomError>((results.account_id().await?, results.account_name().await?))
        })
        .await?;
    ctx.note("account_id", account_id.as_str());
    ctx.note("account_name", account_name.as_str());
    tracing::info!(%account_id, %account_name, "new account created");

    ctx.step(
        "view your accounts",
        ctx.navigate(NavAction::ViewYourAccounts),
    )
    .await?;
    let summary = ctx.page::<AccountSummaryPage>();
    ctx.step(
        "account listed",
        expect(&summary.account_named(&account_name)).to_be_visible(),
    )
    .await?;
    ctx.step("opening balance", async {
        let accounts = summary.all_account_details().await?;
        let created = accounts
            .iter()
            .find(|a| a.name == account_name)
            .ok_or_else(|| {
                PomError::assertion(format!("account {account_name} not in the account list"))
            })?;
        if created.balance == OPENING_BALANCE {
            Ok(())
        } else {
            Err(PomError::assertion(format!(
                "Expected balance {OPENING_BALANCE} but got {}",
                created.balance
            )))
        }
    })
    .await
}

fn apply_checking(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    apply_and_verify(ctx, AccountType::Checking).boxed()
}

fn apply_savings(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    apply_and_verify(ctx, AccountType::Savings).boxed()
}

fn back_button(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        on_application_form(ctx).await?;
        ctx.step("back", ctx.navigate(NavAction::NewAccountBack))
            .await?;
        let summary = ctx.page::<AccountSummaryPage>();
        ctx.step(
            "welcome heading",
            expect(&summary.welcome_message_heading).to_be_visible(),
        )
        .await
    }
    .boxed()
}

fn empty_nickname(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        on_application_form(ctx).await?;
        let page = ctx.page::<NewAccountPage>();
        let form = NewAccountForm {
            nickname: None,
            account_type: Some(AccountType::Checking),
        };
        ctx.step("apply without nickname", page.apply(&form))
            .await?;
        ctx.step(
            "form stays open",
            expect_page(ctx.session()).to_stay_on(Screen::NewAccount),
        )
        .await
    }
    .boxed()
}
