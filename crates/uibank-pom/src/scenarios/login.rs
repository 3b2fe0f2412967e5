//! Login screen scenarios.

use futures::future::{BoxFuture, FutureExt};

use crate::expect::{expect, expect_page};
use crate::pages::{LoginOutcome, LoginPage};
use crate::result::{PomError, PomResult};
use crate::scenario::{ScenarioContext, ScenarioDef};
use crate::screen::{NavAction, Screen};
use crate::wait::UrlPattern;

pub(super) const SUITE: &str = "login";

pub(super) const SCENARIOS: &[ScenarioDef] = &[
    ScenarioDef {
        suite: SUITE,
        name: "valid-credentials",
        description: "Signing in with the seeded account lands on the account summary",
        run: valid_credentials,
    },
    ScenarioDef {
        suite: SUITE,
        name: "invalid-credentials",
        description: "Unknown credentials show the login-failed message and stay on login",
        run: invalid_credentials,
    },
];

fn valid_credentials(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        ctx.step("open login", ctx.open(Screen::Login)).await?;
        ctx.step("sign in", ctx.navigate(NavAction::SubmitLogin))
            .await?;
        ctx.step(
            "on accounts route",
            expect_page(ctx.session()).to_have_url(&UrlPattern::path("/accounts")),
        )
        .await
    }
    .boxed()
}

fn invalid_credentials(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        ctx.step("open login", ctx.open(Screen::Login)).await?;
        let page = ctx.page::<LoginPage>();
        let creds = &ctx.config().invalid_credentials;
        let outcome = ctx
            .step("sign in", page.login(&creds.username, &creds.password))
            .await?;
        ctx.step("rejected", async {
            if outcome == LoginOutcome::Rejected {
                Ok(())
            } else {
                Err(PomError::assertion(format!(
                    "expected login to be rejected, got {outcome:?}"
                )))
            }
        })
        .await?;
        ctx.step(
            "login failed message",
            expect(&page.login_failed_message).to_be_visible(),
        )
        .await?;
        ctx.step(
            "still on login",
            expect_page(ctx.session()).to_stay_on(Screen::Login),
        )
        .await
    }
    .boxed()
}
