//! Registration scenarios.

use futures::future::{BoxFuture, FutureExt};

use crate::expect::{expect, expect_page};
use crate::forms::{unique_username, RegistrationForm};
use crate::pages::{RegistrationPage, RegistrationSuccessPage};
use crate::result::{PomError, PomResult};
use crate::scenario::{ScenarioContext, ScenarioDef};
use crate::screen::{NavAction, Screen};
use crate::wait::UrlPattern;

pub(super) const SUITE: &str = "registration";

pub(super) const SCENARIOS: &[ScenarioDef] = &[ScenarioDef {
    suite: SUITE,
    name: "valid-details",
    description: "A complete form registers the user and lands on the success page",
    run: valid_details,
}];

fn valid_details(ctx: &ScenarioContext) -> BoxFuture<'_, PomResult<()>> {
    async move {
        let username = unique_username("johndoe");
        ctx.step("open registration", ctx.open(Screen::Registration))
            .await?;

        let form = RegistrationForm::sample(username.as_str());
        let page = ctx.page::<RegistrationPage>();
        ctx.step("complete form", page.complete_registration_form(&form))
            .await?;
        ctx.step("register", ctx.navigate(NavAction::SubmitRegistration))
            .await?;
        ctx.note("username", username.as_str());

        let route = format!("/register-account/success/{username}");
        ctx.step(
            "success route",
            expect_page(ctx.session()).to_have_url(&UrlPattern::path(route.as_str())),
        )
        .await?;

        let success = ctx.page::<RegistrationSuccessPage>();
        ctx.step("username in route", async {
            match success.registered_username().await? {
                Some(name) if name == username => Ok(()),
                other => Err(PomError::assertion(format!(
                    "Expected username '{username}' but got {other:?}"
                ))),
            }
        })
        .await?;
        ctx.step("welcome heading", async {
            expect(&success.welcome_heading).to_be_visible().await?;
            expect(&success.welcome_heading)
                .to_have_text("Welcome To The UiBank Family!")
                .await
        })
        .await?;
        ctx.step("verify email heading", async {
            expect(&success.verify_email_heading).to_be_visible().await?;
            expect(&success.verify_email_heading)
                .to_have_text("Before you can apply for an account we need you to verify your email!")
                .await
        })
        .await?;
        ctx.step("inbox hint", async {
            expect(&success.inbox_hint).to_be_visible().await?;
            expect(&success.inbox_hint)
                .to_have_text("Check your inbox for a verification link.")
                .await
        })
        .await
    }
    .boxed()
}
