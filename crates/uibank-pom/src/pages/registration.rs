//! Registration screen (`/register-account`).

use crate::forms::{RegistrationField, RegistrationForm};
use crate::locator::{AriaRole, Locator, LocatorSpec, Selector};
use crate::pages::{apply_steps, PageObject};
use crate::result::PomResult;
use crate::screen::Screen;
use crate::session::Session;

/// Back arrow
pub static BACK_BUTTON: LocatorSpec =
    LocatorSpec::first_match("back_button", Selector::css("div.back-container a"));
/// `#email`
pub static EMAIL_INPUT: LocatorSpec = LocatorSpec::new("email_input", Selector::css("#email"));
/// `#password`
pub static PASSWORD_INPUT: LocatorSpec =
    LocatorSpec::new("password_input", Selector::css("#password"));
/// `#firstName`
pub static FIRST_NAME_INPUT: LocatorSpec =
    LocatorSpec::new("first_name_input", Selector::css("#firstName"));
/// `#lastName`
pub static LAST_NAME_INPUT: LocatorSpec =
    LocatorSpec::new("last_name_input", Selector::css("#lastName"));
/// `#middleName`
pub static MIDDLE_NAME_INPUT: LocatorSpec =
    LocatorSpec::new("middle_name_input", Selector::css("#middleName"));
/// `#sex`
pub static SEX_DROPDOWN: LocatorSpec = LocatorSpec::new("sex_dropdown", Selector::css("#sex"));
/// `#title`
pub static TITLE_DROPDOWN: LocatorSpec =
    LocatorSpec::new("title_dropdown", Selector::css("#title"));
/// `#employmentStatus`
pub static EMPLOYMENT_STATUS_DROPDOWN: LocatorSpec = LocatorSpec::new(
    "employment_status_dropdown",
    Selector::css("#employmentStatus"),
);
/// `#age` (date of birth, MM/DD/YY)
pub static DATE_OF_BIRTH_INPUT: LocatorSpec =
    LocatorSpec::new("date_of_birth_input", Selector::css("#age"));
/// `#maritalStatus`
pub static MARITAL_STATUS_DROPDOWN: LocatorSpec =
    LocatorSpec::new("marital_status_dropdown", Selector::css("#maritalStatus"));
/// `#numberOfDependents`
pub static NUMBER_OF_DEPENDENTS_INPUT: LocatorSpec = LocatorSpec::new(
    "number_of_dependents_input",
    Selector::css("#numberOfDependents"),
);
/// `#username`
pub static USERNAME_INPUT: LocatorSpec =
    LocatorSpec::new("username_input", Selector::css("#username"));
/// `#agreeCheckbox`
pub static PRIVACY_POLICY_CHECKBOX: LocatorSpec =
    LocatorSpec::new("privacy_policy_checkbox", Selector::css("#agreeCheckbox"));
/// Privacy Policy link
pub static PRIVACY_POLICY_LINK: LocatorSpec = LocatorSpec::new(
    "privacy_policy_link",
    Selector::role(AriaRole::Link, "Privacy Policy"),
);
/// Register button; the screen's landmark
pub static REGISTER_BUTTON: LocatorSpec =
    LocatorSpec::new("register_button", Selector::role(AriaRole::Button, "Register"));

static REGISTRY: [&LocatorSpec; 16] = [
    &BACK_BUTTON,
    &EMAIL_INPUT,
    &PASSWORD_INPUT,
    &FIRST_NAME_INPUT,
    &LAST_NAME_INPUT,
    &MIDDLE_NAME_INPUT,
    &SEX_DROPDOWN,
    &TITLE_DROPDOWN,
    &EMPLOYMENT_STATUS_DROPDOWN,
    &DATE_OF_BIRTH_INPUT,
    &MARITAL_STATUS_DROPDOWN,
    &NUMBER_OF_DEPENDENTS_INPUT,
    &USERNAME_INPUT,
    &PRIVACY_POLICY_CHECKBOX,
    &PRIVACY_POLICY_LINK,
    &REGISTER_BUTTON,
];

fn control(field: RegistrationField) -> &'static LocatorSpec {
    use RegistrationField as F;
    match field {
        F::Email => &EMAIL_INPUT,
        F::Password => &PASSWORD_INPUT,
        F::FirstName => &FIRST_NAME_INPUT,
        F::LastName => &LAST_NAME_INPUT,
        F::MiddleName => &MIDDLE_NAME_INPUT,
        F::Sex => &SEX_DROPDOWN,
        F::Title => &TITLE_DROPDOWN,
        F::EmploymentStatus => &EMPLOYMENT_STATUS_DROPDOWN,
        F::DateOfBirth => &DATE_OF_BIRTH_INPUT,
        F::MaritalStatus => &MARITAL_STATUS_DROPDOWN,
        F::NumberOfDependents => &NUMBER_OF_DEPENDENTS_INPUT,
        F::Username => &USERNAME_INPUT,
        F::AgreeToPrivacyPolicy => &PRIVACY_POLICY_CHECKBOX,
    }
}

/// Registration page object
#[derive(Debug, Clone)]
pub struct RegistrationPage {
    session: Session,
    /// Back link
    pub back_button: Locator,
    /// Email
    pub email_input: Locator,
    /// Password
    pub password_input: Locator,
    /// First name
    pub first_name_input: Locator,
    /// Last name
    pub last_name_input: Locator,
    /// Middle name
    pub middle_name_input: Locator,
    /// Sex
    pub sex_dropdown: Locator,
    /// Title
    pub title_dropdown: Locator,
    /// Employment status
    pub employment_status_dropdown: Locator,
    /// Date of birth
    pub date_of_birth_input: Locator,
    /// Marital status
    pub marital_status_dropdown: Locator,
    /// Number of dependents
    pub number_of_dependents_input: Locator,
    /// Username
    pub username_input: Locator,
    /// Privacy policy checkbox
    pub privacy_policy_checkbox: Locator,
    /// Privacy policy link
    pub privacy_policy_link: Locator,
    /// Register button
    pub register_button: Locator,
}

impl PageObject for RegistrationPage {
    const SCREEN: Screen = Screen::Registration;

    fn registry() -> &'static [&'static LocatorSpec] {
        &REGISTRY
    }

    fn new(session: &Session) -> Self {
        Self {
            session: session.clone(),
            back_button: session.locate(&BACK_BUTTON),
            email_input: session.locate(&EMAIL_INPUT),
            password_input: session.locate(&PASSWORD_INPUT),
            first_name_input: session.locate(&FIRST_NAME_INPUT),
            last_name_input: session.locate(&LAST_NAME_INPUT),
            middle_name_input: session.locate(&MIDDLE_NAME_INPUT),
            sex_dropdown: session.locate(&SEX_DROPDOWN),
            title_dropdown: session.locate(&TITLE_DROPDOWN),
            employment_status_dropdown: session.locate(&EMPLOYMENT_STATUS_DROPDOWN),
            date_of_birth_input: session.locate(&DATE_OF_BIRTH_INPUT),
            marital_status_dropdown: session.locate(&MARITAL_STATUS_DROPDOWN),
            number_of_dependents_input: session.locate(&NUMBER_OF_DEPENDENTS_INPUT),
            username_input: session.locate(&USERNAME_INPUT),
            privacy_policy_checkbox: session.locate(&PRIVACY_POLICY_CHECKBOX),
            privacy_policy_link: session.locate(&PRIVACY_POLICY_LINK),
            register_button: session.locate(&REGISTER_BUTTON),
        }
    }

    fn session(&self) -> &Session {
        &self.session
    }
}

impl RegistrationPage {
    /// Open the registration route
    pub async fn goto(&self) -> PomResult<()> {
        self.session.goto(Screen::Registration.route()).await
    }

    /// Type the email address
    pub async fn fill_email(&self, email: &str) -> PomResult<()> {
        self.email_input.fill(email).await
    }

    /// Type the password
    pub async fn fill_password(&self, password: &str) -> PomResult<()> {
        self.password_input.fill(password).await
    }

    /// Type the first name
    pub async fn fill_first_name(&self, first_name: &str) -> PomResult<()> {
        self.first_name_input.fill(first_name).await
    }

    /// Type the last name
    pub async fn fill_last_name(&self, last_name: &str) -> PomResult<()> {
        self.last_name_input.fill(last_name).await
    }

    /// Type the middle name or initial
    pub async fn fill_middle_name(&self, middle_name: &str) -> PomResult<()> {
        self.middle_name_input.fill(middle_name).await
    }

    /// Choose sex (`male`, `female`)
    pub async fn select_sex(&self, value: &str) -> PomResult<()> {
        self.sex_dropdown.select_option(value).await
    }

    /// Choose title (`mr`, `ms`, `mrs`)
    pub async fn select_title(&self, value: &str) -> PomResult<()> {
        self.title_dropdown.select_option(value).await
    }

    /// Choose employment status
    pub async fn select_employment_status(&self, value: &str) -> PomResult<()> {
        self.employment_status_dropdown.select_option(value).await
    }

    /// Type the date of birth (MM/DD/YY)
    pub async fn fill_date_of_birth(&self, dob: &str) -> PomResult<()> {
        self.date_of_birth_input.fill(dob).await
    }

    /// Choose marital status
    pub async fn select_marital_status(&self, value: &str) -> PomResult<()> {
        self.marital_status_dropdown.select_option(value).await
    }

    /// Type the number of dependents
    pub async fn fill_number_of_dependents(&self, count: &str) -> PomResult<()> {
        self.number_of_dependents_input.fill(count).await
    }

    /// Type the username
    pub async fn fill_username(&self, username: &str) -> PomResult<()> {
        self.username_input.fill(username).await
    }

    /// Tick the privacy policy box
    pub async fn check_privacy_policy_agreement(&self) -> PomResult<()> {
        self.privacy_policy_checkbox.check().await
    }

    /// Follow the privacy policy link
    pub async fn click_privacy_policy_link(&self) -> PomResult<()> {
        self.privacy_policy_link.click().await
    }

    /// Click the back arrow
    pub async fn click_back_button(&self) -> PomResult<()> {
        self.back_button.click().await
    }

    /// Click Register
    pub async fn click_register_button(&self) -> PomResult<()> {
        self.register_button.click().await
    }

    /// Apply every present field of `form` in tab order; does not submit
    pub async fn complete_registration_form(&self, form: &RegistrationForm) -> PomResult<()> {
        apply_steps(form.steps(), control, &self.session).await
    }
}
