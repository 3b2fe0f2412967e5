//! Form data records and the steps they expand to.
//!
//! A record holds optional values; [`RegistrationForm::steps`] and
//! [`NewAccountForm::steps`] turn it into an ordered list of [`FormStep`]s.
//! Absent values, empty strings and `false` produce no step, and steps
//! always come out in the form's tab order. Page objects replay the steps
//! against their controls.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One primitive interaction with a form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStep<F> {
    /// Type text into an input
    Fill(F, String),
    /// Choose an option by value
    Select(F, String),
    /// Tick a checkbox
    Check(F),
}

impl<F: Copy> FormStep<F> {
    /// Control the step targets
    #[must_use]
    pub fn field(&self) -> F {
        match self {
            Self::Fill(f, _) | Self::Select(f, _) => *f,
            Self::Check(f) => *f,
        }
    }
}

/// Controls of the registration form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    /// `#email`
    Email,
    /// `#password`
    Password,
    /// `#firstName`
    FirstName,
    /// `#lastName`
    LastName,
    /// `#middleName`
    MiddleName,
    /// `#sex`
    Sex,
    /// `#title`
    Title,
    /// `#employmentStatus`
    EmploymentStatus,
    /// `#age`
    DateOfBirth,
    /// `#maritalStatus`
    MaritalStatus,
    /// `#numberOfDependents`
    NumberOfDependents,
    /// `#username`
    Username,
    /// `#agreeCheckbox`
    AgreeToPrivacyPolicy,
}

/// Registration data; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationForm {
    /// Email address
    pub email: Option<String>,
    /// Password
    pub password: Option<String>,
    /// First name
    pub first_name: Option<String>,
    /// Last name
    pub last_name: Option<String>,
    /// Middle name or initial
    pub middle_name: Option<String>,
    /// `male` / `female`
    pub sex: Option<String>,
    /// `mr` / `ms` / `mrs`
    pub title: Option<String>,
    /// `Full-time` / `Part-time` / `Unemployed`
    pub employment_status: Option<String>,
    /// MM/DD/YY
    pub date_of_birth: Option<String>,
    /// `Single` / `Married` / `Divorced` / `Widowed`
    pub marital_status: Option<String>,
    /// Number of dependents
    pub number_of_dependents: Option<String>,
    /// Login name
    pub username: Option<String>,
    /// Tick the privacy policy box
    pub agree_to_privacy_policy: Option<bool>,
}

fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl RegistrationForm {
    /// Complete record for a fresh user
    #[must_use]
    pub fn sample(username: impl Into<String>) -> Self {
        Self {
            email: Some(unique_email("test")),
            password: Some("Password123!".into()),
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
            middle_name: Some("A".into()),
            sex: Some("male".into()),
            title: Some("mr".into()),
            employment_status: Some("Full-time".into()),
            date_of_birth: Some("01/15/90".into()),
            marital_status: Some("Single".into()),
            number_of_dependents: Some("0".into()),
            username: Some(username.into()),
            agree_to_privacy_policy: Some(true),
        }
    }

    /// Steps for the present fields, in tab order
    #[must_use]
    pub fn steps(&self) -> Vec<FormStep<RegistrationField>> {
        use RegistrationField as F;

        let fills = [
            (F::Email, self.email.as_ref(), false),
            (F::Password, self.password.as_ref(), false),
            (F::FirstName, self.first_name.as_ref(), false),
            (F::LastName, self.last_name.as_ref(), false),
            (F::MiddleName, self.middle_name.as_ref(), false),
            (F::Sex, self.sex.as_ref(), true),
            (F::Title, self.title.as_ref(), true),
            (F::EmploymentStatus, self.employment_status.as_ref(), true),
            (F::DateOfBirth, self.date_of_birth.as_ref(), false),
            (F::MaritalStatus, self.marital_status.as_ref(), true),
            (F::NumberOfDependents, self.number_of_dependents.as_ref(), false),
            (F::Username, self.username.as_ref(), false),
        ];

        let mut steps: Vec<_> = fills
            .into_iter()
            .filter_map(|(field, value, select)| {
                present(value).map(|v| {
                    if select {
                        FormStep::Select(field, v)
                    } else {
                        FormStep::Fill(field, v)
                    }
                })
            })
            .collect();

        if self.agree_to_privacy_policy == Some(true) {
            steps.push(FormStep::Check(F::AgreeToPrivacyPolicy));
        }
        steps
    }
}

/// Account types offered by the new-account form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// `checking`
    Checking,
    /// `savings`
    Savings,
}

impl AccountType {
    /// Option value in the type select
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controls of the new-account form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NewAccountField {
    /// `#accountNickname`
    Nickname,
    /// `#typeOfAccount`
    AccountType,
}

/// New-account application data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewAccountForm {
    /// Account nickname
    pub nickname: Option<String>,
    /// Account type
    pub account_type: Option<AccountType>,
}

impl NewAccountForm {
    /// Nickname and type
    #[must_use]
    pub fn new(nickname: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            nickname: Some(nickname.into()),
            account_type: Some(account_type),
        }
    }

    /// Steps for the present fields, in tab order
    #[must_use]
    pub fn steps(&self) -> Vec<FormStep<NewAccountField>> {
        let mut steps = Vec::new();
        if let Some(nickname) = present(self.nickname.as_ref()) {
            steps.push(FormStep::Fill(NewAccountField::Nickname, nickname));
        }
        if let Some(kind) = self.account_type {
            steps.push(FormStep::Select(
                NewAccountField::AccountType,
                kind.as_str().to_string(),
            ));
        }
        steps
    }
}

/// Login credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// `{prefix}{epoch millis}`
#[must_use]
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}{}", millis())
}

/// `{prefix}{epoch millis}@mailinator.com`
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}{}@mailinator.com", millis())
}

/// Account nickname like `MyChecking1750095679944`
#[must_use]
pub fn unique_nickname(account_type: AccountType) -> String {
    let kind = match account_type {
        AccountType::Checking => "Checking",
        AccountType::Savings => "Savings",
    };
    format!("My{kind}{}", millis())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod registration_tests {
        use super::*;

        #[test]
        fn test_sample_covers_every_field() {
            let steps = RegistrationForm::sample("jdoe").steps();
            assert_eq!(steps.len(), 13);
            assert_eq!(steps[0].field(), RegistrationField::Email);
            assert_eq!(
                steps[5],
                FormStep::Select(RegistrationField::Sex, "male".into())
            );
            assert_eq!(
                steps.last(),
                Some(&FormStep::Check(RegistrationField::AgreeToPrivacyPolicy))
            );
        }

        #[test]
        fn test_absent_empty_and_false_are_skipped() {
            let form = RegistrationForm {
                email: Some(String::new()),
                first_name: Some("John".into()),
                username: Some("jdoe".into()),
                agree_to_privacy_policy: Some(false),
                ..RegistrationForm::default()
            };
            assert_eq!(
                form.steps(),
                vec![
                    FormStep::Fill(RegistrationField::FirstName, "John".into()),
                    FormStep::Fill(RegistrationField::Username, "jdoe".into()),
                ]
            );
        }

        #[test]
        fn test_empty_record_has_no_steps() {
            assert!(RegistrationForm::default().steps().is_empty());
        }

        #[test]
        fn test_deserialize_camel_case() {
            let form: RegistrationForm = serde_json::from_str(
                r#"{"firstName": "Jane", "agreeToPrivacyPolicy": true}"#,
            )
            .unwrap();
            assert_eq!(form.first_name.as_deref(), Some("Jane"));
            assert_eq!(form.steps().len(), 2);
        }
    }

    mod new_account_tests {
        use super::*;

        #[test]
        fn test_full_form() {
            let form = NewAccountForm::new("MySavings1", AccountType::Savings);
            assert_eq!(
                form.steps(),
                vec![
                    FormStep::Fill(NewAccountField::Nickname, "MySavings1".into()),
                    FormStep::Select(NewAccountField::AccountType, "savings".into()),
                ]
            );
        }

        #[test]
        fn test_empty_nickname_only_selects() {
            let form = NewAccountForm {
                nickname: Some(String::new()),
                account_type: Some(AccountType::Checking),
            };
            assert_eq!(form.steps().len(), 1);
            assert_eq!(form.steps()[0].field(), NewAccountField::AccountType);
        }
    }

    mod data_tests {
        use super::*;

        #[test]
        fn test_unique_values() {
            assert!(unique_username("johndoe").starts_with("johndoe"));
            assert!(unique_email("test").ends_with("@mailinator.com"));
            assert!(unique_nickname(AccountType::Checking).starts_with("MyChecking"));
            assert_eq!(AccountType::Savings.to_string(), "savings");
        }

        #[test]
        fn test_credentials_debug_masks_password() {
            let text = format!("{:?}", Credentials::new("jdoe", "Password123!"));
            assert!(text.contains("jdoe"));
            assert!(!text.contains("Password123!"));
        }
    }

    fn opt_text() -> impl Strategy<Value = Option<String>> {
        prop_oneof![Just(None), Just(Some(String::new())), "[a-z]{1,8}".prop_map(Some)]
    }

    proptest! {
        #[test]
        fn prop_steps_follow_tab_order_and_skip_missing(
            email in opt_text(),
            first_name in opt_text(),
            sex in opt_text(),
            date_of_birth in opt_text(),
            username in opt_text(),
            agree in proptest::option::of(any::<bool>()),
        ) {
            let form = RegistrationForm {
                email: email.clone(),
                first_name: first_name.clone(),
                sex: sex.clone(),
                date_of_birth: date_of_birth.clone(),
                username: username.clone(),
                agree_to_privacy_policy: agree,
                ..RegistrationForm::default()
            };
            let steps = form.steps();

            let fields: Vec<_> = steps.iter().map(FormStep::field).collect();
            prop_assert!(fields.windows(2).all(|w| w[0] < w[1]));

            let filled = |v: &Option<String>| v.as_ref().is_some_and(|s| !s.is_empty());
            let expected = [&email, &first_name, &sex, &date_of_birth, &username]
                .into_iter()
                .filter(|v| filled(*v))
                .count()
                + usize::from(agree == Some(true));
            prop_assert_eq!(steps.len(), expected);
        }
    }
}
