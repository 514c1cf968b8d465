//! Login, registration and profile forms.
//!
//! Forms are validated locally before anything is sent; a form that fails
//! validation never reaches the network. Field names in [`FieldErrors`] are
//! the struct field names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// Messages per field, in field-name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Keep only the errors for `fields`.
    fn retain_fields(mut self, fields: &[&str]) -> Self {
        self.0.retain(|field, _| fields.contains(&field.as_str()));
        self
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut map = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            map.insert(field.to_string(), messages);
        }
        Self(map)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Validate a form, flattening failures into [`FieldErrors`].
pub fn check<T: Validate>(form: &T) -> Result<(), FieldErrors> {
    form.validate().map_err(|errors| FieldErrors::from(&errors))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn validate_user_type(user_type: &str) -> Result<(), ValidationError> {
    match user_type {
        "pharmacist" | "doctor" => Ok(()),
        _ => Err(invalid("user_type", "Please select a user type")),
    }
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    match gender {
        "male" | "female" => Ok(()),
        _ => Err(invalid("gender", "Please select a gender")),
    }
}

/// `yyyy-MM-dd` and an actual calendar date.
fn validate_dob(dob: &str) -> Result<(), ValidationError> {
    let shaped = dob.len() == 10
        && dob.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });

    if shaped && NaiveDate::parse_from_str(dob, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(invalid(
            "dob",
            "Date of birth must be a valid date in yyyy-MM-dd format",
        ))
    }
}

fn positive_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|n| n.is_finite() && n > 0.0)
        .unwrap_or(false)
}

fn validate_height(height: &str) -> Result<(), ValidationError> {
    if positive_number(height) {
        Ok(())
    } else {
        Err(invalid("height", "Height must be a positive number"))
    }
}

fn validate_weight(weight: &str) -> Result<(), ValidationError> {
    if positive_number(weight) {
        Ok(())
    } else {
        Err(invalid("weight", "Weight must be a positive number"))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// `pharmacist` or `doctor`
    #[validate(custom(function = "validate_user_type"))]
    pub user_type: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,
    #[validate(custom(function = "validate_user_type"))]
    pub user_type: String,
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(custom(function = "validate_dob"))]
    pub dob: String,
    #[validate(custom(function = "validate_height"))]
    pub height: String,
    #[validate(custom(function = "validate_weight"))]
    pub weight: String,
}

impl RegisterForm {
    /// Profile values as cached after a successful registration
    pub fn profile(&self) -> ProfileForm {
        ProfileForm {
            email: self.email.clone(),
            user_type: self.user_type.clone(),
            full_name: self.full_name.clone(),
            gender: self.gender.clone(),
            dob: self.dob.clone(),
            height: self.height.clone(),
            weight: self.weight.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_user_type"))]
    pub user_type: String,
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(custom(function = "validate_dob"))]
    pub dob: String,
    #[validate(custom(function = "validate_height"))]
    pub height: String,
    #[validate(custom(function = "validate_weight"))]
    pub weight: String,
}

/// Registration wizard pages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Account,
    Details,
    Confirmation,
}

impl WizardStep {
    /// Fields a user fills in on this page
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            WizardStep::Account => &["email", "password", "confirm_password", "user_type"],
            WizardStep::Details => &["full_name", "gender", "dob", "height", "weight"],
            WizardStep::Confirmation => &[],
        }
    }

    fn next(self) -> Self {
        match self {
            WizardStep::Account => WizardStep::Details,
            WizardStep::Details | WizardStep::Confirmation => WizardStep::Confirmation,
        }
    }

    fn previous(self) -> Self {
        match self {
            WizardStep::Account | WizardStep::Details => WizardStep::Account,
            WizardStep::Confirmation => WizardStep::Details,
        }
    }
}

/// Multi-step registration.
///
/// Moving forward checks only the page being left; [`submit`](Self::submit)
/// checks everything.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    pub form: RegisterForm,
    step: WizardStep,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            form: RegisterForm::default(),
            step: WizardStep::Account,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Advance when the current page's fields are valid.
    pub fn next(&mut self) -> Result<WizardStep, FieldErrors> {
        if let Err(errors) = check(&self.form) {
            let page_errors = errors.retain_fields(self.step.fields());
            if !page_errors.is_empty() {
                return Err(page_errors);
            }
        }
        self.step = self.step.next();
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = self.step.previous();
        self.step
    }

    /// Validate the whole form regardless of the current page.
    pub fn submit(&self) -> Result<&RegisterForm, FieldErrors> {
        check(&self.form)?;
        Ok(&self.form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_register_form() -> RegisterForm {
        RegisterForm {
            email: "nora@rx.test".to_string(),
            password: "longenough".to_string(),
            confirm_password: "longenough".to_string(),
            user_type: "pharmacist".to_string(),
            full_name: "Nora Haddad".to_string(),
            gender: "female".to_string(),
            dob: "1994-02-28".to_string(),
            height: "162.5".to_string(),
            weight: "54".to_string(),
        }
    }

    #[test]
    fn test_valid_register_form_passes() {
        assert!(check(&valid_register_form()).is_ok());
    }

    #[test]
    fn test_password_mismatch_is_reported_on_confirmation() {
        let mut form = valid_register_form();
        form.confirm_password = "different1".to_string();

        let errors = check(&form).unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["confirm_password"]);
        assert_eq!(errors.messages("confirm_password"), ["Passwords don't match"]);
    }

    #[test]
    fn test_field_rules() {
        let form = RegisterForm {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            confirm_password: "short".to_string(),
            user_type: "nurse".to_string(),
            full_name: "N".to_string(),
            gender: "other".to_string(),
            dob: "1994-02-30".to_string(),
            height: "-3".to_string(),
            weight: "heavy".to_string(),
        };

        let errors = check(&form).unwrap_err();
        assert_eq!(errors.messages("user_type"), ["Please select a user type"]);

        for field in [
            "email", "password", "user_type", "full_name", "gender", "dob", "height", "weight",
        ] {
            assert!(errors.contains(field), "expected an error on {field}");
        }
        assert!(!errors.contains("confirm_password"));
    }

    #[test]
    fn test_dob_requires_padded_iso_format() {
        assert!(validate_dob("1994-02-28").is_ok());
        assert!(validate_dob("1994-2-28").is_err());
        assert!(validate_dob("28/02/1994").is_err());
        assert!(validate_dob("1994-02-28T00:00:00").is_err());
    }

    #[test]
    fn test_login_form_rules() {
        let ok = LoginForm {
            email: "nora@rx.test".to_string(),
            password: "longenough".to_string(),
            user_type: "doctor".to_string(),
            remember_me: true,
        };
        assert!(check(&ok).is_ok());

        let bad = LoginForm {
            email: "nora".to_string(),
            password: "1234567".to_string(),
            ..LoginForm::default()
        };
        let errors = check(&bad).unwrap_err();
        assert!(errors.contains("email"));
        assert_eq!(errors.messages("password"), ["Password must be at least 8 characters"]);
        assert_eq!(errors.messages("user_type"), ["Please select a user type"]);
    }

    #[test]
    fn test_login_remember_me_defaults_off() {
        let form: LoginForm = serde_json::from_str(
            r#"{"email":"nora@rx.test","password":"longenough","userType":"pharmacist"}"#,
        )
        .unwrap();
        assert!(!form.remember_me);
        assert!(check(&form).is_ok());
    }

    #[test]
    fn test_wizard_only_checks_current_page() {
        let mut wizard = RegistrationWizard::new();
        wizard.form.email = "nora@rx.test".to_string();
        wizard.form.password = "longenough".to_string();
        wizard.form.confirm_password = "longenough".to_string();

        // The account page is not done until a user type is picked.
        let errors = wizard.next().unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["user_type"]);
        assert_eq!(wizard.step(), WizardStep::Account);

        wizard.form.user_type = "pharmacist".to_string();
        // Details are still empty, but they are not on this page.
        assert_eq!(wizard.next(), Ok(WizardStep::Details));

        let errors = wizard.next().unwrap_err();
        assert!(errors.contains("full_name"));
        assert!(!errors.contains("email"));
        assert_eq!(wizard.step(), WizardStep::Details);

        wizard.form = RegisterForm {
            email: wizard.form.email.clone(),
            password: wizard.form.password.clone(),
            confirm_password: wizard.form.confirm_password.clone(),
            user_type: wizard.form.user_type.clone(),
            ..valid_register_form()
        };
        assert_eq!(wizard.next(), Ok(WizardStep::Confirmation));
        assert!(wizard.submit().is_ok());

        assert_eq!(wizard.back(), WizardStep::Details);
    }

    #[test]
    fn test_wizard_submit_checks_every_page() {
        let mut wizard = RegistrationWizard::new();
        wizard.form = valid_register_form();
        wizard.form.confirm_password = "mismatch!".to_string();

        // Submitting from the last page still catches an earlier mistake.
        wizard.step = WizardStep::Confirmation;
        let errors = wizard.submit().unwrap_err();
        assert!(errors.contains("confirm_password"));
    }

    #[test]
    fn test_profile_form_shares_rules() {
        let profile = valid_register_form().profile();
        assert!(check(&profile).is_ok());

        let bad = ProfileForm {
            gender: String::new(),
            ..profile
        };
        assert_eq!(check(&bad).unwrap_err().messages("gender"), ["Please select a gender"]);

        let no_role = ProfileForm {
            user_type: String::new(),
            ..valid_register_form().profile()
        };
        assert_eq!(
            check(&no_role).unwrap_err().messages("user_type"),
            ["Please select a user type"]
        );
    }

    proptest! {
        #[test]
        fn prop_mismatched_passwords_are_always_rejected(
            password in "[a-zA-Z0-9]{8,24}",
            confirm in "[a-zA-Z0-9]{0,24}",
        ) {
            prop_assume!(password != confirm);

            let form = RegisterForm {
                password,
                confirm_password: confirm,
                ..valid_register_form()
            };

            let errors = check(&form).unwrap_err();
            prop_assert!(errors.contains("confirm_password"));
        }
    }
}
