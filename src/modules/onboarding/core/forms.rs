// One form per onboarding stage, with field validation.
//
// Validation collects every problem instead of stopping at the first, so a
// form can show all of its messages at once.

use crate::modules::onboarding::core::stage::OnboardingStage;
use serde::{Deserialize, Serialize};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailVerificationForm {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordSetupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInformationForm {
    pub title: String,
    pub first_name: String,
    #[serde(default)]
    pub other_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressForm {
    pub line: String,
    pub street_name: String,
    pub city: String,
    pub postcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContactForm {
    pub relationship: String,
    pub name: String,
    pub phone_number: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub name: String,
    pub bsb: String,
    pub account: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperAnnuation {
    pub name: String,
    pub abn: String,
    pub usi: String,
    pub member_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialInformationForm {
    pub tfn: String,
    pub bank_details: BankDetails,
    pub super_annuation: SuperAnnuation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingForm {
    EmailVerification(EmailVerificationForm),
    PasswordSetup(PasswordSetupForm),
    PersonalInformation(PersonalInformationForm),
    Address(AddressForm),
    EmergencyContact(EmergencyContactForm),
    FinancialInformation(FinancialInformationForm),
}

impl OnboardingForm {
    /// The stage this form belongs to.
    pub fn stage(&self) -> OnboardingStage {
        match self {
            OnboardingForm::EmailVerification(_) => OnboardingStage::EmailVerification,
            OnboardingForm::PasswordSetup(_) => OnboardingStage::PasswordSetup,
            OnboardingForm::PersonalInformation(_) => OnboardingStage::PersonalInformation,
            OnboardingForm::Address(_) => OnboardingStage::Address,
            OnboardingForm::EmergencyContact(_) => OnboardingStage::EmergencyContact,
            OnboardingForm::FinancialInformation(_) => OnboardingStage::FinancialInformation,
        }
    }

    pub fn validate(&self) -> Vec<FieldError> {
        match self {
            OnboardingForm::EmailVerification(f) => {
                let mut errors = email_errors("email", &f.email);
                require(&mut errors, "token", &f.token);
                errors
            }
            OnboardingForm::PasswordSetup(f) => {
                let mut errors = email_errors("email", &f.email);
                errors.extend(
                    password_issues(&f.password)
                        .into_iter()
                        .map(|message| FieldError::new("password", message)),
                );
                if f.password != f.confirm_password {
                    errors.push(FieldError::new("confirm_password", "Passwords do not match"));
                }
                errors
            }
            OnboardingForm::PersonalInformation(f) => {
                let mut errors = Vec::new();
                require(&mut errors, "title", &f.title);
                require(&mut errors, "first_name", &f.first_name);
                require(&mut errors, "last_name", &f.last_name);
                require(&mut errors, "phone_number", &f.phone_number);
                errors.extend(email_errors("email", &f.email));
                errors
            }
            OnboardingForm::Address(f) => {
                let mut errors = Vec::new();
                require(&mut errors, "line", &f.line);
                require(&mut errors, "street_name", &f.street_name);
                require(&mut errors, "city", &f.city);
                require(&mut errors, "postcode", &f.postcode);
                errors
            }
            OnboardingForm::EmergencyContact(f) => {
                let mut errors = Vec::new();
                require(&mut errors, "relationship", &f.relationship);
                require(&mut errors, "name", &f.name);
                require(&mut errors, "phone_number", &f.phone_number);
                require(&mut errors, "address", &f.address);
                errors
            }
            OnboardingForm::FinancialInformation(f) => {
                let mut errors = Vec::new();
                require(&mut errors, "tfn", &f.tfn);
                require(&mut errors, "bank_details.name", &f.bank_details.name);
                require(&mut errors, "bank_details.bsb", &f.bank_details.bsb);
                require(&mut errors, "bank_details.account", &f.bank_details.account);
                require(&mut errors, "super_annuation.name", &f.super_annuation.name);
                require(&mut errors, "super_annuation.abn", &f.super_annuation.abn);
                require(&mut errors, "super_annuation.usi", &f.super_annuation.usi);
                require(
                    &mut errors,
                    "super_annuation.member_number",
                    &f.super_annuation.member_number,
                );
                errors
            }
        }
    }
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "Required"));
    }
}

/// A single `@` with a non-empty local part and a dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn email_errors(field: &str, email: &str) -> Vec<FieldError> {
    if is_valid_email(email) {
        Vec::new()
    } else {
        vec![FieldError::new(field, "Invalid email address")]
    }
}

/// Every password rule the value breaks.
pub fn password_issues(password: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        issues.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        issues.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push("Password must contain at least one number");
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        issues.push("Password must contain at least one special character");
    }
    issues
}
