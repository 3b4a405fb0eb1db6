// Onboarding wizard for a newly invited staff member.
//
// Purpose
// - Walk through the stages in order, one validated form per stage.
//
// Responsibilities
// - decide_submit checks a form against the current stage and yields an event.
// - evolve applies an event and advances the stage.
// - go_back returns to the previous stage and keeps what was entered.
//
// Notes
// - The password itself is never kept in wizard state.

use crate::modules::onboarding::core::forms::{
    AddressForm, EmergencyContactForm, FieldError, FinancialInformationForm, OnboardingForm,
    PersonalInformationForm,
};
use crate::modules::onboarding::core::stage::OnboardingStage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingWizard {
    pub stage: OnboardingStage,
    pub email: Option<String>,
    pub password_set: bool,
    pub personal_information: Option<PersonalInformationForm>,
    pub address: Option<AddressForm>,
    pub emergency_contact: Option<EmergencyContactForm>,
    pub financial_information: Option<FinancialInformationForm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingEvent {
    EmailVerified { email: String },
    PasswordSet,
    PersonalInformationSaved(PersonalInformationForm),
    AddressSaved(AddressForm),
    EmergencyContactSaved(EmergencyContactForm),
    FinancialInformationSaved(FinancialInformationForm),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OnboardingError {
    #[error("expected the {expected} form, got {submitted}")]
    WrongStage {
        expected: OnboardingStage,
        submitted: OnboardingStage,
    },

    #[error("onboarding is already completed")]
    AlreadyCompleted,

    #[error("no stage before {0}")]
    NoPreviousStage(OnboardingStage),

    #[error("{} invalid field(s)", .0.len())]
    Invalid(Vec<FieldError>),
}

impl OnboardingWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume at a stage reported by the backend.
    pub fn resume_at(stage: OnboardingStage) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }
}

pub fn decide_submit(
    wizard: &OnboardingWizard,
    form: OnboardingForm,
) -> Result<OnboardingEvent, OnboardingError> {
    if wizard.stage.is_completed() {
        return Err(OnboardingError::AlreadyCompleted);
    }
    if form.stage() != wizard.stage {
        return Err(OnboardingError::WrongStage {
            expected: wizard.stage,
            submitted: form.stage(),
        });
    }

    let mut errors = form.validate();
    if let (OnboardingForm::PasswordSetup(f), Some(verified)) = (&form, &wizard.email) {
        if !f.email.eq_ignore_ascii_case(verified) {
            errors.push(FieldError {
                field: "email".to_string(),
                message: "Email does not match the verified address".to_string(),
            });
        }
    }
    if !errors.is_empty() {
        return Err(OnboardingError::Invalid(errors));
    }

    Ok(match form {
        OnboardingForm::EmailVerification(f) => OnboardingEvent::EmailVerified { email: f.email },
        OnboardingForm::PasswordSetup(_) => OnboardingEvent::PasswordSet,
        OnboardingForm::PersonalInformation(f) => OnboardingEvent::PersonalInformationSaved(f),
        OnboardingForm::Address(f) => OnboardingEvent::AddressSaved(f),
        OnboardingForm::EmergencyContact(f) => OnboardingEvent::EmergencyContactSaved(f),
        OnboardingForm::FinancialInformation(f) => OnboardingEvent::FinancialInformationSaved(f),
    })
}

pub fn evolve(wizard: OnboardingWizard, event: OnboardingEvent) -> OnboardingWizard {
    let mut next = match event {
        OnboardingEvent::EmailVerified { email } => OnboardingWizard {
            email: Some(email),
            ..wizard
        },
        OnboardingEvent::PasswordSet => OnboardingWizard {
            password_set: true,
            ..wizard
        },
        OnboardingEvent::PersonalInformationSaved(f) => OnboardingWizard {
            personal_information: Some(f),
            ..wizard
        },
        OnboardingEvent::AddressSaved(f) => OnboardingWizard {
            address: Some(f),
            ..wizard
        },
        OnboardingEvent::EmergencyContactSaved(f) => OnboardingWizard {
            emergency_contact: Some(f),
            ..wizard
        },
        OnboardingEvent::FinancialInformationSaved(f) => OnboardingWizard {
            financial_information: Some(f),
            ..wizard
        },
    };
    next.stage = next.stage.next().unwrap_or(OnboardingStage::Completed);
    next
}

pub fn go_back(wizard: OnboardingWizard) -> Result<OnboardingWizard, OnboardingError> {
    if wizard.stage.is_completed() {
        return Err(OnboardingError::AlreadyCompleted);
    }
    match wizard.stage.previous() {
        Some(stage) => Ok(OnboardingWizard { stage, ..wizard }),
        None => Err(OnboardingError::NoPreviousStage(wizard.stage)),
    }
}

pub fn reset() -> OnboardingWizard {
    OnboardingWizard::new()
}
