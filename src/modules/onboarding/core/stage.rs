use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStage {
    #[default]
    EmailVerification,
    PasswordSetup,
    PersonalInformation,
    Address,
    EmergencyContact,
    FinancialInformation,
    Completed,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown onboarding stage: {0}")]
pub struct UnknownStage(pub String);

impl OnboardingStage {
    pub const ALL: [OnboardingStage; 7] = [
        OnboardingStage::EmailVerification,
        OnboardingStage::PasswordSetup,
        OnboardingStage::PersonalInformation,
        OnboardingStage::Address,
        OnboardingStage::EmergencyContact,
        OnboardingStage::FinancialInformation,
        OnboardingStage::Completed,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.position() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.position().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_completed(self) -> bool {
        self == OnboardingStage::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OnboardingStage::EmailVerification => "EMAIL_VERIFICATION",
            OnboardingStage::PasswordSetup => "PASSWORD_SETUP",
            OnboardingStage::PersonalInformation => "PERSONAL_INFORMATION",
            OnboardingStage::Address => "ADDRESS",
            OnboardingStage::EmergencyContact => "EMERGENCY_CONTACT",
            OnboardingStage::FinancialInformation => "FINANCIAL_INFORMATION",
            OnboardingStage::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for OnboardingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardingStage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}
