//! Password rules, strength meter and the change-password form

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{derived, FieldErrors, Schema};

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Points per satisfied rule beyond the first.
const POINTS_PER_RULE: usize = 25;

/// One password complexity rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordRule {
    /// All rules, in the order their messages are reported.
    pub const ALL: [Self; 5] = [
        Self::MinLength,
        Self::Uppercase,
        Self::Lowercase,
        Self::Digit,
        Self::Special,
    ];

    pub fn is_satisfied(self, password: &str) -> bool {
        match self {
            Self::MinLength => password.chars().count() >= MIN_PASSWORD_LEN,
            Self::Uppercase => password.chars().any(char::is_uppercase),
            Self::Lowercase => password.chars().any(char::is_lowercase),
            Self::Digit => password.chars().any(|c| c.is_ascii_digit()),
            Self::Special => password
                .chars()
                .any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::MinLength => "Password must be at least 8 characters",
            Self::Uppercase => "Password must contain an uppercase letter",
            Self::Lowercase => "Password must contain a lowercase letter",
            Self::Digit => "Password must contain a number",
            Self::Special => "Password must contain a special character",
        }
    }

    /// First rule `password` fails, if any.
    pub fn first_failing(password: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| !rule.is_satisfied(password))
    }
}

/// Strength score in `0..=100`.
///
/// Each satisfied rule beyond the first adds 25 points: all five rules give
/// 100, four give 75, one or none give 0.
pub fn password_strength(password: &str) -> u8 {
    let satisfied = PasswordRule::ALL
        .iter()
        .filter(|rule| rule.is_satisfied(password))
        .count();
    let score = satisfied.saturating_sub(1) * POINTS_PER_RULE;
    u8::try_from(score.min(100)).unwrap_or(100)
}

/// Strength meter bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=49 => Self::Weak,
            50..=74 => Self::Fair,
            75..=99 => Self::Good,
            _ => Self::Strong,
        }
    }

    pub fn of(password: &str) -> Self {
        Self::from_score(password_strength(password))
    }
}

/// Change-password form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    pub fn new(
        current: impl Into<String>,
        new: impl Into<String>,
        confirm: impl Into<String>,
    ) -> Self {
        Self {
            current_password: current.into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        }
    }

    /// Live strength of the new password.
    pub fn strength(&self) -> u8 {
        password_strength(&self.new_password)
    }
}

impl Schema for PasswordChangeForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = derived(self);

        if let Some(rule) = PasswordRule::first_failing(&self.new_password) {
            errors.insert("newPassword", rule.message());
        } else if self.new_password == self.current_password {
            errors.insert(
                "newPassword",
                "New password must be different from the current password",
            );
        }

        if self.confirm_password.is_empty() {
            errors.insert("confirmPassword", "Please confirm your new password");
        } else if self.confirm_password != self.new_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }

        errors.into_result()
    }
}
