//! Form validation schemas
//!
//! Each form is a plain struct. Simple per-field constraints (length, email,
//! range, custom checks) are declared with `validator` derives; cross-field
//! refinements (password confirmation, card expiry, duplicate nameservers)
//! are applied in [`Schema::check`]. Validation is synchronous and never
//! touches the network.
//!
//! Errors are reported as [`FieldErrors`]: one human-readable message per
//! field path, using camelCase names (`confirmPassword`) and `[i]` indices for
//! list entries (`nameservers[2]`).

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

mod account;
mod dns_record;
mod nameservers;
mod password;
mod payment;
pub(crate) mod rules;
mod ticket;

pub use account::{AddressForm, LoginForm, ProfileForm};
pub use dns_record::DnsRecordForm;
pub use nameservers::{NameserverForm, MAX_NAMESERVERS, MIN_NAMESERVERS};
pub use password::{password_strength, PasswordChangeForm, PasswordRule, StrengthLevel};
pub use payment::{luhn_valid, CardBrand, CardExpiry, PaymentMethodForm};
pub use ticket::TicketForm;

/// Field path -> message map produced by a failed validation.
///
/// Only the first message per field is kept, matching what a form shows
/// under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map with a single entry.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Record a message for `field` unless one is already present.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other`, keeping existing messages on conflict.
    pub fn merge(&mut self, other: Self) {
        for (field, message) in other.0 {
            self.insert(field, message);
        }
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, kind) in errors.errors() {
            if let ValidationErrorsKind::Field(list) = kind {
                if let Some(first) = list.first() {
                    out.insert(camel_case(&field.to_string()), message_of(first));
                }
            }
        }
        out
    }
}

/// A form that can be validated as a whole or one field at a time.
pub trait Schema {
    /// Validate every field and cross-field refinement.
    fn check(&self) -> Result<(), FieldErrors>;

    /// Message for a single field, for live feedback while typing.
    fn check_field(&self, path: &str) -> Option<String> {
        self.check()
            .err()
            .and_then(|errors| errors.get(path).map(str::to_string))
    }
}

/// Run the `validator` derive and convert its output.
pub(crate) fn derived<T: validator::Validate>(value: &T) -> FieldErrors {
    match value.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => FieldErrors::from(&errors),
    }
}

/// Build a `validator` error with a fixed message, for custom field checks.
pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn message_of(error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map_or_else(|| format!("Invalid value ({})", error.code), ToString::to_string)
}

/// `snake_case` -> `camelCase`; camelCase input is returned unchanged.
pub(crate) fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_conversion() {
        assert_eq!(camel_case("confirm_password"), "confirmPassword");
        assert_eq!(camel_case("postal_code"), "postalCode");
        assert_eq!(camel_case("email"), "email");
        assert_eq!(camel_case("cardNumber"), "cardNumber");
    }

    #[test]
    fn first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "Email is required");
        errors.insert("email", "Invalid email address");
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn display_is_ordered() {
        let mut errors = FieldErrors::new();
        errors.insert("zip", "bad");
        errors.insert("city", "missing");
        assert_eq!(errors.to_string(), "city: missing; zip: bad");
    }

    #[test]
    fn into_result() {
        assert!(FieldErrors::new().into_result().is_ok());
        assert!(FieldErrors::single("a", "b").into_result().is_err());
    }

    #[test]
    fn serializes_as_plain_map() {
        let json = serde_json::to_string(&FieldErrors::single("city", "City is required")).unwrap();
        assert_eq!(json, r#"{"city":"City is required"}"#);
    }
}
