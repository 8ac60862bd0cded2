//! Profile, address and login forms

use portal_api::{Address, Profile};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::rules::{COUNTRY_CODE, PHONE, POSTAL_CODE};
use super::{derived, invalid, FieldErrors, Schema};

/// Treat blank optional inputs as absent.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ============ Profile ============

/// Edit-profile form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[validate(length(min = 1, max = 50, message = "First name must be between 1 and 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name must be between 1 and 50 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "Company name must be at most 100 characters"))]
    pub company: Option<String>,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.trim().is_empty() || PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(invalid("phone", "Invalid phone number"))
    }
}

impl ProfileForm {
    pub fn to_profile(&self) -> Profile {
        Profile {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: non_blank(self.phone.as_deref()),
            company: non_blank(self.company.as_deref()),
        }
    }
}

impl From<&Profile> for ProfileForm {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            company: profile.company.clone(),
        }
    }
}

impl Schema for ProfileForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = derived(self);
        if self.email.trim().is_empty() {
            errors.remove("email");
            errors.insert("email", "Email is required");
        }
        errors.into_result()
    }
}

// ============ Address ============

/// Billing address form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[validate(length(min = 1, max = 100, message = "Street must be between 1 and 100 characters"))]
    pub street: String,
    #[validate(length(min = 1, max = 50, message = "City must be between 1 and 50 characters"))]
    pub city: String,
    #[validate(custom(function = "validate_postal_code"))]
    pub postal_code: String,
    #[validate(custom(function = "validate_country"))]
    pub country: String,
    #[validate(length(max = 50, message = "State must be at most 50 characters"))]
    pub state: Option<String>,
}

fn validate_postal_code(code: &str) -> Result<(), ValidationError> {
    if POSTAL_CODE.is_match(code) {
        Ok(())
    } else {
        Err(invalid("postal_code", "Invalid postal code"))
    }
}

fn validate_country(country: &str) -> Result<(), ValidationError> {
    if COUNTRY_CODE.is_match(country) {
        Ok(())
    } else {
        Err(invalid("country", "Country must be a two-letter ISO code"))
    }
}

impl AddressForm {
    pub fn to_address(&self) -> Address {
        Address {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.clone(),
            state: non_blank(self.state.as_deref()),
        }
    }
}

impl From<&Address> for AddressForm {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            postal_code: address.postal_code.clone(),
            country: address.country.clone(),
            state: address.state.clone(),
        }
    }
}

impl Schema for AddressForm {
    fn check(&self) -> Result<(), FieldErrors> {
        derived(self).into_result()
    }
}

// ============ Login ============

/// Sign-in form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Schema for LoginForm {
    fn check(&self) -> Result<(), FieldErrors> {
        derived(self).into_result()
    }
}
