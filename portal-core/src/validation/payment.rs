//! Card payment method form

use chrono::{Datelike, NaiveDate, Utc};
use portal_api::NewCard;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{derived, invalid, FieldErrors, Schema};

const MIN_CARD_DIGITS: usize = 13;
const MAX_CARD_DIGITS: usize = 19;

/// Card network, detected from the number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardBrand {
    /// Detect the brand from a card number. Spaces and dashes are ignored.
    pub fn detect(number: &str) -> Self {
        let digits = normalize_card_number(number);
        let prefix = |len: usize| -> u32 {
            digits
                .get(..len)
                .and_then(|p| p.parse().ok())
                .unwrap_or(0)
        };

        if digits.starts_with('4') {
            Self::Visa
        } else if (51..=55).contains(&prefix(2)) || (2221..=2720).contains(&prefix(4)) {
            Self::Mastercard
        } else if matches!(prefix(2), 34 | 37) {
            Self::Amex
        } else if prefix(4) == 6011 || prefix(2) == 65 || (644..=649).contains(&prefix(3)) {
            Self::Discover
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
            Self::Unknown => "unknown",
        }
    }
}

/// Luhn checksum over a digit string. Empty or non-digit input is invalid.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn normalize_card_number(number: &str) -> String {
    number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect()
}

/// Card expiry month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardExpiry {
    pub month: u8,
    /// Four-digit year.
    pub year: u16,
}

impl CardExpiry {
    /// Parse `MM/YY`.
    pub fn parse(value: &str) -> Option<Self> {
        let (month, year) = value.trim().split_once('/')?;
        let (month, year) = (month.trim(), year.trim());
        if month.len() != 2 || year.len() != 2 {
            return None;
        }
        let month: u8 = month.parse().ok()?;
        let year: u16 = year.parse().ok()?;
        (1..=12)
            .contains(&month)
            .then_some(Self {
                month,
                year: 2000 + year,
            })
    }

    /// A card is valid through the last day of its expiry month.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        let current = (today.year(), today.month());
        (i32::from(self.year), u32::from(self.month)) < current
    }
}

/// Add-card form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodForm {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Cardholder name must be between 2 and 100 characters"
    ))]
    pub cardholder_name: String,
    pub card_number: String,
    /// `MM/YY`
    pub expiry: String,
    #[validate(custom(function = "validate_cvc"))]
    pub cvc: String,
    #[serde(default)]
    pub make_default: bool,
}

fn validate_cvc(cvc: &str) -> Result<(), ValidationError> {
    let ok = (3..=4).contains(&cvc.len()) && cvc.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(invalid("cvc", "CVC must be 3 or 4 digits"))
    }
}

impl PaymentMethodForm {
    /// Validate with an explicit "today" for the expiry check.
    pub fn check_at(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = derived(self);

        if let Some(message) = card_number_error(&self.card_number) {
            errors.insert("cardNumber", message);
        }

        match CardExpiry::parse(&self.expiry) {
            None => errors.insert("expiry", "Expiry must be in MM/YY format"),
            Some(expiry) if expiry.is_expired(today) => errors.insert("expiry", "Card has expired"),
            Some(_) => {}
        }

        errors.into_result()
    }

    pub fn brand(&self) -> CardBrand {
        CardBrand::detect(&self.card_number)
    }

    /// Request body for a validated form. `None` when the expiry does not parse.
    pub fn to_new_card(&self) -> Option<NewCard> {
        let expiry = CardExpiry::parse(&self.expiry)?;
        Some(NewCard {
            cardholder_name: self.cardholder_name.trim().to_string(),
            number: normalize_card_number(&self.card_number),
            exp_month: expiry.month,
            exp_year: expiry.year,
            cvc: self.cvc.clone(),
            make_default: self.make_default,
        })
    }
}

fn card_number_error(number: &str) -> Option<&'static str> {
    let digits = normalize_card_number(number);
    if digits.is_empty() {
        return Some("Card number is required");
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Some("Card number must contain only digits");
    }
    if !luhn_valid(&digits) {
        return Some("Invalid card number");
    }
    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits.len()) {
        return Some("Card number must be between 13 and 19 digits");
    }
    None
}

impl Schema for PaymentMethodForm {
    fn check(&self) -> Result<(), FieldErrors> {
        self.check_at(Utc::now().date_naive())
    }
}
