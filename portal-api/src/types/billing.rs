use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Money ============

/// An amount of money in minor units (cents) with its ISO-4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in minor units.
    pub amount: i64,
    /// ISO-4217 currency code (e.g., `"EUR"`).
    pub currency: String,
}

impl Money {
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        write!(f, "{sign}{}.{:02} {}", abs / 100, abs % 100, self.currency)
    }
}

// ============ Subscriptions ============

/// How often a subscription is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

/// A recurring service subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    /// Service name (e.g., `"Web Hosting"`).
    pub service: String,
    /// Plan name (e.g., `"Business"`).
    pub plan: String,
    /// Price per billing cycle.
    pub amount: Money,
    pub billing_cycle: BillingCycle,
    /// Date of the next charge.
    #[serde(with = "crate::utils::datetime")]
    pub next_payment: DateTime<Utc>,
    pub auto_renewal: bool,
    pub status: SubscriptionStatus,
}

/// Partial update sent with `PATCH /subscriptions/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renewal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SubscriptionStatus>,
}

impl SubscriptionUpdate {
    /// Apply the update to a local copy of the subscription.
    pub fn apply_to(&self, subscription: &mut Subscription) {
        if let Some(auto_renewal) = self.auto_renewal {
            subscription.auto_renewal = auto_renewal;
        }
        if let Some(status) = self.status {
            subscription.status = status;
        }
    }

    /// The update restoring the fields this one touches to their values in `subscription`.
    #[must_use]
    pub fn inverse(&self, subscription: &Subscription) -> Self {
        Self {
            auto_renewal: self.auto_renewal.map(|_| subscription.auto_renewal),
            status: self.status.map(|_| subscription.status),
        }
    }
}

// ============ Invoices ============

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_amount: Money,
    pub total: Money,
}

/// An issued invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    /// Human-facing invoice number (e.g., `"INV-2026-0042"`).
    pub number: String,
    #[serde(with = "crate::utils::datetime")]
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub status: InvoiceStatus,
    #[serde(default)]
    pub items: Vec<InvoiceLineItem>,
}

// ============ Payment Sources ============

/// Payment method details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentSourceKind {
    /// A stored card. Only display metadata is ever returned.
    #[serde(rename_all = "camelCase")]
    Card {
        brand: String,
        last4: String,
        exp_month: u8,
        exp_year: u16,
    },
    /// A linked `PayPal` account.
    Paypal { email: String },
}

/// A stored payment method.
///
/// Exactly one source per account is the default; the backend enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSource {
    pub id: String,
    #[serde(flatten)]
    pub kind: PaymentSourceKind,
    pub is_default: bool,
}

/// Body of `POST /payment-methods` for a new card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub cardholder_name: String,
    /// Digits only.
    pub number: String,
    pub exp_month: u8,
    /// Four-digit year.
    pub exp_year: u16,
    pub cvc: String,
    /// Make the new card the default source.
    #[serde(default)]
    pub make_default: bool,
}
