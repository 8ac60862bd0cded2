//! Wire types mirrored from the portal backend schema.
//!
//! All types use camelCase JSON field names. The backend owns every entity;
//! these are shallow copies held for display and optimistic mutation.

mod billing;
mod dashboard;
mod domain;
mod ticket;
mod user;

pub use billing::{
    BillingCycle, Invoice, InvoiceLineItem, InvoiceStatus, Money, NewCard, PaymentSource,
    PaymentSourceKind, Subscription, SubscriptionStatus, SubscriptionUpdate,
};
pub use dashboard::{ActivityItem, ActivityKind, DashboardSummary};
pub use domain::{DnsRecord, DnsRecordType, Domain, DomainStatus, DomainUpdate};
pub use ticket::{
    MessageAuthor, NewTicket, Ticket, TicketCategory, TicketMessage, TicketPriority, TicketReply,
    TicketStatus,
};
pub use user::{
    Address, BackupCodes, LoginActivity, PasswordChange, Profile, SecuritySettings,
    TwoFactorSetup,
};
