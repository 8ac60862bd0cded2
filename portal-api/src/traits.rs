//! Per-resource API traits.
//!
//! Stores depend on these traits rather than on [`ApiClient`](crate::ApiClient)
//! directly, so every resource can be exercised against an in-memory double.

use async_trait::async_trait;

use crate::error::Result;
use crate::query::{ListQuery, Page};
use crate::types::{
    ActivityItem, Address, BackupCodes, DashboardSummary, DnsRecord, Domain, DomainUpdate,
    Invoice, NewCard, NewTicket, PasswordChange, PaymentSource, Profile, SecuritySettings,
    Subscription, SubscriptionUpdate, Ticket, TicketMessage, TicketReply, TwoFactorSetup,
};

/// Domain registrations and their DNS zones.
#[async_trait]
pub trait DomainApi: Send + Sync {
    /// `GET /domains`
    async fn list_domains(&self, query: &ListQuery) -> Result<Page<Domain>>;

    /// `GET /domains/:id`
    async fn get_domain(&self, id: &str) -> Result<Domain>;

    /// `PATCH /domains/:id` - returns the updated domain.
    async fn update_domain(&self, id: &str, update: &DomainUpdate) -> Result<Domain>;

    /// `GET /domains/:id/dns`
    async fn list_dns_records(&self, id: &str) -> Result<Vec<DnsRecord>>;
}

/// Subscriptions, invoices and payment sources.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// `GET /subscriptions`
    async fn list_subscriptions(&self, query: &ListQuery) -> Result<Page<Subscription>>;

    /// `PATCH /subscriptions/:id` - returns the updated subscription.
    async fn update_subscription(
        &self,
        id: &str,
        update: &SubscriptionUpdate,
    ) -> Result<Subscription>;

    /// `GET /invoices`
    async fn list_invoices(&self, query: &ListQuery) -> Result<Page<Invoice>>;

    /// `GET /invoices/:id/pdf` - raw PDF bytes.
    async fn download_invoice_pdf(&self, id: &str) -> Result<Vec<u8>>;

    /// `GET /payment-methods`
    async fn list_payment_sources(&self) -> Result<Vec<PaymentSource>>;

    /// `POST /payment-methods`
    async fn add_payment_source(&self, card: &NewCard) -> Result<PaymentSource>;

    /// `POST /payment-methods/:id/default`
    async fn set_default_payment_source(&self, id: &str) -> Result<()>;

    /// `DELETE /payment-methods/:id`
    async fn remove_payment_source(&self, id: &str) -> Result<()>;
}

/// Support tickets.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// `GET /tickets`
    async fn list_tickets(&self, query: &ListQuery) -> Result<Page<Ticket>>;

    /// `GET /tickets/:id`
    async fn get_ticket(&self, id: &str) -> Result<Ticket>;

    /// `POST /tickets`
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<Ticket>;

    /// `POST /tickets/:id/reply` - returns the stored message.
    async fn reply_to_ticket(&self, id: &str, reply: &TicketReply) -> Result<TicketMessage>;
}

/// Account, address and security settings.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// `GET /user/profile`
    async fn get_profile(&self) -> Result<Profile>;

    /// `PUT /user/profile`
    async fn update_profile(&self, profile: &Profile) -> Result<Profile>;

    /// `GET /user/address`
    async fn get_address(&self) -> Result<Address>;

    /// `PUT /user/address`
    async fn update_address(&self, address: &Address) -> Result<Address>;

    /// `POST /user/password`
    async fn change_password(&self, change: &PasswordChange) -> Result<()>;

    /// `POST /user/2fa/toggle`
    async fn toggle_two_factor(&self, enabled: bool) -> Result<TwoFactorSetup>;

    /// `POST /user/2fa/verify`
    async fn verify_two_factor(&self, code: &str) -> Result<()>;

    /// `POST /user/2fa/backup-codes`
    async fn regenerate_backup_codes(&self) -> Result<BackupCodes>;

    /// `GET /user/security`
    async fn get_security(&self) -> Result<SecuritySettings>;
}

/// Dashboard widgets refreshed by polling.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /dashboard/summary`
    async fn get_summary(&self) -> Result<DashboardSummary>;

    /// `GET /dashboard/activity`
    async fn recent_activity(&self) -> Result<Vec<ActivityItem>>;
}
