//! Test helpers: an in-memory portal backend with failure injection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use portal_api::{
    ActivityItem, ActivityKind, Address, ApiError, BackupCodes, BillingApi, BillingCycle,
    DashboardApi, DashboardSummary, DnsRecord, DnsRecordType, Domain, DomainApi, DomainStatus,
    DomainUpdate, Invoice, InvoiceStatus, ListQuery, MessageAuthor, Money, NewCard, NewTicket,
    Page, PasswordChange, PaymentSource, PaymentSourceKind, Profile, Result, SecuritySettings,
    Subscription, SubscriptionStatus, SubscriptionUpdate, Ticket, TicketApi, TicketCategory,
    TicketMessage, TicketPriority, TicketReply, TicketStatus, TwoFactorSetup, UserApi,
};
use tokio::sync::{oneshot, RwLock};

use crate::notify::MemoryNotifier;

// ===== Fixtures =====

pub fn domain(id: &str, name: &str) -> Domain {
    Domain {
        id: id.to_string(),
        name: name.to_string(),
        status: DomainStatus::Active,
        registered_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        expires_at: Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap(),
        auto_renew: true,
        nameservers: vec!["ns1.host.net".into(), "ns2.host.net".into()],
        locked: true,
    }
}

pub fn subscription(id: &str, status: SubscriptionStatus) -> Subscription {
    Subscription {
        id: id.to_string(),
        service: "Web Hosting".into(),
        plan: "Business".into(),
        amount: Money::new(1999, "EUR"),
        billing_cycle: BillingCycle::Monthly,
        next_payment: Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap(),
        auto_renewal: true,
        status,
    }
}

pub fn invoice(id: &str, status: InvoiceStatus) -> Invoice {
    Invoice {
        id: id.to_string(),
        number: format!("INV-{id}"),
        date: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
        amount: Money::new(1999, "EUR"),
        status,
        items: Vec::new(),
    }
}

pub fn card(id: &str, last4: &str, is_default: bool) -> PaymentSource {
    PaymentSource {
        id: id.to_string(),
        kind: PaymentSourceKind::Card {
            brand: "visa".into(),
            last4: last4.to_string(),
            exp_month: 12,
            exp_year: 2030,
        },
        is_default,
    }
}

pub fn ticket(id: &str, status: TicketStatus) -> Ticket {
    let at = Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap();
    Ticket {
        id: id.to_string(),
        subject: "Email delivery delayed".into(),
        status,
        priority: TicketPriority::Medium,
        category: TicketCategory::Technical,
        messages: vec![TicketMessage {
            id: format!("{id}-m1"),
            author: MessageAuthor::Customer,
            body: "Outgoing mail has been queued for hours.".into(),
            created_at: at,
        }],
        created_at: at,
        updated_at: at,
    }
}

pub fn profile() -> Profile {
    Profile {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        phone: None,
        company: Some("Analytical Engines Ltd".into()),
    }
}

pub fn address() -> Address {
    Address {
        street: "1 Analytical Way".into(),
        city: "London".into(),
        postal_code: "SW1A 1AA".into(),
        country: "GB".into(),
        state: None,
    }
}

// ===== MockPortalApi =====

/// In-memory implementation of every API trait.
///
/// Every call is recorded by name (`"update_domain d1"`); while a failure is
/// set, every call is recorded and then fails with it. Calls matching a
/// [`MockPortalApi::hold`] prefix wait until released, which lets a test run
/// other operations while a request is in flight.
pub struct MockPortalApi {
    pub domains: RwLock<Vec<Domain>>,
    pub dns_records: RwLock<HashMap<String, Vec<DnsRecord>>>,
    pub subscriptions: RwLock<Vec<Subscription>>,
    pub invoices: RwLock<Vec<Invoice>>,
    pub payment_sources: RwLock<Vec<PaymentSource>>,
    pub tickets: RwLock<Vec<Ticket>>,
    pub profile: RwLock<Profile>,
    pub address: RwLock<Address>,
    pub security: RwLock<SecuritySettings>,
    pub summary: RwLock<DashboardSummary>,
    pub activity: RwLock<Vec<ActivityItem>>,
    failure: RwLock<Option<ApiError>>,
    calls: RwLock<Vec<String>>,
    held: Mutex<Vec<String>>,
    parked: Mutex<Vec<Parked>>,
}

struct Parked {
    call: String,
    resume: oneshot::Sender<Option<ApiError>>,
}

impl MockPortalApi {
    pub fn new() -> Self {
        let mut dns = HashMap::new();
        dns.insert(
            "d1".to_string(),
            vec![DnsRecord {
                id: "r1".into(),
                record_type: DnsRecordType::A,
                name: "@".into(),
                value: "192.0.2.10".into(),
                ttl: 3600,
                priority: None,
            }],
        );

        Self {
            domains: RwLock::new(vec![
                domain("d1", "example.com"),
                domain("d2", "example.org"),
            ]),
            dns_records: RwLock::new(dns),
            subscriptions: RwLock::new(vec![
                subscription("s1", SubscriptionStatus::Active),
                subscription("s2", SubscriptionStatus::Paused),
            ]),
            invoices: RwLock::new(vec![
                invoice("i1", InvoiceStatus::Paid),
                invoice("i2", InvoiceStatus::Pending),
            ]),
            payment_sources: RwLock::new(vec![card("pm_1", "4242", true), card("pm_2", "4444", false)]),
            tickets: RwLock::new(vec![ticket("t1", TicketStatus::Open)]),
            profile: RwLock::new(profile()),
            address: RwLock::new(address()),
            security: RwLock::new(SecuritySettings::default()),
            summary: RwLock::new(DashboardSummary {
                active_domains: 2,
                expiring_domains: 0,
                open_tickets: 1,
                unpaid_invoices: 1,
                next_payment: None,
            }),
            activity: RwLock::new(vec![ActivityItem {
                id: "a1".into(),
                kind: ActivityKind::Billing,
                description: "Invoice INV-i1 paid".into(),
                occurred_at: Utc.with_ymd_and_hms(2026, 9, 2, 0, 0, 0).unwrap(),
            }]),
            failure: RwLock::new(None),
            calls: RwLock::new(Vec::new()),
            held: Mutex::new(Vec::new()),
            parked: Mutex::new(Vec::new()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make every subsequent call fail with `error` (`None` to recover).
    pub async fn set_failure(&self, error: Option<ApiError>) {
        *self.failure.write().await = error;
    }

    pub async fn fail_with_status(&self, status: u16) {
        self.set_failure(Some(ApiError::Http {
            status,
            code: None,
            message: "injected failure".into(),
        }))
        .await;
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.read().await.clone()
    }

    /// Number of recorded calls whose name starts with `prefix`.
    pub async fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Park every later call whose name starts with `prefix`.
    pub fn hold(&self, prefix: &str) {
        self.held.lock().unwrap().push(prefix.to_string());
    }

    pub fn parked_count(&self) -> usize {
        self.parked.lock().unwrap().len()
    }

    /// Yield until at least `n` calls are parked.
    pub async fn wait_parked(&self, n: usize) {
        while self.parked_count() < n {
            tokio::task::yield_now().await;
        }
    }

    /// Resume the oldest parked call matching `prefix`, failing it with
    /// `error` if given.
    pub fn release(&self, prefix: &str, error: Option<ApiError>) {
        self.resume(prefix, error, false);
    }

    /// Resume the most recently parked call matching `prefix`.
    pub fn release_newest(&self, prefix: &str, error: Option<ApiError>) {
        self.resume(prefix, error, true);
    }

    fn resume(&self, prefix: &str, error: Option<ApiError>, newest: bool) {
        let mut parked = self.parked.lock().unwrap();
        let mut matching = parked
            .iter()
            .enumerate()
            .filter(|(_, p)| p.call.starts_with(prefix))
            .map(|(i, _)| i);
        let index = if newest {
            matching.next_back()
        } else {
            matching.next()
        };
        let index = index.unwrap_or_else(|| panic!("no parked call matching {prefix}"));
        let _ = parked.remove(index).resume.send(error);
    }

    async fn enter(&self, call: impl Into<String>) -> Result<()> {
        let call = call.into();
        self.calls.write().await.push(call.clone());

        let hold = self
            .held
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| call.starts_with(prefix.as_str()));
        if hold {
            let (resume, resumed) = oneshot::channel();
            self.parked.lock().unwrap().push(Parked { call, resume });
            if let Ok(Some(err)) = resumed.await {
                return Err(err);
            }
        }

        match self.failure.read().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        code: Some("NOT_FOUND".into()),
        message: format!("{what} not found"),
    }
}

fn page_of<T: Clone>(items: &[T], query: &ListQuery) -> Page<T> {
    let start = ((query.page.max(1) - 1) * query.limit) as usize;
    let slice: Vec<T> = items
        .iter()
        .skip(start)
        .take(query.limit as usize)
        .cloned()
        .collect();
    Page::new(slice, query.page, query.limit, items.len() as u32)
}

#[async_trait]
impl DomainApi for MockPortalApi {
    async fn list_domains(&self, query: &ListQuery) -> Result<Page<Domain>> {
        self.enter("list_domains").await?;
        Ok(page_of(&self.domains.read().await, query))
    }

    async fn get_domain(&self, id: &str) -> Result<Domain> {
        self.enter(format!("get_domain {id}")).await?;
        self.domains
            .read()
            .await
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| not_found("Domain"))
    }

    async fn update_domain(&self, id: &str, update: &DomainUpdate) -> Result<Domain> {
        self.enter(format!("update_domain {id}")).await?;
        let mut domains = self.domains.write().await;
        let domain = domains
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| not_found("Domain"))?;
        update.apply_to(domain);
        Ok(domain.clone())
    }

    async fn list_dns_records(&self, id: &str) -> Result<Vec<DnsRecord>> {
        self.enter(format!("list_dns_records {id}")).await?;
        Ok(self
            .dns_records
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl BillingApi for MockPortalApi {
    async fn list_subscriptions(&self, query: &ListQuery) -> Result<Page<Subscription>> {
        self.enter("list_subscriptions").await?;
        Ok(page_of(&self.subscriptions.read().await, query))
    }

    async fn update_subscription(
        &self,
        id: &str,
        update: &SubscriptionUpdate,
    ) -> Result<Subscription> {
        self.enter(format!("update_subscription {id}")).await?;
        let mut subscriptions = self.subscriptions.write().await;
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Subscription"))?;
        update.apply_to(subscription);
        Ok(subscription.clone())
    }

    async fn list_invoices(&self, query: &ListQuery) -> Result<Page<Invoice>> {
        self.enter("list_invoices").await?;
        Ok(page_of(&self.invoices.read().await, query))
    }

    async fn download_invoice_pdf(&self, id: &str) -> Result<Vec<u8>> {
        self.enter(format!("download_invoice_pdf {id}")).await?;
        Ok(format!("%PDF-1.7 {id}").into_bytes())
    }

    async fn list_payment_sources(&self) -> Result<Vec<PaymentSource>> {
        self.enter("list_payment_sources").await?;
        Ok(self.payment_sources.read().await.clone())
    }

    async fn add_payment_source(&self, new_card: &NewCard) -> Result<PaymentSource> {
        self.enter("add_payment_source").await?;
        let mut sources = self.payment_sources.write().await;
        let last4 = new_card.number[new_card.number.len().saturating_sub(4)..].to_string();
        let source = PaymentSource {
            id: format!("pm_{}", sources.len() + 1),
            kind: PaymentSourceKind::Card {
                brand: "visa".into(),
                last4,
                exp_month: new_card.exp_month,
                exp_year: new_card.exp_year,
            },
            is_default: new_card.make_default,
        };
        if source.is_default {
            for s in sources.iter_mut() {
                s.is_default = false;
            }
        }
        sources.push(source.clone());
        Ok(source)
    }

    async fn set_default_payment_source(&self, id: &str) -> Result<()> {
        self.enter(format!("set_default_payment_source {id}")).await?;
        for s in self.payment_sources.write().await.iter_mut() {
            s.is_default = s.id == id;
        }
        Ok(())
    }

    async fn remove_payment_source(&self, id: &str) -> Result<()> {
        self.enter(format!("remove_payment_source {id}")).await?;
        self.payment_sources.write().await.retain(|s| s.id != id);
        Ok(())
    }
}

#[async_trait]
impl TicketApi for MockPortalApi {
    async fn list_tickets(&self, query: &ListQuery) -> Result<Page<Ticket>> {
        self.enter("list_tickets").await?;
        Ok(page_of(&self.tickets.read().await, query))
    }

    async fn get_ticket(&self, id: &str) -> Result<Ticket> {
        self.enter(format!("get_ticket {id}")).await?;
        self.tickets
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("Ticket"))
    }

    async fn create_ticket(&self, new_ticket: &NewTicket) -> Result<Ticket> {
        self.enter("create_ticket").await?;
        let mut tickets = self.tickets.write().await;
        let now = Utc::now();
        let id = format!("t{}", tickets.len() + 1);
        let created = Ticket {
            id: id.clone(),
            subject: new_ticket.subject.clone(),
            status: TicketStatus::Open,
            priority: new_ticket.priority,
            category: new_ticket.category,
            messages: vec![TicketMessage {
                id: format!("{id}-m1"),
                author: MessageAuthor::Customer,
                body: new_ticket.message.clone(),
                created_at: now,
            }],
            created_at: now,
            updated_at: now,
        };
        tickets.push(created.clone());
        Ok(created)
    }

    async fn reply_to_ticket(&self, id: &str, reply: &TicketReply) -> Result<TicketMessage> {
        self.enter(format!("reply_to_ticket {id}")).await?;
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Ticket"))?;
        let message = TicketMessage {
            id: format!("{id}-m{}", ticket.messages.len() + 1),
            author: MessageAuthor::Customer,
            body: reply.message.clone(),
            created_at: Utc::now(),
        };
        ticket.messages.push(message.clone());
        Ok(message)
    }
}

#[async_trait]
impl UserApi for MockPortalApi {
    async fn get_profile(&self) -> Result<Profile> {
        self.enter("get_profile").await?;
        Ok(self.profile.read().await.clone())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Profile> {
        self.enter("update_profile").await?;
        *self.profile.write().await = profile.clone();
        Ok(profile.clone())
    }

    async fn get_address(&self) -> Result<Address> {
        self.enter("get_address").await?;
        Ok(self.address.read().await.clone())
    }

    async fn update_address(&self, address: &Address) -> Result<Address> {
        self.enter("update_address").await?;
        *self.address.write().await = address.clone();
        Ok(address.clone())
    }

    async fn change_password(&self, _change: &PasswordChange) -> Result<()> {
        self.enter("change_password").await?;
        self.security.write().await.last_password_change = Some(Utc::now());
        Ok(())
    }

    async fn toggle_two_factor(&self, enabled: bool) -> Result<TwoFactorSetup> {
        self.enter(format!("toggle_two_factor {enabled}")).await?;
        self.security.write().await.two_factor_enabled = enabled;
        Ok(TwoFactorSetup {
            enabled,
            secret: enabled.then(|| "JBSWY3DPEHPK3PXP".to_string()),
            otpauth_uri: enabled
                .then(|| "otpauth://totp/Portal:ada?secret=JBSWY3DPEHPK3PXP".to_string()),
        })
    }

    async fn verify_two_factor(&self, code: &str) -> Result<()> {
        self.enter(format!("verify_two_factor {code}")).await?;
        Ok(())
    }

    async fn regenerate_backup_codes(&self) -> Result<BackupCodes> {
        self.enter("regenerate_backup_codes").await?;
        Ok(BackupCodes {
            codes: (1..=8).map(|i| format!("code-{i:04}")).collect(),
        })
    }

    async fn get_security(&self) -> Result<SecuritySettings> {
        self.enter("get_security").await?;
        Ok(self.security.read().await.clone())
    }
}

#[async_trait]
impl DashboardApi for MockPortalApi {
    async fn get_summary(&self) -> Result<DashboardSummary> {
        self.enter("get_summary").await?;
        Ok(self.summary.read().await.clone())
    }

    async fn recent_activity(&self) -> Result<Vec<ActivityItem>> {
        self.enter("recent_activity").await?;
        Ok(self.activity.read().await.clone())
    }
}

/// A shared notifier for store tests.
pub fn notifier() -> Arc<MemoryNotifier> {
    Arc::new(MemoryNotifier::new())
}
