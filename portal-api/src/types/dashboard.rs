use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters shown on the dashboard (`GET /dashboard/summary`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_domains: u32,
    /// Domains expiring within the next 30 days.
    pub expiring_domains: u32,
    pub open_tickets: u32,
    pub unpaid_invoices: u32,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub next_payment: Option<DateTime<Utc>>,
}

/// Kind of event shown in the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Domain,
    Billing,
    Ticket,
    Security,
    #[serde(other)]
    Other,
}

/// One entry of the recent-activity feed (`GET /dashboard/activity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: String,
    pub kind: ActivityKind,
    pub description: String,
    #[serde(with = "crate::utils::datetime")]
    pub occurred_at: DateTime<Utc>,
}
