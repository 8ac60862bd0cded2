use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============ Domains ============

/// Registration status of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    /// Registered and resolving.
    Active,
    /// Registration lapsed.
    Expired,
    /// Transfer to this account is in progress.
    PendingTransfer,
    /// Registration is awaiting confirmation.
    Pending,
}

impl DomainStatus {
    /// Wire value, also used as the `status` list filter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::PendingTransfer => "pending_transfer",
            Self::Pending => "pending",
        }
    }
}

/// A domain registered under the customer's account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Backend identifier.
    pub id: String,
    /// Fully qualified domain name (e.g., `"example.com"`).
    pub name: String,
    /// Registration status.
    pub status: DomainStatus,
    /// Registration date.
    #[serde(with = "crate::utils::datetime")]
    pub registered_at: DateTime<Utc>,
    /// Expiry date.
    #[serde(with = "crate::utils::datetime")]
    pub expires_at: DateTime<Utc>,
    /// Whether the registration renews automatically.
    pub auto_renew: bool,
    /// Delegated nameservers, in order.
    #[serde(default)]
    pub nameservers: Vec<String>,
    /// Whether the registrar transfer lock is on.
    pub locked: bool,
}

impl Domain {
    /// Whole days until expiry relative to `now` (negative once expired).
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_days()
    }
}

/// Partial update sent with `PATCH /domains/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainUpdate {
    /// New auto-renew flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    /// New transfer-lock flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Replacement nameserver list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<String>>,
}

impl DomainUpdate {
    /// Apply the update to a local copy of the domain.
    pub fn apply_to(&self, domain: &mut Domain) {
        if let Some(auto_renew) = self.auto_renew {
            domain.auto_renew = auto_renew;
        }
        if let Some(locked) = self.locked {
            domain.locked = locked;
        }
        if let Some(ref nameservers) = self.nameservers {
            domain.nameservers.clone_from(nameservers);
        }
    }

    /// The update restoring the fields this one touches to their values in `domain`.
    #[must_use]
    pub fn inverse(&self, domain: &Domain) -> Self {
        Self {
            auto_renew: self.auto_renew.map(|_| domain.auto_renew),
            locked: self.locked.map(|_| domain.locked),
            nameservers: self.nameservers.as_ref().map(|_| domain.nameservers.clone()),
        }
    }
}

// ============ DNS Records ============

/// DNS record type.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
}

impl DnsRecordType {
    /// Whether records of this type carry a priority.
    pub fn has_priority(self) -> bool {
        matches!(self, Self::Mx | Self::Srv)
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
        };
        f.write_str(s)
    }
}

/// A DNS record in a domain's zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Backend identifier.
    pub id: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Relative name (`"@"` for the apex).
    pub name: String,
    /// Record value.
    pub value: String,
    /// Time to live, in seconds.
    pub ttl: u32,
    /// Priority for MX/SRV records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}
