//! DNS record form with type-specific value rules

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use portal_api::DnsRecordType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::rules::{is_valid_hostname, is_valid_record_name};
use super::{derived, invalid, FieldErrors, Schema};

const MAX_TXT_SEGMENT: usize = 255;
const MAX_TXT_TOTAL: usize = 4096;
const CAA_TAGS: &[&str] = &["issue", "issuewild", "iodef"];

#[allow(clippy::expect_used)]
static TXT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("valid regex"));

/// Add/edit DNS record form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordForm {
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub value: String,
    #[validate(range(min = 60, max = 86400, message = "TTL must be between 60 and 86400 seconds"))]
    pub ttl: u32,
    #[serde(default)]
    pub priority: Option<u32>,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if is_valid_record_name(name) {
        Ok(())
    } else {
        Err(invalid("record_name", "Name must be @, * or a valid host label"))
    }
}

impl DnsRecordForm {
    pub fn new(record_type: DnsRecordType, name: &str, value: &str, ttl: u32) -> Self {
        Self {
            record_type,
            name: name.to_string(),
            value: value.to_string(),
            ttl,
            priority: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    fn value_error(&self) -> Option<&'static str> {
        let value = self.value.trim();
        if value.is_empty() {
            return Some("Value is required");
        }
        match self.record_type {
            DnsRecordType::A => value
                .parse::<Ipv4Addr>()
                .is_err()
                .then_some("Must be a valid IPv4 address"),
            DnsRecordType::Aaaa => value
                .parse::<Ipv6Addr>()
                .is_err()
                .then_some("Must be a valid IPv6 address"),
            DnsRecordType::Cname | DnsRecordType::Ns | DnsRecordType::Mx => {
                (!is_valid_hostname(value)).then_some("Must be a valid hostname")
            }
            DnsRecordType::Txt => txt_error(value),
            DnsRecordType::Srv => srv_error(value),
            DnsRecordType::Caa => caa_error(value),
        }
    }
}

fn txt_error(value: &str) -> Option<&'static str> {
    if value.len() > MAX_TXT_TOTAL {
        return Some("TXT value must be at most 4096 characters");
    }
    let too_long = if value.starts_with('"') {
        // Quoted form: nothing but whitespace may sit between the segments.
        if !TXT_SEGMENT.replace_all(value, "").trim().is_empty() {
            return Some("TXT strings must be enclosed in matching quotes");
        }
        TXT_SEGMENT
            .captures_iter(value)
            .any(|c| c.get(1).is_some_and(|m| m.as_str().len() > MAX_TXT_SEGMENT))
    } else {
        value.len() > MAX_TXT_SEGMENT
    };
    too_long.then_some("Each TXT string must be at most 255 characters")
}

/// `weight port target`
fn srv_error(value: &str) -> Option<&'static str> {
    const FORMAT: &str = "SRV value must be \"weight port target\"";
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [weight, port, target] = parts.as_slice() else {
        return Some(FORMAT);
    };
    if weight.parse::<u16>().is_err() || port.parse::<u16>().is_err() {
        return Some(FORMAT);
    }
    // "." means the service is explicitly unavailable.
    (*target != "." && !is_valid_hostname(target)).then_some("SRV target must be a valid hostname")
}

/// `flags tag value`
fn caa_error(value: &str) -> Option<&'static str> {
    const FORMAT: &str = "CAA value must be \"flags tag value\"";
    let mut parts = value.splitn(3, char::is_whitespace);
    let (Some(flags), Some(tag), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
        return Some(FORMAT);
    };
    if flags.parse::<u8>().is_err() || rest.trim().is_empty() {
        return Some(FORMAT);
    }
    (!CAA_TAGS.contains(&tag)).then_some("CAA tag must be issue, issuewild or iodef")
}

impl Schema for DnsRecordForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = derived(self);

        if let Some(message) = self.value_error() {
            errors.insert("value", message);
        }

        if self.record_type.has_priority() {
            match self.priority {
                None => errors.insert("priority", "Priority is required"),
                Some(p) if p > u32::from(u16::MAX) => {
                    errors.insert("priority", "Priority must be between 0 and 65535");
                }
                Some(_) => {}
            }
        }

        errors.into_result()
    }
}
