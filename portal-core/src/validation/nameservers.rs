//! Nameserver list form

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::rules::{canonical_host, is_valid_hostname};
use super::{FieldErrors, Schema};

pub const MIN_NAMESERVERS: usize = 2;
pub const MAX_NAMESERVERS: usize = 5;

/// Ordered nameserver list for a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameserverForm {
    pub nameservers: Vec<String>,
}

impl NameserverForm {
    pub fn new<I, S>(nameservers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nameservers: nameservers.into_iter().map(Into::into).collect(),
        }
    }

    /// Trimmed entries, as sent to the server.
    pub fn normalized(&self) -> Vec<String> {
        self.nameservers
            .iter()
            .map(|ns| ns.trim().to_string())
            .collect()
    }
}

impl Schema for NameserverForm {
    fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let count = self.nameservers.len();
        if count < MIN_NAMESERVERS {
            errors.insert("nameservers", "At least 2 nameservers are required");
        } else if count > MAX_NAMESERVERS {
            errors.insert("nameservers", "At most 5 nameservers are allowed");
        }

        let mut seen = HashSet::new();
        for (i, ns) in self.nameservers.iter().enumerate() {
            let path = format!("nameservers[{i}]");
            let ns = ns.trim();
            if ns.is_empty() {
                errors.insert(path, "Nameserver is required");
            } else if !is_valid_hostname(ns) {
                errors.insert(path, "Invalid hostname");
            } else if !seen.insert(canonical_host(ns)) {
                errors.insert(path, "Duplicate nameserver");
            }
        }

        errors.into_result()
    }
}
