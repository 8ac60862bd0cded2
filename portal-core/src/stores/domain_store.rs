//! Domain list, domain settings and DNS records

use std::collections::HashMap;
use std::sync::Arc;

use portal_api::{DnsRecord, Domain, DomainApi, DomainUpdate, ListQuery};
use tokio::sync::RwLock;

use super::{report, require, ListState};
use crate::error::{CoreError, CoreResult};
use crate::notify::{Notification, Notifier};
use crate::optimistic::apply_optimistic_with;
use crate::validation::{DnsRecordForm, NameserverForm, Schema};

#[derive(Debug, Clone, Default)]
pub struct DomainState {
    pub list: ListState<Domain>,
    /// DNS records per domain id, loaded on demand.
    pub dns_records: HashMap<String, Vec<DnsRecord>>,
}

pub struct DomainStore {
    api: Arc<dyn DomainApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<DomainState>,
}

impl DomainStore {
    #[must_use]
    pub fn new(api: Arc<dyn DomainApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(DomainState::default()),
        }
    }

    pub async fn snapshot(&self) -> DomainState {
        self.state.read().await.clone()
    }

    /// Load a page of domains, replacing the current list.
    pub async fn fetch(&self, query: ListQuery) -> CoreResult<()> {
        let query = query.validated();
        self.state.write().await.list.begin(query.clone());

        let result = self.api.list_domains(&query).await;
        self.state
            .write()
            .await
            .list
            .finish(result)
            .map_err(|e| report(self.notifier.as_ref(), "load domains", e))
    }

    pub async fn set_auto_renew(&self, id: &str, enabled: bool) -> CoreResult<Domain> {
        let update = DomainUpdate {
            auto_renew: Some(enabled),
            ..Default::default()
        };
        let message = if enabled {
            "Auto-renew enabled"
        } else {
            "Auto-renew disabled"
        };
        self.update(id, update, message).await
    }

    pub async fn set_locked(&self, id: &str, locked: bool) -> CoreResult<Domain> {
        let update = DomainUpdate {
            locked: Some(locked),
            ..Default::default()
        };
        let message = if locked {
            "Transfer lock enabled"
        } else {
            "Transfer lock disabled"
        };
        self.update(id, update, message).await
    }

    /// Replace the nameserver list. The list is validated before anything changes.
    pub async fn update_nameservers(&self, id: &str, nameservers: Vec<String>) -> CoreResult<Domain> {
        let form = NameserverForm { nameservers };
        form.check()?;

        let update = DomainUpdate {
            nameservers: Some(form.normalized()),
            ..Default::default()
        };
        self.update(id, update, "Nameservers updated").await
    }

    async fn update(&self, id: &str, update: DomainUpdate, success: &str) -> CoreResult<Domain> {
        require(
            self.state.read().await.list.get(id).is_some(),
            "Domain",
            id,
        )?;

        let result = apply_optimistic_with(
            &self.state,
            |s| {
                s.list.get_mut(id).map(|domain| {
                    let inverse = update.inverse(domain);
                    update.apply_to(domain);
                    inverse
                })
            },
            self.api.update_domain(id, &update),
            |s, inverse| {
                if let (Some(domain), Some(inverse)) = (s.list.get_mut(id), inverse) {
                    inverse.apply_to(domain);
                }
            },
            |s, server| s.list.replace(server),
        )
        .await;

        match result {
            Ok(domain) => {
                log::info!("Domain {} updated", domain.name);
                self.notifier.notify(Notification::success(success));
                Ok(domain)
            }
            Err(e) => Err(report(self.notifier.as_ref(), "update domain", e)),
        }
    }

    /// Load the DNS zone of a domain.
    pub async fn load_dns_records(&self, id: &str) -> CoreResult<Vec<DnsRecord>> {
        match self.api.list_dns_records(id).await {
            Ok(records) => {
                self.state
                    .write()
                    .await
                    .dns_records
                    .insert(id.to_string(), records.clone());
                Ok(records)
            }
            Err(e) => Err(report(self.notifier.as_ref(), "load DNS records", e)),
        }
    }

    /// Validate a record before it is submitted.
    pub fn validate_dns_record(&self, form: &DnsRecordForm) -> CoreResult<()> {
        form.check().map_err(CoreError::Validation)
    }
}
