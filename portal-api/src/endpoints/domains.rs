use async_trait::async_trait;

use crate::client::{ApiClient, segment};
use crate::error::Result;
use crate::query::{ListQuery, Page};
use crate::traits::DomainApi;
use crate::types::{DnsRecord, Domain, DomainUpdate};

#[async_trait]
impl DomainApi for ApiClient {
    async fn list_domains(&self, query: &ListQuery) -> Result<Page<Domain>> {
        self.get_list("/domains", query).await
    }

    async fn get_domain(&self, id: &str) -> Result<Domain> {
        self.get_json(&format!("/domains/{}", segment(id))).await
    }

    async fn update_domain(&self, id: &str, update: &DomainUpdate) -> Result<Domain> {
        self.patch_json(&format!("/domains/{}", segment(id)), update)
            .await
    }

    async fn list_dns_records(&self, id: &str) -> Result<Vec<DnsRecord>> {
        self.get_json(&format!("/domains/{}/dns", segment(id))).await
    }
}
