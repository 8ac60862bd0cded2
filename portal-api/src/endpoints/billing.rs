use async_trait::async_trait;

use crate::client::{ApiClient, segment};
use crate::error::Result;
use crate::query::{ListQuery, Page};
use crate::traits::BillingApi;
use crate::types::{Invoice, NewCard, PaymentSource, Subscription, SubscriptionUpdate};

#[async_trait]
impl BillingApi for ApiClient {
    async fn list_subscriptions(&self, query: &ListQuery) -> Result<Page<Subscription>> {
        self.get_list("/subscriptions", query).await
    }

    async fn update_subscription(
        &self,
        id: &str,
        update: &SubscriptionUpdate,
    ) -> Result<Subscription> {
        self.patch_json(&format!("/subscriptions/{}", segment(id)), update)
            .await
    }

    async fn list_invoices(&self, query: &ListQuery) -> Result<Page<Invoice>> {
        self.get_list("/invoices", query).await
    }

    async fn download_invoice_pdf(&self, id: &str) -> Result<Vec<u8>> {
        self.get_bytes(&format!("/invoices/{}/pdf", segment(id)))
            .await
    }

    async fn list_payment_sources(&self) -> Result<Vec<PaymentSource>> {
        self.get_json("/payment-methods").await
    }

    async fn add_payment_source(&self, card: &NewCard) -> Result<PaymentSource> {
        log::debug!(
            "Adding card ending in {}",
            crate::utils::log_sanitizer::mask_secret(&card.number)
        );
        self.post_json("/payment-methods", card).await
    }

    async fn set_default_payment_source(&self, id: &str) -> Result<()> {
        self.post_unit(
            &format!("/payment-methods/{}/default", segment(id)),
            &serde_json::json!({}),
        )
        .await
    }

    async fn remove_payment_source(&self, id: &str) -> Result<()> {
        self.delete(&format!("/payment-methods/{}", segment(id)))
            .await
    }
}
