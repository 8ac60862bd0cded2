//! Invoices and payment sources

use std::sync::Arc;

use portal_api::{BillingApi, Invoice, ListQuery, PaymentSource};
use tokio::sync::RwLock;

use super::{report, require, ListState};
use crate::error::{CoreError, CoreResult};
use crate::notify::{Notification, Notifier};
use crate::optimistic::apply_optimistic;
use crate::validation::{FieldErrors, PaymentMethodForm, Schema};

#[derive(Debug, Clone, Default)]
pub struct BillingState {
    pub invoices: ListState<Invoice>,
    pub payment_sources: Vec<PaymentSource>,
    pub sources_loading: bool,
    pub sources_error: Option<String>,
}

impl BillingState {
    pub fn default_source(&self) -> Option<&PaymentSource> {
        self.payment_sources.iter().find(|s| s.is_default)
    }

    fn source(&self, id: &str) -> Option<&PaymentSource> {
        self.payment_sources.iter().find(|s| s.id == id)
    }
}

pub struct BillingStore {
    api: Arc<dyn BillingApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<BillingState>,
}

impl BillingStore {
    #[must_use]
    pub fn new(api: Arc<dyn BillingApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(BillingState::default()),
        }
    }

    pub async fn snapshot(&self) -> BillingState {
        self.state.read().await.clone()
    }

    pub async fn fetch_invoices(&self, query: ListQuery) -> CoreResult<()> {
        let query = query.validated();
        self.state.write().await.invoices.begin(query.clone());

        let result = self.api.list_invoices(&query).await;
        self.state
            .write()
            .await
            .invoices
            .finish(result)
            .map_err(|e| report(self.notifier.as_ref(), "load invoices", e))
    }

    /// Raw PDF bytes of an invoice.
    pub async fn download_invoice(&self, id: &str) -> CoreResult<Vec<u8>> {
        let bytes = self
            .api
            .download_invoice_pdf(id)
            .await
            .map_err(|e| report(self.notifier.as_ref(), "download invoice", e))?;
        log::debug!("Downloaded invoice {id} ({} bytes)", bytes.len());
        Ok(bytes)
    }

    pub async fn load_payment_sources(&self) -> CoreResult<()> {
        self.state.write().await.sources_loading = true;
        let result = self.api.list_payment_sources().await;

        let mut state = self.state.write().await;
        state.sources_loading = false;
        match result {
            Ok(sources) => {
                state.payment_sources = sources;
                state.sources_error = None;
                Ok(())
            }
            Err(e) => {
                state.sources_error = Some(e.to_string());
                drop(state);
                Err(report(self.notifier.as_ref(), "load payment methods", e))
            }
        }
    }

    /// Add a card. The form is validated first; the new source is only
    /// added locally once the server has confirmed it.
    pub async fn add_card(&self, form: &PaymentMethodForm) -> CoreResult<PaymentSource> {
        form.check()?;
        let card = form.to_new_card().ok_or_else(|| {
            CoreError::Validation(FieldErrors::single("expiry", "Expiry must be in MM/YY format"))
        })?;

        let source = self
            .api
            .add_payment_source(&card)
            .await
            .map_err(|e| report(self.notifier.as_ref(), "add card", e))?;

        {
            let mut state = self.state.write().await;
            if source.is_default {
                for s in &mut state.payment_sources {
                    s.is_default = false;
                }
            }
            state.payment_sources.push(source.clone());
        }
        self.notifier.notify(Notification::success("Card added"));
        Ok(source)
    }

    /// Make `id` the only default source.
    pub async fn set_default(&self, id: &str) -> CoreResult<()> {
        require(self.state.read().await.source(id).is_some(), "Payment method", id)?;

        apply_optimistic(
            &self.state,
            |s| {
                s.payment_sources
                    .iter_mut()
                    .map(|source| {
                        let was = (source.id.clone(), source.is_default);
                        source.is_default = source.id == id;
                        was
                    })
                    .collect::<Vec<_>>()
            },
            self.api.set_default_payment_source(id),
            |s, flags| {
                for (source_id, was_default) in flags {
                    if let Some(source) = s.payment_sources.iter_mut().find(|p| p.id == source_id) {
                        source.is_default = was_default;
                    }
                }
            },
        )
        .await
        .map_err(|e| report(self.notifier.as_ref(), "set default payment method", e))?;

        self.notifier
            .notify(Notification::success("Default payment method updated"));
        Ok(())
    }

    /// Remove a source. The default source cannot be removed.
    pub async fn remove(&self, id: &str) -> CoreResult<()> {
        let is_default = {
            let state = self.state.read().await;
            let source = state
                .source(id)
                .ok_or_else(|| CoreError::NotFound(format!("Payment method '{id}'")))?;
            source.is_default
        };
        if is_default {
            return Err(CoreError::Conflict(
                "The default payment method cannot be removed".to_string(),
            ));
        }

        apply_optimistic(
            &self.state,
            |s| {
                let index = s.payment_sources.iter().position(|source| source.id == id);
                index.map(|i| (i, s.payment_sources.remove(i)))
            },
            self.api.remove_payment_source(id),
            |s, removed| {
                if let Some((index, source)) = removed {
                    if s.source(&source.id).is_none() {
                        let index = index.min(s.payment_sources.len());
                        s.payment_sources.insert(index, source);
                    }
                }
            },
        )
        .await
        .map_err(|e| report(self.notifier.as_ref(), "remove payment method", e))?;

        self.notifier
            .notify(Notification::success("Payment method removed"));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use portal_api::ApiError;

    use super::*;
    use crate::test_utils::{notifier, MockPortalApi};

    async fn loaded() -> (Arc<MockPortalApi>, BillingStore) {
        let api = MockPortalApi::shared();
        let store = BillingStore::new(api.clone(), notifier());
        store.load_payment_sources().await.unwrap();
        (api, store)
    }

    fn card_form(number: &str) -> PaymentMethodForm {
        PaymentMethodForm {
            cardholder_name: "Ada Lovelace".into(),
            card_number: number.into(),
            expiry: "12/39".into(),
            cvc: "123".into(),
            make_default: false,
        }
    }

    #[tokio::test]
    async fn invoices_and_download() {
        let (_, store) = loaded().await;
        store.fetch_invoices(ListQuery::default()).await.unwrap();
        assert_eq!(store.snapshot().await.invoices.items.len(), 2);
        let pdf = store.download_invoice("i1").await.unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn set_default_leaves_exactly_one_default() {
        let (_, store) = loaded().await;
        store.set_default("pm_2").await.unwrap();

        let state = store.snapshot().await;
        let defaults: Vec<_> = state
            .payment_sources
            .iter()
            .filter(|s| s.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, "pm_2");
    }

    #[tokio::test]
    async fn failed_set_default_rolls_back() {
        let (api, store) = loaded().await;
        let before = store.snapshot().await.payment_sources;
        api.fail_with_status(500).await;

        assert!(store.set_default("pm_2").await.is_err());
        assert_eq!(store.snapshot().await.payment_sources, before);
    }

    #[tokio::test]
    async fn default_source_cannot_be_removed() {
        let (api, store) = loaded().await;
        let err = store.remove("pm_1").await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        assert_eq!(api.call_count("remove_payment_source").await, 0);

        store.remove("pm_2").await.unwrap();
        assert_eq!(store.snapshot().await.payment_sources.len(), 1);
    }

    #[tokio::test]
    async fn failed_remove_restores_source_and_keeps_invoices_loaded_meanwhile() {
        let (api, store) = loaded().await;
        let before = store.snapshot().await.payment_sources;
        api.hold("remove_payment_source");

        let remove = store.remove("pm_2");
        let meanwhile = async {
            api.wait_parked(1).await;
            assert_eq!(store.snapshot().await.payment_sources.len(), 1);
            store.fetch_invoices(ListQuery::default()).await.unwrap();
            api.release("remove_payment_source", Some(ApiError::Timeout { after_ms: 30_000 }));
        };
        let (result, ()) = tokio::join!(remove, meanwhile);
        assert!(result.is_err());

        let state = store.snapshot().await;
        assert_eq!(state.payment_sources, before);
        assert_eq!(state.invoices.items.len(), 2);
        assert!(!state.invoices.loading);
    }

    #[tokio::test]
    async fn add_card_validates_first() {
        let (api, store) = loaded().await;
        let err = store.add_card(&card_form("4242424242424241")).await.unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("cardNumber"),
            Some("Invalid card number")
        );
        assert_eq!(api.call_count("add_payment_source").await, 0);

        let source = store.add_card(&card_form("4242 4242 4242 4242")).await.unwrap();
        assert_eq!(store.snapshot().await.payment_sources.last(), Some(&source));
    }

    #[tokio::test]
    async fn failed_add_card_changes_nothing() {
        let (api, store) = loaded().await;
        api.fail_with_status(402).await;
        assert!(store.add_card(&card_form("4242424242424242")).await.is_err());
        assert_eq!(store.snapshot().await.payment_sources.len(), 2);
    }
}
