//! Resource stores
//!
//! One store per resource. Each owns its state behind a `tokio::sync::RwLock`,
//! talks to the backend through the per-resource API trait, and reports
//! outcomes to a [`Notifier`]. UIs read state through `snapshot()`.

mod billing_store;
mod dashboard_store;
mod domain_store;
mod profile_store;
mod security_store;
mod subscription_store;
mod ticket_store;

pub use billing_store::{BillingState, BillingStore};
pub use dashboard_store::{DashboardState, DashboardStore};
pub use domain_store::{DomainState, DomainStore};
pub use profile_store::{ProfileState, ProfileStore};
pub use security_store::{SecurityState, SecurityStore};
pub use subscription_store::SubscriptionStore;
pub use ticket_store::{TicketState, TicketStore, PENDING_MESSAGE_PREFIX};

use portal_api::{
    ApiError, Domain, Invoice, ListQuery, Page, PaymentSource, Subscription, Ticket,
};

use crate::error::CoreError;
use crate::notify::{Notification, Notifier};

/// Entities addressed by id within a list.
pub trait Keyed {
    fn key(&self) -> &str;
}

macro_rules! impl_keyed {
    ($($ty:ty),*) => {
        $(impl Keyed for $ty {
            fn key(&self) -> &str {
                &self.id
            }
        })*
    };
}

impl_keyed!(Domain, Subscription, Invoice, PaymentSource, Ticket);

/// A paginated list as last fetched, plus request status.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    /// Query of the most recent fetch.
    pub query: ListQuery,
    /// Total reported by the server for `query`.
    pub total: u32,
    pub loading: bool,
    /// Message of the last failed fetch, cleared on success.
    pub error: Option<String>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            query: ListQuery::default(),
            total: 0,
            loading: false,
            error: None,
        }
    }
}

impl<T: Keyed> ListState<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.key() == id)
    }

    /// Replace the stored entity with the server's copy.
    pub(crate) fn replace(&mut self, updated: &T)
    where
        T: Clone,
    {
        if let Some(item) = self.get_mut(updated.key()) {
            *item = updated.clone();
        }
    }

    pub fn has_more(&self) -> bool {
        self.query.page.saturating_mul(self.query.limit) < self.total
    }

    pub(crate) fn begin(&mut self, query: ListQuery) {
        self.query = query;
        self.loading = true;
    }

    /// Record the outcome of a fetch. The previous items stay on failure.
    pub(crate) fn finish(&mut self, result: Result<Page<T>, ApiError>) -> Result<(), ApiError> {
        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}

/// Log and notify a failed operation, returning the error for the caller.
pub(crate) fn report(notifier: &dyn Notifier, action: &str, error: impl Into<CoreError>) -> CoreError {
    let error = error.into();
    if error.is_expected() {
        log::warn!("Failed to {action}: {error}");
    } else {
        log::error!("Failed to {action}: {error}");
    }
    notifier.notify(Notification::error(format!("Failed to {action}: {error}")));
    error
}

/// Fail with `NotFound` unless `found`.
pub(crate) fn require(found: bool, what: &str, id: &str) -> Result<(), CoreError> {
    if found {
        Ok(())
    } else {
        Err(CoreError::NotFound(format!("{what} '{id}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::domain;

    #[test]
    fn finish_keeps_items_on_failure() {
        let mut state = ListState::default();
        state.begin(ListQuery::default());
        state
            .finish(Ok(Page::new(vec![domain("d1", "example.com")], 1, 10, 11)))
            .unwrap();
        assert!(state.has_more());
        assert!(!state.loading);

        state.begin(ListQuery::default().page(2));
        let err = ApiError::Timeout { after_ms: 30_000 };
        assert!(state.finish(Err(err)).is_err());
        assert_eq!(state.items.len(), 1);
        assert_eq!(
            state.error.as_deref(),
            Some("Request timed out after 30000ms")
        );
        assert!(!state.loading);
    }
}
