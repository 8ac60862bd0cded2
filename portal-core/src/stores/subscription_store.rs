//! Subscriptions: auto-renewal and lifecycle (pause, resume, cancel)

use std::sync::Arc;

use portal_api::{BillingApi, ListQuery, Subscription, SubscriptionStatus, SubscriptionUpdate};
use tokio::sync::RwLock;

use super::{report, ListState};
use crate::error::{CoreError, CoreResult};
use crate::notify::{Notification, Notifier};
use crate::optimistic::apply_optimistic_with;

pub struct SubscriptionStore {
    api: Arc<dyn BillingApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<ListState<Subscription>>,
}

impl SubscriptionStore {
    #[must_use]
    pub fn new(api: Arc<dyn BillingApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(ListState::default()),
        }
    }

    pub async fn snapshot(&self) -> ListState<Subscription> {
        self.state.read().await.clone()
    }

    pub async fn fetch(&self, query: ListQuery) -> CoreResult<()> {
        let query = query.validated();
        self.state.write().await.begin(query.clone());

        let result = self.api.list_subscriptions(&query).await;
        self.state
            .write()
            .await
            .finish(result)
            .map_err(|e| report(self.notifier.as_ref(), "load subscriptions", e))
    }

    pub async fn set_auto_renewal(&self, id: &str, enabled: bool) -> CoreResult<Subscription> {
        self.current_status(id).await?;
        let update = SubscriptionUpdate {
            auto_renewal: Some(enabled),
            status: None,
        };
        let message = if enabled {
            "Auto-renewal enabled"
        } else {
            "Auto-renewal disabled"
        };
        self.update(id, update, message).await
    }

    /// Pause an active subscription.
    pub async fn pause(&self, id: &str) -> CoreResult<Subscription> {
        let status = self.current_status(id).await?;
        if status != SubscriptionStatus::Active {
            return Err(CoreError::Conflict(format!(
                "Only active subscriptions can be paused ('{id}')"
            )));
        }
        self.set_status(id, SubscriptionStatus::Paused, "Subscription paused")
            .await
    }

    /// Resume a paused subscription.
    pub async fn resume(&self, id: &str) -> CoreResult<Subscription> {
        let status = self.current_status(id).await?;
        if status != SubscriptionStatus::Paused {
            return Err(CoreError::Conflict(format!(
                "Only paused subscriptions can be resumed ('{id}')"
            )));
        }
        self.set_status(id, SubscriptionStatus::Active, "Subscription resumed")
            .await
    }

    pub async fn cancel(&self, id: &str) -> CoreResult<Subscription> {
        let status = self.current_status(id).await?;
        if status == SubscriptionStatus::Cancelled {
            return Err(CoreError::Conflict(format!(
                "Subscription '{id}' is already cancelled"
            )));
        }
        self.set_status(id, SubscriptionStatus::Cancelled, "Subscription cancelled")
            .await
    }

    async fn current_status(&self, id: &str) -> CoreResult<SubscriptionStatus> {
        self.state
            .read()
            .await
            .get(id)
            .map(|s| s.status)
            .ok_or_else(|| CoreError::NotFound(format!("Subscription '{id}'")))
    }

    async fn set_status(
        &self,
        id: &str,
        status: SubscriptionStatus,
        success: &str,
    ) -> CoreResult<Subscription> {
        let update = SubscriptionUpdate {
            auto_renewal: None,
            status: Some(status),
        };
        self.update(id, update, success).await
    }

    async fn update(
        &self,
        id: &str,
        update: SubscriptionUpdate,
        success: &str,
    ) -> CoreResult<Subscription> {
        let result = apply_optimistic_with(
            &self.state,
            |s| {
                s.get_mut(id).map(|subscription| {
                    let inverse = update.inverse(subscription);
                    update.apply_to(subscription);
                    inverse
                })
            },
            self.api.update_subscription(id, &update),
            |s, inverse| {
                if let (Some(subscription), Some(inverse)) = (s.get_mut(id), inverse) {
                    inverse.apply_to(subscription);
                }
            },
            |s, server| s.replace(server),
        )
        .await;

        match result {
            Ok(subscription) => {
                self.notifier.notify(Notification::success(success));
                Ok(subscription)
            }
            Err(e) => Err(report(self.notifier.as_ref(), "update subscription", e)),
        }
    }
}
