//! Dashboard summary and recent activity

use std::sync::Arc;

use chrono::{DateTime, Utc};
use portal_api::{ActivityItem, DashboardApi, DashboardSummary};
use tokio::sync::RwLock;

use super::report;
use crate::error::CoreResult;
use crate::notify::Notifier;

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub summary: Option<DashboardSummary>,
    pub activity: Vec<ActivityItem>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

pub struct DashboardStore {
    api: Arc<dyn DashboardApi>,
    notifier: Arc<dyn Notifier>,
    state: RwLock<DashboardState>,
}

impl DashboardStore {
    #[must_use]
    pub fn new(api: Arc<dyn DashboardApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            state: RwLock::new(DashboardState::default()),
        }
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Fetch summary and activity concurrently.
    ///
    /// Each part that loads is stored even if the other fails. A failure is
    /// notified once; repeated identical failures (e.g. while polling) are
    /// only logged.
    pub async fn refresh(&self) -> CoreResult<()> {
        self.state.write().await.loading = true;

        let (summary, activity) =
            futures::join!(self.api.get_summary(), self.api.recent_activity());

        let mut state = self.state.write().await;
        state.loading = false;

        let mut failure = None;
        match summary {
            Ok(summary) => state.summary = Some(summary),
            Err(e) => failure = Some(e),
        }
        match activity {
            Ok(activity) => state.activity = activity,
            Err(e) => failure = failure.or(Some(e)),
        }

        let Some(err) = failure else {
            state.error = None;
            state.last_refreshed = Some(Utc::now());
            return Ok(());
        };

        let message = err.to_string();
        let repeated = state.error.as_deref() == Some(message.as_str());
        state.error = Some(message);
        drop(state);

        if repeated {
            log::warn!("Dashboard refresh still failing: {err}");
            Err(err.into())
        } else {
            Err(report(self.notifier.as_ref(), "refresh dashboard", err))
        }
    }
}
