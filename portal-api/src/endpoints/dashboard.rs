use async_trait::async_trait;

use crate::client::ApiClient;
use crate::error::Result;
use crate::traits::DashboardApi;
use crate::types::{ActivityItem, DashboardSummary};

#[async_trait]
impl DashboardApi for ApiClient {
    async fn get_summary(&self) -> Result<DashboardSummary> {
        self.get_json("/dashboard/summary").await
    }

    async fn recent_activity(&self) -> Result<Vec<ActivityItem>> {
        self.get_json("/dashboard/activity").await
    }
}
