//! Periodic dashboard refresh

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::stores::DashboardStore;

/// Default refresh interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Background task refreshing a [`DashboardStore`].
///
/// The first refresh happens immediately. Dropping the poller (or calling
/// [`Poller::stop`]) aborts the task; a refresh in flight at that moment is
/// abandoned.
pub struct Poller {
    handle: JoinHandle<()>,
}

impl Poller {
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<DashboardStore>, interval: Duration) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A slow refresh pushes the schedule back instead of bursting.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = store.refresh().await {
                    log::debug!("Dashboard poll failed: {e}");
                }
            }
        });
        log::debug!("Dashboard polling every {}s", interval.as_secs_f32());
        Self { handle }
    }

    /// Abort the polling task.
    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
