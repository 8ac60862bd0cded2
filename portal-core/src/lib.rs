//! Self-Service Portal Core Library
//!
//! Client-side logic of the customer self-service portal, independent of any
//! UI toolkit:
//! - Form validation schemas and form state
//! - Resource stores with optimistic updates
//! - Dashboard polling
//! - Mock authentication context
//! - Configuration
//!
//! Stores talk to the backend through the per-resource traits of
//! `portal-api`, so any implementation (the HTTP client, an in-memory double)
//! can be injected.

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod notify;
pub mod optimistic;
pub mod polling;
pub mod stores;
pub mod validation;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod test_utils;

// Re-export common types
pub use auth::{AuthStorage, DemoUser, FileAuthStorage, MemoryAuthStorage, MockAuth};
pub use config::PortalConfig;
pub use error::{CoreError, CoreResult};
pub use forms::FormState;
pub use notify::{LogNotifier, MemoryNotifier, Notification, NotificationLevel, Notifier};
pub use optimistic::{apply_optimistic, apply_optimistic_with};
pub use polling::Poller;
pub use stores::{
    BillingStore, DashboardStore, DomainStore, Keyed, ListState, ProfileStore, SecurityStore,
    SubscriptionStore, TicketStore,
};
pub use validation::{FieldErrors, Schema};
