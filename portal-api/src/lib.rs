//! # portal-api
//!
//! A typed client for the customer self-service portal REST API: domains,
//! billing, support tickets, and account/security settings. All paths are
//! rooted at `/api`.
//!
//! ## Resources
//!
//! | Trait | Endpoints |
//! |-------|-----------|
//! | [`DomainApi`] | `/domains`, `/domains/:id`, `/domains/:id/dns` |
//! | [`BillingApi`] | `/subscriptions`, `/invoices`, `/invoices/:id/pdf`, `/payment-methods` |
//! | [`TicketApi`] | `/tickets`, `/tickets/:id`, `/tickets/:id/reply` |
//! | [`UserApi`] | `/user/profile`, `/user/address`, `/user/password`, `/user/2fa/*`, `/user/security` |
//! | [`DashboardApi`] | `/dashboard/summary`, `/dashboard/activity` |
//!
//! [`ApiClient`] implements all of them.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use portal_api::{ApiClient, ApiClientConfig, DomainApi, ListQuery, StaticTokenProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(
//!         ApiClientConfig::default(),
//!         Arc::new(StaticTokenProvider::new("token")),
//!     )?;
//!
//!     let page = client
//!         .list_domains(&ListQuery::default().status("active").page(2))
//!         .await?;
//!     for domain in &page.items {
//!         println!("{} expires {}", domain.name, domain.expires_at);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`Result<T, ApiError>`](ApiError):
//!
//! - [`ApiError::Network`] / [`ApiError::Timeout`]: the request never completed
//! - [`ApiError::Http`]: non-2xx status, with the server's error code when supplied
//! - [`ApiError::Authentication`]: the token provider failed; nothing was sent
//!
//! Requests are never retried.

mod auth;
mod client;
mod endpoints;
mod error;
mod http_client;
mod query;
mod traits;
mod types;
mod utils;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use client::{ApiClient, ApiClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ApiError, Result};
pub use http_client::{ApiResponse, HttpUtils, RawResponse};
pub use query::{DEFAULT_LIMIT, DEFAULT_PAGE, ListQuery, MAX_LIMIT, Page, SortOrder};
pub use traits::{BillingApi, DashboardApi, DomainApi, TicketApi, UserApi};
pub use types::*;

pub use utils::datetime;
pub use utils::log_sanitizer;
