//! [`ApiClient`](crate::ApiClient) implementations of the per-resource traits.

mod billing;
mod dashboard;
mod domains;
mod tickets;
mod user;
