//! Utility modules.

/// Date/time serialization helpers shared by the wire types.
pub mod datetime;

/// Log sanitization utilities to prevent sensitive data exposure.
pub mod log_sanitizer;
