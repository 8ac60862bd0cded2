//! Generic HTTP request handling
//!
//! One place for the request/response flow shared by every endpoint:
//! sending under a timeout, logging, normalizing non-2xx responses into
//! [`ApiError::Http`], and decoding bodies by content type.
//!
//! # Design principles
//! - **Single attempt** - failures surface immediately, nothing is retried
//! - **Timeout covers the whole exchange** - sending and reading the body
//! - **Content-type driven decoding** - JSON bodies are parsed, everything else is kept as text

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Raw response of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header without parameters, lowercased.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the content type is JSON (`application/json` or `*+json`).
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct == "application/json" || ct.ends_with("+json"))
    }

    /// Body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// `application/json` body.
    Json(Value),
    /// Any other content type.
    Text(String),
    /// No body (e.g., `204 No Content`).
    Empty,
}

impl ApiResponse {
    /// Deserialize a JSON body into `T`.
    ///
    /// An empty body deserializes as JSON `null`, so `T = ()` or `Option<_>` accept it.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Json(value) => serde_json::from_value(value).map_err(|e| {
                log::error!("JSON decode failed: {e}");
                ApiError::Parse {
                    detail: e.to_string(),
                }
            }),
            Self::Empty => serde_json::from_value(Value::Null).map_err(|e| ApiError::Parse {
                detail: format!("Expected a JSON body, got an empty response: {e}"),
            }),
            Self::Text(text) => Err(ApiError::Parse {
                detail: format!(
                    "Expected a JSON body, got text: {}",
                    truncate_for_log(&text)
                ),
            }),
        }
    }

    /// Body as text, whatever the content type.
    pub fn into_text(self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text,
            Self::Empty => String::new(),
        }
    }
}

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs a request under `timeout` and returns the raw response.
    ///
    /// The timeout covers sending and reading the body; when it elapses the
    /// in-flight future is dropped, which aborts the underlying connection.
    ///
    /// # Returns
    /// * `Ok(RawResponse)` - any HTTP status, including non-2xx
    /// * `Err(ApiError::Timeout)` - the timeout elapsed
    /// * `Err(ApiError::Network)` - the request could not be delivered
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        path: &str,
        timeout: Duration,
    ) -> Result<RawResponse, ApiError> {
        log::debug!("{method_name} {path}");

        let started = Instant::now();
        let exchange = async {
            let response = request_builder
                .send()
                .await
                .map_err(|e| Self::transport_error(e, started.elapsed()))?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(normalize_content_type);

            let body = response
                .bytes()
                .await
                .map_err(|e| ApiError::Network {
                    detail: format!("Failed to read response body: {e}"),
                })?
                .to_vec();

            Ok::<_, ApiError>(RawResponse {
                status,
                content_type,
                body,
            })
        };

        let raw = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| {
                log::warn!("{method_name} {path} timed out after {timeout:?}");
                Self::timeout_error(timeout)
            })??;

        log::debug!("{method_name} {path} -> {}", raw.status);
        log::trace!("Response Body: {}", truncate_for_log(&raw.text()));

        Ok(raw)
    }

    /// Turn a raw response into a decoded body, or an [`ApiError::Http`] for non-2xx statuses.
    pub fn decode(raw: RawResponse) -> Result<ApiResponse, ApiError> {
        if !raw.is_success() {
            return Err(Self::error_from_response(&raw));
        }

        if raw.body.is_empty() || raw.status == 204 {
            return Ok(ApiResponse::Empty);
        }

        if raw.is_json() {
            let value: Value = Self::parse_json(&raw.text())?;
            Ok(ApiResponse::Json(value))
        } else {
            Ok(ApiResponse::Text(raw.text()))
        }
    }

    /// Build the normalized error for a non-2xx response.
    ///
    /// Understands `{"code": .., "message": ..}`, `{"error": {"code": .., "message": ..}}`
    /// and `{"error": ".."}` bodies; otherwise falls back to a plain-text body or the
    /// status reason phrase.
    pub fn error_from_response(raw: &RawResponse) -> ApiError {
        let text = raw.text();
        let (code, message) = serde_json::from_str::<Value>(&text)
            .ok()
            .map(|value| extract_error_fields(&value))
            .unwrap_or((None, None));

        let message = message
            .or_else(|| {
                let trimmed = text.trim();
                (!raw.is_json() && !trimmed.is_empty()).then(|| truncate_for_log(trimmed))
            })
            .unwrap_or_else(|| {
                StatusCode::from_u16(raw.status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        ApiError::Http {
            status: raw.status,
            code,
            message,
        }
    }

    /// Parse JSON text.
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ApiError::Parse)` - parsing failed
    pub fn parse_json<T>(response_text: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!("Raw response: {}", truncate_for_log(response_text));
            ApiError::Parse {
                detail: e.to_string(),
            }
        })
    }

    fn timeout_error(after: Duration) -> ApiError {
        ApiError::Timeout {
            after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// `elapsed` is the time since the request started; a connect timeout
    /// raised by reqwest is reported with it.
    fn transport_error(e: reqwest::Error, elapsed: Duration) -> ApiError {
        if e.is_timeout() {
            log::warn!("Connection timed out after {elapsed:?}");
            Self::timeout_error(elapsed)
        } else if e.is_builder() {
            ApiError::InvalidRequest {
                detail: e.to_string(),
            }
        } else {
            ApiError::Network {
                detail: e.to_string(),
            }
        }
    }
}

fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

fn value_to_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn extract_error_fields(value: &Value) -> (Option<String>, Option<String>) {
    let source = match value.get("error") {
        Some(Value::String(message)) => {
            return (
                value.get("code").and_then(value_to_code),
                Some(message.clone()),
            );
        }
        Some(nested @ Value::Object(_)) => nested,
        _ => value,
    };

    let code = source.get("code").and_then(value_to_code);
    let message = source
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string);
    (code, message)
}
