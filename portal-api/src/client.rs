//! The portal REST client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::TokenProvider;
use crate::error::{ApiError, Result};
use crate::http_client::{ApiResponse, HttpUtils, RawResponse};
use crate::query::ListQuery;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Connection establishment timeout (bounded by the request timeout).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClientConfig {
    /// API root, e.g. `https://portal.example.com/api`. A trailing slash is ignored.
    pub base_url: String,
    /// Timeout for a whole request (send + body). Expiry aborts the request.
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the portal API.
///
/// Attaches the bearer token from the injected [`TokenProvider`], enforces the
/// configured timeout, and normalizes failures into [`ApiError`]. Every call is
/// a single attempt.
pub struct ApiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    token_provider: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a client.
    ///
    /// Fails with [`ApiError::InvalidRequest`] if the base URL is not an
    /// `http(s)` URL or the underlying client cannot be built.
    pub fn new(config: ApiClientConfig, token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidRequest {
                detail: format!("Base URL must start with http:// or https://: {base_url}"),
            });
        }

        let connect_timeout = config
            .timeout
            .min(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS));
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest {
                detail: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
            token_provider,
        })
    }

    /// API root without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the absolute URL for `path` (relative to the API root) and query pairs.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let path = path.trim_start_matches('/');
        let mut url = format!("{}/{path}", self.base_url);
        if !query.is_empty() {
            let qs = query
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    /// Perform one exchange and return the raw 2xx response.
    ///
    /// Non-2xx statuses are normalized into [`ApiError::Http`].
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let token = self.token_provider.access_token().await.map_err(|e| match e {
            ApiError::Authentication { .. } => e,
            other => ApiError::Authentication {
                detail: other.to_string(),
            },
        })?;

        let url = self.url(path, query);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let raw =
            HttpUtils::execute_request(request, method.as_str(), path, self.timeout).await?;

        if raw.is_success() {
            Ok(raw)
        } else {
            let err = HttpUtils::error_from_response(&raw);
            if err.is_expected() {
                log::warn!("{method} {path} failed: {err}");
            } else {
                log::error!("{method} {path} failed: {err}");
            }
            Err(err)
        }
    }

    /// Send a request and decode the body by content type.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(|b| {
                serde_json::to_vec(b).map_err(|e| ApiError::Serialization {
                    detail: e.to_string(),
                })
            })
            .transpose()?;
        let raw = self.execute(method, path, query, body).await?;
        HttpUtils::decode(raw)
    }

    /// `GET` a JSON resource.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<()>(Method::GET, path, &[], None)
            .await?
            .into_json()
    }

    /// `GET` a JSON list with filter/sort/pagination parameters.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str, query: &ListQuery) -> Result<T> {
        let pairs = query.to_query_pairs();
        self.send::<()>(Method::GET, path, &pairs, None)
            .await?
            .into_json()
    }

    /// `GET` a resource as text, whatever its content type.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        Ok(self
            .send::<()>(Method::GET, path, &[], None)
            .await?
            .into_text())
    }

    /// `GET` a binary resource (e.g., a PDF) without decoding it.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.execute(Method::GET, path, &[], None).await?.body)
    }

    /// `POST` a JSON body and decode the JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, &[], Some(body))
            .await?
            .into_json()
    }

    /// `POST` a JSON body, ignoring whatever the server answers on success.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, &[], Some(body)).await?;
        Ok(())
    }

    /// `PUT` a JSON body and decode the JSON response.
    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, &[], Some(body))
            .await?
            .into_json()
    }

    /// `PATCH` a JSON body and decode the JSON response.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PATCH, path, &[], Some(body))
            .await?
            .into_json()
    }

    /// `DELETE` a resource, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

/// Percent-encode an id for use as a path segment.
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
