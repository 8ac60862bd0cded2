//! End-to-end tests of the HTTP wrapper against a mock REST server.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use portal_api::{
    ApiClient, ApiClientConfig, ApiError, BillingApi, DashboardApi, DomainApi, DomainUpdate,
    HttpUtils, ListQuery, SortOrder, StaticTokenProvider, TicketApi, TicketReply, TokenProvider,
    UserApi,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Arc<dyn TokenProvider>) -> ApiClient {
    ApiClient::new(
        ApiClientConfig {
            base_url: format!("{}/api", server.uri()),
            timeout: Duration::from_secs(5),
        },
        token,
    )
    .expect("client")
}

fn domain_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "status": "active",
        "registeredAt": "2024-01-01",
        "expiresAt": "2027-01-01",
        "autoRenew": true,
        "nameservers": ["ns1.host.net", "ns2.host.net"],
        "locked": false
    })
}

struct FailingTokenProvider;

#[async_trait]
impl TokenProvider for FailingTokenProvider {
    async fn access_token(&self) -> portal_api::Result<Option<String>> {
        Err(ApiError::Authentication {
            detail: "refresh token revoked".into(),
        })
    }
}

#[tokio::test]
async fn attaches_bearer_token_and_decodes_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/domains"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [domain_json("d1", "example.com")],
            "page": 1,
            "limit": 10,
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::new("secret-token")));
    let page = client.list_domains(&ListQuery::default()).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "example.com");
    assert!(!page.has_more());
}

#[tokio::test]
async fn list_query_sends_only_non_default_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tickets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [], "page": 2, "limit": 10, "total": 0
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::anonymous()));
    let query = ListQuery::default()
        .status("open")
        .sort("updatedAt", SortOrder::Desc)
        .page(2);
    client.list_tickets(&query).await.unwrap();
    client.list_tickets(&ListQuery::default()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].url.query(),
        Some("status=open&sortBy=updatedAt&sortOrder=desc&page=2")
    );
    assert_eq!(requests[1].url.query(), None);
}

#[tokio::test]
async fn anonymous_requests_have_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activeDomains": 3, "expiringDomains": 1, "openTickets": 0, "unpaidInvoices": 2
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::anonymous()));
    let summary = client.get_summary().await.unwrap();
    assert_eq!(summary.active_domains, 3);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn token_provider_failure_sends_nothing() {
    let server = MockServer::start().await;
    let client = client_for(&server, Arc::new(FailingTokenProvider));

    let err = client.get_profile().await.unwrap_err();
    assert!(matches!(err, ApiError::Authentication { .. }), "{err:?}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_2xx_is_normalized_with_server_code() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/domains/d1"))
        .and(body_json(json!({ "locked": false })))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": { "code": "TRANSFER_IN_PROGRESS", "message": "Domain is being transferred" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::new("t")));
    let err = client
        .update_domain(
            "d1",
            &DomainUpdate {
                locked: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Http {
            status: 409,
            code: Some("TRANSFER_IN_PROGRESS".into()),
            message: "Domain is being transferred".into(),
        }
    );
    assert!(err.is_expected());
}

#[tokio::test]
async fn server_error_without_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/security"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::new("t")));
    let err = client.get_security().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    assert!(!err.is_expected());
}

#[tokio::test]
async fn timeout_aborts_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/invoices"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": [], "page": 1, "limit": 10, "total": 0}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(
        ApiClientConfig {
            base_url: format!("{}/api", server.uri()),
            timeout: Duration::from_millis(200),
        },
        Arc::new(StaticTokenProvider::new("t")),
    )
    .unwrap();

    let started = std::time::Instant::now();
    let err = client
        .list_invoices(&ListQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Timeout { after_ms: 200 });
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn transport_timeout_reports_elapsed_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    // reqwest gives up before the outer timeout does.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(150))
        .build()
        .unwrap();
    let err = HttpUtils::execute_request(
        http.get(format!("{}/slow", server.uri())),
        "GET",
        "/slow",
        Duration::from_secs(10),
    )
    .await
    .unwrap_err();

    let ApiError::Timeout { after_ms } = err else {
        panic!("expected a timeout, got {err:?}");
    };
    assert!((150..2000).contains(&after_ms), "after_ms = {after_ms}");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let client = ApiClient::new(
        ApiClientConfig {
            base_url: "http://127.0.0.1:1/api".into(),
            timeout: Duration::from_secs(5),
        },
        Arc::new(StaticTokenProvider::anonymous()),
    )
    .unwrap();

    let err = client.get_summary().await.unwrap_err();
    assert!(err.is_transport(), "{err:?}");
}

#[tokio::test]
async fn pdf_download_returns_raw_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/invoices/inv-7/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::new("t")));
    let bytes = client.download_invoice_pdf("inv-7").await.unwrap();
    assert_eq!(bytes, b"%PDF-1.7");
}

#[tokio::test]
async fn plain_text_body_is_kept_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::anonymous()));
    assert_eq!(client.get_text("/health").await.unwrap(), "ok");
}

#[tokio::test]
async fn ticket_reply_posts_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tickets/t%201/reply"))
        .and(body_json(json!({ "message": "Still broken" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "m9", "author": "customer", "body": "Still broken",
            "createdAt": "2026-02-01T08:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::new("t")));
    let message = client
        .reply_to_ticket(
            "t 1",
            &TicketReply {
                message: "Still broken".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(message.id, "m9");
}

#[tokio::test]
async fn unit_endpoints_ignore_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payment-methods/pm_2/default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/payment-methods/pm_3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(StaticTokenProvider::new("t")));
    client.set_default_payment_source("pm_2").await.unwrap();
    client.remove_payment_source("pm_3").await.unwrap();
}
