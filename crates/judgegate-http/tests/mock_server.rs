//! Gateway tests against a mock judge server.
//!
//! These tests use wiremock to drive the full stack (gateway, refresh
//! coordinator and reqwest executor) over real HTTP.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::join_all;
use judgegate::{AuthenticatedGateway, Difficulty, GatewayConfig, JudgeApi, Language};
use judgegate_core::{
    AccessToken, ApiRequest, ApiUrl, CredentialStore, Error, FnObserver, MemoryCredentialStore,
    RefreshFailure, RefreshToken, TransportError,
};
use judgegate_http::ReqwestExecutor;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create an API URL from a mock server.
fn mock_api_url(server: &MockServer) -> ApiUrl {
    ApiUrl::new(&format!(
        "http://127.0.0.1:{}/api/v1/",
        server.address().port()
    ))
    .unwrap()
}

struct Harness {
    gateway: AuthenticatedGateway,
    store: Arc<MemoryCredentialStore>,
    expirations: Arc<AtomicUsize>,
}

fn harness(server: &MockServer, access: &str, refresh: Option<&str>) -> Harness {
    let store = Arc::new(MemoryCredentialStore::with_tokens(
        AccessToken::new(access),
        refresh.map(RefreshToken::new),
    ));
    let expirations = Arc::new(AtomicUsize::new(0));
    let counter = expirations.clone();
    let observer = FnObserver::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let gateway = AuthenticatedGateway::new(
        GatewayConfig::new(mock_api_url(server)),
        Arc::new(ReqwestExecutor::new().unwrap()),
        store.clone(),
        Arc::new(observer),
    )
    .unwrap();

    Harness {
        gateway,
        store,
        expirations,
    }
}

async fn mount_user(server: &MockServer, token: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": "ada",
            "email": "ada@example.com"
        }))
    } else {
        ResponseTemplate::new(status).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        }))
    };

    Mock::given(method("GET"))
        .and(path("/api/v1/user/"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(template)
        .mount(server)
        .await;
}

// ============================================================================
// Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_expired_token_is_refreshed_and_replayed() {
    let server = MockServer::start().await;
    mount_user(&server, "A1", 401).await;
    mount_user(&server, "A2", 200).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "A2",
            "refresh": "R2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let response = h.gateway.send(ApiRequest::get("user/")).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(h.store.access_token(), Some(AccessToken::new("A2")));
    assert_eq!(h.store.refresh_token(), Some(RefreshToken::new("R2")));
    assert_eq!(h.expirations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_expiries_share_one_refresh() {
    let server = MockServer::start().await;
    mount_user(&server, "A1", 401).await;
    mount_user(&server, "A2", 200).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "A2"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let sends = (0..5).map(|_| h.gateway.send(ApiRequest::get("user/")));
    let results = join_all(sends).await;

    for result in results {
        assert_eq!(result.unwrap().status, 200);
    }
    // Refresh token kept when the server does not rotate it
    assert_eq!(h.store.refresh_token(), Some(RefreshToken::new("R1")));
}

#[tokio::test]
async fn test_rejected_refresh_expires_session_once() {
    let server = MockServer::start().await;
    mount_user(&server, "A1", 401).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is blacklisted",
            "code": "token_not_valid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let sends = (0..3).map(|_| h.gateway.send(ApiRequest::get("user/")));
    let results = join_all(sends).await;

    for result in results {
        match result {
            Err(Error::SessionExpired(RefreshFailure::Rejected { status })) => {
                assert_eq!(status, 401)
            }
            other => panic!("expected session expiry, got {:?}", other),
        }
    }
    assert!(h.store.tokens().is_none());
    assert_eq!(h.expirations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_server_error_passes_through_without_refresh() {
    let server = MockServer::start().await;
    mount_user(&server, "A1", 500).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let err = h.gateway.send(ApiRequest::get("user/")).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(h.store.access_token(), Some(AccessToken::new("A1")));
}

#[tokio::test]
async fn test_binary_error_body_passes_through_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/"))
        .respond_with(ResponseTemplate::new(500).set_body_bytes(vec![123u8, 255, 254, 125]))
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let err = h.gateway.send(ApiRequest::get("user/")).await.unwrap_err();

    match err {
        Error::Http(http) => {
            assert_eq!(http.status, 500);
            assert_eq!(http.body, vec![123, 255, 254, 125]);
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_second_unauthorized_is_not_retried_again() {
    let server = MockServer::start().await;
    mount_user(&server, "A1", 401).await;
    mount_user(&server, "A2", 401).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "A2"})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let err = h.gateway.send(ApiRequest::get("user/")).await.unwrap_err();

    assert!(matches!(err, Error::AuthRetryExhausted(_)));
    assert_eq!(h.store.access_token(), Some(AccessToken::new("A2")));
    assert_eq!(h.expirations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_refresh_token_expires_without_network() {
    let server = MockServer::start().await;
    mount_user(&server, "A1", 401).await;

    Mock::given(method("POST"))
        .and(path("/api/v1/token/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", None);
    let err = h.gateway.send(ApiRequest::get("user/")).await.unwrap_err();

    assert!(matches!(
        err,
        Error::SessionExpired(RefreshFailure::MissingRefreshToken)
    ));
    assert_eq!(h.expirations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 1
    let store = Arc::new(MemoryCredentialStore::with_tokens(AccessToken::new("A1"), None));
    let gateway = AuthenticatedGateway::new(
        GatewayConfig::new(ApiUrl::new("http://127.0.0.1:1/api/v1/").unwrap()),
        Arc::new(ReqwestExecutor::new().unwrap()),
        store,
        Arc::new(judgegate_core::NoopObserver),
    )
    .unwrap();

    let err = gateway.send(ApiRequest::get("user/")).await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/user/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryCredentialStore::with_tokens(AccessToken::new("A1"), None));
    let gateway = AuthenticatedGateway::new(
        GatewayConfig::new(mock_api_url(&server)),
        Arc::new(ReqwestExecutor::with_timeout(Duration::from_millis(100)).unwrap()),
        store,
        Arc::new(judgegate_core::NoopObserver),
    )
    .unwrap();

    let err = gateway.send(ApiRequest::get("user/")).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Timeout { duration_ms: 100 })
    ));
}

// ============================================================================
// Judge API Tests
// ============================================================================

#[tokio::test]
async fn test_login_then_authenticated_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login/"))
        .and(body_json(json!({
            "email": "ada@example.com",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": "ada",
            "email": "ada@example.com",
            "tokens": {"access": "LA", "refresh": "LR"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_user(&server, "LA", 200).await;

    let store = Arc::new(MemoryCredentialStore::new());
    let gateway = AuthenticatedGateway::new(
        GatewayConfig::new(mock_api_url(&server)),
        Arc::new(ReqwestExecutor::new().unwrap()),
        store.clone(),
        Arc::new(judgegate_core::NoopObserver),
    )
    .unwrap();
    let api = JudgeApi::new(gateway);

    api.login("ada@example.com", "secret123").await.unwrap();
    let user = api.current_user().await.unwrap();

    assert_eq!(user.username, "ada");
    assert_eq!(store.refresh_token(), Some(RefreshToken::new("LR")));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let api = JudgeApi::new(h.gateway.clone());
    let err = api.login("ada@example.com", "nope").await.unwrap_err();

    // Login is not an authenticated call, so 401 never triggers refresh
    assert_eq!(err.status(), Some(401));
    assert_eq!(h.store.access_token(), Some(AccessToken::new("A1")));
    assert_eq!(h.expirations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_problem_list_filters_by_difficulty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/problems/"))
        .and(query_param("difficulty", "Hard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 9, "problem_name": "Median of Two Arrays", "difficulty": "Hard", "tags": []}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let api = JudgeApi::new(h.gateway.clone());
    let problems = api.problems(Some(Difficulty::Hard)).await.unwrap();

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].id, Some(9));
}

#[tokio::test]
async fn test_submit_wrong_answer_is_a_verdict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/execute/submit/"))
        .and(body_json(json!({
            "user_id": 1,
            "problem_id": 9,
            "code": "print(0)",
            "language": "py"
        })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "verdict": "Wrong Answer",
            "details": "Failed on test case 2"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    let api = JudgeApi::new(h.gateway.clone());
    let result = api.submit_code(1, 9, "print(0)", Language::Py).await.unwrap();

    assert!(!result.is_accepted());
    assert_eq!(result.verdict, "Wrong Answer");
}

#[tokio::test]
async fn test_logout_revokes_and_clears() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/logout/"))
        .and(header("authorization", "Bearer A1"))
        .and(body_json(json!({"refresh": "R1"})))
        .respond_with(ResponseTemplate::new(205))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, "A1", Some("R1"));
    JudgeApi::new(h.gateway.clone()).logout().await.unwrap();

    assert!(h.store.tokens().is_none());
}
