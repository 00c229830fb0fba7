mod common;

use std::time::Duration;

use common::init_logging;
use mediadeck_core::{JobAction, JobId};
use mediadeck_engine::{
    ApiRequest, Backend, ClientConfig, ClientError, ConfigError, FailureKind, HttpMethod,
    ReqwestBackend,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn requests_map_to_backend_routes() {
    let cases = [
        (ApiRequest::Downloads, HttpMethod::Get, "/api/downloads"),
        (ApiRequest::Progress, HttpMethod::Get, "/api/progress_stream"),
        (
            ApiRequest::for_action(JobAction::Pause, JobId::from(4)),
            HttpMethod::Post,
            "/api/download/4/pause",
        ),
        (
            ApiRequest::for_action(JobAction::Resume, JobId::from(4)),
            HttpMethod::Post,
            "/api/download/4/resume",
        ),
        (
            ApiRequest::for_action(JobAction::Cancel, JobId::from(4)),
            HttpMethod::Delete,
            "/api/download/4/cancel",
        ),
        (ApiRequest::ClearCompleted, HttpMethod::Post, "/api/clear_completed"),
    ];

    for (request, expected_method, expected_path) in cases {
        assert_eq!(request.method(), expected_method, "{request:?}");
        assert_eq!(request.path(), expected_path);
        assert_eq!(request.body(), None);
    }
}

#[tokio::test]
async fn add_download_posts_json_body() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/add_download"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "url": "https://example.com/v",
            "format_id": "best",
            "quality": "best"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(&ClientConfig::with_base_url(server.uri())).unwrap();
    let response = backend
        .send(&ApiRequest::AddDownload {
            url: "https://example.com/v".to_string(),
            format_id: "best".to_string(),
            quality: "best".to_string(),
        })
        .await
        .expect("send ok");

    assert!(response.is_success());
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&response.body).unwrap(),
        json!({"message": "ok"})
    );
}

#[tokio::test]
async fn cancel_uses_delete() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/download/7/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Download cancelled"})))
        .expect(1)
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(&ClientConfig::with_base_url(server.uri())).unwrap();
    let response = backend
        .send(&ApiRequest::Cancel(JobId::from(7)))
        .await
        .expect("send ok");
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/deck/api/downloads"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::with_base_url(format!("{}/deck/", server.uri()));
    let backend = ReqwestBackend::new(&config).unwrap();
    let response = backend.send(&ApiRequest::Downloads).await.expect("send ok");
    assert_eq!(response.body, b"{}");
}

#[tokio::test]
async fn error_status_is_returned_not_raised() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/download/1/pause"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "missing"})))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(&ClientConfig::with_base_url(server.uri())).unwrap();
    let response = backend
        .send(&ApiRequest::Pause(JobId::from(1)))
        .await
        .expect("send ok");
    assert_eq!(response.status, 404);
    assert!(!response.is_success());
}

#[tokio::test]
async fn slow_backend_times_out() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/downloads"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("{}"),
        )
        .mount(&server)
        .await;

    let config = ClientConfig {
        request_timeout: Duration::from_millis(50),
        ..ClientConfig::with_base_url(server.uri())
    };
    let backend = ReqwestBackend::new(&config).unwrap();
    let err = backend.send(&ApiRequest::Downloads).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    init_logging();
    let config = ClientConfig {
        connect_timeout: Duration::from_millis(200),
        ..ClientConfig::with_base_url("http://127.0.0.1:9")
    };
    let backend = ReqwestBackend::new(&config).unwrap();
    let err = backend.send(&ApiRequest::Progress).await.unwrap_err();
    assert!(
        matches!(err.kind, FailureKind::Network | FailureKind::Timeout),
        "{err:?}"
    );
}

#[test]
fn invalid_configuration_is_rejected() {
    assert!(matches!(
        ReqwestBackend::new(&ClientConfig::with_base_url("not a url")),
        Err(ClientError::Config(ConfigError::InvalidBaseUrl { .. }))
    ));
    assert!(matches!(
        ReqwestBackend::new(&ClientConfig::with_base_url("ftp://example.com")),
        Err(ClientError::Config(ConfigError::InvalidBaseUrl { .. }))
    ));

    let config = ClientConfig {
        progress_interval: Duration::ZERO,
        ..ClientConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::ZeroDuration("progress_interval"))
    );
    assert!(ClientConfig::default().validate().is_ok());
}
