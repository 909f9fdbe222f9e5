//! Tests for the reqwest transport against a local mock server.

use courier_core::{Body, Normalized, RequestDescriptor, ResponseMode};
use courier_http::{ProviderRegistry, RequestExecutor, ReqwestTransport, Transport};
use courier_rate_limit::{CourierConfig, TransportConfig};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_get_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/x")
        .match_header("user-agent", "courier-test/1.0")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let config = TransportConfig {
        user_agent: "courier-test/1.0".to_string(),
        timeout_ms: 5_000,
    };
    let executor = RequestExecutor::from_config(&config).unwrap();
    let request = RequestDescriptor::get(format!("{}/x", server.url()))
        .build()
        .unwrap();

    let result = executor.execute(&request).await.unwrap();

    assert_eq!(result, Normalized::Parsed(Body::Json(json!({"ok": true}))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_post_json_body_and_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/payments")
        .match_header("authorization", "Bearer token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"amount": "10.00"})))
        .with_status(201)
        .with_header("x-request-id", "abc")
        .with_body(r#"{"id":7}"#)
        .create_async()
        .await;

    let transport = ReqwestTransport::new(Duration::from_secs(5)).unwrap();
    let request = RequestDescriptor::post(format!("{}/payments", server.url()))
        .header("Authorization", "Bearer token")
        .body(json!({"amount": "10.00"}))
        .response_mode(ResponseMode::Envelope)
        .build()
        .unwrap();

    let response = transport.send(&request).await.unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.headers.get("x-request-id").map(String::as_str), Some("abc"));
    assert_eq!(response.body, r#"{"id":7}"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_form_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/token")
        .match_body(Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()))
        .with_status(204)
        .create_async()
        .await;

    let executor = RequestExecutor::from_config(&TransportConfig::default()).unwrap();
    let request = RequestDescriptor::post(format!("{}/token", server.url()))
        .body(courier_core::RequestBody::Form(vec![(
            "grant_type".to_string(),
            "client_credentials".to_string(),
        )]))
        .build()
        .unwrap();

    assert_eq!(executor.execute(&request).await.unwrap(), Normalized::Success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_abort_status_through_registry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/x")
        .with_status(403)
        .with_body("forbidden")
        .expect(1)
        .create_async()
        .await;

    let registry = ProviderRegistry::from_config(&CourierConfig::default()).unwrap();
    let request = RequestDescriptor::get(format!("{}/x", server.url()))
        .abort_status(403)
        .build()
        .unwrap();

    assert_eq!(registry.request("github", &request).await.unwrap(), None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_classified() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/x")
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;

    let executor = RequestExecutor::from_config(&TransportConfig::default()).unwrap();
    let request = RequestDescriptor::get(format!("{}/x", server.url()))
        .build()
        .unwrap();

    let err = executor.execute(&request).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn test_refused_connection_has_no_status() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let executor = RequestExecutor::from_config(&TransportConfig::default()).unwrap();
    let request = RequestDescriptor::get(format!("http://127.0.0.1:{port}/x"))
        .build()
        .unwrap();

    let err = executor.execute(&request).await.unwrap_err();
    assert_eq!(err.status(), None);
}
