//! Tests for the single fixed-delay retry.

mod test_utils;

use courier_core::{Body, Normalized, RequestDescriptor, RetryMutator};
use courier_error::HttpErrorKind;
use courier_http::{RequestExecutor, RetryPolicy};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use test_utils::{MockReply, MockTransport, get};
use tokio::time::Instant;

const DELAY: Duration = Duration::from_millis(2_000);

fn policy(transport: &MockTransport) -> RetryPolicy {
    let executor = RequestExecutor::new(Arc::new(transport.clone()), "courier-test/1.0");
    RetryPolicy::new(executor, DELAY)
}

#[tokio::test(start_paused = true)]
async fn test_abort_status_returns_none_without_retry() {
    let transport = MockTransport::new(vec![MockReply::status(403, "forbidden")]);
    let request = RequestDescriptor::get("https://api.example.com/x")
        .abort_status(403)
        .build()
        .unwrap();

    let result = policy(&transport).execute(&request).await.unwrap();

    assert_eq!(result, None);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abort_wins_over_retryable_status() {
    let transport = MockTransport::new(vec![MockReply::status(503, "maintenance")]);
    let request = RequestDescriptor::get("https://api.example.com/x")
        .abort_status(503)
        .build()
        .unwrap();

    assert_eq!(policy(&transport).execute(&request).await.unwrap(), None);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_connection_reset_then_success() {
    let transport = MockTransport::new(vec![
        MockReply::failure("error sending request: connection reset by peer"),
        MockReply::json(200, r#"{"ok":true}"#),
    ]);

    let start = Instant::now();
    let result = policy(&transport)
        .execute(&get("https://api.example.com/x"))
        .await
        .unwrap();

    assert_eq!(
        result,
        Some(Normalized::Parsed(Body::Json(json!({"ok": true}))))
    );
    assert_eq!(transport.call_count(), 2);
    assert!(start.elapsed() >= DELAY);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_then_success() {
    let transport = MockTransport::new(vec![
        MockReply::Failure(courier_http::TransportFailure::timeout("deadline elapsed")),
        MockReply::json(200, r#"{"temp":12.5}"#),
    ]);

    let result = policy(&transport)
        .execute(&get("https://api.example.com/x"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.as_json(), Some(&json!({"temp": 12.5})));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_access_denied_not_retried() {
    for status in [401, 403] {
        let transport = MockTransport::new(vec![
            MockReply::status(status, "bad token"),
            MockReply::json(200, "{}"),
        ]);

        let err = policy(&transport)
            .execute(&get("https://api.example.com/x"))
            .await
            .unwrap_err();

        assert!(err.is_access_denied());
        assert_eq!(err.status(), Some(status));
        assert_eq!(transport.call_count(), 1);
    }
}

#[tokio::test(start_paused = true)]
async fn test_unclassified_not_retried() {
    let transport = MockTransport::new(vec![
        MockReply::status(400, "bad request"),
        MockReply::json(200, "{}"),
    ]);

    let err = policy(&transport)
        .execute(&get("https://api.example.com/x"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_both_attempts_fail_returns_retry_error() {
    let transport = MockTransport::new(vec![
        MockReply::status(503, "first"),
        MockReply::status(502, "second"),
        MockReply::json(200, "{}"),
    ]);

    let err = policy(&transport)
        .execute(&get("https://api.example.com/x"))
        .await
        .unwrap_err();

    match err.kind() {
        HttpErrorKind::RetryableStatus { status, message } => {
            assert_eq!(*status, 502);
            assert_eq!(message, "second");
        }
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_abort_applies_to_retry_attempt() {
    let transport = MockTransport::new(vec![
        MockReply::status(500, "oops"),
        MockReply::status(404, "gone"),
    ]);
    let request = RequestDescriptor::get("https://api.example.com/x")
        .abort_status(404)
        .build()
        .unwrap();

    assert_eq!(policy(&transport).execute(&request).await.unwrap(), None);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_mutator_runs_once_before_retry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let transport = MockTransport::new(vec![
        MockReply::status(503, "premium busy"),
        MockReply::json(200, r#"{"tier":"free"}"#),
    ]);
    let request = RequestDescriptor::get("https://api.example.com/forecast?tier=premium")
        .retry_mutator(RetryMutator::new(move |req: &RequestDescriptor| {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(req.clone().with_url(req.url().replace("premium", "free")))
        }))
        .build()
        .unwrap();

    let result = policy(&transport).execute(&request).await.unwrap().unwrap();

    assert_eq!(result.as_json(), Some(&json!({"tier": "free"})));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let sent = transport.sent();
    assert_eq!(sent[0].url(), "https://api.example.com/forecast?tier=premium");
    assert_eq!(sent[1].url(), "https://api.example.com/forecast?tier=free");
}

#[tokio::test(start_paused = true)]
async fn test_mutator_not_called_on_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let transport = MockTransport::new(vec![MockReply::json(200, "{}")]);
    let request = RequestDescriptor::get("https://api.example.com/x")
        .retry_mutator(RetryMutator::new(move |_: &RequestDescriptor| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        }))
        .build()
        .unwrap();

    policy(&transport).execute(&request).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_mutator_declining_keeps_request() {
    let transport = MockTransport::new(vec![
        MockReply::failure("read ETIMEDOUT"),
        MockReply::json(200, "{}"),
    ]);
    let request = RequestDescriptor::get("https://api.example.com/x")
        .header("Authorization", "Bearer token")
        .retry_mutator(RetryMutator::new(|_: &RequestDescriptor| None))
        .build()
        .unwrap();

    policy(&transport).execute(&request).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].url(), sent[0].url());
    assert_eq!(sent[1].header("authorization"), Some("Bearer token"));
}
