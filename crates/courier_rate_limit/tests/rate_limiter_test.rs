//! Tests for per-provider admission and usage statistics.

use chrono::{Duration as ChronoDuration, Local};
use courier_error::{CourierError, HttpError, RateLimitError, RateLimitErrorKind};
use courier_rate_limit::{ProviderLimits, RateLimiter, UsageStats};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{Instant, sleep};

async fn ok_task() -> Result<(), RateLimitError> {
    Ok(())
}

#[test]
fn test_invalid_limits_rejected() {
    let err = RateLimiter::new("broken", &ProviderLimits::concurrent(0)).unwrap_err();
    assert!(matches!(
        err.kind(),
        RateLimitErrorKind::InvalidLimits { provider, .. } if provider == "broken"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_fifo_with_single_slot() {
    let limiter = Arc::new(RateLimiter::new("serial", &ProviderLimits::concurrent(1)).unwrap());
    let spans = Arc::new(Mutex::new(Vec::new()));

    let mut handles = Vec::new();
    for id in 0..5 {
        let limiter = limiter.clone();
        let spans = spans.clone();
        handles.push(tokio::spawn(async move {
            limiter
                .schedule(|| async move {
                    let started = Instant::now();
                    sleep(Duration::from_millis(10)).await;
                    spans.lock().unwrap().push((id, started, Instant::now()));
                    Ok::<_, RateLimitError>(id)
                })
                .await
        }));
        // Let the task reach the queue before the next one is spawned
        tokio::task::yield_now().await;
    }

    for (id, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), id);
    }

    let spans = spans.lock().unwrap().clone();
    let order: Vec<usize> = spans.iter().map(|(id, _, _)| *id).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
    for pair in spans.windows(2) {
        let (_, _, previous_end) = pair[0];
        let (_, next_start, _) = pair[1];
        assert!(next_start >= previous_end, "task started before its predecessor finished");
    }
    assert_eq!(*limiter.stats().request_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_cap() {
    let limiter = Arc::new(RateLimiter::new("pair", &ProviderLimits::concurrent(2)).unwrap());
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..6 {
        let limiter = limiter.clone();
        let in_flight = in_flight.clone();
        let peak = peak.clone();
        handles.push(tokio::spawn(async move {
            limiter
                .schedule(|| async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(50)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, RateLimitError>(())
                })
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(peak.load(Ordering::SeqCst), 2);
    assert_eq!(limiter.available_slots(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reservoir_blocks_until_refill() {
    let start = Instant::now();
    let limiter =
        RateLimiter::new("metered", &ProviderLimits::unlimited().with_reservoir(2, 1_000)).unwrap();

    let mut started = Vec::new();
    for _ in 0..5 {
        limiter.schedule(ok_task).await.unwrap();
        started.push(start.elapsed());
    }

    assert!(started[0] < Duration::from_millis(10));
    assert!(started[1] < Duration::from_millis(10));
    for (i, expected) in [(2, 1_000), (3, 1_000), (4, 2_000)] {
        assert!(
            started[i] >= Duration::from_millis(expected)
                && started[i] < Duration::from_millis(expected + 100),
            "request {i} started at {:?}",
            started[i]
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_reservoir_refill_replaces_leftover() {
    let start = Instant::now();
    let limiter =
        RateLimiter::new("metered", &ProviderLimits::unlimited().with_reservoir(2, 1_000)).unwrap();

    limiter.schedule(ok_task).await.unwrap();

    // Idle across two boundaries; the reservoir resets to 2, it does not grow
    sleep(Duration::from_millis(2_500)).await;

    limiter.schedule(ok_task).await.unwrap();
    limiter.schedule(ok_task).await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(2_600));

    limiter.schedule(ok_task).await.unwrap();
    let third = start.elapsed();
    assert!(
        third >= Duration::from_millis(3_000) && third < Duration::from_millis(3_100),
        "third request started at {third:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn test_min_time_spacing() {
    let limiter =
        RateLimiter::new("spaced", &ProviderLimits::unlimited().with_min_time(500)).unwrap();

    let start = Instant::now();
    let mut started = Vec::new();
    for _ in 0..3 {
        limiter.schedule(ok_task).await.unwrap();
        started.push(start.elapsed());
    }

    assert!(started[0] < Duration::from_millis(10));
    assert!(started[1] >= Duration::from_millis(500));
    assert!(started[2] >= Duration::from_millis(1_000));
    assert!(started[2] < Duration::from_millis(1_100));
}

#[tokio::test(start_paused = true)]
async fn test_min_time_not_charged_after_idle() {
    let limiter =
        RateLimiter::new("spaced", &ProviderLimits::unlimited().with_min_time(500)).unwrap();

    limiter.schedule(ok_task).await.unwrap();
    sleep(Duration::from_millis(2_000)).await;

    let before = Instant::now();
    limiter.schedule(ok_task).await.unwrap();
    assert!(before.elapsed() < Duration::from_millis(10));
}

#[tokio::test]
async fn test_errors_counted_and_returned() {
    let limiter = RateLimiter::unlimited("flaky");

    let result: Result<(), CourierError> = limiter
        .schedule(|| async { Err(HttpError::other("boom").into()) })
        .await;
    let err = result.unwrap_err();
    assert!(err.as_http().is_some());
    assert!(err.to_string().contains("boom"));

    limiter
        .schedule(|| async { Ok::<_, CourierError>(()) })
        .await
        .unwrap();

    let stats = limiter.stats();
    assert_eq!(*stats.request_count(), 2);
    assert_eq!(*stats.error_count(), 1);
    assert!(stats.last_request().is_some());
}

#[tokio::test]
async fn test_new_day_resets_counters() {
    let limiter = RateLimiter::unlimited("daily");
    let yesterday = Local::now() - ChronoDuration::days(1);
    limiter.restore_stats(UsageStats::new(41, 3, Some(yesterday)));

    limiter.schedule(ok_task).await.unwrap();

    let stats = limiter.stats();
    assert_eq!(*stats.request_count(), 1);
    assert_eq!(*stats.error_count(), 0);
    assert!(stats.last_request().unwrap() > yesterday);
}

#[tokio::test]
async fn test_same_day_keeps_counting() {
    let limiter = RateLimiter::unlimited("daily");
    limiter.restore_stats(UsageStats::new(41, 3, Some(Local::now())));

    limiter.schedule(ok_task).await.unwrap();

    let stats = limiter.stats();
    assert_eq!(*stats.request_count(), 42);
    assert_eq!(*stats.error_count(), 3);
}

#[test]
fn test_fresh_stats_are_empty() {
    let limiter = RateLimiter::unlimited("idle");
    assert_eq!(limiter.stats(), UsageStats::default());
    assert!(limiter.limits().is_unlimited());
    assert_eq!(limiter.provider(), "idle");
}
