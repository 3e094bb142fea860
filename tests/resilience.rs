//! Failure injection: retries, circuit breaking, timeouts and slot accounting.

use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use planstore_client::resilience::CircuitState;
use planstore_client::{ApiClient, RequestConfig};

mod common;

#[tokio::test]
async fn test_no_retry_on_not_found() {
    let backend = common::start_mock_backend(404, r#"{"success":false,"error":{"message":"Plan not found"}}"#).await;
    let client = common::test_client(&backend.base_url());

    let err = client
        .get::<Value>("/plans/404", RequestConfig::default().retries(5))
        .await
        .unwrap_err();

    assert_eq!(err.status_code, 404);
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_server_error_exhausts_retries() {
    let backend = common::start_mock_backend(500, r#"{"success":false,"error":{"message":"Internal error"}}"#).await;
    let client = common::test_client(&backend.base_url());

    let err = client
        .get::<Value>("/plans", RequestConfig::default().retries(2).retry_delay(Duration::from_millis(5)))
        .await
        .unwrap_err();

    assert_eq!(err.status_code, 500);
    assert_eq!(err.message, "Internal error");
    assert_eq!(backend.hits(), 3);
    assert_eq!(client.status().active_requests, 0);
}

#[tokio::test]
async fn test_retry_until_success() {
    let calls = Arc::new(AtomicU32::new(0));
    let cc = calls.clone();
    let backend = common::start_programmable_backend(move |_| {
        let cc = cc.clone();
        async move {
            match cc.fetch_add(1, Ordering::SeqCst) {
                0 => (503, common::error_body("Service Unavailable")),
                1 => (429, common::error_body("Too many requests")),
                _ => (200, common::ok_body(r#"{"ok":true}"#)),
            }
        }
    })
    .await;
    let client = common::test_client(&backend.base_url());

    let resp = client.get::<Value>("/plans", RequestConfig::default()).await.unwrap();

    assert_eq!(resp.data.unwrap()["ok"], true);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // A request ID is shared by every attempt of one call.
    let ids: Vec<String> = backend
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.header("x-request-id").unwrap().to_string())
        .collect();
    assert!(ids.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_retry_delays_grow() {
    let backend = common::start_mock_backend(502, "").await;
    let client = common::test_client(&backend.base_url());

    let start = Instant::now();
    let _ = client
        .get::<Value>("/plans", RequestConfig::default().retries(2).retry_delay(Duration::from_millis(40)))
        .await;

    // 40ms + 80ms of backoff before the third attempt.
    assert!(start.elapsed() >= Duration::from_millis(120));
    assert_eq!(backend.hits(), 3);
}

#[tokio::test]
async fn test_circuit_opens_after_threshold() {
    let backend = common::start_mock_backend(500, r#"{"success":false,"error":{"message":"down"}}"#).await;
    let client = common::test_client(&backend.base_url());
    let once = || RequestConfig::default().retries(0);

    for _ in 0..5 {
        let err = client.get::<Value>("/plans", once()).await.unwrap_err();
        assert_eq!(err.status_code, 500);
    }
    assert_eq!(client.status().circuit_state, CircuitState::Open);

    let err = client.get::<Value>("/plans", once()).await.unwrap_err();
    assert!(err.is_circuit_open());
    assert_eq!(err.status_code, 503);
    assert_eq!(backend.hits(), 5, "open circuit must not reach the network");
    assert_eq!(client.status().consecutive_failures, 5);
}

#[tokio::test]
async fn test_retries_count_once_toward_breaker() {
    let backend = common::start_mock_backend(500, "{}").await;
    let client = common::test_client(&backend.base_url());

    let _ = client
        .get::<Value>("/plans", RequestConfig::default().retries(3).retry_delay(Duration::from_millis(1)))
        .await;

    assert_eq!(backend.hits(), 4);
    assert_eq!(client.status().consecutive_failures, 1);
    assert_eq!(client.status().circuit_state, CircuitState::Closed);
}

#[tokio::test]
async fn test_circuit_recovers_after_timeout() {
    let healthy = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let h = healthy.clone();
    let backend = common::start_programmable_backend(move |_| {
        let h = h.clone();
        async move {
            if h.load(Ordering::SeqCst) {
                (200, common::ok_body("1"))
            } else {
                (503, common::error_body("down"))
            }
        }
    })
    .await;
    let mut config = common::test_config(&backend.base_url());
    config.circuit_breaker.recovery_timeout_ms = 100;
    let client = ApiClient::new(&config).unwrap();
    let once = || RequestConfig::default().retries(0);

    for _ in 0..5 {
        let _ = client.get::<Value>("/plans", once()).await;
    }
    assert!(client.get::<Value>("/plans", once()).await.unwrap_err().is_circuit_open());

    healthy.store(true, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(150)).await;

    client.get::<Value>("/plans", once()).await.unwrap();
    let status = client.status();
    assert_eq!(status.circuit_state, CircuitState::Closed);
    assert_eq!(status.consecutive_failures, 0);

    client.get::<Value>("/plans", once()).await.unwrap();
    assert_eq!(backend.hits(), 7);
}

#[tokio::test]
async fn test_timeout_releases_slot() {
    let backend = common::start_programmable_backend(|_| async {
        std::future::pending::<()>().await;
        (200, String::new())
    })
    .await;
    let client = common::test_client(&backend.base_url());

    let start = Instant::now();
    let err = client
        .get::<Value>("/plans", RequestConfig::default().timeout(Duration::from_millis(50)).retries(0))
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.status_code, 408);
    assert!(start.elapsed() < Duration::from_millis(1000));
    assert_eq!(client.status().active_requests, 0);
}

#[tokio::test]
async fn test_timeouts_are_retried() {
    let backend = common::start_programmable_backend(|_| async {
        std::future::pending::<()>().await;
        (200, String::new())
    })
    .await;
    let client = common::test_client(&backend.base_url());

    let err = client
        .get::<Value>(
            "/plans",
            RequestConfig::default()
                .timeout(Duration::from_millis(50))
                .retries(2)
                .retry_delay(Duration::from_millis(5)),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(backend.hits(), 3);
    assert_eq!(client.status().consecutive_failures, 1);
    assert_eq!(client.status().active_requests, 0);
}

#[tokio::test]
async fn test_server_408_is_not_retried() {
    let backend = common::start_mock_backend(408, r#"{"success":false,"error":{"message":"Request Timeout"}}"#).await;
    let client = common::test_client(&backend.base_url());

    let err = client
        .get::<Value>("/plans", RequestConfig::default().retries(3))
        .await
        .unwrap_err();

    assert_eq!(err.status_code, 408);
    assert!(!err.is_timeout());
    assert_eq!(backend.hits(), 1);
}

#[tokio::test]
async fn test_concurrency_limit_respected() {
    let backend = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        (200, common::ok_body("null"))
    })
    .await;
    let mut config = common::test_config(&backend.base_url());
    config.api.max_concurrent_requests = 2;
    let client = ApiClient::new(&config).unwrap();

    let mut handles = Vec::new();
    for i in 0..6 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.get::<Value>(&format!("/plans/{}", i), RequestConfig::default()).await
        }));
    }

    common::settle().await;
    let status = client.status();
    assert_eq!(status.active_requests, 2);
    assert_eq!(status.queue_size, 4);

    for h in handles {
        h.await.unwrap().unwrap();
    }
    assert_eq!(backend.hits(), 6);
    assert!(backend.peak_in_flight() <= 2);
    assert_eq!(client.status().active_requests, 0);
    assert_eq!(client.status().queue_size, 0);
}

#[tokio::test]
async fn test_cancelled_call_releases_slot() {
    let backend = common::start_programmable_backend(|_| async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        (200, common::ok_body("null"))
    })
    .await;
    let client = common::test_client(&backend.base_url());

    let c = client.clone();
    let handle = tokio::spawn(async move { c.get::<Value>("/plans", RequestConfig::default()).await });
    common::settle().await;
    assert_eq!(client.status().active_requests, 1);

    handle.abort();
    let _ = handle.await;
    assert_eq!(client.status().active_requests, 0);
}
