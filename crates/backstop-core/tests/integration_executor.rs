//! Integration tests: executor + curl HEAD probe against a local server with
//! scripted failures.

mod common;

use std::sync::Arc;
use std::time::Duration;

use backstop_core::connectivity::ConnectivityMonitor;
use backstop_core::executor::Executor;
use backstop_core::probe;
use backstop_core::retry::{Backoff, ErrorCode, RequestError, RetryPolicy};

fn test_policy(max_attempts: u32, attempt_timeout: Duration) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        attempt_timeout,
        base_delay: Duration::from_millis(50),
        max_delay: Duration::from_secs(1),
        backoff: Backoff::Linear,
    }
}

/// HEAD the URL on the blocking pool with the given curl-side timeout.
async fn head(url: String, timeout: Duration) -> Result<probe::ProbeReport, RequestError> {
    tokio::task::spawn_blocking(move || probe::head(&url, timeout))
        .await
        .map_err(|e| RequestError::Other(e.to_string()))?
}

#[tokio::test]
async fn recovers_after_transient_server_errors() {
    let server = common::flaky_server::start(vec![503, 503, 200]);
    let ex = Executor::new(
        Arc::new(ConnectivityMonitor::new()),
        test_policy(3, Duration::from_secs(5)),
    );

    let url = server.url.clone();
    let report = ex
        .execute(&server.url, || head(url.clone(), Duration::from_secs(2)))
        .await
        .expect("third attempt should succeed");

    assert_eq!(report.status, 200);
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = common::flaky_server::start(vec![404]);
    let ex = Executor::new(
        Arc::new(ConnectivityMonitor::new()),
        test_policy(3, Duration::from_secs(5)),
    );

    let url = server.url.clone();
    let err = ex
        .execute(&server.url, || head(url.clone(), Duration::from_secs(2)))
        .await
        .expect_err("404 must fail");

    assert_eq!(err.code, ErrorCode::ClientError);
    assert_eq!(err.status_code, Some(404));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn persistent_server_errors_exhaust_the_attempt_budget() {
    let server = common::flaky_server::start(vec![502]);
    let ex = Executor::new(
        Arc::new(ConnectivityMonitor::new()),
        test_policy(3, Duration::from_secs(5)),
    );

    let url = server.url.clone();
    let err = ex
        .execute(&server.url, || head(url.clone(), Duration::from_secs(2)))
        .await
        .expect_err("502 forever must fail");

    assert_eq!(err.code, ErrorCode::MaxRetriesExceeded);
    assert_eq!(err.status_code, Some(502));
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn offline_monitor_prevents_any_request() {
    let server = common::flaky_server::start(vec![200]);
    let monitor = Arc::new(ConnectivityMonitor::new());
    monitor.set_online(false);
    let ex = Executor::new(monitor, test_policy(3, Duration::from_secs(5)));

    let url = server.url.clone();
    let err = ex
        .execute(&server.url, || head(url.clone(), Duration::from_secs(2)))
        .await
        .expect_err("offline must fail");

    assert_eq!(err.code, ErrorCode::Offline);
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn hanging_server_hits_the_curl_timeout() {
    let server = common::flaky_server::start_hanging();
    let ex = Executor::new(
        Arc::new(ConnectivityMonitor::new()),
        test_policy(2, Duration::from_secs(10)),
    );

    let url = server.url.clone();
    let err = ex
        .execute(&server.url, || head(url.clone(), Duration::from_secs(1)))
        .await
        .expect_err("hang must fail");

    // Both attempts time out, so the budget is exhausted.
    assert_eq!(err.code, ErrorCode::MaxRetriesExceeded);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn reachability_probe_reports_online_for_any_status() {
    let server = common::flaky_server::start(vec![500]);
    let url = server.url.clone();
    let online = tokio::task::spawn_blocking(move || {
        probe::reachable(&url, Duration::from_secs(2)).unwrap()
    })
    .await
    .unwrap();
    assert!(online);
}

#[tokio::test]
async fn check_now_flips_the_monitor_offline_on_dead_endpoint() {
    // Reserved port with nothing listening: connection refused.
    let monitor =
        ConnectivityMonitor::with_probe("http://127.0.0.1:1/", Duration::from_secs(1));
    assert!(monitor.is_online());
    let online = monitor.check_now().await.unwrap();
    assert!(!online);
    assert!(!monitor.is_online());
}

#[tokio::test]
async fn check_now_flips_the_monitor_back_online() {
    let server = common::flaky_server::start(vec![204]);
    let monitor = ConnectivityMonitor::with_probe(server.url.clone(), Duration::from_secs(2));
    monitor.set_online(false);
    let online = monitor.check_now().await.unwrap();
    assert!(online);
    assert!(monitor.is_online());
}
