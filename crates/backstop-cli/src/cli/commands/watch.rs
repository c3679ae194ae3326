//! `backstop watch` – poll connectivity and report transitions.

use anyhow::Result;
use backstop_core::connectivity::ConnectivityMonitor;
use std::sync::Arc;
use std::time::Duration;

/// Polls `check_now` on the given interval and prints every transition.
/// Runs until the process is interrupted.
pub async fn run_watch(monitor: Arc<ConnectivityMonitor>, interval: Duration) -> Result<()> {
    let _subscription = monitor.subscribe(|online| {
        let state = if online { "online" } else { "offline" };
        println!("connectivity changed: {}", state);
    });

    let online = monitor.check_now().await?;
    println!(
        "connectivity: {} (checking every {}s)",
        if online { "online" } else { "offline" },
        interval.as_secs()
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // first tick fires immediately; already checked above
    loop {
        ticker.tick().await;
        if let Err(err) = monitor.check_now().await {
            tracing::warn!("connectivity check failed: {:#}", err);
        }
    }
}
