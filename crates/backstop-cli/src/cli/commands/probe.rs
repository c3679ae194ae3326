//! `backstop probe` – HEAD a URL through the retrying executor.

use anyhow::Result;
use backstop_core::connectivity::ConnectivityMonitor;
use backstop_core::executor::Executor;
use backstop_core::probe;
use backstop_core::retry::{ErrorCode, RequestError, RetryPolicy};
use std::sync::Arc;

pub async fn run_probe(
    monitor: Arc<ConnectivityMonitor>,
    policy: RetryPolicy,
    url: &str,
) -> Result<()> {
    // Give curl the same budget as the executor's attempt timer so a stalled
    // request fails on whichever side notices first.
    let timeout = policy.attempt_timeout;
    let ex = Executor::new(monitor, policy);

    let target = url.to_string();
    let outcome = ex
        .execute(url, || {
            let url = target.clone();
            async move {
                tokio::task::spawn_blocking(move || probe::head(&url, timeout))
                    .await
                    .map_err(|e| RequestError::Other(e.to_string()))?
            }
        })
        .await;

    match outcome {
        Ok(report) => {
            let size = report
                .content_length
                .map(|len| len.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{} -> HTTP {} in {} ms (content-length: {})",
                url,
                report.status,
                report.elapsed.as_millis(),
                size
            );
            Ok(())
        }
        Err(err) => {
            println!("{} -> {} [{}]", url, err.message, err.code);
            println!("hint: {}", hint(err.code));
            anyhow::bail!("probe failed: {}", err)
        }
    }
}

/// Remediation hint per failure category.
fn hint(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::Offline
        | ErrorCode::Timeout
        | ErrorCode::FetchFailed
        | ErrorCode::MaxRetriesExceeded => "check your network connectivity and try again",
        ErrorCode::ClientError => "check the request URL and credentials",
        ErrorCode::ServerError => "the server is having trouble; try again later",
        ErrorCode::InvalidUrl => "check the URL syntax (http:// or https:// only)",
        ErrorCode::Unknown => "inspect the log for details",
    }
}
