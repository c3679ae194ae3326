//! HTTP reachability and health probing.
//!
//! Uses the curl crate (libcurl) to issue HEAD requests: a cheap reachability
//! check for the connectivity monitor, and a fuller report for diagnostics.
//! Both run in the current thread; call from `spawn_blocking` in async code.

use std::time::{Duration, Instant};

use crate::retry::RequestError;

/// Result of a diagnostic HEAD probe.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// HTTP status of the final response (after redirects).
    pub status: u32,
    /// Wall-clock time for the whole request.
    pub elapsed: Duration,
    /// `Content-Length` if the server reported one.
    pub content_length: Option<u64>,
}

/// Reachability check: true iff the endpoint produced any HTTP response.
/// The status does not matter; a 500 still proves the network path works.
/// Transport failures report `Ok(false)`; only a probe that cannot be
/// constructed at all (malformed URL, unsupported scheme) is an error.
pub fn reachable(url: &str, timeout: Duration) -> Result<bool, curl::Error> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?; // HEAD request
    easy.follow_location(true)?;
    easy.connect_timeout(timeout.min(Duration::from_secs(15)))?;
    easy.timeout(timeout)?;

    match easy.perform() {
        Ok(()) => Ok(true),
        Err(e) if e.is_url_malformed() || e.is_unsupported_protocol() => Err(e),
        Err(_) => Ok(false),
    }
}

/// Diagnostic HEAD probe: status, elapsed time, and advertised size.
///
/// Follows redirects. Non-2xx statuses are surfaced as `RequestError::Http`
/// so callers can run this under the executor and classify the failure.
pub fn head(url: &str, timeout: Duration) -> Result<ProbeReport, RequestError> {
    let start = Instant::now();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.nobody(true)?;
    easy.follow_location(true)?;
    easy.connect_timeout(timeout.min(Duration::from_secs(15)))?;
    easy.timeout(timeout)?;
    easy.perform()?;

    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(RequestError::Http(status));
    }

    let content_length = easy
        .content_length_download()
        .ok()
        .filter(|len| *len >= 0.0)
        .map(|len| len as u64);

    Ok(ProbeReport {
        status,
        elapsed: start.elapsed(),
        content_length,
    })
}
