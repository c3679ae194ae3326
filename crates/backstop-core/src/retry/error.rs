//! Raw attempt errors and the classified error surfaced to callers.

use std::fmt;
use thiserror::Error;

/// Raw failure from a single network attempt, before classification.
#[derive(Debug)]
pub enum RequestError {
    /// Curl reported an error (timeout, connection, malformed URL, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// No connectivity was available when the attempt ran.
    Offline,
    /// Anything else (e.g. a blocking task that could not be joined).
    Other(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Curl(e) => write!(f, "{}", e),
            RequestError::Http(code) => write!(f, "HTTP {}", code),
            RequestError::Offline => write!(f, "no network connectivity"),
            RequestError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Curl(e) => Some(e),
            RequestError::Http(_) | RequestError::Offline | RequestError::Other(_) => None,
        }
    }
}

impl From<curl::Error> for RequestError {
    fn from(e: curl::Error) -> Self {
        RequestError::Curl(e)
    }
}

/// Machine-checkable failure category. Each code has a fixed retryability:
/// transient transport and server-side failures are worth re-attempting,
/// everything else is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Offline,
    InvalidUrl,
    Timeout,
    ClientError,
    ServerError,
    FetchFailed,
    MaxRetriesExceeded,
    Unknown,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Offline => "OFFLINE",
            ErrorCode::InvalidUrl => "INVALID_URL",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::ClientError => "CLIENT_ERROR",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::FetchFailed => "FETCH_FAILED",
            ErrorCode::MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }

    /// Whether a failure with this code is safe to re-attempt.
    pub const fn retryable(self) -> bool {
        matches!(
            self,
            ErrorCode::Timeout | ErrorCode::ServerError | ErrorCode::FetchFailed
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure returned by the executor. The executor never lets a raw
/// error escape; every failure is reduced to one of these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ClassifiedError {
    pub code: ErrorCode,
    pub message: String,
    pub status_code: Option<u16>,
    pub retryable: bool,
}

impl ClassifiedError {
    fn new(code: ErrorCode, message: String, status_code: Option<u16>) -> Self {
        Self {
            code,
            message,
            status_code,
            retryable: code.retryable(),
        }
    }

    pub fn offline() -> Self {
        Self::new(
            ErrorCode::Offline,
            "no network connectivity".to_string(),
            None,
        )
    }

    pub fn invalid_url(detail: &str) -> Self {
        Self::new(ErrorCode::InvalidUrl, detail.to_string(), None)
    }

    pub fn timeout(detail: &str) -> Self {
        Self::new(ErrorCode::Timeout, detail.to_string(), None)
    }

    /// Timeout raised by the executor's own per-attempt timer.
    pub fn attempt_timed_out(budget: std::time::Duration) -> Self {
        Self::timeout(&format!("attempt exceeded its {:?} time budget", budget))
    }

    pub fn client_error(status: u32) -> Self {
        Self::new(
            ErrorCode::ClientError,
            format!("HTTP {} (request will not succeed unchanged)", status),
            Some(status as u16),
        )
    }

    pub fn server_error(status: u32) -> Self {
        Self::new(
            ErrorCode::ServerError,
            format!("HTTP {} (remote side transient failure)", status),
            Some(status as u16),
        )
    }

    pub fn fetch_failed(detail: &str) -> Self {
        Self::new(ErrorCode::FetchFailed, format!("fetch failed: {}", detail), None)
    }

    pub fn unknown(detail: &str) -> Self {
        Self::new(ErrorCode::Unknown, detail.to_string(), None)
    }

    /// Terminal wrapper produced when all attempts failed with retryable
    /// errors. Carries the last observed cause's message and status.
    pub fn max_retries_exceeded(attempts: u32, last: &ClassifiedError) -> Self {
        Self::new(
            ErrorCode::MaxRetriesExceeded,
            format!("all {} attempts failed; last error: {}", attempts, last.message),
            last.status_code,
        )
    }
}
