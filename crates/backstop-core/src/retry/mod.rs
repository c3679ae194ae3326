//! Retry policy and error classification.
//!
//! This module encapsulates failure classification (timeouts, client vs.
//! server errors, transport failures) and backoff decisions so that the
//! executor and the diagnostics share a consistent policy.

mod classify;
mod error;
mod policy;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::{ClassifiedError, ErrorCode, RequestError};
pub use policy::{Backoff, RetryDecision, RetryPolicy};
