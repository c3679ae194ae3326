//! Classify HTTP statuses and curl errors into retryable/terminal categories.

use super::error::{ClassifiedError, RequestError};

/// Classify an HTTP status code.
///
/// 4xx means the request itself is bad and will not succeed unchanged; 5xx is
/// a remote-side transient failure worth re-attempting. Statuses outside both
/// ranges reaching this point are unexpected and treated as terminal.
pub fn classify_http_status(code: u32) -> ClassifiedError {
    match code {
        400..=499 => ClassifiedError::client_error(code),
        500..=599 => ClassifiedError::server_error(code),
        _ => ClassifiedError::unknown(&format!("unexpected HTTP status {}", code)),
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ClassifiedError {
    if e.is_operation_timedout() {
        return ClassifiedError::timeout(&e.to_string());
    }
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return ClassifiedError::invalid_url(&e.to_string());
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ClassifiedError::fetch_failed(&e.to_string());
    }
    ClassifiedError::unknown(&e.to_string())
}

/// Classify a raw attempt failure.
pub fn classify(e: &RequestError) -> ClassifiedError {
    match e {
        RequestError::Curl(ce) => classify_curl_error(ce),
        RequestError::Http(code) => classify_http_status(*code),
        RequestError::Offline => ClassifiedError::offline(),
        RequestError::Other(msg) => ClassifiedError::unknown(msg),
    }
}
