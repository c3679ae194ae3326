pub mod config;
pub mod logging;

pub mod connectivity;
pub mod executor;
pub mod probe;
pub mod retry;

pub use connectivity::ConnectivityMonitor;
pub use executor::Executor;
pub use retry::{Backoff, ClassifiedError, ErrorCode, RequestError, RetryPolicy};
