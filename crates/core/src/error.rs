//! Unified error types for fetchcache.
//!
//! Collaborator failures pass through unchanged: no retry, no fallback,
//! no new error kinds beyond classifying the failure source.

/// Unified error types for fetchcache.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level fetch failure (DNS, connect, timeout, malformed URL).
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Non-success HTTP status from the fetched host.
    #[error("HTTP_STATUS: status {0}")]
    HttpStatus(u16),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Key-value store unreachable or a command failed.
    #[error("STORE_ERROR: {0}")]
    Store(String),

    /// Stored value exists but is malformed (e.g. non-integer counter).
    #[error("STORE_VALUE: {0}")]
    StoreValue(String),
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(err.to_string())
    }
}
