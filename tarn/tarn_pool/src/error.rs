//! Error types for pool construction.
//!
//! Pool operations themselves (`get`, `put`, `close`, `wait`) are total;
//! only building a pool can fail.

use thiserror::Error;

/// Error returned when a pool cannot be constructed
#[derive(Error, Debug)]
pub enum PoolError {
    /// The configuration was rejected by [`PoolConfig::validate`](crate::PoolConfig::validate)
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for pool construction
pub type Result<T> = std::result::Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoolError::InvalidConfig("thread_name_prefix must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid pool configuration: thread_name_prefix must not be empty"
        );
    }
}
