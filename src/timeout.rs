//! Timeout utilities for external tool invocations.
//!
//! A hung `nm` or demangler would otherwise stall extraction forever, so
//! callers may opt into a bound on each command.

use crate::error::{Result, XcTestError};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error};

/// Timeout configuration for a single command
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Maximum duration for the operation
    pub duration: Duration,
    /// Operation name for logging
    pub operation_name: String,
}

impl TimeoutConfig {
    /// Create a new timeout configuration
    pub fn new(seconds: u64, operation: impl Into<String>) -> Self {
        Self {
            duration: Duration::from_secs(seconds),
            operation_name: operation.into(),
        }
    }
}

/// Execute an async operation with a timeout.
///
/// The future is dropped when the deadline passes, which for a child process
/// spawned with `kill_on_drop` terminates it.
pub async fn with_timeout<T, F>(config: TimeoutConfig, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!(
        "Starting '{}' with timeout of {}s",
        config.operation_name,
        config.duration.as_secs()
    );

    match timeout(config.duration, future).await {
        Ok(result) => result,
        Err(_) => {
            error!(
                "'{}' timed out after {}s",
                config.operation_name,
                config.duration.as_secs()
            );

            Err(XcTestError::Timeout {
                seconds: config.duration.as_secs(),
            })
        }
    }
}
