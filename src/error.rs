//! Error types for test-method extraction.
//!
//! Every failure is fatal to the extraction call that raised it; lines of
//! tool output that do not match a pattern are never reported here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for xctest-parser operations.
#[derive(Debug, Error)]
pub enum XcTestError {
    /// Nothing exists at the given path
    #[error("File {} does not exist!", path.display())]
    FileNotFound { path: PathBuf },

    /// The path exists but cannot be a test binary
    #[error("{} is a directory!", path.display())]
    InvalidTarget { path: PathBuf },

    /// External tool exited unsuccessfully
    #[error("Command failed ({status}): {command}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// External tool succeeded but printed something we cannot interpret
    #[error("Unexpected output from `{command}`: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    /// Command timeout
    #[error("Command timeout after {seconds}s")]
    Timeout { seconds: u64 },

    /// Configuration deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Spawn and runtime failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl XcTestError {
    /// The command line that caused this error, when one was involved.
    pub fn command(&self) -> Option<&str> {
        match self {
            XcTestError::CommandFailed { command, .. }
            | XcTestError::UnexpectedOutput { command, .. } => Some(command),
            _ => None,
        }
    }
}

/// Result type alias for xctest-parser operations
pub type Result<T> = std::result::Result<T, XcTestError>;
