//! Configuration for external tool invocation.
//!
//! The defaults reproduce the stock Xcode toolchain invocation; every tool
//! name can be overridden, e.g. to point at a specific `nm` or to run the
//! demangler without `xcrun`.

use crate::error::{Result, XcTestError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Tool names and invocation limits used by the production symbol source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Shell used to run each command line (`<shell> -c <command>`).
    pub shell: String,
    /// Symbol-table listing tool.
    pub nm: String,
    /// Swift name demangler, fed mangled names as arguments.
    pub demangler: String,
    /// OS configuration query tool used to read ARG_MAX.
    pub getconf: String,
    /// Argument batching tool.
    pub xargs: String,
    /// Per-command timeout; `None` waits indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            shell: "/bin/bash".to_string(),
            nm: "nm".to_string(),
            demangler: "xcrun swift-demangle".to_string(),
            getconf: "getconf".to_string(),
            xargs: "xargs".to_string(),
            timeout_seconds: None,
        }
    }
}

impl ParserConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: ParserConfig = serde_json::from_str(&text)
            .map_err(|e| XcTestError::Serialization(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), ?config, "Loaded parser configuration");
        Ok(config)
    }

    /// Builder-style override of the per-command timeout.
    pub fn with_timeout(mut self, seconds: Option<u64>) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}
