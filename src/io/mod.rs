//! Filesystem checks performed before any tool is invoked.

use crate::error::{Result, XcTestError};
use std::path::Path;
use tracing::{debug, warn};

/// Confirm that `path` names an existing file that is not a directory.
///
/// Symlinks are followed, so a link to a test binary is accepted.
pub fn validate_binary<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if !path.exists() {
        warn!(path = %path.display(), "Test binary does not exist");
        return Err(XcTestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_dir() {
        warn!(path = %path.display(), "Test binary path is a directory");
        return Err(XcTestError::InvalidTarget {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "Validated test binary");
    Ok(())
}
