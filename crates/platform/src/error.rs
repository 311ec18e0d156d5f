//! Error types for vkprep-platform

use thiserror::Error;

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Unknown shell: {0}")]
    UnknownShell(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
