/*
 * Error type shared by every fallible operation in the crate. Native resource
 * failures are fatal for the calling panel and are never retried; an absent
 * listener is not an error and never shows up here.
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// A native resource (window, timer) could not be created.
    #[error("initialization failed: {0}")]
    InitializationFailed(String),
    /// A handle was used after destruction or was never valid.
    #[error("invalid handle: {0}")]
    InvalidHandle(String),
    /// Neither the window's nor the default display context could be queried.
    #[error("display context unavailable: {0}")]
    DisplayUnavailable(String),
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(err: windows::core::Error) -> Self {
        PlatformError::OperationFailed(format!("Win32 call failed: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
