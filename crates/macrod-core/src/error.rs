//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Lifecycle Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Service start failed: {message}")]
    StartFailed { message: String },

    #[error("Engine error: {message}")]
    Engine { message: String },

    #[error("Presenter error: {message}")]
    Presenter { message: String },

    // ─────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Durable write failed: {message}")]
    Storage { message: String },

    #[error("Another instance already holds the lock: {path}")]
    AlreadyRunning { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Channel/Protocol Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Unsupported command: {method}")]
    UnsupportedCommand { method: String },

    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,

    // ─────────────────────────────────────────────────────────────
    // Environment Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn start_failed(message: impl Into<String>) -> Self {
        Self::StartFailed {
            message: message.into(),
        }
    }

    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine {
            message: message.into(),
        }
    }

    pub fn presenter(message: impl Into<String>) -> Self {
        Self::Presenter {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn unsupported_command(method: impl Into<String>) -> Self {
        Self::UnsupportedCommand {
            method: method.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn already_running(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyRunning { path: path.into() }
    }

    /// A short machine-readable code for structured error replies
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "IO",
            Error::Json(_) => "JSON",
            Error::StartFailed { .. } => "START_FAILED",
            Error::Engine { .. } => "ENGINE",
            Error::Presenter { .. } => "PRESENTER",
            Error::Storage { .. } => "STORAGE",
            Error::AlreadyRunning { .. } => "ALREADY_RUNNING",
            Error::UnsupportedCommand { .. } => "UNSUPPORTED",
            Error::ChannelSend { .. } => "CHANNEL_SEND",
            Error::ChannelClosed => "CHANNEL_CLOSED",
            Error::PermissionDenied { .. } => "PERMISSION_DENIED",
            Error::Config { .. } => "CONFIG",
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Every lifecycle-path error is recoverable: the worst outcome is a
    /// stopped service with its intent flag still set, which self-heals on
    /// the next boot or explicit start.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::StartFailed { .. }
                | Error::Engine { .. }
                | Error::Presenter { .. }
                | Error::Storage { .. }
                | Error::UnsupportedCommand { .. }
                | Error::ChannelSend { .. }
                | Error::PermissionDenied { .. }
        )
    }

    /// Check if this error should abort daemon startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::AlreadyRunning { .. } | Error::Config { .. })
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}
