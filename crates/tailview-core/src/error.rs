//! Application error types with rich context

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
    // Pattern Errors (filter + highlight rules)
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Transport Frame Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Event protocol error: {message}")]
    Protocol { message: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────
    // Host Errors (storage, rendering surface)
    // ─────────────────────────────────────────────────────────────
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Rendering surface error: {message}")]
    Surface { message: String },

    #[error("Invalid URL: {0}")]
    Url(String),
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    pub fn url(message: impl Into<String>) -> Self {
        Self::Url(message.into())
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors only fail the event that raised them; the engine
    /// keeps processing the next message.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidPattern { .. }
                | Error::Protocol { .. }
                | Error::Json(_)
                | Error::Storage { .. }
                | Error::Surface { .. }
                | Error::Url(_)
        )
    }

    /// Check if this error should end the session
    ///
    /// A misconfigured host (for example a timer with nowhere to deliver
    /// its message) cannot be fixed by later events.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config { .. })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::invalid_pattern("(", "unclosed group");
        assert_eq!(err.to_string(), "Invalid pattern '(': unclosed group");

        let err = Error::protocol("frame is not an array");
        assert!(err.to_string().contains("frame is not an array"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::config("timer channel missing").is_fatal());
        assert!(!Error::protocol("test").is_fatal());
        assert!(!Error::surface("no line").is_fatal());

        // Neither recoverable nor fatal: logged as an error, session continues
        let io: Error = std::io::Error::new(std::io::ErrorKind::Other, "x").into();
        assert!(!io.is_fatal());
        assert!(!io.is_recoverable());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::invalid_pattern("[", "x").is_recoverable());
        assert!(Error::protocol("parse error").is_recoverable());
        assert!(Error::storage("quota exceeded").is_recoverable());
        assert!(!Error::config("test").is_recoverable());
    }

    #[test]
    fn test_result_ext_preserves_error() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("reading theme").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
