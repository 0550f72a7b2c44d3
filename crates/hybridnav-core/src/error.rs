//! Error types with navigation-domain classification

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types organized by layer/domain
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
    // Location Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid location URL: {url}")]
    InvalidLocation { url: String },

    // ─────────────────────────────────────────────────────────────
    // Path Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Path configuration error: {message}")]
    Configuration { message: String },

    #[error("Malformed path pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("Missing required 'uri' property for location: {location}")]
    MissingUri { location: String },

    #[error("A modal-context location cannot use the replace_root presentation: {location}")]
    ModalReplaceRoot { location: String },

    // ─────────────────────────────────────────────────────────────
    // Navigation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No destination registered for URI: {uri}")]
    NoDestination { uri: String },

    #[error("Back stack is empty")]
    EmptyBackStack,

    // ─────────────────────────────────────────────────────────────
    // Bridge/Session Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Bridge protocol error: {message}")]
    Protocol { message: String },

    #[error("Bridge failed to load")]
    BridgeFailedToLoad,

    #[error("Visit request failed with status code: {status_code}")]
    RequestFailed { status_code: i32 },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel send error: {message}")]
    ChannelSend { message: String },

    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn invalid_location(url: impl Into<String>) -> Self {
        Self::InvalidLocation { url: url.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn malformed_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_uri(location: impl Into<String>) -> Self {
        Self::MissingUri {
            location: location.into(),
        }
    }

    pub fn modal_replace_root(location: impl Into<String>) -> Self {
        Self::ModalReplaceRoot {
            location: location.into(),
        }
    }

    pub fn no_destination(uri: impl Into<String>) -> Self {
        Self::NoDestination { uri: uri.into() }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn channel_send(message: impl Into<String>) -> Self {
        Self::ChannelSend {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Recoverable errors leave the session usable: the next visit or
    /// navigation attempt may succeed without any reconfiguration.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Protocol { .. }
                | Error::BridgeFailedToLoad
                | Error::RequestFailed { .. }
                | Error::NoDestination { .. }
                | Error::ChannelSend { .. }
        )
    }

    /// Check if this is a configuration authoring mistake.
    ///
    /// These are raised eagerly in debug builds and degraded to logged
    /// warnings in release builds.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::Configuration { .. }
                | Error::MalformedPattern { .. }
                | Error::MissingUri { .. }
                | Error::ModalReplaceRoot { .. }
        )
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
