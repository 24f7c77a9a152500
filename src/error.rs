//! Error types for the session layer.

/// Errors returned by the session layer.
///
/// Lookups that find nothing (unknown URL, out-of-range stream index) are
/// not errors: they return `None`. These variants signal misuse by the
/// caller:
///
/// - **Session**: [`InvalidSessionId`](Self::InvalidSessionId).
/// - **Playback**: [`TransportNotConfigured`](Self::TransportNotConfigured).
/// - **Locator**: [`InvalidUrl`](Self::InvalidUrl).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A session was created with an empty identifier.
    #[error("session id must not be empty")]
    InvalidSessionId,

    /// PLAY was requested while a stream had no negotiated client transport.
    #[error("transport not configured for stream {index} of {url}")]
    TransportNotConfigured { url: String, index: usize },

    /// A media locator could not be parsed. Holds the reason, never the
    /// input, which may carry credentials.
    #[error("invalid media url: {0}")]
    InvalidUrl(String),
}

/// Convenience alias for `Result<T, SessionError>`.
pub type Result<T> = std::result::Result<T, SessionError>;
