use thiserror::Error;

/// Failures reported by a [`MediaEnvironment`](crate::MediaEnvironment).
///
/// The query engine never propagates these. They are logged. A query whose
/// predicate cannot be evaluated reports no match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// The capability check failed, or the platform declined to build a
    /// query list.
    #[error("media matching is not available in this environment")]
    Unsupported,

    /// The predicate could not be parsed.
    #[error("invalid media query `{query}`: {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("failed to register media listener: {0}")]
    Listener(String),
}

impl MediaError {
    pub(crate) fn invalid(query: &str, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            query: query.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while assembling a [`BreakpointMap`](crate::BreakpointMap).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duplicate breakpoint `{0}`")]
    DuplicateBreakpoint(String),
    #[cfg(feature = "serde")]
    #[error("malformed breakpoint configuration: {0}")]
    Json(#[from] serde_json::Error),
}
