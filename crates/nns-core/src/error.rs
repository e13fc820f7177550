//! Error types shared by every layer of the name service.

use thiserror::Error;

/// Errors that can occur while encoding, querying or resolving a name.
///
/// A name or address that simply has no record is **not** an error: the
/// resolution APIs return `Ok(None)` for that case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NnsError {
    /// The input name is malformed (wrong suffix, empty label, ...).
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The input is not a usable address literal.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// The endpoint could not be reached (connect error, non-2xx, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a JSON-RPC error object.
    #[error("Remote error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The response does not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Config error: {0}")]
    Config(String),
}

impl NnsError {
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse(reason.into())
    }

    /// Returns `true` if retrying the same request might succeed.
    ///
    /// The resolver swallows these on intermediate fallback steps.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Remote { .. })
    }
}

pub type Result<T> = std::result::Result<T, NnsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(NnsError::Transport("connection refused".into()).is_transient());
        assert!(NnsError::Remote {
            code: -32000,
            message: "execution reverted".into()
        }
        .is_transient());
        assert!(!NnsError::malformed("odd hex length").is_transient());
        assert!(!NnsError::invalid_name("", "empty").is_transient());
    }

    #[test]
    fn display_includes_remote_message() {
        let err = NnsError::Remote {
            code: -32000,
            message: "execution reverted".into(),
        };
        assert_eq!(err.to_string(), "Remote error -32000: execution reverted");
    }
}
