/// Core error types for Ember Player
use thiserror::Error;

/// Result type alias using `EmberError`
pub type Result<T> = std::result::Result<T, EmberError>;

/// Core error type for Ember Player
///
/// The fallible surface of the core is format validation; control
/// operations that can be refused for other reasons (unknown preset
/// index, chain not initialized) report through their return values
/// instead of an error channel.
#[derive(Error, Debug)]
pub enum EmberError {
    /// Audio format rejected by validation
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),
}

impl EmberError {
    /// Create an invalid-format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_format_display() {
        let err = EmberError::invalid_format("7 channels");
        assert_eq!(err.to_string(), "Invalid audio format: 7 channels");
    }
}
