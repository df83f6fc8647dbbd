//! Error types for the assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the recoverable command paths
///
/// Failures while interpreting a command (bad expressions, zero leading
/// coefficients, empty captures) never surface here; they are spoken to the
/// user and the session goes on. Anything that reaches this type ends the
/// session.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio device error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Agenda store error
    #[error("agenda error: {0}")]
    Agenda(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_errors_convert() {
        let err: Error = toml::from_str::<toml::Table>("key = ").unwrap_err().into();
        assert!(matches!(err, Error::Toml(_)));
        assert!(err.to_string().starts_with("toml error:"));
    }

    #[test]
    fn test_io_errors_convert() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "agenda.txt").into();
        assert_eq!(err.to_string(), "io error: agenda.txt");
    }
}
