use thiserror::Error;

/// Error type for the bigcalc crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Error while classifying or parsing an expression
    #[error("ParseError: {0}")]
    ParseError(String),
    /// Error while evaluating a well-formed expression
    #[error("MathError: {0}")]
    MathError(String),
    /// Invalid settings text
    #[error("ConfigError: {0}")]
    ConfigError(String),
}

impl Error {
    /// Get the bare diagnostic, without the error kind prefix
    pub fn message(&self) -> &str {
        match *self {
            Self::ParseError(ref message)
            | Self::MathError(ref message)
            | Self::ConfigError(ref message) => message,
        }
    }

    pub(crate) fn parse<S: Into<String>>(message: S) -> Self {
        Self::ParseError(message.into())
    }

    pub(crate) fn math<S: Into<String>>(message: S) -> Self {
        Self::MathError(message.into())
    }
}
