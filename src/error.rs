use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for the copilot-customize library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Template file failed validation before processing.
    #[error("Invalid template '{path}': {message}")]
    TemplateValidation {
        /// Path of the offending template
        path: String,
        /// Reason the template was rejected
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Response config file could not be parsed.
    #[error("Invalid responses file '{path}': {message}")]
    InvalidResponses {
        /// Path to the responses JSON file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },

    /// Interactive prompt failed or was aborted.
    #[error("Survey prompt failed: {message}")]
    Prompt {
        /// Error message
        message: String,
    },

    /// System time error.
    #[error("System time error: {message}")]
    SystemTime {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a template validation error.
    #[must_use]
    pub fn template_validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateValidation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid responses file error.
    #[must_use]
    pub fn invalid_responses(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidResponses {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if this is a template validation error.
    #[must_use]
    pub const fn is_template_validation(&self) -> bool {
        matches!(self, Self::TemplateValidation { .. })
    }
}

// Conversion implementations for convenient error handling
impl From<std::time::SystemTimeError> for Error {
    fn from(e: std::time::SystemTimeError) -> Self {
        Self::SystemTime {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Self::Prompt {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::config("test message");
        assert!(err.is_config());
        assert!(err.to_string().contains("test message"));
    }

    #[test]
    fn test_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("/tmp/test.txt", io_err);
        assert!(err.is_io());
        assert!(err.to_string().contains("/tmp/test.txt"));
    }

    #[test]
    fn test_template_validation_error() {
        let err = Error::template_validation("templates/python.md", "empty file");
        assert!(err.is_template_validation());
        assert!(err.to_string().contains("templates/python.md"));
        assert!(err.to_string().contains("empty file"));
    }

    #[test]
    fn test_error_clone() {
        let err = Error::config("test");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_serialization_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_invalid_responses_error() {
        let err = Error::invalid_responses("/tmp/config.json", "expected a JSON object");
        assert!(err.to_string().contains("config.json"));
        assert!(err.to_string().contains("JSON object"));
    }
}
