//! Error types for the RenderCV data model
//!
//! Validation problems are collected in [`ValidationErrors`] and never
//! abort early. [`ModelError`] covers the input boundary, where there is
//! no partial document to validate and failing fast is the only option.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Main error type for loading and validating a document
#[derive(Error, Debug)]
pub enum ModelError {
    /// Input file does not exist
    #[error("Input file not found: {0}")]
    FileNotFound(String),

    /// Input file has an extension the loader does not understand
    #[error("Unsupported input file extension '{0}'; expected one of yaml, yml, json")]
    UnsupportedExtension(String),

    /// Failed to load the input document
    #[error("Failed to load input: {0}")]
    LoadError(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document was decoded but did not validate
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}

impl ModelError {
    /// Validation errors carried by this error, if any.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ModelError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::FileNotFound("cv.yaml".to_string());
        assert_eq!(err.to_string(), "Input file not found: cv.yaml");
    }

    #[test]
    fn test_unsupported_extension_display() {
        let err = ModelError::UnsupportedExtension("txt".to_string());
        assert!(err.to_string().contains("'txt'"));
        assert!(err.validation_errors().is_none());
    }
}
