use super::{ErrorCode, FeedError};
use std::path::{Path, PathBuf};

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to FeedError with specific error type
    fn to_input_error(self, path: &Path, message: impl Into<String>) -> Result<T, FeedError>;
    fn to_output_error(self, path: &Path, message: impl Into<String>) -> Result<T, FeedError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_input_error(self, path: &Path, message: impl Into<String>) -> Result<T, FeedError> {
        self.map_err(|e| {
            FeedError::input_with_code(
                ErrorCode::INPUT_READ_FAILED,
                message,
                Some(path.to_path_buf()),
            )
            .with_source(e)
        })
    }

    fn to_output_error(self, path: &Path, message: impl Into<String>) -> Result<T, FeedError> {
        self.map_err(|e| {
            FeedError::output_with_code(
                ErrorCode::OUTPUT_WRITE_FAILED,
                message,
                Some(path.to_path_buf()),
            )
            .with_source(e)
        })
    }
}

/// Helper functions for common error scenarios
pub mod common {
    use super::*;

    /// Create a not found error for configuration
    pub fn config_not_found(path: impl AsRef<Path>) -> FeedError {
        FeedError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
    }

    /// Create an input error for a file that does not exist
    pub fn input_not_found(path: impl AsRef<Path>) -> FeedError {
        FeedError::input_with_code(
            ErrorCode::INPUT_NOT_FOUND,
            "file does not exist",
            Some(path.as_ref().to_path_buf()),
        )
    }

    /// Create an input error for a JSON document that lacks an expected section
    pub fn missing_section(path: Option<PathBuf>, section: &str) -> FeedError {
        FeedError::input_with_code(
            ErrorCode::INPUT_MISSING_SECTION,
            format!("expected '{}' to be an array of objects", section),
            path,
        )
    }

    /// Create a validation error for missing field
    pub fn missing_required_field(field: &str) -> FeedError {
        FeedError::validation_with_code(
            ErrorCode::VALIDATION_REQUIRED_FIELD,
            format!("Required field '{}' is missing", field),
            Some(field.to_string()),
        )
    }
}
