use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;
pub mod helpers;

pub use codes::{describe_error_code, ErrorCode};
pub use helpers::{common, ErrorExt};

/// The unified error type for the order feed pipeline
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Input error: {message}")]
    Input {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Output error: {message}")]
    Output {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Integrity violation in stage '{stage}': {message}")]
    Integrity {
        code: u16,
        message: String,
        stage: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FeedError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create an input error with default code
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            code: ErrorCode::INPUT_GENERIC,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create an input error with specific code and path
    pub fn input_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an output error with default code
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            code: ErrorCode::OUTPUT_GENERIC,
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create an output error with specific code and path
    pub fn output_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Output {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create an integrity violation for the named stage
    pub fn integrity(code: u16, stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Integrity {
            code,
            message: message.into(),
            stage: stage.into(),
            source: None,
        }
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Input { source: src, .. }
            | Self::Output { source: src, .. }
            | Self::Integrity { source: src, .. }
            | Self::Validation { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Input { message, .. }
            | Self::Output { message, .. }
            | Self::Integrity { message, .. }
            | Self::Validation { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Attach a file path to input and output errors
    pub fn with_path(mut self, new_path: impl Into<PathBuf>) -> Self {
        if let Self::Input { path, .. } | Self::Output { path, .. } = &mut self {
            *path = Some(new_path.into());
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Input { .. } => 3,
            Self::Output { .. } => 4,
            Self::Integrity { .. } => 5,
            Self::Validation { .. } => 8,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Input { code, .. }
            | Self::Output { code, .. }
            | Self::Integrity { code, .. }
            | Self::Validation { code, .. } => *code,
        }
    }

    /// Stage that raised an integrity violation, if any
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::Integrity { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::Input { message, path, .. } => {
                if let Some(p) = path {
                    format!("Could not read {}: {}", p.display(), message)
                } else {
                    format!("Input error: {}", message)
                }
            }
            Self::Output { message, path, .. } => {
                if let Some(p) = path {
                    format!("Could not write {}: {}", p.display(), message)
                } else {
                    format!("Output error: {}", message)
                }
            }
            Self::Integrity { message, stage, .. } => {
                format!("Stage '{}' failed an integrity check: {}", stage, message)
            }
            Self::Validation { message, field, .. } => {
                if let Some(f) = field {
                    format!("Validation error for '{}': {}", f, message)
                } else {
                    format!("Validation error: {}", message)
                }
            }
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        let mut msg = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            msg.push_str(&format!("\n  caused by: {}", cause));
            current = cause.source();
        }
        msg
    }
}

/// Type alias for Results using FeedError
pub type Result<T> = std::result::Result<T, FeedError>;


impl From<std::io::Error> for FeedError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let (code, message) = match err.kind() {
            ErrorKind::NotFound => (ErrorCode::INPUT_NOT_FOUND, "File or directory not found"),
            ErrorKind::PermissionDenied => {
                (ErrorCode::OUTPUT_PERMISSION_DENIED, "Permission denied")
            }
            _ => (ErrorCode::INPUT_READ_FAILED, "IO operation failed"),
        };

        FeedError::input_with_code(code, message, None).with_source(err)
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::input_with_code(ErrorCode::INPUT_INVALID_JSON, "Invalid JSON syntax", None)
            .with_source(err)
    }
}

impl From<csv::Error> for FeedError {
    fn from(err: csv::Error) -> Self {
        FeedError::input_with_code(ErrorCode::INPUT_INVALID_CSV, "Invalid CSV data", None)
            .with_source(err)
    }
}
