//! Error types for the live-timing codec and state builder.
//!
//! Every fallible operation in the crate returns [`TimingError`]. Variants carry
//! structured context so a caller can log the failure and decide whether to abort.
//!
//! ## Error Categories
//!
//! - **Schema Errors**: registry misconfiguration detected at startup (fatal)
//! - **Decode Errors**: unknown type tags, truncated input, invalid type codes
//! - **Encode Errors**: cyclic graphs and values with no registered shape
//! - **Domain Errors**: out-of-range message or value construction arguments
//! - **Builder Errors**: operational preconditions such as replacing into an empty series
//! - **File and Config Errors**: recording files and playback configuration
//!
//! ## Fatal Errors
//!
//! Schema errors indicate a programming mistake in the registered catalogue and
//! should abort startup:
//!
//! ```rust
//! use livetiming::TimingError;
//!
//! let error = TimingError::DuplicateTypeTag { tag: 14, existing: "A", attempted: "B" };
//! assert!(error.is_fatal());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```
//!
//! ## Helper Constructors
//!
//! ```rust
//! use livetiming::TimingError;
//!
//! let domain = TimingError::domain("sector_number", "must be between 1 and 3, was 4");
//! let config = TimingError::config("speed must be positive");
//! assert!(!domain.is_fatal());
//! assert!(config.to_string().contains("speed"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::GridColumn;

/// Result type alias for live-timing operations.
pub type Result<T, E = TimingError> = std::result::Result<T, E>;

/// Main error type for live-timing operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TimingError {
    #[error("Type tag {tag} is already registered to {existing}, cannot register {attempted}")]
    DuplicateTypeTag { tag: i32, existing: &'static str, attempted: &'static str },

    #[error("Field tag {field_tag} is declared more than once on {type_name}")]
    DuplicateFieldTag { type_name: &'static str, field_tag: u8 },

    #[error("Field '{field}' on {type_name} has no {accessor} accessor")]
    MissingAccessor { type_name: &'static str, field: &'static str, accessor: &'static str },

    #[error("Schema error for {type_name}: {reason}")]
    Schema { type_name: &'static str, reason: String },

    #[error("Unknown type tag {tag}")]
    UnknownTypeTag { tag: i32 },

    #[error("No shape registered for {type_name}")]
    UnregisteredType { type_name: String },

    #[error("Unexpected end of stream while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("Invalid type code {code} while reading {context}")]
    InvalidTypeCode { code: u8, context: &'static str },

    #[error("Cyclic object graph detected at {type_name}")]
    CyclicGraph { type_name: &'static str },

    #[error("Objects nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("Cannot set field {field_tag} on {type_name}: {details}")]
    Field { type_name: &'static str, field_tag: u8, details: String },

    #[error("Invalid {field}: {reason}")]
    Domain { field: &'static str, reason: String },

    #[error("Cannot {operation} an empty series")]
    EmptySeries { operation: &'static str },

    #[error("{column:?} is not a column of the {grid} grid")]
    UnsupportedColumn { column: GridColumn, grid: &'static str },

    #[error("Recording file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {details}")]
    Config { details: String },
}

impl TimingError {
    /// Returns whether this error indicates a broken schema that should abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TimingError::DuplicateTypeTag { .. }
                | TimingError::DuplicateFieldTag { .. }
                | TimingError::MissingAccessor { .. }
                | TimingError::Schema { .. }
        )
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TimingError::DuplicateTypeTag { .. } | TimingError::DuplicateFieldTag { .. } => vec![
                "Assign a unique tag to each registered type and field",
                "Check for copy-pasted record declarations",
            ],
            TimingError::MissingAccessor { .. } | TimingError::Schema { .. } => vec![
                "Declare both a getter and a setter for every field",
                "Keep field counts within the single-byte limit",
            ],
            TimingError::UnknownTypeTag { .. } | TimingError::UnregisteredType { .. } => vec![
                "Register the type before encoding or decoding it",
                "Check the recording was produced by a compatible version",
            ],
            TimingError::UnexpectedEof { .. } => vec![
                "Check the recording was finalised with an end sentinel",
                "Verify the file was not truncated during copy",
            ],
            TimingError::InvalidTypeCode { .. }
            | TimingError::TypeMismatch { .. }
            | TimingError::Field { .. } => vec![
                "Verify source data integrity",
                "Check the stream is positioned at a value boundary",
            ],
            TimingError::CyclicGraph { .. } => vec![
                "Break reference cycles before encoding",
                "Encode shared nodes in separate calls",
            ],
            TimingError::NestingTooDeep { .. } => vec![
                "Verify source data integrity",
                "Flatten deeply nested records before encoding",
            ],
            TimingError::Domain { .. } => vec![
                "Validate feed values before constructing messages",
                "Check the upstream decoder for corrupted fields",
            ],
            TimingError::EmptySeries { .. } | TimingError::UnsupportedColumn { .. } => vec![
                "Check the upstream message ordering",
                "Ensure the session type was set before grid updates",
            ],
            TimingError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
                "Ensure sufficient disk space",
            ],
            TimingError::Config { .. } => vec![
                "Check configuration values are within range",
                "Verify the YAML document structure",
            ],
        }
    }

    /// Helper constructor for domain validation errors.
    pub fn domain(field: &'static str, reason: impl Into<String>) -> Self {
        TimingError::Domain { field, reason: reason.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TimingError::File { path, source }
    }

    /// Helper constructor for configuration errors.
    pub fn config(details: impl Into<String>) -> Self {
        TimingError::Config { details: details.into() }
    }

    /// Helper constructor for type mismatches during field conversion.
    pub fn type_mismatch(expected: &'static str, found: impl Into<String>) -> Self {
        TimingError::TypeMismatch { expected, found: found.into() }
    }
}

impl From<std::io::Error> for TimingError {
    fn from(err: std::io::Error) -> Self {
        TimingError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}
