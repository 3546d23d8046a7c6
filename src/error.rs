//! Error types for tgbrief.
//!
//! Two families of errors exist and they are handled very differently:
//!
//! - [`BriefError`] is fatal. It aborts the run (the CLI exits non-zero).
//!   Structural problems with the input document, unreadable files and
//!   invalid configuration land here.
//! - [`RecordError`] describes a single malformed record. It is never
//!   propagated with `?`; the transformer counts it and drops the record.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for tgbrief operations.
///
/// # Example
///
/// ```rust
/// use tgbrief::error::Result;
/// use tgbrief::RawMessage;
///
/// fn load() -> Result<Vec<RawMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, BriefError>;

/// The fatal error type for all tgbrief operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BriefError {
    /// An I/O error occurred while reading input/config or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON, or the report could not be serialized.
    #[error("JSON error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Json {
        /// The underlying serde_json error
        #[source]
        source: serde_json::Error,
        /// The file being read, if known
        path: Option<PathBuf>,
    },

    /// The input document is not a recognizable sequence of records.
    ///
    /// This is the only input-shaped error that aborts a run: a top-level
    /// scalar, an object without a digest, a digest that is not text.
    #[error("Invalid {format} structure: {message}")]
    InvalidFormat {
        /// What the input was expected to be
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// The transform configuration is unusable.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the offending setting
        message: String,
    },

    /// A configured promotional pattern is not a valid regular expression.
    #[error("Invalid promo pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as written in the configuration
        pattern: String,
        /// The regex compilation error
        #[source]
        source: regex::Error,
    },
}

impl From<serde_json::Error> for BriefError {
    fn from(source: serde_json::Error) -> Self {
        BriefError::Json { source, path: None }
    }
}

impl BriefError {
    /// Creates a JSON error tied to a file path.
    pub fn json_in(source: serde_json::Error, path: impl Into<PathBuf>) -> Self {
        BriefError::Json {
            source,
            path: Some(path.into()),
        }
    }

    /// Creates a structural (invalid format) error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        BriefError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        BriefError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, BriefError::Io(_))
    }

    /// Returns `true` if the input document itself was unusable.
    ///
    /// Malformed JSON counts as structural alongside [`BriefError::InvalidFormat`].
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            BriefError::InvalidFormat { .. } | BriefError::Json { .. }
        )
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            BriefError::InvalidConfig { .. } | BriefError::Pattern { .. }
        )
    }
}

/// A problem with a single input record.
///
/// The `index` is the zero-based position of the record in the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The array element is not a JSON object.
    #[error("record {index}: expected an object")]
    NotAnObject { index: usize },

    /// A required field is absent or null.
    #[error("record {index}: missing field '{field}'")]
    MissingField { index: usize, field: String },

    /// A field is present but has the wrong JSON type.
    #[error("record {index}: field '{field}' must be {expected}")]
    WrongType {
        index: usize,
        field: String,
        expected: &'static str,
    },
}

impl RecordError {
    /// Position of the offending record in the input.
    pub fn index(&self) -> usize {
        match self {
            RecordError::NotAnObject { index }
            | RecordError::MissingField { index, .. }
            | RecordError::WrongType { index, .. } => *index,
        }
    }
}
