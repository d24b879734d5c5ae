//! Error types for CampusQL.

use std::fmt;

/// The main error type for CampusQL operations.
#[derive(Debug)]
pub enum Error {
    /// The query document violates the grammar
    Malformed(String),

    /// The query references zero or several dataset ids
    AmbiguousOrMissingDataset(String),

    /// A referenced field does not belong to the dataset's kind
    KindMismatch(String),

    /// An aggregate was applied to a value it cannot handle
    RuntimeType(String),

    /// The target dataset is not registered
    DatasetNotFound(String),

    /// The final result exceeded the configured row cap
    ResultTooLarge {
        /// Rows produced by the query
        rows: usize,
        /// Configured cap
        limit: usize,
    },

    /// A dataset id or payload was rejected by the catalog
    InvalidDataset(String),

    /// I/O error
    Io(std::io::Error),

    /// JSON decoding error
    Serialization(String),

    /// Catalog lock poisoned by a panicking writer
    LockPoisoned,
}

/// Coarse error category reported to callers of the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad query, bad dataset or failed evaluation
    Insight,
    /// Unknown dataset
    NotFound,
    /// Result over the row cap
    ResultTooLarge,
}

impl Error {
    /// Shorthand for [`Error::Malformed`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::Malformed(msg.into())
    }

    /// Returns the category this error is reported under.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::DatasetNotFound(_) => ErrorCategory::NotFound,
            Error::ResultTooLarge { .. } => ErrorCategory::ResultTooLarge,
            _ => ErrorCategory::Insight,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Malformed(msg) => write!(f, "Malformed query: {}", msg),
            Error::AmbiguousOrMissingDataset(msg) => write!(f, "Dataset reference error: {}", msg),
            Error::KindMismatch(msg) => write!(f, "Kind mismatch: {}", msg),
            Error::RuntimeType(msg) => write!(f, "Runtime type error: {}", msg),
            Error::DatasetNotFound(id) => write!(f, "Dataset not found: {}", id),
            Error::ResultTooLarge { rows, limit } => {
                write!(f, "Result too large: {} rows (limit {})", rows, limit)
            }
            Error::InvalidDataset(msg) => write!(f, "Invalid dataset: {}", msg),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::LockPoisoned => write!(f, "Lock poisoned"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for CampusQL operations.
pub type Result<T> = std::result::Result<T, Error>;
