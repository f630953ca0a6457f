//! Error types for PlateMatch.
//!
//! PlateMatch uses a small hierarchical error system:
//! - `PlateMatchError` is the top-level error returned by fallible public APIs
//! - `ValidationError` describes bad caller input at the request boundary
//!
//! The tree and the distance function themselves never fail. Errors only
//! come from loading records, validating configuration, or validating
//! caller-supplied arguments.
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use platematch::{Config, PlateIndex, Result, StaticSource};
//!
//! fn example() -> Result<()> {
//!     let index = PlateIndex::open(&StaticSource::new(["ABC123"]), Config::default())?;
//!     let report = index.lookup("ABCl23", Some(2))?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias for PlateMatch operations.
pub type Result<T> = std::result::Result<T, PlateMatchError>;

/// Top-level error enum for all PlateMatch operations.
#[derive(Debug, Error)]
pub enum PlateMatchError {
    /// Input validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of what's wrong with the configuration.
        reason: String,
    },

    /// The record source failed to produce plates.
    #[error("Record source error: {0}")]
    Source(String),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Index ownership error (publishing or swapping snapshots).
    #[error("Index error: {0}")]
    Index(String),
}

impl PlateMatchError {
    /// Creates a configuration error with the given reason.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Creates a record source error with the given message.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Creates an index error with the given message.
    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    /// Returns true if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a record source error.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source(_) | Self::Io(_))
    }

    /// Returns true if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

/// Validation errors for caller input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A negative edit distance was supplied.
    #[error("Invalid max distance {value}: must not be negative")]
    NegativeDistance {
        /// The rejected value.
        value: i64,
    },

    /// The edit distance exceeds the configured ceiling.
    #[error("Max distance {value} exceeds limit {max}")]
    DistanceTooLarge {
        /// The rejected value.
        value: i64,
        /// Configured ceiling.
        max: usize,
    },

    /// A field has an invalid value.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the invalid field.
        field: String,
        /// Why the value is invalid.
        reason: String,
    },
}

impl ValidationError {
    /// Creates a negative distance error.
    pub fn negative_distance(value: i64) -> Self {
        Self::NegativeDistance { value }
    }

    /// Creates a distance-too-large error.
    pub fn distance_too_large(value: i64, max: usize) -> Self {
        Self::DistanceTooLarge { value, max }
    }

    /// Creates an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Converts a caller-supplied signed distance into a tree bound.
///
/// Negative values are a programming error at the call site and are
/// rejected; values above `limit` are rejected as well.
///
/// # Example
/// ```rust
/// use platematch::{validate_max_distance, ValidationError};
///
/// assert_eq!(validate_max_distance(2, 8), Ok(2));
/// assert_eq!(
///     validate_max_distance(-1, 8),
///     Err(ValidationError::NegativeDistance { value: -1 })
/// );
/// ```
pub fn validate_max_distance(
    value: i64,
    limit: usize,
) -> std::result::Result<usize, ValidationError> {
    if value < 0 {
        return Err(ValidationError::negative_distance(value));
    }
    match usize::try_from(value) {
        Ok(v) if v <= limit => Ok(v),
        _ => Err(ValidationError::distance_too_large(value, limit)),
    }
}
