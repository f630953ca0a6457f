//! Configuration types for PlateMatch.
//!
//! The [`Config`] struct controls index behavior including:
//! - Default and maximum edit distance accepted from callers
//! - What happens when the same plate is inserted twice
//! - How plate text is normalized before indexing and querying
//!
//! # Example
//! ```rust
//! use platematch::{Config, Normalization};
//!
//! // Use defaults (distance 2, duplicates skipped, whitespace trimmed)
//! let config = Config::default();
//!
//! // Customize for a noisier OCR pipeline
//! let config = Config {
//!     default_max_distance: 3,
//!     normalization: Normalization::TrimUppercase,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::tree::DuplicatePolicy;

/// Index configuration options.
///
/// All fields have sensible defaults. Use struct update syntax to override
/// specific settings:
///
/// ```rust
/// use platematch::Config;
///
/// let config = Config {
///     max_distance_limit: 4,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Edit distance used when a caller does not supply one.
    ///
    /// Default: 2
    pub default_max_distance: usize,

    /// Largest edit distance accepted from callers at the lookup boundary.
    ///
    /// Large distances degrade search toward a full scan, and on short
    /// plates match nearly everything. Default: 8
    pub max_distance_limit: usize,

    /// Behavior when an inserted plate is already stored.
    pub duplicate_policy: DuplicatePolicy,

    /// Normalization applied to plates at build time and to queries.
    pub normalization: Normalization,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_max_distance: 2,
            max_distance_limit: 8,
            duplicate_policy: DuplicatePolicy::Skip,
            normalization: Normalization::Trim,
        }
    }
}

impl Config {
    /// Creates a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the configuration.
    ///
    /// Called automatically by `PlateIndex::open()` and `PlateIndex::new()`.
    ///
    /// # Errors
    /// Returns `ValidationError` if:
    /// - `max_distance_limit` is 0
    /// - `default_max_distance` exceeds `max_distance_limit`
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_distance_limit == 0 {
            return Err(ValidationError::invalid_field(
                "max_distance_limit",
                "must be greater than 0",
            ));
        }

        if self.default_max_distance > self.max_distance_limit {
            return Err(ValidationError::invalid_field(
                "default_max_distance",
                format!(
                    "must not exceed max_distance_limit ({})",
                    self.max_distance_limit
                ),
            ));
        }

        Ok(())
    }
}

/// Text normalization applied before plates reach the tree.
///
/// The same normalization runs on stored plates and on queries, so the
/// distances reported are between normalized forms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Use text exactly as given.
    Exact,

    /// Strip leading and trailing whitespace (OCR output often carries it).
    #[default]
    Trim,

    /// Strip surrounding whitespace and uppercase ASCII letters.
    TrimUppercase,
}

impl Normalization {
    /// Applies this normalization to `text`.
    ///
    /// # Example
    /// ```rust
    /// use platematch::Normalization;
    ///
    /// assert_eq!(Normalization::Trim.apply("  ABC123\n"), "ABC123");
    /// assert_eq!(Normalization::TrimUppercase.apply(" abc123 "), "ABC123");
    /// assert_eq!(Normalization::Exact.apply(" abc "), " abc ");
    /// ```
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::Exact => Cow::Borrowed(text),
            Self::Trim => Cow::Borrowed(text.trim()),
            Self::TrimUppercase => {
                let trimmed = text.trim();
                if trimmed.bytes().any(|b| b.is_ascii_lowercase()) {
                    Cow::Owned(trimmed.to_ascii_uppercase())
                } else {
                    Cow::Borrowed(trimmed)
                }
            }
        }
    }
}
