//! Record sources that feed plates into the index.
//!
//! The registry of plates (a relational table in production) is the
//! source of truth; the index is derived from it and rebuilt on demand.
//! This module only defines the seam and two simple providers.
//!
//! # Providers
//!
//! - [`StaticSource`] - an in-memory list, for tests and embedded callers
//! - [`LineFileSource`] - a newline-delimited export of the registry
//!
//! # Implementing a Custom Source
//!
//! ```rust,ignore
//! use platematch::{PlateMatchError, RecordSource, Result};
//!
//! struct TruckRegistry {
//!     pool: DbPool,
//! }
//!
//! impl RecordSource for TruckRegistry {
//!     fn load_plates(&self) -> Result<Vec<String>> {
//!         self.pool
//!             .query("SELECT plate_number FROM trucks")
//!             .map_err(|e| PlateMatchError::source(e.to_string()))
//!     }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Source of reference plates for building the index.
///
/// Implementations must be thread-safe (`Send + Sync`) so a rebuild can be
/// triggered from any thread.
pub trait RecordSource: Send + Sync {
    /// Loads every reference plate, in any order.
    ///
    /// # Errors
    ///
    /// Returns `PlateMatchError::Source` or `PlateMatchError::Io` when the
    /// backing store cannot be read.
    fn load_plates(&self) -> Result<Vec<String>>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn load_plates(&self) -> Result<Vec<String>> {
        (**self).load_plates()
    }
}

/// In-memory plate list.
///
/// # Example
///
/// ```rust
/// use platematch::{RecordSource, StaticSource};
///
/// let source = StaticSource::new(["ABC123", "XYZ789"]);
/// assert_eq!(source.load_plates().unwrap().len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    plates: Vec<String>,
}

impl StaticSource {
    /// Creates a source yielding `plates`.
    pub fn new<I, S>(plates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            plates: plates.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of plates this source yields.
    pub fn len(&self) -> usize {
        self.plates.len()
    }

    /// Returns true if the source yields no plates.
    pub fn is_empty(&self) -> bool {
        self.plates.is_empty()
    }
}

impl RecordSource for StaticSource {
    fn load_plates(&self) -> Result<Vec<String>> {
        Ok(self.plates.clone())
    }
}

/// Newline-delimited plate file.
///
/// One plate per line. Surrounding whitespace is trimmed and blank lines
/// are skipped. The file is re-read on every load, so a rebuild picks up
/// a fresh export.
#[derive(Clone, Debug)]
pub struct LineFileSource {
    path: PathBuf,
}

impl LineFileSource {
    /// Creates a source reading from `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for LineFileSource {
    fn load_plates(&self) -> Result<Vec<String>> {
        let contents = fs::read_to_string(&self.path)?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }
}
