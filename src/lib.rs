//! # PlateMatch
//!
//! Approximate plate-number matching for the vehicle registry pipeline.
//!
//! Detection and OCR upstream produce noisy plate text (`ABCl23` for
//! `ABC123`). PlateMatch answers "which registered plates are within `k`
//! edits of this reading?" using a BK-tree keyed by Levenshtein distance,
//! pruning whole subtrees with the triangle inequality instead of scanning
//! the registry.
//!
//! ## Quick Start
//!
//! ```rust
//! use platematch::{Config, PlateIndex, StaticSource};
//!
//! // Build once from the registry (the source of truth)
//! let registry = StaticSource::new(["ABC123", "XYZ789", "DEF456"]);
//! let index = PlateIndex::open(&registry, Config::default())?;
//!
//! // Look up an OCR reading
//! let report = index.lookup("ABCl23", Some(2))?;
//! assert!(report.is_registered());
//! assert_eq!(report.matches[0].term, "ABC123");
//!
//! // Refresh after the registry changes; readers are never blocked
//! index.rebuild(&registry)?;
//! # Ok::<(), platematch::PlateMatchError>(())
//! ```
//!
//! ## Key Concepts
//!
//! ### Metric
//!
//! The tree is keyed by any [`Metric`]; [`Levenshtein`] is the default.
//! Pruning is only correct for true metrics (triangle inequality).
//!
//! ### Snapshot
//!
//! A [`PlateIndex`] publishes immutable [`IndexSnapshot`]s. A rebuild
//! builds a new tree privately and swaps it in with one atomic store.
//!
//! ### Record Source
//!
//! A [`RecordSource`] yields the reference plates. The registry itself
//! (database, export file) lives outside this crate.
//!
//! ## Thread Safety
//!
//! `PlateIndex` is `Send + Sync` and can be shared across threads using
//! `Arc`. Searches take no locks.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod distance;
mod error;
mod index;
mod report;
mod source;
mod tree;

pub mod accuracy;

// ============================================================================
// Public API re-exports
// ============================================================================

// Published index
pub use index::{BuildStats, IndexSnapshot, PlateIndex};

// Configuration
pub use config::{Config, Normalization};

// Error handling
pub use error::{validate_max_distance, PlateMatchError, Result, ValidationError};

// Metric and tree
pub use distance::{levenshtein, Levenshtein, Metric};
pub use tree::{BkTree, DuplicatePolicy, Match, SearchStats};

// Record sources
pub use source::{LineFileSource, RecordSource, StaticSource};

// Reports
pub use accuracy::{evaluate, AccuracyCase, AccuracyReport, CaseOutcome};
pub use report::{PlateReport, PlateStatus};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common PlateMatch usage.
///
/// ```rust
/// use platematch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{PlateMatchError, Result};
    pub use crate::index::PlateIndex;
    pub use crate::report::{PlateReport, PlateStatus};
    pub use crate::source::{RecordSource, StaticSource};
    pub use crate::tree::{BkTree, Match};
}
