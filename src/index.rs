//! Published plate index and its rebuild lifecycle.
//!
//! The [`PlateIndex`] owns the current [`IndexSnapshot`] behind an
//! [`ArcSwap`]. Readers load the snapshot without locking and query an
//! immutable tree. A rebuild constructs a fresh tree off to the side from
//! the [`RecordSource`] and publishes it with one atomic pointer store, so
//! no reader ever observes a tree mid-construction.
//!
//! ```text
//!   RecordSource ──load──▶ BkTree (private) ──store──▶ ArcSwap<IndexSnapshot>
//!                                                          │ load (lock-free)
//!                                             search / lookup on many threads
//! ```
//!
//! # Thread Safety
//!
//! `PlateIndex` is `Send + Sync` and can be shared across threads using
//! `Arc`. Searches never block each other or a rebuild. Concurrent
//! rebuilds are serialized by an internal writer mutex so generations are
//! published in order.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use arc_swap::ArcSwap;
use tracing::{info, instrument, trace, warn};

use crate::config::Config;
use crate::distance::{Levenshtein, Metric};
use crate::error::{validate_max_distance, PlateMatchError, Result};
use crate::report::PlateReport;
use crate::source::RecordSource;
use crate::tree::{BkTree, Match};

/// One published, immutable generation of the index.
///
/// Holding an `Arc<IndexSnapshot>` pins that generation: a later rebuild
/// does not affect it, and its memory is released once the last holder
/// drops it.
#[derive(Debug)]
pub struct IndexSnapshot<M = Levenshtein> {
    tree: BkTree<M>,
    generation: u64,
}

impl<M: Metric> IndexSnapshot<M> {
    /// Generation number; 0 is the empty index before any build.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The tree backing this generation.
    #[inline]
    pub fn tree(&self) -> &BkTree<M> {
        &self.tree
    }

    /// Number of stored plates.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if no plates are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Searches this generation, ranked closest first then lexicographic.
    ///
    /// `query` is used verbatim; [`PlateIndex::search`] normalizes first.
    pub fn search(&self, query: &str, max_distance: usize) -> Vec<Match> {
        let (mut matches, stats) = self.tree.search_with_stats(query, max_distance);
        trace!(
            generation = self.generation,
            max_distance,
            visited = stats.visited,
            pruned = stats.pruned,
            matches = matches.len(),
            "BK-tree search"
        );
        matches.sort();
        matches
    }
}

/// Counters from building one generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Plates returned by the source.
    pub loaded: usize,
    /// Plates stored in the tree.
    pub inserted: usize,
    /// Plates dropped as duplicates.
    pub skipped: usize,
}

/// The plate index handle shared by every consumer.
///
/// # Example
///
/// ```rust
/// use platematch::{Config, PlateIndex, StaticSource};
///
/// let source = StaticSource::new(["ABC123", "XYZ789", "DEF456"]);
/// let index = PlateIndex::open(&source, Config::default()).unwrap();
///
/// let matches = index.search("ABCl23", 2);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].term, "ABC123");
///
/// // Refresh from the source of truth; readers keep running meanwhile
/// let generation = index.rebuild(&source).unwrap();
/// assert_eq!(generation, 2);
/// ```
pub struct PlateIndex<M = Levenshtein> {
    /// Currently published generation.
    current: ArcSwap<IndexSnapshot<M>>,

    /// Serializes writers; readers never take it.
    rebuild_lock: Mutex<()>,

    /// Metric cloned into every new tree.
    metric: M,

    config: Config,
}

impl<M: Metric> std::fmt::Debug for PlateIndex<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.current.load();
        f.debug_struct("PlateIndex")
            .field("config", &self.config)
            .field("generation", &snapshot.generation)
            .field("len", &snapshot.tree.len())
            .finish_non_exhaustive()
    }
}

impl PlateIndex<Levenshtein> {
    /// Creates an empty index using Levenshtein distance.
    ///
    /// # Errors
    ///
    /// Returns `PlateMatchError::Validation` if the config is invalid
    /// (see [`Config::validate`]).
    pub fn new(config: Config) -> Result<Self> {
        Self::with_metric(Levenshtein, config)
    }

    /// Creates an index and populates it from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The source fails to load
    #[instrument(skip(source, config))]
    pub fn open<S>(source: &S, config: Config) -> Result<Self>
    where
        S: RecordSource + ?Sized,
    {
        let index = Self::new(config)?;
        index.rebuild(source)?;
        Ok(index)
    }
}

impl<M: Metric + Clone> PlateIndex<M> {
    /// Creates an empty index keyed by `metric`.
    ///
    /// # Errors
    ///
    /// Returns `PlateMatchError::Validation` if the config is invalid.
    pub fn with_metric(metric: M, config: Config) -> Result<Self> {
        config.validate().map_err(PlateMatchError::from)?;

        let empty = IndexSnapshot {
            tree: BkTree::with_metric(metric.clone()).with_policy(config.duplicate_policy),
            generation: 0,
        };

        Ok(Self {
            current: ArcSwap::from_pointee(empty),
            rebuild_lock: Mutex::new(()),
            metric,
            config,
        })
    }

    /// Returns the configuration this index was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the currently published generation.
    pub fn snapshot(&self) -> Arc<IndexSnapshot<M>> {
        self.current.load_full()
    }

    /// Generation number of the published snapshot.
    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Number of plates in the published snapshot.
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    /// Returns true if the published snapshot holds no plates.
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Builds a tree from `plates` without publishing it.
    ///
    /// Plates are normalized with the configured [`Normalization`]
    /// and inserted under the configured duplicate policy.
    ///
    /// [`Normalization`]: crate::Normalization
    pub fn build_tree<I, S>(&self, plates: I) -> (BkTree<M>, BuildStats)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree =
            BkTree::with_metric(self.metric.clone()).with_policy(self.config.duplicate_policy);
        let mut stats = BuildStats::default();

        for plate in plates {
            stats.loaded += 1;
            let plate = self.config.normalization.apply(plate.as_ref());
            if tree.insert(plate.into_owned()) {
                stats.inserted += 1;
            } else {
                stats.skipped += 1;
            }
        }

        (tree, stats)
    }

    /// Rebuilds the index from `source` and publishes the result.
    ///
    /// The new tree is built privately and swapped in atomically. On
    /// error the previously published snapshot stays in place.
    ///
    /// Returns the new generation number.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to load or the writer lock
    /// is poisoned.
    #[instrument(skip(self, source))]
    pub fn rebuild<S>(&self, source: &S) -> Result<u64>
    where
        S: RecordSource + ?Sized,
    {
        let _writer = self
            .rebuild_lock
            .lock()
            .map_err(|_| PlateMatchError::index("Rebuild lock poisoned"))?;

        let started = Instant::now();
        let plates = match source.load_plates() {
            Ok(plates) => plates,
            Err(e) => {
                warn!(
                    error = %e,
                    generation = self.generation(),
                    "Record source failed, keeping current index"
                );
                return Err(e);
            }
        };

        let (tree, stats) = self.build_tree(&plates);
        let generation = self.store(tree);

        info!(
            generation,
            loaded = stats.loaded,
            inserted = stats.inserted,
            skipped = stats.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Plate index published"
        );

        Ok(generation)
    }

    /// Publishes a tree built elsewhere.
    ///
    /// The tree is taken as-is; no normalization is applied.
    ///
    /// # Errors
    ///
    /// Returns `PlateMatchError::Index` if the writer lock is poisoned.
    pub fn publish(&self, tree: BkTree<M>) -> Result<u64> {
        let _writer = self
            .rebuild_lock
            .lock()
            .map_err(|_| PlateMatchError::index("Rebuild lock poisoned"))?;

        let len = tree.len();
        let generation = self.store(tree);
        info!(generation, len, "Plate index published");
        Ok(generation)
    }

    /// Swaps in `tree` as the next generation. Caller holds the writer lock.
    fn store(&self, tree: BkTree<M>) -> u64 {
        let generation = self.current.load().generation + 1;
        self.current.store(Arc::new(IndexSnapshot { tree, generation }));
        generation
    }

    /// Returns every plate within `max_distance` of `query`, ranked.
    ///
    /// `query` is normalized like stored plates. Never fails; an empty
    /// index yields an empty result.
    pub fn search(&self, query: &str, max_distance: usize) -> Vec<Match> {
        let query = self.config.normalization.apply(query);
        self.current.load().search(&query, max_distance)
    }

    /// Searches with the configured default distance.
    pub fn search_default(&self, query: &str) -> Vec<Match> {
        self.search(query, self.config.default_max_distance)
    }

    /// Looks up a detected plate for the request layer.
    ///
    /// `max_distance` arrives as a signed integer from the outside; `None`
    /// selects the configured default.
    ///
    /// # Errors
    ///
    /// Returns `PlateMatchError::Validation` if `max_distance` is negative
    /// or above `max_distance_limit`.
    pub fn lookup(&self, detected: &str, max_distance: Option<i64>) -> Result<PlateReport> {
        let max_distance = match max_distance {
            Some(value) => validate_max_distance(value, self.config.max_distance_limit)?,
            None => self.config.default_max_distance,
        };

        let query = self.config.normalization.apply(detected);
        let matches = self.current.load().search(&query, max_distance);
        Ok(PlateReport::new(query, matches))
    }
}
