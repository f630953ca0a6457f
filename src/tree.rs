//! BK-tree keyed by an injected string metric.
//!
//! Each node owns one plate and an ordered map from distance to child.
//! The child stored under key `d` is exactly `d` away from its parent,
//! which lets range search skip every child whose key falls outside
//! `[dist - k, dist + k]`.
//!
//! ```text
//!                 ABC123
//!          1 /      6 |      \ 5
//!        ABD123    XYZ789   DEF456
//!                    1 |
//!                   XYZ788
//! ```
//!
//! # Thread Safety
//!
//! The tree has no interior mutability. Insertion takes `&mut self`, and
//! search takes `&self`, so a built tree can be shared across threads
//! behind an `Arc` and queried concurrently without locking. Publishing
//! a rebuilt tree is the job of [`PlateIndex`](crate::PlateIndex).

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::distance::{Levenshtein, Metric};

/// What `insert` does with a plate that is already stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Ignore the second copy; `insert` returns `false`.
    #[default]
    Skip,

    /// Store the copy as a distance-0 child of the existing node.
    ///
    /// Search then reports the plate once per stored copy.
    Keep,
}

/// A stored plate within range of a query.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// The stored plate.
    pub term: String,
    /// Edit distance from the query to `term`.
    pub distance: usize,
}

impl Match {
    /// Creates a new match.
    pub fn new(term: impl Into<String>, distance: usize) -> Self {
        Self {
            term: term.into(),
            distance,
        }
    }
}

impl PartialOrd for Match {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Match {
    /// Closest first, ties broken lexicographically.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.term.cmp(&other.term))
    }
}

/// Traversal counters for a single search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose distance to the query was computed.
    pub visited: usize,
    /// Child subtrees skipped by the triangle-inequality window.
    pub pruned: usize,
}

#[derive(Clone, Debug)]
struct Node {
    term: String,
    children: BTreeMap<usize, Node>,
}

impl Node {
    fn leaf(term: String) -> Self {
        Self {
            term,
            children: BTreeMap::new(),
        }
    }
}

/// Metric tree answering "which plates are within `k` edits of `q`".
///
/// # Example
/// ```rust
/// use platematch::BkTree;
///
/// let mut tree = BkTree::new();
/// for plate in ["ABC123", "XYZ789", "DEF456"] {
///     tree.insert(plate);
/// }
///
/// let matches = tree.search("ABCl23", 2);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].term, "ABC123");
/// assert_eq!(matches[0].distance, 1);
/// ```
#[derive(Clone)]
pub struct BkTree<M = Levenshtein> {
    root: Option<Node>,
    metric: M,
    policy: DuplicatePolicy,
    len: usize,
}

impl<M> std::fmt::Debug for BkTree<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BkTree")
            .field("len", &self.len)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl BkTree<Levenshtein> {
    /// Creates an empty tree using Levenshtein distance.
    pub fn new() -> Self {
        Self::with_metric(Levenshtein)
    }
}

impl Default for BkTree<Levenshtein> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Metric> BkTree<M> {
    /// Creates an empty tree keyed by `metric`.
    ///
    /// `metric` must be a true metric; see [`Metric`].
    pub fn with_metric(metric: M) -> Self {
        Self {
            root: None,
            metric,
            policy: DuplicatePolicy::default(),
            len: 0,
        }
    }

    /// Sets the duplicate policy. Only affects later insertions.
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the duplicate policy in effect.
    #[inline]
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Returns the metric keying this tree.
    #[inline]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Number of stored nodes (duplicates count when kept).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts a plate.
    ///
    /// Walks from the root, following the child keyed by the plate's
    /// distance to each visited node, and attaches a new leaf at the first
    /// free key. Returns `false` only when the plate is already stored and
    /// the policy is [`DuplicatePolicy::Skip`].
    pub fn insert(&mut self, term: impl Into<String>) -> bool {
        let term = term.into();

        let mut node = match self.root.as_mut() {
            Some(root) => root,
            None => {
                self.root = Some(Node::leaf(term));
                self.len = 1;
                return true;
            }
        };

        loop {
            let d = self.metric.distance(&term, &node.term);
            if d == 0 && self.policy == DuplicatePolicy::Skip {
                return false;
            }

            match node.children.entry(d) {
                Entry::Occupied(child) => node = child.into_mut(),
                Entry::Vacant(slot) => {
                    slot.insert(Node::leaf(term));
                    self.len += 1;
                    return true;
                }
            }
        }
    }

    /// Returns every stored plate within `max_distance` of `query`.
    ///
    /// Result order follows traversal and carries no meaning; sort the
    /// result (see [`Match`]'s `Ord`) for a ranked list. An empty tree
    /// yields an empty result.
    pub fn search(&self, query: &str, max_distance: usize) -> Vec<Match> {
        self.search_with_stats(query, max_distance).0
    }

    /// Like [`search`](Self::search), also reporting how much of the tree
    /// was visited and how many subtrees were pruned.
    pub fn search_with_stats(
        &self,
        query: &str,
        max_distance: usize,
    ) -> (Vec<Match>, SearchStats) {
        let mut matches = Vec::new();
        let mut stats = SearchStats::default();

        let Some(root) = self.root.as_ref() else {
            return (matches, stats);
        };

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            stats.visited += 1;

            let dist = self.metric.distance(query, &node.term);
            if dist <= max_distance {
                matches.push(Match::new(node.term.as_str(), dist));
            }

            // Triangle inequality: a child at key d can only hold matches
            // when |d - dist| <= max_distance
            let lo = dist.saturating_sub(max_distance);
            let hi = dist.saturating_add(max_distance);
            let before = stack.len();
            stack.extend(node.children.range(lo..=hi).map(|(_, child)| child));
            stats.pruned += node.children.len() - (stack.len() - before);
        }

        (matches, stats)
    }

    /// Iterates over stored plates in depth-first order.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes().map(|(_, term)| term)
    }

    /// Iterates over `(parent, key, child)` triples for every edge.
    ///
    /// Each triple satisfies `metric(parent, child) == key` in a well-formed
    /// tree; exposed for structural checks.
    pub fn edges(&self) -> impl Iterator<Item = (&str, usize, &str)> + '_ {
        self.nodes()
            .filter_map(|(parent, child)| parent.map(|(p, key)| (p, key, child)))
    }

    fn nodes(&self) -> Nodes<'_> {
        Nodes {
            stack: self.root.iter().map(|root| (None, root)).collect(),
        }
    }
}

/// Depth-first walk yielding each node's term with its parent edge.
struct Nodes<'a> {
    stack: Vec<(Option<(&'a str, usize)>, &'a Node)>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = (Option<(&'a str, usize)>, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (parent, node) = self.stack.pop()?;
        let term = node.term.as_str();
        self.stack.extend(
            node.children
                .iter()
                .rev()
                .map(|(&key, child)| (Some((term, key)), child)),
        );
        Some((parent, term))
    }
}

impl<M: Metric, S: Into<String>> Extend<S> for BkTree<M> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for term in iter {
            self.insert(term);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for BkTree<Levenshtein> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
