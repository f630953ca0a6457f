//! Edit-distance metric used to key the BK-tree.
//!
//! The tree only relies on the [`Metric`] trait, so any function that is a
//! true metric (symmetric, zero on identity, triangle inequality) can be
//! injected in place of [`Levenshtein`]. Closures of the right shape
//! implement [`Metric`] through a blanket impl.
//!
//! Distances are counted over Unicode scalar values, so `"é"` and `"e"`
//! are one substitution apart regardless of their UTF-8 byte lengths.

/// A distance function over strings.
///
/// Implementations must satisfy the metric axioms exactly. Pruning during
/// search is only sound if `d(a, c) <= d(a, b) + d(b, c)` holds for every
/// triple of strings.
pub trait Metric: Send + Sync {
    /// Returns the distance between `a` and `b`.
    fn distance(&self, a: &str, b: &str) -> usize;
}

impl<F> Metric for F
where
    F: Fn(&str, &str) -> usize + Send + Sync,
{
    #[inline]
    fn distance(&self, a: &str, b: &str) -> usize {
        self(a, b)
    }
}

/// Levenshtein (insert / delete / substitute) edit distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl Metric for Levenshtein {
    #[inline]
    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }
}

/// Computes the Levenshtein distance between two strings.
///
/// Uses two rolling rows sized by the shorter input, giving
/// `O(len(a) * len(b))` time and `O(min(len(a), len(b)))` space.
///
/// # Example
/// ```rust
/// use platematch::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// assert_eq!(levenshtein("ABC123", "ABCl23"), 1);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Rows run over the shorter string
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, &lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            let insertion = curr[j] + 1;
            let deletion = prev[j + 1] + 1;
            curr[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}
