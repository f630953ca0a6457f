//! Matching accuracy over a labelled set of OCR readings.
//!
//! Each [`AccuracyCase`] pairs a (possibly misread) plate with the
//! registry plate it should resolve to, or `None` when it should not
//! match anything. A case counts as correct when the best-ranked match
//! equals the expectation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::Metric;
use crate::index::PlateIndex;

/// One labelled reading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyCase {
    /// Plate text as read by OCR.
    pub input: String,
    /// Registry plate it should resolve to, if any.
    pub expected: Option<String>,
    /// Edit distance to search with.
    pub max_distance: usize,
}

impl AccuracyCase {
    /// Creates a case.
    pub fn new(input: impl Into<String>, expected: Option<&str>, max_distance: usize) -> Self {
        Self {
            input: input.into(),
            expected: expected.map(str::to_owned),
            max_distance,
        }
    }
}

/// Outcome of a single case.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// The evaluated case.
    pub case: AccuracyCase,
    /// Best-ranked match, if any.
    pub found: Option<String>,
    /// `found == case.expected`.
    pub correct: bool,
}

/// Aggregate over a case set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Per-case outcomes, in input order.
    pub outcomes: Vec<CaseOutcome>,
    /// Number of correct cases.
    pub correct: usize,
    /// Number of cases.
    pub total: usize,
}

impl AccuracyReport {
    /// Percentage of correct cases; 0.0 for an empty set.
    pub fn accuracy_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }

    /// Outcomes that did not match their expectation.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.outcomes.iter().filter(|o| !o.correct)
    }
}

/// Runs every case against `index`.
///
/// # Example
///
/// ```rust
/// use platematch::{evaluate, AccuracyCase, Config, PlateIndex, StaticSource};
///
/// let index = PlateIndex::open(&StaticSource::new(["ABC123"]), Config::default()).unwrap();
/// let report = evaluate(&index, &[
///     AccuracyCase::new("ABCl23", Some("ABC123"), 2),
///     AccuracyCase::new("ZZZ999", None, 2),
/// ]);
/// assert_eq!(report.accuracy_percent(), 100.0);
/// ```
pub fn evaluate<M>(index: &PlateIndex<M>, cases: &[AccuracyCase]) -> AccuracyReport
where
    M: Metric + Clone,
{
    let snapshot = index.snapshot();
    let normalization = index.config().normalization;
    let mut report = AccuracyReport {
        total: cases.len(),
        ..Default::default()
    };

    for case in cases {
        let query = normalization.apply(&case.input);
        let found = snapshot
            .search(&query, case.max_distance)
            .into_iter()
            .next()
            .map(|m| m.term);
        let correct = found == case.expected;
        debug!(
            input = %case.input,
            expected = ?case.expected,
            found = ?found,
            correct,
            "Accuracy case"
        );

        if correct {
            report.correct += 1;
        }
        report.outcomes.push(CaseOutcome {
            case: case.clone(),
            found,
            correct,
        });
    }

    report
}
