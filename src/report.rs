//! Lookup reports handed to the request layer.

use serde::{Deserialize, Serialize};

use crate::tree::Match;

/// Whether a detected plate matched anything in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlateStatus {
    /// At least one stored plate was within range.
    Registered,
    /// Nothing within range.
    Unregistered,
}

/// Result of looking up one detected plate.
///
/// Serializes as
/// `{"detected_plate": "...", "matches": [...], "status": "registered"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateReport {
    /// The plate text as it was queried (after normalization).
    pub detected_plate: String,
    /// Matches ranked closest first, ties lexicographic.
    pub matches: Vec<Match>,
    /// Derived from `matches`.
    pub status: PlateStatus,
}

impl PlateReport {
    /// Builds a report from ranked matches.
    pub fn new(detected_plate: impl Into<String>, matches: Vec<Match>) -> Self {
        let status = if matches.is_empty() {
            PlateStatus::Unregistered
        } else {
            PlateStatus::Registered
        };
        Self {
            detected_plate: detected_plate.into(),
            matches,
            status,
        }
    }

    /// Closest match, if any.
    pub fn best(&self) -> Option<&Match> {
        self.matches.first()
    }

    /// Returns true if the plate matched the registry.
    pub fn is_registered(&self) -> bool {
        self.status == PlateStatus::Registered
    }
}
