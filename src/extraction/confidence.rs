//! Confidence Scorer: completeness estimate over a document type's
//! required fields. A heuristic, not a correctness guarantee.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::TypeConfig;

/// Below this overall percentage the extraction should go to human
/// review instead of being persisted silently.
pub const REVIEW_THRESHOLD: f64 = 50.0;

/// Values longer than this many characters are labelled high
/// confidence.
const HIGH_CONFIDENCE_MIN_CHARS: usize = 3;

/// Qualitative per-field confidence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldConfidence {
    High,
    Low,
}

impl FieldConfidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Completeness report for one extraction call. Computed fresh per
/// call, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceReport {
    /// Required fields found / required fields total, as a percentage
    /// in [0, 100].
    pub overall: f64,
    /// Label per extracted field (required or not).
    pub fields: BTreeMap<String, FieldConfidence>,
}

impl ConfidenceReport {
    pub fn zero() -> Self {
        Self {
            overall: 0.0,
            fields: BTreeMap::new(),
        }
    }

    pub fn needs_review(&self) -> bool {
        self.overall < REVIEW_THRESHOLD
    }
}

/// Score extracted fields against the type's required set.
///
/// Types without a required set score zero with an empty field map —
/// that is a valid answer, not an error.
pub fn score_extraction(
    fields: &BTreeMap<String, String>,
    config: &TypeConfig,
) -> ConfidenceReport {
    if config.confidence_required.is_empty() {
        return ConfidenceReport::zero();
    }

    let found = config
        .confidence_required
        .iter()
        .filter(|name| fields.get(**name).is_some_and(|v| !v.is_empty()))
        .count();
    let overall = found as f64 / config.confidence_required.len() as f64 * 100.0;

    let mut labels = BTreeMap::new();
    for (name, value) in fields {
        if value.is_empty() {
            continue;
        }
        let label = if value.chars().count() > HIGH_CONFIDENCE_MIN_CHARS {
            FieldConfidence::High
        } else {
            FieldConfidence::Low
        };
        labels.insert(name.clone(), label);
    }

    ConfidenceReport {
        overall,
        fields: labels,
    }
}
