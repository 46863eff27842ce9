//! Sentiment buckets derived from a numeric score.
//!
//! # Responsibility
//! - Map a polarity score to one of three categorical buckets.
//! - Band confidence values for display-oriented collaborators.
//!
//! # Invariants
//! - Thresholds are fixed at `±0.1`; both boundaries belong to `Moderate`.
//! - Classification is total: every `f64` (including NaN) maps to a bucket.
//! - Sentiment is never persisted; it is always recomputed from score.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Scores strictly above this value are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Scores strictly below this value are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

const HIGH_CONFIDENCE_MIN: f64 = 0.75;
const MEDIUM_CONFIDENCE_MIN: f64 = 0.4;

/// Threshold-derived polarity bucket of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    /// Generally favorable opinion.
    Positive,
    /// Neutral or mixed opinion.
    Moderate,
    /// Generally unfavorable opinion.
    Negative,
}

impl Sentiment {
    /// All buckets in stable reporting order.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Moderate, Sentiment::Negative];

    /// Classifies a score into a bucket.
    pub fn from_score(score: f64) -> Self {
        classify(score)
    }

    /// Stable lowercase name used in logs and serialized views.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Moderate => "moderate",
            Self::Negative => "negative",
        }
    }

    /// Parses the lowercase name produced by [`Sentiment::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "moderate" => Some(Self::Moderate),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a score to its sentiment bucket.
///
/// `0.1` and `-0.1` are moderate. NaN fails both strict comparisons and
/// therefore lands in `Moderate` as well.
pub fn classify(score: f64) -> Sentiment {
    if score > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if score < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Moderate
    }
}

/// Display band for a confidence value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    /// Confidence in `[0.75, 1.0]`.
    High,
    /// Confidence in `[0.4, 0.75)`.
    Medium,
    /// Anything lower, including NaN.
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= HIGH_CONFIDENCE_MIN {
            Self::High
        } else if confidence >= MEDIUM_CONFIDENCE_MIN {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}
