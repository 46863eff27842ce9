//! Text scoring pipeline.
//!
//! # Responsibility
//! - Turn free text into a `(score, confidence)` pair via an analysis engine.
//! - Offer a cancellable async variant that keeps callers unblocked.
//!
//! # Invariants
//! - Empty or neutral text scores exactly `(0.0, 0.0)`.
//! - `score` is clamped to `[-1.0, 1.0]`.
//! - `confidence == min(1.0, abs(score))`, always recomputed with score.
//! - Scoring is a pure function of the text.

pub mod analyzer;
pub mod cancel;
pub mod scorer;

use analyzer::{AnalysisError, SentimentAnalyzer};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ScoreResult<T> = Result<T, ScoreError>;

/// Score and derived confidence for one text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub score: f64,
    pub confidence: f64,
}

impl SentimentResult {
    /// Neutral result returned for empty input.
    pub const NEUTRAL: SentimentResult = SentimentResult {
        score: 0.0,
        confidence: 0.0,
    };

    /// Clamps a raw polarity and derives confidence from it.
    ///
    /// Non-finite input is not handled here; see [`score_with`].
    pub fn from_score(raw: f64) -> Self {
        let score = if raw == 0.0 { 0.0 } else { raw.clamp(-1.0, 1.0) };
        Self {
            score,
            confidence: score.abs().min(1.0),
        }
    }
}

/// Failure outcomes of a scoring call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// Canceled before completion. A normal early exit, not a fault.
    Cancelled,
    /// The analysis engine failed or produced an unusable value.
    ScoringFailed(AnalysisError),
}

impl Display for ScoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "scoring cancelled"),
            Self::ScoringFailed(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cancelled => None,
            Self::ScoringFailed(err) => Some(err),
        }
    }
}

impl From<AnalysisError> for ScoreError {
    fn from(value: AnalysisError) -> Self {
        Self::ScoringFailed(value)
    }
}

/// Scores `text` with the given engine.
///
/// Empty or whitespace-only text short-circuits to [`SentimentResult::NEUTRAL`]
/// without consulting the engine.
pub fn score_with(analyzer: &dyn SentimentAnalyzer, text: &str) -> ScoreResult<SentimentResult> {
    if text.trim().is_empty() {
        return Ok(SentimentResult::NEUTRAL);
    }

    let raw = analyzer.analyze(text)?;
    if !raw.is_finite() {
        return Err(ScoreError::ScoringFailed(AnalysisError::new(format!(
            "engine returned non-finite polarity {raw}"
        ))));
    }

    Ok(SentimentResult::from_score(raw))
}
