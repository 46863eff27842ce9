//! Response domain model.
//!
//! # Responsibility
//! - Define the canonical survey response record.
//! - Keep score and confidence coupled to the text they were computed from.
//!
//! # Invariants
//! - `id` is stable and never reused for another response.
//! - `text`, `score` and `confidence` are only replaced together.
//! - `score` is finite and `confidence` lies in `[0.0, 1.0]`.

use crate::model::sentiment::{ConfidenceLevel, Sentiment};
use crate::scoring::SentimentResult;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a response.
pub type ResponseId = Uuid;

/// Opinions used to populate an empty store, in seeding order.
pub const SAMPLE_RESPONSES: [&str; 7] = [
    "The outdoors is my happy place, so give me a trail and some boots and I feel great!",
    "I don't mind going for a walk, but hiking requires too much gear and planning.",
    "Hiking seems like a pretty good way to stay in shape.",
    "I love everything about hiking: the fresh air, the exercise, the feeling of accomplishment. When can we go next?",
    "There's a nice, paved trail near my house that I like, but I don't need to get out in the woods.",
    "I enjoy hard hikes. When my heart is pumping and I'm being challenged, I feel great.",
    "Last time I went hiking I got a thousand bug bites. You won't find me on a trail any time soon!",
];

/// A scored free-text opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: ResponseId,
    pub text: String,
    /// Polarity in `[-1.0, 1.0]`; positive is favorable.
    pub score: f64,
    /// `min(1.0, abs(score))` at scoring time.
    pub confidence: f64,
}

/// Invalid score/confidence state detected on a response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseValidationError {
    NonFiniteScore(f64),
    ConfidenceOutOfRange(f64),
}

impl Display for ResponseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteScore(score) => write!(f, "score must be finite, got {score}"),
            Self::ConfidenceOutOfRange(confidence) => {
                write!(f, "confidence must be within [0, 1], got {confidence}")
            }
        }
    }
}

impl Error for ResponseValidationError {}

impl Response {
    /// Creates a response with a freshly generated id.
    pub fn new(text: impl Into<String>, result: SentimentResult) -> Self {
        Self::with_id(Uuid::new_v4(), text, result)
    }

    /// Creates a response with a caller-provided id.
    ///
    /// Used by the load path and by edits, which keep identity.
    pub fn with_id(id: ResponseId, text: impl Into<String>, result: SentimentResult) -> Self {
        Self {
            id,
            text: text.into(),
            score: result.score,
            confidence: result.confidence,
        }
    }

    /// Returns a copy with the same id and new text/score/confidence.
    pub fn rescored(&self, text: impl Into<String>, result: SentimentResult) -> Self {
        Self::with_id(self.id, text, result)
    }

    /// Sentiment bucket derived from the current score.
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::from_score(self.score)
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }

    /// Checks the numeric invariants of this record.
    pub fn validate(&self) -> Result<(), ResponseValidationError> {
        if !self.score.is_finite() {
            return Err(ResponseValidationError::NonFiniteScore(self.score));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ResponseValidationError::ConfidenceOutOfRange(self.confidence));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Response, ResponseValidationError};
    use crate::model::sentiment::{ConfidenceLevel, Sentiment};
    use crate::scoring::SentimentResult;

    fn result(score: f64) -> SentimentResult {
        SentimentResult::from_score(score)
    }

    #[test]
    fn rescored_keeps_id_and_replaces_fields() {
        let original = Response::new("I love it", result(0.8));
        let edited = original.rescored("I hate it", result(-0.6));

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.text, "I hate it");
        assert_eq!(edited.score, -0.6);
        assert_eq!(edited.confidence, 0.6);
        assert_eq!(edited.sentiment(), Sentiment::Negative);
    }

    #[test]
    fn confidence_level_follows_current_confidence() {
        assert_eq!(
            Response::new("a", result(-0.9)).confidence_level(),
            ConfidenceLevel::High
        );
        assert_eq!(
            Response::new("b", result(0.5)).confidence_level(),
            ConfidenceLevel::Medium
        );
        let low = Response::new("c", result(0.05));
        assert_eq!(low.confidence_level(), ConfidenceLevel::Low);
        assert_eq!(
            low.rescored("d", result(0.8)).confidence_level(),
            ConfidenceLevel::High
        );
    }

    #[test]
    fn new_generates_distinct_ids() {
        let a = Response::new("same", result(0.0));
        let b = Response::new("same", result(0.0));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn validate_rejects_broken_numbers() {
        let mut response = Response::new("text", result(0.3));
        assert!(response.validate().is_ok());

        response.score = f64::NAN;
        assert!(matches!(
            response.validate(),
            Err(ResponseValidationError::NonFiniteScore(_))
        ));

        response.score = 0.3;
        response.confidence = 1.5;
        assert_eq!(
            response.validate(),
            Err(ResponseValidationError::ConfidenceOutOfRange(1.5))
        );
    }
}
