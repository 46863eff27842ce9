//! Aggregate views over a response snapshot.
//!
//! # Responsibility
//! - Count, average and distribute responses by sentiment.
//! - Filter a snapshot by an optional sentiment.
//!
//! # Invariants
//! - Every function is pure; none mutates or retains its input.
//! - Count maps always contain all three sentiments.
//! - Distributions are ordered `[positive, moderate, negative]`.
//! - The average of an empty collection is exactly `0.0`.

use crate::model::response::Response;
use crate::model::sentiment::Sentiment;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serializable summary of a response collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveySummary {
    pub total: usize,
    pub average_score: f64,
    pub distribution: Vec<(Sentiment, usize)>,
}

/// Number of responses per sentiment, zero-filled.
pub fn count_by_sentiment(responses: &[Response]) -> BTreeMap<Sentiment, usize> {
    let mut counts: BTreeMap<Sentiment, usize> =
        Sentiment::ALL.into_iter().map(|sentiment| (sentiment, 0)).collect();
    for response in responses {
        *counts.entry(response.sentiment()).or_insert(0) += 1;
    }
    counts
}

/// Arithmetic mean of scores; `0.0` when empty.
pub fn average_score(responses: &[Response]) -> f64 {
    if responses.is_empty() {
        return 0.0;
    }
    let sum: f64 = responses.iter().map(|response| response.score).sum();
    sum / responses.len() as f64
}

/// Counts in the fixed order `[positive, moderate, negative]`.
pub fn distribution(responses: &[Response]) -> Vec<(Sentiment, usize)> {
    let counts = count_by_sentiment(responses);
    Sentiment::ALL
        .into_iter()
        .map(|sentiment| (sentiment, counts.get(&sentiment).copied().unwrap_or(0)))
        .collect()
}

/// Fraction of the total per sentiment, in distribution order.
///
/// All shares are `0.0` for an empty collection.
pub fn distribution_shares(responses: &[Response]) -> Vec<(Sentiment, f64)> {
    let total = responses.len();
    distribution(responses)
        .into_iter()
        .map(|(sentiment, count)| {
            let share = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            (sentiment, share)
        })
        .collect()
}

/// Responses whose sentiment equals `filter`; all responses when `None`.
pub fn filter_by_sentiment(responses: &[Response], filter: Option<Sentiment>) -> Vec<&Response> {
    responses
        .iter()
        .filter(|response| filter.map_or(true, |wanted| response.sentiment() == wanted))
        .collect()
}

pub fn summarize(responses: &[Response]) -> SurveySummary {
    SurveySummary {
        total: responses.len(),
        average_score: average_score(responses),
        distribution: distribution(responses),
    }
}
