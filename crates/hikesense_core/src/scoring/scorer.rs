//! Sync and async scoring entry points.
//!
//! # Responsibility
//! - Bind an analysis engine to the scoring contract.
//! - Run async scoring on the blocking pool with cooperative cancellation.
//!
//! # Invariants
//! - A token canceled before the call starts yields `Cancelled` without
//!   running the engine.
//! - A token canceled while the engine runs yields `Cancelled`; the engine
//!   result is discarded.
//! - Sync and async variants return identical results for identical text.

use super::analyzer::{AnalysisError, LexiconAnalyzer, SentimentAnalyzer};
use super::cancel::CancelToken;
use super::{score_with, ScoreError, ScoreResult, SentimentResult};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Instant;

/// Scoring facade over a shared analysis engine.
#[derive(Clone)]
pub struct Scorer {
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(LexiconAnalyzer::new())
    }
}

impl std::fmt::Debug for Scorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer").finish_non_exhaustive()
    }
}

impl Scorer {
    pub fn new(analyzer: impl SentimentAnalyzer + 'static) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn from_shared(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Scores `text` on the calling thread.
    pub fn score(&self, text: &str) -> ScoreResult<SentimentResult> {
        score_with(self.analyzer.as_ref(), text)
    }

    /// Scores `text` on the blocking pool without blocking the caller.
    ///
    /// # Errors
    /// - `Cancelled` when `cancel` fires before or during scoring.
    /// - `ScoringFailed` when the engine fails or its worker panics.
    pub async fn score_async(
        &self,
        text: &str,
        cancel: &CancelToken,
    ) -> ScoreResult<SentimentResult> {
        if cancel.is_cancelled() {
            debug!("event=score module=scoring status=cancelled stage=before_start");
            return Err(ScoreError::Cancelled);
        }

        let started_at = Instant::now();
        let analyzer = Arc::clone(&self.analyzer);
        let owned_text = text.to_owned();
        let chars = owned_text.chars().count();
        let worker =
            tokio::task::spawn_blocking(move || score_with(analyzer.as_ref(), &owned_text));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ScoreError::Cancelled),
            joined = worker => match joined {
                Ok(result) => result,
                Err(err) => Err(ScoreError::ScoringFailed(AnalysisError::new(format!(
                    "scoring worker failed: {err}"
                )))),
            },
        };

        match &outcome {
            Ok(result) => debug!(
                "event=score module=scoring status=ok chars={} score={:.3} duration_ms={}",
                chars,
                result.score,
                started_at.elapsed().as_millis()
            ),
            Err(ScoreError::Cancelled) => debug!(
                "event=score module=scoring status=cancelled stage=in_flight duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=score module=scoring status=error chars={} duration_ms={} error={}",
                chars,
                started_at.elapsed().as_millis(),
                err
            ),
        }

        outcome
    }
}
