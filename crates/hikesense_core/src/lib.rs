//! Core domain logic for HikeSense.
//! This crate is the single source of truth for scoring and store invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod scoring;
pub mod service;

pub use config::{ConfigError, CoreConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::response::{
    Response, ResponseId, ResponseValidationError, SAMPLE_RESPONSES,
};
pub use model::sentiment::{classify, ConfidenceLevel, Sentiment};
pub use report::{
    average_score, count_by_sentiment, distribution, distribution_shares, filter_by_sentiment,
    summarize, SurveySummary,
};
pub use repo::response_repo::{RepoError, RepoResult, ResponseStorage, SqliteResponseStorage};
pub use scoring::analyzer::{AnalysisError, LexiconAnalyzer, SentimentAnalyzer};
pub use scoring::cancel::CancelToken;
pub use scoring::scorer::Scorer;
pub use scoring::{score_with, ScoreError, ScoreResult, SentimentResult};
pub use service::response_store::{ResponseStore, StoreChange, StoreError, StoreResult};

/// Scores `text` with the default lexicon engine.
pub fn score(text: &str) -> ScoreResult<SentimentResult> {
    score_with(&LexiconAnalyzer, text)
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
