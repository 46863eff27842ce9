//! Sentiment analysis engines.
//!
//! # Responsibility
//! - Define the black-box analysis contract consumed by the scorer.
//! - Provide a rule-based lexicon engine as the default implementation.
//!
//! # Invariants
//! - Engines are stateless across calls; every buffer lives on the stack of
//!   one `analyze` call.
//! - The lexicon engine output is finite and lies within `[-1.0, 1.0]` for
//!   any input, however long.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?|[.!?;:,]").expect("valid token regex"));

static POLARITY: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("love", 0.8),
        ("loved", 0.8),
        ("loves", 0.8),
        ("adore", 0.8),
        ("amazing", 0.8),
        ("awesome", 0.8),
        ("wonderful", 0.8),
        ("fantastic", 0.8),
        ("excellent", 0.8),
        ("best", 0.7),
        ("perfect", 0.7),
        ("great", 0.7),
        ("happy", 0.7),
        ("beautiful", 0.7),
        ("enjoy", 0.6),
        ("enjoyed", 0.6),
        ("enjoys", 0.6),
        ("fun", 0.6),
        ("favorite", 0.6),
        ("rewarding", 0.6),
        ("exciting", 0.6),
        ("excited", 0.6),
        ("good", 0.5),
        ("nice", 0.5),
        ("glad", 0.5),
        ("pleasant", 0.5),
        ("peaceful", 0.5),
        ("relaxing", 0.5),
        ("accomplishment", 0.5),
        ("like", 0.4),
        ("likes", 0.4),
        ("liked", 0.4),
        ("healthy", 0.4),
        ("fresh", 0.3),
        ("better", 0.3),
        ("fine", 0.1),
        ("okay", 0.05),
        ("ok", 0.05),
        ("hate", -0.8),
        ("hated", -0.8),
        ("hates", -0.8),
        ("awful", -0.8),
        ("terrible", -0.8),
        ("horrible", -0.8),
        ("worst", -0.8),
        ("miserable", -0.7),
        ("boring", -0.6),
        ("dislike", -0.6),
        ("bad", -0.6),
        ("painful", -0.6),
        ("annoying", -0.6),
        ("sad", -0.6),
        ("angry", -0.6),
        ("bored", -0.5),
        ("exhausting", -0.5),
        ("exhausted", -0.5),
        ("pain", -0.5),
        ("dangerous", -0.5),
        ("scary", -0.5),
        ("worse", -0.5),
        ("uncomfortable", -0.5),
        ("hassle", -0.5),
        ("bites", -0.5),
        ("tiring", -0.4),
        ("tired", -0.4),
        ("sore", -0.4),
        ("problem", -0.4),
        ("difficult", -0.3),
        ("bugs", -0.3),
    ]
    .into_iter()
    .collect()
});

static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("extremely", 1.8),
        ("incredibly", 1.8),
        ("absolutely", 1.6),
        ("very", 1.5),
        ("super", 1.5),
        ("really", 1.4),
        ("totally", 1.4),
        ("so", 1.3),
        ("pretty", 1.2),
        ("fairly", 0.8),
        ("rather", 0.8),
        ("somewhat", 0.7),
        ("slightly", 0.5),
    ]
    .into_iter()
    .collect()
});

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "none", "nobody", "nowhere", "neither", "nor", "without",
    "cannot", "can't", "cant", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "won't",
    "wont", "wouldn't", "wouldnt", "shouldn't", "shouldnt", "couldn't", "couldnt", "isn't",
    "isnt", "aren't", "arent", "wasn't", "wasnt", "weren't", "werent", "hardly", "barely",
];

/// Upper bound for a chain of stacked intensifiers.
const MAX_SCALE: f64 = 1e6;

/// Beyond this magnitude `squash` is `±1.0` to within f64 precision.
const SQUASH_SATURATION: f64 = 1e8;

/// Error raised by an analysis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisError {
    message: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "sentiment analysis failed: {}", self.message)
    }
}

impl Error for AnalysisError {}

/// Black-box polarity engine.
///
/// Implementations return a polarity in roughly `[-1.0, 1.0]`. Confidence is
/// derived by the scorer, never supplied by the engine.
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<f64, AnalysisError>;
}

/// Rule-based lexicon engine.
///
/// Sums word polarities per text with negation and intensity handling, then
/// squashes the sum with `x / sqrt(x^2 + 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Result<f64, AnalysisError> {
        let normalized = text.to_lowercase().replace('\u{2019}', "'");
        let mut pass = LexiconPass::default();

        for token in TOKEN_RE.find_iter(&normalized) {
            pass.feed(token.as_str());
        }
        pass.close_clause();

        Ok(squash(pass.total))
    }
}

/// Per-call scan state. Created fresh for every `analyze` call.
#[derive(Debug)]
struct LexiconPass {
    total: f64,
    negate: bool,
    scale: f64,
    clause_last: Option<f64>,
    previous_clause_last: Option<f64>,
}

impl Default for LexiconPass {
    fn default() -> Self {
        Self {
            total: 0.0,
            negate: false,
            scale: 1.0,
            clause_last: None,
            previous_clause_last: None,
        }
    }
}

impl LexiconPass {
    fn feed(&mut self, token: &str) {
        match token {
            "," | ";" | ":" => self.close_clause(),
            "." | "!" | "?" => {
                self.close_clause();
                self.previous_clause_last = None;
            }
            word if NEGATIONS.contains(&word) => self.negate = true,
            word => {
                if let Some(multiplier) = INTENSIFIERS.get(word) {
                    self.scale = (self.scale * multiplier).min(MAX_SCALE);
                } else if let Some(polarity) = POLARITY.get(word) {
                    let mut contribution = polarity * self.scale;
                    if self.negate {
                        contribution = -contribution;
                        self.negate = false;
                    }
                    self.scale = 1.0;
                    self.total += contribution;
                    self.clause_last = Some(contribution);
                }
            }
        }
    }

    /// Ends the current clause.
    ///
    /// A negation with nothing left to negate refers back to the last
    /// polarity word ("I like it, sometimes I don't") and cancels it.
    fn close_clause(&mut self) {
        if self.negate {
            if let Some(target) = self.clause_last.or(self.previous_clause_last) {
                self.total -= target;
            }
        }
        if self.clause_last.is_some() {
            self.previous_clause_last = self.clause_last;
        }
        self.clause_last = None;
        self.negate = false;
        self.scale = 1.0;
    }
}

fn squash(total: f64) -> f64 {
    if total.abs() > SQUASH_SATURATION {
        return total.signum();
    }
    total / total.hypot(1.0)
}
