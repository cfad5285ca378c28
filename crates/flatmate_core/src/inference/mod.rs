//! Summarization and sentiment capabilities.
//!
//! The core only sees the two traits below; concrete backends are chosen once
//! at startup and handed to [`crate::analysis::Analyzer`].

use crate::config::Config;
use crate::error::AppError;
use std::fmt;

mod hosted;
mod offline;

pub use hosted::{HostedClassifier, HostedSummarizer};
pub use offline::{LeadSummarizer, NeutralClassifier};

const INFERENCE_ENV_VAR: &str = "FLATMATE_INFERENCE";
const TOKEN_ENV_VAR: &str = "FLATMATE_HF_TOKEN";
const NEGATIVE_CONFIDENCE_FLOOR: f64 = 0.8;

pub trait Summarizer {
    fn summarize(&self, text: &str) -> Result<String, AppError>;
}

pub trait SentimentClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment, AppError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
}

impl From<&Sentiment> for Mood {
    /// Negative labels below the confidence floor count as neutral.
    fn from(sentiment: &Sentiment) -> Self {
        match sentiment.label.to_uppercase().as_str() {
            "NEGATIVE" | "LABEL_0" if sentiment.confidence < NEGATIVE_CONFIDENCE_FLOOR => {
                Mood::Neutral
            }
            "NEGATIVE" | "LABEL_0" => Mood::Negative,
            "POSITIVE" | "LABEL_2" => Mood::Positive,
            _ => Mood::Neutral,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Positive => "Positive",
            Mood::Neutral => "Neutral",
            Mood::Negative => "Negative",
        };
        f.write_str(label)
    }
}

/// Output length limits for the summarizer, scaled to the input so that very
/// short chats still produce something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    pub min_length: usize,
    pub max_length: usize,
}

impl SummaryBounds {
    pub fn for_text(text: &str) -> Self {
        let words = text.split_whitespace().count();
        let scaled = words.saturating_mul(9) / 5;
        let max_length = scaled.clamp(30, 120);
        let min_length = (max_length / 3).max(10);
        Self {
            min_length,
            max_length,
        }
    }
}

pub struct Backends {
    pub summarizer: Box<dyn Summarizer>,
    pub classifier: Box<dyn SentimentClassifier>,
}

/// Picks hosted inference when a token is available, offline otherwise.
pub fn backends_from_config(config: &Config) -> Backends {
    let forced_offline = std::env::var(INFERENCE_ENV_VAR)
        .map(|value| value.trim().eq_ignore_ascii_case("offline"))
        .unwrap_or(false);
    if forced_offline {
        return offline_backends();
    }

    let token = std::env::var(TOKEN_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| config.hf_token.clone());

    match token {
        Some(token) => Backends {
            summarizer: Box::new(HostedSummarizer::new(
                token.clone(),
                config.summarization_model(),
            )),
            classifier: Box::new(HostedClassifier::new(token, config.sentiment_model())),
        },
        None => {
            tracing::warn!("no inference token configured, using offline summarizer");
            offline_backends()
        }
    }
}

fn offline_backends() -> Backends {
    Backends {
        summarizer: Box::new(LeadSummarizer),
        classifier: Box::new(NeutralClassifier),
    }
}
