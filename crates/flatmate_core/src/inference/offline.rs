use crate::error::AppError;
use crate::inference::{Sentiment, SentimentClassifier, Summarizer, SummaryBounds};

/// Extractive stand-in for the hosted summarizer: keeps whole leading
/// sentences until the word budget is spent.
pub struct LeadSummarizer;

/// Reports every conversation as neutral.
pub struct NeutralClassifier;

impl Summarizer for LeadSummarizer {
    fn summarize(&self, text: &str) -> Result<String, AppError> {
        let budget = SummaryBounds::for_text(text).max_length;
        let mut summary = String::new();
        let mut used = 0usize;

        for sentence in sentences(text) {
            let words = sentence.split_whitespace().count();
            if used > 0 && used + words > budget {
                break;
            }
            if !summary.is_empty() {
                summary.push(' ');
            }
            summary.push_str(sentence);
            used += words;
        }

        Ok(summary)
    }
}

impl SentimentClassifier for NeutralClassifier {
    fn classify(&self, _text: &str) -> Result<Sentiment, AppError> {
        Ok(Sentiment {
            label: "NEUTRAL".to_string(),
            confidence: 1.0,
        })
    }
}

fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
}
