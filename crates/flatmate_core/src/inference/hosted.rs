use crate::error::AppError;
use crate::inference::{Sentiment, SentimentClassifier, Summarizer, SummaryBounds};
use serde::Deserialize;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Summarization through the hosted inference API.
pub struct HostedSummarizer {
    token: String,
    model: String,
    base_url: String,
}

/// Sentiment classification through the hosted inference API.
pub struct HostedClassifier {
    token: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SummaryEntry {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl HostedSummarizer {
    pub fn new<T: Into<String>, M: Into<String>>(token: T, model: M) -> Self {
        Self {
            token: token.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url<U: Into<String>>(mut self, base_url: U) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl HostedClassifier {
    pub fn new<T: Into<String>, M: Into<String>>(token: T, model: M) -> Self {
        Self {
            token: token.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url<U: Into<String>>(mut self, base_url: U) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Summarizer for HostedSummarizer {
    fn summarize(&self, text: &str) -> Result<String, AppError> {
        let bounds = SummaryBounds::for_text(text);
        let body = serde_json::json!({
            "inputs": text,
            "parameters": {
                "max_length": bounds.max_length,
                "min_length": bounds.min_length,
                "do_sample": false,
            },
        });
        let response = post_json(&self.base_url, &self.model, &self.token, &body)?;
        parse_summary_response(response)
    }
}

impl SentimentClassifier for HostedClassifier {
    fn classify(&self, text: &str) -> Result<Sentiment, AppError> {
        let body = serde_json::json!({ "inputs": text });
        let response = post_json(&self.base_url, &self.model, &self.token, &body)?;
        parse_classification_response(response)
    }
}

fn post_json(base_url: &str, model: &str, token: &str, body: &Value) -> Result<Value, AppError> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), model);
    tracing::debug!(%url, "calling hosted inference");

    let agent = ureq::Agent::new_with_defaults();
    let response = agent
        .post(&url)
        .header("authorization", &format!("Bearer {token}"))
        .header("content-type", "application/json")
        .send_json(body)
        .map_err(|err| AppError::inference(format!("{model}: request failed: {err}")))?;

    response
        .into_body()
        .read_json::<Value>()
        .map_err(|err| AppError::inference(format!("{model}: unreadable response: {err}")))
}

fn parse_summary_response(response: Value) -> Result<String, AppError> {
    let entries: Vec<SummaryEntry> = serde_json::from_value(response)
        .map_err(|err| AppError::inference(format!("unexpected summary response: {err}")))?;
    entries
        .into_iter()
        .next()
        .map(|entry| entry.summary_text.trim().to_string())
        .ok_or_else(|| AppError::inference("summary response was empty"))
}

fn parse_classification_response(response: Value) -> Result<Sentiment, AppError> {
    let parsed: ClassificationResponse = serde_json::from_value(response)
        .map_err(|err| AppError::inference(format!("unexpected sentiment response: {err}")))?;
    let scores = match parsed {
        ClassificationResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        ClassificationResponse::Flat(scores) => scores,
    };

    scores
        .into_iter()
        .max_by(|left, right| left.score.total_cmp(&right.score))
        .map(|best| Sentiment {
            label: best.label,
            confidence: best.score,
        })
        .ok_or_else(|| AppError::inference("sentiment response was empty"))
}
