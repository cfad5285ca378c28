use crate::error::AppError;
use crate::extract::{extract_from_chat, extract_from_summary};
use crate::inference::{Mood, SentimentClassifier, Summarizer};
use crate::model::{TaskRecord, timestamp_now};

/// Which extraction pass produced the tasks of an [`Analysis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Chat,
    Summary,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub lines: Vec<String>,
    pub summary: String,
    pub mood: Mood,
    pub tasks: Vec<TaskRecord>,
    pub source: ExtractionSource,
}

/// Runs one captured conversation through summarization, sentiment and task
/// extraction. The summary pass only runs when the chat pass finds nothing.
pub struct Analyzer<'a> {
    summarizer: &'a dyn Summarizer,
    classifier: &'a dyn SentimentClassifier,
}

impl<'a> Analyzer<'a> {
    pub fn new(summarizer: &'a dyn Summarizer, classifier: &'a dyn SentimentClassifier) -> Self {
        Self {
            summarizer,
            classifier,
        }
    }

    pub fn analyze(&self, lines: &[String]) -> Result<Analysis, AppError> {
        if lines.is_empty() {
            return Err(AppError::invalid_input("No input provided."));
        }

        let conversation = lines.join(" ");
        let summary = self.summarizer.summarize(&conversation)?.trim().to_string();
        let sentiment = self.classifier.classify(&conversation)?;
        let mood = Mood::from(&sentiment);
        tracing::debug!(label = %sentiment.label, confidence = sentiment.confidence, %mood, "classified conversation");

        let created_at = timestamp_now()?;
        let (tasks, source) = select_tasks(lines, &summary, &created_at);
        tracing::info!(tasks = tasks.len(), ?source, "analyzed conversation");

        Ok(Analysis {
            lines: lines.to_vec(),
            summary,
            mood,
            tasks,
            source,
        })
    }
}

fn select_tasks(
    lines: &[String],
    summary: &str,
    created_at: &str,
) -> (Vec<TaskRecord>, ExtractionSource) {
    let from_chat = extract_from_chat(lines, created_at);
    if !from_chat.is_empty() {
        return (from_chat, ExtractionSource::Chat);
    }

    let from_summary = extract_from_summary(summary, created_at);
    if from_summary.is_empty() {
        (from_summary, ExtractionSource::None)
    } else {
        (from_summary, ExtractionSource::Summary)
    }
}

#[cfg(test)]
mod tests {
    use super::{Analyzer, ExtractionSource};
    use crate::error::AppError;
    use crate::inference::{Mood, Sentiment, SentimentClassifier, Summarizer};
    use std::cell::RefCell;

    struct FixedSummarizer {
        summary: &'static str,
        seen: RefCell<Vec<String>>,
    }

    impl FixedSummarizer {
        fn new(summary: &'static str) -> Self {
            Self {
                summary,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Summarizer for FixedSummarizer {
        fn summarize(&self, text: &str) -> Result<String, AppError> {
            self.seen.borrow_mut().push(text.to_string());
            Ok(self.summary.to_string())
        }
    }

    struct FixedClassifier(&'static str, f64);

    impl SentimentClassifier for FixedClassifier {
        fn classify(&self, _text: &str) -> Result<Sentiment, AppError> {
            Ok(Sentiment {
                label: self.0.to_string(),
                confidence: self.1,
            })
        }
    }

    struct FailingSummarizer;

    impl Summarizer for FailingSummarizer {
        fn summarize(&self, _text: &str) -> Result<String, AppError> {
            Err(AppError::inference("model unavailable"))
        }
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn chat_tasks_win_over_summary_tasks() {
        let summarizer = FixedSummarizer::new("Alex will buy milk.");
        let classifier = FixedClassifier("positive", 0.9);
        let analyzer = Analyzer::new(&summarizer, &classifier);

        let analysis = analyzer
            .analyze(&lines(&["Sam: I'll pay the rent on Friday", "Alex: cool"]))
            .unwrap();

        assert_eq!(analysis.source, ExtractionSource::Chat);
        assert_eq!(analysis.tasks.len(), 1);
        assert_eq!(analysis.tasks[0].person, "Sam");
        assert_eq!(analysis.mood, Mood::Positive);
        assert_eq!(
            summarizer.seen.borrow().as_slice(),
            ["Sam: I'll pay the rent on Friday Alex: cool"]
        );
    }

    #[test]
    fn questions_only_fall_back_to_summary() {
        let summarizer = FixedSummarizer::new("  Sam agreed to clean the bathroom.  ");
        let classifier = FixedClassifier("negative", 0.6);
        let analyzer = Analyzer::new(&summarizer, &classifier);

        let analysis = analyzer
            .analyze(&lines(&["Who is cleaning?", "Sam: maybe me?"]))
            .unwrap();

        assert_eq!(analysis.summary, "Sam agreed to clean the bathroom.");
        assert_eq!(analysis.source, ExtractionSource::Summary);
        assert_eq!(analysis.tasks.len(), 1);
        assert_eq!(analysis.tasks[0].description, "clean the bathroom");
        assert_eq!(analysis.mood, Mood::Neutral);
    }

    #[test]
    fn nothing_found_anywhere() {
        let summarizer = FixedSummarizer::new("They chatted about the weather.");
        let classifier = FixedClassifier("neutral", 0.9);
        let analyzer = Analyzer::new(&summarizer, &classifier);

        let analysis = analyzer.analyze(&lines(&["Nice day", "Yes"])).unwrap();

        assert_eq!(analysis.source, ExtractionSource::None);
        assert!(analysis.tasks.is_empty());
    }

    #[test]
    fn empty_transcript_is_input_error() {
        let summarizer = FixedSummarizer::new("unused");
        let classifier = FixedClassifier("neutral", 0.9);
        let analyzer = Analyzer::new(&summarizer, &classifier);

        let err = analyzer.analyze(&[]).unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(summarizer.seen.borrow().is_empty());
    }

    #[test]
    fn inference_failure_aborts_analysis() {
        let classifier = FixedClassifier("neutral", 0.9);
        let analyzer = Analyzer::new(&FailingSummarizer, &classifier);

        let err = analyzer
            .analyze(&lines(&["Sam: I'll pay the rent"]))
            .unwrap_err();

        assert_eq!(err.code(), "inference_error");
    }
}
