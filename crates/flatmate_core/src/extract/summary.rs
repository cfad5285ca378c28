use crate::model::TaskRecord;
use regex::Regex;
use std::sync::LazyLock;

static SUMMARY_COMMITMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-z]+)\s(?:will|to|can|promised to|agreed to)\s([^.!?]+)")
        .expect("valid summary commitment regex")
});

/// Looser pass over a narrative summary: every `<Name> will|to|can|promised
/// to|agreed to <clause>` match becomes a record, duplicates included.
pub fn extract_from_summary(summary: &str, created_at: &str) -> Vec<TaskRecord> {
    let records: Vec<TaskRecord> = SUMMARY_COMMITMENT_RE
        .captures_iter(summary)
        .filter_map(|caps| {
            let person = caps.get(1)?.as_str().trim();
            let clause = caps.get(2)?.as_str().trim();
            if clause.is_empty() {
                return None;
            }
            Some(TaskRecord::pending(person, clause, created_at.to_string()))
        })
        .collect();

    tracing::debug!(records = records.len(), "extracted tasks from summary");
    records
}
