use crate::model::{TaskRecord, UNKNOWN_PERSON};
use regex::Regex;
use std::sync::LazyLock;

/// A commitment verb and the words that must directly precede it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitmentRule {
    pub triggers: &'static [&'static str],
    pub verb: &'static str,
}

const TRIGGERS: &[&str] = &["will", "can", "to"];

/// Evaluated top to bottom; the first rule that matches a line wins.
pub const COMMITMENT_RULES: &[CommitmentRule] = &[
    CommitmentRule { triggers: TRIGGERS, verb: "pay" },
    CommitmentRule { triggers: TRIGGERS, verb: "buy" },
    CommitmentRule { triggers: TRIGGERS, verb: "clean" },
    CommitmentRule { triggers: TRIGGERS, verb: "cook" },
    CommitmentRule { triggers: TRIGGERS, verb: "fix" },
    CommitmentRule { triggers: TRIGGERS, verb: "call" },
    CommitmentRule { triggers: TRIGGERS, verb: "collect" },
    CommitmentRule { triggers: TRIGGERS, verb: "arrange" },
    CommitmentRule { triggers: TRIGGERS, verb: "handle" },
    CommitmentRule { triggers: TRIGGERS, verb: "book" },
    CommitmentRule { triggers: TRIGGERS, verb: "water" },
    CommitmentRule { triggers: TRIGGERS, verb: "organize" },
    CommitmentRule { triggers: TRIGGERS, verb: "manage" },
    CommitmentRule { triggers: TRIGGERS, verb: "repair" },
    CommitmentRule { triggers: TRIGGERS, verb: "wash" },
    CommitmentRule { triggers: TRIGGERS, verb: "prepare" },
    CommitmentRule { triggers: TRIGGERS, verb: "take care" },
    CommitmentRule { triggers: TRIGGERS, verb: "bring" },
];

const CONTRACTIONS: &[(&str, &str)] = &[
    (r"(?i)\b(i|we|you|he|she|they)['’]ll\b", "$1 will"),
    (r"(?i)\bwon['’]t\b", "will not"),
    (r"(?i)\bcan['’]t\b", "cannot"),
    (r"(?i)\bgonna\b", "going to"),
    (r"(?i)\bwanna\b", "want to"),
];

static SPEAKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][a-zA-Z]*)(?:\s*[:\-]\s*|\s+|$)(.*)$").expect("valid speaker regex")
});

static CONTRACTION_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    CONTRACTIONS
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("valid contraction regex"),
                *replacement,
            )
        })
        .collect()
});

struct CompiledRule {
    verb: &'static str,
    commitment: Regex,
    occurrence: Regex,
}

static COMPILED_RULES: LazyLock<Vec<CompiledRule>> = LazyLock::new(|| {
    COMMITMENT_RULES
        .iter()
        .map(|rule| {
            let verb = verb_pattern(rule.verb);
            let triggers = rule
                .triggers
                .iter()
                .map(|trigger| regex::escape(trigger))
                .collect::<Vec<_>>()
                .join("|");
            CompiledRule {
                verb: rule.verb,
                commitment: Regex::new(&format!(r"(?i)\b(?:{triggers})\s+{verb}\b"))
                    .expect("valid commitment regex"),
                occurrence: Regex::new(&format!(r"(?i)\b{verb}\b")).expect("valid verb regex"),
            }
        })
        .collect()
});

fn verb_pattern(verb: &str) -> String {
    verb.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Expands the informal contractions that would otherwise hide a trigger
/// word, e.g. "I'll pay" becomes "I will pay".
pub fn normalize_contractions(text: &str) -> String {
    CONTRACTION_RES
        .iter()
        .fold(text.to_string(), |current, (re, replacement)| {
            re.replace_all(&current, *replacement).into_owned()
        })
}

fn split_speaker(line: &str) -> (&str, &str) {
    match SPEAKER_RE.captures(line) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(person), Some(content)) => (person.as_str(), content.as_str()),
            _ => (UNKNOWN_PERSON, line),
        },
        None => (UNKNOWN_PERSON, line),
    }
}

fn describe(content: &str) -> Option<String> {
    let rule = COMPILED_RULES
        .iter()
        .find(|rule| rule.commitment.is_match(content))?;
    let occurrence = rule.occurrence.find(content)?;
    let rest = content[occurrence.end()..].trim();

    if rest.is_empty() {
        Some(rule.verb.to_string())
    } else {
        Some(format!("{} {}", rule.verb, rest))
    }
}

/// Produces at most one pending record per line, in line order.
pub fn extract_from_chat<S: AsRef<str>>(lines: &[S], created_at: &str) -> Vec<TaskRecord> {
    let mut records = Vec::new();

    for line in lines {
        let (person, content) = split_speaker(line.as_ref());
        let content = normalize_contractions(content);
        if let Some(description) = describe(&content) {
            records.push(TaskRecord::pending(
                person,
                description,
                created_at.to_string(),
            ));
        }
    }

    tracing::debug!(
        lines = lines.len(),
        records = records.len(),
        "extracted tasks from chat"
    );
    records
}

#[cfg(test)]
mod tests {
    use super::{COMMITMENT_RULES, extract_from_chat, normalize_contractions, split_speaker};
    use crate::model::{TaskStatus, UNKNOWN_PERSON};

    const NOW: &str = "2025-12-20 09:30";

    #[test]
    fn speaker_line_with_contraction_yields_record() {
        let records = extract_from_chat(&["Sam: I'll pay the rent on Friday"], NOW);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person, "Sam");
        assert_eq!(records[0].description, "pay the rent on Friday");
        assert_eq!(records[0].status, TaskStatus::Pending);
        assert_eq!(records[0].created_at, NOW);
        assert_eq!(records[0].completed_at, None);
    }

    #[test]
    fn verb_without_trigger_yields_nothing() {
        let records = extract_from_chat(&["Did Sam clean? Not sure"], NOW);
        assert!(records.is_empty());
    }

    #[test]
    fn first_rule_in_table_order_wins() {
        let records = extract_from_chat(&["Alex - I will clean up, then I can buy soap"], NOW);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person, "Alex");
        assert_eq!(records[0].description, "buy soap");
    }

    #[test]
    fn line_without_speaker_is_attributed_to_unknown() {
        let records = extract_from_chat(&["someone needs to water the plants"], NOW);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person, UNKNOWN_PERSON);
        assert_eq!(records[0].description, "water the plants");
    }

    #[test]
    fn leading_pronoun_contraction_is_not_a_speaker() {
        let records = extract_from_chat(&["I'll book the plumber"], NOW);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].person, UNKNOWN_PERSON);
        assert_eq!(records[0].description, "book the plumber");
    }

    #[test]
    fn multi_word_verb_matches() {
        let records = extract_from_chat(&["Jo: we will take  care of the bins"], NOW);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "take care of the bins");
    }

    #[test]
    fn verb_alone_at_end_of_line() {
        let records = extract_from_chat(&["Mia: fine, I will cook"], NOW);
        assert_eq!(records[0].description, "cook");
    }

    #[test]
    fn verb_must_be_a_whole_word() {
        let records = extract_from_chat(&["Sam: I want to payback everyone"], NOW);
        assert!(records.is_empty());
    }

    #[test]
    fn trigger_must_be_a_whole_word() {
        let records = extract_from_chat(&["Sam: the toto pay scheme"], NOW);
        assert!(records.is_empty());
    }

    #[test]
    fn negated_contraction_does_not_commit() {
        let records = extract_from_chat(&["Sam: I won't pay for that", "Kim: can't fix it"], NOW);
        assert!(records.is_empty());
    }

    #[test]
    fn output_never_exceeds_input_and_is_repeatable() {
        let lines = vec![
            "Sam: I'll pay the rent and buy milk".to_string(),
            "Are we out of milk?".to_string(),
            "Alex: gonna call the landlord".to_string(),
            "Kim: ok".to_string(),
        ];

        let first = extract_from_chat(&lines, NOW);
        let second = extract_from_chat(&lines, NOW);

        assert!(first.len() <= lines.len());
        assert_eq!(first, second);
        let described: Vec<(&str, &str)> = first
            .iter()
            .map(|record| (record.person.as_str(), record.description.as_str()))
            .collect();
        assert_eq!(
            described,
            vec![
                ("Sam", "pay the rent and buy milk"),
                ("Alex", "call the landlord"),
            ]
        );
    }

    #[test]
    fn normalize_contractions_preserves_pronoun_case() {
        assert_eq!(normalize_contractions("I'll go"), "I will go");
        assert_eq!(normalize_contractions("i’ll go"), "i will go");
        assert_eq!(normalize_contractions("They'll go"), "They will go");
        assert_eq!(normalize_contractions("won't"), "will not");
        assert_eq!(normalize_contractions("Gonna"), "going to");
    }

    #[test]
    fn split_speaker_accepts_separators() {
        assert_eq!(split_speaker("Sam: hi"), ("Sam", "hi"));
        assert_eq!(split_speaker("Sam - hi"), ("Sam", "hi"));
        assert_eq!(split_speaker("Sam-hi"), ("Sam", "hi"));
        assert_eq!(split_speaker("Sam"), ("Sam", ""));
        assert_eq!(split_speaker("sam: hi"), (UNKNOWN_PERSON, "sam: hi"));
    }

    #[test]
    fn rule_table_keeps_reference_order() {
        let verbs: Vec<&str> = COMMITMENT_RULES.iter().map(|rule| rule.verb).collect();
        assert_eq!(verbs.first(), Some(&"pay"));
        assert_eq!(verbs.last(), Some(&"bring"));
        assert_eq!(verbs.len(), 18);
        assert!(
            COMMITMENT_RULES
                .iter()
                .all(|rule| rule.triggers == ["will", "can", "to"])
        );
    }
}
