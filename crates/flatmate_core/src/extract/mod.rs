//! Turning chat transcripts into pending ledger records.
//!
//! Both passes are best effort: input that matches nothing simply yields no
//! records. Deciding when the summary pass runs is up to the caller.

mod chat;
mod summary;

pub use chat::{COMMITMENT_RULES, CommitmentRule, extract_from_chat, normalize_contractions};
pub use summary::extract_from_summary;
