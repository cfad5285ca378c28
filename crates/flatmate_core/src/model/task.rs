use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Speaker name used when a chat line has no recognisable speaker prefix.
pub const UNKNOWN_PERSON: &str = "Unknown";

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// One commitment in the ledger.
///
/// Field names follow the on-disk format shared with the checklist viewer:
/// `task` holds the description, `created`/`completed` are `YYYY-MM-DD HH:MM`
/// strings in local time. `completed` is present only once the record is done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub person: String,
    #[serde(rename = "task")]
    pub description: String,
    pub status: TaskStatus,
    #[serde(rename = "created")]
    pub created_at: String,
    #[serde(
        rename = "completed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Done,
}

impl TaskRecord {
    pub fn pending<P: Into<String>, D: Into<String>>(
        person: P,
        description: D,
        created_at: String,
    ) -> Self {
        Self {
            person: person.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            created_at,
            completed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn mark_done(&mut self, completed_at: String) {
        self.status = TaskStatus::Done;
        self.completed_at = Some(completed_at);
    }
}

pub fn format_timestamp(moment: OffsetDateTime) -> Result<String, AppError> {
    moment
        .format(TIMESTAMP_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Current local time in ledger format, falling back to UTC when the local
/// offset cannot be determined.
pub fn timestamp_now() -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    format_timestamp(OffsetDateTime::now_utc().to_offset(offset))
}
