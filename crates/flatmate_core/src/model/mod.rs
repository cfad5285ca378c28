mod task;

pub use task::{TaskRecord, TaskStatus, UNKNOWN_PERSON, format_timestamp, timestamp_now};
