use crate::config::Config;
use crate::error::AppError;
use crate::model::{TaskRecord, timestamp_now};
use crate::storage::json_store;
use std::path::{Path, PathBuf};

/// The persisted, ordered list of commitments.
///
/// Every mutation reloads the file, changes it in memory and rewrites it in
/// full. There is no locking: two writers racing each other lose updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn open(config: &Config) -> Result<Self, AppError> {
        Ok(Self::at(json_store::ledger_path(config)?))
    }

    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<TaskRecord>, AppError> {
        json_store::load_tasks(&self.path)
    }

    pub fn save(&self, records: &[TaskRecord]) -> Result<(), AppError> {
        json_store::save_tasks(&self.path, records)
    }

    pub fn pending(&self) -> Result<Vec<TaskRecord>, AppError> {
        Ok(self
            .load()?
            .into_iter()
            .filter(TaskRecord::is_pending)
            .collect())
    }

    /// Adds `new_records` after the existing ones and returns how many were added.
    pub fn append(&self, new_records: &[TaskRecord]) -> Result<usize, AppError> {
        if new_records.is_empty() {
            return Ok(0);
        }

        let mut records = self.load()?;
        records.extend_from_slice(new_records);
        self.save(&records)?;

        tracing::info!(
            added = new_records.len(),
            total = records.len(),
            path = %self.path.display(),
            "appended tasks to ledger"
        );
        Ok(new_records.len())
    }

    /// Marks every pending record for `person` whose description contains
    /// `keyword` as done. Both comparisons ignore case.
    pub fn mark_done(&self, person: &str, keyword: &str) -> Result<bool, AppError> {
        if person.trim().is_empty() {
            return Err(AppError::invalid_input("person is required"));
        }
        if keyword.trim().is_empty() {
            return Err(AppError::invalid_input("keyword is required"));
        }

        let wanted_person = person.trim().to_lowercase();
        let wanted_keyword = keyword.to_lowercase();
        let mut records = self.load()?;
        let completed_at = timestamp_now()?;
        let mut updated = 0usize;

        for record in &mut records {
            if record.is_pending()
                && record.person.to_lowercase() == wanted_person
                && record.description.to_lowercase().contains(&wanted_keyword)
            {
                record.mark_done(completed_at.clone());
                updated += 1;
            }
        }

        if updated == 0 {
            tracing::debug!(%person, %keyword, "no pending task matched");
            return Ok(false);
        }

        self.save(&records)?;
        tracing::info!(%person, %keyword, updated, "marked tasks as done");
        Ok(true)
    }
}
