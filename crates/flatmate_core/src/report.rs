use crate::analysis::Analysis;
use crate::error::AppError;
use crate::model::format_timestamp;
use std::path::{Path, PathBuf};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const FILE_STAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

/// Writes a plain-text record of an analyzed conversation into `dir` and
/// returns the new file's path.
pub fn save_summary_report(dir: &Path, analysis: &Analysis) -> Result<PathBuf, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    save_summary_report_at(dir, analysis, OffsetDateTime::now_utc().to_offset(offset))
}

fn save_summary_report_at(
    dir: &Path,
    analysis: &Analysis,
    moment: OffsetDateTime,
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir).map_err(|err| AppError::io(err.to_string()))?;

    let stamp = moment
        .format(FILE_STAMP_FORMAT)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    let path = dir.join(format!("flatmate_summary_{stamp}.txt"));
    let content = render_report(analysis, &format_timestamp(moment)?);

    std::fs::write(&path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    tracing::debug!(path = %path.display(), "saved summary report");
    Ok(path)
}

fn render_report(analysis: &Analysis, date: &str) -> String {
    format!(
        "Date: {date}\n\nMessages:\n{}\n\nSummary:\n{}\n\nMood: {}\n",
        analysis.lines.join("\n"),
        analysis.summary,
        analysis.mood
    )
}
