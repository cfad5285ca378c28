use crate::config::Config;
use crate::error::AppError;
use crate::model::TaskRecord;
use std::path::{Path, PathBuf};

const LEDGER_FILE_NAME: &str = "tasks.json";
const LEDGER_ENV_VAR: &str = "FLATMATE_LEDGER_PATH";
const DATA_DIR_ENV_VAR: &str = "FLATMATE_DATA_DIR";

/// Directory holding the ledger and the saved conversation summaries.
pub fn data_dir(config: &Config) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(DATA_DIR_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(dir) = config.data_dir.as_ref() {
        return Ok(dir.clone());
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("flatmate"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("flatmate"))
    }
}

pub fn ledger_path(config: &Config) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(LEDGER_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(data_dir(config)?.join(LEDGER_FILE_NAME))
}

/// Reads every record in insertion order. A missing file is an empty ledger.
pub fn load_tasks(path: &Path) -> Result<Vec<TaskRecord>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid ledger in {}: {}", path.display(), err))
    })
}

/// Replaces the ledger with exactly `tasks`.
///
/// The content goes to a sibling temp file first and is then renamed over
/// the ledger, so readers see either the old or the new file.
pub fn save_tasks(path: &Path, tasks: &[TaskRecord]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(tasks)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;
    let staging = staging_path(path);
    std::fs::write(&staging, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&staging, permissions)
            .map_err(|err| AppError::io(err.to_string()))?;
    }

    std::fs::rename(&staging, path).map_err(|err| {
        std::fs::remove_file(&staging).ok();
        AppError::io(err.to_string())
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| LEDGER_FILE_NAME.into());
    name.push(".tmp");
    path.with_file_name(name)
}
