use crate::config::Config;
use crate::error::AppError;
use crate::model::TaskRecord;
use std::io::Write;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

const DISABLE_ENV_VAR: &str = "FLATMATE_DISABLE_NOTIFICATIONS";
const DESKTOP_PREVIEW_LIMIT: usize = 3;

/// What a reminder reports about one pending task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub person: String,
    pub description: String,
    pub created: String,
}

impl From<&TaskRecord> for Reminder {
    fn from(record: &TaskRecord) -> Self {
        Self {
            person: record.person.clone(),
            description: record.description.clone(),
            created: record.created_at.clone(),
        }
    }
}

/// Receives the pending tasks found by one reminder sweep.
pub trait Notifier {
    fn notify(&self, pending: &[Reminder]) -> Result<(), AppError>;
}

impl<F> Notifier for F
where
    F: Fn(&[Reminder]) -> Result<(), AppError>,
{
    fn notify(&self, pending: &[Reminder]) -> Result<(), AppError> {
        self(pending)
    }
}

pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn render(pending: &[Reminder]) -> String {
        if pending.is_empty() {
            return "All tasks complete.\n".to_string();
        }

        let mut out = String::from("Pending tasks:\n");
        for reminder in pending {
            out.push_str(&format!(
                "- {}: {} (added {})\n",
                reminder.person, reminder.description, reminder.created
            ));
        }
        out
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, pending: &[Reminder]) -> Result<(), AppError> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "\n{}", Self::render(pending))
            .map_err(|err| AppError::io(err.to_string()))?;
        stdout.flush().map_err(|err| AppError::io(err.to_string()))
    }
}

/// Sends each sweep to every member. A failing member does not stop the
/// others; the first error is returned once all have run.
#[derive(Default)]
pub struct CompositeNotifier {
    members: Vec<Box<dyn Notifier>>,
}

impl CompositeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.members.push(notifier);
        self
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Notifier for CompositeNotifier {
    fn notify(&self, pending: &[Reminder]) -> Result<(), AppError> {
        let mut first_error = None;
        for member in &self.members {
            if let Err(err) = member.notify(pending) {
                tracing::warn!(error = %err, "notifier failed");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Console output always; desktop notifications when enabled in config and
/// supported on this platform.
pub fn notifier_from_config(config: &Config) -> Result<Box<dyn Notifier>, AppError> {
    let composite = CompositeNotifier::new().with(Box::new(ConsoleNotifier));

    if !config.desktop_notifications || std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Ok(Box::new(composite));
    }

    match platform_notifier() {
        Ok(desktop) => Ok(Box::new(composite.with(desktop))),
        Err(AppError::InvalidData(message)) => {
            tracing::warn!(%message, "desktop notifications unavailable");
            Ok(Box::new(composite))
        }
        Err(other) => Err(other),
    }
}

/// Title and body for a desktop popup, or `None` when nothing is pending.
pub fn desktop_message(pending: &[Reminder]) -> Option<(String, String)> {
    if pending.is_empty() {
        return None;
    }

    let title = match pending.len() {
        1 => "1 pending flat task".to_string(),
        count => format!("{count} pending flat tasks"),
    };
    let mut lines: Vec<String> = pending
        .iter()
        .take(DESKTOP_PREVIEW_LIMIT)
        .map(|reminder| format!("{}: {}", reminder.person, reminder.description))
        .collect();
    if pending.len() > DESKTOP_PREVIEW_LIMIT {
        lines.push(format!("and {} more", pending.len() - DESKTOP_PREVIEW_LIMIT));
    }

    Some((title, lines.join("\n")))
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::{CompositeNotifier, ConsoleNotifier, Notifier, Reminder, desktop_message};
    use crate::error::AppError;
    use crate::model::TaskRecord;
    use std::cell::Cell;
    use std::rc::Rc;

    fn reminder(person: &str, description: &str) -> Reminder {
        Reminder::from(&TaskRecord::pending(
            person,
            description,
            "2025-12-20 09:30".to_string(),
        ))
    }

    #[test]
    fn console_render_lists_pending() {
        let rendered =
            ConsoleNotifier::render(&[reminder("Sam", "pay the rent"), reminder("Alex", "buy milk")]);

        assert_eq!(
            rendered,
            "Pending tasks:\n- Sam: pay the rent (added 2025-12-20 09:30)\n- Alex: buy milk (added 2025-12-20 09:30)\n"
        );
    }

    #[test]
    fn console_render_reports_all_clear() {
        assert_eq!(ConsoleNotifier::render(&[]), "All tasks complete.\n");
    }

    #[test]
    fn closures_are_notifiers() {
        let seen = Cell::new(0usize);
        let callback = |pending: &[Reminder]| -> Result<(), AppError> {
            seen.set(seen.get() + pending.len());
            Ok(())
        };

        callback.notify(&[reminder("Sam", "pay")]).unwrap();
        callback.notify(&[]).unwrap();

        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn empty_composite_succeeds() {
        let composite = CompositeNotifier::new();

        assert!(composite.is_empty());
        assert!(composite.notify(&[reminder("Sam", "pay")]).is_ok());
    }

    #[test]
    fn composite_runs_every_member_and_returns_first_error() {
        let calls = Rc::new(Cell::new(0usize));
        let first = Rc::clone(&calls);
        let last = Rc::clone(&calls);
        let composite = CompositeNotifier::new()
            .with(Box::new(move |_: &[Reminder]| -> Result<(), AppError> {
                first.set(first.get() + 1);
                Err(AppError::io("first broke"))
            }))
            .with(Box::new(|_: &[Reminder]| -> Result<(), AppError> {
                Err(AppError::io("second broke"))
            }))
            .with(Box::new(move |_: &[Reminder]| -> Result<(), AppError> {
                last.set(last.get() + 1);
                Ok(())
            }));

        let err = composite.notify(&[reminder("Sam", "pay")]).unwrap_err();

        assert!(!composite.is_empty());
        assert_eq!(composite.len(), 3);
        assert_eq!(calls.get(), 2);
        assert_eq!(err.message(), "first broke");
    }

    #[test]
    fn desktop_message_skips_empty_and_truncates() {
        assert!(desktop_message(&[]).is_none());

        let pending = vec![
            reminder("Sam", "pay the rent"),
            reminder("Alex", "buy milk"),
            reminder("Kim", "clean"),
            reminder("Jo", "cook"),
            reminder("Mia", "water plants"),
        ];
        let (title, body) = desktop_message(&pending).unwrap();

        assert_eq!(title, "5 pending flat tasks");
        assert_eq!(
            body,
            "Sam: pay the rent\nAlex: buy milk\nKim: clean\nand 2 more"
        );
    }

    #[test]
    fn desktop_message_singular_title() {
        let (title, body) = desktop_message(&[reminder("Sam", "pay the rent")]).unwrap();
        assert_eq!(title, "1 pending flat task");
        assert_eq!(body, "Sam: pay the rent");
    }
}
