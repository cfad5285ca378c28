use crate::error::AppError;
use crate::notify::{Notifier, Reminder, desktop_message};
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, pending: &[Reminder]) -> Result<(), AppError> {
        let Some((title, body)) = desktop_message(pending) else {
            return Ok(());
        };

        Notification::new()
            .appname("flatmate")
            .summary(&title)
            .body(&body)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
