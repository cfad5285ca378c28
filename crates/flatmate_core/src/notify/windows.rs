use crate::error::AppError;
use crate::notify::{Notifier, Reminder, desktop_message};
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, pending: &[Reminder]) -> Result<(), AppError> {
        let Some((title, body)) = desktop_message(pending) else {
            return Ok(());
        };

        let mut lines = body.lines();
        let first = lines.next().unwrap_or_default();
        let rest = lines.collect::<Vec<_>>().join("\n");

        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(&title)
            .text1(first)
            .text2(&rest)
            .show()
            .map_err(|err| AppError::io(err.to_string()))
    }
}
