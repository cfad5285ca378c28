use crate::config::Config;
use crate::error::AppError;
use crate::ledger::Ledger;
use crate::notify::{Notifier, Reminder};
use std::time::{Duration, Instant};

const MIN_POLL: Duration = Duration::from_millis(1);

/// Periodically reports the ledger's pending tasks. It never writes to the
/// ledger and holds nothing open between sweeps.
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    ledger: Ledger,
    period: Duration,
    poll: Duration,
}

impl ReminderScheduler {
    /// The period is never shorter than the poll interval, so consecutive
    /// sweeps are always separated by a sleep.
    pub fn new(ledger: Ledger, period: Duration, poll: Duration) -> Self {
        let poll = poll.max(MIN_POLL);
        Self {
            ledger,
            period: period.max(poll),
            poll,
        }
    }

    pub fn from_config(ledger: Ledger, config: &Config) -> Self {
        Self::new(ledger, config.reminder_interval(), config.poll_interval())
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// One load-filter-notify pass. Returns how many tasks were pending.
    pub fn sweep(&self, notifier: &dyn Notifier) -> Result<usize, AppError> {
        let pending: Vec<Reminder> = self.ledger.pending()?.iter().map(Reminder::from).collect();
        tracing::info!(pending = pending.len(), "reminder sweep");

        if let Err(err) = notifier.notify(&pending) {
            tracing::warn!(error = %err, "failed to deliver reminders");
        }
        Ok(pending.len())
    }

    /// Sweeps now, then every `period`, until `should_stop` returns true.
    /// `should_stop` is checked once per poll, between sweeps.
    pub fn run_until<F>(&self, notifier: &dyn Notifier, mut should_stop: F) -> Result<(), AppError>
    where
        F: FnMut() -> bool,
    {
        self.sweep(notifier)?;
        let mut last_sweep = Instant::now();

        loop {
            if should_stop() {
                tracing::debug!("reminder scheduler stopped");
                return Ok(());
            }

            if last_sweep.elapsed() >= self.period {
                self.sweep(notifier)?;
                last_sweep = Instant::now();
                continue;
            }

            let remaining = self.period.saturating_sub(last_sweep.elapsed());
            std::thread::sleep(self.poll.min(remaining));
        }
    }

    /// Runs until the process is stopped or the ledger becomes unreadable.
    pub fn run(&self, notifier: &dyn Notifier) -> Result<(), AppError> {
        self.run_until(notifier, || false)
    }
}
