use crate::shared::usecase::UseCase;
use futures::StreamExt;
use remind_bot_domain::ID;
use remind_bot_infra::RemindBotContext;
use tracing::{error, info, warn};

/// Sends every pending `Reminder` that is due and marks the delivered ones.
///
/// A `Reminder` is only marked as delivered after the messaging provider
/// accepted it. All writes happen after the scan over pending reminders
/// has finished.
#[derive(Debug)]
pub struct SendDueRemindersUseCase;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Pending reminders looked at
    pub scanned: usize,
    /// Pending reminders that were not due yet or still backing off
    pub skipped: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Failed reminders that will not be retried anymore
    pub dead_lettered: usize,
    /// Writes that could not be committed
    pub storage_errors: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    /// Another sweep is still running
    SweepInProgress,
    /// Reading pending reminders failed part way. The reminders sent
    /// before the failure have been handled.
    StorageError(SweepReport),
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = SweepReport;

    type Error = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &RemindBotContext) -> Result<Self::Response, Self::Error> {
        let _sweep_guard = ctx
            .sweep_lock
            .try_lock()
            .map_err(|_| UseCaseError::SweepInProgress)?;

        let now = ctx.sys.get_timestamp_millis();
        let mut report = SweepReport::default();
        let mut delivered: Vec<ID> = Vec::new();
        // Id and number of previous attempts
        let mut failed: Vec<(ID, i64)> = Vec::new();
        let mut scan_failed = false;

        {
            let mut pending = ctx.repos.reminders.pending();
            while let Some(reminder) = pending.next().await {
                let reminder = match reminder {
                    Ok(reminder) => reminder,
                    Err(e) => {
                        error!("Unable to read pending reminders: {:?}", e);
                        scan_failed = true;
                        break;
                    }
                };
                report.scanned += 1;

                if !reminder.is_eligible(now) {
                    report.skipped += 1;
                    continue;
                }

                match ctx
                    .notifier
                    .send(
                        &reminder.business_number,
                        &reminder.user_number,
                        &reminder.text,
                    )
                    .await
                {
                    Ok(()) => delivered.push(reminder.id),
                    Err(e) => {
                        warn!("Unable to deliver reminder {}: {}", reminder.id, e);
                        failed.push((reminder.id, reminder.delivery_attempts));
                    }
                }
            }
        }

        for reminder_id in delivered {
            match ctx.repos.reminders.mark_delivered(&reminder_id).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    error!(
                        "Reminder {} was sent but could not be marked as delivered: {:?}",
                        reminder_id, e
                    );
                    report.storage_errors += 1;
                }
            }
        }

        for (reminder_id, previous_attempts) in failed {
            report.failed += 1;
            let attempt = ctx.config.retry_policy.on_failure(previous_attempts, now);
            if let Err(e) = ctx
                .repos
                .reminders
                .record_failed_attempt(&reminder_id, &attempt)
                .await
            {
                error!(
                    "Unable to record failed delivery of reminder {}: {:?}",
                    reminder_id, e
                );
                report.storage_errors += 1;
                continue;
            }
            if attempt.dead_letter {
                error!(
                    "Giving up on reminder {} after {} failed delivery attempts",
                    reminder_id, attempt.attempts
                );
                report.dead_lettered += 1;
            }
        }

        if scan_failed {
            return Err(UseCaseError::StorageError(report));
        }

        info!("Sweep finished: {:?}", report);
        Ok(report)
    }
}
