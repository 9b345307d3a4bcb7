use crate::{
    reminder::send_due_reminders::{SendDueRemindersUseCase, UseCaseError},
    shared::usecase::execute,
};
use actix_web::rt::time::sleep;
use remind_bot_infra::RemindBotContext;
use std::time::Duration;
use tracing::{debug, warn};

/// Triggers a sweep at every time of the configured `SweepSchedule`
pub fn start_send_reminders_job(ctx: RemindBotContext) {
    actix_web::rt::spawn(async move {
        loop {
            let now = ctx.sys.get_timestamp_millis();
            let millis_to_next_run = ctx.config.sweep_schedule.millis_until_next_run(now);
            sleep(Duration::from_millis(millis_to_next_run.max(0) as u64)).await;

            // A slow sweep must not delay the next trigger
            actix_web::rt::spawn(send_due_reminders(ctx.clone()));
        }
    });
}

pub async fn send_due_reminders(ctx: RemindBotContext) {
    match execute(SendDueRemindersUseCase, &ctx).await {
        Ok(report) => debug!("Scheduled sweep done: {:?}", report),
        Err(UseCaseError::SweepInProgress) => {
            warn!("Skipping reminder sweep because the previous one is still running")
        }
        Err(UseCaseError::StorageError(report)) => {
            warn!("Reminder sweep stopped early: {:?}", report)
        }
    }
}
