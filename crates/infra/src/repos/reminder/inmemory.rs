use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use futures::stream::{self, BoxStream, StreamExt};
use remind_bot_domain::{FailedAttempt, NewReminder, Reminder, ID};
use std::sync::atomic::{AtomicI64, Ordering};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
    last_id: AtomicI64,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(Vec::new()),
            last_id: AtomicI64::new(0),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn initialize(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert(&self, reminder: &NewReminder) -> anyhow::Result<Reminder> {
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let reminder = reminder.clone().into_reminder(ID::new(id));
        insert(&reminder, &self.reminders);
        Ok(reminder)
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    fn pending(&self) -> BoxStream<'_, anyhow::Result<Reminder>> {
        let pending = find_by(&self.reminders, |r| !r.delivered && !r.dead_lettered);
        stream::iter(pending.into_iter().map(Ok)).boxed()
    }

    async fn mark_delivered(&self, reminder_id: &ID) -> anyhow::Result<()> {
        update(reminder_id, &self.reminders, |r| {
            r.mark_delivered();
        });
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        reminder_id: &ID,
        attempt: &FailedAttempt,
    ) -> anyhow::Result<()> {
        update(reminder_id, &self.reminders, |r| r.record_failed_attempt(attempt));
        Ok(())
    }
}
