mod inmemory;
mod sqlite;

use futures::stream::BoxStream;
pub use inmemory::InMemoryReminderRepo;
use remind_bot_domain::{FailedAttempt, NewReminder, Reminder, ID};
pub use sqlite::SqliteReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Creates the backing table if it does not exist yet
    async fn initialize(&self) -> anyhow::Result<()>;
    /// Stores a new undelivered `Reminder` and returns it with its assigned `ID`
    async fn insert(&self, reminder: &NewReminder) -> anyhow::Result<Reminder>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Single scan over all undelivered reminders that are not dead lettered.
    ///
    /// The stream has to be consumed or dropped before writing to the repo again.
    fn pending(&self) -> BoxStream<'_, anyhow::Result<Reminder>>;
    /// Marking an already delivered or a dead lettered `Reminder` is a noop
    async fn mark_delivered(&self, reminder_id: &ID) -> anyhow::Result<()>;
    /// Has no effect on delivered reminders
    async fn record_failed_attempt(
        &self,
        reminder_id: &ID,
        attempt: &FailedAttempt,
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use crate::RemindBotContext;
    use futures::TryStreamExt;
    use remind_bot_domain::{FailedAttempt, NewReminder, ID};

    async fn create_contexts() -> Vec<RemindBotContext> {
        let sqlite = RemindBotContext::create_sqlite_inmemory()
            .await
            .expect("To create sqlite context");
        vec![RemindBotContext::create_inmemory(), sqlite]
    }

    fn new_reminder(user_number: &str, due_at: i64) -> NewReminder {
        NewReminder {
            created: 100,
            user_number: user_number.into(),
            business_number: "106540352242922".into(),
            user_name: "Kacha".into(),
            text: "remind me".into(),
            due_at,
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.reminders;
            let first = repo.insert(&new_reminder("1", 100)).await.unwrap();
            let second = repo.insert(&new_reminder("2", 200)).await.unwrap();
            assert!(second.id > first.id);
            assert!(!first.delivered);

            let found = repo.find(&first.id).await.unwrap();
            assert_eq!(found, first);
            assert!(repo.find(&ID::new(second.id.inner() + 1)).await.is_none());
        }
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.reminders;
            let reminder = repo.insert(&new_reminder("1", 100)).await.unwrap();
            assert!(repo.initialize().await.is_ok());
            assert!(repo.find(&reminder.id).await.is_some());
        }
    }

    #[tokio::test]
    async fn pending_only_returns_undelivered() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.reminders;
            let delivered = repo.insert(&new_reminder("1", 100)).await.unwrap();
            let pending = repo.insert(&new_reminder("2", 100)).await.unwrap();
            let dead = repo.insert(&new_reminder("3", 100)).await.unwrap();
            repo.mark_delivered(&delivered.id).await.unwrap();
            repo.record_failed_attempt(
                &dead.id,
                &FailedAttempt {
                    attempts: 1,
                    next_attempt_at: 200,
                    dead_letter: true,
                },
            )
            .await
            .unwrap();

            let reminders: Vec<_> = repo.pending().try_collect().await.unwrap();
            assert_eq!(reminders.len(), 1);
            assert_eq!(reminders[0].id, pending.id);
        }
    }

    #[tokio::test]
    async fn mark_delivered_is_idempotent() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.reminders;
            let reminder = repo.insert(&new_reminder("1", 100)).await.unwrap();

            repo.mark_delivered(&reminder.id).await.unwrap();
            let once = repo.find(&reminder.id).await.unwrap();
            repo.mark_delivered(&reminder.id).await.unwrap();
            let twice = repo.find(&reminder.id).await.unwrap();

            assert!(once.delivered);
            assert_eq!(once, twice);
        }
    }

    #[tokio::test]
    async fn record_failed_attempt() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.reminders;
            let reminder = repo.insert(&new_reminder("1", 100)).await.unwrap();
            let attempt = FailedAttempt {
                attempts: 1,
                next_attempt_at: 5000,
                dead_letter: false,
            };
            repo.record_failed_attempt(&reminder.id, &attempt)
                .await
                .unwrap();

            let reminder = repo.find(&reminder.id).await.unwrap();
            assert_eq!(reminder.delivery_attempts, 1);
            assert_eq!(reminder.next_attempt_at, Some(5000));
            assert!(!reminder.dead_lettered);
            assert!(!reminder.delivered);

            // Delivered reminders are left alone
            repo.mark_delivered(&reminder.id).await.unwrap();
            repo.record_failed_attempt(
                &reminder.id,
                &FailedAttempt {
                    attempts: 2,
                    next_attempt_at: 9000,
                    dead_letter: true,
                },
            )
            .await
            .unwrap();
            let reminder = repo.find(&reminder.id).await.unwrap();
            assert!(reminder.delivered);
            assert!(!reminder.dead_lettered);
            assert_eq!(reminder.delivery_attempts, 1);
        }
    }

    #[tokio::test]
    async fn dead_lettered_reminder_is_never_marked_delivered() {
        for ctx in create_contexts().await {
            let repo = &ctx.repos.reminders;
            let reminder = repo.insert(&new_reminder("1", 100)).await.unwrap();
            repo.record_failed_attempt(
                &reminder.id,
                &FailedAttempt {
                    attempts: 1,
                    next_attempt_at: 5000,
                    dead_letter: true,
                },
            )
            .await
            .unwrap();

            repo.mark_delivered(&reminder.id).await.unwrap();
            let reminder = repo.find(&reminder.id).await.unwrap();
            assert!(reminder.dead_lettered);
            assert!(!reminder.delivered);
        }
    }
}
