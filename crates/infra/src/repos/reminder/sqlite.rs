use super::IReminderRepo;
use futures::stream::{BoxStream, StreamExt};
use remind_bot_domain::{FailedAttempt, NewReminder, Reminder, ID};
use sqlx::{FromRow, SqlitePool};
use tracing::error;

pub struct SqliteReminderRepo {
    pool: SqlitePool,
}

impl SqliteReminderRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    id: i64,
    date_created: i64,
    user_number: String,
    business_number: String,
    user_name: String,
    reminder: String,
    reminder_date: i64,
    been_reminded: bool,
    delivery_attempts: i64,
    next_attempt_at: Option<i64>,
    dead_lettered: bool,
}

impl From<ReminderRaw> for Reminder {
    fn from(raw: ReminderRaw) -> Self {
        Reminder {
            id: ID::new(raw.id),
            created: raw.date_created,
            user_number: raw.user_number,
            business_number: raw.business_number,
            user_name: raw.user_name,
            text: raw.reminder,
            due_at: raw.reminder_date,
            delivered: raw.been_reminded,
            delivery_attempts: raw.delivery_attempts,
            next_attempt_at: raw.next_attempt_at,
            dead_lettered: raw.dead_lettered,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for SqliteReminderRepo {
    async fn initialize(&self) -> anyhow::Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, reminder: &NewReminder) -> anyhow::Result<Reminder> {
        let id = sqlx::query(
            r#"
            INSERT INTO reminders
            (date_created, user_number, business_number, user_name, reminder, reminder_date)
            VALUES(?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(reminder.created)
        .bind(&reminder.user_number)
        .bind(&reminder.business_number)
        .bind(&reminder.user_name)
        .bind(&reminder.text)
        .bind(reminder.due_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(reminder.clone().into_reminder(ID::new(id)))
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let res = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.id = ?
            "#,
        )
        .bind(reminder_id.inner())
        .fetch_optional(&self.pool)
        .await;

        match res {
            Ok(reminder) => reminder.map(|r| r.into()),
            Err(e) => {
                error!("Unable to find reminder {}: {:?}", reminder_id, e);
                None
            }
        }
    }

    fn pending(&self) -> BoxStream<'_, anyhow::Result<Reminder>> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.been_reminded = 0 AND r.dead_lettered = 0
            "#,
        )
        .fetch(&self.pool)
        .map(|row| row.map(Reminder::from).map_err(anyhow::Error::from))
        .boxed()
    }

    async fn mark_delivered(&self, reminder_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET been_reminded = 1, next_attempt_at = NULL
            WHERE id = ? AND dead_lettered = 0
            "#,
        )
        .bind(reminder_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_failed_attempt(
        &self,
        reminder_id: &ID,
        attempt: &FailedAttempt,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET delivery_attempts = delivery_attempts + 1,
                next_attempt_at = ?,
                dead_lettered = (dead_lettered OR ?)
            WHERE id = ? AND been_reminded = 0
            "#,
        )
        .bind(attempt.next_attempt_at)
        .bind(attempt.dead_letter)
        .bind(reminder_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
