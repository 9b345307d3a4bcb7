use crate::shared::usecase::{Subscriber, UseCase};
use remind_bot_api_structs::dtos::WebhookEventDTO;
use remind_bot_domain::{NewReminder, Reminder};
use remind_bot_infra::RemindBotContext;
use tracing::{debug, error, info, warn};

/// Sent right after a reminder has been stored
pub const ACKNOWLEDGEMENT: &str = "I will remind you at the end of the week.";

/// Turns an inbound message into a `Reminder` and acknowledges it to the sender
#[derive(Debug)]
pub struct ReceiveMessageUseCase {
    pub event: WebhookEventDTO,
}

#[derive(Debug)]
pub enum IntakeOutcome {
    /// The event did not contain a message to remind about
    Ignored,
    Stored(Reminder),
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ReceiveMessageUseCase {
    type Response = IntakeOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "ReceiveMessage";

    async fn execute(&mut self, ctx: &RemindBotContext) -> Result<Self::Response, Self::Error> {
        let message = match self.event.inbound_message() {
            Some(message) => message,
            None => {
                debug!("Webhook event without a text message, ignoring it");
                return Ok(IntakeOutcome::Ignored);
            }
        };

        let now = ctx.sys.get_timestamp_millis();
        let reminder = NewReminder {
            created: now,
            user_number: message.sender_number,
            business_number: message.channel_id,
            user_name: message.sender_name,
            text: message.text,
            due_at: ctx.config.due_date_policy.due_at(now),
        };

        match ctx.repos.reminders.insert(&reminder).await {
            Ok(reminder) => {
                info!("Stored reminder {} due at {}", reminder.id, reminder.due_at);
                Ok(IntakeOutcome::Stored(reminder))
            }
            Err(e) => {
                error!("Unable to store reminder: {:?}", e);
                Err(UseCaseError::StorageError)
            }
        }
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SendAcknowledgement)]
    }
}

/// Lets the sender know the reminder was received. This is best effort,
/// the reminder is kept even if the acknowledgement can not be delivered.
pub struct SendAcknowledgement;

#[async_trait::async_trait(?Send)]
impl Subscriber<ReceiveMessageUseCase> for SendAcknowledgement {
    async fn notify(&self, outcome: &IntakeOutcome, ctx: &RemindBotContext) {
        let reminder = match outcome {
            IntakeOutcome::Stored(reminder) => reminder,
            IntakeOutcome::Ignored => return,
        };

        if let Err(e) = ctx
            .notifier
            .send(
                &reminder.business_number,
                &reminder.user_number,
                ACKNOWLEDGEMENT,
            )
            .await
        {
            warn!(
                "Unable to acknowledge reminder {} to the sender: {}",
                reminder.id, e
            );
        }
    }
}
