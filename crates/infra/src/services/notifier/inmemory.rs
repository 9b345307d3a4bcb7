use super::{DeliveryError, INotifier};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: String,
    pub recipient: String,
    pub text: String,
}

/// Notifier which records every attempt instead of sending it.
/// Recipients can be set up to fail so that delivery errors can be tested.
#[derive(Default)]
pub struct InMemoryNotifier {
    attempts: Mutex<Vec<SentMessage>>,
    failing_recipients: Mutex<HashSet<String>>,
    delay: Option<Duration>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Default::default()
    }

    /// Every send will take `delay` before it resolves
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(recipient.to_string());
    }

    pub fn recover_for(&self, recipient: &str) {
        self.failing_recipients.lock().unwrap().remove(recipient);
    }

    /// All attempted sends, including the failed ones
    pub fn attempts(&self) -> Vec<SentMessage> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn attempts_to(&self, recipient: &str) -> Vec<SentMessage> {
        self.attempts()
            .into_iter()
            .filter(|m| m.recipient == recipient)
            .collect()
    }
}

#[async_trait::async_trait]
impl INotifier for InMemoryNotifier {
    async fn send(
        &self,
        channel_id: &str,
        recipient: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.attempts.lock().unwrap().push(SentMessage {
            channel_id: channel_id.to_string(),
            recipient: recipient.to_string(),
            text: text.to_string(),
        });

        if self.failing_recipients.lock().unwrap().contains(recipient) {
            return Err(DeliveryError::Rejected {
                status: 500,
                body: "Simulated failure".into(),
            });
        }
        Ok(())
    }
}
