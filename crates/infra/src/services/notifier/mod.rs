mod inmemory;
mod whatsapp;

pub use inmemory::{InMemoryNotifier, SentMessage};
use thiserror::Error;
pub use whatsapp::WhatsAppNotifier;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Request to the messaging provider timed out")]
    Timeout,
    #[error("Unable to reach the messaging provider: {0}")]
    Transport(String),
    #[error("Messaging provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Sends text messages through the messaging provider.
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    /// Makes exactly one attempt at delivering `text` to `recipient` from the
    /// business account `channel_id`. `Ok` means the provider accepted the message.
    async fn send(&self, channel_id: &str, recipient: &str, text: &str)
        -> Result<(), DeliveryError>;
}
