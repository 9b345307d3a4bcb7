use crate::dtos::WebhookEventDTO;
use serde::{Deserialize, Serialize};

pub mod verify_webhook {
    use super::*;

    /// Query sent by the provider when the webhook is registered
    #[derive(Debug, Default, Deserialize, Serialize)]
    pub struct QueryParams {
        #[serde(rename = "hub.mode")]
        pub mode: Option<String>,
        #[serde(rename = "hub.verify_token")]
        pub verify_token: Option<String>,
        #[serde(rename = "hub.challenge")]
        pub challenge: Option<i64>,
    }

    pub type APIResponse = i64;
}

pub mod receive_webhook_event {
    use super::*;

    pub type RequestBody = WebhookEventDTO;

    pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

    /// Response body when a message was forwarded to intake
    pub const FORWARDED: &str = "Sent";
    /// Response body when the envelope has no `object`
    pub const NOT_FOUND: &str = "Not found";
}

/// The fields of a webhook event needed to create a reminder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Business phone number id the message was received on
    pub channel_id: String,
    pub sender_name: String,
    pub sender_number: String,
    pub text: String,
}

impl WebhookEventDTO {
    /// Extracts the first text message of the first change.
    ///
    /// Returns `None` for envelopes without a contact and a text message,
    /// which is the case for delivery status callbacks.
    pub fn inbound_message(&self) -> Option<InboundMessage> {
        let value = &self.entry.first()?.changes.first()?.value;
        let contact = value.contacts.first()?;
        let message = value.messages.first()?;
        let text = message.text.as_ref()?;

        if value.metadata.phone_number_id.is_empty() || message.from.is_empty() {
            return None;
        }

        Some(InboundMessage {
            channel_id: value.metadata.phone_number_id.clone(),
            sender_name: contact.profile.name.clone(),
            sender_number: message.from.clone(),
            text: text.body.clone(),
        })
    }
}
