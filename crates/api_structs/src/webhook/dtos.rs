use serde::{Deserialize, Serialize};

// Shapes of the WhatsApp Cloud API webhook event envelope. Every field
// defaults so that partial envelopes (e.g. status callbacks) still decode.

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookEventDTO {
    pub object: String,
    pub entry: Vec<WebhookEntryDTO>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookEntryDTO {
    pub id: String,
    pub changes: Vec<WebhookChangeDTO>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookChangeDTO {
    pub field: String,
    pub value: WebhookChangeValueDTO,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookChangeValueDTO {
    pub messaging_product: String,
    pub metadata: WebhookMetadataDTO,
    pub contacts: Vec<WebhookContactDTO>,
    pub messages: Vec<WebhookMessageDTO>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookMetadataDTO {
    pub display_phone_number: String,
    pub phone_number_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookContactDTO {
    pub wa_id: String,
    pub profile: WebhookProfileDTO,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookProfileDTO {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WebhookMessageDTO {
    pub from: String,
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<TextDTO>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextDTO {
    pub body: String,
}
