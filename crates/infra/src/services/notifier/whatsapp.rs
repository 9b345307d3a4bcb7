use super::{DeliveryError, INotifier};
use remind_bot_api_structs::send_text_message::RequestBody;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

// Provider error bodies can be large, only keep the start for logging
const MAX_ERROR_BODY_LEN: usize = 512;

/// Sends messages with the WhatsApp Cloud API
pub struct WhatsAppNotifier {
    client: Client,
    api_url: String,
    access_token: String,
}

impl WhatsAppNotifier {
    pub fn new(api_url: &str, access_token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/{}/messages", self.api_url, channel_id)
    }
}

#[async_trait::async_trait]
impl INotifier for WhatsAppNotifier {
    #[tracing::instrument(name = "Sending whatsapp message", skip(self, text))]
    async fn send(
        &self,
        channel_id: &str,
        recipient: &str,
        text: &str,
    ) -> Result<(), DeliveryError> {
        let res = self
            .client
            .post(self.messages_url(channel_id))
            .query(&[("access_token", &self.access_token)])
            .json(&RequestBody::new(recipient, text))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = res.status();
        if status.is_success() {
            debug!("Message accepted with status {}", status);
            return Ok(());
        }

        let mut body = res.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY_LEN {
            let mut end = MAX_ERROR_BODY_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
