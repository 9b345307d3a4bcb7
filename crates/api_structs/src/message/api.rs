use crate::dtos::TextDTO;
use serde::{Deserialize, Serialize};

pub mod send_text_message {
    use super::*;

    pub const MESSAGING_PRODUCT: &str = "whatsapp";

    /// Body of an outbound text message sent to the Graph API
    #[derive(Debug, Deserialize, Serialize)]
    pub struct RequestBody {
        pub messaging_product: String,
        pub to: String,
        pub text: TextDTO,
    }

    impl RequestBody {
        pub fn new(to: &str, body: &str) -> Self {
            Self {
                messaging_product: MESSAGING_PRODUCT.into(),
                to: to.into(),
                text: TextDTO { body: body.into() },
            }
        }
    }
}
