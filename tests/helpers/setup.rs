use remind_bot_api::Application;
use remind_bot_infra::{InMemoryNotifier, RemindBotContext};
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub ctx: RemindBotContext,
    pub notifier: Arc<InMemoryNotifier>,
}

pub fn inmemory_context() -> (RemindBotContext, Arc<InMemoryNotifier>) {
    let mut ctx = RemindBotContext::create_inmemory();
    let notifier = Arc::new(InMemoryNotifier::new());
    ctx.notifier = notifier.clone();
    (ctx, notifier)
}

// Launch the application as a background task
pub async fn spawn_app() -> TestApp {
    let (ctx, notifier) = inmemory_context();
    let address = spawn_app_with_context(ctx.clone()).await;
    TestApp {
        address,
        ctx,
        notifier,
    }
}

pub async fn spawn_app_with_context(mut ctx: RemindBotContext) -> String {
    ctx.config.port = 0; // Random port

    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });
    address
}

pub fn message_event(sender: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "102290129340398",
            "changes": [{
                "field": "messages",
                "value": {
                    "messaging_product": "whatsapp",
                    "metadata": {
                        "display_phone_number": "15550783881",
                        "phone_number_id": "106540352242922"
                    },
                    "contacts": [{ "profile": { "name": "Kacha" }, "wa_id": sender }],
                    "messages": [{
                        "from": sender,
                        "id": "wamid.HBgLMTY1MDM4Nzk0MzkVAgASGBQzQTRBNjU5OUFFRTAzODEwMTQ0RgA=",
                        "timestamp": "1613862000",
                        "type": "text",
                        "text": { "body": text }
                    }]
                }
            }]
        }]
    })
}
