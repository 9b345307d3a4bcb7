mod helpers;

use helpers::{
    fake_graph_api::{spawn_fake_graph_api, REJECTED_RECIPIENT},
    setup::{message_event, spawn_app_with_context},
};
use remind_bot_api::{send_due_reminders, ACKNOWLEDGEMENT};
use remind_bot_infra::{DeliveryError, INotifier, RemindBotContext, WhatsAppNotifier};
use std::{sync::Arc, time::Duration};

fn notifier(api_url: &str) -> WhatsAppNotifier {
    WhatsAppNotifier::new(api_url, "facebook-token", Duration::from_secs(5)).unwrap()
}

#[actix_web::test]
async fn test_whatsapp_notifier_sends_text_message() {
    let (api, api_url) = spawn_fake_graph_api().await;

    let res = notifier(&api_url)
        .send("106540352242922", "15551234567", "remind me")
        .await;
    assert!(res.is_ok());

    let received = api.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].channel_id, "106540352242922");
    assert_eq!(received[0].access_token.as_deref(), Some("facebook-token"));
    assert_eq!(received[0].messaging_product, "whatsapp");
    assert_eq!(received[0].to, "15551234567");
    assert_eq!(received[0].text, "remind me");
}

#[actix_web::test]
async fn test_whatsapp_notifier_reports_rejected_message() {
    let (_, api_url) = spawn_fake_graph_api().await;

    let res = notifier(&api_url)
        .send("106540352242922", REJECTED_RECIPIENT, "remind me")
        .await;
    match res {
        Err(DeliveryError::Rejected { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Recipient is not reachable");
        }
        other => panic!("Expected a rejected delivery, got: {:?}", other),
    }
}

#[actix_web::test]
async fn test_reminder_is_delivered_through_graph_api() {
    let (api, api_url) = spawn_fake_graph_api().await;
    let mut ctx = RemindBotContext::create_sqlite_inmemory().await.unwrap();
    ctx.notifier = Arc::new(notifier(&api_url));
    let address = spawn_app_with_context(ctx.clone()).await;

    let res = reqwest::Client::new()
        .post(format!("{}/webhook", address))
        .json(&message_event("15551234567", "remind me"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    send_due_reminders(ctx.clone()).await;

    let texts: Vec<String> = api
        .received()
        .into_iter()
        .filter(|m| m.to == "15551234567")
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, vec![ACKNOWLEDGEMENT.to_string(), "remind me".to_string()]);
}
