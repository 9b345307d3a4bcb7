use super::signature::is_valid_signature;
use crate::{
    error::RemindBotError,
    reminder::receive_message::ReceiveMessageUseCase,
    shared::usecase::execute,
};
use actix_web::{web, HttpRequest, HttpResponse};
use remind_bot_api_structs::receive_webhook_event::{
    RequestBody, FORWARDED, NOT_FOUND, SIGNATURE_HEADER,
};
use remind_bot_infra::RemindBotContext;
use tracing::debug;

pub async fn receive_webhook_event_controller(
    http_req: HttpRequest,
    ctx: web::Data<RemindBotContext>,
    body: web::Bytes,
) -> Result<HttpResponse, RemindBotError> {
    if let Some(app_secret) = &ctx.config.app_secret {
        let signature = http_req
            .headers()
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if !is_valid_signature(app_secret, &body, signature) {
            return Err(RemindBotError::Unauthorized(
                "Invalid webhook signature".into(),
            ));
        }
    }

    let event: RequestBody = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            debug!("Ignoring webhook event which could not be decoded: {}", e);
            return Ok(HttpResponse::Ok().finish());
        }
    };

    if event.object.is_empty() {
        return Ok(HttpResponse::BadGateway().json(NOT_FOUND));
    }
    // Status callbacks and other events without a message
    if event.inbound_message().is_none() {
        return Ok(HttpResponse::Ok().finish());
    }

    // Storage errors are not reported back, the provider would keep
    // redelivering the event otherwise
    let _ = execute(ReceiveMessageUseCase { event }, &ctx).await;

    Ok(HttpResponse::Ok().json(FORWARDED))
}
