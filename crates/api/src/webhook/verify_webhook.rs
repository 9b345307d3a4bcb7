use crate::error::RemindBotError;
use actix_web::{web, HttpResponse};
use remind_bot_api_structs::verify_webhook::QueryParams;
use remind_bot_infra::RemindBotContext;
use tracing::{info, warn};

pub async fn verify_webhook_controller(
    ctx: web::Data<RemindBotContext>,
    query: Result<web::Query<QueryParams>, actix_web::Error>,
) -> Result<HttpResponse, RemindBotError> {
    // A query which can not be decoded is a failed handshake as well
    let query = match query {
        Ok(query) => query.into_inner(),
        Err(e) => {
            warn!("Webhook verification query could not be decoded: {}", e);
            return Err(RemindBotError::Forbidden("Forbidden".into()));
        }
    };
    match verified_challenge(&query, &ctx.config.verify_token) {
        Some(challenge) => {
            info!("Webhook verified");
            Ok(HttpResponse::Ok().json(challenge))
        }
        None => {
            warn!("Webhook verification failed for mode: {:?}", query.mode);
            Err(RemindBotError::Forbidden("Forbidden".into()))
        }
    }
}

/// The challenge to echo back if the verification request is valid
fn verified_challenge(query: &QueryParams, verify_token: &str) -> Option<i64> {
    if query.mode.as_deref() != Some("subscribe") {
        return None;
    }
    if query.verify_token.as_deref() != Some(verify_token) {
        return None;
    }
    query.challenge
}
