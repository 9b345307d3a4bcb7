mod receive_webhook_event;
mod signature;
mod verify_webhook;

use actix_web::web;
use receive_webhook_event::receive_webhook_event_controller;
use verify_webhook::verify_webhook_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/webhook", web::get().to(verify_webhook_controller));
    cfg.route("/webhook", web::post().to(receive_webhook_event_controller));
}
