use actix_web::{web, App, HttpResponse, HttpServer};
use remind_bot_api_structs::send_text_message::RequestBody;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Recipient which the fake Graph API always rejects
pub const REJECTED_RECIPIENT: &str = "15550000000";

#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub channel_id: String,
    pub access_token: Option<String>,
    pub messaging_product: String,
    pub to: String,
    pub text: String,
}

#[derive(Clone, Default)]
pub struct FakeGraphApi {
    received: Arc<Mutex<Vec<ReceivedMessage>>>,
}

impl FakeGraphApi {
    pub fn received(&self) -> Vec<ReceivedMessage> {
        self.received.lock().unwrap().clone()
    }
}

async fn messages(
    state: web::Data<FakeGraphApi>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
    body: web::Json<RequestBody>,
) -> HttpResponse {
    let body = body.into_inner();
    state.received.lock().unwrap().push(ReceivedMessage {
        channel_id: path.into_inner(),
        access_token: query.get("access_token").cloned(),
        messaging_product: body.messaging_product,
        to: body.to.clone(),
        text: body.text.body,
    });

    if body.to == REJECTED_RECIPIENT {
        return HttpResponse::InternalServerError().body("Recipient is not reachable");
    }
    HttpResponse::Ok().json(serde_json::json!({
        "messaging_product": "whatsapp",
        "messages": [{ "id": "wamid.ID" }]
    }))
}

/// Starts a fake Graph API and returns its base url
pub async fn spawn_fake_graph_api() -> (FakeGraphApi, String) {
    let api = FakeGraphApi::default();
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake graph api");
    let port = listener.local_addr().unwrap().port();

    let state = api.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .route("/v12.0/{channel_id}/messages", web::post().to(messages))
    })
    .listen(listener)
    .expect("Failed to listen")
    .workers(1)
    .run();
    let _ = actix_web::rt::spawn(server);

    (api, format!("http://127.0.0.1:{}/v12.0", port))
}
