mod error;
mod job_schedulers;
mod reminder;
mod shared;
mod status;
mod webhook;

use actix_web::{dev::Server, web, App, HttpServer};
use job_schedulers::start_send_reminders_job;
use remind_bot_infra::RemindBotContext;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub use job_schedulers::send_due_reminders;
pub use reminder::receive_message::ACKNOWLEDGEMENT;

pub fn configure_server_api(cfg: &mut web::ServiceConfig) {
    status::configure_routes(cfg);
    webhook::configure_routes(cfg);
}

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn new(context: RemindBotContext) -> Result<Self, std::io::Error> {
        let (server, port) = Application::configure_server(context.clone()).await?;
        Application::start_job_schedulers(context);

        Ok(Self { server, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn start_job_schedulers(context: RemindBotContext) {
        start_send_reminders_job(context);
    }

    async fn configure_server(
        context: RemindBotContext,
    ) -> Result<(Server, u16), std::io::Error> {
        let port = context.config.port;
        let address = format!("0.0.0.0:{}", port);
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();

        let server = HttpServer::new(move || {
            let ctx = context.clone();

            App::new()
                .wrap(TracingLogger::default())
                .app_data(web::Data::new(ctx))
                .configure(configure_server_api)
        })
        .listen(listener)?
        .workers(4)
        .run();

        Ok((server, port))
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
