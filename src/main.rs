mod telemetry;

use remind_bot_api::Application;
use remind_bot_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::error;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = get_subscriber("remind_bot".into(), "info".into());
    init_subscriber(subscriber);

    let context = match setup_context().await {
        Ok(context) => context,
        Err(e) => {
            error!("Unable to start: {:?}", e);
            std::process::exit(1);
        }
    };

    let app = Application::new(context).await?;
    app.start().await
}
