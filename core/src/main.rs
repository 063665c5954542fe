mod cors;

use std::{sync::Arc, time::Duration};

use actix_web::{
    App, HttpServer,
    web::{self},
};
use api_subs::services::sub::SubscriptionService;
use common::env_config::Config;
use db::repository::PgSubscriptionRepository;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();

    // get info
    let is_production = config.is_production();
    let origin = config.cors_allowed_origin.clone();
    let logging_enabled = config.console_logging_enabled;

    // init logger
    if logging_enabled {
        logger::setup(is_production).expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    let service = web::Data::new(SubscriptionService::new(
        Arc::new(PgSubscriptionRepository::new(pool)),
        config.pagination,
    ));

    log::info!(
        "Starting server on {}:{} ({} environment)",
        config.server_host,
        config.server_port,
        config.environment
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(api_subs::json_config())
            .app_data(api_subs::query_config())
            .wrap(logger::middleware(logging_enabled)) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(web::scope("/api").service(api_subs::mount_subscriptions()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .client_request_timeout(Duration::from_secs(config.read_timeout_secs))
    .client_disconnect_timeout(Duration::from_secs(config.write_timeout_secs))
    .shutdown_timeout(config.shutdown_timeout_secs)
    .run()
    .await?;

    log::info!("Server stopped");
    Ok(())
}
