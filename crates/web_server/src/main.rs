//! Main entry point for the Campsite Availability backend server.
//! This crate provides REST API endpoints and serves the frontend application.

use std::sync::Arc;

use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use campground_availability::AvailabilityAggregator;
use rec_gov::RecGovClient;
use web_handlers::configure_api;

mod config;
use config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting campsite availability server...");

    let config = AppConfig::from_env()?;

    let client = RecGovClient::with_config(config.rec_gov.clone())?;
    if !client.has_api_key() {
        log::warn!("🔑 RECREATION_API_KEY not set, campground search is disabled");
    }

    let aggregator = web::Data::new(AvailabilityAggregator::new(
        Arc::new(client.clone()),
        Some(config.aggregator.clone()),
    ));
    let client = web::Data::new(client);

    let frontend_path = config.frontend_path.clone();
    log::info!("📁 Frontend files location: {}", frontend_path);
    log::info!("🌐 Server will be available at: http://{}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(client.clone())
            .app_data(aggregator.clone())
            .wrap(Logger::default())
            .configure(configure_api)
            .route(
                "/health",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
            .service(Files::new("/", frontend_path.clone()).index_file("index.html"))
    })
    .bind(&config.bind_address)?
    .run()
    .await?;

    Ok(())
}
