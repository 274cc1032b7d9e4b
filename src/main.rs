//! Vida en Mano backend
//!
//! Main entry point for the patient monitoring dashboard backend.

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use vida_en_mano::{api, config, db, session::SessionManager};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = config::load_config().context("failed to load configuration")?;

    // Connect to database
    let database = db::Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    // Run migrations
    database
        .run_migrations()
        .await
        .context("failed to run database migrations")?;

    let sessions = SessionManager::new(&config.session);

    let db_data = web::Data::new(database);
    let session_data = web::Data::new(sessions);

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "starting server"
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            // Shared application resources
            .app_data(db_data.clone())
            .app_data(session_data.clone())
            // Request tracing
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            // API routes
            .configure(api::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
