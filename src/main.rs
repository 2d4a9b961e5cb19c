use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use interview_insights::{
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    telemetry::init_tracing,
    web::cors::build_cors,
    AppState,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => {
            init_tracing(&cfg.env);
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            init_tracing(&AppEnvironment::Development);
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to create database connection pool")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app_state = web::Data::new(AppState::new(&config, pool));

    if let Some(seed) = config.admin_seed() {
        app_state.auth_handler
            .ensure_admin(&seed)
            .await
            .context("Failed to ensure admin account")?;
    }

    let server_addr = config.server_address();
    let origins = config.cors_origins();

    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    tokio::select! {
        res = server => res.context("Server error")?,
        _ = shutdown_signal() => tracing::info!("Server stopped"),
    }

    Ok(())
}
