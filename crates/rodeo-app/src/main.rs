use rodeo_app::app::api::routes;
use rodeo_app::depot::{EventStoreHandler, SettingsHandler};
use rodeo_core::config::load_config;
use rodeo_core::error::CoreError;
use rodeo_db::db::connection::create_pool;
use rodeo_db::db::migrate::run_migrations;
use rodeo_schedule::timezone::is_supported_event_timezone;
use salvo::conn::TcpListener;
use salvo::logging::Logger;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting rodeo events server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    if !is_supported_event_timezone(&config.events.default_timezone) {
        return Err(CoreError::InvalidConfiguration(format!(
            "events.default_timezone {} is not a supported event timezone",
            config.events.default_timezone
        ))
        .into());
    }

    run_migrations(&config.database.url).await?;

    let pool = create_pool(&config.database).await?;

    tracing::info!("Database connection pool created.");

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(Logger::new())
        .hoop(EventStoreHandler::new(pool))
        .hoop(SettingsHandler::new(config.clone()))
        .push(routes());

    tracing::info!(origin = %config.server.origin(), "Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
