use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movie_rec_api::{
    api::{create_router, AppState},
    config::Config,
    services::{AvailabilityTable, TmdbClient},
};

const SESSION_REAP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration problems are fatal before any interaction is possible
    let config = Config::from_env()?;

    let availability = AvailabilityTable::load(&config.availability_csv)
        .context("Failed to load streaming availability dataset")?;

    let catalog = TmdbClient::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;

    let state = AppState::new(Arc::new(catalog), Arc::new(availability))
        .with_session_ttl(Duration::from_secs(config.session_ttl_secs));
    state.spawn_session_reaper(SESSION_REAP_INTERVAL);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}
