//! Fastbreak Picks binary entrypoint wiring the REST, provider, scheduler,
//! and storage layers.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fastbreak_picks::{
    clock::{SharedClock, SystemClock},
    config::AppConfig,
    dao::pick_store::PickStore,
    provider::{ProviderClient, rapid::RapidApiClient},
    routes,
    services::{scheduler, storage_supervisor},
    state::{AppState, SharedState},
};

#[cfg(feature = "mongo-store")]
use fastbreak_picks::dao::{
    pick_store::mongodb::{MongoConfig, MongoPickStore},
    storage::StorageError,
};
#[cfg(not(feature = "mongo-store"))]
use fastbreak_picks::dao::pick_store::memory::MemoryPickStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let clock: SharedClock = Arc::new(SystemClock);
    let provider: Arc<dyn ProviderClient> = Arc::new(
        RapidApiClient::new(&config.provider.base_url, &config.provider.api_key)
            .context("building provider client")?,
    );

    let schedule_enabled = config.provider.enabled;
    let state = AppState::new(config, clock, provider);

    tokio::spawn(storage_supervisor::run(state.clone(), connect_store));

    if schedule_enabled {
        tokio::spawn(scheduler::run(state.clone()));
    } else {
        info!("daily schedule disabled; only admin triggers will evaluate");
    }

    let app = build_router(state);

    let port = std::env::var("PORT")
        .or_else(|_| std::env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Connect the storage backend the build was configured with.
#[cfg(feature = "mongo-store")]
async fn connect_store() -> Result<Arc<dyn PickStore>, StorageError> {
    let config = MongoConfig::from_env().await?;
    let store = MongoPickStore::connect(config).await?;
    Ok(Arc::new(store))
}

/// Without a database backend compiled in, fall back to process-local
/// storage. Useful for demos; nothing survives a restart.
#[cfg(not(feature = "mongo-store"))]
async fn connect_store()
-> Result<Arc<dyn PickStore>, fastbreak_picks::dao::storage::StorageError> {
    Ok(Arc::new(MemoryPickStore::new()))
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
