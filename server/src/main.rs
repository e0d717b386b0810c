//! Server entry point: reads settings from the environment, connects the
//! document store when configured, and serves the API.
//!
//! Run from repo root: `cargo run -p ccbc-server`

use ccbc_api::model::{ContactMessage, Entity, Event, Leader, Ministry, PrayerRequest, Sermon, Story};
use ccbc_api::{app, AppState, DocumentStore, PgDocumentStore, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;

fn collections() -> Vec<String> {
    vec![
        Sermon::collection(),
        Event::collection(),
        Ministry::collection(),
        Story::collection(),
        Leader::collection(),
        ContactMessage::collection(),
        PrayerRequest::collection(),
    ]
}

/// Connect and prepare the store. Failures are logged; the server runs without a store.
async fn open_store(settings: &Settings) -> Option<Arc<dyn DocumentStore>> {
    let Some((url, name)) = settings.store_target() else {
        tracing::warn!("DATABASE_URL or DATABASE_NAME not set; running without a database");
        return None;
    };
    let store = match PgDocumentStore::connect(url, name).await {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "database connection failed; running without a database");
            return None;
        }
    };
    if let Err(e) = store.ensure_collections(&collections()).await {
        tracing::warn!(error = %e, "could not prepare collections");
    }
    tracing::info!(database = name, "document store ready");
    let store: Arc<dyn DocumentStore> = Arc::new(store);
    Some(store)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ccbc_api=info,ccbc_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let store = open_store(&settings).await;
    let addr = settings.bind_addr();
    let state = AppState::new(settings, store);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
