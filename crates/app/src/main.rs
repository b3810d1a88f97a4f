//! PG Tracker - room management service
//!
//! Rent-payment ledger and room-occupancy engine for a paying-guest
//! hostel, served over HTTP. Owns the store and mailer lifecycles and
//! injects them into the API layer.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgtracker_api::AppState;
use pgtracker_core::Database;

mod config;
mod mailer;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting PG Tracker room service");

    let config = config::Config::load();

    if let Some(parent) = config.database_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("Failed to create data directory: {e}");
            std::process::exit(1);
        }
    }

    let db = match Database::open(&config.database_path) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        path = %config.database_path.display(),
        schema_version = db.schema_version(),
        "Database ready"
    );

    let state = AppState::new(db, Arc::new(mailer::LogMailer));
    let router = pgtracker_api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(addr = %addr, "Listening");

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
