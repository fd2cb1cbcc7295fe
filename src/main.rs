//! Care network dashboard - web server entry point.
//!
//! Configuration comes from `CAREGRAPH_*` environment variables; see
//! `caregraph::config`. Log verbosity follows `RUST_LOG`.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use caregraph::{config::DashboardConfig, handlers, AppState};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("caregraph=info")),
        )
        .init();

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    let bind = config.bind.clone();

    let state = match AppState::from_config(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!(error = %e, "failed to initialise dashboard");
            std::process::exit(1);
        }
    };

    let app = Router::new()
        .route("/", get(handlers::index))
        .route("/refresh", post(handlers::refresh))
        .route("/narrative", post(handlers::narrative))
        .route("/api/graph", get(handlers::graph_api))
        .route("/export.csv", get(handlers::export_csv))
        .route("/report", get(handlers::report))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .expect("Failed to bind listen address");

    info!(
        address = %bind,
        source = %state.dashboard.source_identity(),
        narrator = state.dashboard.narrator_name(),
        "dashboard server running"
    );

    axum::serve(listener, app).await.expect("Server error");
}
