//! HTTP gateway
//!
//! Thin axum transport over the transfer engine and the read stores.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::GatewayConfig;
use state::AppState;

/// Start the HTTP gateway server. Blocks until shutdown.
pub async fn run_server(config: &GatewayConfig, state: AppState) -> anyhow::Result<()> {
    let state = Arc::new(state);

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/assets", get(handlers::list_assets))
        .route("/wallets", get(handlers::list_wallets))
        .route("/wallets/{wallet_id}/balance", get(handlers::get_balance))
        .route(
            "/wallets/{wallet_id}/transactions",
            get(handlers::get_transactions),
        )
        .route("/wallets/{wallet_id}/topup", post(handlers::topup))
        .route("/wallets/{wallet_id}/bonus", post(handlers::bonus))
        .route("/wallets/{wallet_id}/spend", post(handlers::spend));

    let app = Router::new()
        .nest("/api/v1", api)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on http://{}", addr);

    // In-flight transfers ride storage transactions; on shutdown each
    // either commits or rolls back, never leaving half a pair behind.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining in-flight requests");
}
