//! Minimart Storefront - JSON cart API and browser page.
//!
//! This binary serves the storefront on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework, JSON in and out under `/api`
//! - Catalog and cart persisted as pretty-printed JSON documents
//! - One shared cart; mutations are serialized through a single writer
//! - Static browser page served from `STOREFRONT_STATIC_DIR`

#![cfg_attr(not(test), forbid(unsafe_code))]

use minimart_storefront::config::StorefrontConfig;
use minimart_storefront::state::AppState;
use minimart_storefront::telemetry;

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config.sentry);

    telemetry::init_tracing(config.log_format);

    tracing::info!(
        products = %config.products_path.display(),
        cart = %config.cart_path.display(),
        read_policy = ?config.read_policy,
        "Using JSON stores"
    );

    let addr = config.socket_addr();
    let state = AppState::from_config(config);

    // Sentry layers (outermost for full request coverage)
    let app = minimart_storefront::app(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
