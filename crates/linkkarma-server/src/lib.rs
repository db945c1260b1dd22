//! HTTP API for LinkKarma.
//!
//! `POST /api/generate-showcase` verifies a referral link, reads its page
//! and asks the model for showcase copy. The `/api/showcases` routes manage
//! stored showcases.

use std::time::Duration;

use axum::Router;
use axum::http::Method;
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;
pub mod showcases;
pub mod state;

pub use config::{Config, FetchConfig, LlmConfig};
pub use error::ApiError;
pub use state::{AppState, StartupError};

use routes::{generate_showcase, health, method_not_allowed};
use showcases::{
    boost_showcase, create_showcase, delete_showcase, get_showcase, list_showcases,
    update_showcase,
};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/generate-showcase",
            post(generate_showcase).fallback(method_not_allowed),
        )
        .route(
            "/api/showcases",
            get(list_showcases)
                .post(create_showcase)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/showcases/{id}",
            get(get_showcase)
                .patch(update_showcase)
                .delete(delete_showcase)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/showcases/{id}/boost",
            post(boost_showcase).fallback(method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve on `listener` until Ctrl+C or SIGTERM.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), StartupError> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

pub async fn start_server(config: &Config) -> Result<(), StartupError> {
    info!("initializing state");
    let state = AppState::from_config(config)?;

    let address = config.address()?;
    let listener = TcpListener::bind(address).await?;
    info!(%address, "server listening");

    serve(listener, state).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
