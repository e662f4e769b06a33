//! `plugtest serve` -- HTTP host for the plugtest resource.
//!
//! Plays the protocol engine around one [`PlugtestResource`]: every request
//! is decoded into a plugtest request, run through the resource under a
//! single lock, and the response is encoded back onto HTTP (see
//! [`crate::mapping`] for the header conventions).
//!
//! A GET validates with a request `ETag: "<hex>"` header. `If-None-Match`
//! is only a presence flag for PUT and never validates a GET.
//!
//! Endpoints:
//! - GET|POST|PUT|DELETE /test  - The plugtest resource
//! - GET  /health               - Server status and resource description
//!
//! Unmatched routes return a JSON 404.

mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, HeaderName, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use plugtest_core::PlugtestResource;

use self::handlers::{handle_health, handle_not_found, handle_test};
use self::state::AppState;
use crate::mapping::{X_COAP_CODE, X_COAP_MID, X_COAP_TYPE};

/// Settings for one server run.
#[derive(Debug, Clone)]
pub(crate) struct ServeConfig {
    pub(crate) port: u16,
    pub(crate) seed: Option<u64>,
    pub(crate) payload_limit: usize,
}

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}

fn router(state: Arc<AppState>) -> Router {
    // CORS: permissive, the plugtest server is a local test fixture.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([
            header::ETAG,
            header::CACHE_CONTROL,
            header::LOCATION,
            HeaderName::from_static(X_COAP_CODE),
            HeaderName::from_static(X_COAP_TYPE),
            HeaderName::from_static(X_COAP_MID),
        ]);

    let resource_route = format!("/{}", plugtest_core::RESOURCE_PATH);
    Router::new()
        .route("/health", get(handle_health))
        .route(
            &resource_route,
            get(handle_test)
                .post(handle_test)
                .put(handle_test)
                .delete(handle_test),
        )
        .fallback(handle_not_found)
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl+C.
pub(crate) async fn start_server(config: ServeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let resource = match config.seed {
        Some(seed) => PlugtestResource::seeded(seed),
        None => PlugtestResource::new(),
    };
    tracing::info!(
        seed = ?config.seed,
        payload_limit = config.payload_limit,
        initial_etag = %resource.state().tag(),
        "resource initialized"
    );

    let state = Arc::new(AppState::new(resource, config.payload_limit));
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        "Plugtest resource listening on http://0.0.0.0:{}/{}",
        config.port,
        plugtest_core::RESOURCE_PATH
    );
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
