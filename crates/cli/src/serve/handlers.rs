//! HTTP route handlers: the plugtest resource, health, fallback.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use plugtest_core::Method;

use super::json_error;
use super::state::AppState;
use crate::mapping::{decode_request, encode_response};

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resource = state.resource.lock().await;
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "resource": resource.link_format(),
        "state": resource.state(),
        "payload_limit": state.payload_limit,
    });
    (StatusCode::OK, Json(response))
}

/// GET|POST|PUT|DELETE /test
pub(crate) async fn handle_test(
    State(state): State<Arc<AppState>>,
    method: axum::http::Method,
    headers: HeaderMap,
) -> Response {
    let method: Method = match method.as_str().parse() {
        Ok(m) => m,
        Err(e) => return json_error(StatusCode::METHOD_NOT_ALLOWED, &e.to_string()),
    };

    let request = match decode_request(method, &headers, || state.assign_mid()) {
        Ok(r) => r,
        Err(e) => return json_error(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let response = {
        let mut resource = state.resource.lock().await;
        resource.process(&request, state.payload_limit)
    };

    tracing::info!(
        method = %request.method,
        msg_type = %request.message_type,
        mid = request.message_id,
        code = %response.code,
        etag = %response.etag.map(|t| t.to_hex()).unwrap_or_default(),
        "exchange"
    );

    encode_response(&response)
}
