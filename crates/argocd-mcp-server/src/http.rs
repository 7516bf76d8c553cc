//! Streamable HTTP transport for the MCP server.
//!
//! Reuses the same dispatch as the stdio transport. Routes:
//! - `GET /health`           : liveness and open session count
//! - `POST /` and `/mcp`     : JSON-RPC messages
//! - `DELETE /` and `/mcp`   : session termination
//!
//! `initialize` opens a session whose id is returned in `Mcp-Session-Id`;
//! every other message must carry it.

use crate::protocol::{self, INTERNAL_ERROR, INVALID_REQUEST, JsonRpcResponse};
use crate::server::McpServer;
use crate::session::SessionStore;
use argocd_mcp_core::constants;
use argocd_mcp_query::client::CallContext;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shared state for the HTTP transport.
pub struct HttpState {
    pub server: Arc<McpServer>,
    pub sessions: SessionStore,
    pub request_timeout: Duration,
}

impl HttpState {
    pub fn new(server: Arc<McpServer>) -> Self {
        Self {
            server,
            sessions: SessionStore::new(),
            request_timeout: Duration::from_secs(constants::HTTP_REQUEST_TIMEOUT_SECS),
        }
    }
}

pub fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", post(jsonrpc_handler).delete(delete_session_handler))
        .route("/mcp", post(jsonrpc_handler).delete(delete_session_handler))
        .with_state(state)
}

/// Serve the MCP endpoint on `bind_addr` until Ctrl-C.
pub async fn run_http_server(server: Arc<McpServer>, bind_addr: &str) -> io::Result<()> {
    let app = router(Arc::new(HttpState::new(server)));
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("MCP HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down MCP HTTP server"),
        Err(e) => {
            warn!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// GET /health
async fn health_handler(State(state): State<Arc<HttpState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.len(),
    }))
}

/// POST /: JSON-RPC MCP handler.
async fn jsonrpc_handler(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match protocol::parse_message(&body) {
        Ok(request) => request,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };

    let is_initialize = request.method == "initialize";
    let session_id = session_id_from_headers(&headers);
    if !is_initialize {
        match &session_id {
            None => {
                return session_error(
                    StatusCode::BAD_REQUEST,
                    request.id,
                    "Missing Mcp-Session-Id header",
                );
            }
            Some(id) if !state.sessions.touch(id) => {
                debug!(session_id = %id, "Request for unknown session");
                return session_error(StatusCode::NOT_FOUND, request.id, "Unknown session");
            }
            Some(_) => {}
        }
    }

    // initialize runs before its session exists
    let scope = session_id.as_deref().unwrap_or_default();
    let ctx = CallContext::background().with_timeout(state.request_timeout);
    let Some(response) = state.server.handle_request(&request, scope, &ctx).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let new_session_id = (is_initialize && !response.is_error()).then(|| {
        let version = response
            .result
            .as_ref()
            .and_then(|r| r.get("protocolVersion"))
            .and_then(Value::as_str)
            .unwrap_or(constants::LATEST_PROTOCOL_VERSION);
        state.sessions.create(version)
    });

    let mut http_response = if wants_event_stream(&headers) {
        sse_response(&response)
    } else {
        Json(response).into_response()
    };
    if let Some(id) = new_session_id
        && let Ok(value) = HeaderValue::from_str(&id)
    {
        http_response
            .headers_mut()
            .insert(HeaderName::from_static(constants::MCP_SESSION_ID_HEADER), value);
    }
    http_response
}

/// DELETE /: terminate a session.
async fn delete_session_handler(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
) -> Response {
    let Some(id) = session_id_from_headers(&headers) else {
        return session_error(StatusCode::BAD_REQUEST, None, "Missing Mcp-Session-Id header");
    };
    if state.sessions.remove(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        session_error(StatusCode::NOT_FOUND, None, "Unknown session")
    }
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(constants::MCP_SESSION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("text/event-stream"))
}

fn session_error(status: StatusCode, id: Option<Value>, message: &str) -> Response {
    let body = JsonRpcResponse::error(id, INVALID_REQUEST, message.to_string());
    (status, Json(body)).into_response()
}

/// A single-event `text/event-stream` carrying the response.
fn sse_response(response: &JsonRpcResponse) -> Response {
    match Event::default().event("message").json_data(response) {
        Ok(event) => Sse::new(stream::once(async move { Ok::<_, Infallible>(event) })).into_response(),
        Err(e) => {
            let body = JsonRpcResponse::error(
                response.id.clone(),
                INTERNAL_ERROR,
                format!("Internal error: {}", e),
            );
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
