//! HTTP server — axum router over TCP.
//!
//! All handlers go through the shared [`ToolRegistry`] and [`RecordStore`];
//! the router owns no matching logic of its own. Registration happens before
//! the listener is bound, so request handlers only ever read shared state.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use contentd_config::AppConfig;

use super::types::*;
use crate::record::RecordStore;
use crate::rpc::handler::handle_request;
use crate::rpc::protocol::JsonRpcRequest;
use crate::tools::{ToolError, ToolRegistry};

/// Shutdown signal sent via broadcast channel.
#[derive(Debug, Clone)]
pub struct ShutdownSignal;

/// Shared state accessible to all route handlers.
pub struct ServerState {
    pub store: Arc<RecordStore>,
    pub tools: Arc<ToolRegistry>,
    /// Limit applied when a search request omits one. Zero means unbounded.
    pub default_limit: usize,
}

impl ServerState {
    /// Assemble server state from loaded components.
    pub fn new(store: Arc<RecordStore>, tools: Arc<ToolRegistry>, config: &AppConfig) -> Self {
        Self {
            store,
            tools,
            default_limit: config.store.default_limit,
        }
    }
}

/// Build the axum router with all routes.
pub fn router(state: Arc<ServerState>) -> axum::Router {
    axum::Router::new()
        .route("/health", get(handle_health))
        .route("/search", post(handle_search))
        .route("/tools", get(handle_tools))
        .route("/rpc", post(handle_rpc))
        .with_state(state)
}

/// Serve on an already-bound listener until the shutdown signal is received.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ServerState>,
    mut shutdown_rx: broadcast::Receiver<ShutdownSignal>,
) -> Result<(), std::io::Error> {
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    let app = router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("HTTP server shutting down");
        })
        .await
}

/// Bind a TCP listener from the configured address and port.
pub async fn bind(config: &AppConfig) -> Result<TcpListener, std::io::Error> {
    let addr = format!("{}:{}", config.server.listen_addr, config.server.listen_port);
    TcpListener::bind(&addr).await
}

// ── Route handlers ──────────────────────────────────────────────────────

async fn handle_health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records: state.store.len(),
    })
}

async fn handle_search(
    State(state): State<Arc<ServerState>>,
    Json(mut req): Json<SearchRequest>,
) -> Response {
    if req.limit.is_none() && state.default_limit > 0 {
        req.limit = Some(state.default_limit);
    }

    let args = match serde_json::to_value(&req) {
        Ok(args) => args,
        Err(e) => return tool_error_response(ToolError::Encode(e)),
    };

    match state.tools.invoke(&state.store, "search_content", args).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => tool_error_response(e),
    }
}

async fn handle_tools(State(state): State<Arc<ServerState>>) -> Json<ToolsResponse> {
    let tools = state
        .tools
        .list()
        .iter()
        .map(|spec| ToolInfo {
            name: spec.name.clone(),
            description: spec.description.clone(),
        })
        .collect();
    Json(ToolsResponse { tools })
}

async fn handle_rpc(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<JsonRpcRequest>,
) -> Response {
    match handle_request(&state.tools, &state.store, req).await {
        Some(response) => Json(response).into_response(),
        // Notifications get no body
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Translate a registry error into a transport-appropriate failure.
fn tool_error_response(error: ToolError) -> Response {
    let status = match &error {
        ToolError::NotFound(_) => StatusCode::NOT_FOUND,
        ToolError::InvalidArgs(_) => StatusCode::BAD_REQUEST,
        ToolError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}
