//! Method dispatch shared by the stdio and HTTP RPC surfaces.

use serde_json::{Value, json};
use tracing::debug;

use crate::record::RecordStore;
use crate::tools::{ToolError, ToolRegistry};

use super::protocol::{JsonRpcRequest, JsonRpcResponse, error_codes, methods};

/// Handle one JSON-RPC request against the shared registry and store.
///
/// Returns `None` for notifications (requests without an id), which get no
/// response on any transport.
pub async fn handle_request(
    registry: &ToolRegistry,
    store: &RecordStore,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.is_notification() {
        debug!(method = %request.method, "ignoring notification");
        return None;
    }

    let id = request.id.clone();
    let response = match request.method.as_str() {
        methods::INITIALIZE => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "serverInfo": {
                    "name": "contentd",
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "capabilities": { "tools": {} },
            }),
        ),

        methods::TOOLS_LIST => {
            let tools: Vec<Value> = registry
                .list()
                .iter()
                .map(|spec| {
                    json!({
                        "name": spec.name,
                        "description": spec.description,
                        "inputSchema": spec.parameters,
                    })
                })
                .collect();
            JsonRpcResponse::success(id, json!({ "tools": tools }))
        }

        methods::TOOLS_CALL => {
            let params = request.params.unwrap_or_else(|| json!({}));
            let Some(name) = params.get("name").and_then(Value::as_str) else {
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "missing tool name",
                ));
            };
            let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

            match registry.invoke(store, name, arguments).await {
                // Tool output rides in a "content" envelope
                Ok(result) => JsonRpcResponse::success(id, json!({ "content": result })),
                Err(ToolError::NotFound(name)) => JsonRpcResponse::error(
                    id,
                    error_codes::TOOL_NOT_FOUND,
                    format!("tool not found: {name}"),
                ),
                Err(ToolError::InvalidArgs(e)) => JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("invalid arguments: {e}"),
                ),
                Err(e) => JsonRpcResponse::error(
                    id,
                    error_codes::INTERNAL_ERROR,
                    e.to_string(),
                ),
            }
        }

        other => JsonRpcResponse::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("method not found: {other}"),
        ),
    };

    Some(response)
}
