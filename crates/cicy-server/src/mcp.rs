//! MCP-style JSON-RPC endpoint: `initialize`, `tools/list`, `tools/call`.

use axum::{Json, extract::State};
use bytes::Bytes;
use cicy_core::Notification;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::{
    AppState,
    protocol::{
        JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION, RpcError, SERVER_NAME,
        ToolCallParams, ToolCallResult, tool_catalog, tools,
    },
    replies,
};

/// Handle one JSON-RPC request body.
///
/// Errors are always reported inside the envelope, never as HTTP errors.
pub async fn handle_rpc(State(state): State<AppState>, body: Bytes) -> Json<JsonRpcResponse> {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return Json(response),
    };
    debug!(method = %request.method, id = %request.id, "JSON-RPC request");

    let outcome = dispatch(&state, &request);
    Json(JsonRpcResponse::new(request.id, outcome))
}

fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| JsonRpcResponse::new(Value::Null, Err(RpcError::parse_error())))?;
    // Echo the id back even when the rest of the envelope is unusable.
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|_| JsonRpcResponse::new(id, Err(RpcError::parse_error())))
}

fn dispatch(state: &AppState, request: &JsonRpcRequest) -> Result<Value, RpcError> {
    match request.method.as_str() {
        "initialize" => Ok(initialize_result()),
        "tools/list" => Ok(json!({ "tools": tool_catalog() })),
        "tools/call" => {
            let params: ToolCallParams = request
                .params
                .clone()
                .and_then(|p| serde_json::from_value(p).ok())
                .unwrap_or_default();
            let result = call_tool(state, &params)?;
            serde_json::to_value(result).map_err(|e| RpcError::internal(e.to_string()))
        }
        other => Err(RpcError::method_not_found(format!("Method not found: {other}"))),
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": true }
        },
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

/// Run a tool from the catalog.
///
/// # Errors
/// Returns `-32602` for a missing message and `-32601` for unknown tools.
pub fn call_tool(state: &AppState, params: &ToolCallParams) -> Result<ToolCallResult, RpcError> {
    match params.name.as_str() {
        tools::SEND_MESSAGE => {
            let message = params
                .arguments
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .ok_or_else(|| RpcError::invalid_params("Invalid params: message required"))?;

            let id = state
                .store
                .append_text(message)
                .map_err(|e| RpcError::internal(e.to_string()))?;
            info!(id, text = %message, "Received message via tools/call");
            state.notifier.publish(Notification::text(message));

            Ok(ToolCallResult::text(replies::random_reply()))
        }
        tools::GET_MESSAGES => {
            let messages = state.store.list_text();
            let text = serde_json::to_string_pretty(&messages)
                .map_err(|e| RpcError::internal(e.to_string()))?;
            Ok(ToolCallResult::text(text))
        }
        tools::CLEAR_MESSAGES => {
            state.store.clear();
            info!("Cleared all messages");
            Ok(ToolCallResult::text("All messages cleared"))
        }
        other => Err(RpcError::method_not_found(format!("Tool not found: {other}"))),
    }
}
