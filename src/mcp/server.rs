//! The central Model Context Protocol engine
//!
//! Provides JSON-RPC decoding and the per-request routing of `initialize`,
//! `tools/list`, `tools/call`, and `ping` against the tool registry. Every
//! request terminates in exactly one response; failures become structured
//! error payloads, never panics.

use chrono::{SecondsFormat, Utc};
use rust_mcp_sdk::schema::{
    CallToolRequest, CallToolRequestParams, CallToolResult, ContentBlock, Implementation,
    InitializeRequest, InitializeResult, JsonrpcMessage, JsonrpcRequest, ListToolsRequest,
    PingRequest, ProtocolVersion, ServerCapabilities, ServerCapabilitiesTools, TextContent,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::logging::redact_params;
use crate::mcp::rpc::{
    app_error_response, error_response, is_error_payload, request_id_to_value, result_response,
};
use crate::registry::ToolListing;
use crate::AppState;

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";

/// Entry point for transports: takes an already-parsed JSON payload and
/// returns the response value, or `None` for notifications.
pub async fn handle_json_rpc_value(state: &AppState, payload: Value) -> Option<Value> {
    if !payload.is_object() {
        return Some(error_response(None, -32600, "Invalid Request", None));
    }

    let request_id = payload.get("id").cloned();
    let parsed: JsonrpcMessage = match serde_json::from_value(payload) {
        Ok(message) => message,
        Err(_) => return Some(error_response(request_id, -32600, "Invalid Request", None)),
    };

    match parsed {
        JsonrpcMessage::Request(request) => {
            if let Err(rejection) = validate_shape(&request) {
                return Some(rejection);
            }

            let request_id = request_id_to_value(request.id);
            if request.method.trim().is_empty() {
                return Some(error_response(
                    Some(request_id),
                    -32600,
                    "Invalid Request",
                    None,
                ));
            }

            Some(
                route_request(
                    state,
                    Some(request_id),
                    request.method,
                    request.params.map(Value::Object),
                )
                .await,
            )
        }
        JsonrpcMessage::Notification(notification) => {
            if notification.method.trim().is_empty() {
                return None;
            }

            let _ = route_request(
                state,
                None,
                notification.method,
                notification.params.map(Value::Object),
            )
            .await;
            None
        }
        JsonrpcMessage::ResultResponse(_) | JsonrpcMessage::ErrorResponse(_) => {
            Some(error_response(request_id, -32600, "Invalid Request", None))
        }
    }
}

fn validate_shape(request: &JsonrpcRequest) -> Result<(), Value> {
    let payload = serde_json::to_value(request).expect("jsonrpc request serialization");
    let request_id = Some(request_id_to_value(request.id.clone()));

    let valid = match request.method.as_str() {
        "initialize" => serde_json::from_value::<InitializeRequest>(payload).is_ok(),
        "tools/list" => serde_json::from_value::<ListToolsRequest>(payload).is_ok(),
        "tools/call" => serde_json::from_value::<CallToolRequest>(payload).is_ok(),
        "ping" => serde_json::from_value::<PingRequest>(payload).is_ok(),
        _ => true,
    };

    if valid {
        Ok(())
    } else {
        Err(app_error_response(
            request_id,
            AppError::invalid_params(
                "malformed_request",
                "params do not match the method schema",
            ),
        ))
    }
}

async fn route_request(
    state: &AppState,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
) -> Value {
    let audit_id = id.clone().unwrap_or(Value::Null);
    let audit_params = redact_params(params.as_ref());

    let response = match method.as_str() {
        "initialize" => handle_initialize(state, id),
        "tools/list" => handle_tools_list(state, id),
        "tools/call" => handle_tools_call(state, id, params).await,
        "ping" => handle_ping(state, id),
        _ => app_error_response(id, AppError::method_not_found(method.clone())),
    };

    info!(
        method = %method,
        id = %audit_id,
        params = %audit_params,
        outcome = if is_error_payload(&response) { "failure" } else { "success" },
        "request handled"
    );

    response
}

fn handle_initialize(state: &AppState, id: Option<Value>) -> Value {
    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: state.server_name.to_string(),
            version: state.server_version.to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            // The tool table is fixed for the process lifetime, so clients
            // never receive a list-changed signal.
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    };

    result_response(
        id,
        serde_json::to_value(initialize_result).expect("initialize result serialization"),
    )
}

fn handle_tools_list(state: &AppState, id: Option<Value>) -> Value {
    let tools: Vec<ToolListing> = state
        .registry
        .list()
        .iter()
        .map(ToolListing::from_descriptor)
        .collect();

    result_response(id, json!({ "tools": tools }))
}

fn handle_ping(state: &AppState, id: Option<Value>) -> Value {
    result_response(
        id,
        json!({
            "status": "ok",
            "timestamp_utc": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            "server": {
                "name": &*state.server_name,
                "version": &*state.server_version,
            },
        }),
    )
}

async fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return app_error_response(
            id,
            AppError::invalid_params("missing_params", "tools/call requires params"),
        );
    };

    let call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => {
            return app_error_response(
                id,
                AppError::invalid_params(
                    "malformed_params",
                    "tools/call params must carry a tool name and an arguments object",
                ),
            )
        }
    };

    let Some(descriptor) = state.registry.get(&call.name) else {
        return app_error_response(
            id,
            AppError::invalid_params("tool_not_found", format!("unknown tool: {}", call.name)),
        );
    };

    let arguments = call.arguments.unwrap_or_default();
    info!(tool = %descriptor.name, "tool execution started");

    match descriptor.executor.execute(arguments).await {
        Ok(value) => {
            info!(tool = %descriptor.name, "tool execution succeeded");
            let result = CallToolResult {
                content: vec![ContentBlock::from(TextContent::new(
                    value.to_string(),
                    None,
                    None,
                ))],
                is_error: None,
                meta: None,
                structured_content: value.as_object().cloned(),
            };

            result_response(
                id,
                serde_json::to_value(result).expect("tool call result serialization"),
            )
        }
        Err(err) => {
            warn!(tool = %descriptor.name, error = %err, "tool execution failed");
            app_error_response(
                id,
                AppError::tool_failed(&descriptor.name, err.to_string()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::registry::ToolRegistry;
    use crate::AppState;

    use super::*;

    fn empty_state() -> AppState {
        AppState::new(
            "unit-server".to_string(),
            "9.9.9".to_string(),
            Arc::new(ToolRegistry::new()),
        )
    }

    #[test]
    fn initialize_advertises_static_tool_listing() {
        let response = handle_initialize(&empty_state(), Some(json!(1)));

        assert_eq!(
            response["result"]["protocolVersion"],
            json!(SUPPORTED_PROTOCOL_VERSION)
        );
        assert_eq!(
            response["result"]["capabilities"]["tools"]["listChanged"],
            json!(false)
        );
        assert_eq!(response["result"]["serverInfo"]["name"], json!("unit-server"));
        assert_eq!(response["result"]["serverInfo"]["version"], json!("9.9.9"));
    }

    #[test]
    fn ping_reports_liveness() {
        let response = handle_ping(&empty_state(), Some(json!(2)));

        assert_eq!(response["result"]["status"], json!("ok"));
        assert_eq!(response["result"]["server"]["name"], json!("unit-server"));
        let timestamp = response["result"]["timestamp_utc"]
            .as_str()
            .expect("timestamp string");
        assert!(timestamp.ends_with('Z'));
    }

    #[test]
    fn tools_list_on_empty_registry_is_empty_array() {
        let response = handle_tools_list(&empty_state(), Some(json!(3)));

        assert_eq!(response["result"]["tools"], json!([]));
    }
}
