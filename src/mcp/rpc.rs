//! JSON-RPC envelope construction and error mapping
//!
//! Centralizes the translation from `AppError` values to valid JSON-RPC
//! payloads so that every failure path produces the same wire shape.

use rust_mcp_sdk::schema::{
    JsonrpcErrorResponse, JsonrpcResultResponse, RequestId, Result as McpResult, RpcError,
};
use serde_json::{json, Value};
use tracing::error;

use crate::errors::AppError;

pub fn is_error_payload(value: &Value) -> bool {
    value.get("error").is_some()
}

pub fn result_response(id: Option<Value>, result: Value) -> Value {
    if let Some(request_id) = id.as_ref().and_then(value_to_request_id) {
        let extra = result.as_object().cloned();
        let response = JsonrpcResultResponse::new(request_id, McpResult { meta: None, extra });
        return serde_json::to_value(response).expect("jsonrpc result response serialization");
    }

    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

pub fn error_response(id: Option<Value>, code: i32, message: &str, data: Option<Value>) -> Value {
    let response = JsonrpcErrorResponse::new(
        RpcError {
            code: i64::from(code),
            data,
            message: message.to_string(),
        },
        id.as_ref().and_then(value_to_request_id),
    );
    serde_json::to_value(response).expect("jsonrpc error response serialization")
}

/// Maps the error taxonomy onto the three protocol error codes. Internal
/// details are logged but not echoed to the caller; tool failures carry
/// their diagnostic message so callers can tell what went wrong.
pub fn app_error_response(id: Option<Value>, err: AppError) -> Value {
    match err {
        AppError::MethodNotFound { method } => error_response(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "method_not_found",
                "message": format!("unrecognized method: {method}"),
                "details": { "method": method },
            })),
        ),
        AppError::InvalidParams { code, message } => error_response(
            id,
            -32602,
            "Invalid params",
            Some(json!({
                "code": code,
                "message": message,
                "details": {},
            })),
        ),
        AppError::ToolFailed { name, message } => error_response(
            id,
            -32603,
            "Internal error",
            Some(json!({
                "code": "tool_execution_failed",
                "message": message,
                "details": { "name": name },
            })),
        ),
        AppError::Internal { code, message } => {
            error!(code, error = %message, "request failed with internal error");
            error_response(id, -32603, "Internal error", None)
        }
    }
}

pub fn value_to_request_id(value: &Value) -> Option<RequestId> {
    if let Some(string_id) = value.as_str() {
        return Some(RequestId::String(string_id.to_string()));
    }

    value.as_i64().map(RequestId::Integer)
}

pub fn request_id_to_value(id: RequestId) -> Value {
    match id {
        RequestId::String(value) => Value::String(value),
        RequestId::Integer(value) => Value::Number(value.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_taxonomy_to_protocol_codes() {
        let cases = vec![
            (AppError::method_not_found("foo/bar"), -32601),
            (
                AppError::invalid_params("tool_not_found", "unknown tool: missing"),
                -32602,
            ),
            (AppError::tool_failed("boom", "exploded"), -32603),
            (AppError::internal("state corrupted"), -32603),
        ];

        for (err, code) in cases {
            let response = app_error_response(Some(json!(9)), err);
            assert_eq!(response["jsonrpc"], json!("2.0"));
            assert_eq!(response["id"], json!(9));
            assert_eq!(response["error"]["code"], json!(code));
            assert!(response.get("result").is_none());
        }
    }

    #[test]
    fn tool_failure_data_names_the_tool() {
        let response = app_error_response(
            Some(json!("r-1")),
            AppError::tool_failed("scan_deps", "registry unreachable"),
        );

        assert_eq!(response["id"], json!("r-1"));
        assert_eq!(
            response["error"]["data"]["details"]["name"],
            json!("scan_deps")
        );
        assert_eq!(
            response["error"]["data"]["message"],
            json!("registry unreachable")
        );
    }

    #[test]
    fn internal_detail_is_not_echoed() {
        let response = app_error_response(Some(json!(1)), AppError::internal("secret detail"));

        assert_eq!(response["error"]["code"], json!(-32603));
        assert_eq!(response["error"]["message"], json!("Internal error"));
        assert!(response["error"].get("data").is_none() || response["error"]["data"].is_null());
    }

    #[test]
    fn result_response_preserves_string_and_integer_ids() {
        let by_number = result_response(Some(json!(42)), json!({ "status": "ok" }));
        assert_eq!(by_number["id"], json!(42));
        assert_eq!(by_number["result"]["status"], json!("ok"));

        let by_string = result_response(Some(json!("req-7")), json!({ "status": "ok" }));
        assert_eq!(by_string["id"], json!("req-7"));
    }
}
