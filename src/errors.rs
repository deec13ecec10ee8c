use thiserror::Error;

/// Failures raised while handling a protocol request.
///
/// Every variant maps to exactly one JSON-RPC error code in `mcp::rpc`; the
/// dispatcher never lets an `AppError` escape as anything else.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("method not found: {method}")]
    MethodNotFound { method: String },
    #[error("invalid params: {message}")]
    InvalidParams {
        code: &'static str,
        message: String,
    },
    #[error("tool '{name}' failed: {message}")]
    ToolFailed { name: String, message: String },
    #[error("internal error")]
    Internal { code: &'static str, message: String },
}

impl AppError {
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn invalid_params(code: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            code,
            message: message.into(),
        }
    }

    pub fn tool_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: "internal_error",
            message: message.into(),
        }
    }
}

/// Failure reported by a tool's execute operation.
///
/// Tools are external collaborators; whatever detail they report is carried
/// as an opaque message and surfaced to the caller as an internal error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ToolError {
    message: String,
}

impl ToolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
