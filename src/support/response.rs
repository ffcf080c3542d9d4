//! Status-tagged tool results.
//!
//! Tools return `Result<T, ToolError>`. At the boundary a result renders as
//! a JSON object whose `status` is `"success"` (payload fields alongside)
//! or `"error"` (with `message` and `error_kind`).

use serde::Serialize;
use serde_json::{Map, Value};

/// Category of a tool failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The requested entity does not exist.
    NotFound,
    /// A call to DynamoDB, SSM or the issue tracker failed.
    ExternalService,
    /// The request is missing a required identifying field.
    Validation,
    /// Stored data could not be interpreted.
    Data,
    /// The integration is not configured.
    NotConfigured,
}

/// Error result of a support tool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn external(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExternalService, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotConfigured, message)
    }
}

pub type ToolResult<T> = Result<T, ToolError>;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Render a tool result as a status-tagged JSON object.
///
/// Payloads that do not serialize to an object are placed under `result`.
pub fn to_response<T: Serialize>(result: &ToolResult<T>) -> Value {
    let mut body = Map::new();
    match result {
        Ok(payload) => {
            body.insert("status".to_string(), Value::from(STATUS_SUCCESS));
            match serde_json::to_value(payload) {
                Ok(Value::Object(fields)) => body.extend(fields),
                Ok(other) => {
                    body.insert("result".to_string(), other);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize tool result");
                    return error_body(&ToolError::new(
                        ErrorKind::Data,
                        format!("Failed to serialize result: {e}"),
                    ));
                }
            }
        }
        Err(err) => return error_body(err),
    }
    Value::Object(body)
}

fn error_body(err: &ToolError) -> Value {
    serde_json::json!({
        "status": STATUS_ERROR,
        "error_kind": err.kind,
        "message": err.message,
    })
}
