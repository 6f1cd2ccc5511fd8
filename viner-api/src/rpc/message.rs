//! JSON-RPC request parsing and response framing.
//!
//! Two dialects share one method table. They differ only on the wire:
//!
//! ```text
//! 1.0  request  {"method": m, "params": p, "id": i}         id null => notification
//!      response {"result": r, "error": null, "id": i}
//! 2.0  request  {"jsonrpc": "2.0", "method": m, "params": p, "id": i}   no id => notification
//!      response {"jsonrpc": "2.0", "result": r, "id": i}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::farm::FarmError;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INTERNAL_ERROR: i64 = -32603;

/// Error object carried in a response.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message} ({code})")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }

    pub fn invalid_request(detail: &str) -> Self {
        Self {
            data: Some(Value::String(detail.to_string())),
            ..Self::new(INVALID_REQUEST, "Invalid Request")
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            data: Some(Value::String(method.to_string())),
            ..Self::new(METHOD_NOT_FOUND, "Method not found")
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

/// Farm failures surface as internal errors carrying the farm's own text.
impl From<FarmError> for RpcError {
    fn from(err: FarmError) -> Self {
        Self::internal(err.to_string())
    }
}

/// Wire dialect of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    V1,
    V2,
}

/// A request that passed structural validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub dialect: Dialect,
    /// `None` for notifications.
    pub id: Option<Value>,
    pub method: String,
    /// Whatever the caller sent; `Null` when absent.
    pub params: Value,
}

/// A request that failed validation, with enough context to answer it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub dialect: Dialect,
    pub id: Value,
    pub error: RpcError,
}

impl Request {
    /// Validate one request object. `fallback` is the dialect used to answer
    /// requests too malformed to have one.
    pub fn from_value(value: Value, fallback: Dialect) -> Result<Self, Rejected> {
        let Value::Object(mut obj) = value else {
            return Err(Rejected {
                dialect: fallback,
                id: Value::Null,
                error: RpcError::invalid_request("request must be an object"),
            });
        };

        let dialect = match obj.remove("jsonrpc") {
            None => Dialect::V1,
            Some(Value::String(v)) if v == "2.0" => Dialect::V2,
            Some(_) => {
                return Err(Rejected {
                    dialect: fallback,
                    id: obj.remove("id").unwrap_or(Value::Null),
                    error: RpcError::invalid_request("unsupported jsonrpc version"),
                });
            }
        };

        let id = match (dialect, obj.remove("id")) {
            (Dialect::V1, None) => {
                return Err(Rejected {
                    dialect,
                    id: Value::Null,
                    error: RpcError::invalid_request("missing id"),
                });
            }
            (Dialect::V1, Some(Value::Null)) => None,
            (Dialect::V2, None) => None,
            (_, Some(id)) => Some(id),
        };

        let method = match obj.remove("method") {
            Some(Value::String(method)) => method,
            _ => {
                return Err(Rejected {
                    dialect,
                    id: id.unwrap_or(Value::Null),
                    error: RpcError::invalid_request("method must be a string"),
                });
            }
        };

        Ok(Self {
            dialect,
            id,
            method,
            params: obj.remove("params").unwrap_or(Value::Null),
        })
    }
}

/// Build the response object for one request.
pub fn frame(dialect: Dialect, id: Value, outcome: Result<Value, RpcError>) -> Value {
    match (dialect, outcome) {
        (Dialect::V2, Ok(result)) => json!({ "jsonrpc": "2.0", "result": result, "id": id }),
        (Dialect::V2, Err(error)) => json!({ "jsonrpc": "2.0", "error": error, "id": id }),
        (Dialect::V1, Ok(result)) => json!({ "result": result, "error": null, "id": id }),
        (Dialect::V1, Err(error)) => json!({ "result": null, "error": error, "id": id }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_request_with_id() {
        let req = Request::from_value(
            json!({"jsonrpc": "2.0", "method": "viner_getstat1", "id": 7}),
            Dialect::V2,
        )
        .unwrap();
        assert_eq!(req.dialect, Dialect::V2);
        assert_eq!(req.id, Some(json!(7)));
        assert_eq!(req.method, "viner_getstat1");
        assert_eq!(req.params, Value::Null);
    }

    #[test]
    fn test_v2_notification_has_no_id() {
        let req =
            Request::from_value(json!({"jsonrpc": "2.0", "method": "m"}), Dialect::V2).unwrap();
        assert_eq!(req.id, None);
    }

    #[test]
    fn test_v1_null_id_is_notification() {
        let req = Request::from_value(json!({"method": "m", "id": null}), Dialect::V2).unwrap();
        assert_eq!(req.dialect, Dialect::V1);
        assert_eq!(req.id, None);
    }

    #[test]
    fn test_v1_missing_id_rejected() {
        let rejected = Request::from_value(json!({"method": "m"}), Dialect::V2).unwrap_err();
        assert_eq!(rejected.dialect, Dialect::V1);
        assert_eq!(rejected.error.code, INVALID_REQUEST);
    }

    #[test]
    fn test_params_kept_verbatim() {
        let req = Request::from_value(
            json!({"jsonrpc": "2.0", "method": "m", "params": {"x": 1}, "id": "a"}),
            Dialect::V2,
        )
        .unwrap();
        assert_eq!(req.params, json!({"x": 1}));
    }

    #[test]
    fn test_non_object_rejected_in_fallback_dialect() {
        let rejected = Request::from_value(json!(42), Dialect::V1).unwrap_err();
        assert_eq!(rejected.dialect, Dialect::V1);
        assert_eq!(rejected.id, Value::Null);
    }

    #[test]
    fn test_bad_version_rejected() {
        let rejected =
            Request::from_value(json!({"jsonrpc": "1.5", "method": "m", "id": 3}), Dialect::V2)
                .unwrap_err();
        assert_eq!(rejected.id, json!(3));
        assert_eq!(rejected.error.code, INVALID_REQUEST);
    }

    #[test]
    fn test_method_must_be_string() {
        let rejected =
            Request::from_value(json!({"jsonrpc": "2.0", "method": 5, "id": 1}), Dialect::V2)
                .unwrap_err();
        assert_eq!(rejected.id, json!(1));
        assert_eq!(rejected.error.code, INVALID_REQUEST);
    }

    #[test]
    fn test_frame_v2_key_order() {
        let framed = frame(Dialect::V2, json!(1), Ok(json!([])));
        assert_eq!(framed.to_string(), r#"{"jsonrpc":"2.0","result":[],"id":1}"#);
    }

    #[test]
    fn test_frame_v1_error() {
        let framed = frame(Dialect::V1, json!(1), Err(RpcError::internal("boom")));
        assert_eq!(
            framed.to_string(),
            r#"{"result":null,"error":{"code":-32603,"message":"boom"},"id":1}"#
        );
    }

    #[test]
    fn test_farm_error_is_internal() {
        let err = RpcError::from(FarmError::StatsUnavailable);
        assert_eq!(err.code, INTERNAL_ERROR);
        assert_eq!(err.message, "solution statistics unavailable");
    }
}
