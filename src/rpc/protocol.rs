//! RPC protocol message types
//!
//! Each message is a single JSON object on a single line:
//!
//! ```text
//! -> {"method":"API.StopGroup","params":["web"]}
//! <- {"id":null,"result":{"Total":2,"Errors":0},"error":null}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::RpcError;

use super::naming;

/// RPC request from client to daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Fully qualified method name (`API.StopGroup`)
    pub method: String,
    /// Positional parameters, in call order
    pub params: Vec<Value>,
}

impl Request {
    /// Build a request for an operation name such as `stop_group`
    pub fn new(name: &str, params: Vec<Value>) -> Self {
        Self {
            method: naming::method_name(name),
            params,
        }
    }
}

/// RPC response from daemon to client
///
/// The daemon normally sends both `result` and `error` (one of them null) and
/// echoes the request `id`; only `result` and `error` matter here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Request ID echoed by the daemon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Result value on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure, usually a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Response {
    /// Create a success response
    pub fn success(result: Value) -> Self {
        Self {
            result: Some(result),
            ..Self::default()
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(Value::String(message.into())),
            ..Self::default()
        }
    }

    /// Parse a response line
    ///
    /// Bytes that are not valid UTF-8 are a parse error like any other bad
    /// JSON; they show up as U+FFFD in the error's raw text.
    pub fn parse(line: &[u8]) -> Result<Self, RpcError> {
        serde_json::from_slice(line).map_err(|e| RpcError::Parse {
            raw: String::from_utf8_lossy(line).into_owned(),
            reason: e.to_string(),
        })
    }

    /// Whether the daemon reported an error
    ///
    /// `null` and `false` count as no error.
    pub fn is_error(&self) -> bool {
        !matches!(self.error, None | Some(Value::Null) | Some(Value::Bool(false)))
    }

    /// Get the result, returning an error if the daemon reported one
    pub fn into_result(self) -> Result<Value, RpcError> {
        if self.is_error() {
            let message = match self.error {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => String::new(),
            };
            return Err(RpcError::Server(message));
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let req = Request::new("status_process", vec![json!("gofy")]);
        let wire: Value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            wire,
            json!({"method": "API.StatusProcess", "params": ["gofy"]})
        );
    }

    #[test]
    fn test_request_without_params_sends_empty_array() {
        let req = Request::new("stop_all", vec![]);
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"method":"API.StopAll","params":[]}"#);
    }

    #[test]
    fn test_request_params_keep_order() {
        let req = Request::new("call", vec![json!(1), json!("two"), json!({"three": 3})]);
        assert_eq!(req.params, vec![json!(1), json!("two"), json!({"three": 3})]);
    }

    #[test]
    fn test_response_result() {
        let resp = Response::parse(br#"{"result": {"license": "gfl"}}"#).unwrap();
        assert!(!resp.is_error());
        assert_eq!(resp.into_result().unwrap(), json!({"license": "gfl"}));
    }

    #[test]
    fn test_response_full_envelope() {
        let resp =
            Response::parse(br#"{"id":null,"result":{"Total":1,"Errors":0},"error":null}"#).unwrap();
        assert_eq!(
            resp.into_result().unwrap(),
            json!({"Total": 1, "Errors": 0})
        );
    }

    #[test]
    fn test_response_missing_result_is_null() {
        let resp = Response::parse(b"{}").unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_response_string_error() {
        let err = Response::parse(br#"{"error": "pancakes"}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err, RpcError::Server("pancakes".to_string()));
    }

    #[test]
    fn test_response_structured_error_is_stringified() {
        let err = Response::parse(br#"{"error": {"code": 7}}"#)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert_eq!(err.message(), r#"{"code":7}"#);
    }

    #[test]
    fn test_response_false_error_is_ignored() {
        let resp = Response::parse(br#"{"result": 3, "error": false}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), json!(3));
    }

    #[test]
    fn test_response_error_wins_over_result() {
        let resp = Response::parse(br#"{"result": 3, "error": "boom"}"#).unwrap();
        assert!(resp.into_result().is_err());
    }

    #[test]
    fn test_parse_nonsense() {
        let err = Response::parse(b"nonsense").unwrap_err();
        assert!(matches!(err, RpcError::Parse { .. }));
        assert!(err.message().contains("nonsense"));
    }

    #[test]
    fn test_parse_non_object() {
        let err = Response::parse(br#""ok""#).unwrap_err();
        assert!(err.message().contains(r#""ok""#));
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let err = Response::parse(b"non\xffsense").unwrap_err();
        assert!(matches!(err, RpcError::Parse { .. }));
        assert!(err.message().contains("non\u{fffd}sense"));
    }

    #[test]
    fn test_response_helpers() {
        assert!(Response::error("nope").is_error());
        assert_eq!(
            Response::success(json!("ok")).into_result().unwrap(),
            json!("ok")
        );
    }
}
