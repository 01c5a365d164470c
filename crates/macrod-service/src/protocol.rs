//! JSON line protocol for the command channel
//!
//! One message per line. Messages are wrapped in `[...]` for resilience:
//! a receiver can discard any line that does not carry the brackets
//! without attempting to parse it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Strip the outer brackets from a channel message
///
/// Returns the inner content if brackets are present.
pub fn strip_brackets(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        Some(&trimmed[1..trimmed.len() - 1])
    } else {
        None
    }
}

/// Wrap an encoded message for the wire
pub fn wrap(json: &str) -> String {
    format!("[{}]", json)
}

/// An inbound command from the UI layer
///
/// `id` is the correlation id echoed back in the reply; `params` carries
/// method-specific arguments and defaults to null when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub id: u64,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl MethodCall {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }

    /// Parse one channel line into a call
    ///
    /// Returns `None` for anything unparseable; the channel drops such
    /// lines rather than failing.
    pub fn parse(line: &str) -> Option<Self> {
        let inner = strip_brackets(line)?;
        serde_json::from_str(inner).ok()
    }
}

/// Structured error carried in a failed reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyError {
    pub code: String,
    pub message: String,
}

/// An outbound reply correlated to one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,
}

impl Reply {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: u64, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            success: false,
            result: None,
            error: Some(ReplyError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// Reply for a method name this channel does not implement
    pub fn not_implemented(id: u64, method: &str) -> Self {
        Self::error(id, "NOT_IMPLEMENTED", format!("not implemented: {}", method))
    }

    pub fn is_not_implemented(&self) -> bool {
        self.error
            .as_ref()
            .map(|e| e.code == "NOT_IMPLEMENTED")
            .unwrap_or(false)
    }

    /// Encode for the wire, bracket-wrapped
    pub fn encode(&self) -> String {
        // Serialization of this shape cannot fail; fall back to a bare
        // error object if it somehow does
        let json = serde_json::to_string(self)
            .unwrap_or_else(|_| format!(r#"{{"id":{},"success":false}}"#, self.id));
        wrap(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_brackets_valid() {
        assert_eq!(
            strip_brackets(r#"[{"method":"test"}]"#),
            Some(r#"{"method":"test"}"#)
        );
    }

    #[test]
    fn test_strip_brackets_whitespace() {
        assert_eq!(strip_brackets("  [content]  "), Some("content"));
    }

    #[test]
    fn test_strip_brackets_invalid() {
        assert_eq!(strip_brackets("no brackets"), None);
        assert_eq!(strip_brackets("[missing end"), None);
        assert_eq!(strip_brackets("missing start]"), None);
    }

    #[test]
    fn test_parse_call() {
        let call = MethodCall::parse(r#"[{"id":1,"method":"startService"}]"#).unwrap();
        assert_eq!(call.id, 1);
        assert_eq!(call.method, "startService");
        assert_eq!(call.params, Value::Null);
    }

    #[test]
    fn test_parse_call_with_params() {
        let line = r#"[{"id":7,"method":"emitEvent","params":{"eventType":"macro_completed"}}]"#;
        let call = MethodCall::parse(line).unwrap();
        assert_eq!(call.id, 7);
        assert_eq!(call.params["eventType"], "macro_completed");
    }

    #[test]
    fn test_parse_invalid_lines() {
        assert!(MethodCall::parse("not json").is_none());
        assert!(MethodCall::parse("[not json]").is_none());
        assert!(MethodCall::parse(r#"{"id":1,"method":"x"}"#).is_none());
    }

    #[test]
    fn test_reply_success_encoding() {
        let reply = Reply::success(3, json!(true));
        let encoded = reply.encode();

        let inner = strip_brackets(&encoded).unwrap();
        let parsed: Value = serde_json::from_str(inner).unwrap();
        assert_eq!(parsed["id"], 3);
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["result"], true);
        assert!(parsed.get("error").is_none());
    }

    #[test]
    fn test_reply_error_encoding() {
        let reply = Reply::error(4, "START_FAILED", "engine start: refused");
        let encoded = reply.encode();

        let inner = strip_brackets(&encoded).unwrap();
        let parsed: Value = serde_json::from_str(inner).unwrap();
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["error"]["code"], "START_FAILED");
        assert!(parsed.get("result").is_none());
    }

    #[test]
    fn test_not_implemented_reply() {
        let reply = Reply::not_implemented(9, "doesNotExist");
        assert!(reply.is_not_implemented());
        assert!(!reply.success);
        assert!(reply.error.unwrap().message.contains("doesNotExist"));
    }
}
