//! Error taxonomy for backend calls and the message-extraction rules the
//! dashboard uses when the backend reports a failure.

use serde_json::Value;

/// A failed backend call.
///
/// Every variant is recoverable: callers downgrade it to a logged message
/// plus a user-facing notification.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// Transport failure: connection refused, DNS, timeout.
    #[error("could not reach the backend at {url}: {reason}")]
    Network { url: String, reason: String },

    /// The backend answered, but not with the shape the client expects.
    #[error("unexpected response from {url}: {reason}")]
    Malformed { url: String, reason: String },

    /// The backend answered with a non-success status.
    #[error(
        "backend returned HTTP {status}: {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Backend {
        status: u16,
        message: Option<String>,
    },
}

impl ApiError {
    /// Message to show the user, with `fallback` standing in when the
    /// backend reported an error without any readable text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Network { .. } => {
                "Could not reach the backend. Make sure the server is running.".to_string()
            }
            Self::Malformed { reason, .. } => format!("Unexpected backend response: {reason}"),
            Self::Backend { message, .. } => message
                .clone()
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Whether the failure happened before any response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

/// Pull a human-readable error message out of a backend error body.
///
/// Checked in order: `detail.message`, `detail` when it is a string,
/// `message`, and finally the `msg` entries of a validation-error list in
/// `detail`.
pub fn extract_error_message(body: &Value) -> Option<String> {
    let detail = body.get("detail");

    if let Some(message) = detail
        .and_then(|d| d.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_string());
    }

    if let Some(Value::String(message)) = detail {
        return Some(message.clone());
    }

    if let Some(message) = body.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    let items = detail.and_then(Value::as_array)?;
    let messages: Vec<&str> = items
        .iter()
        .filter_map(|item| item.get("msg").and_then(Value::as_str))
        .collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_nested_detail_message() {
        let body = json!({"detail": {"error": "PredictionError", "message": "X"}});
        assert_eq!(extract_error_message(&body).as_deref(), Some("X"));
    }

    #[test]
    fn extracts_string_detail() {
        let body = json!({"detail": "X"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("X"));
    }

    #[test]
    fn extracts_top_level_message() {
        let body = json!({"message": "X"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("X"));
    }

    #[test]
    fn nested_message_wins_over_top_level() {
        let body = json!({"detail": {"message": "inner"}, "message": "outer"});
        assert_eq!(extract_error_message(&body).as_deref(), Some("inner"));
    }

    #[test]
    fn joins_validation_error_list() {
        let body = json!({"detail": [
            {"loc": ["body", "features"], "msg": "field required"},
            {"loc": ["query", "text"], "msg": "value is not a valid string"}
        ]});
        assert_eq!(
            extract_error_message(&body).as_deref(),
            Some("field required; value is not a valid string")
        );
    }

    #[test]
    fn returns_none_without_any_message() {
        assert_eq!(extract_error_message(&json!({"error": "oops"})), None);
        assert_eq!(extract_error_message(&json!({"detail": {"code": 3}})), None);
        assert_eq!(extract_error_message(&json!([])), None);
    }

    #[test]
    fn user_message_uses_fallback_for_silent_backend_errors() {
        let err = ApiError::Backend {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("Unknown error"), "Unknown error");

        let err = ApiError::Backend {
            status: 400,
            message: Some("bad features".to_string()),
        };
        assert_eq!(err.user_message("Unknown error"), "bad features");
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = ApiError::Backend {
            status: 404,
            message: Some("Model 'x' not found".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "backend returned HTTP 404: Model 'x' not found"
        );
    }
}
