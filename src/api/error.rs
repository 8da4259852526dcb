use serde_json::Value;

/// Failure of a single backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {}", status_detail(.error, .body))]
    Status {
        status: u16,
        /// The `error` field of the JSON body, when there is one.
        error: Option<String>,
        body: String,
    },
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Transport(String),
    /// A 2xx response whose body could not be understood.
    #[error("Invalid response: {0}")]
    Decode(String),
    /// A 2xx response that still reported an `error` field.
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Build a status error, pulling the backend's `error` field out of `body`.
    pub fn from_status(status: u16, body: String) -> Self {
        Self::Status {
            status,
            error: error_field(&body),
            body,
        }
    }

    /// The backend-supplied `error` message, if the response carried one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { error, .. } => error.as_deref(),
            Self::Backend(message) => Some(message),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    /// Message shown to the user.
    ///
    /// Priority: backend `error` field, then the transport-level message,
    /// then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(message) = self.backend_message().filter(|m| !m.trim().is_empty()) {
            return message.to_string();
        }
        let transport = match self {
            Self::Status { status, .. } => format!("Request failed with status code {status}"),
            Self::Transport(message) | Self::Decode(message) | Self::Backend(message) => {
                message.clone()
            }
        };
        if transport.trim().is_empty() {
            fallback.to_string()
        } else {
            transport
        }
    }
}

fn status_detail<'a>(error: &'a Option<String>, body: &'a str) -> &'a str {
    error.as_deref().unwrap_or(body)
}

/// Extract a string `error` field from a JSON body.
pub(crate) fn error_field(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body.trim()).ok()?;
    match value.get("error")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_backend_error_field() {
        let err = ApiError::from_status(500, r#"{"error":"model offline"}"#.into());
        assert_eq!(err.user_message("Suggest failed"), "model offline");
    }

    #[test]
    fn falls_back_to_status_text_without_error_field() {
        let err = ApiError::from_status(502, "<html>bad gateway</html>".into());
        assert_eq!(
            err.user_message("Suggest failed"),
            "Request failed with status code 502"
        );
    }

    #[test]
    fn uses_transport_message_then_fallback() {
        let err = ApiError::Transport("Connection refused".into());
        assert_eq!(err.user_message("Calculation failed"), "Connection refused");
        let empty = ApiError::Transport(String::new());
        assert_eq!(empty.user_message("Calculation failed"), "Calculation failed");
    }

    #[test]
    fn ignores_null_error_field() {
        assert_eq!(error_field(r#"{"error":null}"#), None);
        assert_eq!(error_field("not json"), None);
        assert_eq!(error_field(r#"{"error":{"code":7}}"#).as_deref(), Some(r#"{"code":7}"#));
    }
}
