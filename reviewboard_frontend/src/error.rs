use std::collections::BTreeMap;

use serde::Deserialize;

/// Failure of a single API round trip.
///
/// Kept `Clone` so the query cache can hand the same failure to every reader
/// that was waiting on one in-flight request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("{message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether a read that failed this way is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            _ => false,
        }
    }

    /// Field-level messages attached by the server, empty for every other kind.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            ApiError::Validation { fields, .. } => fields.clone(),
            _ => BTreeMap::new(),
        }
    }

    /// Maps a non-2xx status and its raw body onto the error taxonomy.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        match status {
            401 => return ApiError::Unauthorized,
            404 => return ApiError::NotFound,
            _ => {}
        }

        let parsed: Option<ErrorBody> = serde_json::from_slice(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| format!("request failed with status {status}"));

        if status == 400 || status == 422 {
            if let Some(body) = parsed {
                let fields = match body.errors {
                    Some(ErrorDetails::Fields(map)) => map,
                    Some(ErrorDetails::Messages(list)) => {
                        return ApiError::Validation {
                            message: if list.is_empty() { message } else { list.join("; ") },
                            fields: BTreeMap::new(),
                        };
                    }
                    None => BTreeMap::new(),
                };
                return ApiError::Validation { message, fields };
            }
        }

        ApiError::Status { status, message }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<ErrorDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorDetails {
    Fields(BTreeMap<String, String>),
    Messages(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_map_becomes_validation_error() {
        let body = br#"{"message":"Invalid review","status":400,"errors":{"title":"too short","companyName":"required"}}"#;
        let err = ApiError::from_status(400, body);
        let fields = err.field_errors();
        assert_eq!(fields.get("title").map(String::as_str), Some("too short"));
        assert_eq!(fields.get("companyName").map(String::as_str), Some("required"));
        assert_eq!(err.to_string(), "Invalid review");
    }

    #[test]
    fn message_list_has_no_fields() {
        let body = br#"{"message":"bad","errors":["first","second"]}"#;
        match ApiError::from_status(422, body) {
            ApiError::Validation { message, fields } => {
                assert_eq!(message, "first; second");
                assert!(fields.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn auth_and_missing_statuses() {
        assert_eq!(ApiError::from_status(401, b""), ApiError::Unauthorized);
        assert_eq!(ApiError::from_status(404, b"{}"), ApiError::NotFound);
        assert!(matches!(
            ApiError::from_status(500, b"oops"),
            ApiError::Status { status: 500, .. }
        ));
    }

    #[test]
    fn only_transient_failures_retry() {
        assert!(ApiError::Transport("reset".into()).is_retryable());
        assert!(ApiError::from_status(503, b"").is_retryable());
        assert!(ApiError::from_status(429, b"").is_retryable());
        assert!(!ApiError::NotFound.is_retryable());
        assert!(!ApiError::from_status(400, b"{}").is_retryable());
    }
}
