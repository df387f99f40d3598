use serde_json::Value;

use crate::{ApiError, AttemptFailure, Cause, ErrorKind, Response};

pub(crate) const NETWORK_MESSAGE: &str = "Network error. Please check your internet connection.";
pub(crate) const TIMEOUT_MESSAGE: &str =
    "Request timeout. Please check your connection and try again.";
pub(crate) const UNKNOWN_MESSAGE: &str = "An unexpected error occurred. Please try again.";
const UNLISTED_STATUS_MESSAGE: &str = "An unexpected error occurred.";

const STATUS_MESSAGES: &[(u16, &str)] = &[
    (400, "Bad request. Please check your input."),
    (401, "Unauthorized. Please log in again."),
    (403, "Access forbidden. You don't have permission."),
    (404, "Resource not found."),
    (409, "Conflict. The resource already exists."),
    (422, "Validation failed. Please check your input."),
    (429, "Too many requests. Please try again later."),
    (500, "Server error. Please try again later."),
    (502, "Bad gateway. Service temporarily unavailable."),
    (503, "Service unavailable. Please try again later."),
    (504, "Gateway timeout. Please try again later."),
];

/// Returns the presentation message for an HTTP status code.
pub fn status_message(status: u16) -> &'static str {
    STATUS_MESSAGES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, message)| *message)
        .unwrap_or(UNLISTED_STATUS_MESSAGE)
}

/// Maps a decoded attempt onto either a successful response or an [`ApiError`].
///
/// Only a 2xx response passes through unchanged.
pub fn classify(outcome: Result<Response, AttemptFailure>) -> Result<Response, ApiError> {
    match outcome {
        Ok(response) if (200..300).contains(&response.status) => Ok(response),
        Ok(response) => Err(classify_status(response)),
        Err(failure) => Err(classify_failure(failure)),
    }
}

/// Whether a classified error may be retried, independent of attempt count.
///
/// 429 is deliberately terminal.
pub fn is_retryable(error: &ApiError) -> bool {
    match error.kind() {
        ErrorKind::Network | ErrorKind::Timeout => true,
        ErrorKind::Http => error.status_code() >= 500,
        ErrorKind::Unknown => false,
    }
}

fn classify_status(response: Response) -> ApiError {
    let message = body_message(&response.data)
        .map(str::to_owned)
        .unwrap_or_else(|| status_message(response.status).to_owned());
    ApiError::new(
        ErrorKind::Http,
        message,
        response.status,
        Some(Cause::Body(response.data)),
    )
}

fn classify_failure(failure: AttemptFailure) -> ApiError {
    let AttemptFailure {
        kind,
        status,
        cause,
    } = failure;
    match kind {
        ErrorKind::Network => ApiError::new(kind, NETWORK_MESSAGE, 0, Some(cause)),
        ErrorKind::Timeout => {
            ApiError::new(kind, TIMEOUT_MESSAGE, status.unwrap_or(408), Some(cause))
        }
        ErrorKind::Http => {
            let status = status.unwrap_or(0);
            ApiError::new(kind, status_message(status), status, Some(cause))
        }
        ErrorKind::Unknown => ApiError::new(kind, UNKNOWN_MESSAGE, 500, Some(cause)),
    }
}

fn body_message(data: &Value) -> Option<&str> {
    data.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use serde_json::{json, Value};

    use crate::{
        classify, is_retryable, status_message, ApiError, AttemptFailure, Cause, ErrorKind,
        Response,
    };

    fn response(status: u16, data: Value) -> Result<Response, AttemptFailure> {
        Ok(Response { status, data })
    }

    #[test]
    fn success_is_not_an_error() {
        let passed = classify(response(201, json!({"id": 4}))).expect("2xx passes");
        assert_eq!(passed.status, 201);
    }

    #[test]
    fn body_message_wins_over_table() {
        let err = classify(response(404, json!({"message": "Item not found"})))
            .expect_err("404 is an error");
        assert_eq!(err.kind(), ErrorKind::Http);
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Item not found");
        assert!(matches!(err.cause(), Some(Cause::Body(_))));
    }

    #[test]
    fn table_message_when_body_has_none() {
        let err = classify(response(404, Value::String("nope".to_owned()))).expect_err("error");
        assert_eq!(err.message(), "Resource not found.");

        let err = classify(response(503, json!({"message": ""}))).expect_err("error");
        assert_eq!(err.message(), "Service unavailable. Please try again later.");
    }

    #[test]
    fn unlisted_status_uses_generic_message() {
        assert_eq!(status_message(418), "An unexpected error occurred.");
        assert_eq!(status_message(429), "Too many requests. Please try again later.");
    }

    #[test]
    fn timeout_message_and_status() {
        let before = SystemTime::now();
        let timeout = classify(Err(AttemptFailure {
            kind: ErrorKind::Timeout,
            status: Some(408),
            cause: Cause::Deadline { timeout_ms: 10 },
        }))
        .expect_err("error");
        assert_eq!(timeout.status_code(), 408);
        assert!(timeout.message().starts_with("Request timeout."));
        assert!(is_retryable(&timeout));
        assert!(timeout.timestamp() >= before);
        assert!(timeout.timestamp() <= SystemTime::now());
    }

    #[test]
    fn retry_eligibility() {
        let err = |kind, status| ApiError::new(kind, "x", status, None);
        assert!(is_retryable(&err(ErrorKind::Network, 0)));
        assert!(is_retryable(&err(ErrorKind::Timeout, 408)));
        for status in [500, 502, 503, 504, 599] {
            assert!(is_retryable(&err(ErrorKind::Http, status)));
        }
        for status in [400, 401, 403, 404, 409, 422, 429] {
            assert!(!is_retryable(&err(ErrorKind::Http, status)));
        }
        assert!(!is_retryable(&err(ErrorKind::Unknown, 500)));
    }

    #[test]
    fn decode_failure_is_terminal_unknown() {
        let decode_err = serde_json::from_str::<Value>("{").expect_err("invalid json");
        let err = classify(Err(AttemptFailure {
            kind: ErrorKind::Unknown,
            status: Some(503),
            cause: Cause::Decode(decode_err),
        }))
        .expect_err("error");
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.status_code(), 500);
        assert!(!is_retryable(&err));
    }
}
