use std::time::SystemTime;

/// Stable failure category of an [`ApiError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Connectivity failure (DNS, refused connection, aborted transfer).
    Network,
    /// The per-attempt deadline elapsed.
    Timeout,
    /// A completed exchange with a non-2xx status code.
    Http,
    /// Decode failure or any other unclassified cause.
    Unknown,
}

/// Original failure attached to an [`ApiError`].
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The attempt was cancelled by its deadline.
    #[error("deadline of {timeout_ms} ms elapsed")]
    Deadline { timeout_ms: u64 },
    /// Response body declared as JSON could not be parsed.
    #[error("decode error: {0}")]
    Decode(serde_json::Error),
    /// Request body could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(serde_json::Error),
    /// Decoded body of a non-2xx response.
    #[error("response body: {0}")]
    Body(serde_json::Value),
}

/// The only failure type surfaced to callers.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    status_code: u16,
    #[source]
    cause: Option<Cause>,
    timestamp: SystemTime,
}

impl ApiError {
    /// Creates an error stamped with the current time.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        status_code: u16,
        cause: Option<Cause>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code,
            cause,
            timestamp: SystemTime::now(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message suitable for presentation.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, `0` when no exchange took place.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Instant the error was classified.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use crate::{ApiError, Cause, ErrorKind};

    #[test]
    fn display_is_the_message() {
        let err = ApiError::new(ErrorKind::Http, "Resource not found.", 404, None);
        assert_eq!(err.to_string(), "Resource not found.");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.kind(), ErrorKind::Http);
    }

    #[test]
    fn source_points_at_cause() {
        let err = ApiError::new(
            ErrorKind::Timeout,
            "timeout",
            408,
            Some(Cause::Deadline { timeout_ms: 20 }),
        );
        let source = err.source().expect("must expose cause as source");
        assert_eq!(source.to_string(), "deadline of 20 ms elapsed");
    }
}
