use std::collections::HashMap;

use serde_json::{json, Value};

use crate::{ApiError, RequestResult, Response};

/// Static degraded payloads keyed by logical endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct FallbackTable {
    entries: HashMap<String, Value>,
    unavailable: Value,
}

impl Default for FallbackTable {
    fn default() -> Self {
        Self::empty()
            .with_entry(
                "/data",
                json!({ "items": [], "message": "Using cached data" }),
            )
            .with_entry(
                "/users",
                json!({ "users": [], "message": "Using offline mode" }),
            )
    }
}

impl FallbackTable {
    /// Table with no endpoint entries; every lookup yields the generic payload.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            unavailable: json!({ "message": "Service temporarily unavailable" }),
        }
    }

    /// Adds or replaces the payload for `endpoint`.
    pub fn with_entry(mut self, endpoint: impl Into<String>, payload: Value) -> Self {
        self.entries.insert(endpoint.into(), payload);
        self
    }

    /// Replaces the payload used when no entry matches.
    pub fn with_unavailable(mut self, payload: Value) -> Self {
        self.unavailable = payload;
        self
    }

    /// Payload for `endpoint`, or the generic unavailable-service payload.
    pub fn lookup(&self, endpoint: &str) -> &Value {
        self.entries.get(endpoint).unwrap_or(&self.unavailable)
    }

    /// Absorbs a terminal error into a degraded result.
    ///
    /// Never retries; the call has already exhausted its attempts.
    pub(crate) fn degrade(
        &self,
        endpoint: &str,
        outcome: Result<Response, ApiError>,
    ) -> RequestResult {
        match outcome {
            Ok(response) => RequestResult::success(response),
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::error!(
                    "request to {} failed, using fallback: {} (status {})",
                    endpoint,
                    error,
                    error.status_code()
                );

                RequestResult::fallback(
                    self.lookup(endpoint).clone(),
                    error.status_code(),
                    error.message(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{ApiError, ErrorKind, FallbackTable, Response};

    #[test]
    fn default_entries() {
        let table = FallbackTable::default();
        assert_eq!(
            table.lookup("/data"),
            &json!({"items": [], "message": "Using cached data"})
        );
        assert_eq!(
            table.lookup("/users"),
            &json!({"users": [], "message": "Using offline mode"})
        );
        assert_eq!(
            table.lookup("/orders"),
            &json!({"message": "Service temporarily unavailable"})
        );
    }

    #[test]
    fn degrade_wraps_error() {
        let table = FallbackTable::empty().with_entry("/data", json!({"cached": true}));
        let result = table.degrade(
            "/data",
            Err(ApiError::new(ErrorKind::Network, "offline", 0, None)),
        );
        assert!(!result.success);
        assert!(result.is_fallback);
        assert_eq!(result.status_code, 0);
        assert_eq!(result.error.as_deref(), Some("offline"));
        assert_eq!(result.data, json!({"cached": true}));
    }

    #[test]
    fn degrade_passes_success_through() {
        let result = FallbackTable::default().degrade(
            "/data",
            Ok(Response {
                status: 200,
                data: json!([1, 2]),
            }),
        );
        assert!(result.success);
        assert!(!result.is_fallback);
        assert_eq!(result.error, None);
    }
}
