use serde::Serialize;
use serde_json::Value;

/// Decoded exchange: status code and body value.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: u16,
    pub data: Value,
}

/// Result shape returned to callers.
///
/// `is_fallback` implies `success == false` and `data` holding a fallback
/// payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResult {
    pub success: bool,
    pub data: Value,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_fallback: bool,
}

impl RequestResult {
    pub(crate) fn success(response: Response) -> Self {
        Self {
            success: true,
            data: response.data,
            status_code: response.status,
            error: None,
            is_fallback: false,
        }
    }

    pub(crate) fn fallback(data: Value, status_code: u16, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            status_code,
            error: Some(error.into()),
            is_fallback: true,
        }
    }
}
