use serde_json::Value;

use crate::{AttemptFailure, Cause, ErrorKind, RawResponse, Response};

/// How a response body is turned into a value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeStrategy {
    /// Structured JSON parse.
    Json,
    /// Body kept as raw text.
    Text,
}

/// Content-type markers selecting a strategy, checked in order.
const NEGOTIATION: &[(&str, DecodeStrategy)] = &[
    ("application/json", DecodeStrategy::Json),
    ("+json", DecodeStrategy::Json),
];

/// Picks the decode strategy for a declared content type.
///
/// Matching is case-insensitive; anything unmatched (or absent) is text.
pub fn negotiate(content_type: Option<&str>) -> DecodeStrategy {
    let Some(content_type) = content_type else {
        return DecodeStrategy::Text;
    };
    let lowered = content_type.to_ascii_lowercase();
    NEGOTIATION
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, strategy)| *strategy)
        .unwrap_or(DecodeStrategy::Text)
}

/// Decodes `body` according to `content_type`.
///
/// Text bodies become [`Value::String`].
pub fn decode_body(body: &str, content_type: Option<&str>) -> Result<Value, serde_json::Error> {
    match negotiate(content_type) {
        DecodeStrategy::Json => serde_json::from_str(body),
        DecodeStrategy::Text => Ok(Value::String(body.to_owned())),
    }
}

/// Decodes a raw exchange; parse failures escalate as `Unknown` failures.
pub(crate) fn decode_response(raw: RawResponse) -> Result<Response, AttemptFailure> {
    match decode_body(&raw.body, raw.content_type.as_deref()) {
        Ok(data) => Ok(Response {
            status: raw.status,
            data,
        }),
        Err(err) => Err(AttemptFailure {
            kind: ErrorKind::Unknown,
            status: Some(raw.status),
            cause: Cause::Decode(err),
        }),
    }
}
