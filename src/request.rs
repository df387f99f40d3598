use serde::Serialize;

use crate::{ApiError, Cause, ErrorKind};

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP method of a logical request.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the verb carries a request body.
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Logical request: path, method, headers and an optional JSON body.
///
/// Built once per call and never mutated while attempts run.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    path: String,
    method: Method,
    headers: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    /// Creates a descriptor with the default JSON content-type header.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            headers: vec![("Content-Type".to_owned(), JSON_CONTENT_TYPE.to_owned())],
            body: None,
        }
    }

    /// Creates a descriptor carrying `body` encoded as a JSON value.
    ///
    /// Encoding failures are reported as [`ErrorKind::Unknown`].
    pub fn with_body<B: Serialize + ?Sized>(
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|err| {
            ApiError::new(
                ErrorKind::Unknown,
                crate::classify::UNKNOWN_MESSAGE,
                500,
                Some(Cause::Encode(err)),
            )
        })?;
        let mut descriptor = Self::new(method, path);
        descriptor.body = Some(value);
        Ok(descriptor)
    }

    /// Sets a header, replacing any existing header with the same
    /// case-insensitive name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns a header value by case-insensitive name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// JSON text of the body, present only for mutating verbs.
    pub(crate) fn encoded_body(&self) -> Option<String> {
        if !self.method.is_mutating() {
            return None;
        }
        self.body.as_ref().map(|value| value.to_string())
    }
}
