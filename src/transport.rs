use reqwest::header;

use crate::{deadline::run_under_deadline, Cause, ErrorKind, RequestDescriptor};

/// Completed HTTP exchange, regardless of status code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
    pub content_type: Option<String>,
}

/// Failure of one attempt before a classified error exists.
#[derive(Debug)]
pub struct AttemptFailure {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub cause: Cause,
}

/// Result of a single transport attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(RawResponse),
    Failure(AttemptFailure),
}

/// Performs single network attempts against a base address.
#[derive(Clone, Debug)]
pub(crate) struct HttpTransport {
    http: reqwest::Client,
    base_address: String,
}

impl HttpTransport {
    pub(crate) fn new(http: reqwest::Client, base_address: impl Into<String>) -> Self {
        Self {
            http,
            base_address: base_address.into(),
        }
    }

    pub(crate) fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_address, path)
    }

    /// Sends `descriptor` once, bounded by `timeout_ms`.
    ///
    /// The deadline covers both the response head and the body transfer.
    pub(crate) async fn send(&self, descriptor: &RequestDescriptor, timeout_ms: u64) -> AttemptOutcome {
        run_under_deadline(self.exchange(descriptor), timeout_ms).await
    }

    async fn exchange(&self, descriptor: &RequestDescriptor) -> AttemptOutcome {
        let mut request = self
            .http
            .request(descriptor.method().into(), self.url_for(descriptor.path()));
        for (name, value) in descriptor.headers() {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = descriptor.encoded_body() {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => return transport_failure(err),
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        match response.text().await {
            Ok(body) => AttemptOutcome::Success(RawResponse {
                status,
                body,
                content_type,
            }),
            Err(err) => transport_failure(err),
        }
    }
}

fn transport_failure(err: reqwest::Error) -> AttemptOutcome {
    // Builder errors (bad URL, bad header) are not connectivity problems.
    let kind = if err.is_builder() {
        ErrorKind::Unknown
    } else {
        ErrorKind::Network
    };

    #[cfg(feature = "tracing")]
    tracing::debug!("transport attempt failed: {}", err);

    AttemptOutcome::Failure(AttemptFailure {
        kind,
        status: None,
        cause: Cause::Transport(err),
    })
}

#[cfg(test)]
mod tests {
    use super::HttpTransport;

    #[test]
    fn url_is_base_address_plus_path() {
        let transport = HttpTransport::new(reqwest::Client::new(), "http://localhost:3000/api");
        assert_eq!(
            transport.url_for("/data"),
            "http://localhost:3000/api/data".to_owned()
        );
    }
}
