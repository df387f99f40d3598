//! `resilient-http` is an async HTTP request client that bounds every network
//! attempt by a deadline, retries a limited number of times and classifies
//! every failure into a stable [`ApiError`].
//!
//! Two call styles are offered for each verb:
//! - [`ResilientClient::get`] and friends raise the terminal [`ApiError`].
//! - [`ResilientClient::get_with_fallback`] and friends never raise and degrade
//!   to a static payload from the [`FallbackTable`] instead.

mod classify;
mod client;
mod deadline;
mod decode;
mod error;
mod fallback;
mod options;
mod request;
mod retry;
mod transport;
mod types;

pub use classify::{classify, is_retryable, status_message};
pub use client::ResilientClient;
pub use deadline::{run_under_deadline, Deadline};
pub use decode::{decode_body, negotiate, DecodeStrategy};
pub use error::{ApiError, Cause, ErrorKind};
pub use fallback::FallbackTable;
pub use options::ClientOptions;
pub use request::{Method, RequestDescriptor};
pub use retry::{Backoff, RetryPolicy};
pub use transport::{AttemptFailure, AttemptOutcome, RawResponse};
pub use types::{RequestResult, Response};

pub type Result<T> = std::result::Result<T, ApiError>;
