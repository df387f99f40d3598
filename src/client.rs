use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::{
    retry::{execute_with_retry, RetryPolicy},
    transport::HttpTransport,
    ClientOptions, FallbackTable, Method, RequestDescriptor, RequestResult, Result,
};

#[derive(Clone)]
/// Request client with per-attempt deadlines, bounded retries and fallbacks.
///
/// Clones share the underlying connection pool and the read-only fallback
/// table.
pub struct ResilientClient {
    transport: HttpTransport,
    options: ClientOptions,
    policy: RetryPolicy,
    fallbacks: Arc<FallbackTable>,
}

impl fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientClient")
            .field("options", &self.options)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ResilientClient {
    /// Creates a client for `base_address` with default options.
    pub fn new(base_address: impl Into<String>) -> Self {
        Self::from_options(ClientOptions::new(base_address))
    }

    /// Creates a client from a complete set of options.
    pub fn from_options(options: ClientOptions) -> Self {
        Self {
            transport: HttpTransport::new(reqwest::Client::new(), options.base_address.clone()),
            policy: options.retry_policy(),
            options,
            fallbacks: Arc::new(FallbackTable::default()),
        }
    }

    /// Creates a client from `RESILIENT_HTTP_*` environment variables.
    ///
    /// See [`ClientOptions::from_env`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use resilient_http::ResilientClient;
    ///
    /// let api = ResilientClient::from_env().expect("missing RESILIENT_HTTP_BASE_URL");
    /// ```
    pub fn from_env() -> std::result::Result<Self, String> {
        ClientOptions::from_env().map(Self::from_options)
    }

    /// Applies options such as base address, timeout and retry behavior.
    ///
    /// Resets the default retry policy to the one derived from `opts`.
    pub fn with_options(self, opts: ClientOptions) -> Self {
        Self {
            fallbacks: self.fallbacks,
            ..Self::from_options(opts)
        }
    }

    /// Replaces the default retry policy for every call on this client.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the fallback table used by the `*_with_fallback` methods.
    pub fn with_fallbacks(mut self, fallbacks: FallbackTable) -> Self {
        self.fallbacks = Arc::new(fallbacks);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn fallbacks(&self) -> &FallbackTable {
        &self.fallbacks
    }

    /// Sends a GET request.
    ///
    /// The verb helpers send only the default JSON content-type header; build
    /// a [`RequestDescriptor`] with extra headers and use [`Self::send`] or
    /// [`Self::send_with_fallback`] when more are needed.
    pub async fn get(&self, path: &str) -> Result<RequestResult> {
        self.send(&RequestDescriptor::new(Method::Get, path)).await
    }

    /// Sends a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<RequestResult> {
        self.send(&RequestDescriptor::with_body(Method::Post, path, body)?)
            .await
    }

    /// Sends a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<RequestResult> {
        self.send(&RequestDescriptor::with_body(Method::Put, path, body)?)
            .await
    }

    /// Sends a PATCH request with a JSON body.
    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<RequestResult> {
        self.send(&RequestDescriptor::with_body(Method::Patch, path, body)?)
            .await
    }

    /// Sends a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<RequestResult> {
        self.send(&RequestDescriptor::new(Method::Delete, path))
            .await
    }

    /// Sends a prepared descriptor under the client's default retry policy.
    pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<RequestResult> {
        self.send_with_policy(descriptor, &self.policy).await
    }

    /// Sends a prepared descriptor under a per-call retry policy.
    pub async fn send_with_policy(
        &self,
        descriptor: &RequestDescriptor,
        policy: &RetryPolicy,
    ) -> Result<RequestResult> {
        let response =
            execute_with_retry(&self.transport, descriptor, self.options.timeout_ms, policy)
                .await?;
        Ok(RequestResult::success(response))
    }

    /// GET that degrades to the fallback payload instead of failing.
    pub async fn get_with_fallback(&self, path: &str) -> RequestResult {
        self.send_with_fallback(&RequestDescriptor::new(Method::Get, path))
            .await
    }

    /// POST that degrades to the fallback payload instead of failing.
    pub async fn post_with_fallback<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RequestResult {
        self.body_with_fallback(Method::Post, path, body).await
    }

    /// PUT that degrades to the fallback payload instead of failing.
    pub async fn put_with_fallback<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RequestResult {
        self.body_with_fallback(Method::Put, path, body).await
    }

    /// PATCH that degrades to the fallback payload instead of failing.
    pub async fn patch_with_fallback<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RequestResult {
        self.body_with_fallback(Method::Patch, path, body).await
    }

    /// DELETE that degrades to the fallback payload instead of failing.
    pub async fn delete_with_fallback(&self, path: &str) -> RequestResult {
        self.send_with_fallback(&RequestDescriptor::new(Method::Delete, path))
            .await
    }

    /// Sends a prepared descriptor; terminal errors become a fallback result.
    pub async fn send_with_fallback(&self, descriptor: &RequestDescriptor) -> RequestResult {
        self.send_with_policy_and_fallback(descriptor, &self.policy)
            .await
    }

    /// Sends a prepared descriptor under a per-call retry policy; terminal
    /// errors become a fallback result.
    pub async fn send_with_policy_and_fallback(
        &self,
        descriptor: &RequestDescriptor,
        policy: &RetryPolicy,
    ) -> RequestResult {
        let outcome =
            execute_with_retry(&self.transport, descriptor, self.options.timeout_ms, policy).await;
        self.fallbacks.degrade(descriptor.path(), outcome)
    }

    async fn body_with_fallback<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RequestResult {
        match RequestDescriptor::with_body(method, path, body) {
            Ok(descriptor) => self.send_with_fallback(&descriptor).await,
            Err(error) => self.fallbacks.degrade(path, Err(error)),
        }
    }
}
