use std::time::Duration;

use tokio::time::sleep;

use crate::{
    classify::{classify, is_retryable},
    decode::decode_response,
    transport::HttpTransport,
    AttemptOutcome, RequestDescriptor, Response, Result,
};

/// Delay growth between attempts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backoff {
    /// `base * (attempt + 1)`.
    Linear,
    /// `base` before every retry.
    Constant,
    /// `base * 2^attempt`, capped at `max_delay_ms`.
    Exponential { max_delay_ms: u64 },
}

/// Bounds the number of attempts and the wait between them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts is `max_retries + 1`.
    pub max_retries: u32,
    /// Base delay in milliseconds.
    pub base_delay_ms: u64,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(1, 1_000)
    }
}

impl RetryPolicy {
    pub fn linear(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            backoff: Backoff::Linear,
        }
    }

    pub fn constant(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            backoff: Backoff::Constant,
        }
    }

    pub fn exponential(max_retries: u32, base_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            backoff: Backoff::Exponential { max_delay_ms },
        }
    }

    /// Policy that never retries.
    pub fn none() -> Self {
        Self::linear(0, 0)
    }

    /// Delay before attempt `attempt + 1`, computed from the failed attempt's
    /// index only.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let millis = match self.backoff {
            Backoff::Linear => self
                .base_delay_ms
                .saturating_mul(u64::from(attempt).saturating_add(1)),
            Backoff::Constant => self.base_delay_ms,
            Backoff::Exponential { max_delay_ms } => {
                let multiplier = 1u64 << attempt.min(32);
                self.base_delay_ms
                    .saturating_mul(multiplier)
                    .min(max_delay_ms)
            }
        };
        Duration::from_millis(millis)
    }

    /// Total attempts allowed under this policy.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Runs attempts for one logical request until success, a terminal error, or
/// the retry budget is spent.
///
/// Each attempt gets a fresh `timeout_ms` window.
pub(crate) async fn execute_with_retry(
    transport: &HttpTransport,
    descriptor: &RequestDescriptor,
    timeout_ms: u64,
    policy: &RetryPolicy,
) -> Result<Response> {
    let mut attempt = 0u32;
    loop {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "{} {} attempt {}/{}",
            descriptor.method().as_str(),
            descriptor.path(),
            attempt + 1,
            policy.max_attempts()
        );

        let outcome = match transport.send(descriptor, timeout_ms).await {
            AttemptOutcome::Success(raw) => decode_response(raw),
            AttemptOutcome::Failure(failure) => Err(failure),
        };

        let error = match classify(outcome) {
            Ok(response) => return Ok(response),
            Err(error) => error,
        };

        if is_retryable(&error) && attempt < policy.max_retries {
            let delay = policy.delay_for(attempt);

            #[cfg(feature = "tracing")]
            tracing::warn!(
                "retry attempt {}/{} for {} after {} ms: {}",
                attempt + 1,
                policy.max_retries,
                descriptor.path(),
                delay.as_millis(),
                error
            );

            sleep(delay).await;
            attempt += 1;
            continue;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "giving up on {} after {} attempt(s): {}",
            descriptor.path(),
            attempt + 1,
            error
        );

        return Err(error);
    }
}
