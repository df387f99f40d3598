use std::future::Future;
use std::time::Duration;

use crate::{AttemptFailure, AttemptOutcome, Cause, ErrorKind};

/// Time bound for a single attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Deadline {
    timeout_ms: u64,
}

impl Deadline {
    pub fn from_millis(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn expired(&self) -> AttemptOutcome {
        AttemptOutcome::Failure(AttemptFailure {
            kind: ErrorKind::Timeout,
            status: Some(408),
            cause: Cause::Deadline {
                timeout_ms: self.timeout_ms,
            },
        })
    }
}

/// Runs `action` until it resolves or `timeout_ms` elapses.
///
/// On expiry the action future is dropped, which cancels the in-flight
/// request, and a `Timeout` failure with status 408 is returned. When the
/// action wins the race the timer is dropped with it.
pub async fn run_under_deadline<F>(action: F, timeout_ms: u64) -> AttemptOutcome
where
    F: Future<Output = AttemptOutcome>,
{
    let deadline = Deadline::from_millis(timeout_ms);
    match tokio::time::timeout(deadline.as_duration(), action).await {
        Ok(outcome) => outcome,
        Err(_) => {
            #[cfg(feature = "tracing")]
            tracing::debug!("attempt cancelled after {} ms", deadline.timeout_ms());

            deadline.expired()
        }
    }
}
