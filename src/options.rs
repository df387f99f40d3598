use std::env::VarError;
use std::str::FromStr;

use crate::RetryPolicy;

/// Configures base address, per-attempt timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Prefix prepended to every logical path.
    pub base_address: String,
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base retry delay in milliseconds (linear strategy).
    pub retry_delay_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_address: "http://localhost:3000/api".to_owned(),
            timeout_ms: 10_000,
            max_retries: 1,
            retry_delay_ms: 1_000,
        }
    }
}

impl ClientOptions {
    /// Creates default options pointed at `base_address`.
    pub fn new(base_address: impl Into<String>) -> Self {
        Self {
            base_address: base_address.into(),
            ..Self::default()
        }
    }

    /// Reads options from environment variables.
    ///
    /// Reads:
    /// - `RESILIENT_HTTP_BASE_URL` — required base address
    /// - `RESILIENT_HTTP_TIMEOUT_MS` — optional, defaults to `10000`
    /// - `RESILIENT_HTTP_MAX_RETRIES` — optional, defaults to `1`
    /// - `RESILIENT_HTTP_RETRY_DELAY_MS` — optional, defaults to `1000`
    pub fn from_env() -> std::result::Result<Self, String> {
        let base_address = std::env::var("RESILIENT_HTTP_BASE_URL").map_err(|err| match err {
            VarError::NotPresent => "missing RESILIENT_HTTP_BASE_URL environment variable".to_owned(),
            VarError::NotUnicode(_) => "RESILIENT_HTTP_BASE_URL is not valid unicode".to_owned(),
        })?;
        if base_address.trim().is_empty() {
            return Err("RESILIENT_HTTP_BASE_URL is set but empty".to_owned());
        }

        let defaults = Self::default();
        Ok(Self {
            base_address: base_address.trim().to_owned(),
            timeout_ms: env_or("RESILIENT_HTTP_TIMEOUT_MS", defaults.timeout_ms)?,
            max_retries: env_or("RESILIENT_HTTP_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: env_or("RESILIENT_HTTP_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
        })
    }

    /// Default retry policy derived from these options.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::linear(self.max_retries, self.retry_delay_ms)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> std::result::Result<T, String>
where
    T::Err: std::fmt::Display,
{
    resolve(name, std::env::var(name), default)
}

fn resolve<T: FromStr>(
    name: &str,
    lookup: std::result::Result<String, VarError>,
    default: T,
) -> std::result::Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match lookup {
        Ok(raw) => parse_value(name, &raw),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(format!("{name} is not valid unicode")),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> std::result::Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} is set but empty"));
    }
    trimmed
        .parse::<T>()
        .map_err(|err| format!("{name} has invalid value '{trimmed}': {err}"))
}
