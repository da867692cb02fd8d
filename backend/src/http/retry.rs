use anyhow::{anyhow, Error, Result};
use log::warn;
use reqwest::header::RETRY_AFTER;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::settings::RetrySettings;
use crate::errors::with_source_context;

/// Bounded retry with linear backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            backoff_unit: Duration::from_millis(settings.backoff_unit_ms),
        }
    }
}

impl RetryPolicy {
    /// Wait after the given 1-based attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit * attempt
    }
}

/// Send a request until it succeeds or the attempt budget runs out.
///
/// `build` is called once per attempt since a sent request cannot be reused.
/// A 429 waits for `Retry-After` seconds when the header is present;
/// any other failure waits `attempt * backoff_unit`. No wait follows the
/// final attempt. The last failure is returned prefixed with
/// `[source] operation`.
pub async fn fetch_with_retry<F>(
    policy: &RetryPolicy,
    source: &str,
    operation: &str,
    mut build: F,
) -> Result<Response>
where
    F: FnMut() -> RequestBuilder,
{
    let mut last_error: Option<Error> = None;

    for attempt in 1..=policy.max_attempts {
        let wait = match build().send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => {
                let wait = retry_after(&response).unwrap_or_else(|| policy.backoff(attempt));
                last_error = Some(status_error(&response));
                wait
            }
            Ok(response) => {
                last_error = Some(status_error(&response));
                policy.backoff(attempt)
            }
            Err(e) => {
                last_error = Some(Error::new(e));
                policy.backoff(attempt)
            }
        };

        if attempt < policy.max_attempts {
            warn!(
                "[{}] {} failed on attempt {}/{}, retrying in {:?}",
                source, operation, attempt, policy.max_attempts, wait
            );
            sleep(wait).await;
        }
    }

    let error = last_error.unwrap_or_else(|| anyhow!("Max retries exceeded"));
    with_source_context(Err(error), source, operation)
}

fn status_error(response: &Response) -> Error {
    anyhow!("HTTP {}", response.status())
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
