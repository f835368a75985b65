use std::time::Duration;

use reqwest::{RequestBuilder, Response};

use crate::core::CbpError;

/// Specifies the backoff strategy for retrying failed requests.
#[derive(Clone, Debug)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed(Duration),
    /// Uses an exponential delay between retries.
    /// The delay is calculated as `base * (factor ^ attempt)`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
        /// Whether to apply random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(d) => d,
            Backoff::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let exp = i32::try_from(attempt).unwrap_or(i32::MAX);
                let secs = (base.as_secs_f64() * factor.powi(exp)).min(max.as_secs_f64());
                let delay = Duration::from_secs_f64(secs.max(0.0));
                if !jitter {
                    return delay;
                }
                let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX / 4);
                let half = ms / 2;
                Duration::from_millis(ms - half + fastrand::u64(0..=half * 2))
            }
        }
    }
}

/// Configuration for the transport-level retry mechanism.
///
/// Retry is opt-in: the default policy is disabled so that pagination and
/// history sequences surface a non-2xx response on the first occurrence.
/// Enable it with [`RetryConfig::enabled`] or use [`RetryConfig::standard`].
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Enables or disables the retry mechanism.
    pub enabled: bool,
    /// The maximum number of retries to attempt. The total number of attempts will be `max_retries + 1`.
    pub max_retries: u32,
    /// The backoff strategy to use between retries.
    pub backoff: Backoff,
    /// A list of HTTP status codes that should trigger a retry.
    pub retry_on_status: Vec<u16>,
    /// Whether to retry on request timeouts.
    pub retry_on_timeout: bool,
    /// Whether to retry on connection errors.
    pub retry_on_connect: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ..Self::standard()
        }
    }
}

impl RetryConfig {
    /// An enabled policy: 4 retries, exponential backoff with jitter, retry on 408/429/5xx.
    pub fn standard() -> Self {
        Self {
            enabled: true,
            max_retries: 4,
            backoff: Backoff::Exponential {
                base: Duration::from_millis(200),
                factor: 2.0,
                max: Duration::from_secs(3),
                jitter: true,
            },
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
            retry_on_timeout: true,
            retry_on_connect: true,
        }
    }

    fn retries_status(&self, status: u16) -> bool {
        self.enabled && self.retry_on_status.contains(&status)
    }

    fn retries_error(&self, err: &reqwest::Error) -> bool {
        self.enabled
            && ((err.is_timeout() && self.retry_on_timeout)
                || (err.is_connect() && self.retry_on_connect))
    }
}

impl super::CbpClient {
    /// Send a request, re-building it for every attempt.
    ///
    /// The builder closure runs once per attempt so signed requests get a fresh
    /// timestamp. A non-2xx response that the policy does not retry (or that
    /// exhausted its retries) is returned as-is; mapping it to an error is the
    /// caller's job.
    pub(crate) async fn send_with_retry<F>(&self, mut build: F) -> Result<Response, CbpError>
    where
        F: FnMut() -> Result<RequestBuilder, CbpError>,
    {
        let cfg = &self.retry;
        let mut attempt = 0u32;

        loop {
            match build()?.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success()
                        || !cfg.retries_status(status.as_u16())
                        || attempt >= cfg.max_retries
                    {
                        return Ok(resp);
                    }
                    #[cfg(feature = "tracing")]
                    tracing::debug!(status = status.as_u16(), attempt, "retrying after status");
                }
                Err(e) => {
                    if !cfg.retries_error(&e) || attempt >= cfg.max_retries {
                        return Err(e.into());
                    }
                    #[cfg(feature = "tracing")]
                    tracing::debug!(error = %e, attempt, "retrying after transport error");
                }
            }

            tokio::time::sleep(cfg.backoff.delay(attempt)).await;
            attempt += 1;
        }
    }
}
