//! Public client surface + builder.
//! Internals are split into `auth` (credentials/signing), `retry` (transport
//! retry policy) and `constants` (UA + defaults).

mod auth;
mod constants;
mod retry;

pub use auth::{Credentials, SignedRequestHeaders, Signer, timestamp_now};
pub use retry::{Backoff, RetryConfig};

pub(crate) use constants::HEADER_AFTER;

use crate::core::CbpError;
use constants::{DEFAULT_BASE_URL, DEFAULT_REQUEST_DELAY_MS, SANDBOX_BASE_URL, USER_AGENT};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Whether a request is sent anonymously or with signed authentication headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    /// Public market-data endpoints.
    Public,
    /// Private endpoints; requires a client built with [`Credentials`].
    Signed,
}

/// Configured HTTP transport for the exchange REST API.
///
/// Cheap to clone: the connection pool and the signer are shared.
#[derive(Debug, Clone)]
pub struct CbpClient {
    http: Client,
    base_url: Url,
    signer: Option<Arc<Signer>>,
    retry: RetryConfig,
    request_delay: Duration,
}

impl CbpClient {
    /// Create a new builder.
    pub fn builder() -> CbpClientBuilder {
        CbpClientBuilder::default()
    }

    /// The REST base every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `true` if the client carries credentials and can call private endpoints.
    pub fn is_authenticated(&self) -> bool {
        self.signer.is_some()
    }

    /// Pause inserted between consecutive page or window requests.
    pub fn request_delay(&self) -> Duration {
        self.request_delay
    }

    /// The default transport retry policy of this client.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /* -------- transport used by the endpoint modules -------- */

    /// Send one request and map any non-2xx status to [`CbpError::Status`].
    ///
    /// `path` is relative to the base URL (no leading slash). When `auth` is
    /// [`Auth::Signed`] the request is signed over the final path + query and
    /// the exact body bytes; a new signature is produced for every retry attempt.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<String>,
        auth: Auth,
    ) -> Result<Response, CbpError> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let signer = match auth {
            Auth::Public => None,
            Auth::Signed => Some(self.signer.as_deref().ok_or(CbpError::MissingCredentials)?),
        };
        let request_path = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(%method, path = %request_path, signed = signer.is_some(), "sending request");

        let resp = self
            .send_with_retry(|| {
                let mut req = self.http.request(method.clone(), url.clone());
                if let Some(body) = &body {
                    req = req.header(CONTENT_TYPE, "application/json").body(body.clone());
                }
                if let Some(signer) = signer {
                    let headers = signer.sign_now(
                        method.as_str(),
                        &request_path,
                        body.as_deref().unwrap_or(""),
                    );
                    req = headers.apply(req);
                }
                Ok(req)
            })
            .await?;

        if !resp.status().is_success() {
            return Err(CbpError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp)
    }

    /// Wait out the configured courtesy delay. A zero delay returns immediately.
    pub(crate) async fn pace(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }
}

/* ----------------------- Builder ----------------------- */

/// Builder for [`CbpClient`].
#[derive(Default)]
pub struct CbpClientBuilder {
    credentials: Option<Credentials>,
    sandbox: bool,
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
    request_delay: Option<Duration>,
}

impl CbpClientBuilder {
    /// Sign private requests with these credentials.
    pub fn credentials(mut self, creds: Credentials) -> Self {
        self.credentials = Some(creds);
        self
    }

    /// Talk to the sandbox instead of production. Only the base URL changes.
    pub fn sandbox(mut self, yes: bool) -> Self {
        self.sandbox = yes;
        self
    }

    /// Override the REST base (e.g. a mock server). Takes precedence over `sandbox`.
    /// A missing trailing slash is added, so `https://host/api` keeps its `api` segment.
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set a global request timeout (overall). Default: none.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Set the transport retry policy. Default: [`RetryConfig::default`] (disabled).
    pub fn retry_config(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    /// Pause between consecutive page/window requests. Default: 350ms.
    /// `Duration::ZERO` disables pacing (useful in tests).
    pub fn request_delay(mut self, dur: Duration) -> Self {
        self.request_delay = Some(dur);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// Fails if the credentials' secret is not valid base64, a default URL
    /// cannot be parsed, or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<CbpClient, CbpError> {
        let mut base_url = match self.base_url {
            Some(url) => url,
            None if self.sandbox => Url::parse(SANDBOX_BASE_URL)?,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let signer = self
            .credentials
            .as_ref()
            .map(Signer::new)
            .transpose()?
            .map(Arc::new);

        let mut httpb =
            reqwest::Client::builder().user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));
        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }
        let http = httpb.build()?;

        Ok(CbpClient {
            http,
            base_url,
            signer,
            retry: self.retry.unwrap_or_default(),
            request_delay: self
                .request_delay
                .unwrap_or(Duration::from_millis(DEFAULT_REQUEST_DELAY_MS)),
        })
    }
}
