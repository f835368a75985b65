//! API-key credentials and per-request HMAC signing.
//!
//! Every private endpoint expects four headers: the key, a base64 HMAC-SHA256
//! signature, the timestamp that went into the signature, and the passphrase.
//! The prehash message is `timestamp + METHOD + request_path + body`.

use crate::core::error::CbpError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::RequestBuilder;
use serde::Deserialize;
use sha2::Sha256;
use std::fmt;

use super::constants::{
    HEADER_ACCESS_KEY, HEADER_ACCESS_PASSPHRASE, HEADER_ACCESS_SIGN, HEADER_ACCESS_TIMESTAMP,
};

type HmacSha256 = Hmac<Sha256>;

/// API credentials as issued by the exchange.
///
/// Deserializes from the usual `{ "api_key", "secret", "passphrase" }` object.
/// `Debug` never prints the secret or the passphrase, and the type is not `Serialize`.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub(crate) api_key: String,
    pub(crate) secret: String,
    pub(crate) passphrase: String,
}

impl Credentials {
    /// Bundle a key, a base64-encoded secret and a passphrase.
    pub fn new(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret: secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// The public key identifier.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// The four authentication headers for one request. Never reuse across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequestHeaders {
    pub key: String,
    pub signature: String,
    pub timestamp: String,
    pub passphrase: String,
}

impl SignedRequestHeaders {
    pub(crate) fn apply(self, req: RequestBuilder) -> RequestBuilder {
        req.header(HEADER_ACCESS_KEY, self.key)
            .header(HEADER_ACCESS_SIGN, self.signature)
            .header(HEADER_ACCESS_TIMESTAMP, self.timestamp)
            .header(HEADER_ACCESS_PASSPHRASE, self.passphrase)
    }
}

/// Computes authentication headers from a decoded secret.
///
/// The secret is decoded once at construction, so a malformed secret fails
/// before any request is sent. Signing itself is pure and infallible.
#[derive(Clone)]
pub struct Signer {
    api_key: String,
    passphrase: String,
    mac: HmacSha256,
}

impl Signer {
    /// Decode the secret and key the HMAC.
    ///
    /// # Errors
    /// Returns [`CbpError::InvalidCredentials`] if the secret is empty or not valid base64.
    pub fn new(credentials: &Credentials) -> Result<Self, CbpError> {
        let secret = STANDARD
            .decode(credentials.secret.trim())
            .map_err(|e| CbpError::InvalidCredentials(format!("secret is not base64: {e}")))?;
        if secret.is_empty() {
            return Err(CbpError::InvalidCredentials("secret is empty".into()));
        }
        let mac = HmacSha256::new_from_slice(&secret)
            .map_err(|e| CbpError::InvalidCredentials(e.to_string()))?;

        Ok(Self {
            api_key: credentials.api_key.clone(),
            passphrase: credentials.passphrase.clone(),
            mac,
        })
    }

    /// Sign one request.
    ///
    /// `path` is the request path including any query string (e.g. `/orders?status=all`),
    /// `body` the exact bytes that will be sent (empty for GET).
    pub fn sign(&self, method: &str, path: &str, body: &str, timestamp: &str) -> SignedRequestHeaders {
        let mut mac = self.mac.clone();
        mac.update(timestamp.as_bytes());
        mac.update(method.to_ascii_uppercase().as_bytes());
        mac.update(path.as_bytes());
        mac.update(body.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        SignedRequestHeaders {
            key: self.api_key.clone(),
            signature,
            timestamp: timestamp.to_string(),
            passphrase: self.passphrase.clone(),
        }
    }

    /// Sign with the current time.
    pub fn sign_now(&self, method: &str, path: &str, body: &str) -> SignedRequestHeaders {
        self.sign(method, path, body, &timestamp_now())
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

/// Seconds since the epoch with millisecond precision, e.g. `1580515200.123`.
pub fn timestamp_now() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{}.{:03}", millis.div_euclid(1000), millis.rem_euclid(1000))
}
