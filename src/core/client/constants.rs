//! Centralized constants for default endpoints, headers and UA.

/// Identifies the client to the exchange.
pub(crate) const USER_AGENT: &str = concat!("cbp-client/", env!("CARGO_PKG_VERSION"));

/// Production REST API base.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.pro.coinbase.com/";

/// Sandbox REST API base. Same signing scheme, separate credentials.
pub(crate) const SANDBOX_BASE_URL: &str = "https://api-public.sandbox.pro.coinbase.com/";

/// Courtesy pause between consecutive page/window requests.
pub(crate) const DEFAULT_REQUEST_DELAY_MS: u64 = 350;

/// Response header carrying the cursor for the next (older) page.
pub(crate) const HEADER_AFTER: &str = "cb-after";

pub(crate) const HEADER_ACCESS_KEY: &str = "CB-ACCESS-KEY";
pub(crate) const HEADER_ACCESS_SIGN: &str = "CB-ACCESS-SIGN";
pub(crate) const HEADER_ACCESS_TIMESTAMP: &str = "CB-ACCESS-TIMESTAMP";
pub(crate) const HEADER_ACCESS_PASSPHRASE: &str = "CB-ACCESS-PASSPHRASE";
