//! cbp-client: async client for the Coinbase Pro REST API.
//!
//! - [`CbpClient`]: configured transport; signs private requests with [`Credentials`].
//! - [`History`]: historical candles over any range, fetched window by window.
//! - [`Paginator`]: lazy traversal of cursor-paginated list endpoints, with an
//!   optional [`DateFloor`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), cbp_client::CbpError> {
//! use cbp_client::{CbpClient, History};
//!
//! let client = CbpClient::builder().build()?;
//! let history = History::from_strs(&client, "BTC-USD", "2020-01-29", "2020-02-01", "five_minute")?;
//! let mut candles = history.candles();
//! while let Some(candle) = candles.next().await? {
//!     println!("{} {}", candle.time, candle.close);
//! }
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod core;
pub mod history;
pub mod orders;
pub mod pagination;

pub use accounts::{Account, LedgerEntry};
pub use crate::core::client::{Backoff, RetryConfig, timestamp_now};
pub use crate::core::{
    Auth, Candle, CbpClient, CbpClientBuilder, CbpError, Credentials, Side, SignedRequestHeaders,
    Signer, parse_instant,
};
pub use history::{CandleStream, Granularity, History, MAX_CANDLES_PER_REQUEST, Timeline, Window};
pub use orders::{Order, OrderStatus};
pub use pagination::{DateFloor, Paginator};
