use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/* ----- HISTORY ----- */

/// One OHLCV bucket. `time` is the start of the bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub time: DateTime<Utc>,
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

/* ----- ORDERS / LEDGER ----- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}
