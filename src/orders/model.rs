use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::Side;
use crate::core::dates::{deserialize_instant, deserialize_opt_instant};

/// An order as reported by `/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub product_id: String,
    pub side: Side,
    /// `market`, `limit` or `stop`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub size: Option<Decimal>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub funds: Option<Decimal>,
    #[serde(default)]
    pub specified_funds: Option<Decimal>,
    #[serde(default)]
    pub filled_size: Option<Decimal>,
    #[serde(default)]
    pub executed_value: Option<Decimal>,
    #[serde(default)]
    pub fill_fees: Option<Decimal>,
    #[serde(default)]
    pub settled: bool,
    #[serde(deserialize_with = "deserialize_instant")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub done_at: Option<DateTime<Utc>>,
}

/// Filter for the order list. `All` includes settled and cancelled orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Pending,
    Active,
    Done,
    All,
}

impl OrderStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Open => "open",
            OrderStatus::Pending => "pending",
            OrderStatus::Active => "active",
            OrderStatus::Done => "done",
            OrderStatus::All => "all",
        }
    }
}

/* --- request body for POST /orders --- */

#[derive(Serialize)]
pub(crate) struct MarketOrderRequest<'a> {
    #[serde(rename = "type")]
    pub(crate) kind: &'static str,
    pub(crate) side: Side,
    pub(crate) product_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) funds: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) size: Option<Decimal>,
}
