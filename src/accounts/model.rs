use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::dates::deserialize_instant;

/// A trading account: one per currency per profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub currency: String,
    pub balance: Decimal,
    pub available: Decimal,
    pub hold: Decimal,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub trading_enabled: bool,
}

/// One balance-changing event on an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    #[serde(deserialize_with = "deserialize_instant")]
    pub created_at: DateTime<Utc>,
    pub amount: Decimal,
    pub balance: Decimal,
    /// `transfer`, `match`, `fee`, `rebate` or `conversion`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub details: serde_json::Value,
}
