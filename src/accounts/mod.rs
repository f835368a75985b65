//! Private account endpoints: balances and ledger history.

mod model;

pub use model::{Account, LedgerEntry};

use chrono::{DateTime, Utc};
use reqwest::Method;
use rust_decimal::Decimal;

use crate::core::net::get_json;
use crate::core::{Auth, CbpClient, CbpError};
use crate::pagination::{DateFloor, Paginator};

impl CbpClient {
    /// All accounts of the authenticated profile.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn accounts(&self) -> Result<Vec<Account>, CbpError> {
        let resp = self
            .send(Method::GET, "accounts", &[], None, Auth::Signed)
            .await?;
        get_json(resp, "accounts").await
    }

    /// The first account holding `currency` (case-insensitive).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn account(&self, currency: &str) -> Result<Account, CbpError> {
        self.accounts()
            .await?
            .into_iter()
            .find(|a| a.currency.eq_ignore_ascii_case(currency))
            .ok_or_else(|| CbpError::Data(format!("no account for currency {currency}")))
    }

    /// Total balance across all accounts in `currency` (case-insensitive).
    /// Zero if there is no such account.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn balance(&self, currency: &str) -> Result<Decimal, CbpError> {
        Ok(self
            .accounts()
            .await?
            .iter()
            .filter(|a| a.currency.eq_ignore_ascii_case(currency))
            .map(|a| a.balance)
            .sum())
    }

    /// Ledger entries of one account, newest first.
    ///
    /// With `since`, pagination stops at the first page with no entry created
    /// at or after it, and older entries are never yielded.
    pub fn ledger(&self, account_id: &str, since: Option<DateTime<Utc>>) -> Paginator<LedgerEntry> {
        self.paginate(
            format!("accounts/{account_id}/ledger"),
            Vec::new(),
            Auth::Signed,
            since.map(|start| DateFloor::new("created_at", start)),
        )
    }
}
