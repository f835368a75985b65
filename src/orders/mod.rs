//! Private order endpoints: order history and market orders.

mod model;

pub use model::{Order, OrderStatus};

use chrono::{DateTime, Utc};
use reqwest::Method;
use rust_decimal::Decimal;

use crate::core::net::get_json;
use crate::core::{Auth, CbpClient, CbpError, Side};
use crate::pagination::{DateFloor, Paginator};
use model::MarketOrderRequest;

impl CbpClient {
    /// Orders with the given status, newest first.
    ///
    /// With `since`, only orders created at or after it are yielded and
    /// pagination stops at the first page that has none.
    pub fn orders(&self, status: OrderStatus, since: Option<DateTime<Utc>>) -> Paginator<Order> {
        self.paginate(
            "orders",
            vec![("status".to_string(), status.as_str().to_string())],
            Auth::Signed,
            since.map(|start| DateFloor::new("created_at", start)),
        )
    }

    /// Spend `funds` of the quote currency on `product_id` at market.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn market_buy(&self, product_id: &str, funds: Decimal) -> Result<Order, CbpError> {
        self.place_market_order(MarketOrderRequest {
            kind: "market",
            side: Side::Buy,
            product_id,
            funds: Some(funds),
            size: None,
        })
        .await
    }

    /// Sell `size` of the base currency of `product_id` at market.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err))]
    pub async fn market_sell(&self, product_id: &str, size: Decimal) -> Result<Order, CbpError> {
        self.place_market_order(MarketOrderRequest {
            kind: "market",
            side: Side::Sell,
            product_id,
            funds: None,
            size: Some(size),
        })
        .await
    }

    async fn place_market_order(&self, req: MarketOrderRequest<'_>) -> Result<Order, CbpError> {
        let body = serde_json::to_string(&req)?;
        let resp = self
            .send(Method::POST, "orders", &[], Some(body), Auth::Signed)
            .await?;
        get_json(resp, "orders").await
    }
}
