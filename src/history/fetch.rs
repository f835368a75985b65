use chrono::SecondsFormat;
use reqwest::Method;

use crate::core::net::get_json;
use crate::core::{Auth, Candle, CbpClient, CbpError};
use crate::history::timeline::Window;
use crate::history::wire::CandleRow;

/// Fetch the raw candles of one window, oldest first.
///
/// The exchange answers newest-first and may return fewer rows than the
/// window spans (gaps in trading); neither is an error here.
pub(crate) async fn fetch_window(
    client: &CbpClient,
    product_id: &str,
    window: &Window,
) -> Result<Vec<Candle>, CbpError> {
    let path = format!("products/{product_id}/candles");
    let query = [
        (
            "start".to_string(),
            window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "end".to_string(),
            window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "granularity".to_string(),
            window.granularity.seconds().to_string(),
        ),
    ];

    let resp = client
        .send(Method::GET, &path, &query, None, Auth::Public)
        .await?;
    let rows: Vec<CandleRow> = get_json(resp, "candles").await?;
    rows_to_candles(rows)
}

pub(crate) fn rows_to_candles(rows: Vec<CandleRow>) -> Result<Vec<Candle>, CbpError> {
    let mut candles = rows
        .into_iter()
        .map(Candle::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    candles.sort_by_key(|c| c.time);
    Ok(candles)
}
