use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::core::CbpError;
use crate::core::client::HEADER_AFTER;

/// Read the response body and decode it as JSON.
/// `endpoint` only labels the error message.
pub(crate) async fn get_json<T: DeserializeOwned>(
    resp: Response,
    endpoint: &str,
) -> Result<T, CbpError> {
    let text = resp.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| CbpError::Data(format!("{endpoint}: json parse error: {e}")))
}

/// The cursor for the next page, if the response carries a non-empty one.
pub(crate) fn after_cursor(resp: &Response) -> Option<String> {
    resp.headers()
        .get(HEADER_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
