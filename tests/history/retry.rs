use crate::common::{candle_rows, setup_server};
use cbp_client::{Backoff, CbpClient, CbpError, History, RetryConfig};
use httpmock::Method::GET;
use std::time::Duration;
use url::Url;

fn client_with_retry(server: &httpmock::MockServer, max_retries: u32) -> CbpClient {
    let mut retry = RetryConfig::standard();
    retry.backoff = Backoff::Fixed(Duration::from_millis(1)); // Minimal delay for fast tests
    retry.max_retries = max_retries;

    CbpClient::builder()
        .base_url(Url::parse(&server.base_url()).unwrap())
        .request_delay(Duration::ZERO)
        .retry_config(retry)
        .build()
        .unwrap()
}

#[tokio::test]
async fn opt_in_retry_hits_the_endpoint_again_on_5xx() {
    let server = setup_server();
    let fail_mock = server.mock(|when, then| {
        when.method(GET).path("/products/RETRY-USD/candles");
        then.status(503).body("Service Unavailable");
    });

    let max_retries = 3;
    let client = client_with_retry(&server, max_retries);
    let history =
        History::from_strs(&client, "RETRY-USD", "2020-01-01", "2020-01-08", "daily").unwrap();

    let result = history.candles().next().await;

    // 1 (initial) + 3 (retries)
    fail_mock.assert_hits((1 + max_retries) as usize);
    match result {
        Err(CbpError::Status { status, .. }) => assert_eq!(status, 503),
        other => panic!("Expected a Status error after all retries failed, got {other:?}"),
    }
}

#[tokio::test]
async fn statuses_outside_the_policy_are_not_retried() {
    let server = setup_server();
    let not_found = server.mock(|when, then| {
        when.method(GET).path("/products/NOPE-USD/candles");
        then.status(404).body("NotFound");
    });
    let ok = server.mock(|when, then| {
        when.method(GET).path("/products/BTC-USD/candles");
        then.status(200).json_body(candle_rows(&["2020-01-01"]));
    });

    let client = client_with_retry(&server, 3);
    let missing =
        History::from_strs(&client, "NOPE-USD", "2020-01-01", "2020-01-08", "daily").unwrap();
    assert!(matches!(
        missing.candles().next().await,
        Err(CbpError::Status { status: 404, .. })
    ));
    not_found.assert_hits(1);

    let present =
        History::from_strs(&client, "BTC-USD", "2020-01-01", "2020-01-08", "daily").unwrap();
    assert_eq!(present.candles().collect_all().await.unwrap().len(), 1);
    ok.assert_hits(1);
}
