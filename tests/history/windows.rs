use crate::common::{candle_rows, day, iso, public_client, setup_server};
use cbp_client::History;
use httpmock::Method::GET;

#[tokio::test]
async fn long_range_is_stitched_from_two_windows() {
    let server = setup_server();

    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/products/BTC-USD/candles")
            .query_param("start", "2017-01-05T00:00:00Z")
            .query_param("end", "2017-10-31T00:00:00Z")
            .query_param("granularity", "86400");
        then.status(200)
            .json_body(candle_rows(&["2017-01-05", "2017-01-06", "2017-10-30", "2017-10-31"]));
    });
    // The second window repeats the seam candle and includes the range end;
    // both must be dropped.
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/products/BTC-USD/candles")
            .query_param("start", "2017-11-01T00:00:00Z")
            .query_param("end", "2018-01-05T00:00:00Z")
            .query_param("granularity", "86400");
        then.status(200).json_body(candle_rows(&[
            "2017-10-31",
            "2017-11-01",
            "2017-12-24",
            "2018-01-04",
            "2018-01-05",
        ]));
    });

    let client = public_client(&server);
    let history = History::new(
        &client,
        "BTC-USD",
        day("2017-01-05"),
        day("2018-01-05"),
        "daily",
    )
    .unwrap();
    assert_eq!(history.requests_needed(), 2);

    let candles = history.candles().collect_all().await.unwrap();

    first.assert_hits(1);
    second.assert_hits(1);

    let times: Vec<String> = candles.iter().map(|c| iso(c.time)).collect();
    assert_eq!(
        times,
        vec![
            "2017-01-05T00:00:00Z",
            "2017-01-06T00:00:00Z",
            "2017-10-30T00:00:00Z",
            "2017-10-31T00:00:00Z",
            "2017-11-01T00:00:00Z",
            "2017-12-24T00:00:00Z",
            "2018-01-04T00:00:00Z",
        ]
    );
    assert!(candles.windows(2).all(|w| w[0].time < w[1].time));
    assert_eq!(candles[0].close, 105.0);
}

#[tokio::test]
async fn sparse_and_empty_windows_are_not_errors() {
    let server = setup_server();

    let empty = server.mock(|when, then| {
        when.method(GET)
            .path("/products/ETH-USD/candles")
            .query_param("start", "2017-01-05T00:00:00Z");
        then.status(200).json_body(serde_json::json!([]));
    });
    let sparse = server.mock(|when, then| {
        when.method(GET)
            .path("/products/ETH-USD/candles")
            .query_param("start", "2017-11-01T00:00:00Z");
        then.status(200).json_body(candle_rows(&["2017-12-01"]));
    });

    let client = public_client(&server);
    let history =
        History::from_strs(&client, "ETH-USD", "2017-01-05", "2018-01-05", "daily").unwrap();
    let candles = history.candles().collect_all().await.unwrap();

    empty.assert_hits(1);
    sparse.assert_hits(1);
    assert_eq!(candles.len(), 1);
    assert_eq!(iso(candles[0].time), "2017-12-01T00:00:00Z");
}

#[tokio::test]
async fn each_call_to_candles_starts_a_fresh_pass() {
    let server = setup_server();

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/products/BTC-USD/candles")
            .query_param("granularity", "300");
        then.status(200)
            .json_body(candle_rows(&["2020-01-29T00:00:00Z", "2020-01-29T00:05:00Z"]));
    });

    let client = public_client(&server);
    let history = History::from_strs(
        &client,
        "BTC-USD",
        "2020-01-29T00:00:00Z",
        "2020-01-29T01:00:00Z",
        "five_minute",
    )
    .unwrap();

    let a = history.candles().collect_all().await.unwrap();
    let b = history.candles().collect_all().await.unwrap();

    mock.assert_hits(2);
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
}

#[tokio::test]
async fn unaligned_start_keeps_the_seam_bucket() {
    let server = setup_server();

    // 00:03 lies inside the 00:00 bucket, so windows are laid out from 00:00.
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/products/BTC-USD/candles")
            .query_param("start", "2020-01-01T00:00:00Z")
            .query_param("end", "2020-01-02T00:55:00Z")
            .query_param("granularity", "300");
        then.status(200).json_body(candle_rows(&[
            "2020-01-01T00:00:00Z",
            "2020-01-01T00:05:00Z",
            "2020-01-02T00:55:00Z",
        ]));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/products/BTC-USD/candles")
            .query_param("start", "2020-01-02T01:00:00Z")
            .query_param("end", "2020-01-03T00:00:00Z")
            .query_param("granularity", "300");
        then.status(200).json_body(candle_rows(&[
            "2020-01-02T01:00:00Z",
            "2020-01-02T23:55:00Z",
            "2020-01-03T00:00:00Z",
        ]));
    });

    let client = public_client(&server);
    let history = History::from_strs(
        &client,
        "BTC-USD",
        "2020-01-01T00:03:00Z",
        "2020-01-03T00:00:00Z",
        "five_minute",
    )
    .unwrap();
    assert_eq!(history.requests_needed(), 2);

    let candles = history.candles().collect_all().await.unwrap();

    first.assert_hits(1);
    second.assert_hits(1);
    let times: Vec<String> = candles.iter().map(|c| iso(c.time)).collect();
    assert_eq!(
        times,
        vec![
            "2020-01-01T00:05:00Z",
            "2020-01-02T00:55:00Z",
            "2020-01-02T01:00:00Z",
            "2020-01-02T23:55:00Z",
        ]
    );
}
