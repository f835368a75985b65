use crate::common::{SECRET, auth_client, public_client, setup_server, signed_correctly};
use cbp_client::{CbpClient, CbpError, Credentials};
use httpmock::Method::GET;
use httpmock::MockServer;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

fn mock_accounts(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/accounts")
            .header("cb-access-key", "test-key")
            .header("cb-access-passphrase", "test-pass")
            .header_exists("cb-access-sign")
            .header_exists("cb-access-timestamp");
        then.status(200).json_body(json!([
            {"id": "a1", "currency": "BTC", "balance": "0.5", "available": "0.5", "hold": "0", "profile_id": "p"},
            {"id": "a2", "currency": "ETH", "balance": "3.25", "available": "3", "hold": "0.25", "profile_id": "p"},
            {"id": "a3", "currency": "BTC", "balance": "0.25", "available": "0.25", "hold": "0", "profile_id": "q"}
        ]));
    })
}

#[tokio::test]
async fn balance_is_case_insensitive_and_summed() {
    let server = setup_server();
    let mock = mock_accounts(&server);
    let client = auth_client(&server);

    let btc = client.balance("btc").await.unwrap();
    assert_eq!(btc, Decimal::from_str("0.75").unwrap());
    assert_eq!(client.balance("BTC").await.unwrap(), btc);
    assert_eq!(client.balance("bTc").await.unwrap(), btc);
    assert_eq!(client.balance("doge").await.unwrap(), Decimal::ZERO);

    mock.assert_hits(4);
}

#[tokio::test]
async fn account_lookup_by_currency() {
    let server = setup_server();
    mock_accounts(&server);
    let client = auth_client(&server);

    let eth = client.account("eth").await.unwrap();
    assert_eq!(eth.id, "a2");
    assert_eq!(eth.hold, Decimal::from_str("0.25").unwrap());

    let all = client.accounts().await.unwrap();
    assert_eq!(all.len(), 3);

    assert!(matches!(client.account("xrp").await, Err(CbpError::Data(_))));
}

#[tokio::test]
async fn private_endpoints_need_credentials() {
    let server = setup_server();
    let mock = mock_accounts(&server);
    let client = public_client(&server);

    assert!(matches!(client.accounts().await, Err(CbpError::MissingCredentials)));
    mock.assert_hits(0);
}

#[tokio::test]
async fn base_url_with_a_path_prefix_is_kept() {
    let server = setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/accounts")
            .is_true(signed_correctly);
        then.status(200).json_body(json!([
            {"id": "a1", "currency": "USD", "balance": "12.5", "available": "12.5", "hold": "0"}
        ]));
    });

    let client = CbpClient::builder()
        .base_url(Url::parse(&format!("{}/api", server.base_url())).unwrap())
        .credentials(Credentials::new("test-key", SECRET, "test-pass"))
        .request_delay(Duration::ZERO)
        .build()
        .unwrap();

    assert_eq!(client.balance("usd").await.unwrap(), Decimal::from_str("12.5").unwrap());
    mock.assert();
}
