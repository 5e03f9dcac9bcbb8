//! NBP client behaviour against a mocked upstream

use exchange_gateway::{config::RatesConfig, NbpRateClient, RateSource, RateSourceError};
use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> NbpRateClient {
    let config = RatesConfig {
        current_url: format!("{}/tables/A?format=json", server.uri()),
        history_base_url: format!("{}/rates/A/", server.uri()),
        current_timeout_secs: 1,
        history_timeout_secs: 1,
    };
    NbpRateClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_current_table_is_passed_through() {
    let server = MockServer::start().await;
    let table = json!([{
        "table": "A",
        "no": "100/A/NBP/2025",
        "effectiveDate": "2025-05-27",
        "rates": [{"currency": "dolar amerykański", "code": "USD", "mid": 3.7421}]
    }]);

    Mock::given(method("GET"))
        .and(path("/tables/A"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(table.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server).fetch_current_rates().await.unwrap();
    assert_eq!(snapshot.raw(), &table);
    assert_eq!(snapshot.mid_rates().unwrap()["USD"], dec!(3.7421));
}

#[tokio::test]
async fn test_upstream_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tables/A"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current_rates().await.unwrap_err();
    assert_eq!(err, RateSourceError::UpstreamError(500));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tables/A"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current_rates().await.unwrap_err();
    assert_eq!(err, RateSourceError::Timeout);
}

#[tokio::test]
async fn test_unreachable_upstream() {
    let config = RatesConfig {
        current_url: "http://127.0.0.1:1/tables/A".to_string(),
        ..RatesConfig::default()
    };
    let client = NbpRateClient::new(&config).unwrap();

    let err = client.fetch_current_rates().await.unwrap_err();
    assert_eq!(err, RateSourceError::Unreachable);
}

#[tokio::test]
async fn test_history_is_parsed_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rates/A/EUR/last/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "table": "A",
            "currency": "euro",
            "code": "EUR",
            "rates": [
                {"no": "098/A/NBP/2025", "effectiveDate": "2025-05-23", "mid": 4.2501},
                {"no": "099/A/NBP/2025", "effectiveDate": "2025-05-26", "mid": 4.2488},
                {"no": "100/A/NBP/2025", "effectiveDate": "2025-05-27", "mid": 4.2399}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = client_for(&server).fetch_history("eur", 3).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].date, "2025-05-23");
    assert_eq!(history[2].mid, dec!(4.2399));
}

#[tokio::test]
async fn test_history_not_found_means_no_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rates/A/XYZ/last/30"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 NotFound"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_history("XYZ", 30).await.unwrap_err();
    assert_eq!(err, RateSourceError::NoHistory("XYZ".to_string()));
}

#[tokio::test]
async fn test_history_rejects_bad_code_without_calling_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_history("EURO", 30).await.unwrap_err();
    assert_eq!(err, RateSourceError::InvalidCode("EURO".to_string()));
}
