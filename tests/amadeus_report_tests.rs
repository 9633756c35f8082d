/// Integration tests for the Amadeus-backed report pipeline
use chrono::NaiveDate;
use flight_report::{
    config::ApiConfig,
    error::AppError,
    providers::AmadeusSource,
    report::{generate_report, Group, QueryOutcome, ReportRequest},
};
use wiremock::{
    matchers::{body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const SEARCH_PATH: &str = "/v2/shopping/flight-offers";

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        client_id: "test-client-id".to_string(),
        client_secret: "test-client-secret".to_string(),
        token_url: format!("{}{}", server.uri(), TOKEN_PATH),
        search_url: format!("{}{}", server.uri(), SEARCH_PATH),
        timeout_seconds: 5,
        ..ApiConfig::default()
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
}

fn token_body(expires_in: i64) -> serde_json::Value {
    serde_json::json!({
        "type": "amadeusOAuth2Token",
        "token_type": "Bearer",
        "access_token": "mock-access-token",
        "expires_in": expires_in,
        "state": "approved"
    })
}

fn offer_json(airline: &str, total: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "flight-offer",
        "validatingAirlineCodes": [airline],
        "price": {"currency": "USD", "total": total},
        "itineraries": [{
            "duration": "PT28H10M",
            "segments": [{"carrierCode": airline}, {"carrierCode": airline}]
        }]
    })
}

async fn mount_token(server: &MockServer, expires_in: i64, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=test-client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(expires_in)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn argentina_to_bkk(start: NaiveDate, end: NaiveDate) -> ReportRequest {
    ReportRequest {
        groups: vec![Group::Country {
            name: "Argentina".to_string(),
            airport: "EZE".to_string(),
        }],
        destination: "BKK".to_string(),
        start,
        end,
    }
}

#[tokio::test]
async fn test_best_price_picks_cheapest_mocked_offer() {
    let server = MockServer::start().await;
    mount_token(&server, 1799, 1).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(header("Authorization", "Bearer mock-access-token"))
        .and(query_param("originLocationCode", "EZE"))
        .and(query_param("destinationLocationCode", "BKK"))
        .and(query_param("departureDate", "2026-09-01"))
        .and(query_param("adults", "1"))
        .and(query_param("max", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [offer_json("TG", "1100.00"), offer_json("QR", "900.00")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let report = generate_report(&source, &argentina_to_bkk(day(1), day(1)))
        .await
        .unwrap();

    assert_eq!(report.offers.len(), 2);
    assert_eq!(report.best.len(), 1);
    let best = &report.best[0];
    assert_eq!(best.airline, "QR");
    assert!((best.price.amount - 900.0).abs() < 1e-9);
    assert_eq!(best.origin, "EZE");
    assert_eq!(best.destination, "BKK");
    assert_eq!(best.date, day(1));
    assert_eq!(best.stops, 1);
    assert_eq!(best.group, "Argentina");
}

#[tokio::test]
async fn test_token_failure_aborts_without_queries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "Client credentials are invalid"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let result = generate_report(&source, &argentina_to_bkk(day(1), day(3))).await;

    match result {
        Err(AppError::TokenFetch { status, message }) => {
            assert_eq!(status.map(|s| s.as_u16()), Some(401));
            assert!(message.contains("invalid_client"));
        }
        other => panic!("Expected TokenFetch error, got {:?}", other.map(|r| r.offers.len())),
    }
}

#[tokio::test]
async fn test_failed_query_is_distinct_from_empty_result() {
    let server = MockServer::start().await;
    mount_token(&server, 1799, 1).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("departureDate", "2026-09-01"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("departureDate", "2026-09-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("departureDate", "2026-09-03"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [offer_json("AR", "980.50")]
        })))
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let report = generate_report(&source, &argentina_to_bkk(day(1), day(3)))
        .await
        .unwrap();

    let outcomes: Vec<&QueryOutcome> = report.attempts.iter().map(|a| &a.outcome).collect();
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], QueryOutcome::Failed(reason) if reason.contains("500")));
    assert_eq!(outcomes[1], &QueryOutcome::Empty);
    assert_eq!(outcomes[2], &QueryOutcome::Offers(1));
    assert_eq!(report.best.len(), 1);
}

#[tokio::test]
async fn test_every_day_and_group_is_queried() {
    let server = MockServer::start().await;
    mount_token(&server, 1799, 1).await;

    // 6 days × 2 groups
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .expect(12)
        .mount(&server)
        .await;

    let request = ReportRequest {
        groups: vec![
            Group::Route {
                origin: "CMN".to_string(),
                destination: "EZE".to_string(),
            },
            Group::Route {
                origin: "LIS".to_string(),
                destination: "GRU".to_string(),
            },
        ],
        destination: "BKK".to_string(),
        start: day(1),
        end: day(6),
    };

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let error = generate_report(&source, &request).await.unwrap_err();

    assert_eq!(error.query_counts(), Some((12, 0)));
}

#[tokio::test]
async fn test_token_is_reused_while_valid() {
    let server = MockServer::start().await;
    mount_token(&server, 1799, 1).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [offer_json("LA", "700")]
        })))
        .expect(4)
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let report = generate_report(&source, &argentina_to_bkk(day(1), day(4)))
        .await
        .unwrap();
    assert_eq!(report.best.len(), 4);
}

#[tokio::test]
async fn test_expiring_token_is_refetched() {
    let server = MockServer::start().await;
    // Shorter than the refresh margin, so every use fetches a new token:
    // authenticate, then one per search (two searches)
    mount_token(&server, 30, 3).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [offer_json("LA", "700")]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let report = generate_report(&source, &argentina_to_bkk(day(1), day(2)))
        .await
        .unwrap();
    assert_eq!(report.attempts.len(), 2);
}

#[tokio::test]
async fn test_all_failed_queries_keep_their_reasons() {
    let server = MockServer::start().await;
    mount_token(&server, 1799, 1).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("service down"))
        .expect(2)
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let error = generate_report(&source, &argentina_to_bkk(day(1), day(2)))
        .await
        .unwrap_err();

    assert_eq!(error.query_counts(), Some((2, 2)));
    match error {
        AppError::NoFlightsFound { attempts } => {
            for attempt in &attempts {
                assert!(matches!(
                    &attempt.outcome,
                    QueryOutcome::Failed(reason) if reason.contains("503") && reason.contains("service down")
                ));
            }
        }
        other => panic!("Expected NoFlightsFound, got {}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_search_is_a_failed_query() {
    let server = MockServer::start().await;
    mount_token(&server, 1799, 1).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("departureDate", "2026-09-01"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid access token"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("departureDate", "2026-09-02"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [offer_json("TG", "850")]
        })))
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let report = generate_report(&source, &argentina_to_bkk(day(1), day(2)))
        .await
        .unwrap();

    assert!(matches!(
        &report.attempts[0].outcome,
        QueryOutcome::Failed(reason) if reason.contains("401")
    ));
    assert_eq!(report.attempts[1].outcome, QueryOutcome::Offers(1));
    assert_eq!(report.failed_attempts().count(), 1);
}

#[tokio::test]
async fn test_non_ok_success_status_is_a_failed_query() {
    let server = MockServer::start().await;
    mount_token(&server, 1799, 1).await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(203).set_body_json(serde_json::json!({
            "data": [offer_json("TG", "850")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let error = generate_report(&source, &argentina_to_bkk(day(1), day(1)))
        .await
        .unwrap_err();

    assert_eq!(error.query_counts(), Some((1, 1)));
}

#[tokio::test]
async fn test_failed_token_refresh_aborts_mid_report() {
    let server = MockServer::start().await;

    // First token is already inside the refresh margin; the refresh fails
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(30)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("token service unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [offer_json("LA", "700")]
        })))
        .expect(0)
        .mount(&server)
        .await;

    let source = AmadeusSource::new(&api_config(&server)).unwrap();
    let result = generate_report(&source, &argentina_to_bkk(day(1), day(3))).await;

    match result {
        Err(AppError::TokenFetch { status, .. }) => {
            assert_eq!(status.map(|s| s.as_u16()), Some(500));
        }
        Err(other) => panic!("Expected TokenFetch error, got {}", other),
        Ok(report) => panic!("Expected TokenFetch error, got {} offers", report.offers.len()),
    }
}
