use httpmock::prelude::*;
use marine_fleet::config::{ComplianceConfig, ServerConfig};
use marine_fleet::{build_router, AppState, FleetClient, FleetError, InMemoryRouteRepository};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_get_routes_decodes_camel_case() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/routes");
        then.status(200).json_body(json!([
            {
                "routeId": "R001",
                "vesselType": "Container",
                "fuelType": "HFO",
                "year": 2024,
                "ghgIntensity": 91.0,
                "fuelConsumption": 5000,
                "distance": 12000,
                "totalEmissions": 4500
            }
        ]));
    });

    let client = FleetClient::new(&server.url("/api")).unwrap();
    let routes = client.get_routes().await.unwrap();

    api_mock.assert();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].route_id, "R001");
    assert_eq!(routes[0].total_emissions, 4500.0);
}

#[tokio::test]
async fn test_year_is_sent_as_query_parameter() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/banking/bank")
            .query_param("year", "2025");
        then.status(200).json_body(json!({
            "year": 2025,
            "surplus": 120.5,
            "bankedSurplus": 300.25
        }));
    });

    let client = FleetClient::new(&server.url("/api/")).unwrap();
    let result = client.bank_surplus(2025).await.unwrap();

    api_mock.assert();
    assert_eq!(result.surplus, 120.5);
    assert_eq!(result.banked_surplus, 300.25);
}

#[tokio::test]
async fn test_create_pool_sends_json_body() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/pools")
            .json_body(json!({ "routeIds": ["R001", "R002"], "year": 2024 }));
        then.status(200).json_body(json!({
            "members": [
                { "routeId": "R001", "cb_before": -10.0, "cb_after": 5.0 },
                { "routeId": "R002", "cb_before": 20.0, "cb_after": 5.0 }
            ]
        }));
    });

    let client = FleetClient::new(&server.url("/api")).unwrap();
    let pool = client
        .create_pool(vec!["R001".to_string(), "R002".to_string()], 2024)
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(pool.members.len(), 2);
    assert_eq!(pool.members[1].cb_before, 20.0);
    assert!(pool.members.iter().all(|m| m.cb_after == 5.0));
}

#[tokio::test]
async fn test_error_body_becomes_api_response_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/routes/R999/baseline");
        then.status(404).json_body(json!({
            "message": "Route with ID R999 not found",
            "statusCode": 404
        }));
    });

    let client = FleetClient::new(&server.url("/api")).unwrap();
    let err = client.set_baseline("R999").await.unwrap_err();

    match err {
        FleetError::ApiResponseError { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Route with ID R999 not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_keeps_raw_text() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/routes/comparison");
        then.status(502).body("Bad Gateway");
    });

    let client = FleetClient::new(&server.url("/api")).unwrap();
    let err = client.get_comparison().await.unwrap_err();
    assert!(matches!(
        err,
        FleetError::ApiResponseError { status: 502, ref message } if message == "Bad Gateway"
    ));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    assert!(FleetClient::new("localhost:3001").is_err());
    assert!(FleetClient::new("").is_err());
}

/// 對真實伺服器跑完整流程
#[tokio::test]
async fn test_client_against_running_server() {
    let state = AppState::new(
        Arc::new(InMemoryRouteRepository::seeded()),
        &ComplianceConfig::default(),
    );
    let app = build_router(state, &ServerConfig::default());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = FleetClient::new(&format!("http://{}/api", addr)).unwrap();

    let routes = client.get_routes().await.unwrap();
    assert_eq!(routes.len(), 5);

    let message = client.set_baseline("R001").await.unwrap();
    assert_eq!(message.message, "Baseline set for R001");

    let comparison = client.get_comparison().await.unwrap();
    assert_eq!(comparison.baseline.route_id, "R001");
    assert_eq!(comparison.comparisons.len(), 4);

    let cb = client.get_compliance_balance(2025).await.unwrap();
    assert_eq!(cb.raw_balance, -4529.84);

    let adjusted = client.get_adjusted_cbs(2024).await.unwrap();
    assert_eq!(adjusted.len(), 3);

    let err = client.apply_banked_surplus(2024).await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = client
        .create_pool(vec!["R001".to_string()], 2024)
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::ApiResponseError { status: 400, .. }));
}
