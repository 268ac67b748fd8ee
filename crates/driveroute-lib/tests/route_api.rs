use std::net::TcpListener;

use driveroute_lib::{
    ApiOutcome, ClientConfig, Coordinate, NoopRenderer, PollPolicy, RouteApiClient,
    RouteOrchestrator, RouteToken, Settlement, SubmissionPhase,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_FALLBACK: &str = "Failed to fetch route token for origin: A, and destination: B";

fn client(server: &MockServer) -> RouteApiClient {
    RouteApiClient::new(&ClientConfig::default().with_api_base_url(server.uri())).unwrap()
}

fn in_progress() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "status": "in progress" }))
}

fn success_body() -> serde_json::Value {
    json!({
        "status": "success",
        "path": [
            ["22.372081", "114.107877"],
            ["22.326442", "114.167811"],
            ["22.284419", "114.159510"]
        ],
        "total_distance": 20000,
        "total_time": 1800
    })
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn token_request_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/route"))
        .and(body_json(json!({ "origin": "A", "destination": "B" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "validToken" })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client(&server).get_route_token("A", "B").await;

    assert_eq!(outcome, ApiOutcome::Success(RouteToken::new("validToken")));
}

#[tokio::test]
async fn token_request_transport_failure_uses_fallback() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ClientConfig::default().with_api_base_url(format!("http://127.0.0.1:{port}"));
    let client = RouteApiClient::new(&config).unwrap();

    let outcome = client.get_route_token("A", "B").await;

    assert_eq!(
        outcome,
        ApiOutcome::Error {
            message: TOKEN_FALLBACK.to_string()
        }
    );
}

#[tokio::test]
async fn token_request_server_error_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/route"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let outcome = client(&server).get_route_token("A", "B").await;

    assert_eq!(outcome.into_result().unwrap_err(), TOKEN_FALLBACK);
}

#[tokio::test]
async fn token_request_rejects_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/route"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": 42 })))
        .mount(&server)
        .await;

    let message = client(&server)
        .get_route_token("A", "B")
        .await
        .into_result()
        .unwrap_err();

    assert_eq!(message, "$.token: expected string, found number");
}

#[tokio::test]
async fn token_request_undecodable_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/route"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let outcome = client(&server).get_route_token("A", "B").await;

    assert_eq!(outcome.into_result().unwrap_err(), TOKEN_FALLBACK);
}

#[tokio::test]
async fn polling_retries_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(in_progress())
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    let result = client(&server)
        .get_route_path_by_token(RouteToken::new("validToken"))
        .await
        .into_result()
        .unwrap();

    assert_eq!(result.path.len(), 3);
    assert_eq!(
        result.origin(),
        Some(&Coordinate::new("22.372081", "114.107877"))
    );
    assert_eq!(result.total_distance, 20000.0);
    assert_eq!(result.total_time, 1800.0);
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn polling_surfaces_domain_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(in_progress())
        .up_to_n_times(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failure",
            "error": "Location not accessible by car"
        })))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .get_route_path_by_token(RouteToken::new("validToken"))
        .await;

    assert_eq!(
        outcome,
        ApiOutcome::Error {
            message: "Location not accessible by car".to_string()
        }
    );
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn polling_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "failure" })))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .get_route_path_by_token(RouteToken::new("validToken"))
        .await;

    assert_eq!(outcome.into_result().unwrap_err(), "Failed to fetch route");
}

#[tokio::test]
async fn polling_server_error_stops_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .get_route_path_by_token(RouteToken::new("validToken"))
        .await;

    assert_eq!(outcome.into_result().unwrap_err(), "Failed to fetch route");
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn polling_rejects_single_point_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "path": [["22.372081", "114.107877"]],
            "total_distance": 0,
            "total_time": 0
        })))
        .mount(&server)
        .await;

    let outcome = client(&server)
        .get_route_path_by_token(RouteToken::new("validToken"))
        .await;

    assert!(outcome
        .into_result()
        .unwrap_err()
        .starts_with("$.path: expected at least 2 items"));
}

#[tokio::test]
async fn polling_gives_up_at_configured_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(in_progress())
        .mount(&server)
        .await;

    let client = client(&server).with_poll_policy(PollPolicy::default().with_max_attempts(2));
    let outcome = client
        .get_route_path_by_token(RouteToken::new("validToken"))
        .await;

    assert_eq!(
        outcome.into_result().unwrap_err(),
        "route still in progress after 2 polls"
    );
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn orchestrator_resolves_route_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/route"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "validToken" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(in_progress())
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/route/validToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_body()))
        .mount(&server)
        .await;

    let orchestrator = RouteOrchestrator::new(client(&server), NoopRenderer);
    orchestrator.set_starting_location("Innocentre, Hong Kong");
    orchestrator.set_dropoff_location("Hong Kong International Airport");
    orchestrator.on_submit().await;

    let state = orchestrator.snapshot();
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
    assert_eq!(state.phase, SubmissionPhase::Settled(Settlement::Success));
    let result = state.result.unwrap();
    assert_eq!(result.total_distance, 20000.0);
    assert_eq!(result.total_time, 1800.0);
    assert_eq!(request_count(&server).await, 3);
}
