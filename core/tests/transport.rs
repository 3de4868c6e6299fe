//! Transport and response-classification tests for `UreqTransport`.
//!
//! Uses `wiremock` to stand up a local HTTP server per test. `UreqTransport`
//! blocks, so each call runs on `spawn_blocking` while the mock server keeps
//! serving on the test runtime.

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grocery_core::{
    ClientError, OptimizationRequest, OptimizerClient, RawPlan, ServiceError, TransportError,
    UreqTransport,
};

fn request() -> OptimizationRequest {
    OptimizationRequest {
        user_address: "9 Elm St".to_string(),
        grocery_list: vec!["bread".to_string(), "eggs".to_string()],
        max_stores: 2,
        budget: Decimal::new(25, 0),
    }
}

fn plan_json() -> serde_json::Value {
    json!({
        "stores": ["Target"],
        "items": [
            "bread ($2.30) : Target - 123 Main St",
            "eggs ($2.90) : Target - 123 Main St"
        ],
        "item_total": 5.2,
        "miles_traveled": 2.4,
        "approximate_total_cost": 6.64,
        "route_order": [
            {"step": 1, "type": "start", "address": "9 Elm St"},
            {"step": 2, "type": "store", "address": "Target - 123 Main St"},
            {"step": 3, "type": "end", "address": "9 Elm St"}
        ]
    })
}

/// Run one `/optimize` call against `server` with the given transport timeout.
async fn execute(server: &MockServer, timeout: Duration) -> Result<RawPlan, ClientError> {
    let client = OptimizerClient::new(&server.uri(), "prices_with_coords.csv");
    tokio::task::spawn_blocking(move || {
        let transport = UreqTransport::new(timeout);
        client.execute(&transport, &request())
    })
    .await
    .expect("blocking task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn sends_wire_request_and_parses_plan() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/optimize"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "csv_path": "prices_with_coords.csv",
            "grocery_list": ["bread", "eggs"],
            "max_stores": 2,
            "user_address": "9 Elm St"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(plan_json()))
        .expect(1)
        .mount(&server)
        .await;

    let raw = execute(&server, Duration::from_secs(5)).await.unwrap();
    assert_eq!(raw.items.len(), 2);
    assert_eq!(raw.approximate_total_cost, Decimal::new(664, 2));
}

#[tokio::test(flavor = "multi_thread")]
async fn service_error_body_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "no route found"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = execute(&server, Duration::from_secs(5)).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Service(ServiceError::Reported(ref m)) if m == "no route found"),
        "got {err:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_with_html_body_is_transport_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/optimize"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Internal Server Error</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = execute(&server, Duration::from_secs(5)).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Transport(TransportError::Status { status: 500, .. })),
        "got {err:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn incomplete_plan_is_malformed() {
    let server = MockServer::start().await;

    let mut body = plan_json();
    body.as_object_mut().unwrap().remove("miles_traveled");
    Mock::given(method("POST"))
        .and(path("/optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = execute(&server, Duration::from_secs(5)).await.unwrap_err();
    assert!(
        matches!(
            err,
            ClientError::Service(ServiceError::MalformedResponse { ref reason })
                if reason.contains("miles_traveled")
        ),
        "got {err:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn non_utf8_success_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/optimize"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, b'{']))
        .mount(&server)
        .await;

    let err = execute(&server, Duration::from_secs(5)).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Service(ServiceError::MalformedResponse { .. })),
        "got {err:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/optimize"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(plan_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = execute(&server, Duration::from_millis(500)).await.unwrap_err();
    assert!(
        matches!(err, ClientError::Transport(TransportError::Timeout { .. })),
        "got {err:?}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn makes_exactly_one_call_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/optimize"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(execute(&server, Duration::from_secs(5)).await.is_err());
}
