//! End-to-end order flow against a mocked payment API.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use order_system::api::{self, AppState};
use order_system::database::{DbManager, OrderRepository};
use order_system::services::OrderService;
use reddio_pay::Session;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote_payment(status: &str) -> Value {
    json!({
        "payment_id": "pay-42",
        "account_id": "acc",
        "token_id": "tok",
        "product_id": "prod-1",
        "product_token_id": "pt-1",
        "count": 3,
        "status": status,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:01:00Z",
        "transaction_hash": "0xabc123",
        "total_amount": "300",
        "fee_amount": "3",
        "recipient_amount": "297"
    })
}

async fn setup(server: &MockServer) -> (Router, Arc<Session>, TempDir) {
    Mock::given(method("POST"))
        .and(path("/accounts/apikeys/login"))
        .and(body_json(json!({"api_key": "merchant-key"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "jwt-1"})))
        .mount(server)
        .await;

    let session =
        Arc::new(Session::open(server.uri(), "merchant-key").await.expect("session opened"));

    let dir = TempDir::new().expect("temp dir created");
    let db = Arc::new(DbManager::new(dir.path().join("orders.db"), 2).expect("db opened"));
    db.run_migrations().expect("migrations run");

    let service = OrderService::new(OrderRepository::new(Arc::clone(&db)), session.clone());
    (api::router(AppState::new(Arc::new(service), db)), session, dir)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request handled");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body read");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn create_request() -> Request<Body> {
    let body = json!({
        "customer_name": "Grace",
        "customer_email": "grace@example.com",
        "product_id": "prod-1",
        "product_token_id": "pt-1",
        "quantity": 3
    });
    Request::post("/api/orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Create an order, then reconcile it once the remote payment is paid.
///
/// # Test Steps
/// 1. POST /api/orders opens an external payment for 3 items
/// 2. The response carries the pay link and a 300.00 total
/// 3. check-payment with remote status `created` keeps the order pending
/// 4. check-payment with remote status `paid` records the transaction hash
/// 5. The status endpoint reflects the paid order
#[tokio::test(flavor = "multi_thread")]
async fn test_order_is_created_and_reconciled() {
    let server = MockServer::start().await;
    let (app, session, _dir) = setup(&server).await;

    Mock::given(method("POST"))
        .and(path("/external/payments"))
        .and(body_json(json!({"product_id": "prod-1", "product_token_id": "pt-1", "count": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "payment_id": "pay-42",
            "pay_link": "https://pay.example/pay-42",
            "contract_address": "0xc",
            "payment_receivers": [
                {"type": "fee", "recipient_address": "0xf", "amount": "3", "rate": "1"}
            ],
            "token_address": "0xt",
            "decimals": 18
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = call(&app, create_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    let order = &body["order"];
    assert_eq!(order["total_amount"], "300.00");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["reddio_payment_id"], "pay-42");
    assert_eq!(order["reddio_pay_link"], "https://pay.example/pay-42");
    assert_eq!(order["reddio_status"], "created");
    assert!(order["order_number"].as_str().unwrap().starts_with("ORD"));
    let id = order["id"].as_i64().expect("numeric id");

    let lookup = Mock::given(method("GET"))
        .and(path("/payments/pay-42"))
        .and(header_is("authorization", "Bearer jwt-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_payment("created")))
        .mount_as_scoped(&server)
        .await;

    let check = || {
        Request::post(format!("/api/orders/{id}/check-payment")).body(Body::empty()).unwrap()
    };
    let (status, body) = call(&app, check()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment status updated");
    assert_eq!(body["status"], "pending");
    assert!(body["paid_at"].is_null());
    drop(lookup);

    Mock::given(method("GET"))
        .and(path("/payments/pay-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_payment("paid")))
        .mount(&server)
        .await;

    let (status, body) = call(&app, check()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paid");
    assert_eq!(body["reddio_status"], "paid");
    assert_eq!(body["transaction_hash"], "0xabc123");
    assert!(body["paid_at"].is_string());

    let (status, body) = call(
        &app,
        Request::get(format!("/api/orders/{id}/status")).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paid");
    assert_eq!(body["reddio_pay_link"], "https://pay.example/pay-42");

    session.close().await;
}

/// A rejected payment leaves a failed order and surfaces as 502.
///
/// # Test Steps
/// 1. The payment API answers 400 to the external payment request
/// 2. POST /api/orders returns 502 with the remote message
/// 3. The order is listed with status `failed`
#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_payment_marks_order_failed() {
    let server = MockServer::start().await;
    let (app, session, _dir) = setup(&server).await;

    Mock::given(method("POST"))
        .and(path("/external/payments"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "product token inactive"})),
        )
        .mount(&server)
        .await;

    let (status, body) = call(&app, create_request()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("product token inactive"));

    let (status, body) =
        call(&app, Request::get("/api/orders?page=1&limit=5").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["limit"], 5);
    assert_eq!(body["orders"][0]["status"], "failed");
    assert_eq!(body["orders"][0]["reddio_payment_id"], "");

    session.close().await;
}
