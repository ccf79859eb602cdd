use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kirana_api::{app, state::AppState};
use kirana_delivery::DeliveryLocationRegistry;
use kirana_order::{MutationCoordinator, OrderStore};
use kirana_shared::models::{Order, OrderStatus, ShippingAddress};
use kirana_store::InMemoryOrderGateway;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower::ServiceExt;
use uuid::Uuid;

async fn build_app(countries: &[&str], orders: Vec<Order>) -> Router {
    let mut seeded = DeliveryLocationRegistry::new();
    for country in countries {
        seeded.create(country.to_string(), None, None).unwrap();
    }
    let registry = Arc::new(RwLock::new(seeded));
    let store = Arc::new(RwLock::new(OrderStore::new()));
    let gateway = Arc::new(InMemoryOrderGateway::new(registry.clone()));
    gateway.seed(orders).await;

    let coordinator = Arc::new(MutationCoordinator::new(
        gateway.clone(),
        store.clone(),
        registry.clone(),
        Duration::from_millis(500),
    ));
    coordinator.refresh().await.unwrap();

    app(AppState {
        store,
        registry,
        coordinator,
        gateway,
    })
}

fn order_to(country: &str, status: OrderStatus) -> Order {
    let mut order = Order::new("Asha Patel".to_string(), status);
    order.shipping_address = Some(ShippingAddress::Legacy(format!("12 MG Road, {country}")));
    order
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_list_orders_is_priority_sorted_and_enriched() {
    let delivered = order_to("India", OrderStatus::Delivered);
    let pending = order_to("India", OrderStatus::Pending);
    let app = build_app(&["India"], vec![delivered, pending]).await;

    let (status, body) = send(&app, get("/v1/orders")).await;
    assert_eq!(status, StatusCode::OK);

    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["status"], "pending");
    assert_eq!(orders[1]["status"], "delivered");
    assert_eq!(orders[0]["delivery_blocked"], false);
    assert!(orders[0]["available_actions"]
        .as_array()
        .unwrap()
        .contains(&json!("accept")));
    assert!(orders[1]["available_actions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_accept_flow_moves_order_forward() {
    let order = order_to("India", OrderStatus::Pending);
    let id = order.id;
    let app = build_app(&["India"], vec![order]).await;

    let (status, body) = send(
        &app,
        post_json(&format!("/v1/orders/{id}/actions"), json!({"action": "accept"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "ok");
    assert_eq!(body["status"], "accepted");

    let (status, body) = send(&app, get(&format!("/v1/orders/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");
    assert!(body["available_actions"]
        .as_array()
        .unwrap()
        .contains(&json!("start_packing")));
}

#[tokio::test]
async fn test_illegal_action_returns_invalid_transition() {
    let order = order_to("India", OrderStatus::Packing);
    let id = order.id;
    let app = build_app(&["India"], vec![order]).await;

    let (status, body) = send(
        &app,
        post_json(&format!("/v1/orders/{id}/actions"), json!({"action": "ship"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_transition");
}

#[tokio::test]
async fn test_unserviceable_country_returns_delivery_restricted() {
    let order = order_to("Ruritania", OrderStatus::Paid);
    let id = order.id;
    let app = build_app(&["India"], vec![order]).await;

    let (status, body) = send(
        &app,
        post_json(&format!("/v1/orders/{id}/actions"), json!({"action": "accept"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "delivery_restricted");

    // Status unchanged, but the order itself stays actionable once the
    // registry starts serving Ruritania
    let (_, body) = send(&app, get(&format!("/v1/orders/{id}"))).await;
    assert_eq!(body["status"], "paid");
    assert_eq!(body["delivery_blocked"], true);
}

#[tokio::test]
async fn test_unknown_order_is_404() {
    let app = build_app(&["India"], vec![]).await;
    let ghost = Uuid::new_v4();
    let (status, body) = send(
        &app,
        post_json(&format!("/v1/orders/{ghost}/actions"), json!({"action": "accept"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_search_filters_server_side() {
    let mut a = order_to("India", OrderStatus::Pending);
    a.customer_name = "Asha Patel".to_string();
    let mut b = order_to("India", OrderStatus::Pending);
    b.customer_name = "Binod Rao".to_string();
    let app = build_app(&["India"], vec![a, b]).await;

    let (status, body) = send(&app, get("/v1/orders?search=binod")).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer_name"], "Binod Rao");
}

#[tokio::test]
async fn test_location_create_toggle_unblocks_order() {
    let order = order_to("Nepal", OrderStatus::Pending);
    let id = order.id;
    let app = build_app(&[], vec![order]).await;

    let (status, body) = send(
        &app,
        post_json("/v1/delivery-locations", json!({"country": "Nepal"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let location_id = body["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, get(&format!("/v1/orders/{id}"))).await;
    assert_eq!(body["delivery_blocked"], false);

    // Deactivating flips the guard on the next evaluation
    let (status, body) = send(
        &app,
        post_json(&format!("/v1/delivery-locations/{location_id}/toggle"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let (_, body) = send(&app, get(&format!("/v1/orders/{id}"))).await;
    assert_eq!(body["delivery_blocked"], true);
}

#[tokio::test]
async fn test_bulk_import_counts_and_export_round_trip() {
    let app = build_app(&[], vec![]).await;

    let (status, body) = send(
        &app,
        post_json(
            "/v1/delivery-locations/import?format=json",
            json!([{"country": "India"}, {"country": ""}]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 1);
    assert_eq!(body["skipped"], 1);

    let (status, body) = send(&app, get("/v1/delivery-locations/export?format=csv")).await;
    assert_eq!(status, StatusCode::OK);
    let csv = body.as_str().unwrap();
    assert!(csv.starts_with("country,region,city,is_active"));
    assert!(csv.contains("India"));
}

#[tokio::test]
async fn test_bulk_toggle_reports_missing_ids() {
    let app = build_app(&["India"], vec![]).await;
    let (_, listed) = send(&app, get("/v1/delivery-locations")).await;
    let existing = listed[0]["id"].as_str().unwrap().to_string();
    let ghost = Uuid::new_v4();

    let (status, body) = send(
        &app,
        post_json(
            "/v1/delivery-locations/bulk/toggle",
            json!({"ids": [existing, ghost], "is_active": false}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["missing"].as_array().unwrap().len(), 1);

    // Nothing was applied
    let (_, listed) = send(&app, get("/v1/delivery-locations")).await;
    assert_eq!(listed[0]["is_active"], true);
}

#[tokio::test]
async fn test_delete_location_is_idempotent() {
    let app = build_app(&["India"], vec![]).await;
    let (_, listed) = send(&app, get("/v1/delivery-locations")).await;
    let id = listed[0]["id"].as_str().unwrap().to_string();

    let delete = |uri: String| {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };

    let (status, _) = send(&app, delete(format!("/v1/delivery-locations/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, delete(format!("/v1/delivery-locations/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
