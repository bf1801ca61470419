//! Handler tests for the transports and orders routers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use domain_products::{
    CreateProduct, Dimensions, InMemoryProductRepository, Product, ProductRepository,
    ProductService,
};
use domain_transportation::*;
use serde_json::{json, Value};
use test_utils::{json_body, TestAuth, TestDataBuilder};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    auth: TestAuth,
    products: InMemoryProductRepository,
}

fn app() -> TestApp {
    let products = InMemoryProductRepository::new();
    let service = TransportService::new(
        InMemoryTransportRepository::new(),
        ProductService::new(products.clone()),
    );
    let router = Router::new()
        .nest("/transports", handlers::router(service.clone()))
        .nest("/buy", handlers::order_router(service));

    let auth = TestAuth::new();
    TestApp {
        router: auth.wrap(router),
        auth,
        products,
    }
}

async fn seed_product(products: &InMemoryProductRepository, quantity: i64) -> Product {
    products
        .create(CreateProduct {
            name: "Copper Wire".to_string(),
            batch_id: None,
            category: None,
            price: 5.0,
            quantity,
            weight: 1.5,
            dimensions: Dimensions::new(1.0, 1.0, 2.0),
            description: None,
            threshold_limit: 0,
            shelf_life_days: None,
            mfg_date: None,
            expiry_date: None,
            supplier_id: None,
            supplier_location: None,
        })
        .await
        .unwrap()
}

fn request(method: &str, uri: &str, token: Option<String>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body: Value = json_body(response.into_body()).await;
    (status, body)
}

async fn place_order(app: &TestApp, body: Value) -> (StatusCode, Value) {
    send(
        app,
        request("POST", "/buy/order", Some(app.auth.bearer("staff")), Some(body)),
    )
    .await
}

#[tokio::test]
async fn test_place_order_computes_totals() {
    let app = app();
    let product = seed_product(&app.products, 20).await;
    let builder = TestDataBuilder::from_test_name("place_order");

    let (status, body) = place_order(
        &app,
        json!({
            "package_id": builder.package_id(),
            "products": [{ "product": product.id, "quantity": 4 }],
            "transport_mode": "ship"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["data"]["total_weight"], 6.0);
    assert_eq!(body["data"]["total_volume"], 8.0);
    assert_eq!(body["data"]["total_value"], 20.0);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["transport_mode"], "ship");

    let stored = app.products.get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 20);
}

#[tokio::test]
async fn test_order_line_quantity_defaults_to_one() {
    let app = app();
    let product = seed_product(&app.products, 20).await;

    let (status, body) = place_order(
        &app,
        json!({ "package_id": "PKG-DEF", "products": [{ "product": product.id }] }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["products"][0]["quantity"], 1);
    assert_eq!(body["data"]["total_value"], 5.0);
}

#[tokio::test]
async fn test_order_with_insufficient_stock_rejected() {
    let app = app();
    let product = seed_product(&app.products, 1).await;

    let (status, body) = place_order(
        &app,
        json!({ "package_id": "PKG-LOW", "products": [{ "product": product.id, "quantity": 2 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Insufficient stock for product Copper Wire. Available: 1, Requested: 2"
    );
}

#[tokio::test]
async fn test_order_with_unknown_product_is_not_found() {
    let app = app();
    let missing = uuid::Uuid::now_v7();

    let (status, body) = place_order(
        &app,
        json!({ "package_id": "PKG-404", "products": [{ "product": missing }] }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Product not found: {missing}"));
}

#[tokio::test]
async fn test_duplicate_package_id_rejected() {
    let app = app();
    place_order(&app, json!({ "package_id": "PKG-DUP" })).await;

    let (status, _) = place_order(&app, json!({ "package_id": "PKG-DUP" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_requires_token() {
    let app = app();

    let (status, _) = send(
        &app,
        request("POST", "/buy/order", None, Some(json!({ "package_id": "PKG-1" }))),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_status_update_and_filter() {
    let app = app();
    let (_, body) = place_order(&app, json!({ "package_id": "PKG-ST" })).await;
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/transports/{id}/status"),
            Some(app.auth.bearer("driver")),
            Some(json!({ "status": "in_transit" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "in_transit");

    let (status, body) = send(
        &app,
        request("GET", "/transports/status/in_transit", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, request("GET", "/transports/status/lost", None, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overdue_lists_undelivered_past_eta() {
    let app = app();
    let past = (Utc::now() - Duration::hours(2)).to_rfc3339();
    place_order(&app, json!({ "package_id": "PKG-LATE", "eta": past })).await;
    place_order(
        &app,
        json!({ "package_id": "PKG-DONE", "eta": past, "status": "delivered" }),
    )
    .await;

    let (status, body) = send(&app, request("GET", "/transports/overdue", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    let overdue = body["data"].as_array().unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0]["package_id"], "PKG-LATE");
}

#[tokio::test]
async fn test_update_order_recomputes_totals() {
    let app = app();
    let product = seed_product(&app.products, 50).await;
    let (_, body) = place_order(
        &app,
        json!({ "package_id": "PKG-UPD", "products": [{ "product": product.id, "quantity": 1 }] }),
    )
    .await;
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/buy/order/{id}"),
            Some(app.auth.bearer("staff")),
            Some(json!({ "products": [{ "product": product.id, "quantity": 10 }] })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_value"], 50.0);
    assert_eq!(body["data"]["total_weight"], 15.0);
}

#[tokio::test]
async fn test_assigned_and_delete_permissions() {
    let app = app();
    let driver = uuid::Uuid::now_v7();
    let (_, body) = place_order(
        &app,
        json!({ "package_id": "PKG-DRV", "assigned_to": driver }),
    )
    .await;
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/transports/assigned/{driver}"),
            Some(app.auth.bearer_for(driver, "driver")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["_id"], id);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/transports/{id}"),
            Some(app.auth.bearer("staff")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/transports/{id}"),
            Some(app.auth.bearer("admin")),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
