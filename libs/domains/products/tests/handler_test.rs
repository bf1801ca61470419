//! Handler tests for the Products domain
//!
//! The router runs over the in-memory repository behind the same JWT
//! middleware the application installs.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use domain_products::*;
use serde_json::{json, Value};
use test_utils::{json_body, TestAuth};
use tower::ServiceExt; // For oneshot()

fn app(repo: InMemoryProductRepository) -> (Router, TestAuth) {
    let auth = TestAuth::new();
    let app = auth.wrap(handlers::router(ProductService::new(repo)));
    (app, auth)
}

fn create_body(name: &str, quantity: i64, threshold: i64) -> Value {
    json!({
        "name": name,
        "price": 10.0,
        "quantity": quantity,
        "weight": 2.0,
        "dimensions": { "length": 1.0, "width": 1.0, "height": 1.0 },
        "threshold_limit": threshold,
        "category": "tools"
    })
}

fn post(uri: &str, token: Option<String>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_create_product_returns_201_with_envelope() {
    let (app, auth) = app(InMemoryProductRepository::new());

    let response = app
        .oneshot(post(
            "/",
            Some(auth.bearer("staff")),
            create_body("Pallet Wrap", 100, 10),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Product created successfully");
    assert_eq!(body["data"]["name"], "Pallet Wrap");
    assert_eq!(body["data"]["restock_recommended"], false);
    assert_eq!(body["data"]["sku"], body["data"]["_id"]);
}

#[tokio::test]
async fn test_create_product_requires_token() {
    let (app, _) = app(InMemoryProductRepository::new());

    let response = app
        .oneshot(post("/", None, create_body("Pallet Wrap", 1, 0)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No Token Provided");
}

#[tokio::test]
async fn test_create_product_rejects_invalid_token() {
    let (app, _) = app(InMemoryProductRepository::new());

    let response = app
        .oneshot(post(
            "/",
            Some("Bearer not-a-jwt".to_string()),
            create_body("Pallet Wrap", 1, 0),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Invalid or expired Token Provided");
}

#[tokio::test]
async fn test_create_product_validates_input() {
    let (app, auth) = app(InMemoryProductRepository::new());

    let response = app
        .oneshot(post(
            "/",
            Some(auth.bearer("staff")),
            create_body("ab", 1, 0),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"]["name"], "BadRequestError");
}

#[tokio::test]
async fn test_create_product_rejects_unknown_fields() {
    let (app, auth) = app(InMemoryProductRepository::new());
    let mut body = create_body("Pallet Wrap", 1, 0);
    body["colour"] = json!("red");

    let response = app
        .oneshot(post("/", Some(auth.bearer("staff")), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_product_not_found() {
    let (app, _) = app(InMemoryProductRepository::new());

    let response = app
        .oneshot(get(&format!("/{}", uuid::Uuid::now_v7())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product not found");
    assert_eq!(body["error"]["name"], "NotFoundError");
}

#[tokio::test]
async fn test_get_product_invalid_uuid() {
    let (app, _) = app(InMemoryProductRepository::new());

    let response = app.oneshot(get("/not-a-uuid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_by_sku_returns_product() {
    let repo = InMemoryProductRepository::new();
    let product = repo.create(serde_json::from_value(create_body("Shrink Film", 5, 1)).unwrap())
        .await
        .unwrap();
    let (app, _) = app(repo);

    let response = app
        .oneshot(get(&format!("/sku/{}", product.sku)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["data"]["name"], "Shrink Film");
}

#[tokio::test]
async fn test_needs_restock_requires_auth_and_filters() {
    let repo = InMemoryProductRepository::new();
    repo.create(serde_json::from_value(create_body("Low Item", 2, 5)).unwrap())
        .await
        .unwrap();
    repo.create(serde_json::from_value(create_body("Full Item", 50, 5)).unwrap())
        .await
        .unwrap();
    let (app, auth) = app(repo);

    let anonymous = app.clone().oneshot(get("/needsRestock")).await.unwrap();
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/needsRestock")
        .header("authorization", auth.bearer("staff"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], "Low Item");
}

#[tokio::test]
async fn test_update_product_recomputes_restock() {
    let repo = InMemoryProductRepository::new();
    let product = repo
        .create(serde_json::from_value(create_body("Tape Roll", 20, 5)).unwrap())
        .await
        .unwrap();
    let (app, auth) = app(repo);

    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", product.id))
        .header("content-type", "application/json")
        .header("authorization", auth.bearer("staff"))
        .body(Body::from(json!({ "threshold_limit": 25 }).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product updated successfully");
    assert_eq!(body["data"]["restock_recommended"], true);
}

#[tokio::test]
async fn test_delete_product_requires_admin() {
    let repo = InMemoryProductRepository::new();
    let product = repo
        .create(serde_json::from_value(create_body("Label Printer", 1, 0)).unwrap())
        .await
        .unwrap();
    let (app, auth) = app(repo.clone());

    let delete = |token: String| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/{}", product.id))
            .header("authorization", token)
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(auth.bearer("staff"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Only Admin can Do this Operation!");

    let response = app.oneshot(delete(auth.bearer("admin"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(repo.get_by_id(product.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_expiring_and_expired_windows() {
    let repo = InMemoryProductRepository::new();
    let today = Utc::now().date_naive();

    let mut soon = create_body("Milk Crate", 1, 0);
    soon["expiry_date"] = json!((today + Duration::days(3)).to_string());
    let mut past = create_body("Old Yogurt", 1, 0);
    past["expiry_date"] = json!((today - Duration::days(1)).to_string());
    let mut later = create_body("Flour Sack", 1, 0);
    later["expiry_date"] = json!((today + Duration::days(30)).to_string());
    for body in [soon, past, later] {
        repo.create(serde_json::from_value(body).unwrap()).await.unwrap();
    }
    let (app, _) = app(repo);

    let response = app.clone().oneshot(get("/expiring")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = app.clone().oneshot(get("/expiring?days=60")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let response = app.oneshot(get("/expired")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    let expired = body["data"].as_array().unwrap();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0]["name"], "Old Yogurt");
}

#[tokio::test]
async fn test_list_filters_by_category() {
    let repo = InMemoryProductRepository::new();
    let mut other = create_body("Freezer Pack", 1, 0);
    other["category"] = json!("cold");
    repo.create(serde_json::from_value(other).unwrap()).await.unwrap();
    repo.create(serde_json::from_value(create_body("Hammer Set", 1, 0)).unwrap())
        .await
        .unwrap();
    let (app, _) = app(repo);

    let response = app.clone().oneshot(get("/?category=cold")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "All products fetched successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app.oneshot(get("/category/tools")).await.unwrap();
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["data"][0]["name"], "Hammer Set");
}
