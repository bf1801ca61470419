//! Handler tests for the inventory and storage routers over in-memory repositories

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_inventory::*;
use domain_products::{
    CreateProduct, Dimensions, InMemoryProductRepository, Product, ProductRepository,
    ProductService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use test_utils::{json_body, TestAuth};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    auth: TestAuth,
    products: InMemoryProductRepository,
}

fn app() -> TestApp {
    let products = InMemoryProductRepository::new();
    let inventories = InMemoryInventoryRepository::new();
    let storages = InMemoryStorageRepository::new();

    let stock = Arc::new(StockService::new(
        ProductService::new(products.clone()),
        inventories.clone(),
        storages.clone(),
    ));

    let router = Router::new()
        .nest(
            "/inventory",
            inventory_router(InventoryService::new(inventories.clone()), stock.clone()),
        )
        .nest(
            "/storages",
            storage_router(StorageService::new(storages, inventories), stock),
        );

    let auth = TestAuth::new();
    TestApp {
        router: auth.wrap(router),
        auth,
        products,
    }
}

async fn seed_product(products: &InMemoryProductRepository) -> Product {
    products
        .create(CreateProduct {
            name: "Paint Bucket".to_string(),
            batch_id: None,
            category: Some("paint".to_string()),
            price: 10.0,
            quantity: 100,
            weight: 2.0,
            dimensions: Dimensions::new(1.0, 1.0, 1.0),
            description: None,
            threshold_limit: 10,
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

async fn create_storage(app: &TestApp, location: &str, inventory: Option<&str>) -> String {
    let mut body = json!({
        "location_id": location,
        "dimensions": { "length": 5.0, "width": 5.0, "height": 2.0 },
        "holding_capacity": 50.0
    });
    if let Some(inventory) = inventory {
        body["inventory"] = json!(inventory);
    }
    let (status, body) = send(
        app,
        request("POST", "/storages", Some(app.auth.bearer("staff")), Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["_id"].as_str().unwrap().to_string()
}

async fn create_inventory(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/inventory/create",
            Some(app.auth.bearer("admin")),
            Some(json!({
                "name": "North Hub",
                "total_capacity": 1000.0,
                "total_volume": 1000.0,
                "inventory_location": { "type": "Point", "coordinates": [77.59, 12.97] }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_storage_volume_defaults_to_dimensions() {
    let app = app();
    let id = create_storage(&app, "A1-01", None).await;

    let (status, body) = send(&app, request("GET", &format!("/storages/{id}"), None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Storage fetched successfully");
    assert_eq!(body["data"]["volume"], 50.0);
    assert_eq!(body["data"]["capacity_occupied"], 0.0);
}

#[tokio::test]
async fn test_storage_fetched_by_location_id() {
    let app = app();
    let id = create_storage(&app, "A1-02", None).await;

    let (status, body) = send(&app, request("GET", "/storages/A1-02", None, None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["_id"], id);
}

#[tokio::test]
async fn test_duplicate_location_rejected() {
    let app = app();
    create_storage(&app, "A1-03", None).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/storages",
            Some(app.auth.bearer("staff")),
            Some(json!({
                "location_id": "A1-03",
                "dimensions": { "length": 1.0, "width": 1.0, "height": 1.0 },
                "holding_capacity": 5.0
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Storage with this location_id already exists.");
}

#[tokio::test]
async fn test_add_to_storage_then_reject_overflow() {
    let app = app();
    let product = seed_product(&app.products).await;
    let storage = create_storage(&app, "B2-01", None).await;
    let uri = format!("/storages/{storage}/products");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(app.auth.bearer("staff")),
            Some(json!({ "product_id": product.id, "quantity": 20 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product added to storage successfully");
    assert_eq!(body["data"]["capacity_occupied"], 40.0);
    assert_eq!(body["data"]["volume_occupied"], 20.0);
    assert_eq!(body["data"]["total_cost"], 200.0);

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(app.auth.bearer("staff")),
            Some(json!({ "product_id": product.id, "quantity": 10 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let stored = app.products.get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, 80);
}

#[tokio::test]
async fn test_add_product_requires_token() {
    let app = app();
    let product = seed_product(&app.products).await;
    let storage = create_storage(&app, "B2-02", None).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/storages/{storage}/products"),
            None,
            Some(json!({ "product_id": product.id })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_quantity_below_one_rejected() {
    let app = app();
    let product = seed_product(&app.products).await;
    let inventory = create_inventory(&app).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/inventory/{inventory}/products"),
            Some(app.auth.bearer("staff")),
            Some(json!({ "product_id": product.id, "quantity": 0 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_inventory_requires_admin() {
    let app = app();

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/inventory/create",
            Some(app.auth.bearer("staff")),
            Some(json!({
                "name": "North Hub",
                "inventory_location": { "type": "Point", "coordinates": [0.0, 0.0] }
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_inventory_products_listing_and_utilization() {
    let app = app();
    let product = seed_product(&app.products).await;
    let inventory = create_inventory(&app).await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/inventory/{inventory}/products"),
            Some(app.auth.bearer("staff")),
            Some(json!({ "product_id": product.id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        request("GET", &format!("/inventory/{inventory}/products"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["products"][0]["quantity"], 1);
    assert_eq!(body["data"]["products"][0]["product"]["name"], "Paint Bucket");

    let (_, body) = send(
        &app,
        request("GET", &format!("/inventory/{inventory}/utilization"), None, None),
    )
    .await;
    assert_eq!(body["data"]["capacity_utilization"], "0.20%");
    assert_eq!(body["data"]["total_cost"], 10.0);
}

#[tokio::test]
async fn test_remove_absent_product_is_not_found() {
    let app = app();
    let product = seed_product(&app.products).await;
    let inventory = create_inventory(&app).await;

    let (status, body) = send(
        &app,
        request(
            "DELETE",
            &format!("/inventory/{inventory}/products"),
            Some(app.auth.bearer("staff")),
            Some(json!({ "product_id": product.id })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found in inventory");
}

#[tokio::test]
async fn test_detach_non_empty_storage_conflicts() {
    let app = app();
    let product = seed_product(&app.products).await;
    let inventory = create_inventory(&app).await;
    let storage = create_storage(&app, "C3-01", Some(&inventory)).await;

    send(
        &app,
        request(
            "POST",
            &format!("/storages/{storage}/products"),
            Some(app.auth.bearer("staff")),
            Some(json!({ "product_id": product.id, "quantity": 2 })),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        request(
            "DELETE",
            &format!("/inventory/{inventory}/storage"),
            Some(app.auth.bearer("admin")),
            Some(json!({ "storage_id": storage })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], STORAGE_NOT_EMPTY);
}

#[tokio::test]
async fn test_delete_inventory_with_storages_conflicts() {
    let app = app();
    let inventory = create_inventory(&app).await;
    create_storage(&app, "C3-02", Some(&inventory)).await;

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/inventory/{inventory}"),
            Some(app.auth.bearer("admin")),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_attach_then_detach_empty_storage() {
    let app = app();
    let inventory = create_inventory(&app).await;
    let storage = create_storage(&app, "D4-01", None).await;
    let uri = format!("/inventory/{inventory}/storage");

    let (status, body) = send(
        &app,
        request(
            "POST",
            &uri,
            Some(app.auth.bearer("admin")),
            Some(json!({ "storage_id": storage })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["storage"][0], storage);

    let (status, body) = send(
        &app,
        request(
            "DELETE",
            &uri,
            Some(app.auth.bearer("admin")),
            Some(json!({ "storage_id": storage })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["storage"], json!([]));
}

#[tokio::test]
async fn test_unknown_inventory_is_not_found() {
    let app = app();

    let (status, body) = send(
        &app,
        request(
            "GET",
            &format!("/inventory/{}/cost-summary", uuid::Uuid::now_v7()),
            None,
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Inventory not found");
}

#[tokio::test]
async fn test_add_through_unlinked_storage_is_bad_request() {
    let app = app();
    let product = seed_product(&app.products).await;
    let inventory = create_inventory(&app).await;
    let storage = create_storage(&app, "E5-01", None).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/inventory/{inventory}/products"),
            Some(app.auth.bearer("staff")),
            Some(json!({ "product_id": product.id, "storage_id": storage })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        format!("Storage {storage} is not attached to inventory {inventory}")
    );

    let (_, body) = send(
        &app,
        request("GET", &format!("/inventory/{inventory}/products"), None, None),
    )
    .await;
    assert_eq!(body["data"]["total"], 0);
}
