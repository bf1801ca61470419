//! Wires the domain crates onto their MongoDB repositories.
//!
//! Everything here is nested under `/api` by `axum_helpers::create_router`.

pub mod health;

use axum::{Json, Router, middleware, routing::get};
use axum_helpers::optional_jwt_auth_middleware;
use mongodb::Database;
use serde_json::{Value, json};
use std::sync::Arc;

use domain_alerts::{AlertService, MongoAlertRepository};
use domain_inventory::{
    InventoryService, MongoInventoryRepository, MongoStorageRepository, StockService,
    StorageService, inventory_router, storage_router,
};
use domain_products::{MongoProductRepository, ProductService};
use domain_transportation::{MongoTransportRepository, TransportService};
use domain_users::{MongoUserRepository, UserService};
use domain_wages::{MongoWageRepository, WageService};

use crate::state::AppState;

/// Creates every collection's indexes; safe to run on each startup.
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoProductRepository::new(db).init_indexes().await?;
    MongoInventoryRepository::new(db).init_indexes().await?;
    MongoStorageRepository::new(db).init_indexes().await?;
    MongoTransportRepository::new(db).init_indexes().await?;
    MongoUserRepository::new(db).init_indexes().await?;
    MongoWageRepository::new(db).init_indexes().await?;
    MongoAlertRepository::new(db).init_indexes().await?;
    Ok(())
}

pub fn routes(state: &AppState) -> Router {
    let db = &state.db;

    let products = ProductService::new(MongoProductRepository::new(db));
    let inventories = MongoInventoryRepository::new(db);
    let storages = MongoStorageRepository::new(db);
    let stock = Arc::new(StockService::new(
        products.clone(),
        inventories.clone(),
        storages.clone(),
    ));
    let transports = TransportService::new(MongoTransportRepository::new(db), products.clone());
    let users = UserService::new(MongoUserRepository::new(db));
    let wages = WageService::new(MongoWageRepository::new(db), users.clone());
    let alerts = AlertService::new(MongoAlertRepository::new(db));

    let v1 = Router::new()
        .route("/ping", get(ping))
        .nest(
            "/users",
            domain_users::handlers::router(
                users,
                state.jwt.clone(),
                state.config.environment.use_https(),
            ),
        )
        .nest("/products", domain_products::handlers::router(products))
        .nest(
            "/inventory",
            inventory_router(InventoryService::new(inventories.clone()), stock.clone()),
        )
        .nest(
            "/storages",
            storage_router(StorageService::new(storages, inventories), stock),
        )
        .nest(
            "/transports",
            domain_transportation::handlers::router(transports.clone()),
        )
        .nest("/buy", domain_transportation::handlers::order_router(transports))
        .nest("/wages", domain_wages::handlers::router(wages))
        .nest("/alerts", domain_alerts::handlers::router(alerts));

    Router::new()
        .nest("/v1", v1)
        .merge(health::router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            optional_jwt_auth_middleware,
        ))
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "Pong" }))
}
