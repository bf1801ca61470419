//! Combined OpenAPI document served by the docs UIs

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warehouse API",
        version = "0.1.0",
        description = "Products, inventories, storage bins, deliveries, staff, wages and alerts",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/v1/users", api = domain_users::ApiDoc),
        (path = "/api/v1/products", api = domain_products::ApiDoc),
        (path = "/api/v1/inventory", api = domain_inventory::ApiDoc),
        (path = "/api/v1/storages", api = domain_inventory::StorageApiDoc),
        (path = "/api/v1", api = domain_transportation::ApiDoc),
        (path = "/api/v1/wages", api = domain_wages::ApiDoc),
        (path = "/api/v1/alerts", api = domain_alerts::ApiDoc)
    )
)]
pub struct ApiDoc;
