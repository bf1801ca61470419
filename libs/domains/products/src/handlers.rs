//! HTTP handlers for the Products API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AdminUser, ApiResponse, AuthUser, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{
    CreateProduct, Dimensions, ExpiringQuery, GeoPoint, NearQuery, Product, ProductFilter,
    StockLine, UpdateProduct,
};
use crate::repository::ProductRepository;
use crate::service::ProductService;

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        list_needing_restock,
        list_low_stock,
        list_expiring,
        list_expired,
        list_near,
        get_by_sku,
        list_by_category,
        list_by_supplier,
        get_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, Dimensions, GeoPoint, StockLine),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalogue and unallocated stock")
    )
)]
pub struct ApiDoc;

type ProductsResponse = ProductResult<Json<ApiResponse<Vec<Product>>>>;

pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/needsRestock", get(list_needing_restock))
        .route("/low-stock", get(list_low_stock))
        .route("/expiring", get(list_expiring))
        .route("/expired", get(list_expired))
        .route("/near", get(list_near))
        .route("/sku/{sku}", get(get_by_sku))
        .route("/category/{category}", get(list_by_category))
        .route("/supplier/{supplier_id}", get(list_by_supplier))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(shared_service)
}

/// List products with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "All products fetched successfully", body = ApiResponse<Vec<Product>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(filter): Query<ProductFilter>,
) -> ProductsResponse {
    let products = service.list_products(filter).await?;
    Ok(Json(ApiResponse::success(
        "All products fetched successfully",
        products,
    )))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created successfully", body = ApiResponse<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> ProductResult<impl IntoResponse> {
    let product = service.create_product(input).await?;
    tracing::info!(user_id = %claims.user_id, product_id = %product.id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Product created successfully", product)),
    ))
}

/// Products flagged for restocking
#[utoipa::path(
    get,
    path = "/needsRestock",
    tag = "Products",
    responses(
        (status = 200, description = "Products needing restock", body = ApiResponse<Vec<Product>>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_needing_restock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _user: AuthUser,
) -> ProductsResponse {
    let products = service.list_needing_restock().await?;
    Ok(Json(ApiResponse::success(
        "Products needing restock fetched successfully",
        products,
    )))
}

/// Products whose stored quantity is at or below their threshold
#[utoipa::path(
    get,
    path = "/low-stock",
    tag = "Products",
    responses(
        (status = 200, description = "Low stock products", body = ApiResponse<Vec<Product>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_low_stock<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductsResponse {
    let products = service.list_low_stock().await?;
    Ok(Json(ApiResponse::success(
        "Low stock products fetched successfully",
        products,
    )))
}

/// Products expiring within the next `days` days
#[utoipa::path(
    get,
    path = "/expiring",
    tag = "Products",
    params(ExpiringQuery),
    responses(
        (status = 200, description = "Expiring products", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_expiring<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<ExpiringQuery>,
) -> ProductsResponse {
    let products = service.list_expiring(query.days).await?;
    Ok(Json(ApiResponse::success(
        "Expiring products fetched successfully",
        products,
    )))
}

#[utoipa::path(
    get,
    path = "/expired",
    tag = "Products",
    responses(
        (status = 200, description = "Expired products", body = ApiResponse<Vec<Product>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_expired<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductsResponse {
    let products = service.list_expired().await?;
    Ok(Json(ApiResponse::success(
        "Expired products fetched successfully",
        products,
    )))
}

/// Products whose supplier is near a point, nearest first
#[utoipa::path(
    get,
    path = "/near",
    tag = "Products",
    params(NearQuery),
    responses(
        (status = 200, description = "Products near the point", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_near<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Query(query): Query<NearQuery>,
) -> ProductsResponse {
    let products = service.list_near(query).await?;
    Ok(Json(ApiResponse::success(
        "Products fetched successfully",
        products,
    )))
}

#[utoipa::path(
    get,
    path = "/sku/{sku}",
    tag = "Products",
    params(("sku" = String, Path, description = "Product SKU")),
    responses(
        (status = 200, description = "Product fetched successfully", body = ApiResponse<Product>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_by_sku<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(sku): Path<String>,
) -> ProductResult<Json<ApiResponse<Product>>> {
    let product = service.get_by_sku(&sku).await?;
    Ok(Json(ApiResponse::success(
        "Product fetched successfully",
        product,
    )))
}

#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = "Products",
    params(("category" = String, Path, description = "Product category")),
    responses(
        (status = 200, description = "Products in the category", body = ApiResponse<Vec<Product>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_category<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(category): Path<String>,
) -> ProductsResponse {
    let products = service.list_by_category(&category).await?;
    Ok(Json(ApiResponse::success(
        "Products fetched successfully",
        products,
    )))
}

#[utoipa::path(
    get,
    path = "/supplier/{supplier_id}",
    tag = "Products",
    params(("supplier_id" = Uuid, Path, description = "Supplier user ID")),
    responses(
        (status = 200, description = "Products from the supplier", body = ApiResponse<Vec<Product>>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_supplier<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(supplier_id): UuidPath,
) -> ProductsResponse {
    let products = service.list_by_supplier(supplier_id).await?;
    Ok(Json(ApiResponse::success(
        "Products fetched successfully",
        products,
    )))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product fetched successfully", body = ApiResponse<Product>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ApiResponse<Product>>> {
    let product = service.get_product(id).await?;
    Ok(Json(ApiResponse::success(
        "Product fetched successfully",
        product,
    )))
}

/// Update a product; the restock flag is recomputed from the merged values
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated successfully", body = ApiResponse<Product>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> ProductResult<Json<ApiResponse<Product>>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(ApiResponse::success(
        "Product updated successfully",
        product,
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product deleted successfully", body = ApiResponse<Option<Product>>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    AdminUser(claims): AdminUser,
    UuidPath(id): UuidPath,
) -> ProductResult<Json<ApiResponse<Option<Product>>>> {
    service.delete_product(id).await?;
    tracing::info!(user_id = %claims.user_id, product_id = %id, "Product deleted");
    Ok(Json(ApiResponse::success("Product deleted successfully", None)))
}
