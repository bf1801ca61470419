use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ConflictResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
    AdminUser, ApiResponse, AuthUser, UuidPath, ValidatedJson,
};
use domain_products::ProductRepository;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::InventoryResult;
use crate::models::{
    CostSummary, CreateStorage, Storage, StorageProductRequest, UpdateStorage, Utilization,
};
use crate::repository::{InventoryRepository, StorageRepository};
use crate::service::StorageService;
use crate::stock::StockService;

/// Services behind the `/storages` routes
pub struct StorageState<P, I, S>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    pub storages: StorageService<S, I>,
    pub stock: Arc<StockService<P, I, S>>,
}

type SharedState<P, I, S> = State<Arc<StorageState<P, I, S>>>;
type StorageResponse = InventoryResult<Json<ApiResponse<Storage>>>;

pub fn router<P, I, S>(storages: StorageService<S, I>, stock: Arc<StockService<P, I, S>>) -> Router
where
    P: ProductRepository + 'static,
    I: InventoryRepository + 'static,
    S: StorageRepository + 'static,
{
    let state = Arc::new(StorageState { storages, stock });

    Router::new()
        .route("/", get(list_storages).post(create_storage))
        .route(
            "/{id}",
            get(get_storage).put(update_storage).delete(delete_storage),
        )
        .route(
            "/{id}/products",
            post(add_product).delete(remove_product),
        )
        .route("/{id}/utilization", get(utilization))
        .route("/{id}/cost-summary", get(cost_summary))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "",
    tag = "Storages",
    responses(
        (status = 200, description = "Storages fetched successfully", body = ApiResponse<Vec<Storage>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn list_storages<P, I, S>(
    State(state): SharedState<P, I, S>,
) -> InventoryResult<Json<ApiResponse<Vec<Storage>>>>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let storages = state.storages.list_storages().await?;
    Ok(Json(ApiResponse::success(
        "Storages fetched successfully",
        storages,
    )))
}

/// Create a storage bin, attaching it to `inventory` when given
#[utoipa::path(
    post,
    path = "",
    tag = "Storages",
    request_body = CreateStorage,
    responses(
        (status = 201, description = "Storage created successfully", body = ApiResponse<Storage>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn create_storage<P, I, S>(
    State(state): SharedState<P, I, S>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateStorage>,
) -> InventoryResult<impl IntoResponse>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let storage = state.storages.create_storage(input).await?;
    tracing::info!(user_id = %claims.user_id, storage_id = %storage.id, "Storage created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Storage created successfully", storage)),
    ))
}

/// Fetch a storage bin by id or by `location_id`
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Storages",
    params(("id" = String, Path, description = "Storage ID or location_id")),
    responses(
        (status = 200, description = "Storage fetched successfully", body = ApiResponse<Storage>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn get_storage<P, I, S>(
    State(state): SharedState<P, I, S>,
    Path(identifier): Path<String>,
) -> StorageResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let storage = state.storages.get_storage(&identifier).await?;
    Ok(Json(ApiResponse::success(
        "Storage fetched successfully",
        storage,
    )))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Storages",
    params(("id" = Uuid, Path, description = "Storage ID")),
    request_body = UpdateStorage,
    responses(
        (status = 200, description = "Storage updated successfully", body = ApiResponse<Storage>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn update_storage<P, I, S>(
    State(state): SharedState<P, I, S>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateStorage>,
) -> StorageResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let storage = state.storages.update_storage(id, input).await?;
    Ok(Json(ApiResponse::success(
        "Storage updated successfully",
        storage,
    )))
}

/// Delete an empty storage bin (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Storages",
    params(("id" = Uuid, Path, description = "Storage ID")),
    responses(
        (status = 200, description = "Storage deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn delete_storage<P, I, S>(
    State(state): SharedState<P, I, S>,
    AdminUser(claims): AdminUser,
    UuidPath(id): UuidPath,
) -> InventoryResult<Json<ApiResponse<()>>>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    state.storages.delete_storage(id).await?;
    tracing::info!(user_id = %claims.user_id, storage_id = %id, "Storage removed");
    Ok(Json(ApiResponse::success("Storage deleted successfully", ())))
}

/// Move unallocated stock into the bin
#[utoipa::path(
    post,
    path = "/{id}/products",
    tag = "Storages",
    params(("id" = Uuid, Path, description = "Storage ID")),
    request_body = StorageProductRequest,
    responses(
        (status = 200, description = "Product added to storage successfully", body = ApiResponse<Storage>),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn add_product<P, I, S>(
    State(state): SharedState<P, I, S>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<StorageProductRequest>,
) -> StorageResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let storage = state
        .stock
        .add_to_storage(id, input.product_id, input.quantity, input.inventory_id)
        .await?;
    Ok(Json(ApiResponse::success(
        "Product added to storage successfully",
        storage,
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}/products",
    tag = "Storages",
    params(("id" = Uuid, Path, description = "Storage ID")),
    request_body = StorageProductRequest,
    responses(
        (status = 200, description = "Product removed from storage successfully", body = ApiResponse<Storage>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn remove_product<P, I, S>(
    State(state): SharedState<P, I, S>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<StorageProductRequest>,
) -> StorageResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let storage = state
        .stock
        .remove_from_storage(id, input.product_id, input.quantity, input.inventory_id)
        .await?;
    Ok(Json(ApiResponse::success(
        "Product removed from storage successfully",
        storage,
    )))
}

#[utoipa::path(
    get,
    path = "/{id}/utilization",
    tag = "Storages",
    params(("id" = Uuid, Path, description = "Storage ID")),
    responses(
        (status = 200, description = "Storage utilization", body = ApiResponse<Utilization>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn utilization<P, I, S>(
    State(state): SharedState<P, I, S>,
    UuidPath(id): UuidPath,
) -> InventoryResult<Json<ApiResponse<Utilization>>>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let utilization = state.stock.storage_utilization(id).await?;
    Ok(Json(ApiResponse::success(
        "Storage utilization fetched successfully",
        utilization,
    )))
}

#[utoipa::path(
    get,
    path = "/{id}/cost-summary",
    tag = "Storages",
    params(("id" = Uuid, Path, description = "Storage ID")),
    responses(
        (status = 200, description = "Storage cost summary", body = ApiResponse<CostSummary>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn cost_summary<P, I, S>(
    State(state): SharedState<P, I, S>,
    UuidPath(id): UuidPath,
) -> InventoryResult<Json<ApiResponse<CostSummary>>>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let summary = state.stock.storage_cost_summary(id).await?;
    Ok(Json(ApiResponse::success(
        "Storage cost summary fetched successfully",
        summary,
    )))
}
