use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
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
    AddInventoryProduct, CostSummary, CreateInventory, Inventory, InventoryProducts,
    RemoveInventoryProduct, StorageLinkRequest, UpdateInventory, Utilization,
};
use crate::repository::{InventoryRepository, StorageRepository};
use crate::service::InventoryService;
use crate::stock::StockService;

/// Services behind the `/inventory` routes
pub struct InventoryState<P, I, S>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    pub inventories: InventoryService<I>,
    pub stock: Arc<StockService<P, I, S>>,
}

type SharedState<P, I, S> = State<Arc<InventoryState<P, I, S>>>;
type InventoryResponse = InventoryResult<Json<ApiResponse<Inventory>>>;

pub fn router<P, I, S>(inventories: InventoryService<I>, stock: Arc<StockService<P, I, S>>) -> Router
where
    P: ProductRepository + 'static,
    I: InventoryRepository + 'static,
    S: StorageRepository + 'static,
{
    let state = Arc::new(InventoryState { inventories, stock });

    Router::new()
        .route("/", get(list_inventories))
        .route("/create", post(create_inventory))
        .route(
            "/{id}",
            get(get_inventory)
                .put(update_inventory)
                .delete(delete_inventory),
        )
        .route(
            "/{id}/products",
            get(list_inventory_products)
                .post(add_product)
                .delete(remove_product),
        )
        .route("/{id}/storage", post(attach_storage).delete(detach_storage))
        .route("/{id}/utilization", get(utilization))
        .route("/{id}/cost-summary", get(cost_summary))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "",
    tag = "Inventory",
    responses(
        (status = 200, description = "Inventories fetched successfully", body = ApiResponse<Vec<Inventory>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn list_inventories<P, I, S>(
    State(state): SharedState<P, I, S>,
) -> InventoryResult<Json<ApiResponse<Vec<Inventory>>>>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventories = state.inventories.list_inventories().await?;
    Ok(Json(ApiResponse::success(
        "Inventories fetched successfully",
        inventories,
    )))
}

/// Create an inventory (admin only)
#[utoipa::path(
    post,
    path = "/create",
    tag = "Inventory",
    request_body = CreateInventory,
    responses(
        (status = 201, description = "Inventory created successfully", body = ApiResponse<Inventory>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn create_inventory<P, I, S>(
    State(state): SharedState<P, I, S>,
    AdminUser(claims): AdminUser,
    ValidatedJson(input): ValidatedJson<CreateInventory>,
) -> InventoryResult<impl IntoResponse>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventory = state.inventories.create_inventory(input).await?;
    tracing::info!(user_id = %claims.user_id, inventory_id = %inventory.id, "Inventory created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Inventory created successfully", inventory)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    responses(
        (status = 200, description = "Inventory fetched successfully", body = ApiResponse<Inventory>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn get_inventory<P, I, S>(
    State(state): SharedState<P, I, S>,
    UuidPath(id): UuidPath,
) -> InventoryResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventory = state.inventories.get_inventory(id).await?;
    Ok(Json(ApiResponse::success(
        "Inventory fetched successfully",
        inventory,
    )))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    request_body = UpdateInventory,
    responses(
        (status = 200, description = "Inventory updated successfully", body = ApiResponse<Inventory>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn update_inventory<P, I, S>(
    State(state): SharedState<P, I, S>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateInventory>,
) -> InventoryResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventory = state.inventories.update_inventory(id, input).await?;
    Ok(Json(ApiResponse::success(
        "Inventory updated successfully",
        inventory,
    )))
}

/// Delete an empty inventory (admin only)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    responses(
        (status = 200, description = "Inventory deleted successfully"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn delete_inventory<P, I, S>(
    State(state): SharedState<P, I, S>,
    AdminUser(claims): AdminUser,
    UuidPath(id): UuidPath,
) -> InventoryResult<Json<ApiResponse<()>>>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    state.inventories.delete_inventory(id).await?;
    tracing::info!(user_id = %claims.user_id, inventory_id = %id, "Inventory removed");
    Ok(Json(ApiResponse::success("Inventory deleted successfully", ())))
}

/// Products held by the inventory with their quantities
#[utoipa::path(
    get,
    path = "/{id}/products",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    responses(
        (status = 200, description = "Inventory products fetched successfully", body = ApiResponse<InventoryProducts>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn list_inventory_products<P, I, S>(
    State(state): SharedState<P, I, S>,
    UuidPath(id): UuidPath,
) -> InventoryResult<Json<ApiResponse<InventoryProducts>>>
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let products = state.stock.inventory_products(id).await?;
    Ok(Json(ApiResponse::success(
        "Inventory products fetched successfully",
        products,
    )))
}

/// Move unallocated stock into the inventory, optionally into one of its storage bins
#[utoipa::path(
    post,
    path = "/{id}/products",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    request_body = AddInventoryProduct,
    responses(
        (status = 200, description = "Product added to inventory successfully", body = ApiResponse<Inventory>),
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
    ValidatedJson(input): ValidatedJson<AddInventoryProduct>,
) -> InventoryResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventory = state
        .stock
        .add_to_inventory(id, input.product_id, input.quantity, input.storage_id)
        .await?;
    Ok(Json(ApiResponse::success(
        "Product added to inventory successfully",
        inventory,
    )))
}

/// Move stock out of the inventory back to unallocated
#[utoipa::path(
    delete,
    path = "/{id}/products",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    request_body = RemoveInventoryProduct,
    responses(
        (status = 200, description = "Product removed from inventory successfully", body = ApiResponse<Inventory>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn remove_product<P, I, S>(
    State(state): SharedState<P, I, S>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<RemoveInventoryProduct>,
) -> InventoryResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventory = state
        .stock
        .remove_from_inventory(id, input.product_id, input.quantity)
        .await?;
    Ok(Json(ApiResponse::success(
        "Product removed from inventory successfully",
        inventory,
    )))
}

#[utoipa::path(
    post,
    path = "/{id}/storage",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    request_body = StorageLinkRequest,
    responses(
        (status = 200, description = "Storage added to inventory successfully", body = ApiResponse<Inventory>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn attach_storage<P, I, S>(
    State(state): SharedState<P, I, S>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<StorageLinkRequest>,
) -> InventoryResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventory = state.stock.attach_storage(id, input.storage_id).await?;
    Ok(Json(ApiResponse::success(
        "Storage added to inventory successfully",
        inventory,
    )))
}

/// Detach an empty storage bin (admin only)
#[utoipa::path(
    delete,
    path = "/{id}/storage",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    request_body = StorageLinkRequest,
    responses(
        (status = 200, description = "Storage removed from inventory successfully", body = ApiResponse<Inventory>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
pub(super) async fn detach_storage<P, I, S>(
    State(state): SharedState<P, I, S>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<StorageLinkRequest>,
) -> InventoryResponse
where
    P: ProductRepository,
    I: InventoryRepository,
    S: StorageRepository,
{
    let inventory = state.stock.detach_storage(id, input.storage_id).await?;
    Ok(Json(ApiResponse::success(
        "Storage removed from inventory successfully",
        inventory,
    )))
}

#[utoipa::path(
    get,
    path = "/{id}/utilization",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    responses(
        (status = 200, description = "Inventory utilization", body = ApiResponse<Utilization>),
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
    let utilization = state.stock.inventory_utilization(id).await?;
    Ok(Json(ApiResponse::success(
        "Inventory utilization fetched successfully",
        utilization,
    )))
}

#[utoipa::path(
    get,
    path = "/{id}/cost-summary",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "Inventory ID")),
    responses(
        (status = 200, description = "Inventory cost summary", body = ApiResponse<CostSummary>),
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
    let summary = state.stock.inventory_cost_summary(id).await?;
    Ok(Json(ApiResponse::success(
        "Inventory cost summary fetched successfully",
        summary,
    )))
}
