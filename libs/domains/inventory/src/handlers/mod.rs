//! HTTP handlers for inventories and storage bins

pub mod inventory;
pub mod storage;

use utoipa::OpenApi;

use crate::models::{
    AddInventoryProduct, CostBreakdown, CostSummary, CreateInventory, CreateStorage, Inventory,
    InventoryProduct, InventoryProducts, RemoveInventoryProduct, Storage, StorageLinkRequest,
    StorageProductRequest, UpdateInventory, UpdateStorage, Utilization,
};
use axum_helpers::errors::responses::{
    BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
    ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
};

pub use inventory::{router as inventory_router, InventoryState};
pub use storage::{router as storage_router, StorageState};

/// Routes nested under `/inventory`
#[derive(OpenApi)]
#[openapi(
    paths(
        inventory::list_inventories,
        inventory::create_inventory,
        inventory::get_inventory,
        inventory::update_inventory,
        inventory::delete_inventory,
        inventory::list_inventory_products,
        inventory::add_product,
        inventory::remove_product,
        inventory::attach_storage,
        inventory::detach_storage,
        inventory::utilization,
        inventory::cost_summary,
    ),
    components(
        schemas(
            Inventory, CreateInventory, UpdateInventory, AddInventoryProduct,
            RemoveInventoryProduct, StorageLinkRequest, Utilization, CostSummary, CostBreakdown,
            InventoryProduct, InventoryProducts
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Inventory", description = "Inventories and their stock")
    )
)]
pub struct ApiDoc;

/// Routes nested under `/storages`
#[derive(OpenApi)]
#[openapi(
    paths(
        storage::list_storages,
        storage::create_storage,
        storage::get_storage,
        storage::update_storage,
        storage::delete_storage,
        storage::add_product,
        storage::remove_product,
        storage::utilization,
        storage::cost_summary,
    ),
    components(
        schemas(
            Storage, CreateStorage, UpdateStorage, StorageProductRequest, Utilization,
            CostSummary, CostBreakdown
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Storages", description = "Storage bins and their stock")
    )
)]
pub struct StorageApiDoc;
