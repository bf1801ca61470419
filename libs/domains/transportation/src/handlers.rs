//! HTTP handlers for deliveries (`/transports`) and orders (`/buy`)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    AdminUser, ApiResponse, AuthUser, UuidPath, ValidatedJson,
};
use domain_products::{ProductRepository, StockLine};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{TransportError, TransportResult};
use crate::models::{
    CreateOrder, OrderLine, OrderTotals, StatusUpdate, Transport, TransportMode, TransportStatus,
    UpdateOrder,
};
use crate::repository::TransportRepository;
use crate::service::TransportService;

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        list_transports,
        list_by_status,
        list_overdue,
        list_assigned,
        get_transport,
        update_status,
        delete_transport,
        create_order,
        update_order,
    ),
    components(
        schemas(
            Transport, TransportStatus, TransportMode, OrderTotals, StockLine, OrderLine,
            CreateOrder, UpdateOrder, StatusUpdate
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Transports", description = "Delivery tracking"),
        (name = "Orders", description = "Order intake")
    )
)]
pub struct ApiDoc;

type SharedService<T, P> = State<Arc<TransportService<T, P>>>;
type TransportResponse = TransportResult<Json<ApiResponse<Transport>>>;
type TransportsResponse = TransportResult<Json<ApiResponse<Vec<Transport>>>>;

/// Routes mounted under `/transports`
pub fn router<T, P>(service: TransportService<T, P>) -> Router
where
    T: TransportRepository + 'static,
    P: ProductRepository + 'static,
{
    Router::new()
        .route("/", get(list_transports))
        .route("/status/{status}", get(list_by_status))
        .route("/overdue", get(list_overdue))
        .route("/assigned/{user_id}", get(list_assigned))
        .route("/{id}", get(get_transport).delete(delete_transport))
        .route("/{id}/status", put(update_status))
        .with_state(Arc::new(service))
}

/// Routes mounted under `/buy`
pub fn order_router<T, P>(service: TransportService<T, P>) -> Router
where
    T: TransportRepository + 'static,
    P: ProductRepository + 'static,
{
    Router::new()
        .route("/order", post(create_order))
        .route("/order/{id}", put(update_order))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "/transports",
    tag = "Transports",
    responses(
        (status = 200, description = "Transports fetched successfully", body = ApiResponse<Vec<Transport>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_transports<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
) -> TransportsResponse {
    let transports = service.list_transports().await?;
    Ok(Json(ApiResponse::success(
        "Transports fetched successfully",
        transports,
    )))
}

#[utoipa::path(
    get,
    path = "/transports/status/{status}",
    tag = "Transports",
    params(("status" = TransportStatus, Path, description = "pending, dispatched, in_transit or delivered")),
    responses(
        (status = 200, description = "Transports with the status", body = ApiResponse<Vec<Transport>>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_by_status<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
    Path(status): Path<String>,
) -> TransportsResponse {
    let status: TransportStatus = status
        .parse()
        .map_err(|_| TransportError::InvalidStatus(status.clone()))?;
    let transports = service.list_by_status(status).await?;
    Ok(Json(ApiResponse::success(
        "Transports fetched successfully",
        transports,
    )))
}

/// Transports past their ETA that are not delivered
#[utoipa::path(
    get,
    path = "/transports/overdue",
    tag = "Transports",
    responses(
        (status = 200, description = "Overdue transports", body = ApiResponse<Vec<Transport>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_overdue<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
) -> TransportsResponse {
    let transports = service.list_overdue().await?;
    Ok(Json(ApiResponse::success(
        "Overdue transports fetched successfully",
        transports,
    )))
}

#[utoipa::path(
    get,
    path = "/transports/assigned/{user_id}",
    tag = "Transports",
    params(("user_id" = Uuid, Path, description = "Assignee user ID")),
    responses(
        (status = 200, description = "Transports assigned to the user", body = ApiResponse<Vec<Transport>>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_assigned<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
    _user: AuthUser,
    UuidPath(user_id): UuidPath,
) -> TransportsResponse {
    let transports = service.list_assigned(user_id).await?;
    Ok(Json(ApiResponse::success(
        "Assigned transports fetched successfully",
        transports,
    )))
}

#[utoipa::path(
    get,
    path = "/transports/{id}",
    tag = "Transports",
    params(("id" = Uuid, Path, description = "Transport ID")),
    responses(
        (status = 200, description = "Transport fetched successfully", body = ApiResponse<Transport>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_transport<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
) -> TransportResponse {
    let transport = service.get_transport(id).await?;
    Ok(Json(ApiResponse::success(
        "Transport fetched successfully",
        transport,
    )))
}

#[utoipa::path(
    put,
    path = "/transports/{id}/status",
    tag = "Transports",
    params(("id" = Uuid, Path, description = "Transport ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Transport status updated successfully", body = ApiResponse<Transport>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_status<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<StatusUpdate>,
) -> TransportResponse {
    let transport = service.update_status(id, input.status).await?;
    tracing::info!(user_id = %claims.user_id, transport_id = %id, status = %input.status, "Transport status changed");
    Ok(Json(ApiResponse::success(
        "Transport status updated successfully",
        transport,
    )))
}

/// Cancel a transport (admin only)
#[utoipa::path(
    delete,
    path = "/transports/{id}",
    tag = "Transports",
    params(("id" = Uuid, Path, description = "Transport ID")),
    responses(
        (status = 200, description = "Transport cancelled successfully"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_transport<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
) -> TransportResult<Json<ApiResponse<()>>> {
    service.delete_transport(id).await?;
    Ok(Json(ApiResponse::success("Transport cancelled successfully", ())))
}

/// Place an order: prices the lines and checks stock without reserving it
#[utoipa::path(
    post,
    path = "/buy/order",
    tag = "Orders",
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created successfully", body = ApiResponse<Transport>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> TransportResult<impl IntoResponse> {
    let transport = service.create_order(input).await?;
    tracing::info!(user_id = %claims.user_id, transport_id = %transport.id, "Order placed");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Order created successfully", transport)),
    ))
}

#[utoipa::path(
    put,
    path = "/buy/order/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "Transport ID")),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated successfully", body = ApiResponse<Transport>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order<T: TransportRepository, P: ProductRepository>(
    State(service): SharedService<T, P>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> TransportResponse {
    let transport = service.update_order(id, input).await?;
    Ok(Json(ApiResponse::success(
        "Order updated successfully",
        transport,
    )))
}
