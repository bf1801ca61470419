use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AdminUser, ApiResponse, AppError, AuthUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, NotImplementedResponse,
        UnauthorizedResponse,
    },
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AlertResult;
use crate::models::{Alert, AlertType, CreateAlert, UpdateAlert};
use crate::repository::AlertRepository;
use crate::service::AlertService;

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        list_unresolved,
        list_alerts,
        create_alert,
        get_alert,
        update_alert,
        resolve_alert,
        delete_alert,
        trigger_alert,
        send_alert,
    ),
    components(
        schemas(Alert, AlertType, CreateAlert, UpdateAlert),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotImplementedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Alerts", description = "Operational alerts")
    )
)]
pub struct ApiDoc;

type SharedService<R> = State<Arc<AlertService<R>>>;
type AlertResponse = AlertResult<Json<ApiResponse<Alert>>>;
type AlertsResponse = AlertResult<Json<ApiResponse<Vec<Alert>>>>;

pub fn router<R: AlertRepository + 'static>(service: AlertService<R>) -> Router {
    Router::new()
        .route("/", get(list_unresolved).post(create_alert))
        .route("/all", get(list_alerts))
        .route("/trigger", post(trigger_alert))
        .route("/send", post(send_alert))
        .route(
            "/{id}",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
        .route("/{id}/resolve", put(resolve_alert))
        .with_state(Arc::new(service))
}

/// Alerts that are still open
#[utoipa::path(
    get,
    path = "",
    tag = "Alerts",
    responses(
        (status = 200, description = "Unresolved alerts", body = ApiResponse<Vec<Alert>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_unresolved<R: AlertRepository>(State(service): SharedService<R>) -> AlertsResponse {
    let alerts = service.list_unresolved().await?;
    Ok(Json(ApiResponse::success(
        "Unresolved alerts fetched successfully",
        alerts,
    )))
}

#[utoipa::path(
    get,
    path = "/all",
    tag = "Alerts",
    responses(
        (status = 200, description = "Every alert", body = ApiResponse<Vec<Alert>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_alerts<R: AlertRepository>(State(service): SharedService<R>) -> AlertsResponse {
    let alerts = service.list_alerts().await?;
    Ok(Json(ApiResponse::success(
        "All alerts fetched successfully",
        alerts,
    )))
}

#[utoipa::path(
    post,
    path = "",
    tag = "Alerts",
    request_body = CreateAlert,
    responses(
        (status = 201, description = "Alert created", body = ApiResponse<Alert>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_alert<R: AlertRepository>(
    State(service): SharedService<R>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<CreateAlert>,
) -> AlertResult<impl IntoResponse> {
    let alert = service.create_alert(input).await?;
    tracing::info!(user_id = %claims.user_id, alert_id = %alert.id, "Alert raised");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Alert created successfully", alert)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert", body = ApiResponse<Alert>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_alert<R: AlertRepository>(
    State(service): SharedService<R>,
    UuidPath(id): UuidPath,
) -> AlertResponse {
    let alert = service.get_alert(id).await?;
    Ok(Json(ApiResponse::success("Alert fetched successfully", alert)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "Alert ID")),
    request_body = UpdateAlert,
    responses(
        (status = 200, description = "Alert updated", body = ApiResponse<Alert>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_alert<R: AlertRepository>(
    State(service): SharedService<R>,
    _user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateAlert>,
) -> AlertResponse {
    let alert = service.update_alert(id, input).await?;
    Ok(Json(ApiResponse::success("Alert updated successfully", alert)))
}

#[utoipa::path(
    put,
    path = "/{id}/resolve",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert resolved", body = ApiResponse<Alert>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn resolve_alert<R: AlertRepository>(
    State(service): SharedService<R>,
    AuthUser(claims): AuthUser,
    UuidPath(id): UuidPath,
) -> AlertResponse {
    let alert = service.resolve_alert(id).await?;
    tracing::info!(user_id = %claims.user_id, alert_id = %id, "Alert resolved");
    Ok(Json(ApiResponse::success("Alert resolved successfully", alert)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Alerts",
    params(("id" = Uuid, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_alert<R: AlertRepository>(
    State(service): SharedService<R>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
) -> AlertResult<Json<ApiResponse<()>>> {
    service.delete_alert(id).await?;
    Ok(Json(ApiResponse::success("Alert deleted successfully", ())))
}

/// Manually trigger an alert. Not available yet.
#[utoipa::path(
    post,
    path = "/trigger",
    tag = "Alerts",
    responses((status = 501, response = NotImplementedResponse))
)]
async fn trigger_alert() -> AppError {
    AppError::NotImplemented("Not Implemented Yet".to_string())
}

/// Send alerts to subscribed users. Not available yet.
#[utoipa::path(
    post,
    path = "/send",
    tag = "Alerts",
    responses((status = 501, response = NotImplementedResponse))
)]
async fn send_alert() -> AppError {
    AppError::NotImplemented("Not Implemented Yet".to_string())
}
