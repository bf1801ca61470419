use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post, put},
};
use axum_helpers::{
    AdminUser, ApiResponse, AuthUser, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use domain_users::UserRepository;
use std::sync::Arc;

use crate::error::WageResult;
use crate::models::{CalculateQuery, Wage, WageAmount, WageRateUpdate};
use crate::repository::WageRepository;
use crate::service::WageService;

#[derive(utoipa::OpenApi)]
#[openapi(
    paths(list_wages, calculate, overworked, user_wage, update_rate),
    components(
        schemas(Wage, WageAmount, WageRateUpdate),
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
        (name = "Wages", description = "Payroll from hourly rate and hours worked")
    )
)]
pub struct ApiDoc;

type SharedService<W, U> = State<Arc<WageService<W, U>>>;
type WageResponse = WageResult<Json<ApiResponse<Wage>>>;

pub fn router<W, U>(service: WageService<W, U>) -> Router
where
    W: WageRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/", get(list_wages))
        .route("/calculate", post(calculate))
        .route("/overworked", get(overworked))
        .route("/user/{user_id}", get(user_wage))
        .route("/{user_id}", put(update_rate))
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Wages",
    responses(
        (status = 200, description = "Wage records", body = ApiResponse<Vec<Wage>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_wages<W: WageRepository, U: UserRepository>(
    State(service): SharedService<W, U>,
) -> WageResult<Json<ApiResponse<Vec<Wage>>>> {
    let wages = service.list_wages().await?;
    Ok(Json(ApiResponse::success("Wages Fetched Successfully", wages)))
}

/// `wage_per_hour × hours_this_month` without touching any record
#[utoipa::path(
    post,
    path = "/calculate",
    tag = "Wages",
    params(CalculateQuery),
    responses(
        (status = 200, description = "Calculated wage", body = ApiResponse<WageAmount>),
        (status = 400, response = BadRequestResponse)
    )
)]
async fn calculate<W: WageRepository, U: UserRepository>(
    State(service): SharedService<W, U>,
    Query(query): Query<CalculateQuery>,
) -> WageResult<Json<ApiResponse<WageAmount>>> {
    let wage = service.calculate(&query)?;
    Ok(Json(ApiResponse::success(
        "Wage Calculated Successfully",
        WageAmount { wage },
    )))
}

/// Recalculated wages of users flagged for extra shifts
#[utoipa::path(
    get,
    path = "/overworked",
    tag = "Wages",
    responses(
        (status = 200, description = "Overworked staff wages", body = ApiResponse<Vec<Wage>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn overworked<W: WageRepository, U: UserRepository>(
    State(service): SharedService<W, U>,
) -> WageResult<Json<ApiResponse<Vec<Wage>>>> {
    let wages = service.overworked().await?;
    Ok(Json(ApiResponse::success(
        "Overworked Staff Fetched Successfully",
        wages,
    )))
}

#[utoipa::path(
    get,
    path = "/user/{user_id}",
    tag = "Wages",
    params(("user_id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Wage calculated and stored", body = ApiResponse<Wage>),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn user_wage<W: WageRepository, U: UserRepository>(
    State(service): SharedService<W, U>,
    _user: AuthUser,
    UuidPath(user_id): UuidPath,
) -> WageResponse {
    let wage = service.user_wage(user_id).await?;
    Ok(Json(ApiResponse::success("Wage Fetched Successfully", wage)))
}

/// Set a user's hourly rate or hours (admin only) and recalculate
#[utoipa::path(
    put,
    path = "/{user_id}",
    tag = "Wages",
    params(("user_id" = uuid::Uuid, Path, description = "User ID")),
    request_body = WageRateUpdate,
    responses(
        (status = 200, description = "Wage info updated", body = ApiResponse<Wage>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_rate<W: WageRepository, U: UserRepository>(
    State(service): SharedService<W, U>,
    AdminUser(claims): AdminUser,
    UuidPath(user_id): UuidPath,
    ValidatedJson(input): ValidatedJson<WageRateUpdate>,
) -> WageResponse {
    let wage = service.update_rate(user_id, input).await?;
    tracing::info!(admin_id = %claims.user_id, user_id = %user_id, "Wage info updated");
    Ok(Json(ApiResponse::success("Wage Info Updated Successfully", wage)))
}
