use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::CookieJar;
use axum_helpers::{
    AdminUser, ApiResponse, AuthUser, JwtAuth, UuidPath, ValidatedJson, auth_cookie,
    clear_auth_cookie,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
};
use std::sync::Arc;

use crate::error::{UserError, UserResult};
use crate::models::{
    AdminUpdateUser, AuthPayload, LoginRequest, PasswordUpdate, RegisterUser, Role, Shift,
    UpdateProfile, User, UserList, UserResponse,
};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for the users API
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        register,
        login,
        logout,
        me,
        list_users,
        update_profile,
        update_password,
        admin_update,
        delete_user,
    ),
    components(
        schemas(
            UserResponse, UserList, AuthPayload, Role, Shift, RegisterUser, LoginRequest,
            UpdateProfile, AdminUpdateUser, PasswordUpdate
        ),
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
        (name = "Users", description = "Accounts, login and staff administration")
    )
)]
pub struct ApiDoc;

/// Users plus what is needed to issue session tokens
pub struct UserState<R: UserRepository> {
    pub users: UserService<R>,
    pub jwt: JwtAuth,
    /// Marks the session cookie `Secure`
    pub secure_cookies: bool,
}

impl<R: UserRepository> UserState<R> {
    /// Signs a token for `user` and returns the jar with the session cookie plus the Bearer value
    fn issue(&self, user: &User, jar: CookieJar) -> UserResult<(CookieJar, String)> {
        let token = self
            .jwt
            .create_token(user.id, &user.role.to_string())
            .map_err(|e| UserError::Token(e.to_string()))?;
        let bearer = format!("Bearer {token}");
        let jar = jar.add(auth_cookie(token, self.jwt.ttl(), self.secure_cookies));
        Ok((jar, bearer))
    }
}

type SharedState<R> = State<Arc<UserState<R>>>;
type UserResponseResult = UserResult<Json<ApiResponse<UserResponse>>>;

pub fn router<R: UserRepository + 'static>(
    users: UserService<R>,
    jwt: JwtAuth,
    secure_cookies: bool,
) -> Router {
    let state = UserState {
        users,
        jwt,
        secure_cookies,
    };

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/", get(list_users).put(update_profile))
        .route("/update_password", put(update_password))
        .route("/{id}", put(admin_update).delete(delete_user))
        .with_state(Arc::new(state))
}

/// Create an account and sign in
#[utoipa::path(
    post,
    path = "/register",
    tag = "Users",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User created; token set as cookie and Authorization header", body = ApiResponse<AuthPayload>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(state): SharedState<R>,
    jar: CookieJar,
    ValidatedJson(input): ValidatedJson<RegisterUser>,
) -> UserResult<impl IntoResponse> {
    let user = state.users.register(input).await?;
    let (jar, bearer) = state.issue(&user, jar)?;

    Ok((
        StatusCode::CREATED,
        jar,
        [(header::AUTHORIZATION, bearer)],
        Json(ApiResponse::success(
            "User Created Successfully",
            AuthPayload { user: user.into() },
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token set as cookie and Authorization header", body = ApiResponse<AuthPayload>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: UserRepository>(
    State(state): SharedState<R>,
    jar: CookieJar,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<impl IntoResponse> {
    let user = state.users.login(input).await?;
    let (jar, bearer) = state.issue(&user, jar)?;

    Ok((
        jar,
        [(header::AUTHORIZATION, bearer)],
        Json(ApiResponse::success(
            "User Login Successful",
            AuthPayload { user: user.into() },
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "Users",
    responses(
        (status = 200, description = "Session cookie cleared"),
        (status = 401, response = UnauthorizedResponse)
    )
)]
async fn logout(AuthUser(claims): AuthUser, jar: CookieJar) -> impl IntoResponse {
    tracing::info!(user_id = %claims.user_id, "User logged out");
    (
        jar.remove(clear_auth_cookie()),
        [(header::AUTHORIZATION, String::new())],
        Json(ApiResponse::success("Logged out successfully", ())),
    )
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn me<R: UserRepository>(
    State(state): SharedState<R>,
    AuthUser(claims): AuthUser,
) -> UserResponseResult {
    let user = state.users.get_user(claims.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Data Fetched successfully",
        user.into(),
    )))
}

#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = ApiResponse<UserList>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(state): SharedState<R>,
) -> UserResult<Json<ApiResponse<UserList>>> {
    let users = state.users.list_users().await?;
    Ok(Json(ApiResponse::success(
        "All Users Fetched Successfully",
        users.into(),
    )))
}

/// Update the caller's own name, email, phone or active flag
#[utoipa::path(
    put,
    path = "",
    tag = "Users",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_profile<R: UserRepository>(
    State(state): SharedState<R>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfile>,
) -> UserResponseResult {
    let user = state.users.update_profile(claims.user_id, input).await?;
    Ok(Json(ApiResponse::success(
        "Profile Updated Successfully!",
        user.into(),
    )))
}

#[utoipa::path(
    put,
    path = "/update_password",
    tag = "Users",
    request_body = PasswordUpdate,
    responses(
        (status = 200, description = "Password updated", body = ApiResponse<UserResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_password<R: UserRepository>(
    State(state): SharedState<R>,
    AuthUser(claims): AuthUser,
    ValidatedJson(input): ValidatedJson<PasswordUpdate>,
) -> UserResponseResult {
    let user = state.users.update_password(claims.user_id, input).await?;
    Ok(Json(ApiResponse::success(
        "Password Successfully Updated",
        user.into(),
    )))
}

/// Change role, shift, payroll fields or profile of any user (admin only)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(("id" = uuid::Uuid, Path, description = "User ID")),
    request_body = AdminUpdateUser,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn admin_update<R: UserRepository>(
    State(state): SharedState<R>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AdminUpdateUser>,
) -> UserResponseResult {
    let user = state.users.admin_update(id, input).await?;
    Ok(Json(ApiResponse::success(
        "User Updated Successfully",
        user.into(),
    )))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = uuid::Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(state): SharedState<R>,
    _admin: AdminUser,
    UuidPath(id): UuidPath,
) -> UserResult<Json<ApiResponse<()>>> {
    state.users.delete_user(id).await?;
    Ok(Json(ApiResponse::success("User Deleted Successfully", ())))
}
