//! User administration handlers (admin only).

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::services::{NewUser, UserUpdate};
use crate::types::{ApiResponse, Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 30, message = "El nombre de usuario debe tener entre 3 y 30 caracteres."))]
    #[schema(example = "recepcion")]
    pub username: String,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres."))]
    #[schema(example = "Recepcion#2024")]
    pub password: String,
    #[schema(example = "staff_manager")]
    pub role: String,
}

/// Fields left out keep their current value
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 30, message = "El nombre de usuario debe tener entre 3 y 30 caracteres."))]
    pub username: Option<String>,
    /// Empty string keeps the current password
    pub password: Option<String>,
    #[schema(example = "admin")]
    pub role: Option<String>,
}

fn parse_role(raw: &str) -> AppResult<UserRole> {
    UserRole::parse(raw).ok_or_else(|| AppError::validation("Rol inválido."))
}

/// Create user routes (mounted under `/api/users`, behind auth)
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("cookie_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = Vec<UserResponse>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_admin(&current_user)?;
    let users = state.services.users().list_users().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("cookie_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&current_user)?;
    let user = state.services.users().get_user(id).await?;

    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("cookie_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created"),
        (status = 400, description = "Validation error or weak password"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    require_admin(&current_user)?;
    let new_user = NewUser {
        role: parse_role(&payload.role)?,
        username: payload.username,
        password: payload.password,
    };
    let user = state.services.users().create_user(new_user).await?;

    Ok(Created::new(
        "Usuario creado exitosamente.",
        UserResponse::from(user),
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("cookie_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username already exists")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    require_admin(&current_user)?;
    let update = UserUpdate {
        username: payload.username,
        password: payload.password,
        role: payload.role.as_deref().map(parse_role).transpose()?,
    };
    let user = state.services.users().update_user(id, update).await?;

    Ok(Json(ApiResponse::new(
        "Usuario actualizado exitosamente.",
        UserResponse::from(user),
    )))
}

/// Delete an account other than your own
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("cookie_auth" = [])),
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete your own account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;
    state
        .services
        .users()
        .delete_user(current_user.id, id)
        .await?;

    Ok(Json(MessageResponse::new("Usuario eliminado exitosamente.")))
}
