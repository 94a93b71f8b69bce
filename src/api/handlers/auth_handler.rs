//! Authentication handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{clear_auth_cookie, create_auth_cookie, CurrentUser};
use crate::api::AppState;
use crate::domain::{UserResponse, UserRole};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "El nombre de usuario es requerido."))]
    #[schema(example = "admin")]
    pub username: String,
    #[validate(length(min = 1, message = "La contraseña es requerida."))]
    #[schema(example = "Admin#2024")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = "Login exitoso.")]
    pub message: String,
    pub user: UserResponse,
}

/// Identity behind the current session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginCheckResponse {
    pub authenticated: bool,
    pub user: SessionUser,
}

/// Login route (mounted under `/api`, behind the login rate limit)
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Session routes (mounted under `/api`, behind auth)
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/refresh-token", post(refresh_token))
        .route("/login-check", get(login_check))
}

/// Login and receive the session cookie
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, `authToken` cookie set", body = LoginResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let session = state
        .services
        .auth()
        .login(payload.username, payload.password)
        .await?;

    let jar = jar.add(create_auth_cookie(session.token, &state.config));
    let body = LoginResponse {
        message: "Login exitoso.".to_string(),
        user: UserResponse::from(session.user),
    };

    Ok((jar, Json(body)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Authentication",
    responses((status = 200, description = "Logged out", body = MessageResponse))
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    (
        jar.add(clear_auth_cookie()),
        Json(MessageResponse::new("Logout exitoso.")),
    )
}

/// Issue a fresh session cookie
#[utoipa::path(
    post,
    path = "/api/refresh-token",
    tag = "Authentication",
    responses(
        (status = 200, description = "Token refreshed", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("cookie_auth" = []))
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let session = state.services.auth().refresh(current_user.id).await?;

    Ok((
        jar.add(create_auth_cookie(session.token, &state.config)),
        Json(MessageResponse::new("Token refrescado exitosamente.")),
    ))
}

/// Report the identity behind the session cookie
#[utoipa::path(
    get,
    path = "/api/login-check",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session is valid", body = LoginCheckResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("cookie_auth" = []))
)]
pub async fn login_check(
    Extension(current_user): Extension<CurrentUser>,
) -> Json<LoginCheckResponse> {
    Json(LoginCheckResponse {
        authenticated: true,
        user: SessionUser {
            id: current_user.id,
            username: current_user.username,
            role: current_user.role,
        },
    })
}
