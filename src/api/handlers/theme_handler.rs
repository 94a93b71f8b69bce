//! Site theme handlers.

use axum::{extract::State, response::Json, Extension};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::Theme;
use crate::errors::AppResult;
use crate::types::MessageResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeResponse {
    pub theme: Theme,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ThemeRequest {
    /// One of default, sunny, rainy, cloudy, light, dark
    #[schema(example = "rainy")]
    pub theme: String,
}

/// Current site theme
#[utoipa::path(
    get,
    path = "/api/theme",
    tag = "Theme",
    responses((status = 200, description = "Active theme", body = ThemeResponse))
)]
pub async fn get_theme(State(state): State<AppState>) -> AppResult<Json<ThemeResponse>> {
    let theme = state.services.theme().current().await?;

    Ok(Json(ThemeResponse { theme }))
}

/// Change the site theme and notify connected clients
#[utoipa::path(
    post,
    path = "/api/theme",
    tag = "Theme",
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme changed", body = MessageResponse),
        (status = 400, description = "Unknown theme"),
        (status = 403, description = "Admin access required")
    ),
    security(("cookie_auth" = []))
)]
pub async fn set_theme(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ThemeRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;
    let theme: Theme = payload.theme.trim().parse()?;
    let theme = state.services.theme().set(theme).await?;

    Ok(Json(MessageResponse::new(format!("Tema cambiado a {}", theme))))
}
