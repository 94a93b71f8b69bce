//! Important-info board handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_directory_manager, CurrentUser};
use crate::api::AppState;
use crate::domain::Announcement;
use crate::errors::AppResult;
use crate::services::AnnouncementInput;
use crate::types::{ApiResponse, Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AnnouncementRequest {
    #[validate(length(min = 1, max = 200, message = "El título es requerido."))]
    #[schema(example = "Mantenimiento eléctrico")]
    pub title: String,
    pub content: Option<String>,
    #[schema(example = "305")]
    pub extension: Option<String>,
}

impl From<AnnouncementRequest> for AnnouncementInput {
    fn from(request: AnnouncementRequest) -> Self {
        Self {
            title: request.title,
            content: request.content,
            extension: request.extension,
        }
    }
}

/// Create announcement routes (mounted under `/api/important-info`, behind auth)
pub fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_announcements).post(create_announcement))
        .route("/:id", put(update_announcement).delete(delete_announcement))
}

#[utoipa::path(
    get,
    path = "/api/important-info",
    tag = "Important info",
    responses((status = 200, description = "Announcements, newest first", body = Vec<Announcement>)),
    security(("cookie_auth" = []))
)]
pub async fn list_announcements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Announcement>>> {
    Ok(Json(state.services.announcements().list().await?))
}

#[utoipa::path(
    post,
    path = "/api/important-info",
    tag = "Important info",
    request_body = AnnouncementRequest,
    responses(
        (status = 201, description = "Announcement created"),
        (status = 400, description = "Title missing")
    ),
    security(("cookie_auth" = []))
)]
pub async fn create_announcement(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<AnnouncementRequest>,
) -> AppResult<Created<Announcement>> {
    require_directory_manager(&current_user)?;
    let info = state.services.announcements().create(payload.into()).await?;

    Ok(Created::new("Información importante agregada exitosamente.", info))
}

#[utoipa::path(
    put,
    path = "/api/important-info/{id}",
    tag = "Important info",
    params(("id" = i32, Path, description = "Announcement ID")),
    request_body = AnnouncementRequest,
    responses(
        (status = 200, description = "Announcement updated"),
        (status = 404, description = "Announcement not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_announcement(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AnnouncementRequest>,
) -> AppResult<Json<ApiResponse<Announcement>>> {
    require_directory_manager(&current_user)?;
    let info = state
        .services
        .announcements()
        .update(id, payload.into())
        .await?;

    Ok(Json(ApiResponse::new(
        "Información importante actualizada exitosamente.",
        info,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/important-info/{id}",
    tag = "Important info",
    params(("id" = i32, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement deleted", body = MessageResponse),
        (status = 404, description = "Announcement not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_announcement(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_directory_manager(&current_user)?;
    state.services.announcements().delete(id).await?;

    Ok(Json(MessageResponse::new(
        "Información importante eliminada exitosamente.",
    )))
}
