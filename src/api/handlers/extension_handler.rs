//! Extension registry handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Extension as RequestExtension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{CsvUpload, ValidatedJson};
use crate::api::middleware::{require_directory_manager, CurrentUser};
use crate::api::AppState;
use crate::domain::{Extension, ExtensionStatus};
use crate::errors::AppResult;
use crate::services::{ExtensionInput, ImportReport};
use crate::types::{ApiResponse, Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ExtensionRequest {
    #[validate(length(min = 1, max = 20, message = "El número de extensión es requerido."))]
    #[schema(example = "205")]
    pub number: String,
    /// Omit for a global extension
    pub department_id: Option<i32>,
}

impl From<ExtensionRequest> for ExtensionInput {
    fn from(request: ExtensionRequest) -> Self {
        Self {
            number: request.number,
            department_id: request.department_id,
        }
    }
}

/// Create extension routes (mounted under `/api/extensions`, behind auth)
pub fn extension_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_extensions).post(create_extension))
        .route("/:id", put(update_extension).delete(delete_extension))
        .route("/bulk-upload", post(bulk_upload))
}

/// List extensions with their occupant
#[utoipa::path(
    get,
    path = "/api/extensions",
    tag = "Extensions",
    responses((status = 200, description = "Extensions with occupancy", body = Vec<ExtensionStatus>)),
    security(("cookie_auth" = []))
)]
pub async fn list_extensions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ExtensionStatus>>> {
    Ok(Json(state.services.extensions().list().await?))
}

#[utoipa::path(
    post,
    path = "/api/extensions",
    tag = "Extensions",
    request_body = ExtensionRequest,
    responses(
        (status = 201, description = "Extension created"),
        (status = 400, description = "Unknown department"),
        (status = 409, description = "Number already registered")
    ),
    security(("cookie_auth" = []))
)]
pub async fn create_extension(
    State(state): State<AppState>,
    RequestExtension(current_user): RequestExtension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ExtensionRequest>,
) -> AppResult<Created<Extension>> {
    require_directory_manager(&current_user)?;
    let extension = state.services.extensions().create(payload.into()).await?;

    Ok(Created::new("Extensión agregada exitosamente.", extension))
}

#[utoipa::path(
    put,
    path = "/api/extensions/{id}",
    tag = "Extensions",
    params(("id" = i32, Path, description = "Extension ID")),
    request_body = ExtensionRequest,
    responses(
        (status = 200, description = "Extension updated"),
        (status = 404, description = "Extension not found"),
        (status = 409, description = "Number already registered")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_extension(
    State(state): State<AppState>,
    RequestExtension(current_user): RequestExtension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ExtensionRequest>,
) -> AppResult<Json<ApiResponse<Extension>>> {
    require_directory_manager(&current_user)?;
    let extension = state.services.extensions().update(id, payload.into()).await?;

    Ok(Json(ApiResponse::new(
        "Extensión actualizada exitosamente.",
        extension,
    )))
}

/// Delete an extension and release whoever held it
#[utoipa::path(
    delete,
    path = "/api/extensions/{id}",
    tag = "Extensions",
    params(("id" = i32, Path, description = "Extension ID")),
    responses(
        (status = 200, description = "Extension deleted", body = MessageResponse),
        (status = 404, description = "Extension not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_extension(
    State(state): State<AppState>,
    RequestExtension(current_user): RequestExtension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_directory_manager(&current_user)?;
    state.services.extensions().delete(id).await?;

    Ok(Json(MessageResponse::new("Extensión eliminada exitosamente.")))
}

/// Register extensions from a CSV file (`csvFile` field)
#[utoipa::path(
    post,
    path = "/api/extensions/bulk-upload",
    tag = "Extensions",
    request_body(content = String, content_type = "multipart/form-data", description = "csvFile"),
    responses(
        (status = 200, description = "Import finished, existing numbers skipped", body = ImportReport),
        (status = 400, description = "File missing or not a valid CSV"),
        (status = 413, description = "File larger than 1MB")
    ),
    security(("cookie_auth" = []))
)]
pub async fn bulk_upload(
    State(state): State<AppState>,
    RequestExtension(current_user): RequestExtension<CurrentUser>,
    CsvUpload(bytes): CsvUpload,
) -> AppResult<Json<ImportReport>> {
    require_directory_manager(&current_user)?;
    tracing::info!(user = %current_user.username, size = bytes.len(), "Extension bulk upload");

    Ok(Json(state.services.imports().import_extensions(bytes).await?))
}
