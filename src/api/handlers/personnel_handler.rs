//! Personnel handlers, including bulk import and individual extensions.

use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::extractors::{CsvUpload, PersonnelMultipart, ValidatedJson};
use crate::api::middleware::{require_directory_manager, CurrentUser};
use crate::api::AppState;
use crate::config::{MAX_MULTIPART_BODY_BYTES, PERSONNEL_TEMPLATE_FILENAME};
use crate::domain::{DirectoryEntry, Personnel};
use crate::errors::AppResult;
use crate::services::ImportReport;
use crate::types::{ApiResponse, Created, MessageResponse};

#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
pub struct AssignExtensionRequest {
    /// Extension to assign; `null` removes the individual assignment
    pub extension_id: Option<i32>,
}

/// Create personnel routes (mounted under `/api/personal`, behind auth)
pub fn personnel_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_personnel).post(create_personnel))
        .route("/:id", put(update_personnel).delete(delete_personnel))
        .route("/:id/extension", put(assign_extension))
        .route("/bulk-upload", post(bulk_upload))
        .route("/template", get(download_template))
        .layer(DefaultBodyLimit::max(MAX_MULTIPART_BODY_BYTES))
}

/// List everyone with resolved position, department and extension
#[utoipa::path(
    get,
    path = "/api/personal",
    tag = "Personnel",
    responses(
        (status = 200, description = "Personnel list", body = Vec<DirectoryEntry>),
        (status = 401, description = "Not authenticated")
    ),
    security(("cookie_auth" = []))
)]
pub async fn list_personnel(State(state): State<AppState>) -> AppResult<Json<Vec<DirectoryEntry>>> {
    Ok(Json(state.services.personnel().list().await?))
}

/// Create a person (multipart form with optional `photo`)
#[utoipa::path(
    post,
    path = "/api/personal",
    tag = "Personnel",
    request_body(content = String, content_type = "multipart/form-data",
        description = "nombre, correo, puesto_id, descripcion, fotoUrl, en_carrusel, fecha_nacimiento, photo"),
    responses(
        (status = 201, description = "Person created"),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Insufficient role"),
        (status = 409, description = "Email already registered"),
        (status = 413, description = "Photo too large")
    ),
    security(("cookie_auth" = []))
)]
pub async fn create_personnel(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    PersonnelMultipart(form): PersonnelMultipart,
) -> AppResult<Created<Personnel>> {
    require_directory_manager(&current_user)?;
    let person = state.services.personnel().create(form).await?;

    Ok(Created::new("Miembro del personal creado exitosamente.", person))
}

/// Update a person; fields not sent are left unchanged
#[utoipa::path(
    put,
    path = "/api/personal/{id}",
    tag = "Personnel",
    params(("id" = i32, Path, description = "Personnel ID")),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Person updated"),
        (status = 404, description = "Person not found"),
        (status = 409, description = "Email already registered")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_personnel(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    PersonnelMultipart(form): PersonnelMultipart,
) -> AppResult<Json<ApiResponse<Personnel>>> {
    require_directory_manager(&current_user)?;
    let person = state.services.personnel().update(id, form).await?;

    Ok(Json(ApiResponse::new(
        "Miembro del personal actualizado exitosamente.",
        person,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/personal/{id}",
    tag = "Personnel",
    params(("id" = i32, Path, description = "Personnel ID")),
    responses(
        (status = 200, description = "Person deleted", body = MessageResponse),
        (status = 404, description = "Person not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_personnel(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_directory_manager(&current_user)?;
    state.services.personnel().delete(id).await?;

    Ok(Json(MessageResponse::new(
        "Miembro del personal eliminado exitosamente.",
    )))
}

/// Assign or clear a person's individual extension
#[utoipa::path(
    put,
    path = "/api/personal/{id}/extension",
    tag = "Personnel",
    params(("id" = i32, Path, description = "Personnel ID")),
    request_body = AssignExtensionRequest,
    responses(
        (status = 200, description = "Extension assigned", body = MessageResponse),
        (status = 404, description = "Person not found"),
        (status = 409, description = "Extension belongs to a position")
    ),
    security(("cookie_auth" = []))
)]
pub async fn assign_extension(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AssignExtensionRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_directory_manager(&current_user)?;
    state
        .services
        .personnel()
        .assign_extension(id, payload.extension_id)
        .await?;

    let message = match payload.extension_id {
        Some(_) => "Extensión asignada exitosamente.",
        None => "Extensión individual eliminada exitosamente.",
    };
    Ok(Json(MessageResponse::new(message)))
}

/// Reconcile personnel from a CSV file (`csvFile` field)
#[utoipa::path(
    post,
    path = "/api/personal/bulk-upload",
    tag = "Personnel",
    request_body(content = String, content_type = "multipart/form-data", description = "csvFile"),
    responses(
        (status = 200, description = "Import finished, see per-row errors", body = ImportReport),
        (status = 400, description = "File missing or not a valid CSV"),
        (status = 413, description = "File larger than 1MB")
    ),
    security(("cookie_auth" = []))
)]
pub async fn bulk_upload(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    CsvUpload(bytes): CsvUpload,
) -> AppResult<Json<ImportReport>> {
    require_directory_manager(&current_user)?;
    tracing::info!(user = %current_user.username, size = bytes.len(), "Personnel bulk upload");

    Ok(Json(state.services.imports().import_personnel(bytes).await?))
}

/// Download the CSV header row for bulk uploads
#[utoipa::path(
    get,
    path = "/api/personal/template",
    tag = "Personnel",
    responses((status = 200, description = "CSV template", content_type = "text/csv", body = String)),
    security(("cookie_auth" = []))
)]
pub async fn download_template(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    require_directory_manager(&current_user)?;
    let disposition = format!("attachment; filename=\"{}\"", PERSONNEL_TEMPLATE_FILENAME);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        state.services.imports().personnel_template(),
    ))
}
