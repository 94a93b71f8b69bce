//! Department handlers.

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
use crate::domain::Department;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "El nombre del departamento es requerido."))]
    #[schema(example = "Recursos Humanos")]
    pub name: String,
}

/// Create department routes (mounted under `/api/departments`, behind auth)
pub fn department_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route("/:id", put(update_department).delete(delete_department))
}

#[utoipa::path(
    get,
    path = "/api/departments",
    tag = "Departments",
    responses((status = 200, description = "Departments ordered by name", body = Vec<Department>)),
    security(("cookie_auth" = []))
)]
pub async fn list_departments(State(state): State<AppState>) -> AppResult<Json<Vec<Department>>> {
    Ok(Json(state.services.departments().list().await?))
}

#[utoipa::path(
    post,
    path = "/api/departments",
    tag = "Departments",
    request_body = DepartmentRequest,
    responses(
        (status = 201, description = "Department created"),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Department already exists")
    ),
    security(("cookie_auth" = []))
)]
pub async fn create_department(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<DepartmentRequest>,
) -> AppResult<Created<Department>> {
    require_directory_manager(&current_user)?;
    let department = state.services.departments().create(payload.name).await?;

    Ok(Created::new("Departamento agregado exitosamente.", department))
}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    request_body = DepartmentRequest,
    responses(
        (status = 200, description = "Department renamed"),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Name already taken")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_department(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<DepartmentRequest>,
) -> AppResult<Json<ApiResponse<Department>>> {
    require_directory_manager(&current_user)?;
    let department = state.services.departments().rename(id, payload.name).await?;

    Ok(Json(ApiResponse::new(
        "Departamento actualizado exitosamente.",
        department,
    )))
}

/// Delete a department with no positions
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    tag = "Departments",
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = MessageResponse),
        (status = 404, description = "Department not found"),
        (status = 409, description = "Department still has positions")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_department(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_directory_manager(&current_user)?;
    state.services.departments().delete(id).await?;

    Ok(Json(MessageResponse::new("Departamento eliminado exitosamente.")))
}
