//! Position ("puesto") handlers.

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
use crate::domain::{Position, PositionView};
use crate::errors::AppResult;
use crate::services::PositionInput;
use crate::types::{ApiResponse, Created, MessageResponse};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PositionRequest {
    #[validate(length(min = 1, max = 100, message = "El nombre del puesto es requerido."))]
    #[schema(example = "Contador")]
    pub name: String,
    pub department_id: i32,
    /// Extension owned by the position; omitted or `null` leaves it unlinked
    pub extension_id: Option<i32>,
}

impl From<PositionRequest> for PositionInput {
    fn from(request: PositionRequest) -> Self {
        Self {
            name: request.name,
            department_id: request.department_id,
            extension_id: request.extension_id,
        }
    }
}

/// Create position routes (mounted under `/api/puestos`, behind auth)
pub fn position_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_positions).post(create_position))
        .route("/:id", put(update_position).delete(delete_position))
}

#[utoipa::path(
    get,
    path = "/api/puestos",
    tag = "Positions",
    responses((status = 200, description = "Positions with department and extension", body = Vec<PositionView>)),
    security(("cookie_auth" = []))
)]
pub async fn list_positions(State(state): State<AppState>) -> AppResult<Json<Vec<PositionView>>> {
    Ok(Json(state.services.positions().list().await?))
}

#[utoipa::path(
    post,
    path = "/api/puestos",
    tag = "Positions",
    request_body = PositionRequest,
    responses(
        (status = 201, description = "Position created"),
        (status = 400, description = "Unknown department or extension"),
        (status = 409, description = "Duplicate position or extension already taken")
    ),
    security(("cookie_auth" = []))
)]
pub async fn create_position(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<PositionRequest>,
) -> AppResult<Created<Position>> {
    require_directory_manager(&current_user)?;
    let position = state.services.positions().create(payload.into()).await?;

    Ok(Created::new("Puesto agregado exitosamente.", position))
}

/// Update a position; a missing `extension_id` removes its extension
#[utoipa::path(
    put,
    path = "/api/puestos/{id}",
    tag = "Positions",
    params(("id" = i32, Path, description = "Position ID")),
    request_body = PositionRequest,
    responses(
        (status = 200, description = "Position updated"),
        (status = 404, description = "Position not found"),
        (status = 409, description = "Duplicate position or extension already taken")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_position(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<PositionRequest>,
) -> AppResult<Json<ApiResponse<Position>>> {
    require_directory_manager(&current_user)?;
    let position = state.services.positions().update(id, payload.into()).await?;

    Ok(Json(ApiResponse::new("Puesto actualizado exitosamente.", position)))
}

#[utoipa::path(
    delete,
    path = "/api/puestos/{id}",
    tag = "Positions",
    params(("id" = i32, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position deleted", body = MessageResponse),
        (status = 404, description = "Position not found"),
        (status = 409, description = "Position still has personnel")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_position(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_directory_manager(&current_user)?;
    state.services.positions().delete(id).await?;

    Ok(Json(MessageResponse::new("Puesto eliminado exitosamente.")))
}
