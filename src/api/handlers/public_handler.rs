//! Unauthenticated read-only mirrors for the public directory page.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{Datelike, Utc};

use crate::api::AppState;
use crate::domain::{Announcement, BirthdayEntry, DirectoryEntry};
use crate::errors::AppResult;
use crate::types::{CountResponse, DirectoryQuery, SearchQuery};

/// Create public routes (mounted under `/api/public`)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/personal", get(public_personnel))
        .route("/personal/count", get(public_count))
        .route("/personal/search", get(public_search))
        .route("/personal/carousel", get(public_carousel))
        .route("/personal/cumpleaneros", get(public_birthdays))
        .route("/important-info", get(public_announcements))
}

/// One page of the directory, optionally filtered by `q`
#[utoipa::path(
    get,
    path = "/api/public/personal",
    tag = "Public",
    params(DirectoryQuery),
    responses((status = 200, description = "Directory page ordered by ID", body = Vec<DirectoryEntry>))
)]
pub async fn public_personnel(
    State(state): State<AppState>,
    Query(query): Query<DirectoryQuery>,
) -> AppResult<Json<Vec<DirectoryEntry>>> {
    Ok(Json(state.services.personnel().page(query).await?))
}

/// Number of people, optionally matching `q`
#[utoipa::path(
    get,
    path = "/api/public/personal/count",
    tag = "Public",
    params(SearchQuery),
    responses((status = 200, description = "Total matching entries", body = CountResponse))
)]
pub async fn public_count(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<CountResponse>> {
    let total = state.services.personnel().count(query.q).await?;

    Ok(Json(CountResponse { total }))
}

/// Accent- and case-insensitive search
#[utoipa::path(
    get,
    path = "/api/public/personal/search",
    tag = "Public",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matches ordered by name", body = Vec<DirectoryEntry>),
        (status = 400, description = "Missing search term")
    )
)]
pub async fn public_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<DirectoryEntry>>> {
    let term = query.q.unwrap_or_default();

    Ok(Json(state.services.personnel().search(term).await?))
}

#[utoipa::path(
    get,
    path = "/api/public/personal/carousel",
    tag = "Public",
    responses((status = 200, description = "People featured in the carousel", body = Vec<DirectoryEntry>))
)]
pub async fn public_carousel(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DirectoryEntry>>> {
    Ok(Json(state.services.personnel().carousel().await?))
}

/// Birthdays in the current month, by day
#[utoipa::path(
    get,
    path = "/api/public/personal/cumpleaneros",
    tag = "Public",
    responses((status = 200, description = "This month's birthdays", body = Vec<BirthdayEntry>))
)]
pub async fn public_birthdays(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BirthdayEntry>>> {
    let month = Utc::now().month();

    Ok(Json(state.services.personnel().birthdays(month).await?))
}

#[utoipa::path(
    get,
    path = "/api/public/important-info",
    tag = "Public",
    responses((status = 200, description = "Announcements, newest first", body = Vec<Announcement>))
)]
pub async fn public_announcements(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Announcement>>> {
    Ok(Json(state.services.announcements().list().await?))
}
