//! Application route configuration.

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    announcement_routes, auth_handler, auth_routes, department_routes, event_handler,
    extension_routes, personnel_routes, position_routes, public_routes, session_routes,
    theme_handler, user_routes,
};
use super::middleware::{auth_middleware, rate_limit_login_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{Config, UPLOADS_URL_PREFIX};

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes(&state))
        // Uploaded photos
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(&state.config.uploads_dir))
        // Global middleware
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    let require_session = || middleware::from_fn_with_state(state.clone(), auth_middleware);

    // Everything below needs a valid session cookie
    let protected = Router::new()
        .merge(session_routes())
        .nest("/personal", personnel_routes())
        .nest("/departments", department_routes())
        .nest("/puestos", position_routes())
        .nest("/extensions", extension_routes())
        .nest("/users", user_routes())
        .nest("/important-info", announcement_routes())
        .route_layer(require_session());

    Router::new()
        // Login has its own, stricter limit
        .merge(auth_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_login_middleware,
        )))
        .route("/logout", post(auth_handler::logout))
        .nest("/public", public_routes())
        .route(
            "/theme",
            get(theme_handler::get_theme)
                .merge(post(theme_handler::set_theme).route_layer(require_session())),
        )
        .route("/settings", get(theme_handler::get_theme))
        .route("/events", get(event_handler::events))
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
}

/// Credentialed CORS for the configured frontend origin.
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match HeaderValue::from_str(&config.cors_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            tracing::warn!(origin = %config.cors_origin, error = %e, "Invalid CORS origin, cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Root endpoint
async fn root() -> &'static str {
    "Staff Directory API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = ServiceStatus::from_result(state.database.ping().await);
    let redis = ServiceStatus::from_result(state.limiter.ping().await);

    let all_healthy = database.is_healthy() && redis.is_healthy();
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    (status_code, Json(response))
}
