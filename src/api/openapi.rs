//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    announcement_handler, auth_handler, department_handler, event_handler, extension_handler,
    personnel_handler, position_handler, public_handler, theme_handler, user_handler,
};
use crate::config::AUTH_COOKIE_NAME;
use crate::domain::{
    Announcement, BirthdayEntry, Department, DirectoryEntry, Extension, ExtensionStatus,
    OccupantType, Position, PositionView, Theme, UserResponse, UserRole,
};
use crate::services::ImportReport;
use crate::types::{CountResponse, MessageResponse};

/// OpenAPI documentation for the staff directory
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Staff Directory API",
        version = "0.1.0",
        description = "Internal staff directory: personnel, positions, departments, phone extensions and announcements"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::login,
        auth_handler::logout,
        auth_handler::refresh_token,
        auth_handler::login_check,
        // Personnel
        personnel_handler::list_personnel,
        personnel_handler::create_personnel,
        personnel_handler::update_personnel,
        personnel_handler::delete_personnel,
        personnel_handler::assign_extension,
        personnel_handler::bulk_upload,
        personnel_handler::download_template,
        // Organisation
        department_handler::list_departments,
        department_handler::create_department,
        department_handler::update_department,
        department_handler::delete_department,
        position_handler::list_positions,
        position_handler::create_position,
        position_handler::update_position,
        position_handler::delete_position,
        extension_handler::list_extensions,
        extension_handler::create_extension,
        extension_handler::update_extension,
        extension_handler::delete_extension,
        extension_handler::bulk_upload,
        // Users
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Announcements
        announcement_handler::list_announcements,
        announcement_handler::create_announcement,
        announcement_handler::update_announcement,
        announcement_handler::delete_announcement,
        // Theme and events
        theme_handler::get_theme,
        theme_handler::set_theme,
        event_handler::events,
        // Public page
        public_handler::public_personnel,
        public_handler::public_count,
        public_handler::public_search,
        public_handler::public_carousel,
        public_handler::public_birthdays,
        public_handler::public_announcements,
    ),
    components(
        schemas(
            // Domain types
            Announcement,
            BirthdayEntry,
            Department,
            DirectoryEntry,
            Extension,
            ExtensionStatus,
            OccupantType,
            Position,
            PositionView,
            Theme,
            UserRole,
            UserResponse,
            // Request and response types
            auth_handler::LoginRequest,
            auth_handler::LoginResponse,
            auth_handler::SessionUser,
            auth_handler::LoginCheckResponse,
            personnel_handler::AssignExtensionRequest,
            department_handler::DepartmentRequest,
            position_handler::PositionRequest,
            extension_handler::ExtensionRequest,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            announcement_handler::AnnouncementRequest,
            theme_handler::ThemeRequest,
            theme_handler::ThemeResponse,
            ImportReport,
            MessageResponse,
            CountResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Session cookie login"),
        (name = "Personnel", description = "Staff records, photos and bulk import"),
        (name = "Departments", description = "Department registry"),
        (name = "Positions", description = "Positions within departments"),
        (name = "Extensions", description = "Phone extension registry"),
        (name = "Users", description = "Account administration"),
        (name = "Important info", description = "Announcements board"),
        (name = "Theme", description = "Site appearance"),
        (name = "Events", description = "Server-sent change notifications"),
        (name = "Public", description = "Unauthenticated directory page")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    AUTH_COOKIE_NAME,
                    "JWT set by POST /api/login",
                ))),
            );
        }
    }
}
