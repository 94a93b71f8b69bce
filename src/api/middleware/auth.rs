//! JWT authentication middleware and the session cookie.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::AppState;
use crate::config::{Config, AUTH_COOKIE_NAME, BEARER_TOKEN_PREFIX};
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
    pub role: UserRole,
}

/// The token travels in the `authToken` cookie; a Bearer header is accepted
/// for API clients.
fn token_from(request: &Request) -> Option<String> {
    let jar = CookieJar::from_headers(request.headers());
    if let Some(cookie) = jar.get(AUTH_COOKIE_NAME) {
        return Some(cookie.value().to_string());
    }

    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string)
}

/// JWT authentication middleware.
///
/// Validates the session token, then injects the CurrentUser into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from(&request).ok_or(AppError::Unauthorized)?;
    let claims = state.services.auth().verify_token(&token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        role: UserRole::from(claims.role.as_str()),
        username: claims.username,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require a role allowed to edit directory data.
pub fn require_directory_manager(user: &CurrentUser) -> Result<(), AppError> {
    if user.role.can_manage_directory() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Session cookie carrying a freshly issued token.
pub fn create_auth_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::minutes(config.jwt_expiration_minutes))
        .build()
}

/// Cookie that makes the browser drop the session.
pub fn clear_auth_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn user(role: UserRole) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "tester".into(),
            role,
        }
    }

    #[test]
    fn test_role_guards() {
        assert!(require_admin(&user(UserRole::Admin)).is_ok());
        assert!(require_admin(&user(UserRole::StaffManager)).is_err());
        assert!(require_directory_manager(&user(UserRole::StaffManager)).is_ok());
        assert!(matches!(
            require_directory_manager(&user(UserRole::User)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_cookie_preferred_over_header() {
        let request = Request::builder()
            .header("Cookie", "authToken=from-cookie")
            .header(AUTHORIZATION, "Bearer from-header")
            .body(Body::empty())
            .unwrap();
        assert_eq!(token_from(&request).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback() {
        let request = Request::builder()
            .header(AUTHORIZATION, "Bearer abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(token_from(&request).as_deref(), Some("abc"));

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(token_from(&request), None);
    }

    #[test]
    fn test_auth_cookie_attributes() {
        let config = Config::new("sqlite::memory:", "a-test-secret-that-is-long-enough-1234").unwrap();
        let cookie = create_auth_cookie("tok".into(), &config);

        assert_eq!(cookie.name(), AUTH_COOKIE_NAME);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(time::Duration::minutes(15)));
    }
}
