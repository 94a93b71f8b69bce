//! Shared fixtures: an in-memory SQLite directory behind the real router.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database as SeaDatabase};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use staff_directory::api::{create_router, AppState};
use staff_directory::config::Config;
use staff_directory::errors::AppResult;
use staff_directory::infra::{Database, Migrator, RateLimiter};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Admin#2024";
pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-chars";

/// Limiter that never blocks, so tests do not need Redis.
pub struct AllowAll;

#[async_trait]
impl RateLimiter for AllowAll {
    async fn check_rate_limit(
        &self,
        _identifier: &str,
        _max_requests: u64,
        _window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        Ok((1, true))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    /// Keeps the uploads directory alive for the test's duration
    pub uploads: TempDir,
}

impl TestApp {
    /// Fresh database with the schema applied and a bootstrap admin.
    pub async fn spawn() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        // One connection so every query sees the same in-memory database
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let connection = SeaDatabase::connect(options).await.unwrap();
        Migrator::up(&connection, None).await.unwrap();

        let uploads = tempfile::tempdir().unwrap();
        let mut config = Config::new("sqlite::memory:", TEST_SECRET).unwrap();
        config.uploads_dir = uploads.path().to_path_buf();

        let state = AppState::from_config(
            Arc::new(Database::from_connection(connection)),
            Arc::new(AllowAll),
            config,
        );
        state
            .services
            .auth()
            .ensure_bootstrap_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .unwrap();

        Self {
            router: create_router(state.clone()),
            state,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        (status, body)
    }

    /// Log in and return the `authToken=...` cookie pair.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let request = json_request(
            "POST",
            "/api/login",
            None,
            serde_json::json!({ "username": username, "password": password }),
        );
        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string();
        set_cookie.split(';').next().unwrap().to_string()
    }

    pub async fn admin_cookie(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, cookie: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("POST", uri, Some(cookie), body)).await
    }

    pub async fn put_json(&self, uri: &str, cookie: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request("PUT", uri, Some(cookie), body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a multipart form; `file` is (field, file name, content type, bytes).
    pub async fn post_multipart(
        &self,
        method: &str,
        uri: &str,
        cookie: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &str, &[u8])>,
    ) -> (StatusCode, Value) {
        let (content_type, body) = multipart_body(fields, file);
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn upload_csv(&self, uri: &str, cookie: &str, csv: &str) -> (StatusCode, Value) {
        self.post_multipart(
            "POST",
            uri,
            cookie,
            &[],
            Some(("csvFile", "datos.csv", "text/csv", csv.as_bytes())),
        )
        .await
    }
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

const BOUNDARY: &str = "staff-directory-test-boundary";

fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
