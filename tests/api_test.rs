//! Integration tests for API endpoints.
//!
//! Each test runs the real router against a fresh in-memory SQLite
//! database; Redis is replaced by an allow-all limiter.

mod common;

use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use serde_json::json;

use common::{TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};
use staff_directory::infra::DirectoryEvent;

// =============================================================================
// Health and docs
// =============================================================================

#[tokio::test]
async fn test_health_reports_services() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["redis"]["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/login"].is_object());
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::spawn().await;

    let request = common::json_request(
        "POST",
        "/api/login",
        None,
        json!({ "username": ADMIN_USERNAME, "password": "Wrong#2024" }),
    );
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_requires_fields() {
    let app = TestApp::spawn().await;

    let request = common::json_request(
        "POST",
        "/api/login",
        None,
        json!({ "username": "", "password": "" }),
    );
    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_cookie_round_trip() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get("/api/login-check", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = app.admin_cookie().await;
    let (status, body) = app.get("/api/login-check", Some(&cookie)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["user"]["username"], ADMIN_USERNAME);
    assert_eq!(body["user"]["role"], "admin");

    let (status, body) = app.post_json("/api/refresh-token", &cookie, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token refrescado exitosamente.");
}

#[tokio::test]
async fn test_logout_is_public() {
    let app = TestApp::spawn().await;

    let request = common::json_request("POST", "/api/logout", None, json!({}));
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout exitoso.");
}

#[tokio::test]
async fn test_garbage_cookie_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .get("/api/personal", Some("authToken=not-a-jwt"))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Roles and users
// =============================================================================

#[tokio::test]
async fn test_staff_manager_permissions() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;

    let (status, body) = app
        .post_json(
            "/api/users",
            &admin,
            json!({ "username": "recepcion", "password": "Recepcion#1", "role": "staff_manager" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "staff_manager");

    let manager = app.login("recepcion", "Recepcion#1").await;

    let (status, _) = app
        .post_json("/api/departments", &manager, json!({ "name": "Compras" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.get("/api/users", Some(&manager)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post_json("/api/theme", &manager, json!({ "theme": "dark" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_plain_user_is_read_only() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;

    app.post_json(
        "/api/users",
        &admin,
        json!({ "username": "lector", "password": "Lector#2024", "role": "user" }),
    )
    .await;
    let reader = app.login("lector", "Lector#2024").await;

    let (status, _) = app.get("/api/departments", Some(&reader)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post_json("/api/departments", &reader, json!({ "name": "Legal" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_admin_rules() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;

    let (status, body) = app
        .post_json(
            "/api/users",
            &admin,
            json!({ "username": "debil", "password": "password", "role": "user" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _) = app
        .post_json(
            "/api/users",
            &admin,
            json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD, "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .post_json(
            "/api/users",
            &admin,
            json!({ "username": "nuevo", "password": "Nuevo#2024", "role": "root" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, users) = app.get("/api/users", Some(&admin)).await;
    let own_id = users[0]["id"].as_i64().unwrap();
    let (status, body) = app.delete(&format!("/api/users/{own_id}"), &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "No puedes eliminar tu propia cuenta de administrador."
    );
}

// =============================================================================
// Theme and events
// =============================================================================

#[tokio::test]
async fn test_theme_change_is_persisted_and_broadcast() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;
    let mut events = app.state.events.subscribe();

    let (status, body) = app.get("/api/theme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme"], "default");

    let request = common::json_request("POST", "/api/theme", None, json!({ "theme": "rainy" }));
    let (status, _) = app.send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post_json("/api/theme", &admin, json!({ "theme": "rainy" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tema cambiado a rainy");

    let (_, body) = app.get("/api/settings", None).await;
    assert_eq!(body["theme"], "rainy");

    let event = events.try_recv().unwrap();
    assert_eq!(event, DirectoryEvent::ThemeChange("rainy".parse().unwrap()));
}

#[tokio::test]
async fn test_unknown_theme_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;

    let (status, body) = app
        .post_json("/api/theme", &admin, json!({ "theme": "neon" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Tema inválido.");
}

#[tokio::test]
async fn test_staff_changes_publish_event() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;
    let mut events = app.state.events.subscribe();

    app.post_json("/api/departments", &admin, json!({ "name": "Sistemas" }))
        .await;

    assert_eq!(events.try_recv().unwrap(), DirectoryEvent::StaffUpdate);
}

// =============================================================================
// Personnel and the public page
// =============================================================================

async fn seed_position(app: &TestApp, cookie: &str) -> i64 {
    let (_, department) = app
        .post_json("/api/departments", cookie, json!({ "name": "Sistemas" }))
        .await;
    let (status, position) = app
        .post_json(
            "/api/puestos",
            cookie,
            json!({ "name": "Desarrollador", "department_id": department["data"]["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    position["data"]["id"].as_i64().unwrap()
}

async fn create_person(app: &TestApp, cookie: &str, fields: &[(&str, &str)]) -> i64 {
    let (status, body) = app
        .post_multipart("POST", "/api/personal", cookie, fields, None)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "Miembro del personal creado exitosamente.");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_personnel_crud_and_public_listing() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;
    let position_id = seed_position(&app, &admin).await.to_string();

    let id = create_person(
        &app,
        &admin,
        &[
            ("nombre", "José Hernández"),
            ("correo", "jose@example.com"),
            ("puesto_id", &position_id),
            ("en_carrusel", "true"),
        ],
    )
    .await;
    create_person(
        &app,
        &admin,
        &[("nombre", "Ana López"), ("correo", "ana@example.com")],
    )
    .await;

    let (status, list) = app.get("/api/public/personal", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
    assert_eq!(list[0]["nombre"], "José Hernández");
    assert_eq!(list[0]["puesto"], "Desarrollador");
    assert_eq!(list[0]["departamento"], "Sistemas");

    let (_, count) = app.get("/api/public/personal/count", None).await;
    assert_eq!(count["total"], 2);

    let (_, carousel) = app.get("/api/public/personal/carousel", None).await;
    assert_eq!(carousel.as_array().unwrap().len(), 1);

    let (status, body) = app
        .post_multipart(
            "PUT",
            &format!("/api/personal/{id}"),
            &admin,
            &[("descripcion", "Backend"), ("en_carrusel", "false")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Miembro del personal actualizado exitosamente.");

    let (_, carousel) = app.get("/api/public/personal/carousel", None).await;
    assert!(carousel.as_array().unwrap().is_empty());

    let (status, body) = app.delete(&format!("/api/personal/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Miembro del personal eliminado exitosamente.");

    let (status, _) = app.delete(&format!("/api/personal/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_personnel_validation() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;

    let (status, _) = app
        .post_multipart("POST", "/api/personal", &admin, &[("nombre", "Sin correo")], None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post_multipart(
            "POST",
            "/api/personal",
            &admin,
            &[("nombre", "Mal correo"), ("correo", "no-es-correo")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create_person(
        &app,
        &admin,
        &[("nombre", "Ana"), ("correo", "ana@example.com")],
    )
    .await;
    let (status, body) = app
        .post_multipart(
            "POST",
            "/api/personal",
            &admin,
            &[("nombre", "Otra Ana"), ("correo", "ana@example.com")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "El correo electrónico ya está registrado.");
}

#[tokio::test]
async fn test_search_ignores_case_and_accents() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;
    create_person(
        &app,
        &admin,
        &[("nombre", "José Hernández"), ("correo", "jh@example.com")],
    )
    .await;
    create_person(
        &app,
        &admin,
        &[("nombre", "María Pérez"), ("correo", "mp@example.com")],
    )
    .await;

    let (status, plain) = app.get("/api/public/personal/search?q=jose", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, accented) = app
        .get("/api/public/personal/search?q=JOS%C3%89", None)
        .await;

    assert_eq!(plain, accented);
    assert_eq!(plain.as_array().unwrap().len(), 1);
    assert_eq!(plain[0]["nombre"], "José Hernández");

    let (_, count) = app.get("/api/public/personal/count?q=perez", None).await;
    assert_eq!(count["total"], 1);

    let (status, body) = app.get("/api/public/personal/search", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "El término de búsqueda (q) es requerido."
    );
}

#[tokio::test]
async fn test_public_pagination() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;
    for i in 1..=5 {
        create_person(
            &app,
            &admin,
            &[
                ("nombre", &format!("Persona {i}")),
                ("correo", &format!("p{i}@example.com")),
            ],
        )
        .await;
    }

    let (_, page) = app.get("/api/public/personal?page=2&limit=2", None).await;
    let names: Vec<&str> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["nombre"].as_str().unwrap())
        .collect();

    assert_eq!(names, vec!["Persona 3", "Persona 4"]);
}

#[tokio::test]
async fn test_birthdays_this_month() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;
    let month = Utc::now().month();
    let other_month = month % 12 + 1;

    create_person(
        &app,
        &admin,
        &[
            ("nombre", "Tarde"),
            ("correo", "tarde@example.com"),
            ("fecha_nacimiento", &format!("1990-{month:02}-20")),
        ],
    )
    .await;
    create_person(
        &app,
        &admin,
        &[
            ("nombre", "Temprano"),
            ("correo", "temprano@example.com"),
            ("fecha_nacimiento", &format!("1985-{month:02}-03")),
        ],
    )
    .await;
    create_person(
        &app,
        &admin,
        &[
            ("nombre", "Otro mes"),
            ("correo", "otro@example.com"),
            ("fecha_nacimiento", &format!("1985-{other_month:02}-03")),
        ],
    )
    .await;

    let (status, body) = app.get("/api/public/personal/cumpleaneros", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Temprano", "Tarde"]);
}

#[tokio::test]
async fn test_photo_upload_and_replacement() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;

    let (status, body) = app
        .post_multipart(
            "POST",
            "/api/personal",
            &admin,
            &[("nombre", "Con Foto"), ("correo", "foto@example.com")],
            Some(("photo", "yo.png", "image/png", b"\x89PNG fake image")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["data"]["id"].as_i64().unwrap();
    let first_url = body["data"]["photo_url"].as_str().unwrap().to_string();
    assert!(first_url.starts_with("/uploads/"));

    let (status, _) = app.get(&first_url, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post_multipart(
            "PUT",
            &format!("/api/personal/{id}"),
            &admin,
            &[],
            Some(("photo", "nueva.jpg", "image/jpeg", b"fake jpeg")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(body["data"]["photo_url"], first_url.as_str());

    let old_file = first_url.rsplit('/').next().unwrap();
    assert!(!app.uploads.path().join(old_file).exists());

    let (status, _) = app
        .post_multipart(
            "POST",
            "/api/personal",
            &admin,
            &[("nombre", "Script"), ("correo", "script@example.com")],
            Some(("photo", "run.exe", "application/octet-stream", b"MZ")),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Announcements
// =============================================================================

#[tokio::test]
async fn test_announcements_board() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;
    let mut events = app.state.events.subscribe();

    let (status, body) = app
        .post_json(
            "/api/important-info",
            &admin,
            json!({ "title": "Simulacro", "content": "Viernes 10:00", "extension": "305" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Información importante agregada exitosamente.");
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(events.try_recv().unwrap(), DirectoryEvent::ImportantInfoUpdate);

    let (_, public) = app.get("/api/public/important-info", None).await;
    assert_eq!(public[0]["title"], "Simulacro");

    let (status, _) = app
        .post_json("/api/important-info", &admin, json!({ "title": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .delete(&format!("/api/important-info/{id}"), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, public) = app.get("/api/public/important-info", None).await;
    assert!(public.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_personnel_template_download() {
    let app = TestApp::spawn().await;
    let admin = app.admin_cookie().await;

    let (status, body) = app.get("/api/personal/template", Some(&admin)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_str()
        .unwrap()
        .starts_with("nombre,correo,puesto,departamento"));
}
