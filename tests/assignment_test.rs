//! Extension ownership rules exercised end to end.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

struct Fixture {
    app: TestApp,
    cookie: String,
    department_id: i64,
}

impl Fixture {
    async fn new() -> Self {
        let app = TestApp::spawn().await;
        let cookie = app.admin_cookie().await;
        let (_, department) = app
            .post_json("/api/departments", &cookie, json!({ "name": "Sistemas" }))
            .await;
        let department_id = department["data"]["id"].as_i64().unwrap();
        Self {
            app,
            cookie,
            department_id,
        }
    }

    async fn extension(&self, number: &str, department_id: Option<i64>) -> i64 {
        let (status, body) = self
            .app
            .post_json(
                "/api/extensions",
                &self.cookie,
                json!({ "number": number, "department_id": department_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn position(&self, name: &str, extension_id: Option<i64>) -> (StatusCode, Value) {
        self.app
            .post_json(
                "/api/puestos",
                &self.cookie,
                json!({
                    "name": name,
                    "department_id": self.department_id,
                    "extension_id": extension_id
                }),
            )
            .await
    }

    async fn person(&self, name: &str, position_id: Option<i64>) -> i64 {
        let email = format!("{}@example.com", name.to_lowercase());
        let position = position_id.map(|id| id.to_string()).unwrap_or_default();
        let (status, body) = self
            .app
            .post_multipart(
                "POST",
                "/api/personal",
                &self.cookie,
                &[("nombre", name), ("correo", &email), ("puesto_id", &position)],
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_i64().unwrap()
    }

    async fn assign(&self, person_id: i64, extension_id: Option<i64>) -> (StatusCode, Value) {
        self.app
            .put_json(
                &format!("/api/personal/{person_id}/extension"),
                &self.cookie,
                json!({ "extension_id": extension_id }),
            )
            .await
    }

    /// Effective extension shown on the public page, by person name.
    async fn shown_extension(&self, name: &str) -> Value {
        let (_, list) = self.app.get("/api/public/personal", None).await;
        list.as_array()
            .unwrap()
            .iter()
            .find(|p| p["nombre"] == name)
            .map(|p| p["extension"].clone())
            .unwrap()
    }

    async fn extension_status(&self, number: &str) -> Value {
        let (_, list) = self.app.get("/api/extensions", Some(&self.cookie)).await;
        list.as_array()
            .unwrap()
            .iter()
            .find(|e| e["number"] == number)
            .cloned()
            .unwrap()
    }
}

#[tokio::test]
async fn test_person_inherits_position_extension() {
    let fx = Fixture::new().await;
    let ext = fx.extension("100", Some(fx.department_id)).await;
    let (status, position) = fx.position("Desarrollador", Some(ext)).await;
    assert_eq!(status, StatusCode::CREATED);
    fx.person("Ana", position["data"]["id"].as_i64()).await;

    assert_eq!(fx.shown_extension("Ana").await, "100");

    let status = fx.extension_status("100").await;
    assert_eq!(status["is_occupied"], true);
    assert_eq!(status["occupant_type"], "position");
    assert_eq!(status["occupant"], "Desarrollador");
    assert_eq!(status["department_name"], "Sistemas");
}

#[tokio::test]
async fn test_position_extension_is_exclusive() {
    let fx = Fixture::new().await;
    let ext = fx.extension("100", None).await;
    fx.position("Desarrollador", Some(ext)).await;

    let (status, _) = fx.position("Analista", Some(ext)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    let (_, positions) = fx.app.get("/api/puestos", Some(&fx.cookie)).await;
    assert_eq!(positions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_position_extension_cannot_be_assigned_to_person() {
    let fx = Fixture::new().await;
    let ext = fx.extension("100", None).await;
    fx.position("Desarrollador", Some(ext)).await;
    let person = fx.person("Luis", None).await;

    let (status, body) = fx.assign(person, Some(ext)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    // No personnel link was written
    let status = fx.extension_status("100").await;
    assert_eq!(status["occupant_type"], "position");
    assert_eq!(status["occupant"], "Desarrollador");
    assert_eq!(fx.shown_extension("Luis").await, Value::Null);
}

#[tokio::test]
async fn test_individual_extension_shared_and_overrides_position() {
    let fx = Fixture::new().await;
    let position_ext = fx.extension("100", None).await;
    let shared = fx.extension("205", None).await;
    let (_, position) = fx.position("Desarrollador", Some(position_ext)).await;
    let ana = fx.person("Ana", position["data"]["id"].as_i64()).await;
    let luis = fx.person("Luis", None).await;

    let (status, _) = fx.assign(ana, Some(shared)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = fx.assign(luis, Some(shared)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(fx.shown_extension("Ana").await, "205");
    assert_eq!(fx.shown_extension("Luis").await, "205");
    let status = fx.extension_status("205").await;
    assert_eq!(status["occupant_type"], "personnel");
    assert_eq!(status["occupant"], "Ana, Luis");

    // Individually held numbers cannot move to a position
    let (status, _) = fx.position("Analista", Some(shared)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Clearing the individual number falls back to the position's
    let (status, _) = fx.assign(ana, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fx.shown_extension("Ana").await, "100");
}

#[tokio::test]
async fn test_deleting_extension_releases_holders() {
    let fx = Fixture::new().await;
    let ext = fx.extension("300", None).await;
    let person = fx.person("Marta", None).await;
    fx.assign(person, Some(ext)).await;
    assert_eq!(fx.shown_extension("Marta").await, "300");

    let (status, _) = fx
        .app
        .delete(&format!("/api/extensions/{ext}"), &fx.cookie)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fx.shown_extension("Marta").await, Value::Null);
}

#[tokio::test]
async fn test_position_update_without_extension_unlinks_it() {
    let fx = Fixture::new().await;
    let ext = fx.extension("100", None).await;
    let (_, position) = fx.position("Desarrollador", Some(ext)).await;
    let position_id = position["data"]["id"].as_i64().unwrap();

    let (status, _) = fx
        .app
        .put_json(
            &format!("/api/puestos/{position_id}"),
            &fx.cookie,
            json!({ "name": "Desarrollador Senior", "department_id": fx.department_id }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let status = fx.extension_status("100").await;
    assert_eq!(status["is_occupied"], false);
    assert_eq!(status["occupant"], Value::Null);
}

#[tokio::test]
async fn test_referential_guards() {
    let fx = Fixture::new().await;
    let (_, position) = fx.position("Desarrollador", None).await;
    let position_id = position["data"]["id"].as_i64().unwrap();
    fx.person("Ana", Some(position_id)).await;

    let (status, body) = fx
        .app
        .delete(&format!("/api/puestos/{position_id}"), &fx.cookie)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "No se puede eliminar el puesto porque tiene personal asignado."
    );

    let (status, _) = fx
        .app
        .delete(&format!("/api/departments/{}", fx.department_id), &fx.cookie)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = fx.position("Desarrollador", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = fx.assign(9999, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_extension_number_rejected() {
    let fx = Fixture::new().await;
    fx.extension("100", None).await;

    let (status, body) = fx
        .app
        .post_json("/api/extensions", &fx.cookie, json!({ "number": "100" }))
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["message"], "La extensión ya existe.");
}
