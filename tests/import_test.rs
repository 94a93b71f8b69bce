//! CSV bulk import through the upload endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::TestApp;
use staff_directory::infra::DirectoryEvent;

const PERSONNEL_CSV: &str = "\
nombre,correo,puesto,departamento,extension,extension_individual,descripcion,fotoUrl,en_carrusel,fecha_nacimiento
Ana López,ana@example.com,Desarrolladora,Sistemas,100,,Backend,,si,1990-05-17
Luis,luis,Analista,Sistemas,,,,,,
Marta Ruiz,marta@example.com,Contadora,Finanzas,,205,,,no,17/08/1985
";

async fn public_list(app: &TestApp) -> Vec<Value> {
    let (_, list) = app.get("/api/public/personal", None).await;
    list.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_personnel_import_reports_per_row() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;
    let mut events = app.state.events.subscribe();

    let (status, report) = app
        .upload_csv("/api/personal/bulk-upload", &cookie, PERSONNEL_CSV)
        .await;

    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["processed"], 2);
    assert_eq!(report["failed"], 1);
    assert_eq!(
        report["message"],
        "Carga masiva completada. 2 procesados correctamente, 1 con errores."
    );
    assert_eq!(report["errors"][0], "Error en fila 3 (Luis): Correo inválido: luis");
    assert!(report.get("skipped").is_none());
    assert_eq!(events.try_recv().unwrap(), DirectoryEvent::StaffUpdate);

    let people = public_list(&app).await;
    assert_eq!(people.len(), 2);
    assert_eq!(people[0]["nombre"], "Ana López");
    assert_eq!(people[0]["puesto"], "Desarrolladora");
    assert_eq!(people[0]["departamento"], "Sistemas");
    assert_eq!(people[0]["extension"], "100");
    assert_eq!(people[0]["en_carrusel"], true);
    assert_eq!(people[1]["extension"], "205");
    assert_eq!(people[1]["fecha_nacimiento"], "1985-08-17");

    let (_, departments) = app.get("/api/departments", Some(&cookie)).await;
    assert_eq!(departments.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_reimport_updates_by_name() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;
    app.upload_csv("/api/personal/bulk-upload", &cookie, PERSONNEL_CSV)
        .await;

    let update = "\
nombre,correo,puesto,departamento,descripcion
Ana López,ana.lopez@example.com,Líder Técnica,Sistemas,
";
    let (status, report) = app
        .upload_csv("/api/personal/bulk-upload", &cookie, update)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["processed"], 1);
    let people = public_list(&app).await;
    assert_eq!(people.len(), 2);
    assert_eq!(people[0]["correo"], "ana.lopez@example.com");
    assert_eq!(people[0]["puesto"], "Líder Técnica");
    // Blank optional cells leave stored values alone
    assert_eq!(people[0]["descripcion"], "Backend");
}

async fn admin_list(app: &TestApp, cookie: &str, uri: &str) -> Vec<Value> {
    let (status, list) = app.get(uri, Some(cookie)).await;
    assert_eq!(status, StatusCode::OK, "{list}");
    list.as_array().unwrap().clone()
}

fn find<'a>(rows: &'a [Value], key: &str, value: &str) -> &'a Value {
    rows.iter().find(|row| row[key] == value).unwrap()
}

#[tokio::test]
async fn test_same_minimal_csv_twice_keeps_one_of_each() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;
    let csv = "nombre,correo,puesto,departamento\nAna,ana@x.com,Tester,QA\n";

    for _ in 0..2 {
        let (status, report) = app
            .upload_csv("/api/personal/bulk-upload", &cookie, csv)
            .await;
        assert_eq!(status, StatusCode::OK, "{report}");
        assert_eq!(report["processed"], 1);
        assert_eq!(report["failed"], 0);
    }

    let people = public_list(&app).await;
    assert_eq!(people.len(), 1);
    assert_eq!(people[0]["nombre"], "Ana");

    let positions = admin_list(&app, &cookie, "/api/puestos").await;
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["name"], "Tester");
    assert_eq!(positions[0]["department_name"], "QA");
    assert_eq!(positions[0]["personnel_count"], 1);

    let departments = admin_list(&app, &cookie, "/api/departments").await;
    assert_eq!(departments.len(), 1);
}

#[tokio::test]
async fn test_same_csv_twice_keeps_links_stable() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    for _ in 0..2 {
        let (status, report) = app
            .upload_csv("/api/personal/bulk-upload", &cookie, PERSONNEL_CSV)
            .await;
        assert_eq!(status, StatusCode::OK, "{report}");
        assert_eq!(report["processed"], 2);
        assert_eq!(report["failed"], 1);
    }

    let people = public_list(&app).await;
    assert_eq!(people.len(), 2);
    assert_eq!(find(&people, "nombre", "Ana López")["extension"], "100");
    assert_eq!(find(&people, "nombre", "Marta Ruiz")["extension"], "205");

    let positions = admin_list(&app, &cookie, "/api/puestos").await;
    assert_eq!(positions.len(), 2);
    let developer = find(&positions, "name", "Desarrolladora");
    assert_eq!(developer["extension_number"], "100");
    assert_eq!(developer["personnel_count"], 1);

    assert_eq!(admin_list(&app, &cookie, "/api/departments").await.len(), 2);

    let extensions = admin_list(&app, &cookie, "/api/extensions").await;
    assert_eq!(extensions.len(), 2);
    let position_ext = find(&extensions, "number", "100");
    assert_eq!(position_ext["occupant_type"], "position");
    assert_eq!(position_ext["occupant"], "Desarrolladora");
    let individual = find(&extensions, "number", "205");
    assert_eq!(individual["occupant_type"], "personnel");
    assert_eq!(individual["occupant"], "Marta Ruiz");

    // A new individual number replaces the old link
    let moved = "\
nombre,correo,puesto,departamento,extension_individual
Marta Ruiz,marta@example.com,Contadora,Finanzas,206
";
    let (status, report) = app
        .upload_csv("/api/personal/bulk-upload", &cookie, moved)
        .await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["processed"], 1);

    let extensions = admin_list(&app, &cookie, "/api/extensions").await;
    assert_eq!(extensions.len(), 3);
    assert_eq!(find(&extensions, "number", "205")["is_occupied"], false);
    assert_eq!(find(&extensions, "number", "206")["occupant"], "Marta Ruiz");
    assert_eq!(
        find(&public_list(&app).await, "nombre", "Marta Ruiz")["extension"],
        "206"
    );
}

#[tokio::test]
async fn test_failed_row_is_rolled_back_alone() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    // Row 3 tries to give a position an extension a person already holds
    let csv = "\
nombre,correo,puesto,departamento,extension,extension_individual
Ana,ana@example.com,Recepción,General,,300
Beto,beto@example.com,Conmutador,General,300,
Caro,caro@example.com,Recepción,General,,
";
    let (status, report) = app
        .upload_csv("/api/personal/bulk-upload", &cookie, csv)
        .await;

    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["processed"], 2);
    assert_eq!(report["failed"], 1);
    assert!(report["errors"][0]
        .as_str()
        .unwrap()
        .starts_with("Error en fila 3 (Beto)"));

    let names: Vec<String> = public_list(&app)
        .await
        .iter()
        .map(|p| p["nombre"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Ana", "Caro"]);

    // The failed row's position was rolled back with it
    let (_, positions) = app.get("/api/puestos", Some(&cookie)).await;
    assert_eq!(positions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_email_owned_by_someone_else_fails_row() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let csv = "\
nombre,correo,puesto,departamento
Ana,compartido@example.com,Recepción,General
Beto,compartido@example.com,Recepción,General
";
    let (_, report) = app
        .upload_csv("/api/personal/bulk-upload", &cookie, csv)
        .await;

    assert_eq!(report["processed"], 1);
    assert_eq!(
        report["errors"][0],
        "Error en fila 3 (Beto): El correo compartido@example.com ya pertenece a otra persona."
    );
}

#[tokio::test]
async fn test_formula_cells_are_neutralised() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let csv = "\
nombre,correo,puesto,departamento
=SUM(A1:A9),formula@example.com,Analista,General
";
    let (_, report) = app
        .upload_csv("/api/personal/bulk-upload", &cookie, csv)
        .await;

    assert_eq!(report["processed"], 1);
    assert_eq!(public_list(&app).await[0]["nombre"], "'=SUM(A1:A9)");
}

#[tokio::test]
async fn test_structural_problems_reject_upload() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let (status, body) = app
        .upload_csv(
            "/api/personal/bulk-upload",
            &cookie,
            "nombre,correo\nAna,ana@example.com\n",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Faltan columnas requeridas en el CSV: puesto, departamento."
    );

    let (status, _) = app
        .upload_csv(
            "/api/personal/bulk-upload",
            &cookie,
            "nombre,correo,puesto,departamento\n",
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post_multipart(
            "POST",
            "/api/personal/bulk-upload",
            &cookie,
            &[("otro", "x")],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "No se ha subido ningún archivo CSV.");

    assert!(public_list(&app).await.is_empty());
}

#[tokio::test]
async fn test_extension_import_skips_known_numbers() {
    let app = TestApp::spawn().await;
    let cookie = app.admin_cookie().await;

    let first = "number,departamento\n100,Sistemas\n101,\n";
    let (status, report) = app
        .upload_csv("/api/extensions/bulk-upload", &cookie, first)
        .await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["processed"], 2);
    assert_eq!(report["skipped"], 0);

    let second = "number,departamento\n100,Otro\n102,Sistemas\n,Sistemas\n";
    let (_, report) = app
        .upload_csv("/api/extensions/bulk-upload", &cookie, second)
        .await;
    assert_eq!(report["processed"], 1);
    assert_eq!(report["skipped"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(
        report["message"],
        "Carga masiva completada. 1 procesados correctamente, 1 con errores, 1 omitidos."
    );

    let (_, extensions) = app.get("/api/extensions", Some(&cookie)).await;
    let extensions = extensions.as_array().unwrap();
    assert_eq!(extensions.len(), 3);
    let hundred = extensions.iter().find(|e| e["number"] == "100").unwrap();
    assert_eq!(hundred["department_name"], "Sistemas");
}
