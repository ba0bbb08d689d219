//! API integration tests.
//!
//! These tests drive the router end to end against a mock database and an
//! in-memory blob store.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use awards_api::{AppState, auth_middleware, router as api_router};
use awards_common::config::{
    AdminConfig, Config, DatabaseConfig, ImportConfig, MediaSettings, ServerConfig,
};
use awards_common::{MemoryStorage, StorageConfig};
use awards_db::entities::nomination::{
    self, AcademicYear, Category, Department, NominationStatus,
};
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    middleware,
    response::Response,
};
use chrono::{NaiveDate, Utc};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "----awardsboundary";

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            url: "http://localhost:3000".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        storage: StorageConfig::default(),
        admin: AdminConfig {
            emails: vec!["hod.cse@university.edu".to_string()],
        },
        media: MediaSettings::default(),
        import: ImportConfig::default(),
    }
}

fn model(id: &str, status: NominationStatus, year: AcademicYear) -> nomination::Model {
    nomination::Model {
        id: id.to_string(),
        student_id: "uid1".to_string(),
        student_name: "Asha Rao".to_string(),
        reg_no: "AB12".to_string(),
        email: "asha@college.edu".to_string(),
        mobile: "9876543210".to_string(),
        year,
        department: Department::Cse,
        category: Category::Startup,
        title: "Seed funding".to_string(),
        issuer: "Startup India".to_string(),
        date_of_event: NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
        meta_data: serde_json::json!({ "startupName": "Krishi Labs" }),
        photo_url: None,
        proof_doc_url: Some("/files/proofs/uid1/1-cert.pdf".to_string()),
        status,
        created_at: Utc::now().into(),
    }
}

/// Create the test router over a mock database that answers with `results`
/// in order.
fn create_test_router(results: Vec<Vec<nomination::Model>>) -> (Router, MemoryStorage) {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(results)
        .into_connection();
    let storage = MemoryStorage::new("/files");
    let state = AppState::new(
        Arc::new(db),
        Arc::new(storage.clone()),
        &create_test_config(),
    );

    let app = api_router()
        .layer(middleware::from_fn(auth_middleware))
        .with_state(state);
    (app, storage)
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, content_type, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn submission_request(reg_no: &str, with_proof: bool) -> Request<Body> {
    let fields = [
        ("studentName", "Asha Rao"),
        ("regNo", reg_no),
        ("email", "asha@college.edu"),
        ("mobile", "9876543210"),
        ("year", "III"),
        ("department", "CSE"),
        ("category", "Startup"),
        ("title", "Seed funding"),
        ("issuer", "Startup India"),
        ("dateOfEvent", "2024-08-15"),
        (
            "metaData",
            r#"{"startupName":"Krishi Labs","fundingAmount":"5L","journalName":"x"}"#,
        ),
    ];
    let proof: [(&str, &str, &str, &[u8]); 1] = [(
        "proof",
        "cert.pdf",
        "application/pdf",
        b"%PDF-1.7 certificate",
    )];
    let files: &[(&str, &str, &str, &[u8])] = if with_proof { &proof } else { &[] };

    Request::builder()
        .uri("/nominations")
        .method("POST")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(&fields, files)))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

fn as_admin(method: &str, uri: &str, email: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(method)
        .header("X-User-Id", "admin1")
        .header("X-User-Email", email)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_category_catalog() {
    let (app, _) = create_test_router(Vec::new());

    let response = app.oneshot(get("/meta/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let categories = body["data"].as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert_eq!(categories[1]["category"], "Startup");
    assert_eq!(
        categories[1]["fields"],
        serde_json::json!(["startupName", "fundingAmount"])
    );
}

#[tokio::test]
async fn test_submit_anonymous_nomination() {
    let created = model("n1", NominationStatus::Pending, AcademicYear::III);
    let (app, storage) = create_test_router(vec![vec![created]]);

    let response = app.oneshot(submission_request("AB12", true)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["message"], "Nomination submitted successfully.");
    assert_eq!(body["data"]["nomination"]["status"], "Pending");
    assert!(body["data"]["nomination"]["photoUrl"].is_null());
    assert!(body["data"]["nomination"]["proofDocUrl"].is_string());

    let keys = storage.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("proofs/anonymous/"));
}

#[tokio::test]
async fn test_submit_rejects_bad_reg_no() {
    let (app, storage) = create_test_router(Vec::new());

    let response = app
        .oneshot(submission_request("AB-12", true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn test_submit_requires_proof() {
    let (app, storage) = create_test_router(Vec::new());

    let response = app
        .oneshot(submission_request("AB12", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(storage.keys().is_empty());
}

#[tokio::test]
async fn test_admin_requires_identity() {
    let (app, _) = create_test_router(Vec::new());

    let response = app.oneshot(get("/admin/nominations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_rejects_unlisted_user() {
    let (app, _) = create_test_router(Vec::new());

    let response = app
        .oneshot(as_admin("GET", "/admin/nominations", "student@college.edu"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_lists_nominations() {
    let rows = vec![
        model("n2", NominationStatus::Pending, AcademicYear::I),
        model("n1", NominationStatus::Approved, AcademicYear::II),
    ];
    let (app, _) = create_test_router(vec![rows]);

    let response = app
        .oneshot(as_admin("GET", "/admin/nominations", "HOD.CSE@University.edu"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["id"], "n2");
    assert_eq!(body["data"][0]["regNo"], "AB12");
}

#[tokio::test]
async fn test_approve_nomination() {
    let pending = model("n1", NominationStatus::Pending, AcademicYear::I);
    let approved = model("n1", NominationStatus::Approved, AcademicYear::I);
    let (app, _) = create_test_router(vec![vec![pending], vec![approved]]);

    let response = app
        .oneshot(as_admin(
            "POST",
            "/admin/nominations/n1/approve",
            "hod.cse@university.edu",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "Approved");
}

#[tokio::test]
async fn test_reject_unknown_nomination() {
    let (app, _) = create_test_router(vec![Vec::new()]);

    let response = app
        .oneshot(as_admin(
            "POST",
            "/admin/nominations/missing/reject",
            "hod.cse@university.edu",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_shows_missing_proof() {
    let mut legacy = model("n1", NominationStatus::Approved, AcademicYear::I);
    legacy.proof_doc_url = None;
    let (app, _) = create_test_router(vec![vec![legacy]]);

    let response = app
        .oneshot(as_admin(
            "GET",
            "/admin/nominations/n1",
            "hod.cse@university.edu",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["proof"]["kind"], "unavailable");
    assert_eq!(body["data"]["proof"]["message"], "No proof available");
}

#[tokio::test]
async fn test_admin_stats() {
    let rows = vec![
        model("n1", NominationStatus::Pending, AcademicYear::I),
        model("n2", NominationStatus::Approved, AcademicYear::I),
        model("n3", NominationStatus::Rejected, AcademicYear::IV),
    ];
    let (app, _) = create_test_router(vec![rows]);

    let response = app
        .oneshot(as_admin("GET", "/admin/stats", "hod.cse@university.edu"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["byCategory"][0]["category"], "Startup");
    assert_eq!(body["data"]["byCategory"][0]["count"], 3);
    assert_eq!(body["data"]["byYear"][0]["year"], "I");
    assert_eq!(body["data"]["byYear"][0]["count"], 2);
}

#[tokio::test]
async fn test_wall_year_filter() {
    let rows = vec![
        model("a", NominationStatus::Approved, AcademicYear::I),
        model("b", NominationStatus::Approved, AcademicYear::I),
        model("c", NominationStatus::Approved, AcademicYear::II),
    ];
    let (app, _) = create_test_router(vec![rows]);

    let response = app.oneshot(get("/wall?year=I")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["state"], "entry");
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["index"], 0);
    assert_eq!(body["data"]["showControls"], true);
    assert_eq!(body["data"]["card"]["initials"], "AR");
}

#[tokio::test]
async fn test_wall_empty_state() {
    let (app, _) = create_test_router(vec![Vec::new()]);

    let response = app.oneshot(get("/wall?category=Research")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["state"], "empty");
    assert!(body["data"]["message"].is_string());
}

#[tokio::test]
async fn test_wall_rejects_unknown_year() {
    let (app, _) = create_test_router(Vec::new());

    let response = app.oneshot(get("/wall?year=V")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wall_stream_returns_event_stream() {
    let (app, _) = create_test_router(vec![Vec::new()]);

    let response = app.oneshot(get("/wall/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap_or(""));
    assert!(content_type.unwrap().contains("text/event-stream"));
}

#[tokio::test]
async fn test_admin_stream_requires_admin() {
    let (app, _) = create_test_router(vec![Vec::new()]);

    let response = app.oneshot(get("/admin/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let (app, _) = create_test_router(Vec::new());

    let response = app.oneshot(get("/nonexistent")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
