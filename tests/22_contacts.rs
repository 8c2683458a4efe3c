mod common;

use axum::http::StatusCode;
use common::{authed_get, authed_post, TestApp};
use serde_json::{json, Value};

fn valid_contact() -> Value {
    json!({
        "name": "John Doe",
        "email": "john@example.com",
        "project_type": "AI Chatbot",
        "description": "Need a customer support bot"
    })
}

#[tokio::test]
async fn create_defaults_status_to_new() {
    let app = TestApp::new();

    let (status, body) = app.send(authed_post("/api/admin/contacts", &valid_contact())).await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["status"], "new");
    assert_eq!(data["id"], "row-1");
    assert!(data.get("company").is_none());
    assert!(data.get("phone").is_none());

    let inserted = app.tables.inserted();
    assert_eq!(inserted[0].0, "contact_submissions");
}

#[tokio::test]
async fn create_keeps_optional_fields_and_explicit_status() {
    let app = TestApp::new();
    let mut input = valid_contact();
    input["company"] = json!(" Acme <Corp> ");
    input["phone"] = json!("555-0100");
    input["status"] = json!("in_progress");

    let (status, body) = app.send(authed_post("/api/admin/contacts", &input)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["company"], "Acme Corp");
    assert_eq!(body["data"]["phone"], "555-0100");
    assert_eq!(body["data"]["status"], "in_progress");
}

#[tokio::test]
async fn create_validates_email_and_status() {
    let app = TestApp::new();
    let mut input = valid_contact();
    input["email"] = json!("not-an-email");
    input["status"] = json!("closed");

    let (status, body) = app.send(authed_post("/api/admin/contacts", &input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        json!([
            "Valid email is required",
            "Status must be one of: new, contacted, in_progress, completed, archived"
        ])
    );
    assert!(app.tables.inserted().is_empty());
}

#[tokio::test]
async fn list_applies_equality_filters() {
    let app = TestApp::new();
    app.tables.seed(
        "contact_submissions",
        vec![
            json!({ "id": "1", "name": "Ann", "email": "ann@example.com", "status": "new", "project_type": "RAG", "created_at": "2026-02-01T00:00:00.000Z" }),
            json!({ "id": "2", "name": "Bob", "email": "bob@example.com", "status": "contacted", "project_type": "RAG", "created_at": "2026-02-02T00:00:00.000Z" }),
            json!({ "id": "3", "name": "Cy", "email": "cy@example.com", "status": "new", "project_type": "Web", "created_at": "2026-02-03T00:00:00.000Z" }),
        ],
    );

    let (status, body) = app.send(authed_get("/api/admin/contacts?status=new")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    let names: Vec<&str> = body["data"]["contacts"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Cy", "Ann"]);

    let (_, body) = app
        .send(authed_get("/api/admin/contacts?project_type=RAG&sort_by=name&sort_order=asc"))
        .await;
    let (_, filter) = app.tables.last_query().unwrap();
    assert_eq!(Value::Object(filter), json!({ "project_type": "RAG" }));
    assert_eq!(body["data"]["contacts"][0]["name"], "Ann");
    assert_eq!(body["data"]["contacts"][1]["name"], "Bob");
}

#[tokio::test]
async fn list_ignores_unknown_filters_and_blank_values() {
    let app = TestApp::new();

    let (status, _) = app.send(authed_get("/api/admin/contacts?status=&company=Acme")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, filter) = app.tables.last_query().unwrap();
    assert!(filter.is_empty());
}

#[tokio::test]
async fn list_rejects_unsortable_field() {
    let app = TestApp::new();

    let (status, body) = app.send(authed_get("/api/admin/contacts?sort_by=phone")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
}
