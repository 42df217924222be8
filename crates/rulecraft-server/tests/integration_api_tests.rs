//! Integration tests for the REST API
//!
//! Every test drives the real router with `oneshot` requests against an
//! engine seeded with the default attributes.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use rulecraft_repository::FileSystemRepository;
use rulecraft_runtime::{RuleEngine, RuleEngineBuilder};
use rulecraft_server::api::create_router;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn create_test_engine() -> RuleEngine {
    RuleEngineBuilder::new()
        .with_default_attributes(true)
        .build()
        .await
        .unwrap()
}

async fn create_test_router() -> Router {
    create_router(create_test_engine().await)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create_rule(app: &Router, name: &str, rule_string: &str) -> u64 {
    let (status, json) = post(
        app,
        "/create_rule",
        json!({"name": name, "rule_string": rule_string}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["rule_id"].as_u64().unwrap()
}

async fn evaluate(app: &Router, rule_id: u64, attributes: Value) -> (StatusCode, Value) {
    post(
        app,
        "/evaluate_rule",
        json!({"rule_id": rule_id, "attributes": attributes}),
    )
    .await
}

// ========== Health ==========

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router().await;

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert_eq!(json["attributes"], 4);
    assert_eq!(json["rules"], 0);
}

#[tokio::test]
async fn test_health_method_not_allowed() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ========== Attributes ==========

#[tokio::test]
async fn test_get_attributes_lists_defaults() {
    let app = create_test_router().await;

    let (status, json) = get(&app, "/get_attributes").await;

    assert_eq!(status, StatusCode::OK);
    let attributes = json["attributes"].as_array().unwrap();
    assert_eq!(attributes.len(), 4);
    assert_eq!(attributes[0]["attribute_name"], "age");
    assert_eq!(attributes[0]["data_type"], "int");
    assert_eq!(attributes[2]["attribute_name"], "salary");
    assert_eq!(attributes[2]["data_type"], "float");
}

#[tokio::test]
async fn test_add_attribute() {
    let app = create_test_router().await;

    let (status, json) = post(
        &app,
        "/add_attribute",
        json!({"attribute_name": "rating", "data_type": "float"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(json["message"].as_str().unwrap().contains("rating"));
    assert_eq!(json["id"], 5);

    let (_, json) = get(&app, "/get_attributes").await;
    assert_eq!(json["attributes"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_add_attribute_rejections() {
    let app = create_test_router().await;

    let (status, json) = post(
        &app,
        "/add_attribute",
        json!({"attribute_name": "age", "data_type": "int"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].is_string());

    let (status, _) = post(
        &app,
        "/add_attribute",
        json!({"attribute_name": "tenure", "data_type": "date"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/add_attribute",
        json!({"attribute_name": "two words", "data_type": "int"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get(&app, "/get_attributes").await;
    assert_eq!(json["attributes"].as_array().unwrap().len(), 4);
}

// ========== Rules ==========

#[tokio::test]
async fn test_create_and_list_rules() {
    let app = create_test_router().await;

    let (status, json) = post(
        &app,
        "/create_rule",
        json!({"name": "senior sales", "rule_string": "age > 30 AND department = 'Sales'"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["rule_id"], 1);
    assert_eq!(json["name"], "senior sales");

    create_rule(&app, "juniors", "age < 25").await;

    let (status, json) = get(&app, "/get_rules").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["rules"],
        json!([{"id": 1, "name": "senior sales"}, {"id": 2, "name": "juniors"}])
    );
}

#[tokio::test]
async fn test_create_rule_syntax_error() {
    let app = create_test_router().await;

    for rule_string in ["age >", "(age > 30", "age > 30 AND", "", "age >> 30"] {
        let (status, json) = post(
            &app,
            "/create_rule",
            json!({"name": "broken", "rule_string": rule_string}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", rule_string);
        assert!(json["error"].as_str().unwrap().contains("Syntax error"));
    }

    // Failed creations leave nothing behind
    let (_, json) = get(&app, "/get_rules").await;
    assert_eq!(json["rules"], json!([]));
}

#[tokio::test]
async fn test_oversized_rules_are_rejected() {
    let app = create_test_router().await;
    let rule_string = (0..20_000)
        .map(|i| format!("age > {}", i))
        .collect::<Vec<_>>()
        .join(" AND ");

    let (status, json) = post(
        &app,
        "/create_rule",
        json!({"name": "huge", "rule_string": rule_string}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("nodes"));

    let a = create_rule(&app, "a", "age > 20").await;
    let (status, json) = post(
        &app,
        "/combine_rules",
        json!({"rule_ids": vec![a; 20_000]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("limit"));

    let (_, json) = get(&app, "/get_rules").await;
    assert_eq!(json["rules"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_rule_returns_nested_ast() {
    let app = create_test_router().await;
    let id = create_rule(&app, "r", "age > 30 AND department = 'Sales'").await;

    let (status, json) = get(&app, &format!("/get_rule/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], id);
    assert_eq!(json["rule_string"], "age > 30 AND department = 'Sales'");

    let ast = &json["ast"];
    assert_eq!(ast["node_id"], 1);
    assert_eq!(ast["operator"], "AND");
    assert_eq!(ast["left"]["node_id"], 2);
    assert_eq!(ast["left"]["attribute"], "age");
    assert_eq!(ast["left"]["comparison"], ">");
    assert_eq!(ast["left"]["value"], 30);
    assert_eq!(ast["right"]["node_id"], 3);
    assert_eq!(ast["right"]["value"], "Sales");
    assert!(ast["left"].get("operator").is_none());
}

#[tokio::test]
async fn test_get_rule_errors() {
    let app = create_test_router().await;

    let (status, json) = get(&app, "/get_rule/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);

    let (status, _) = get(&app, "/get_rule/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ========== Evaluation ==========

#[tokio::test]
async fn test_evaluate_grouped_rule() {
    let app = create_test_router().await;
    let id = create_rule(
        &app,
        "targeting",
        "(age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')",
    )
    .await;

    let (status, json) = evaluate(&app, id, json!({"age": 22, "department": "Marketing"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], true);

    let (_, json) = evaluate(&app, id, json!({"age": "35", "department": "Sales"})).await;
    assert_eq!(json["result"], true);

    let (_, json) = evaluate(&app, id, json!({"age": 28, "department": "Sales"})).await;
    assert_eq!(json["result"], false);
}

#[tokio::test]
async fn test_evaluate_accepts_string_rule_id() {
    let app = create_test_router().await;
    create_rule(&app, "r", "salary >= 5000").await;

    let (status, json) = post(
        &app,
        "/evaluate_rule",
        json!({"rule_id": "1", "attributes": {"salary": "5000.0"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], true);
}

#[tokio::test]
async fn test_evaluate_errors() {
    let app = create_test_router().await;
    let id = create_rule(&app, "r", "age > 30").await;

    // Missing binding
    let (status, json) = evaluate(&app, id, json!({"department": "Sales"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("age"));

    // Null counts as missing
    let (status, _) = evaluate(&app, id, json!({"age": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Not coercible to int
    let (status, json) = evaluate(&app, id, json!({"age": "thirty"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Type error"));

    // Nested values are rejected
    let (status, _) = evaluate(&app, id, json!({"age": [31]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown rule
    let (status, _) = evaluate(&app, 99, json!({"age": 31})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ========== Combination ==========

#[tokio::test]
async fn test_combine_rules() {
    let app = create_test_router().await;
    let a = create_rule(&app, "older", "age > 30").await;
    let b = create_rule(&app, "sales", "department = 'Sales'").await;

    let (status, json) = post(
        &app,
        "/combine_rules",
        json!({"rule_ids": [a, b], "combined_rule_name": "older sales"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "older sales");
    let combined = json["combined_rule_id"].as_u64().unwrap();
    assert_eq!(combined, 3);

    let (_, json) = get(&app, &format!("/get_rule/{}", combined)).await;
    assert_eq!(json["rule_string"], "age > 30 AND department = 'Sales'");

    let (_, json) = evaluate(&app, combined, json!({"age": 40, "department": "Sales"})).await;
    assert_eq!(json["result"], true);
    let (_, json) = evaluate(&app, combined, json!({"age": 40, "department": "HR"})).await;
    assert_eq!(json["result"], false);
}

#[tokio::test]
async fn test_combine_rules_with_options() {
    let app = create_test_router().await;
    let a = create_rule(&app, "a", "age > 20").await;
    let b = create_rule(&app, "b", "age > 30").await;

    let (status, json) = post(
        &app,
        "/combine_rules",
        json!({"rule_ids": [a.to_string(), b.to_string()], "operator": "OR", "simplify": true}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["name"], "combined_rule");

    let id = json["combined_rule_id"].as_u64().unwrap();
    let (_, json) = get(&app, &format!("/get_rule/{}", id)).await;
    assert_eq!(json["rule_string"], "age > 20");
}

#[tokio::test]
async fn test_combine_rules_rejections() {
    let app = create_test_router().await;
    let a = create_rule(&app, "a", "age > 20").await;

    let (status, _) = post(&app, "/combine_rules", json!({"rule_ids": [a]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(&app, "/combine_rules", json!({"rule_ids": [a, 77]})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/combine_rules",
        json!({"rule_ids": [a, a], "operator": "XOR"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get(&app, "/get_rules").await;
    assert_eq!(json["rules"].as_array().unwrap().len(), 1);
}

// ========== Modification ==========

#[tokio::test]
async fn test_modify_rule_value() {
    let app = create_test_router().await;
    let id = create_rule(&app, "r", "age > 30 AND department = 'Sales'").await;

    let (_, json) = evaluate(&app, id, json!({"age": 35, "department": "Sales"})).await;
    assert_eq!(json["result"], true);

    let (status, json) = post(
        &app,
        "/modify_rule",
        json!({
            "rule_id": id,
            "modifications": {"node_id": "2", "new_value": "40", "new_attribute": ""}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rule_string"], "age > 40 AND department = 'Sales'");
    assert!(json["message"].is_string());

    let (_, json) = evaluate(&app, id, json!({"age": 35, "department": "Sales"})).await;
    assert_eq!(json["result"], false);

    let (_, json) = get(&app, &format!("/get_rule/{}", id)).await;
    assert_eq!(json["ast"]["left"]["value"], 40);
}

#[tokio::test]
async fn test_modify_rule_operator_and_comparison() {
    let app = create_test_router().await;
    let id = create_rule(&app, "r", "age > 30 AND department = 'Sales'").await;

    let (status, _) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": id, "modifications": {"node_id": 1, "new_operator": "OR"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": id, "modifications": {"node_id": 3, "new_comparison": "!="}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rule_string"], "age > 30 OR department != 'Sales'");

    let (_, json) = evaluate(&app, id, json!({"age": 20, "department": "HR"})).await;
    assert_eq!(json["result"], true);
}

#[tokio::test]
async fn test_modify_rule_rejections_leave_rule_unchanged() {
    let app = create_test_router().await;
    let id = create_rule(&app, "r", "age > 30 AND department = 'Sales'").await;

    // Unknown node
    let (status, _) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": id, "modifications": {"node_id": 9, "new_value": 1}}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown rule
    let (status, _) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": 9, "modifications": {"node_id": 1, "new_operator": "OR"}}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // No change requested
    let (status, _) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": id, "modifications": {"node_id": 2, "new_value": ""}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Operand field on an operator node
    let (status, _) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": id, "modifications": {"node_id": 1, "new_value": 5}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Invalid comparison
    let (status, _) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": id, "modifications": {"node_id": 2, "new_comparison": "=>"}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = get(&app, &format!("/get_rule/{}", id)).await;
    assert_eq!(json["rule_string"], "age > 30 AND department = 'Sales'");
}

// ========== Request validation ==========

#[tokio::test]
async fn test_invalid_json_body() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/create_rule")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, json) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert!(json["error"].as_str().unwrap().contains("JSON syntax error"));
}

#[tokio::test]
async fn test_missing_fields_and_content_type() {
    let app = create_test_router().await;

    let (status, json) = post(&app, "/create_rule", json!({"name": "no rule string"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("rule_string"));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/create_rule")
                .body(Body::from(r#"{"name": "r", "rule_string": "age > 1"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    let (status, json) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Content-Type"));
}

// ========== Persistence ==========

async fn create_persistent_router(path: &Path) -> Router {
    let repository = Arc::new(FileSystemRepository::new(path).unwrap());
    let engine = RuleEngineBuilder::new()
        .with_repository(repository)
        .with_default_attributes(true)
        .build()
        .await
        .unwrap();
    create_router(engine)
}

#[tokio::test]
async fn test_state_survives_restart_with_filesystem_storage() {
    let temp_dir = TempDir::new().unwrap();

    let app = create_persistent_router(temp_dir.path()).await;
    let id = create_rule(&app, "persisted", "experience >= 5").await;
    let (status, _) = post(
        &app,
        "/modify_rule",
        json!({"rule_id": id, "modifications": {"node_id": 1, "new_value": 3}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    drop(app);

    let app = create_persistent_router(temp_dir.path()).await;
    let (_, json) = get(&app, &format!("/get_rule/{}", id)).await;
    assert_eq!(json["name"], "persisted");
    assert_eq!(json["rule_string"], "experience >= 3");

    let (_, json) = evaluate(&app, id, json!({"experience": 4})).await;
    assert_eq!(json["result"], true);

    // Ids keep counting after a restart
    let next = create_rule(&app, "next", "age > 1").await;
    assert_eq!(next, id + 1);
}
