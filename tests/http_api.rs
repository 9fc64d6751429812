//! Integration tests for the REST surface.
//!
//! Requests go through the full router (CORS, timeout and trace layers
//! included) with a scripted LLM provider behind the reply generator.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{build_app, delete, get, post_empty, post_json, send};
use police_assistant::adapters::ai::MockAIProvider;
use police_assistant::ports::AIError;

#[tokio::test]
async fn banner_lists_endpoints() {
    let app = build_app(MockAIProvider::new()).await;

    let (status, body) = send(&app.router, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["endpoints"]["chat"], "/api/v1/chat");
}

#[tokio::test]
async fn health_reports_active_sessions() {
    let app = build_app(MockAIProvider::new()).await;
    send(&app.router, post_empty("/api/v1/session")).await;
    send(&app.router, post_empty("/api/v1/session")).await;

    let (status, body) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "police-assistant");
    assert_eq!(body["active_sessions"], 2);
}

#[tokio::test]
async fn unknown_route_returns_json_404() {
    let app = build_app(MockAIProvider::new()).await;

    let (status, body) = send(&app.router, get("/api/v2/nothing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "ROUTE_NOT_FOUND");
}

#[tokio::test]
async fn chat_without_session_creates_one_and_records_history() {
    let app = build_app(MockAIProvider::new().with_response("Halo Sobat Lantas!")).await;

    let (status, body) = send(
        &app.router,
        post_json("/api/v1/chat", json!({"message": "halo"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["response"], "Halo Sobat Lantas!");
    assert!(body.get("sim_flow_info").is_none());

    let session_id = body["session_id"].as_str().unwrap().to_string();
    let (status, info) = send(&app.router, get(&format!("/api/v1/session/{}", session_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["message_count"], 2);
}

#[tokio::test]
async fn chat_with_blank_message_is_rejected() {
    let app = build_app(MockAIProvider::new()).await;

    let (status, body) = send(
        &app.router,
        post_json("/api/v1/chat", json!({"message": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Message is required");
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn chat_with_malformed_body_is_rejected() {
    let app = build_app(MockAIProvider::new()).await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/chat")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
}

#[tokio::test]
async fn provider_failure_maps_to_bad_gateway_and_keeps_history_clean() {
    let app = build_app(MockAIProvider::new().with_error(AIError::unavailable("down"))).await;
    let session_id = common::create_session(&app.router).await;

    let (status, body) = send(
        &app.router,
        post_json(
            "/api/v1/chat",
            json!({"message": "halo", "session_id": session_id}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);

    let (_, info) = send(&app.router, get(&format!("/api/v1/session/{}", session_id))).await;
    assert_eq!(info["message_count"], 0);
}

#[tokio::test]
async fn violation_check_attaches_registry_record() {
    let app = build_app(MockAIProvider::new()).await;

    let (status, body) = send(
        &app.router,
        post_json("/api/v1/chat", json!({"message": "cek tilang B1234SV"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["e_tilang_info"]["plate_number"], "B 1234 SV");
    assert_eq!(body["e_tilang_info"]["has_violation"], true);

    let prompt = app.provider.last_call().unwrap().system_prompt.unwrap();
    assert!(prompt.contains("ADA PELANGGARAN"));
}

#[tokio::test]
async fn service_question_attaches_catalog_record() {
    let app = build_app(MockAIProvider::new()).await;

    let (_, body) = send(
        &app.router,
        post_json(
            "/api/v1/chat",
            json!({"message": "apa syarat balik nama kendaraan?"}),
        ),
    )
    .await;

    assert_eq!(body["pelayanan_info"]["found"], true);
    assert_eq!(
        body["pelayanan_info"]["pelayanan"]["jenis_pelayanan"],
        "balik_nama_kendaraan"
    );
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    let app = build_app(MockAIProvider::new()).await;

    let (status, created) = send(&app.router, post_empty("/api/v1/session")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["success"], true);
    let session_id = created["session_id"].as_str().unwrap().to_string();
    let session_uri = format!("/api/v1/session/{}", session_id);

    send(
        &app.router,
        post_json(
            "/api/v1/chat",
            json!({"message": "halo", "session_id": session_id}),
        ),
    )
    .await;
    let (_, info) = send(&app.router, get(&session_uri)).await;
    assert_eq!(info["message_count"], 2);

    let (status, cleared) = send(&app.router, post_empty(&format!("{}/clear", session_uri))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["message"], "Session history cleared");
    let (_, info) = send(&app.router, get(&session_uri)).await;
    assert_eq!(info["message_count"], 0);

    let (status, _) = send(&app.router, delete(&session_uri)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app.router, get(&session_uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn clearing_and_deleting_unknown_sessions_succeeds() {
    let app = build_app(MockAIProvider::new()).await;

    let (status, _) = send(&app.router, post_empty("/api/v1/session/ghost/clear")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app.router, delete("/api/v1/session/ghost")).await;
    assert_eq!(status, StatusCode::OK);
}
