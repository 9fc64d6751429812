//! Shared wiring for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use police_assistant::adapters::ai::{MockAIProvider, PromptReplyGenerator, ReplySettings};
use police_assistant::adapters::catalog::{InMemoryViolationRegistry, JsonServiceCatalog};
use police_assistant::adapters::flow::FileFlowLoader;
use police_assistant::adapters::http::{app_router, AppState, HttpSettings};
use police_assistant::adapters::session::{InMemorySessionStore, SessionStoreConfig};
use police_assistant::application::handlers::chat::ChatTurnHandler;
use police_assistant::domain::flow::FlowEngine;
use police_assistant::ports::SessionStore;

pub fn repo_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

pub struct TestApp {
    pub store: Arc<InMemorySessionStore>,
    pub provider: MockAIProvider,
    pub chat: Arc<ChatTurnHandler>,
    pub router: Router,
}

/// Builds the full stack over the shipped flow and catalog files.
pub async fn build_app(provider: MockAIProvider) -> TestApp {
    let flow = FileFlowLoader::new(repo_path("flows/perpanjangan_sim.json"))
        .load()
        .await
        .unwrap();
    let catalog = JsonServiceCatalog::load(repo_path("data/pelayanan.json"))
        .await
        .unwrap();

    let store = Arc::new(InMemorySessionStore::new(SessionStoreConfig::default()));
    let store_port: Arc<dyn SessionStore> = store.clone();
    let replies = Arc::new(PromptReplyGenerator::new(
        Arc::new(provider.clone()),
        ReplySettings::default(),
    ));

    let chat = Arc::new(ChatTurnHandler::new(
        store_port.clone(),
        FlowEngine::new(Arc::new(flow)),
        Arc::new(catalog),
        Arc::new(InMemoryViolationRegistry::with_sample_data()),
        replies,
    ));

    let router = app_router(
        AppState::new(store_port, chat.clone()),
        &HttpSettings::default(),
    );

    TestApp {
        store,
        provider,
        chat,
        router,
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn create_session(router: &Router) -> String {
    let (_, body) = send(router, post_empty("/api/v1/session")).await;
    body["session_id"].as_str().unwrap().to_string()
}
