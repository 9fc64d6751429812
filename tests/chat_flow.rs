//! End-to-end chat turns over the shipped license-renewal flow.

mod common;

use futures::future::join_all;

use common::build_app;
use police_assistant::adapters::ai::MockAIProvider;
use police_assistant::application::handlers::chat::{
    ChatTurnCommand, ChatTurnResult, FLOW_CURSOR_KEY,
};
use police_assistant::domain::flow::NodeType;
use police_assistant::domain::session::ChatMessage;
use police_assistant::ports::{MessageRole, SessionStore};

async fn turn(app: &common::TestApp, session_id: &str, message: &str) -> ChatTurnResult {
    app.chat
        .handle(ChatTurnCommand::new(message).with_session_id(session_id))
        .await
        .unwrap()
}

#[tokio::test]
async fn renewal_walkthrough_reaches_first_upload_step() {
    let app = build_app(MockAIProvider::new()).await;
    let session = app.store.create().await;
    let id = session.as_str();

    let first = turn(&app, id, "perpanjang sim").await;
    let flow = first.active_flow.unwrap();
    assert_eq!(flow.node_id.as_str(), "pilih_golongan");
    assert_eq!(flow.node_type, NodeType::Question);
    assert_eq!(flow.choices.len(), 3);

    let second = turn(&app, id, "sim c").await;
    assert_eq!(second.active_flow.unwrap().node_id.as_str(), "cek_masa_berlaku");

    let third = turn(&app, id, "sim c saya masih berlaku").await;
    let flow = third.active_flow.unwrap();
    assert_eq!(flow.node_id.as_str(), "upload_ktp");
    assert_eq!(flow.node_type, NodeType::Collect);
    assert_eq!(flow.collect_key.as_deref(), Some("ktp"));

    assert_eq!(app.store.get_flow_value(&session, FLOW_CURSOR_KEY).await, "upload_ktp");
    let prompt = app.provider.last_call().unwrap().system_prompt.unwrap();
    assert!(prompt.contains("Node saat ini: upload_ktp (collect)"));
}

#[tokio::test]
async fn unmatched_reply_keeps_the_cursor_in_place() {
    let app = build_app(MockAIProvider::new()).await;
    let session = app.store.create().await;
    let id = session.as_str();

    turn(&app, id, "perpanjang sim").await;
    let result = turn(&app, id, "urus sim dong").await;

    assert_eq!(result.active_flow.unwrap().node_id.as_str(), "pilih_golongan");
    assert_eq!(app.store.get_flow_value(&session, FLOW_CURSOR_KEY).await, "pilih_golongan");
}

#[tokio::test]
async fn trigger_without_choice_parks_on_entry_node() {
    let app = build_app(MockAIProvider::new()).await;
    let session = app.store.create().await;

    let result = turn(&app, session.as_str(), "urus sim dong").await;
    let flow = result.active_flow.unwrap();
    assert_eq!(flow.node_id.as_str(), "entry_node");
    assert_eq!(flow.choices[1].label, "Perpanjang SIM");
    assert_eq!(app.store.get_flow_value(&session, FLOW_CURSOR_KEY).await, "entry_node");

    turn(&app, session.as_str(), "perpanjang sim").await;
    assert_eq!(app.store.get_flow_value(&session, FLOW_CURSOR_KEY).await, "pilih_golongan");
}

#[tokio::test]
async fn messages_without_flow_vocabulary_leave_the_flow_alone() {
    let app = build_app(MockAIProvider::new()).await;
    let session = app.store.create().await;

    let result = turn(&app, session.as_str(), "halo, selamat pagi").await;

    assert!(result.active_flow.is_none());
    assert_eq!(app.store.get_flow_value(&session, FLOW_CURSOR_KEY).await, "");
}

#[tokio::test]
async fn stale_cursor_restarts_from_entry() {
    let app = build_app(MockAIProvider::new()).await;
    let session = app.store.create().await;
    app.store
        .set_flow_value(&session, FLOW_CURSOR_KEY, "retired_node".to_string())
        .await;

    let result = turn(&app, session.as_str(), "perpanjang sim").await;

    assert_eq!(result.active_flow.unwrap().node_id.as_str(), "pilih_golongan");
}

#[tokio::test]
async fn concurrent_turns_on_one_session_are_serialized() {
    let app = build_app(MockAIProvider::new()).await;
    let session = app.store.create().await;

    let turns = (0..10).map(|_| {
        let chat = app.chat.clone();
        let id = session.to_string();
        tokio::spawn(async move {
            chat.handle(ChatTurnCommand::new("perpanjang sim").with_session_id(id))
                .await
                .unwrap()
        })
    });
    for result in join_all(turns).await {
        result.unwrap();
    }

    // Exactly one turn left the entry node; the rest found no match on the next step.
    assert_eq!(app.store.get_flow_value(&session, FLOW_CURSOR_KEY).await, "pilih_golongan");
    assert_eq!(app.store.get_history(&session).await.len(), 20);
}

#[tokio::test]
async fn concurrent_turns_on_different_sessions_do_not_interfere() {
    let app = build_app(MockAIProvider::new()).await;
    let mut sessions = Vec::new();
    for _ in 0..8 {
        sessions.push(app.store.create().await);
    }

    let turns = sessions.iter().map(|session| {
        let chat = app.chat.clone();
        let id = session.to_string();
        tokio::spawn(async move {
            chat.handle(ChatTurnCommand::new("halo").with_session_id(id))
                .await
                .unwrap()
        })
    });
    for result in join_all(turns).await {
        result.unwrap();
    }

    for session in &sessions {
        assert_eq!(app.store.get_history(session).await.len(), 2);
    }
}

#[tokio::test]
async fn caller_history_is_used_for_fresh_sessions() {
    let app = build_app(MockAIProvider::new()).await;

    let result = app
        .chat
        .handle(ChatTurnCommand::new("lanjut").with_history(vec![
            ChatMessage::user("halo"),
            ChatMessage::assistant("Halo Sobat Lantas!"),
        ]))
        .await
        .unwrap();

    let request = app.provider.last_call().unwrap();
    assert_eq!(request.messages.len(), 3);
    assert_eq!(request.messages[0].role, MessageRole::User);
    assert_eq!(request.messages[2].content, "lanjut");
    assert_eq!(app.store.get_history(&result.session_id).await.len(), 2);
}

#[tokio::test]
async fn unknown_client_session_id_is_adopted() {
    let app = build_app(MockAIProvider::new()).await;

    let result = turn(&app, "frontend-42", "halo").await;

    assert_eq!(result.session_id.as_str(), "frontend-42");
    assert_eq!(app.store.count().await, 1);
}
