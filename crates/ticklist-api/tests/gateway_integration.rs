//! Integration tests for HttpGateway against the in-process stub service.
//!
//! Each test spawns the stub on 127.0.0.1:0 and exercises the gateway
//! through the full request/response cycle, envelopes included.

use ticklist_api::test_helpers::{spawn_stub_api, StubApi};
use ticklist_api::{ApiError, HttpGateway, TodoService};
use ticklist_core::{TodoId, TodoPayload};

async fn spawn_gateway() -> (StubApi, HttpGateway) {
    let stub = spawn_stub_api().await;
    let gateway = HttpGateway::new(&stub.base_url);
    (stub, gateway)
}

fn titled(title: &str) -> TodoPayload {
    TodoPayload {
        title: Some(title.into()),
        completed: Some(false),
        ..Default::default()
    }
}

#[tokio::test]
async fn list_starts_empty() {
    let (_stub, gateway) = spawn_gateway().await;
    assert!(gateway.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_returns_the_server_assigned_record() {
    let (_stub, gateway) = spawn_gateway().await;

    let created = gateway.create(&titled("Water the plants")).await.unwrap();
    assert_eq!(created.id, TodoId::from(1));
    assert_eq!(created.title.as_deref(), Some("Water the plants"));
    assert!(!created.completed);
    // Create bodies fill in the default priority.
    assert_eq!(created.priority, Some(1));
    assert!(created.created_at.is_some());
    assert!(created.updated_at.is_some());

    let all = gateway.list().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, created.id);
}

#[tokio::test]
async fn create_maps_the_completion_flag() {
    let (_stub, gateway) = spawn_gateway().await;

    let payload = TodoPayload {
        title: Some("Already done".into()),
        completed: Some(true),
        ..Default::default()
    };
    let created = gateway.create(&payload).await.unwrap();
    assert!(created.completed);
}

#[tokio::test]
async fn update_patches_only_the_provided_fields() {
    let (_stub, gateway) = spawn_gateway().await;

    let payload = TodoPayload {
        title: Some("Call the bank".into()),
        description: Some(Some("About the card".into())),
        completed: Some(false),
        ..Default::default()
    };
    let created = gateway.create(&payload).await.unwrap();

    let updated = gateway
        .update(
            &created.id,
            &TodoPayload {
                title: Some("Call the bank again".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title.as_deref(), Some("Call the bank again"));
    // A sparse patch must not touch the description.
    assert_eq!(updated.description.as_deref(), Some("About the card"));
    assert!(!updated.completed);
}

#[tokio::test]
async fn update_clears_description_with_explicit_null() {
    let (_stub, gateway) = spawn_gateway().await;

    let payload = TodoPayload {
        title: Some("Tidy up".into()),
        description: Some(Some("The garage".into())),
        ..Default::default()
    };
    let created = gateway.create(&payload).await.unwrap();

    let updated = gateway
        .update(
            &created.id,
            &TodoPayload {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, None);
}

#[tokio::test]
async fn update_accepts_text_form_of_a_numeric_id() {
    let (_stub, gateway) = spawn_gateway().await;

    gateway.create(&titled("Either representation")).await.unwrap();

    let updated = gateway
        .update(
            &TodoId::from("1"),
            &TodoPayload {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.completed);
    assert_eq!(updated.id, TodoId::from(1));
}

#[tokio::test]
async fn remove_deletes_via_204() {
    let (_stub, gateway) = spawn_gateway().await;

    let created = gateway.create(&titled("Short-lived")).await.unwrap();
    gateway.remove(&created.id).await.unwrap();
    assert!(gateway.list().await.unwrap().is_empty());

    let err = gateway.remove(&created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::Server(msg) if msg == "todo not found"));
}

#[tokio::test]
async fn update_of_missing_todo_reports_the_envelope_message() {
    let (_stub, gateway) = spawn_gateway().await;

    let err = gateway
        .update(&TodoId::from(99), &titled("Ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Server(msg) if msg == "todo not found"));
}

#[tokio::test]
async fn failure_switch_surfaces_the_server_message() {
    let (stub, gateway) = spawn_gateway().await;

    stub.set_failing(true);
    let err = gateway.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Server(msg) if msg == "service unavailable"));

    stub.set_failing(false);
    assert!(gateway.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Nothing is listening here.
    let gateway = HttpGateway::new("http://127.0.0.1:1");
    let err = gateway.list().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
