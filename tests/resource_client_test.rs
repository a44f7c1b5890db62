mod common;

use axum::{Router, routing::get};
use crudflow::client::{ClientError, ErrorKind, HttpResourceClient, ResourceClient};
use crudflow::config::ResourceConfig;
use serde_json::json;

use common::{fields, start_backend};

fn client(base_url: &str, resource: &str) -> HttpResourceClient {
    HttpResourceClient::new(ResourceConfig::new(base_url, resource))
        .expect("Failed to create client")
}

#[tokio::test]
async fn test_create_then_list_includes_record() {
    let backend = start_backend().await;
    let tasks = client(&backend.base_url, "tasks");

    let created = tasks
        .create(&fields(json!({ "title": "Buy milk" })))
        .await
        .expect("Failed to create task");
    assert_eq!(created.id, "1");
    assert_eq!(created.text("title").as_deref(), Some("Buy milk"));

    let listed = tasks.list().await.expect("Failed to list tasks");
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_delete_then_list_excludes_record() {
    let backend = start_backend().await;
    let tasks = client(&backend.base_url, "tasks");

    let keep = tasks.create(&fields(json!({ "title": "keep" }))).await.unwrap();
    let gone = tasks.create(&fields(json!({ "title": "gone" }))).await.unwrap();

    tasks.delete(&gone.id).await.expect("Failed to delete task");

    let ids: Vec<String> = tasks.list().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![keep.id]);
}

#[tokio::test]
async fn test_update_only_touches_target() {
    let backend = start_backend().await;
    let tasks = client(&backend.base_url, "tasks");

    let first = tasks.create(&fields(json!({ "title": "first" }))).await.unwrap();
    let second = tasks.create(&fields(json!({ "title": "second" }))).await.unwrap();

    let updated = tasks
        .update(&second.id, &fields(json!({ "title": "second, edited" })))
        .await
        .expect("Failed to update task");
    assert_eq!(updated.id, second.id);

    let listed = tasks.list().await.unwrap();
    assert_eq!(listed[0], first);
    assert_eq!(listed[1].text("title").as_deref(), Some("second, edited"));
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let backend = start_backend().await;
    let tasks = client(&backend.base_url, "tasks");

    let first = tasks.create(&fields(json!({ "title": "a" }))).await.unwrap();
    tasks.delete(&first.id).await.unwrap();
    let second = tasks.create(&fields(json!({ "title": "b" }))).await.unwrap();
    assert_eq!(second.id, "2");
}

#[tokio::test]
async fn test_collections_are_independent() {
    let backend = start_backend().await;
    let cart = client(&backend.base_url, "cart");
    let tasks = client(&backend.base_url, "tasks");

    cart.create(&fields(json!({ "donutId": "1", "quantity": 2 }))).await.unwrap();
    assert!(tasks.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_record_is_network_error() {
    let backend = start_backend().await;
    let tasks = client(&backend.base_url, "tasks");

    let err = tasks.delete("404").await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tasks = client(&format!("http://{}", addr), "tasks");
    let err = tasks.list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_non_array_list_is_decode_error() {
    let app = Router::new()
        .route("/tasks", get(|| async { axum::Json(json!({ "tasks": [] })) }))
        .route("/broken", get(|| async { "<html>oops</html>" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let base = format!("http://{}", addr);

    let err = client(&base, "tasks").list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);

    let err = client(&base, "broken").list().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_reserved_characters_in_id_stay_in_path() {
    let backend = start_backend().await;
    let tasks = client(&backend.base_url, "tasks");

    let first = tasks.create(&fields(json!({ "title": "keep me" }))).await.unwrap();
    assert_eq!(first.id, "1");

    for id in ["1?x=2", "1#frag", "1/extra"] {
        let err = tasks.delete(id).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }), "{}: {:?}", id, err);
        let err = tasks
            .update(id, &fields(json!({ "title": "hijacked" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }), "{}: {:?}", id, err);
    }

    assert_eq!(tasks.list().await.unwrap(), vec![first]);
}
