//! End-to-end tests against a real listener.

use books_api::client::{BooksClient, ClientError};
use books_api::{BookPatch, NewBook};
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_post_then_get_returns_created_book() {
    let server = common::start_server(common::memory_config()).await;
    let client = common::http_client();

    let res = client
        .post(format!("{}/books", server.url()))
        .json(&json!({"title": "Head First Go", "author": "Jay McGavren", "pages": 556}))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(
        res.headers()["content-type"],
        "application/json"
    );
    let created: Value = res.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert!(id > 0);

    let res = client
        .get(format!("{}/books/{}", server.url(), id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), created);

    server.stop().await;
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let server = common::start_server(common::memory_config()).await;
    let client = common::http_client();

    let created: Value = client
        .post(format!("{}/books", server.url()))
        .json(&json!({"title": "The Go Programming Language", "author": "Alan Donovan", "pages": 400}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let url = format!("{}/books/{}", server.url(), created["id"]);

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn test_put_merges_present_fields_only() {
    let server = common::start_server(common::memory_config()).await;
    let client = common::http_client();

    let created: Value = client
        .post(format!("{}/books", server.url()))
        .json(&json!({"title": "Original", "author": "Someone", "pages": 120}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let res = client
        .put(format!("{}/books", server.url()))
        .json(&json!({"Id": created["id"], "Title": "Revised"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(
        updated,
        json!({"id": created["id"], "title": "Revised", "author": "Someone", "pages": 120})
    );

    // A merge that would produce an invalid book is refused and changes nothing.
    let res = client
        .put(format!("{}/books", server.url()))
        .json(&json!({"id": created["id"], "pages": -1}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stored: Value = client
        .get(format!("{}/books/{}", server.url(), created["id"]))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, updated);

    server.stop().await;
}

#[tokio::test]
async fn test_error_statuses() {
    let server = common::start_server(common::memory_config()).await;
    let client = common::http_client();
    let books = format!("{}/books", server.url());

    let res = client
        .post(&books)
        .header("content-type", "application/json")
        .body("{\"title\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(&books)
        .json(&json!({"title": "", "author": "a", "pages": 10}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(format!("{}/nope", books)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(format!("{}/12345", books)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.put(&books).json(&json!({"pages": 3})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Nothing invalid reached storage.
    let listed: Vec<Value> = client.get(&books).send().await.unwrap().json().await.unwrap();
    assert!(listed.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_typed_client_round_trip() {
    let mut config = common::memory_config();
    config.listener.base_path = "/api".into();
    let server = common::start_server(config).await;
    let client = BooksClient::with_client(common::http_client(), &format!("{}/api", server.url()));

    let first = client
        .create(&NewBook::new("Head First Go", "Jay McGavren", 556))
        .await
        .unwrap();
    let second = client
        .create(&NewBook::new("Concurrency in Go", "Katherine Cox-Buday", 238))
        .await
        .unwrap();

    let listed = client.list().await.unwrap();
    assert_eq!(listed, vec![first.clone(), second.clone()]);

    let updated = client
        .update(&BookPatch {
            id: Some(second.id),
            pages: Some(240),
            ..BookPatch::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.pages, 240);
    assert_eq!(updated.title, second.title);

    client.delete(first.id).await.unwrap();
    let err = client.get(first.id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    match err {
        ClientError::Status { message, .. } => {
            assert_eq!(message, "The requested book id could not be found.")
        }
        other => panic!("unexpected error: {}", other),
    }

    server.stop().await;
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = common::start_server(common::memory_config()).await;
    let client = common::http_client();

    let res = client.get(format!("{}/health", server.url())).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let res = client
        .get(format!("{}/health/ready", server.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["storage"], "memory");

    server.stop().await;
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let server = common::start_server(common::memory_config()).await;
    let client = BooksClient::with_client(common::http_client(), &server.url());

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            client
                .create(&NewBook::new(format!("Book {}", i), "Author", i + 1))
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);
    assert_eq!(client.list().await.unwrap().len(), 20);

    server.stop().await;
}

#[tokio::test]
async fn test_server_stops_on_shutdown() {
    let server = common::start_server(common::memory_config()).await;
    let url = server.url();
    server.stop().await;

    let res = common::http_client().get(format!("{}/health", url)).send().await;
    assert!(res.is_err(), "server should no longer accept connections");
}
