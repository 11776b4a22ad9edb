mod support;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use support::TestServer;
use tempfile::TempDir;

fn config(data_dir: &str) -> String {
    format!(
        r#"
[storage]
data_dir = "{}"

[[courses]]
id = 3
title = "Networks"
capacity = 1
"#,
        data_dir.replace('\\', "\\\\")
    )
}

#[tokio::test]
async fn test_enrollments_persist_across_restart() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path().to_str().unwrap());

    let server = TestServer::start(&config).await;
    let first: Value = server.enroll(20, 3).await.json().await.unwrap();
    assert_eq!(first["status"], "registered");
    let dropped = server
        .as_user(
            Method::PATCH,
            &format!("/enrollments/{}", first["id"]),
            20,
            "student",
        )
        .json(&json!({ "status": "dropped" }))
        .send()
        .await
        .unwrap();
    assert_eq!(dropped.status(), StatusCode::OK);
    server.stop().await;

    assert!(dir.path().join("registrar.json").exists());

    let server = TestServer::start(&config).await;
    // The dropped record survived, so it still blocks re-enrollment.
    assert_eq!(server.enroll(20, 3).await.status(), StatusCode::BAD_REQUEST);

    let next: Value = server.enroll(21, 3).await.json().await.unwrap();
    assert_eq!(next["status"], "registered");
    assert_eq!(next["id"].as_u64(), first["id"].as_u64().map(|id| id + 1));
    server.stop().await;
}
