//! End-to-end tests for the static pages, detail pages and error responses

mod common;

use common::{TestClient, TestServer, ARTIST_1_NAME, DEMO_RELEASE_COUNT};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_home_and_about_pages() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_home().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<a href="/" class="active">Home</a>"#));

    let response = client.get_about().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(r#"<a href="/about" class="active">About</a>"#));
    assert!(body.contains("Version"));
}

#[tokio::test]
async fn test_artist_page() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_artist("1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains(&format!("<h1>{}</h1>", ARTIST_1_NAME)));
    assert!(body.contains(r#"<a href="/release/1">Album 1</a> (1991)"#));
}

#[tokio::test]
async fn test_artist_errors() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    for bad_id in ["abc", "0", "-1", "1.5"] {
        let response = client.get_artist(bad_id).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "id {:?}", bad_id);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "invalid artist ID" }));
    }

    let response = client.get_artist("9999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "artist not found" }));
}

#[tokio::test]
async fn test_release_page_and_errors() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_release("30").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("<h1>Album 30</h1>"));
    assert!(body.contains(r#"By <a href="/artist/30">Janes</a>"#));

    let response = client.get_release("x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "invalid release ID" }));

    let response = client.get_release("31").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "release not found" }));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_path("/albums").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("Not found"));
}

#[tokio::test]
async fn test_stats() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_stats().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["counts"]["releases"], DEMO_RELEASE_COUNT);
    assert_eq!(body["counts"]["artists"], DEMO_RELEASE_COUNT);
    assert_eq!(body["counts"]["indexed_releases"], DEMO_RELEASE_COUNT);
    assert!(body["uptime"].as_str().unwrap().starts_with("0d "));
}
