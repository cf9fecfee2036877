//! HTTP-level tests for `/beats`: upload, ownership checks, release and the
//! paged listing envelope.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    body_json, build_test_app, delete_auth, get, get_auth, post_json_auth, put_json_auth,
    register_and_login, upload, TestApp,
};
use serde_json::json;

async fn upload_beat(app: &TestApp, token: &str, filename: &str) -> i64 {
    let response = upload(app, Method::POST, "/api/v1/beats", token, filename, b"ID3audio").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn producer_upload_creates_unreleased_beat() {
    let app = build_test_app();
    let (user_id, token) = register_and_login(&app, "djx", &["producer"]).await;

    let id = upload_beat(&app, &token, "dark trap.mp3").await;

    let json = body_json(get(&app, &format!("/api/v1/beats/{id}")).await).await;
    let beat = &json["data"];
    assert_eq!(beat["title"], "dark trap");
    assert_eq!(beat["prod_by"], "djx");
    assert_eq!(beat["user_id"], user_id);
    assert_eq!(beat["is_available"], false);

    let url = beat["file_url"].as_str().unwrap();
    assert!(url.starts_with("/media/audio/"));
    let key = url.trim_start_matches("/media/");
    let stored = std::fs::read(app.media.path().join(key)).unwrap();
    assert_eq!(stored, b"ID3audio");
}

#[tokio::test]
async fn upload_requires_producer_role() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "fan", &["artist"]).await;

    let response = upload(&app, Method::POST, "/api/v1/beats", &token, "a.mp3", b"x").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_rejects_bad_files() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "careless", &["producer"]).await;

    let response = upload(&app, Method::POST, "/api/v1/beats", &token, "cover.png", b"x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = upload(&app, Method::POST, "/api/v1/beats", &token, "noext", b"x").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = upload(&app, Method::POST, "/api/v1/beats", &token, "empty.wav", b"").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/v1/beats").await;
    assert_eq!(body_json(response).await["data"]["total"], 0);
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn owner_can_update_details() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "editor", &["producer"]).await;
    let id = upload_beat(&app, &token, "draft.wav").await;

    let uri = format!("/api/v1/beats/{id}");
    let body = json!({ "description": "808s", "co_prod": "friend" });
    let response = put_json_auth(&app, &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(&app, &uri).await).await;
    let beat = &json["data"];
    assert_eq!(beat["title"], "draft");
    assert_eq!(beat["description"], "808s");
    assert_eq!(beat["co_prod"], "friend");
}

#[tokio::test]
async fn foreign_beat_is_forbidden_and_missing_beat_is_not_found() {
    let app = build_test_app();
    let (_, owner) = register_and_login(&app, "owner", &["producer"]).await;
    let (_, other) = register_and_login(&app, "other", &["producer"]).await;
    let id = upload_beat(&app, &owner, "mine.mp3").await;

    let uri = format!("/api/v1/beats/{id}");
    let response = put_json_auth(&app, &uri, &other, json!({ "title": "stolen" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = delete_auth(&app, &uri, &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(&app, "/api/v1/beats/999", &other, json!({ "title": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete_auth(&app, "/api/v1/beats/999", &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The beat survived the foreign delete.
    let json = body_json(get(&app, &uri).await).await;
    let beat = &json["data"];
    assert_eq!(beat["title"], "mine");
}

#[tokio::test]
async fn owner_delete_removes_beat() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "cleaner", &["producer"]).await;
    let id = upload_beat(&app, &token, "gone.mp3").await;

    let uri = format!("/api/v1/beats/{id}");
    assert_eq!(delete_auth(&app, &uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete_auth(&app, &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_owner_can_no_longer_mutate_beat() {
    let app = build_test_app();
    let (user_id, token) = register_and_login(&app, "quitter", &["producer"]).await;
    let id = upload_beat(&app, &token, "left behind.mp3").await;

    let response = delete_auth(&app, &format!("/api/v1/users/{user_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let uri = format!("/api/v1/beats/{id}");
    let response = put_json_auth(&app, &uri, &token, json!({ "title": "renamed" })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(delete_auth(&app, &uri, &token).await.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(get(&app, &uri).await).await;
    assert_eq!(json["data"]["title"], "left behind");
}

#[tokio::test]
async fn invalid_details_are_rejected() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "verbose", &["producer"]).await;
    let id = upload_beat(&app, &token, "long.mp3").await;

    let uri = format!("/api/v1/beats/{id}");
    let body = json!({ "description": "d".repeat(256) });
    let response = put_json_auth(&app, &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Release and picture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn release_sets_details_and_availability() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "releaser", &["producer"]).await;
    let id = upload_beat(&app, &token, "take 3.mp3").await;

    let uri = format!("/api/v1/beats/{id}/release");
    let body = json!({
        "title": "Midnight",
        "description": "final mix",
        "co_prod": "guest",
        "prod_by": "releaser",
    });
    let response = post_json_auth(&app, &uri, &token, body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(&app, &format!("/api/v1/beats/{id}")).await).await;
    let beat = &json["data"];
    assert_eq!(beat["title"], "Midnight");
    assert_eq!(beat["description"], "final mix");
    assert_eq!(beat["co_prod"], "guest");
    assert_eq!(beat["prod_by"], "releaser");
    assert_eq!(beat["is_available"], true);
}

#[tokio::test]
async fn release_requires_a_title() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "untitled", &["producer"]).await;
    let id = upload_beat(&app, &token, "x.mp3").await;

    let uri = format!("/api/v1/beats/{id}/release");
    let response = post_json_auth(&app, &uri, &token, json!({ "title": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn picture_upload_updates_beat() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "designer", &["producer"]).await;
    let id = upload_beat(&app, &token, "art.mp3").await;

    let uri = format!("/api/v1/beats/{id}/picture");
    let response = upload(&app, Method::PUT, &uri, &token, "cover.jpg", b"jpeg").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(&app, &format!("/api/v1/beats/{id}")).await).await;
    let beat = &json["data"];
    assert!(beat["picture_url"].as_str().unwrap().ends_with(".jpg"));
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_pages_newest_first_with_real_total() {
    let app = build_test_app();
    let (_, token) = register_and_login(&app, "prolific", &["producer"]).await;
    let mut ids = Vec::new();
    for name in ["one.mp3", "two.mp3", "three.mp3"] {
        ids.push(upload_beat(&app, &token, name).await);
    }

    let json = body_json(get(&app, "/api/v1/beats?start=0&size=2").await).await;
    let page = &json["data"];
    assert_eq!(page["items"][0]["id"], ids[2]);
    assert_eq!(page["items"][1]["id"], ids[1]);
    assert_eq!(page["total"], 3);
    assert_eq!(page["has_next"], true);
    assert_eq!(page["has_previous"], false);

    let json = body_json(get(&app, "/api/v1/beats?start=2&size=2").await).await;
    let page = &json["data"];
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["id"], ids[0]);
    assert_eq!(page["page"], 1);
    assert_eq!(page["has_next"], false);
    assert_eq!(page["has_previous"], true);

    let json = body_json(get(&app, "/api/v1/beats?start=10").await).await;
    let page = &json["data"];
    assert!(page["items"].as_array().unwrap().is_empty());
    assert_eq!(page["total"], 3);
    assert_eq!(page["size"], 10);
}

#[tokio::test]
async fn invalid_page_parameters_are_rejected() {
    let app = build_test_app();

    for uri in [
        "/api/v1/beats?size=0",
        "/api/v1/beats?size=101",
        "/api/v1/beats?start=-1",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn my_beats_are_scoped_to_the_caller() {
    let app = build_test_app();
    let (_, first) = register_and_login(&app, "first", &["producer"]).await;
    let (_, second) = register_and_login(&app, "second", &["producer"]).await;
    upload_beat(&app, &first, "a.mp3").await;
    upload_beat(&app, &second, "b.mp3").await;
    upload_beat(&app, &first, "c.mp3").await;

    let json = body_json(get_auth(&app, "/api/v1/beats/my", &first).await).await;
    let page = &json["data"];
    assert_eq!(page["total"], 2);
    let titles: Vec<_> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["c", "a"]);

    let response = get(&app, "/api/v1/beats/my").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
