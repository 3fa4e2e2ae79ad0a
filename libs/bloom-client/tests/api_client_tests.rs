use std::sync::Arc;

use bloom_client::api::models::{Mood, MoodSave};
use bloom_client::{ApiClient, AuthState, ClientError, FileUpload, MemoryStore, Session};
use httpmock::prelude::*;
use serde_json::json;

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.base_url())).unwrap()
}

fn user_json() -> serde_json::Value {
    json!({ "id": "4f0c", "name": "Asha", "email": "asha@example.com", "gender": null })
}

#[tokio::test]
async fn login_stores_token_and_user() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/users/login")
                .json_body(json!({ "email": "asha@example.com", "password": "secret1" }));
            then.status(200)
                .json_body(json!({ "token": "tok-1", "user": user_json() }));
        })
        .await;

    let session = Session::new(Arc::new(MemoryStore::new()));
    assert!(!session.is_logged_in());
    let user = session
        .login(&client(&server), "asha@example.com", "secret1")
        .await
        .unwrap();

    m.assert_async().await;
    assert_eq!(user.name, "Asha");
    assert!(session.is_logged_in());
    assert_eq!(session.token().as_deref(), Some("tok-1"));
    assert_eq!(session.user().unwrap().email, "asha@example.com");
}

#[tokio::test]
async fn problem_detail_becomes_the_error_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/users/login");
            then.status(400)
                .header("content-type", "application/problem+json")
                .json_body(json!({
                    "type": "https://errors.bloomwell.app/USERS_INVALID_CREDENTIALS",
                    "title": "Invalid credentials",
                    "status": 400,
                    "detail": "Invalid credentials",
                    "code": "USERS_INVALID_CREDENTIALS"
                }));
        })
        .await;

    let err = client(&server).login("a@x.com", "nope").await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn legacy_message_field_and_bare_status_are_understood() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/moods");
            then.status(401)
                .json_body(json!({ "message": "Token is not valid or has expired" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/moods/stats");
            then.status(503).body("upstream down");
        })
        .await;

    let api = client(&server);
    let err = api.list_moods("t").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Token is not valid or has expired");

    let err = api.mood_stats("t").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Service Unavailable");
}

#[tokio::test]
async fn bearer_token_is_attached_and_stats_decode() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/moods/stats")
                .header("authorization", "Bearer tok-9");
            then.status(200).json_body(json!({
                "overall": [{ "_id": "happy", "count": 2 }],
                "monthly": [{ "_id": { "mood": "happy", "date": "2024-03-01" }, "count": 1 }]
            }));
        })
        .await;

    let stats = client(&server).mood_stats("tok-9").await.unwrap();
    m.assert_async().await;
    assert_eq!(stats.overall[0].mood, Mood::Happy);
    assert_eq!(stats.monthly[0].key.date, "2024-03-01");
}

#[tokio::test]
async fn save_mood_sends_date_and_mood() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/moods")
                .json_body(json!({ "date": "2024-03-01T00:00:00Z", "mood": "sad" }));
            then.status(200).json_body(json!({
                "id": "e1", "user": "u1", "date": "2024-03-01T00:00:00Z",
                "mood": "sad", "symptoms": [], "updatedAt": "2024-03-01T08:00:00Z"
            }));
        })
        .await;

    let save = MoodSave {
        date: Some("2024-03-01T00:00:00Z".parse().unwrap()),
        mood: Mood::Sad,
        notes: None,
        symptoms: None,
    };
    let entry = client(&server).save_mood("t", &save).await.unwrap();
    m.assert_async().await;
    assert_eq!(entry.mood, Mood::Sad);
    assert!(entry.notes.is_none());
}

#[tokio::test]
async fn uploads_are_checked_before_sending() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200);
        })
        .await;
    let api = client(&server);

    let big = FileUpload {
        file_name: "me.png".into(),
        content_type: "image/png".into(),
        bytes: vec![0; 5 * 1024 * 1024 + 1],
    };
    let err = api.upload_profile_image("t", big).await.unwrap_err();
    assert_eq!(err.to_string(), "File size should be less than 5MB");

    let pdf = FileUpload {
        file_name: "me.pdf".into(),
        content_type: "application/pdf".into(),
        bytes: b"%PDF".to_vec(),
    };
    let err = api.upload_profile_image("t", pdf).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidFile(_)));

    let text = FileUpload {
        file_name: "rx.txt".into(),
        content_type: "text/plain".into(),
        bytes: b"hello".to_vec(),
    };
    let err = api.upload_prescription("t", text).await.unwrap_err();
    assert_eq!(err.to_string(), "Please upload a PDF or image file");

    assert_eq!(m.hits_async().await, 0);
}

#[tokio::test]
async fn prescription_upload_posts_multipart() {
    let server = MockServer::start_async().await;
    let m = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/users/upload-prescription")
                .header_exists("content-type");
            then.status(201).json_body(json!({
                "id": "rx1",
                "name": "rx.pdf",
                "fileUrl": "http://localhost:5002/uploads/profile-images/1-2.pdf",
                "uploadedAt": "2025-01-10T09:00:00Z"
            }));
        })
        .await;

    let rx = client(&server)
        .upload_prescription(
            "t",
            FileUpload {
                file_name: "rx.pdf".into(),
                content_type: "application/pdf".into(),
                bytes: b"%PDF-1.4".to_vec(),
            },
        )
        .await
        .unwrap();
    m.assert_async().await;
    assert_eq!(rx.name, "rx.pdf");
}

#[tokio::test]
async fn verify_clears_a_rejected_session() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/profile")
                .header("authorization", "Bearer good");
            then.status(200)
                .json_body(json!({ "id": "u1", "name": "Asha", "email": "asha@example.com" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/users/profile")
                .header("authorization", "Bearer stale");
            then.status(401).json_body(json!({ "detail": "Token is not valid or has expired" }));
        })
        .await;

    let api = client(&server);
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(store.clone());
    assert_eq!(session.verify(&api).await, AuthState::Unauthenticated);

    use bloom_client::LocalStore;
    store.set("token", "good".into()).unwrap();
    assert_eq!(session.verify(&api).await, AuthState::Authenticated);

    store.set("token", "stale".into()).unwrap();
    store.set("user", user_json().to_string()).unwrap();
    assert_eq!(session.verify(&api).await, AuthState::Unauthenticated);
    assert!(session.token().is_none());
    assert!(!session.is_logged_in());
    assert!(session.user().is_none());
}
