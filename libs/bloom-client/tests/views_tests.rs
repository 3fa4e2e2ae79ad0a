use std::sync::Arc;

use bloom_client::api::models::Mood;
use bloom_client::views::{MoodCalendar, MoodTracker, PasswordChangeOutcome, ProfileView, Settings};
use bloom_client::{
    ApiClient, AppContext, AppointmentBook, Doctor, LocalStore, MemoryStore, NoticeLevel,
    NoticeLog, Product,
};
use chrono::{NaiveDate, Utc};
use httpmock::prelude::*;
use serde_json::json;

struct Harness {
    ctx: AppContext,
    store: Arc<MemoryStore>,
    notices: Arc<NoticeLog>,
}

fn harness(server: &MockServer, token: Option<&str>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    if let Some(t) = token {
        store.set("token", t.to_string()).unwrap();
    }
    let notices = Arc::new(NoticeLog::new());
    let api = ApiClient::new(&format!("{}/api", server.base_url())).unwrap();
    Harness {
        ctx: AppContext::new(api, store.clone(), notices.clone()),
        store,
        notices,
    }
}

fn last_message(n: &NoticeLog) -> String {
    n.last().map(|n| n.message).unwrap_or_default()
}

#[tokio::test]
async fn calendar_loads_and_saves_moods() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/moods");
            then.status(200).json_body(json!([
                { "id": "a", "date": "2024-03-01T00:00:00Z", "mood": "happy" },
                { "id": "b", "date": "2024-03-04T15:30:00Z", "mood": "angry", "notes": "traffic" }
            ]));
        })
        .await;
    let save = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/moods")
                .json_body(json!({ "date": "2024-03-05T00:00:00Z", "mood": "sad" }));
            then.status(200).json_body(json!({
                "id": "c", "date": "2024-03-05T00:00:00Z", "mood": "sad"
            }));
        })
        .await;

    let h = harness(&server, Some("tok"));
    let mut cal = MoodCalendar::new(2024, 3);
    assert!(cal.is_loading());
    cal.load(&h.ctx).await;
    assert!(!cal.is_loading());
    assert_eq!(cal.mood_on(1), Some(Mood::Happy));
    assert_eq!(cal.mood_on(4), Some(Mood::Angry));
    assert_eq!(cal.mood_on(2), None);

    cal.save_mood(&h.ctx, 5, Mood::Sad).await.unwrap();
    save.assert_async().await;
    assert_eq!(cal.mood_on(5), Some(Mood::Sad));
    assert_eq!(last_message(&h.notices), "Mood saved successfully!");

    let grid = cal.grid(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    let fifth = grid.iter().flatten().find(|c| c.day == 5).unwrap();
    assert!(fifth.is_today);
    assert_eq!(fifth.mood, Some(Mood::Sad));
}

#[tokio::test]
async fn calendar_requires_login_to_save() {
    let server = MockServer::start_async().await;
    let h = harness(&server, None);
    let mut cal = MoodCalendar::new(2024, 3);

    cal.load(&h.ctx).await;
    assert!(!cal.is_loading());
    assert!(h.notices.notices().is_empty());

    assert!(cal.save_mood(&h.ctx, 1, Mood::Happy).await.is_err());
    assert_eq!(last_message(&h.notices), "Please log in to track your mood");
}

#[tokio::test]
async fn calendar_reports_server_failures() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.path("/api/moods");
            then.status(500).json_body(json!({ "detail": "An internal database error occurred" }));
        })
        .await;

    let h = harness(&server, Some("tok"));
    let mut cal = MoodCalendar::new(2024, 3);
    cal.load(&h.ctx).await;
    assert_eq!(last_message(&h.notices), "Failed to load mood data");

    assert!(cal.save_mood(&h.ctx, 2, Mood::Happy).await.is_err());
    let last = h.notices.last().unwrap();
    assert_eq!(last.level, NoticeLevel::Error);
    assert_eq!(last.message, "Failed to save mood");
    assert_eq!(cal.mood_on(2), None);
}

#[tokio::test]
async fn tracker_saves_notes_as_neutral_and_refreshes() {
    let server = MockServer::start_async().await;
    let today = Utc::now().to_rfc3339();
    let post = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/moods");
            then.status(200).json_body(json!({
                "id": "n1", "date": today, "mood": "neutral", "notes": "cramps eased"
            }));
        })
        .await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/moods");
            then.status(200).json_body(json!([
                { "id": "n1", "date": today, "mood": "neutral", "notes": "cramps eased" }
            ]));
        })
        .await;

    let h = harness(&server, Some("tok"));
    let mut tracker = MoodTracker::for_today();

    assert!(!tracker.save_notes(&h.ctx, "   ").await.unwrap());
    assert_eq!(post.hits_async().await, 0);

    assert!(tracker.save_notes(&h.ctx, "cramps eased").await.unwrap());
    post.assert_async().await;
    list.assert_async().await;
    assert_eq!(last_message(&h.notices), "Notes saved successfully!");
    assert_eq!(tracker.notes_history().len(), 1);

    let slices = tracker.distribution();
    assert_eq!(slices.len(), 1);
    assert_eq!(slices[0].mood, Mood::Neutral);
    assert_eq!(slices[0].percent, 100.0);
}

#[tokio::test]
async fn tracker_load_failure_sets_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/moods");
            then.status(500);
        })
        .await;

    let h = harness(&server, Some("tok"));
    let mut tracker = MoodTracker::new(2024, 3);
    assert!(tracker.load(&h.ctx).await.is_err());
    assert_eq!(
        tracker.error(),
        Some("Error fetching mood statistics. Please try again.")
    );
    assert!(!tracker.is_loading());
}

#[tokio::test]
async fn profile_view_manages_prescriptions() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/users/profile");
            then.status(200).json_body(json!({
                "id": "u1", "name": "Asha", "email": "asha@example.com",
                "prescriptions": [
                    { "id": "rx1", "name": "a.pdf", "fileUrl": "http://h/uploads/a.pdf", "uploadedAt": "2025-01-01T00:00:00Z" },
                    { "id": "rx2", "name": "b.pdf", "fileUrl": "http://h/uploads/b.pdf", "uploadedAt": "2025-01-02T00:00:00Z" }
                ]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/users/prescription/rx1");
            then.status(200).json_body(json!({ "message": "Prescription deleted successfully" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/users/prescription/missing");
            then.status(404).json_body(json!({ "detail": "Prescription not found" }));
        })
        .await;

    let h = harness(&server, Some("tok"));
    let mut view = ProfileView::new();
    view.load(&h.ctx).await.unwrap();
    assert_eq!(view.profile().unwrap().prescriptions.len(), 2);

    view.delete_prescription(&h.ctx, "rx1").await.unwrap();
    let remaining: Vec<&str> = view
        .profile()
        .unwrap()
        .prescriptions
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(remaining, vec!["rx2"]);
    assert_eq!(last_message(&h.notices), "Prescription deleted successfully");

    assert!(view.delete_prescription(&h.ctx, "missing").await.is_err());
    assert_eq!(last_message(&h.notices), "Error deleting prescription");
}

#[tokio::test]
async fn profile_view_surfaces_upload_validation_messages() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Some("tok"));
    let mut view = ProfileView::new();

    let result = view
        .upload_image(
            &h.ctx,
            bloom_client::FileUpload {
                file_name: "notes.txt".into(),
                content_type: "text/plain".into(),
                bytes: b"hi".to_vec(),
            },
        )
        .await;
    assert!(result.is_err());
    assert_eq!(
        last_message(&h.notices),
        "Please upload an image file (JPEG, PNG, etc.)"
    );
}

#[tokio::test]
async fn context_state_is_shared_through_the_store() {
    let server = MockServer::start_async().await;
    let mut h = harness(&server, None);

    let product = |id, price| Product {
        id,
        name: format!("Kit {id}"),
        price,
        image: String::new(),
    };
    h.ctx.add_to_cart(&product(3, 1499.0)).unwrap();
    h.ctx.add_to_cart(&product(2, 599.0)).unwrap();
    h.ctx.add_to_cart(&product(2, 599.0)).unwrap();
    assert_eq!(h.ctx.cart.total(), 2697.0);
    assert_eq!(last_message(&h.notices), "Kit 2 added to cart!");

    let doctor = Doctor {
        id: 1,
        name: "Dr. Rao".into(),
        specialization: "Urologist".into(),
        phone: "555-0100".into(),
        address: "1 Main St".into(),
    };
    let appt = h.ctx.book_appointment(&doctor).unwrap();
    assert!(h.ctx.cancel_appointment(appt.id).unwrap());
    assert_eq!(last_message(&h.notices), "Appointment cancelled successfully");

    // a second context over the same store sees the same state
    let again = AppContext::new(
        h.ctx.api.clone(),
        h.store.clone(),
        Arc::new(NoticeLog::new()),
    );
    assert_eq!(again.cart.count(), 3);
    assert_eq!(again.appointments.list().len(), 1);

    assert!(h.ctx.delete_appointment(appt.id).unwrap());
    assert_eq!(last_message(&h.notices), "Appointment deleted");
    assert!(!h.ctx.delete_appointment(appt.id).unwrap());
    assert!(AppointmentBook::load(h.store.clone()).list().is_empty());
}

#[tokio::test]
async fn settings_never_pretend_to_change_the_password() {
    let server = MockServer::start_async().await;
    let h = harness(&server, Some("tok"));
    let mut settings = Settings::new();

    settings.password.current = "old".into();
    settings.password.new = "new-secret".into();
    settings.password.confirm = "typo".into();
    assert_eq!(
        settings.submit_password(&h.ctx),
        PasswordChangeOutcome::Mismatch
    );
    assert_eq!(last_message(&h.notices), "New passwords do not match");
    assert_eq!(settings.password.new, "new-secret");

    settings.password.confirm = "new-secret".into();
    assert_eq!(
        settings.submit_password(&h.ctx),
        PasswordChangeOutcome::Unsupported
    );
    assert_eq!(h.notices.last().unwrap().level, NoticeLevel::Info);
    assert!(settings.password.new.is_empty());

    settings.notifications.sms = true;
    settings.save_notifications(&h.ctx);
    assert_eq!(last_message(&h.notices), "Notification preferences saved!");
}
