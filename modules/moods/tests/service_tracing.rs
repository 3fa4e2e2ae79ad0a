//! The domain service emits its spans and log lines.

use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Utc};
use moods::contract::model::{DailyMoodCount, Mood, MoodCount, MoodEntry, MoodUpsert};
use moods::domain::error::DomainError;
use moods::domain::repo::{DayEntryDraft, MoodsRepository};
use moods::domain::service::{Service, ServiceConfig};
use std::sync::Arc;
use tracing_test::traced_test;
use uuid::Uuid;

#[derive(Default)]
struct MockMoodsRepository {
    entries: Mutex<Vec<MoodEntry>>,
}

#[async_trait::async_trait]
impl MoodsRepository for MockMoodsRepository {
    async fn list_since(&self, _user_id: Uuid, _since: DateTime<Utc>) -> Result<Vec<MoodEntry>> {
        anyhow::bail!("connection reset")
    }

    async fn upsert_day(&self, d: &DayEntryDraft) -> Result<Option<MoodEntry>> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.user_id == d.user_id && e.day == d.day)
        {
            if let Some(mood) = d.mood {
                existing.mood = mood;
            }
            if d.notes.is_some() {
                existing.notes = d.notes.clone();
            }
            return Ok(Some(existing.clone()));
        }
        let Some(mood) = d.mood else {
            return Ok(None);
        };
        let entry = MoodEntry {
            id: d.id,
            user_id: d.user_id,
            date: d.date,
            day: d.day,
            mood,
            notes: d.notes.clone(),
            symptoms: d.symptoms.clone().unwrap_or_default(),
            updated_at: d.updated_at,
        };
        entries.push(entry.clone());
        Ok(Some(entry))
    }

    async fn count_by_mood(&self, _user_id: Uuid) -> Result<Vec<MoodCount>> {
        Ok(Vec::new())
    }

    async fn count_by_mood_and_day(
        &self,
        _user_id: Uuid,
        _since: DateTime<Utc>,
    ) -> Result<Vec<DailyMoodCount>> {
        Ok(Vec::new())
    }
}

fn service() -> Service {
    Service::new(
        Arc::new(MockMoodsRepository::default()),
        ServiceConfig::default(),
    )
}

fn upsert(mood: Mood) -> MoodUpsert {
    MoodUpsert {
        date: None,
        mood: Some(mood),
        notes: None,
        symptoms: None,
    }
}

#[tokio::test]
#[traced_test]
async fn upsert_logs_create_then_update() {
    let svc = service();
    let user = Uuid::new_v4();

    svc.upsert(user, upsert(Mood::Happy)).await.unwrap();
    svc.upsert(user, upsert(Mood::Sad)).await.unwrap();

    assert!(logs_contain("moods.service.upsert"));
    assert!(logs_contain("Created mood entry"));
    assert!(logs_contain("Updated mood entry"));
}

#[tokio::test]
#[traced_test]
async fn repository_failures_become_database_errors() {
    let svc = service();
    let err = svc.list_recent(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::Database { ref message } if message.contains("connection reset")));
    assert!(logs_contain("moods.service.list_recent"));
}

#[tokio::test]
#[traced_test]
async fn long_notes_are_rejected_before_storage() {
    let svc = service();
    let err = svc
        .upsert(
            Uuid::new_v4(),
            MoodUpsert {
                notes: Some("é".repeat(501)),
                ..upsert(Mood::Neutral)
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "notes"));
    assert!(!logs_contain("Created mood entry"));
}

#[tokio::test]
#[traced_test]
async fn notes_only_upsert_needs_an_entry_for_the_day() {
    let svc = service();
    let user = Uuid::new_v4();
    let notes_only = MoodUpsert {
        mood: None,
        notes: Some("only notes".into()),
        ..upsert(Mood::Happy)
    };

    let err = svc.upsert(user, notes_only.clone()).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "mood"));
    assert_eq!(err.to_string(), "Mood is required");

    svc.upsert(user, upsert(Mood::Happy)).await.unwrap();
    let entry = svc.upsert(user, notes_only).await.unwrap();
    assert_eq!(entry.mood, Mood::Happy);
    assert_eq!(entry.notes.as_deref(), Some("only notes"));
    assert!(logs_contain("Updated mood entry"));
}
