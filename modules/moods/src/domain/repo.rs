use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::contract::model::{DailyMoodCount, Mood, MoodCount, MoodEntry, Symptom};

/// Values for a day's entry. Optional fields left `None` keep what is stored
/// when the day already has an entry. Notes and symptoms are empty on insert;
/// a draft without a mood never inserts.
#[derive(Debug, Clone)]
pub struct DayEntryDraft {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub day: NaiveDate,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
    pub symptoms: Option<Vec<Symptom>>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait MoodsRepository: Send + Sync {
    /// Entries with `date >= since`, newest first.
    async fn list_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<MoodEntry>>;
    /// Insert the draft, or merge it into the existing entry for
    /// `(user_id, day)`. Returns the stored entry, or `None` when the draft has
    /// no mood and the day has no entry.
    async fn upsert_day(&self, draft: &DayEntryDraft) -> anyhow::Result<Option<MoodEntry>>;
    /// All-time count per mood.
    async fn count_by_mood(&self, user_id: Uuid) -> anyhow::Result<Vec<MoodCount>>;
    /// Count per (mood, day) for entries with `date >= since`, oldest day first.
    async fn count_by_mood_and_day(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DailyMoodCount>>;
}
