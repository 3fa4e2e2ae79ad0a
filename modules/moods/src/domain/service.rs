use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::contract::model::{MoodEntry, MoodStats, MoodUpsert};
use crate::domain::dates::utc_day;
use crate::domain::error::DomainError;
use crate::domain::repo::{DayEntryDraft, MoodsRepository};

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Trailing window for the recent list and the per-day stats.
    pub window_days: i64,
    pub max_notes_len: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            max_notes_len: 500,
        }
    }
}

#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn MoodsRepository>,
    config: ServiceConfig,
}

impl Service {
    pub fn new(repo: Arc<dyn MoodsRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(name = "moods.service.list_recent", skip(self), fields(user_id = %user_id))]
    pub async fn list_recent(&self, user_id: Uuid) -> Result<Vec<MoodEntry>, DomainError> {
        debug!("Listing recent moods");

        let since = Utc::now() - Duration::days(self.config.window_days);
        let entries = self
            .repo
            .list_since(user_id, since)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!(count = entries.len(), "Loaded mood entries");
        Ok(entries)
    }

    /// Record the mood for the UTC day of `upsert.date` (today when absent).
    ///
    /// A second save on the same day updates the existing entry and keeps its
    /// original timestamp. The mood may be left out only when the day already
    /// has an entry.
    #[instrument(
        name = "moods.service.upsert",
        skip(self, upsert),
        fields(user_id = %user_id, mood = ?upsert.mood)
    )]
    pub async fn upsert(&self, user_id: Uuid, upsert: MoodUpsert) -> Result<MoodEntry, DomainError> {
        info!("Saving mood");

        let notes = upsert
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(n) = &notes {
            if n.chars().count() > self.config.max_notes_len {
                return Err(DomainError::validation(
                    "notes",
                    format!(
                        "Notes cannot be longer than {} characters",
                        self.config.max_notes_len
                    ),
                ));
            }
        }

        let now = Utc::now();
        let date = upsert.date.unwrap_or(now);
        let draft = DayEntryDraft {
            id: Uuid::new_v4(),
            user_id,
            date,
            day: utc_day(date),
            mood: upsert.mood,
            notes,
            symptoms: upsert.symptoms,
            updated_at: now,
        };

        let entry = self
            .repo
            .upsert_day(&draft)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::validation("mood", "Mood is required"))?;
        if entry.id == draft.id {
            info!(entry_id = %entry.id, day = %entry.day, "Created mood entry");
        } else {
            info!(entry_id = %entry.id, day = %entry.day, "Updated mood entry");
        }
        Ok(entry)
    }

    #[instrument(name = "moods.service.stats", skip(self), fields(user_id = %user_id))]
    pub async fn stats(&self, user_id: Uuid) -> Result<MoodStats, DomainError> {
        debug!("Computing mood stats");

        let overall = self
            .repo
            .count_by_mood(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        let since = Utc::now() - Duration::days(self.config.window_days);
        let monthly = self
            .repo
            .count_by_mood_and_day(user_id, since)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        Ok(MoodStats { overall, monthly })
    }
}
