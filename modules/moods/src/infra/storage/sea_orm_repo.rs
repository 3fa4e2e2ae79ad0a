//! SeaORM-backed repository implementation for the moods port.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::contract::model::{DailyMoodCount, Mood, MoodCount, MoodEntry};
use crate::domain::repo::{DayEntryDraft, MoodsRepository};
use crate::infra::storage::entity::mood_entry;
use crate::infra::storage::mapper::{entry_to_contract, symptoms_to_json};

#[derive(Debug, FromQueryResult)]
struct MoodCountRow {
    mood: String,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct DailyMoodCountRow {
    mood: String,
    day: NaiveDate,
    count: i64,
}

fn to_count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}

pub struct SeaOrmMoodsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmMoodsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn find_day(&self, user_id: Uuid, day: NaiveDate) -> anyhow::Result<Option<MoodEntry>> {
        mood_entry::Entity::find()
            .filter(mood_entry::Column::UserId.eq(user_id))
            .filter(mood_entry::Column::Day.eq(day))
            .one(&self.conn)
            .await
            .context("find_day failed")?
            .map(entry_to_contract)
            .transpose()
    }

    /// Merge a mood-less draft into the day's entry; `None` when there is none.
    async fn update_day(&self, d: &DayEntryDraft) -> anyhow::Result<Option<MoodEntry>> {
        let mut update = mood_entry::Entity::update_many()
            .col_expr(mood_entry::Column::UpdatedAt, Expr::value(d.updated_at));
        if let Some(notes) = &d.notes {
            update = update.col_expr(mood_entry::Column::Notes, Expr::value(notes.clone()));
        }
        if let Some(symptoms) = &d.symptoms {
            update = update.col_expr(
                mood_entry::Column::Symptoms,
                Expr::value(symptoms_to_json(symptoms)),
            );
        }

        let res = update
            .filter(mood_entry::Column::UserId.eq(d.user_id))
            .filter(mood_entry::Column::Day.eq(d.day))
            .exec(&self.conn)
            .await
            .context("update_day failed")?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        self.find_day(d.user_id, d.day).await
    }
}

#[async_trait::async_trait]
impl<C> MoodsRepository for SeaOrmMoodsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn list_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<MoodEntry>> {
        let rows = mood_entry::Entity::find()
            .filter(mood_entry::Column::UserId.eq(user_id))
            .filter(mood_entry::Column::Date.gte(since))
            .order_by_desc(mood_entry::Column::Date)
            .all(&self.conn)
            .await
            .context("list_since failed")?;
        rows.into_iter().map(entry_to_contract).collect()
    }

    async fn upsert_day(&self, d: &DayEntryDraft) -> anyhow::Result<Option<MoodEntry>> {
        let Some(mood) = d.mood else {
            return self.update_day(d).await;
        };

        let m = mood_entry::ActiveModel {
            id: Set(d.id),
            user_id: Set(d.user_id),
            date: Set(d.date),
            day: Set(d.day),
            mood: Set(mood.as_str().to_string()),
            notes: Set(d.notes.clone()),
            symptoms: Set(symptoms_to_json(d.symptoms.as_deref().unwrap_or_default())),
            created_at: Set(d.updated_at),
            updated_at: Set(d.updated_at),
        };

        // id, date and created_at of an existing entry are never touched
        let mut update = vec![mood_entry::Column::Mood, mood_entry::Column::UpdatedAt];
        if d.notes.is_some() {
            update.push(mood_entry::Column::Notes);
        }
        if d.symptoms.is_some() {
            update.push(mood_entry::Column::Symptoms);
        }

        mood_entry::Entity::insert(m)
            .on_conflict(
                OnConflict::columns([mood_entry::Column::UserId, mood_entry::Column::Day])
                    .update_columns(update)
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("upsert_day failed")?;

        let stored = self
            .find_day(d.user_id, d.day)
            .await?
            .with_context(|| format!("no mood entry for {} after upsert", d.day))?;
        Ok(Some(stored))
    }

    async fn count_by_mood(&self, user_id: Uuid) -> anyhow::Result<Vec<MoodCount>> {
        let rows = mood_entry::Entity::find()
            .select_only()
            .column(mood_entry::Column::Mood)
            .column_as(Expr::col(mood_entry::Column::Id).count(), "count")
            .filter(mood_entry::Column::UserId.eq(user_id))
            .group_by(mood_entry::Column::Mood)
            .order_by_asc(mood_entry::Column::Mood)
            .into_model::<MoodCountRow>()
            .all(&self.conn)
            .await
            .context("count_by_mood failed")?;

        rows.into_iter()
            .map(|r| {
                Ok(MoodCount {
                    mood: r.mood.parse::<Mood>().context("stored mood")?,
                    count: to_count(r.count),
                })
            })
            .collect()
    }

    async fn count_by_mood_and_day(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> anyhow::Result<Vec<DailyMoodCount>> {
        let rows = mood_entry::Entity::find()
            .select_only()
            .column(mood_entry::Column::Mood)
            .column(mood_entry::Column::Day)
            .column_as(Expr::col(mood_entry::Column::Id).count(), "count")
            .filter(mood_entry::Column::UserId.eq(user_id))
            .filter(mood_entry::Column::Date.gte(since))
            .group_by(mood_entry::Column::Mood)
            .group_by(mood_entry::Column::Day)
            .order_by_asc(mood_entry::Column::Day)
            .order_by_asc(mood_entry::Column::Mood)
            .into_model::<DailyMoodCountRow>()
            .all(&self.conn)
            .await
            .context("count_by_mood_and_day failed")?;

        rows.into_iter()
            .map(|r| {
                Ok(DailyMoodCount {
                    mood: r.mood.parse::<Mood>().context("stored mood")?,
                    date: r.day,
                    count: to_count(r.count),
                })
            })
            .collect()
    }
}
