use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, Utc};
use tracing::warn;

use crate::api::models::{Mood, MoodSave};
use crate::api::ClientError;
use crate::context::AppContext;

/// Calendar key: `Y-M-D` with 1-based month and no zero padding.
pub fn date_key(year: i32, month: u32, day: u32) -> String {
    format!("{year}-{month}-{day}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub mood: Option<Mood>,
    pub is_today: bool,
}

/// Month view of saved moods. Days are UTC calendar days.
#[derive(Debug, Clone)]
pub struct MoodCalendar {
    year: i32,
    month: u32,
    moods: HashMap<String, Mood>,
    loading: bool,
}

impl MoodCalendar {
    /// `month` is 1-based and clamped to 1..=12.
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
            moods: HashMap::new(),
            loading: true,
        }
    }

    pub fn for_today() -> Self {
        let today = Utc::now().date_naive();
        Self::new(today.year(), today.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn select(&mut self, year: i32, month: u32) {
        self.year = year;
        self.month = month.clamp(1, 12);
    }

    pub fn mood_on(&self, day: u32) -> Option<Mood> {
        self.moods
            .get(&date_key(self.year, self.month, day))
            .copied()
    }

    fn first_of_month(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days_in_month(&self) -> u32 {
        let (ny, nm) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        match (self.first_of_month(), NaiveDate::from_ymd_opt(ny, nm, 1)) {
            (Some(first), Some(next)) => u32::try_from((next - first).num_days()).unwrap_or(0),
            _ => 0,
        }
    }

    /// Weekday of the 1st, Sunday = 0.
    pub fn first_weekday(&self) -> u32 {
        self.first_of_month()
            .map(|d| d.weekday().num_days_from_sunday())
            .unwrap_or(0)
    }

    /// Cells for a Sunday-first grid: leading blanks, then one cell per day.
    pub fn grid(&self, today: NaiveDate) -> Vec<Option<DayCell>> {
        let blanks = self.first_weekday() as usize;
        let mut cells: Vec<Option<DayCell>> = vec![None; blanks];
        cells.extend((1..=self.days_in_month()).map(|day| {
            Some(DayCell {
                day,
                mood: self.mood_on(day),
                is_today: NaiveDate::from_ymd_opt(self.year, self.month, day) == Some(today),
            })
        }));
        cells
    }

    /// Fetch recent entries into the calendar map. Without a token this is a
    /// no-op.
    pub async fn load(&mut self, ctx: &AppContext) {
        let Some(token) = ctx.session.token() else {
            self.loading = false;
            return;
        };
        match ctx.api.list_moods(&token).await {
            Ok(entries) => {
                self.moods = entries
                    .into_iter()
                    .map(|e| {
                        let d = e.date.date_naive();
                        (date_key(d.year(), d.month(), d.day()), e.mood)
                    })
                    .collect();
            }
            Err(e) => {
                warn!(error = %e, "Failed to load mood data");
                ctx.notifier.error("Failed to load mood data");
            }
        }
        self.loading = false;
    }

    /// Save `mood` for `day` of the selected month, at UTC midnight.
    pub async fn save_mood(
        &mut self,
        ctx: &AppContext,
        day: u32,
        mood: Mood,
    ) -> Result<(), ClientError> {
        let Some(token) = ctx.session.token() else {
            ctx.notifier.error("Please log in to track your mood");
            return Err(ClientError::Unauthenticated);
        };
        let date = NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            ClientError::InvalidInput(format!(
                "{} is not a valid date",
                date_key(self.year, self.month, day)
            ))
        })?;

        let save = MoodSave {
            date: Some(date.and_time(NaiveTime::MIN).and_utc()),
            mood,
            notes: None,
            symptoms: None,
        };
        match ctx.api.save_mood(&token, &save).await {
            Ok(_) => {
                self.moods
                    .insert(date_key(self.year, self.month, day), mood);
                ctx.notifier.success("Mood saved successfully!");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to save mood");
                ctx.notifier.error("Failed to save mood");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unpadded() {
        assert_eq!(date_key(2024, 3, 1), "2024-3-1");
    }

    #[test]
    fn grid_has_leading_blanks() {
        // 1 March 2024 was a Friday
        let cal = MoodCalendar::new(2024, 3);
        assert_eq!(cal.first_weekday(), 5);
        assert_eq!(cal.days_in_month(), 31);

        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let grid = cal.grid(today);
        assert_eq!(grid.len(), 5 + 31);
        assert!(grid[..5].iter().all(Option::is_none));
        let second = grid[6].as_ref().unwrap();
        assert_eq!(second.day, 2);
        assert!(second.is_today);
    }

    #[test]
    fn february_lengths() {
        assert_eq!(MoodCalendar::new(2024, 2).days_in_month(), 29);
        assert_eq!(MoodCalendar::new(2025, 2).days_in_month(), 28);
        assert_eq!(MoodCalendar::new(2025, 12).days_in_month(), 31);
    }
}
