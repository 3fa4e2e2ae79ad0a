use chrono::{Datelike, Utc};
use tracing::warn;

use crate::api::models::{Mood, MoodEntry, MoodSave};
use crate::api::ClientError;
use crate::context::AppContext;

#[derive(Debug, Clone, PartialEq)]
pub struct MoodSlice {
    pub mood: Mood,
    pub label: &'static str,
    pub count: usize,
    /// Share of the month's entries, 0..=100.
    pub percent: f64,
}

/// Tracking page: per-month mood distribution and the notes history.
#[derive(Debug, Clone)]
pub struct MoodTracker {
    year: i32,
    month: u32,
    entries: Vec<MoodEntry>,
    loading: bool,
    error: Option<String>,
}

impl MoodTracker {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.clamp(1, 12),
            entries: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn for_today() -> Self {
        let today = Utc::now().date_naive();
        Self::new(today.year(), today.month())
    }

    pub fn select(&mut self, year: i32, month: u32) {
        self.year = year;
        self.month = month.clamp(1, 12);
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub async fn load(&mut self, ctx: &AppContext) -> Result<(), ClientError> {
        let token = ctx.session.require_token()?;
        self.loading = true;
        self.error = None;
        let result = ctx.api.list_moods(&token).await;
        self.loading = false;

        match result {
            Ok(entries) => {
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch moods");
                self.error = Some("Error fetching mood statistics. Please try again.".to_string());
                Err(e)
            }
        }
    }

    /// Counts for entries whose UTC month and year match the selection.
    /// Moods with no entries are left out.
    pub fn distribution(&self) -> Vec<MoodSlice> {
        let in_month: Vec<&MoodEntry> = self
            .entries
            .iter()
            .filter(|e| e.date.month() == self.month && e.date.year() == self.year)
            .collect();
        let total = in_month.len();

        Mood::ALL
            .into_iter()
            .filter_map(|mood| {
                let count = in_month.iter().filter(|e| e.mood == mood).count();
                (count > 0).then(|| MoodSlice {
                    mood,
                    label: mood.label(),
                    count,
                    percent: count as f64 * 100.0 / total as f64,
                })
            })
            .collect()
    }

    pub fn notes_history(&self) -> Vec<&MoodEntry> {
        self.entries
            .iter()
            .filter(|e| e.notes.as_deref().is_some_and(|n| !n.is_empty()))
            .collect()
    }

    /// Save today's notes. Today's mood is set to neutral, as on the web
    /// page. Blank notes are ignored and return `Ok(false)`.
    pub async fn save_notes(&mut self, ctx: &AppContext, notes: &str) -> Result<bool, ClientError> {
        if notes.trim().is_empty() {
            return Ok(false);
        }
        let token = ctx.session.require_token()?;

        self.loading = true;
        let save = MoodSave {
            date: Some(Utc::now()),
            mood: Mood::Neutral,
            notes: Some(notes.to_string()),
            symptoms: None,
        };
        let result = ctx.api.save_mood(&token, &save).await;
        self.loading = false;

        match result {
            Ok(_) => {
                ctx.notifier.success("Notes saved successfully!");
                if let Err(e) = self.load(ctx).await {
                    warn!(error = %e, "Refresh after saving notes failed");
                }
                Ok(true)
            }
            Err(e) => {
                ctx.notifier.error("Error saving notes. Please try again.");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(y: i32, m: u32, d: u32, mood: Mood, notes: Option<&str>) -> MoodEntry {
        MoodEntry {
            id: format!("{y}{m}{d}"),
            date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            mood,
            notes: notes.map(str::to_string),
            symptoms: Vec::new(),
        }
    }

    #[test]
    fn distribution_filters_on_month_and_year() {
        let mut t = MoodTracker::new(2024, 3);
        t.entries = vec![
            entry(2024, 3, 1, Mood::Happy, None),
            entry(2024, 3, 2, Mood::Happy, None),
            entry(2024, 3, 3, Mood::Sad, None),
            entry(2024, 3, 4, Mood::Angry, None),
            entry(2023, 3, 5, Mood::Sad, None),
            entry(2024, 4, 1, Mood::Neutral, None),
        ];

        let slices = t.distribution();
        let summary: Vec<(Mood, usize)> = slices.iter().map(|s| (s.mood, s.count)).collect();
        assert_eq!(
            summary,
            vec![(Mood::Happy, 2), (Mood::Sad, 1), (Mood::Angry, 1)]
        );
        assert_eq!(slices[0].percent, 50.0);
        assert_eq!(slices[0].label, "Happy 😊");
    }

    #[test]
    fn empty_month_has_no_slices() {
        let t = MoodTracker::new(2020, 1);
        assert!(t.distribution().is_empty());
    }

    #[test]
    fn notes_history_skips_empty_notes() {
        let mut t = MoodTracker::new(2024, 3);
        t.entries = vec![
            entry(2024, 3, 1, Mood::Happy, Some("ok")),
            entry(2024, 3, 2, Mood::Sad, Some("")),
            entry(2024, 3, 3, Mood::Sad, None),
        ];
        let notes = t.notes_history();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].notes.as_deref(), Some("ok"));
    }
}
