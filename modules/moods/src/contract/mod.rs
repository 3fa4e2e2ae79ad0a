pub mod model;

pub use model::{
    DailyMoodCount, Mood, MoodCount, MoodEntry, MoodStats, MoodUpsert, Symptom, UnknownValue,
};
