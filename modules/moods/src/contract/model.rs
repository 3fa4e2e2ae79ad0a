use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownValue {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Angry, Mood::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Neutral => "neutral",
        }
    }
}

impl FromStr for Mood {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownValue {
                kind: "mood",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symptom {
    Headache,
    Cramps,
    Bloating,
    Fatigue,
    Nausea,
    None,
}

impl Symptom {
    pub const ALL: [Symptom; 6] = [
        Symptom::Headache,
        Symptom::Cramps,
        Symptom::Bloating,
        Symptom::Fatigue,
        Symptom::Nausea,
        Symptom::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Symptom::Headache => "headache",
            Symptom::Cramps => "cramps",
            Symptom::Bloating => "bloating",
            Symptom::Fatigue => "fatigue",
            Symptom::Nausea => "nausea",
            Symptom::None => "none",
        }
    }
}

impl FromStr for Symptom {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symptom::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownValue {
                kind: "symptom",
                value: s.to_string(),
            })
    }
}

/// One user's mood for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Timestamp of the first save for the day; later saves keep it.
    pub date: DateTime<Utc>,
    /// UTC calendar day of `date`, the uniqueness key together with `user_id`.
    pub day: NaiveDate,
    pub mood: Mood,
    pub notes: Option<String>,
    pub symptoms: Vec<Symptom>,
    pub updated_at: DateTime<Utc>,
}

/// Create-or-update request for the day containing `date`.
///
/// `None` for `mood`/`notes`/`symptoms` keeps the stored value on update. A
/// day without an entry needs a mood.
#[derive(Debug, Clone)]
pub struct MoodUpsert {
    pub date: Option<DateTime<Utc>>,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
    pub symptoms: Option<Vec<Symptom>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCount {
    pub mood: Mood,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMoodCount {
    pub mood: Mood,
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoodStats {
    /// All-time count per mood.
    pub overall: Vec<MoodCount>,
    /// Count per (mood, day) over the trailing window, oldest day first.
    pub monthly: Vec<DailyMoodCount>,
}
