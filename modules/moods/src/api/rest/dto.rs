use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::contract::model::{
    DailyMoodCount, Mood, MoodCount, MoodEntry, MoodStats, MoodUpsert, Symptom,
};
use crate::domain::dates::parse_entry_date;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoodDto {
    Happy,
    Sad,
    Angry,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SymptomDto {
    Headache,
    Cramps,
    Bloating,
    Fatigue,
    Nausea,
    None,
}

/// Body of `POST /moods`. Fields are checked by hand so that bad values are
/// reported as validation problems rather than JSON rejections.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertMoodReq {
    /// ISO date or timestamp; defaults to now.
    #[serde(default)]
    pub date: Option<String>,
    /// One of happy, sad, angry, neutral. Required unless the day already has
    /// an entry.
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub symptoms: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntryDto {
    pub id: Uuid,
    pub user: Uuid,
    pub date: DateTime<Utc>,
    pub mood: MoodDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub symptoms: Vec<SymptomDto>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OverallStatDto {
    #[serde(rename = "_id")]
    pub id: MoodDto,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyKeyDto {
    pub mood: MoodDto,
    /// `YYYY-MM-DD`, UTC.
    pub date: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlyStatDto {
    #[serde(rename = "_id")]
    pub id: MonthlyKeyDto,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MoodStatsDto {
    pub overall: Vec<OverallStatDto>,
    pub monthly: Vec<MonthlyStatDto>,
}

impl From<Mood> for MoodDto {
    fn from(m: Mood) -> Self {
        match m {
            Mood::Happy => MoodDto::Happy,
            Mood::Sad => MoodDto::Sad,
            Mood::Angry => MoodDto::Angry,
            Mood::Neutral => MoodDto::Neutral,
        }
    }
}

impl From<Symptom> for SymptomDto {
    fn from(s: Symptom) -> Self {
        match s {
            Symptom::Headache => SymptomDto::Headache,
            Symptom::Cramps => SymptomDto::Cramps,
            Symptom::Bloating => SymptomDto::Bloating,
            Symptom::Fatigue => SymptomDto::Fatigue,
            Symptom::Nausea => SymptomDto::Nausea,
            Symptom::None => SymptomDto::None,
        }
    }
}

impl TryFrom<UpsertMoodReq> for MoodUpsert {
    type Error = DomainError;

    fn try_from(req: UpsertMoodReq) -> Result<Self, Self::Error> {
        let mood = match req.mood.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => Some(m.parse::<Mood>().map_err(|_| {
                DomainError::validation("mood", format!("'{m}' is not a valid mood"))
            })?),
            _ => None,
        };

        let date = match req.date.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => Some(parse_entry_date(d)?),
            _ => None,
        };

        let symptoms = req
            .symptoms
            .map(|names| {
                names
                    .iter()
                    .map(|n| {
                        n.parse::<Symptom>().map_err(|_| {
                            DomainError::validation(
                                "symptoms",
                                format!("'{n}' is not a valid symptom"),
                            )
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(MoodUpsert {
            date,
            mood,
            notes: req.notes,
            symptoms,
        })
    }
}

impl From<MoodEntry> for MoodEntryDto {
    fn from(e: MoodEntry) -> Self {
        Self {
            id: e.id,
            user: e.user_id,
            date: e.date,
            mood: e.mood.into(),
            notes: e.notes,
            symptoms: e.symptoms.into_iter().map(Into::into).collect(),
            updated_at: e.updated_at,
        }
    }
}

impl From<MoodCount> for OverallStatDto {
    fn from(c: MoodCount) -> Self {
        Self {
            id: c.mood.into(),
            count: c.count,
        }
    }
}

impl From<DailyMoodCount> for MonthlyStatDto {
    fn from(c: DailyMoodCount) -> Self {
        Self {
            id: MonthlyKeyDto {
                mood: c.mood.into(),
                date: c.date.format("%Y-%m-%d").to_string(),
            },
            count: c.count,
        }
    }
}

impl From<MoodStats> for MoodStatsDto {
    fn from(s: MoodStats) -> Self {
        Self {
            overall: s.overall.into_iter().map(Into::into).collect(),
            monthly: s.monthly.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn req(v: serde_json::Value) -> UpsertMoodReq {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn mood_is_optional_but_checked() {
        let up = MoodUpsert::try_from(req(json!({ "notes": "x", "mood": " " }))).unwrap();
        assert_eq!(up.mood, None);
        assert_eq!(up.notes.as_deref(), Some("x"));

        let err = MoodUpsert::try_from(req(json!({ "mood": "ecstatic" }))).unwrap_err();
        assert_eq!(err.to_string(), "'ecstatic' is not a valid mood");
    }

    #[test]
    fn parses_date_and_symptoms() {
        let up = MoodUpsert::try_from(req(json!({
            "mood": "sad",
            "date": "2024-03-01",
            "symptoms": ["cramps", "none"]
        })))
        .unwrap();
        assert_eq!(up.mood, Some(Mood::Sad));
        assert_eq!(
            up.date.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(up.symptoms, Some(vec![Symptom::Cramps, Symptom::None]));
        assert!(up.notes.is_none());
    }

    #[test]
    fn unknown_symptom_is_rejected() {
        let err = MoodUpsert::try_from(req(json!({ "mood": "happy", "symptoms": ["flu"] })))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "symptoms"));
    }

    #[test]
    fn stats_use_mongo_style_keys() {
        let stats = MoodStats {
            overall: vec![MoodCount {
                mood: Mood::Happy,
                count: 3,
            }],
            monthly: vec![DailyMoodCount {
                mood: Mood::Sad,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                count: 1,
            }],
        };
        let v = serde_json::to_value(MoodStatsDto::from(stats)).unwrap();
        assert_eq!(
            v,
            json!({
                "overall": [{ "_id": "happy", "count": 3 }],
                "monthly": [{ "_id": { "mood": "sad", "date": "2024-03-01" }, "count": 1 }]
            })
        );
    }
}
