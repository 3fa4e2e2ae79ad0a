use anyhow::Context;
use serde_json::Value;

use crate::contract::model::{Mood, MoodEntry, Symptom};
use crate::infra::storage::entity::mood_entry;

pub fn entry_to_contract(m: mood_entry::Model) -> anyhow::Result<MoodEntry> {
    let mood: Mood = m.mood.parse().context("stored mood")?;
    Ok(MoodEntry {
        id: m.id,
        user_id: m.user_id,
        date: m.date,
        day: m.day,
        mood,
        notes: m.notes,
        symptoms: symptoms_from_json(m.symptoms)?,
        updated_at: m.updated_at,
    })
}

pub fn symptoms_to_json(symptoms: &[Symptom]) -> Value {
    Value::Array(
        symptoms
            .iter()
            .map(|s| Value::String(s.as_str().to_string()))
            .collect(),
    )
}

fn symptoms_from_json(v: Value) -> anyhow::Result<Vec<Symptom>> {
    if v.is_null() {
        return Ok(Vec::new());
    }
    let names: Vec<String> = serde_json::from_value(v).context("stored symptoms")?;
    names
        .iter()
        .map(|n| n.parse::<Symptom>().context("stored symptom"))
        .collect()
}
