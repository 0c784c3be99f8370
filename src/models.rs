use crate::calendar::{DateKey, Day};
use crate::stats::HabitStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub created_at: DateTime<Utc>,
}

/// Sparse completion map; a missing key and `false` both mean not completed.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct CompletionLog(BTreeMap<String, bool>);

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, key: &DateKey) -> bool {
        self.0.get(key.as_str()).copied().unwrap_or(false)
    }

    pub fn mark(&mut self, key: &DateKey) {
        self.0.insert(key.to_string(), true);
    }

    pub fn unmark(&mut self, key: &DateKey) {
        self.0.remove(key.as_str());
    }

    /// Flips the completion state of a day and returns the new state.
    pub fn toggle(&mut self, key: &DateKey) -> bool {
        if self.is_completed(key) {
            self.unmark(key);
            false
        } else {
            self.mark(key);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, bool)> for CompletionLog {
    fn from_iter<T: IntoIterator<Item = (String, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for CompletionLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Stored logs may hold anything under a date key; only a literal `true` counts.
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(key, value)| (key, value.as_bool().unwrap_or(false)))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
pub struct HabitRequest {
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeatmapDay {
    pub date: DateKey,
    pub completed: bool,
    pub is_today: bool,
    pub is_future: bool,
}

impl HeatmapDay {
    pub fn new(day: &Day, log: &CompletionLog) -> Self {
        Self {
            date: day.key.clone(),
            completed: log.is_completed(&day.key),
            is_today: day.is_today,
            is_future: day.is_future,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Habit,
    pub stats: HabitStats,
    pub heatmap: Vec<HeatmapDay>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub habit_id: String,
    pub reference_date: DateKey,
    #[serde(flatten)]
    pub stats: HabitStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_boolean_entries_load_as_not_completed() {
        let raw = r#"{
            "2026-01-01": true,
            "2026-01-02": "yes",
            "2026-01-03": 1,
            "2026-01-04": null,
            "2026-01-05": false
        }"#;
        let log: CompletionLog = serde_json::from_str(raw).unwrap();

        assert!(log.is_completed(&DateKey::parse("2026-01-01").unwrap()));
        for key in ["2026-01-02", "2026-01-03", "2026-01-04", "2026-01-05", "2026-01-06"] {
            assert!(!log.is_completed(&DateKey::parse(key).unwrap()), "{key}");
        }
    }

    #[test]
    fn toggle_keeps_the_log_sparse() {
        let key = DateKey::parse("2026-02-14").unwrap();
        let mut log = CompletionLog::new();

        assert!(log.toggle(&key));
        assert!(log.is_completed(&key));
        assert!(!log.toggle(&key));
        assert!(log.is_empty());
    }
}
