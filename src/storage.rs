use crate::errors::AppError;
use crate::models::{CompletionLog, Habit};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::BTreeMap;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

const HABITS_KEY: &str = "habits";

fn log_key(habit_id: &str) -> String {
    format!("logs:{habit_id}")
}

/// JSON document holding `habits` and one `logs:<id>` entry per habit.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct Store {
    entries: BTreeMap<String, Value>,
}

impl Store {
    pub fn get_habits(&self) -> Vec<Habit> {
        self.read(HABITS_KEY)
    }

    pub fn find_habit(&self, habit_id: &str) -> Option<Habit> {
        self.get_habits().into_iter().find(|habit| habit.id == habit_id)
    }

    /// Inserts the habit, or replaces the stored habit with the same id.
    pub fn save_habit(&mut self, habit: Habit) -> Result<(), AppError> {
        let mut habits = self.get_habits();
        match habits.iter_mut().find(|existing| existing.id == habit.id) {
            Some(existing) => *existing = habit,
            None => habits.push(habit),
        }
        self.write(HABITS_KEY.to_string(), &habits)
    }

    /// Returns whether a habit with that id was present.
    pub fn delete_habit(&mut self, habit_id: &str) -> Result<bool, AppError> {
        let mut habits = self.get_habits();
        let before = habits.len();
        habits.retain(|habit| habit.id != habit_id);
        let removed = habits.len() != before;
        self.write(HABITS_KEY.to_string(), &habits)?;
        Ok(removed)
    }

    pub fn get_log(&self, habit_id: &str) -> CompletionLog {
        self.read(&log_key(habit_id))
    }

    pub fn save_log(&mut self, habit_id: &str, log: &CompletionLog) -> Result<(), AppError> {
        self.write(log_key(habit_id), log)
    }

    pub fn delete_log(&mut self, habit_id: &str) {
        self.entries.remove(&log_key(habit_id));
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(value) = self.entries.get(key) else {
            return T::default();
        };
        match T::deserialize(value) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(key, "ignoring unreadable store entry: {err}");
                T::default()
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value).map_err(AppError::internal)?;
        self.entries.insert(key, value);
        Ok(())
    }
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/habits.json"))
}

pub async fn load_store(path: &Path) -> Store {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(store) => store,
            Err(err) => {
                error!("failed to parse data file: {err}");
                Store::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Store::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            Store::default()
        }
    }
}

pub async fn persist_store(path: &Path, store: &Store) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(store).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
