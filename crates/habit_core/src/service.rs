//! Habit store façade: owns the habit list and settings, applies mutations,
//! and persists after every change. Reads hand out cloned snapshots so the
//! stats engine computes over immutable input.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use parking_lot::RwLock;
use tracing::info;

use crate::habit::Habit;
use crate::settings::Settings;
use crate::storage;

pub struct HabitService {
    data_dir: PathBuf,
    habits: RwLock<Vec<Habit>>,
    settings: RwLock<Settings>,
}

pub struct HabitServiceBuilder {
    data_dir: Option<PathBuf>,
}

impl HabitServiceBuilder {
    pub fn new() -> Self {
        Self { data_dir: None }
    }

    pub fn data_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Loads persisted state, or seeds defaults when none exists.
    pub fn build(self) -> Result<HabitService> {
        let data_dir = self.data_dir.unwrap_or_else(storage::resolve_data_dir);
        let habits = storage::load_habits(&data_dir);
        let settings = storage::load_settings(&data_dir);
        info!(
            dir = %data_dir.display(),
            habit_count = habits.len(),
            "habit service ready"
        );
        Ok(HabitService {
            data_dir,
            habits: RwLock::new(habits),
            settings: RwLock::new(settings),
        })
    }
}

impl Default for HabitServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitService {
    pub fn builder() -> HabitServiceBuilder {
        HabitServiceBuilder::new()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Cloned snapshot; the engine reads this without holding any lock.
    pub fn habits(&self) -> Vec<Habit> {
        self.habits.read().clone()
    }

    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    pub fn toggle_day(&self, habit_id: &str, year: i32, month0: u32, day: u32) -> Result<()> {
        {
            let mut habits = self.habits.write();
            let habit = find_habit(&mut habits, habit_id)?;
            habit.toggle(year, month0, day);
        }
        self.persist_habits()
    }

    /// New habits pick up the current accent color and track weekends.
    pub fn add_habit(&self, name: impl Into<String>) -> Result<Habit> {
        let color = self.settings.read().theme_color.clone();
        let habit = Habit::new(next_habit_id(), name, color);
        self.habits.write().push(habit.clone());
        info!(id = %habit.id, "habit added");
        self.persist_habits()?;
        Ok(habit)
    }

    pub fn rename_habit(&self, habit_id: &str, name: impl Into<String>) -> Result<()> {
        {
            let mut habits = self.habits.write();
            find_habit(&mut habits, habit_id)?.name = name.into();
        }
        self.persist_habits()
    }

    pub fn set_weekends_off(&self, habit_id: &str, weekends_off: bool) -> Result<()> {
        {
            let mut habits = self.habits.write();
            find_habit(&mut habits, habit_id)?.weekends_off = weekends_off;
        }
        self.persist_habits()
    }

    pub fn delete_habit(&self, habit_id: &str) -> Result<()> {
        {
            let mut habits = self.habits.write();
            let before = habits.len();
            habits.retain(|habit| habit.id != habit_id);
            if habits.len() == before {
                bail!("no habit with id {habit_id}");
            }
        }
        info!(id = %habit_id, "habit deleted");
        self.persist_habits()
    }

    pub fn update_settings(&self, settings: Settings) -> Result<()> {
        *self.settings.write() = settings.clone();
        storage::save_settings(&self.data_dir, &settings)
    }

    fn persist_habits(&self) -> Result<()> {
        let habits = self.habits.read().clone();
        storage::save_habits(&self.data_dir, &habits)
    }
}

fn find_habit<'a>(habits: &'a mut [Habit], habit_id: &str) -> Result<&'a mut Habit> {
    match habits.iter_mut().find(|habit| habit.id == habit_id) {
        Some(habit) => Ok(habit),
        None => bail!("no habit with id {habit_id}"),
    }
}

/// Millisecond timestamp rendered as decimal — unique enough for habits
/// created by hand, stable forever after.
fn next_habit_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
