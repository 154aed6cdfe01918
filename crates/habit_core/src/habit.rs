use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar;

/// The single calendar year this deployment tracks.
pub const TRACKED_YEAR: i32 = 2026;

/// Key into a habit's completion map: 0-based month index plus year,
/// e.g. `"0-2026"` for January 2026.
pub fn month_key(year: i32, month0: u32) -> String {
    format!("{month0}-{year}")
}

/// A tracked behavior. Field names serialize in camelCase so state written
/// by earlier builds of the tracker loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub completions: BTreeMap<String, Vec<u32>>,
    pub color: String,
    #[serde(default)]
    pub weekends_off: bool,
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            completions: BTreeMap::new(),
            color: color.into(),
            weekends_off: false,
        }
    }

    /// The stored day list for a month, exactly as persisted. Absent key
    /// means no completions.
    pub fn raw_days(&self, year: i32, month0: u32) -> &[u32] {
        self.completions
            .get(&month_key(year, month0))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Completed days clamped to the month's real calendar. Stored values
    /// outside `[1, days_in_month]` can predate schema changes and are
    /// ignored rather than trusted.
    pub fn completed_days(&self, year: i32, month0: u32) -> Vec<u32> {
        let last = calendar::days_in_month(year, month0);
        self.raw_days(year, month0)
            .iter()
            .copied()
            .filter(|&day| (1..=last).contains(&day))
            .collect()
    }

    pub fn completed_count(&self, year: i32, month0: u32) -> u32 {
        self.completed_days(year, month0).len() as u32
    }

    pub fn is_completed(&self, year: i32, month0: u32, day: u32) -> bool {
        self.raw_days(year, month0).contains(&day)
    }

    /// Flip one day. The month entry is created lazily on first completion;
    /// insertion keeps the list sorted for display.
    pub fn toggle(&mut self, year: i32, month0: u32, day: u32) {
        let days = self.completions.entry(month_key(year, month0)).or_default();
        match days.iter().position(|&d| d == day) {
            Some(index) => {
                days.remove(index);
            }
            None => {
                let at = days.partition_point(|&d| d < day);
                days.insert(at, day);
            }
        }
    }

    /// Every stored completion across the year, uncurated. This is the
    /// number the share report and coach summary quote.
    pub fn total_completions(&self) -> usize {
        self.completions.values().map(Vec::len).sum()
    }
}

/// Seed data used whenever no saved state exists (or it fails to parse).
pub fn default_habits() -> Vec<Habit> {
    vec![
        Habit::new("1", "Morning Meditation", "#A855F7"),
        Habit::new("2", "Read 20 Pages", "#8B5CF6"),
        Habit {
            weekends_off: true,
            ..Habit::new("3", "Workout", "#7C3AED")
        },
        Habit::new("4", "Journaling", "#6366F1"),
    ]
}
