//! Badge evaluator: maps aggregation results onto a fixed achievement
//! catalog. Unlock state is a pure function of current stats — there is no
//! persisted unlocked flag, so editing history can re-lock a badge.

use serde::Serialize;

use crate::habit::Habit;
use crate::stats;

/// Which statistic a global badge is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeMetric {
    /// Best streak across every habit and the whole year.
    BestStreak,
    /// Number of habits currently defined.
    HabitCount,
}

#[derive(Debug, Clone, Copy)]
pub struct BadgeDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub requirement: u32,
    pub metric: BadgeMetric,
}

/// The canonical global catalog. Per-habit Specialist badges are minted on
/// top of these, one per habit.
pub const GLOBAL_BADGES: [BadgeDefinition; 5] = [
    BadgeDefinition {
        id: "streak-5",
        name: "Iron Focus",
        description: "Maintain any 5-day streak",
        requirement: 5,
        metric: BadgeMetric::BestStreak,
    },
    BadgeDefinition {
        id: "streak-10",
        name: "Silver Routine",
        description: "Maintain any 10-day streak",
        requirement: 10,
        metric: BadgeMetric::BestStreak,
    },
    BadgeDefinition {
        id: "streak-20",
        name: "Golden Warrior",
        description: "Maintain any 20-day streak",
        requirement: 20,
        metric: BadgeMetric::BestStreak,
    },
    BadgeDefinition {
        id: "streak-30",
        name: "Platinum Master",
        description: "Complete 30 days straight",
        requirement: 30,
        metric: BadgeMetric::BestStreak,
    },
    BadgeDefinition {
        id: "architect",
        name: "Habit Architect",
        description: "Create 5 unique habits",
        requirement: 5,
        metric: BadgeMetric::HabitCount,
    },
];

/// Streak length that earns a habit its Specialist badge.
pub const SPECIALIST_REQUIREMENT: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeProgress {
    pub badge_id: String,
    pub name: String,
    pub description: String,
    pub requirement: u32,
    pub current_value: u32,
    /// Rounded and capped at 100.
    pub progress_percent: u32,
    pub unlocked: bool,
}

impl BadgeProgress {
    fn evaluate(
        badge_id: String,
        name: String,
        description: String,
        requirement: u32,
        current_value: u32,
    ) -> Self {
        let progress_percent = if requirement == 0 {
            0
        } else {
            let raw = (f64::from(current_value) * 100.0 / f64::from(requirement)).round();
            raw.min(100.0) as u32
        };
        Self {
            badge_id,
            name,
            description,
            requirement,
            current_value,
            progress_percent,
            unlocked: progress_percent >= 100,
        }
    }
}

/// Evaluates the global catalog followed by one Specialist badge per habit,
/// in habit order.
pub fn evaluate_badges(habits: &[Habit], year: i32) -> Vec<BadgeProgress> {
    let best_streaks: Vec<u32> = habits
        .iter()
        .map(|habit| stats::best_streak_across_year(habit, year))
        .collect();
    let global_best = best_streaks.iter().copied().max().unwrap_or(0);

    let mut progress = Vec::with_capacity(GLOBAL_BADGES.len() + habits.len());
    for def in GLOBAL_BADGES {
        let current = match def.metric {
            BadgeMetric::BestStreak => global_best,
            BadgeMetric::HabitCount => habits.len() as u32,
        };
        progress.push(BadgeProgress::evaluate(
            def.id.to_string(),
            def.name.to_string(),
            def.description.to_string(),
            def.requirement,
            current,
        ));
    }

    for (habit, best) in habits.iter().zip(best_streaks) {
        progress.push(BadgeProgress::evaluate(
            format!("habit-{}", habit.id),
            format!("{} Specialist", habit.name),
            format!("Reach a 7-day streak in {}", habit.name),
            SPECIALIST_REQUIREMENT,
            best,
        ));
    }

    progress
}
