//! Streak and aggregation engine.
//!
//! Every function here is a pure view over caller-supplied habits: the
//! reference date ("today") is always an explicit parameter, nothing is
//! cached, and recomputing on unchanged input returns identical results.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{days_in_month, is_weekend, possible_day_count};
use crate::habit::Habit;

/// Per-habit figures for one viewed month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitStats {
    pub id: String,
    pub name: String,
    pub month_count: u32,
    pub month_possible: u32,
    pub month_percent: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub color: String,
    pub weekends_off: bool,
}

/// Completion totals from January through the viewed month, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifetimeStats {
    pub count: u32,
    pub possible: u32,
    pub rate: u32,
}

/// Everything the dashboard needs, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub habits: Vec<HabitStats>,
    pub global_best_streak: u32,
    pub average_consistency: u32,
}

impl StatsSnapshot {
    /// Habits currently on a streak, longest first.
    pub fn active_streaks(&self) -> Vec<&HabitStats> {
        let mut active: Vec<&HabitStats> = self
            .habits
            .iter()
            .filter(|stats| stats.current_streak > 0)
            .collect();
        active.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
        active
    }
}

/// Nearest-integer percentage with the zero-denominator guard the UI relies
/// on: a month with no possible days reads as 0%, never NaN.
pub(crate) fn ratio_percent(count: u32, possible: u32) -> u32 {
    if possible == 0 {
        return 0;
    }
    (f64::from(count) * 100.0 / f64::from(possible)).round() as u32
}

/// `(completed, possible, percent)` for one month of one habit.
pub fn month_completion(habit: &Habit, year: i32, month0: u32) -> (u32, u32, u32) {
    let count = habit.completed_count(year, month0);
    let possible = possible_day_count(year, month0, habit.weekends_off);
    (count, possible, ratio_percent(count, possible))
}

/// Sums January through `month0` inclusive. The denominator grows as the
/// viewed month advances, so this reads as "progress so far this year".
pub fn lifetime_to_date(habit: &Habit, year: i32, month0: u32) -> LifetimeStats {
    let mut count = 0;
    let mut possible = 0;
    for month in 0..=month0.min(11) {
        count += habit.completed_count(year, month);
        possible += possible_day_count(year, month, habit.weekends_off);
    }
    LifetimeStats {
        count,
        possible,
        rate: ratio_percent(count, possible),
    }
}

/// Streak of consecutive completed days ending at the reference date,
/// confined to the viewed month.
///
/// The walk starts at `today`'s day when today falls in the viewed month
/// and year, otherwise at the last day of the month. Two adjustments apply
/// only when today is in the viewed month:
///
/// * under a weekends-off policy, a Saturday start steps back one day and a
///   Sunday start two, landing on Friday (by date subtraction, so a Sunday
///   the 1st goes negative and yields 0);
/// * if the resulting reference day is not completed, the walk starts one
///   day earlier still — an in-progress day neither breaks nor extends the
///   streak.
///
/// Walking down, a completed day extends the streak, an incomplete weekend
/// day under weekends-off is skipped, and anything else ends it. The walk
/// stops at day 1: this operation never crosses the month boundary, unlike
/// [`best_streak_across_year`], which carries its counter between months.
/// The two disagree on purpose; keep them separate.
pub fn current_streak_in_month(habit: &Habit, year: i32, month0: u32, today: NaiveDate) -> u32 {
    let completed = habit.completed_days(year, month0);
    let in_viewed_month = today.year() == year && today.month0() == month0;

    let mut check_day: i64 = if in_viewed_month {
        i64::from(today.day())
    } else {
        i64::from(days_in_month(year, month0))
    };

    if in_viewed_month && habit.weekends_off && is_weekend(year, month0, today.day()) {
        let back = if today.weekday() == chrono::Weekday::Sun { 2 } else { 1 };
        check_day = i64::from(today.day()) - back;
    }

    if in_viewed_month && check_day > 0 && !completed.contains(&(check_day as u32)) {
        check_day -= 1;
    }

    let mut streak = 0;
    let mut day = check_day;
    while day > 0 {
        let day_u32 = day as u32;
        if completed.contains(&day_u32) {
            streak += 1;
        } else if is_weekend(year, month0, day_u32) && habit.weekends_off {
            // Non-event under the policy: neither breaks nor extends.
        } else {
            break;
        }
        day -= 1;
    }
    streak
}

/// Longest run of completed days over the whole year, walking every day of
/// every month in order with one counter carried across month boundaries.
/// Incomplete weekend days are skipped under a weekends-off policy and
/// reset the counter otherwise.
pub fn best_streak_across_year(habit: &Habit, year: i32) -> u32 {
    let mut current = 0;
    let mut best = 0;
    for month0 in 0..12 {
        let completed = habit.completed_days(year, month0);
        for day in 1..=days_in_month(year, month0) {
            if completed.contains(&day) {
                current += 1;
                best = best.max(current);
            } else if is_weekend(year, month0, day) && habit.weekends_off {
                continue;
            } else {
                current = 0;
            }
        }
    }
    best
}

/// Max of every habit's best streak; 0 with no habits.
pub fn global_best_streak(habits: &[Habit], year: i32) -> u32 {
    habits
        .iter()
        .map(|habit| best_streak_across_year(habit, year))
        .max()
        .unwrap_or(0)
}

/// Stats for one habit in the viewed month.
pub fn habit_stats(habit: &Habit, year: i32, month0: u32, today: NaiveDate) -> HabitStats {
    let (month_count, month_possible, month_percent) = month_completion(habit, year, month0);
    HabitStats {
        id: habit.id.clone(),
        name: habit.name.clone(),
        month_count,
        month_possible,
        month_percent,
        current_streak: current_streak_in_month(habit, year, month0, today),
        best_streak: best_streak_across_year(habit, year),
        color: habit.color.clone(),
        weekends_off: habit.weekends_off,
    }
}

/// One immutable snapshot of every habit plus the cross-habit aggregates.
/// An empty collection yields zero aggregates, not an error.
pub fn snapshot(habits: &[Habit], year: i32, month0: u32, today: NaiveDate) -> StatsSnapshot {
    let per_habit: Vec<HabitStats> = habits
        .iter()
        .map(|habit| habit_stats(habit, year, month0, today))
        .collect();

    let global_best_streak = per_habit.iter().map(|s| s.best_streak).max().unwrap_or(0);
    let average_consistency = if per_habit.is_empty() {
        0
    } else {
        let total: u32 = per_habit.iter().map(|s| s.month_percent).sum();
        (f64::from(total) / per_habit.len() as f64).round() as u32
    };

    StatsSnapshot {
        habits: per_habit,
        global_best_streak,
        average_consistency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{month_key, TRACKED_YEAR};

    fn date(year: i32, month1: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month1, day).expect("valid test date")
    }

    fn habit_with(month0: u32, days: &[u32], weekends_off: bool) -> Habit {
        let mut habit = Habit::new("t", "Test Habit", "#9333ea");
        habit.weekends_off = weekends_off;
        habit
            .completions
            .insert(month_key(TRACKED_YEAR, month0), days.to_vec());
        habit
    }

    #[test]
    fn month_percent_rounds_and_guards_zero() {
        assert_eq!(ratio_percent(0, 0), 0);
        assert_eq!(ratio_percent(1, 3), 33);
        assert_eq!(ratio_percent(2, 3), 67);
        // 15/31 rounds up to 48.
        let habit = habit_with(0, &(1..=15).collect::<Vec<_>>(), false);
        assert_eq!(month_completion(&habit, TRACKED_YEAR, 0), (15, 31, 48));
    }

    #[test]
    fn every_weekday_complete_is_a_full_month_under_weekends_off() {
        let weekdays: Vec<u32> = (1..=31)
            .filter(|&d| !is_weekend(TRACKED_YEAR, 0, d))
            .collect();
        let habit = habit_with(0, &weekdays, true);
        assert_eq!(month_completion(&habit, TRACKED_YEAR, 0), (22, 22, 100));
    }

    #[test]
    fn adding_a_day_never_lowers_the_month_percent() {
        let mut habit = habit_with(0, &[1, 2, 3], false);
        let (_, _, before) = month_completion(&habit, TRACKED_YEAR, 0);
        habit.toggle(TRACKED_YEAR, 0, 10);
        let (_, _, after) = month_completion(&habit, TRACKED_YEAR, 0);
        assert!(after >= before);
        habit.toggle(TRACKED_YEAR, 0, 10);
        let (_, _, reverted) = month_completion(&habit, TRACKED_YEAR, 0);
        assert_eq!(reverted, before);
    }

    #[test]
    fn lifetime_rate_spans_january_through_viewed_month() {
        let mut habit = habit_with(0, &(1..=10).collect::<Vec<_>>(), false);
        habit
            .completions
            .insert(month_key(TRACKED_YEAR, 1), (1..=5).collect());
        let lifetime = lifetime_to_date(&habit, TRACKED_YEAR, 1);
        assert_eq!(lifetime.count, 15);
        assert_eq!(lifetime.possible, 31 + 28);
        assert_eq!(lifetime.rate, 25);
    }

    // April 2026 has 30 days; the 6th is a Monday.
    #[test]
    fn incomplete_today_steps_back_before_the_walk() {
        let habit = habit_with(3, &[1, 2, 3, 4, 5], false);
        let today = date(TRACKED_YEAR, 4, 6);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 3, today), 5);
    }

    #[test]
    fn completed_today_counts_itself() {
        let habit = habit_with(3, &[4, 5, 6], false);
        let today = date(TRACKED_YEAR, 4, 6);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 3, today), 3);
    }

    // 2026-01-10 is a Saturday, 2026-01-11 a Sunday.
    #[test]
    fn saturday_reference_backs_up_to_friday() {
        let habit = habit_with(0, &[8, 9], true);
        let today = date(TRACKED_YEAR, 1, 10);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 0, today), 2);
    }

    #[test]
    fn sunday_reference_backs_up_two_days() {
        let habit = habit_with(0, &[9], true);
        let today = date(TRACKED_YEAR, 1, 11);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 0, today), 1);
    }

    #[test]
    fn weekend_backup_then_incomplete_friday_steps_back_again() {
        // Friday the 9th untouched, Thursday the 8th done.
        let habit = habit_with(0, &[8], true);
        let today = date(TRACKED_YEAR, 1, 10);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 0, today), 1);
    }

    // 2026-03-01 is a Sunday; backing up two days leaves no day to walk.
    #[test]
    fn sunday_the_first_yields_zero_under_weekends_off() {
        let mut habit = habit_with(2, &[], true);
        habit
            .completions
            .insert(month_key(TRACKED_YEAR, 1), (1..=28).collect());
        let today = date(TRACKED_YEAR, 3, 1);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 2, today), 0);
    }

    #[test]
    fn viewing_another_month_starts_at_its_last_day_without_grace() {
        let today = date(TRACKED_YEAR, 7, 15);
        // Last two days of April done: streak 2 when viewing April.
        let habit = habit_with(3, &[29, 30], false);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 3, today), 2);
        // Last day untouched: no step-back grace outside the current month.
        let habit = habit_with(3, &[28, 29], false);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 3, today), 0);
    }

    #[test]
    fn incomplete_weekend_breaks_the_walk_when_weekends_count() {
        // 2026-01-02 is a Friday, 3rd/4th the weekend, 5th a Monday.
        let habit = habit_with(0, &[2, 5], false);
        let today = date(TRACKED_YEAR, 1, 5);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 0, today), 1);
    }

    #[test]
    fn skipped_weekend_bridges_the_walk_when_weekends_are_off() {
        let habit = habit_with(0, &[2, 5], true);
        let today = date(TRACKED_YEAR, 1, 5);
        assert_eq!(current_streak_in_month(&habit, TRACKED_YEAR, 0, today), 2);
    }

    // June 2026: the 6th is a Saturday, the 7th a Sunday, the 8th a Monday.
    #[test]
    fn best_streak_bridges_untouched_weekends_under_weekends_off() {
        let mut habit = habit_with(5, &[1, 2, 3, 4, 5, 8], true);
        assert_eq!(best_streak_across_year(&habit, TRACKED_YEAR), 6);

        habit.weekends_off = false;
        assert_eq!(best_streak_across_year(&habit, TRACKED_YEAR), 5);
    }

    #[test]
    fn best_streak_carries_across_the_month_boundary() {
        // 2026-01-29 Thu .. 2026-02-02 Mon, every day done.
        let mut habit = habit_with(0, &[29, 30, 31], false);
        habit
            .completions
            .insert(month_key(TRACKED_YEAR, 1), vec![1, 2]);
        assert_eq!(best_streak_across_year(&habit, TRACKED_YEAR), 5);
    }

    #[test]
    fn best_streak_resets_on_a_missed_weekday() {
        let habit = habit_with(5, &[1, 2, 3, 4, 5, 9, 10], true);
        // Monday the 8th missed: the run restarts at the 9th.
        assert_eq!(best_streak_across_year(&habit, TRACKED_YEAR), 5);
    }

    #[test]
    fn best_streak_is_never_below_the_current_streak() {
        let habit = habit_with(0, &[5, 6, 7, 8, 9, 12, 13], false);
        for day in 1..=31 {
            let today = date(TRACKED_YEAR, 1, day);
            let current = current_streak_in_month(&habit, TRACKED_YEAR, 0, today);
            assert!(best_streak_across_year(&habit, TRACKED_YEAR) >= current);
        }
    }

    #[test]
    fn snapshots_are_idempotent() {
        let habits = vec![
            habit_with(0, &[1, 2, 3], false),
            habit_with(0, &[2, 5, 6], true),
        ];
        let today = date(TRACKED_YEAR, 1, 15);
        let first = snapshot(&habits, TRACKED_YEAR, 0, today);
        let second = snapshot(&habits, TRACKED_YEAR, 0, today);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_collection_yields_zero_aggregates() {
        let today = date(TRACKED_YEAR, 1, 15);
        let empty = snapshot(&[], TRACKED_YEAR, 0, today);
        assert_eq!(empty.global_best_streak, 0);
        assert_eq!(empty.average_consistency, 0);
        assert!(empty.active_streaks().is_empty());
    }

    #[test]
    fn active_streaks_sort_longest_first() {
        let mut short = habit_with(0, &[14, 15], false);
        short.id = "short".into();
        let mut long = habit_with(0, &[12, 13, 14, 15], false);
        long.id = "long".into();
        let mut idle = habit_with(0, &[1], false);
        idle.id = "idle".into();

        let today = date(TRACKED_YEAR, 1, 15);
        let snap = snapshot(&[short, idle, long], TRACKED_YEAR, 0, today);
        let active = snap.active_streaks();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].id, "long");
        assert_eq!(active[0].current_streak, 4);
        assert_eq!(active[1].id, "short");
    }

    #[test]
    fn average_consistency_is_the_rounded_mean_of_month_percents() {
        let full = habit_with(0, &(1..=31).collect::<Vec<_>>(), false);
        let none = habit_with(0, &[], false);
        let today = date(TRACKED_YEAR, 1, 15);
        let snap = snapshot(&[full, none], TRACKED_YEAR, 0, today);
        assert_eq!(snap.average_consistency, 50);
    }
}
