//! Human-readable digests: the shareable report and the prompt material for
//! the coach. Totals here are the raw stored counts, which is what the user
//! sees on the share sheet.

use crate::habit::Habit;

/// Plain-text digest for the share sheet, with a clipboard fallback on
/// platforms without one.
pub fn share_report(habits: &[Habit], user_name: &str) -> String {
    let mut report = format!("🏆 SUPER HABIT REPORT: {} (2026)\n\n", user_name.to_uppercase());
    for habit in habits {
        report.push_str(&format!(
            "• {}: {} completions\n",
            habit.name,
            habit.total_completions()
        ));
    }
    report.push_str("\nKeep building discipline! Sent from Super Habit Tracker.");
    report
}

/// One clause per habit, embedded in the coach's system instruction.
pub fn habit_summary(habits: &[Habit]) -> String {
    habits
        .iter()
        .map(|habit| format!("{}: {} completions in 2026", habit.name, habit.total_completions()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// System instruction handed to the language model alongside each question.
pub fn coach_instruction(user_name: &str, habits: &[Habit]) -> String {
    format!(
        "You are a high-performance habit coach. The user's name is {user_name}. \
         Their habits are: {}. Provide short, aesthetic, motivating, and actionable \
         advice. Use bullet points if needed. Be professional yet friendly.",
        habit_summary(habits)
    )
}

/// Opening bubble of a fresh chat transcript.
pub fn greeting(user_name: &str) -> String {
    format!("Hi {user_name}! I'm your AI Habit Coach. How can I help you reach your goals today?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::{month_key, TRACKED_YEAR};

    fn sample_habits() -> Vec<Habit> {
        let mut reading = Habit::new("1", "Read", "#8B5CF6");
        reading
            .completions
            .insert(month_key(TRACKED_YEAR, 0), vec![1, 2, 3]);
        reading
            .completions
            .insert(month_key(TRACKED_YEAR, 1), vec![4]);
        let workout = Habit::new("2", "Workout", "#7C3AED");
        vec![reading, workout]
    }

    #[test]
    fn report_lists_every_habit_with_raw_totals() {
        let report = share_report(&sample_habits(), "Ada");
        assert!(report.starts_with("🏆 SUPER HABIT REPORT: ADA (2026)\n\n"));
        assert!(report.contains("• Read: 4 completions\n"));
        assert!(report.contains("• Workout: 0 completions\n"));
        assert!(report.ends_with("Sent from Super Habit Tracker."));
    }

    #[test]
    fn summary_joins_habits_with_commas() {
        let summary = habit_summary(&sample_habits());
        assert_eq!(
            summary,
            "Read: 4 completions in 2026, Workout: 0 completions in 2026"
        );
    }

    #[test]
    fn instruction_names_the_user_and_their_habits() {
        let instruction = coach_instruction("Ada", &sample_habits());
        assert!(instruction.contains("The user's name is Ada."));
        assert!(instruction.contains("Read: 4 completions in 2026"));
    }

    #[test]
    fn greeting_addresses_the_user() {
        assert!(greeting("Ada").starts_with("Hi Ada!"));
    }
}
