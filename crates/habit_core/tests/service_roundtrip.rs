use std::fs;

use habit_core::habit::TRACKED_YEAR;
use habit_core::settings::{Settings, UserIcon};
use habit_core::storage::{HABITS_FILE, SETTINGS_FILE};
use habit_core::{stats, HabitService};
use tempfile::tempdir;

#[test]
fn a_fresh_directory_seeds_the_stock_habits() {
    let dir = tempdir().expect("tempdir");
    let service = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("build service");

    let habits = service.habits();
    assert_eq!(habits.len(), 4);
    assert!(habits.iter().any(|h| h.name == "Workout" && h.weekends_off));
    assert_eq!(service.settings(), Settings::default());
}

#[test]
fn mutations_survive_a_reload() {
    let dir = tempdir().expect("tempdir");
    let service = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("build service");

    let added = service.add_habit("Evening Walk").expect("add");
    service
        .toggle_day(&added.id, TRACKED_YEAR, 0, 5)
        .expect("toggle");
    service
        .toggle_day(&added.id, TRACKED_YEAR, 0, 6)
        .expect("toggle");
    service.rename_habit(&added.id, "Night Walk").expect("rename");
    service.set_weekends_off(&added.id, true).expect("flag");
    service
        .update_settings(Settings {
            user_name: "Ada".to_string(),
            user_icon: UserIcon::Star,
            ..Settings::default()
        })
        .expect("settings");

    let reloaded = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("rebuild service");

    let habits = reloaded.habits();
    let walk = habits
        .iter()
        .find(|h| h.id == added.id)
        .expect("added habit persisted");
    assert_eq!(walk.name, "Night Walk");
    assert!(walk.weekends_off);
    assert!(walk.is_completed(TRACKED_YEAR, 0, 5));
    assert!(walk.is_completed(TRACKED_YEAR, 0, 6));
    assert_eq!(reloaded.settings().user_name, "Ada");
    assert_eq!(reloaded.settings().user_icon, UserIcon::Star);
}

#[test]
fn corrupt_state_falls_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(HABITS_FILE), b"{ definitely not json").expect("write");
    fs::write(dir.path().join(SETTINGS_FILE), b"42").expect("write");

    let service = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("build service");
    assert_eq!(service.habits().len(), 4);
    assert_eq!(service.settings(), Settings::default());
}

#[test]
fn unknown_habit_ids_error_without_corrupting_state() {
    let dir = tempdir().expect("tempdir");
    let service = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("build service");

    assert!(service.toggle_day("missing", TRACKED_YEAR, 0, 1).is_err());
    assert!(service.rename_habit("missing", "x").is_err());
    assert!(service.delete_habit("missing").is_err());
    assert_eq!(service.habits().len(), 4);
}

#[test]
fn deleting_a_habit_removes_it_from_later_snapshots() {
    let dir = tempdir().expect("tempdir");
    let service = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("build service");

    let first_id = service.habits()[0].id.clone();
    service.delete_habit(&first_id).expect("delete");
    assert_eq!(service.habits().len(), 3);

    let reloaded = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("rebuild service");
    assert!(reloaded.habits().iter().all(|h| h.id != first_id));
}

#[test]
fn snapshots_reflect_toggles_made_through_the_service() {
    let dir = tempdir().expect("tempdir");
    let service = HabitService::builder()
        .data_dir(dir.path())
        .build()
        .expect("build service");

    let id = service.habits()[0].id.clone();
    for day in 1..=5 {
        service.toggle_day(&id, TRACKED_YEAR, 3, day).expect("toggle");
    }

    // 2026-04-06 is the Monday after that run.
    let today = chrono::NaiveDate::from_ymd_opt(2026, 4, 6).expect("date");
    let snap = stats::snapshot(&service.habits(), TRACKED_YEAR, 3, today);
    let habit = snap.habits.iter().find(|s| s.id == id).expect("stats row");
    assert_eq!(habit.current_streak, 5);
    assert_eq!(habit.month_count, 5);
    assert_eq!(snap.global_best_streak, 5);
}
