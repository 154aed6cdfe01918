use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Duration;

use anyhow::{Context as _, Result};
use chrono::Local;
use egui::{Color32, RichText};
use habit_core::assistant::{self, AssistantError, CoachClient};
use habit_core::badge::{self, BadgeProgress};
use habit_core::calendar;
use habit_core::habit::{Habit, TRACKED_YEAR};
use habit_core::report;
use habit_core::settings::{AppIcon, UserIcon, THEME_COLORS};
use habit_core::stats;
use habit_core::storage;
use habit_core::HabitService;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_dir: storage::resolve_data_dir(),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Track,
    Stats,
    Badges,
    Coach,
    Settings,
}

struct ChatMessage {
    from_user: bool,
    text: String,
}

struct HabitEdit {
    id: String,
    draft: String,
}

/// Row-level intent gathered while drawing the track tab, applied after the
/// frame so drawing never mutates the list it iterates.
enum TrackAction {
    Toggle(String, u32),
    Rename(String, String),
    SetWeekendsOff(String, bool),
    Delete(String),
    Add(String),
}

struct HabitApp {
    service: HabitService,
    tab: Tab,
    month0: u32,
    selected_habit: Option<String>,
    adding: bool,
    new_habit_name: String,
    editing: Option<HabitEdit>,
    chat_input: String,
    transcript: Vec<ChatMessage>,
    pending_reply: Option<Receiver<String>>,
    status: Option<String>,
}

impl HabitApp {
    fn new(service: HabitService) -> Self {
        let greeting = report::greeting(&service.settings().user_name);
        Self {
            service,
            tab: Tab::Track,
            month0: 0,
            selected_habit: None,
            adding: false,
            new_habit_name: String::new(),
            editing: None,
            chat_input: String::new(),
            transcript: vec![ChatMessage {
                from_user: false,
                text: greeting,
            }],
            pending_reply: None,
            status: None,
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn accent(&self) -> Color32 {
        parse_hex_color(&self.service.settings().theme_color)
            .unwrap_or(Color32::from_rgb(0x93, 0x33, 0xea))
    }

    fn apply_track_action(&mut self, action: TrackAction) {
        let outcome = match action {
            TrackAction::Toggle(id, day) => self.service.toggle_day(&id, TRACKED_YEAR, self.month0, day),
            TrackAction::Rename(id, name) => {
                self.editing = None;
                self.service.rename_habit(&id, name)
            }
            TrackAction::SetWeekendsOff(id, flag) => self.service.set_weekends_off(&id, flag),
            TrackAction::Delete(id) => {
                self.editing = None;
                self.service.delete_habit(&id)
            }
            TrackAction::Add(name) => {
                self.adding = false;
                self.new_habit_name.clear();
                self.service.add_habit(name).map(|_| ())
            }
        };
        if let Err(err) = outcome {
            warn!(%err, "habit mutation failed");
            self.set_status(format!("Something went wrong: {err}"));
        }
    }

    fn header(&mut self, ctx: &egui::Context) {
        let settings = self.service.settings();
        let accent = self.accent();
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(settings.app_icon.glyph()).size(20.0).color(accent));
                ui.vertical(|ui| {
                    ui.label(RichText::new("Super Habit Tracker").heading().strong());
                    ui.label(
                        RichText::new(format!(
                            "{} {}",
                            settings.user_icon.glyph(),
                            settings.user_name
                        ))
                        .small()
                        .weak(),
                    );
                });
            });

            if matches!(self.tab, Tab::Track | Tab::Stats) {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(self.month0 > 0, egui::Button::new("◀"))
                        .clicked()
                    {
                        self.month0 -= 1;
                    }
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(TRACKED_YEAR.to_string()).small().color(accent));
                        ui.label(RichText::new(calendar::month_name(self.month0)).strong());
                    });
                    if ui
                        .add_enabled(self.month0 < 11, egui::Button::new("▶"))
                        .clicked()
                    {
                        self.month0 += 1;
                    }
                });
            }
            ui.add_space(6.0);
        });
    }

    fn nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("nav").show(ctx, |ui| {
            if let Some(status) = &self.status {
                ui.label(RichText::new(status).small().weak());
            }
            ui.add_space(4.0);
            ui.columns(5, |columns| {
                let tabs = [
                    (Tab::Track, "Track"),
                    (Tab::Stats, "Stats"),
                    (Tab::Badges, "Badges"),
                    (Tab::Coach, "Ask AI"),
                    (Tab::Settings, "Sets"),
                ];
                for (column, (tab, label)) in columns.iter_mut().zip(tabs) {
                    column.vertical_centered(|ui| {
                        if ui.selectable_label(self.tab == tab, label).clicked() {
                            self.tab = tab;
                        }
                    });
                }
            });
            ui.add_space(4.0);
        });
    }

    fn track_tab(&mut self, ui: &mut egui::Ui) {
        let habits = self.service.habits();
        let accent = self.accent();
        let mut action: Option<TrackAction> = None;

        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            for habit in &habits {
                self.habit_row(ui, habit, accent, &mut action);
                ui.add_space(8.0);
            }

            ui.separator();
            if self.adding {
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.new_habit_name)
                            .hint_text("e.g., Morning Yoga"),
                    );
                    let submitted = response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if (ui.button("Add Habit").clicked() || submitted)
                        && !self.new_habit_name.trim().is_empty()
                    {
                        action = Some(TrackAction::Add(self.new_habit_name.trim().to_string()));
                    }
                    if ui.button("✖").clicked() {
                        self.adding = false;
                        self.new_habit_name.clear();
                    }
                });
            } else if ui.button("➕ Add New Habit").clicked() {
                self.adding = true;
            }
        });

        if let Some(action) = action {
            self.apply_track_action(action);
        }
    }

    fn habit_row(
        &mut self,
        ui: &mut egui::Ui,
        habit: &Habit,
        accent: Color32,
        action: &mut Option<TrackAction>,
    ) {
        let habit_accent = parse_hex_color(&habit.color).unwrap_or(accent);

        let editing_this = self
            .editing
            .as_ref()
            .is_some_and(|edit| edit.id == habit.id);
        if editing_this {
            let mut draft = self.editing.as_ref().map(|e| e.draft.clone()).unwrap_or_default();
            ui.horizontal(|ui| {
                let response = ui.text_edit_singleline(&mut draft);
                if response.changed() {
                    if let Some(edit) = self.editing.as_mut() {
                        edit.draft = draft.clone();
                    }
                }
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.button("✔").clicked() || submitted) && !draft.trim().is_empty() {
                    *action = Some(TrackAction::Rename(habit.id.clone(), draft.trim().to_string()));
                }
                if ui.button("🗑").clicked() {
                    *action = Some(TrackAction::Delete(habit.id.clone()));
                }
            });
            ui.horizontal(|ui| {
                let label = if habit.weekends_off {
                    "Weekends: OFF"
                } else {
                    "Weekends: ON"
                };
                if ui.selectable_label(habit.weekends_off, label).clicked() {
                    *action = Some(TrackAction::SetWeekendsOff(habit.id.clone(), !habit.weekends_off));
                }
            });
        } else {
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(habit_accent));
                let name = ui.label(RichText::new(&habit.name).strong());
                if habit.weekends_off {
                    ui.label(RichText::new("WEEKENDS OFF").small().weak());
                }
                let edit = ui.small_button("✏");
                if name.double_clicked() || edit.clicked() {
                    self.editing = Some(HabitEdit {
                        id: habit.id.clone(),
                        draft: habit.name.clone(),
                    });
                }
            });
        }

        ui.horizontal_wrapped(|ui| {
            for day in 1..=calendar::days_in_month(TRACKED_YEAR, self.month0) {
                let completed = habit.is_completed(TRACKED_YEAR, self.month0, day);
                let rest_day = habit.weekends_off
                    && calendar::is_weekend(TRACKED_YEAR, self.month0, day);

                let text = RichText::new(format!("{day:>2}")).monospace();
                let text = if completed {
                    text.color(Color32::WHITE)
                } else if rest_day {
                    text.weak()
                } else {
                    text
                };
                let mut button = egui::Button::new(text);
                if completed {
                    button = button.fill(habit_accent);
                }
                if ui.add_sized([30.0, 26.0], button).clicked() {
                    *action = Some(TrackAction::Toggle(habit.id.clone(), day));
                }
            }
        });
    }

    fn stats_tab(&mut self, ui: &mut egui::Ui) {
        let habits = self.service.habits();
        let accent = self.accent();
        let today = Local::now().date_naive();
        let snapshot = stats::snapshot(&habits, TRACKED_YEAR, self.month0, today);

        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.columns(2, |columns| {
                columns[0].vertical_centered(|ui| {
                    ui.label(
                        RichText::new(format!("{}%", snapshot.average_consistency))
                            .size(28.0)
                            .strong(),
                    );
                    ui.label(RichText::new("CONSISTENCY").small().weak());
                });
                columns[1].vertical_centered(|ui| {
                    ui.label(
                        RichText::new(snapshot.active_streaks().len().to_string())
                            .size(28.0)
                            .strong(),
                    );
                    ui.label(RichText::new("STREAKS").small().weak());
                });
            });

            ui.separator();
            ui.label(RichText::new("🔥 Active Streaks").small().strong());
            let active = snapshot.active_streaks();
            if active.is_empty() {
                ui.label(RichText::new("No active streaks!").weak());
            } else {
                ui.horizontal_wrapped(|ui| {
                    for streak in active {
                        ui.group(|ui| {
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    RichText::new(streak.current_streak.to_string())
                                        .size(20.0)
                                        .strong(),
                                );
                                ui.label(RichText::new(&streak.name).small().weak());
                            });
                        });
                    }
                });
            }

            ui.separator();
            ui.label(RichText::new("Analysis").small().strong());
            let selected_id = self
                .selected_habit
                .clone()
                .filter(|id| habits.iter().any(|h| h.id == *id))
                .or_else(|| habits.first().map(|h| h.id.clone()));
            if let Some(selected_id) = selected_id {
                let selected_name = habits
                    .iter()
                    .find(|h| h.id == selected_id)
                    .map(|h| h.name.clone())
                    .unwrap_or_default();
                egui::ComboBox::from_id_salt("analysis-habit")
                    .selected_text(selected_name)
                    .show_ui(ui, |ui| {
                        for habit in &habits {
                            let mut current = selected_id.clone();
                            if ui
                                .selectable_value(&mut current, habit.id.clone(), &habit.name)
                                .clicked()
                            {
                                self.selected_habit = Some(current);
                            }
                        }
                    });

                if let Some(habit) = habits.iter().find(|h| h.id == selected_id) {
                    let row = snapshot.habits.iter().find(|s| s.id == selected_id);
                    let lifetime = stats::lifetime_to_date(habit, TRACKED_YEAR, self.month0);
                    ui.columns(2, |columns| {
                        columns[0].vertical_centered(|ui| {
                            ui.label(RichText::new("MONTHLY").small().weak());
                            ui.label(
                                RichText::new(format!(
                                    "{}%",
                                    row.map(|s| s.month_percent).unwrap_or(0)
                                ))
                                .size(22.0)
                                .color(accent),
                            );
                        });
                        columns[1].vertical_centered(|ui| {
                            ui.label(RichText::new("LIFETIME").small().weak());
                            ui.label(
                                RichText::new(format!("{}%", lifetime.rate))
                                    .size(22.0)
                                    .color(accent),
                            );
                        });
                    });
                }
            }

            ui.separator();
            ui.label(RichText::new("Progress").small().strong());
            for row in &snapshot.habits {
                let row_accent = parse_hex_color(&row.color).unwrap_or(accent);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("●").color(row_accent));
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&row.name).strong());
                        ui.label(
                            RichText::new(format!("{} / {} days", row.month_count, row.month_possible))
                                .small()
                                .weak(),
                        );
                        ui.add(
                            egui::ProgressBar::new(row.month_percent as f32 / 100.0)
                                .desired_height(6.0)
                                .fill(row_accent),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(RichText::new(format!("{}%", row.month_percent)).strong());
                    });
                });
                ui.add_space(6.0);
            }
        });
    }

    fn badges_tab(&mut self, ui: &mut egui::Ui) {
        let habits = self.service.habits();
        let accent = self.accent();
        let progress = badge::evaluate_badges(&habits, TRACKED_YEAR);
        let (global, specialist): (Vec<&BadgeProgress>, Vec<&BadgeProgress>) = progress
            .iter()
            .partition(|badge| !badge.badge_id.starts_with("habit-"));

        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new("Achievements").heading().strong());
                ui.label(RichText::new("MASTERING CONSISTENCY").small().weak());
            });

            ui.separator();
            ui.label(RichText::new("Global Milestones").small().strong());
            for badge in global {
                badge_card(ui, badge, accent);
            }

            ui.separator();
            ui.label(RichText::new("Habit Specialists").small().strong());
            for badge in specialist {
                badge_card(ui, badge, accent);
            }

            ui.separator();
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new("\"Discipline is the bridge between goals and accomplishment.\"")
                        .italics()
                        .weak(),
                );
            });
        });
    }

    fn coach_tab(&mut self, ui: &mut egui::Ui) {
        let accent = self.accent();

        egui::TopBottomPanel::bottom("coach-input")
            .show_separator_line(false)
            .show_inside(ui, |ui| {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let response = ui.add_sized(
                        [ui.available_width() - 64.0, 28.0],
                        egui::TextEdit::singleline(&mut self.chat_input)
                            .hint_text("Ask about your habits..."),
                    );
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let send = ui
                        .add_enabled(self.pending_reply.is_none(), egui::Button::new("Send"))
                        .clicked();
                    if send || (submitted && self.pending_reply.is_none()) {
                        self.send_chat(ui.ctx());
                    }
                });
                ui.add_space(4.0);
            });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.label(RichText::new("✨ AI Habit Coach").small().strong().color(accent));
            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink(false)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for message in &self.transcript {
                        let layout = if message.from_user {
                            egui::Layout::right_to_left(egui::Align::TOP)
                        } else {
                            egui::Layout::left_to_right(egui::Align::TOP)
                        };
                        ui.with_layout(layout, |ui| {
                            let fill = if message.from_user {
                                accent
                            } else {
                                ui.visuals().extreme_bg_color
                            };
                            egui::Frame::group(ui.style()).fill(fill).show(ui, |ui| {
                                ui.set_max_width(ui.available_width() * 0.85);
                                let text = RichText::new(&message.text);
                                ui.label(if message.from_user {
                                    text.color(Color32::WHITE)
                                } else {
                                    text
                                });
                            });
                        });
                        ui.add_space(6.0);
                    }
                    if self.pending_reply.is_some() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("Thinking...").weak());
                        });
                    }
                });
        });
    }

    fn send_chat(&mut self, ctx: &egui::Context) {
        let prompt = self.chat_input.trim().to_string();
        if prompt.is_empty() || self.pending_reply.is_some() {
            return;
        }
        self.chat_input.clear();
        self.transcript.push(ChatMessage {
            from_user: true,
            text: prompt.clone(),
        });

        let instruction =
            report::coach_instruction(&self.service.settings().user_name, &self.service.habits());
        let (tx, rx) = channel();
        self.pending_reply = Some(rx);
        let repaint = ctx.clone();
        // Fire-and-forget: the engine never waits on the coach.
        std::thread::spawn(move || {
            let reply = match CoachClient::from_env()
                .and_then(|client| client.ask(&instruction, &prompt))
            {
                Ok(text) => text,
                Err(AssistantError::NoText) => assistant::EMPTY_REPLY.to_string(),
                Err(err) => {
                    warn!(%err, "coach request failed");
                    assistant::CONNECTION_TROUBLE.to_string()
                }
            };
            let _ = tx.send(reply);
            repaint.request_repaint();
        });
    }

    fn poll_chat(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.pending_reply else {
            return;
        };
        match receiver.try_recv() {
            Ok(reply) => {
                self.transcript.push(ChatMessage {
                    from_user: false,
                    text: reply,
                });
                self.pending_reply = None;
            }
            Err(TryRecvError::Empty) => {
                ctx.request_repaint_after(Duration::from_millis(150));
            }
            Err(TryRecvError::Disconnected) => {
                self.transcript.push(ChatMessage {
                    from_user: false,
                    text: assistant::CONNECTION_TROUBLE.to_string(),
                });
                self.pending_reply = None;
            }
        }
    }

    fn settings_tab(&mut self, ui: &mut egui::Ui) {
        let mut settings = self.service.settings();
        let accent = self.accent();
        let mut changed = false;
        let mut status: Option<String> = None;

        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.label(RichText::new("Analysis & Export").small().strong());
            ui.horizontal(|ui| {
                if ui.button("📋 Copy Report").clicked() {
                    let text = report::share_report(&self.service.habits(), &settings.user_name);
                    ui.ctx().copy_text(text);
                    status = Some("Report copied to clipboard".to_string());
                }
                #[cfg(not(any(target_os = "android", target_os = "ios")))]
                {
                    if ui.button("💾 Save Report…").clicked() {
                        status = Some(self.export_report(&settings.user_name));
                    }
                }
            });

            ui.separator();
            ui.label(RichText::new("Profile Settings").small().strong());
            ui.horizontal(|ui| {
                ui.label("Your Name");
                if ui.text_edit_singleline(&mut settings.user_name).changed() {
                    changed = true;
                }
            });
            ui.horizontal(|ui| {
                for icon in UserIcon::ALL {
                    let selected = settings.user_icon == icon;
                    if ui
                        .selectable_label(selected, format!("{} {}", icon.glyph(), icon.as_str()))
                        .clicked()
                    {
                        settings.user_icon = icon;
                        changed = true;
                    }
                }
            });

            ui.separator();
            ui.label(RichText::new("Appearance").small().strong());
            ui.label(RichText::new("Theme Accent").small().weak());
            ui.horizontal_wrapped(|ui| {
                for (name, hex) in THEME_COLORS {
                    let swatch = parse_hex_color(hex).unwrap_or(accent);
                    let selected = settings.theme_color == hex;
                    let label = RichText::new(format!("● {name}")).color(swatch);
                    if ui.selectable_label(selected, label).clicked() {
                        settings.theme_color = hex.to_string();
                        changed = true;
                    }
                }
            });
            ui.label(RichText::new("App Symbol").small().weak());
            ui.horizontal(|ui| {
                for icon in AppIcon::ALL {
                    let selected = settings.app_icon == icon;
                    if ui
                        .selectable_label(selected, format!("{} {}", icon.glyph(), icon.as_str()))
                        .clicked()
                    {
                        settings.app_icon = icon;
                        changed = true;
                    }
                }
            });
        });

        if changed {
            if let Err(err) = self.service.update_settings(settings) {
                warn!(%err, "saving settings failed");
                status = Some(format!("Saving settings failed: {err}"));
            }
        }
        if let Some(status) = status {
            self.set_status(status);
        }
    }

    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    fn export_report(&self, user_name: &str) -> String {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("habit-report.txt")
            .save_file()
        else {
            return "Export cancelled".to_string();
        };
        let text = report::share_report(&self.service.habits(), user_name);
        match std::fs::write(&path, text) {
            Ok(()) => format!("Report saved to {}", path.display()),
            Err(err) => {
                warn!(%err, "report export failed");
                format!("Saving report failed: {err}")
            }
        }
    }
}

impl eframe::App for HabitApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_chat(ctx);
        self.header(ctx);
        self.nav(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Track => self.track_tab(ui),
            Tab::Stats => self.stats_tab(ui),
            Tab::Badges => self.badges_tab(ui),
            Tab::Coach => self.coach_tab(ui),
            Tab::Settings => self.settings_tab(ui),
        });
    }
}

fn badge_card(ui: &mut egui::Ui, badge: &BadgeProgress, accent: Color32) {
    ui.group(|ui| {
        ui.horizontal(|ui| {
            let glyph = if badge.unlocked { "🏆" } else { "🔒" };
            ui.label(RichText::new(glyph).size(20.0));
            ui.vertical(|ui| {
                let name = RichText::new(&badge.name).strong();
                ui.label(if badge.unlocked { name.color(accent) } else { name.weak() });
                ui.label(RichText::new(&badge.description).small().weak());
                if !badge.unlocked {
                    ui.add(
                        egui::ProgressBar::new(badge.progress_percent as f32 / 100.0)
                            .desired_height(5.0)
                            .fill(accent),
                    );
                    ui.label(
                        RichText::new(format!("{} / {}", badge.current_value, badge.requirement))
                            .small()
                            .weak(),
                    );
                }
            });
        });
    });
}

fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Color32::from_rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(dir = %config.data_dir.display(), "starting egui runtime");
    let service = HabitService::builder()
        .data_dir(&config.data_dir)
        .build()
        .context("failed to initialize habit service")?;
    let app = HabitApp::new(service);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([430.0, 780.0])
            .with_min_inner_size([360.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Super Habit Tracker",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("eframe terminated: {err}"))
}
