//! UI module - egui panels for modes, controls, and the timezone picker
//!
//! Panels report user intent back through small result structs; the
//! model applies them after the egui frame ends.

use chrono_tz::Tz;
use nannou_egui::egui;
use shared::{all_timezones, search_timezones, HourCycle, TimeData};

use crate::games::{ActiveGame, AnswerDial, GameKind, GamesState, MemoryPhase};
use crate::lessons::{LearnState, LESSONS, MAX_STARS};
use crate::progress::{achievement_by_id, ProgressStore};
use crate::quiz::{Difficulty, QuizState};
use crate::session::{DragMode, InteractionSession, Mode};

const ACCENT: egui::Color32 = egui::Color32::from_rgb(0, 212, 255);
const CORRECT: egui::Color32 = egui::Color32::from_rgb(80, 220, 120);
const INCORRECT: egui::Color32 = egui::Color32::from_rgb(255, 92, 124);

/// State for the timezone picker
#[derive(Default)]
pub struct PickerState {
    pub is_open: bool,
    pub search_query: String,
    pub search_results: Vec<Tz>,
    pub should_focus_search: bool,
    total_count: usize,
}

impl PickerState {
    pub fn open(&mut self) {
        self.is_open = true;
        self.search_query.clear();
        self.search_results = search_timezones("");
        self.total_count = all_timezones().len();
        self.should_focus_search = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.search_query.clear();
        self.search_results.clear();
    }

    pub fn update_search(&mut self) {
        self.search_results = search_timezones(&self.search_query);
    }
}

/// Result of timezone picker interactions
#[derive(Default)]
pub struct PickerResult {
    pub selected_tz: Option<Tz>,
    pub toggle_favorite: Option<Tz>,
    pub close_picker: bool,
}

/// Draw the timezone picker overlay
pub fn draw_timezone_picker(
    ctx: &egui::Context,
    picker_state: &mut PickerState,
    current_tz: Tz,
    favorites: &[Tz],
) -> PickerResult {
    let mut result = PickerResult::default();

    if !picker_state.is_open {
        return result;
    }

    egui::Window::new("Select Time Zone")
        .collapsible(false)
        .resizable(true)
        .default_width(380.0)
        .default_height(460.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Search:");
                let response = ui.text_edit_singleline(&mut picker_state.search_query);
                if picker_state.should_focus_search {
                    response.request_focus();
                    picker_state.should_focus_search = false;
                }
                if response.changed() {
                    picker_state.update_search();
                }
            });

            ui.separator();

            if ui.button("Use System Time Zone").clicked() {
                if let Some(sys_tz) = shared::system_timezone() {
                    result.selected_tz = Some(sys_tz);
                    result.close_picker = true;
                }
            }

            if !favorites.is_empty() {
                ui.separator();
                ui.label("Favorites:");
                ui.horizontal_wrapped(|ui| {
                    for &tz in favorites {
                        let is_current = tz == current_tz;
                        if ui
                            .selectable_label(is_current, format!("★ {}", tz.name()))
                            .clicked()
                        {
                            result.selected_tz = Some(tz);
                            result.close_picker = true;
                        }
                    }
                });
            }

            ui.separator();
            ui.label(format!(
                "Showing {} of {} time zones",
                picker_state.search_results.len(),
                picker_state.total_count
            ));

            egui::ScrollArea::vertical()
                .max_height(280.0)
                .show(ui, |ui| {
                    for &tz in &picker_state.search_results {
                        let is_current = tz == current_tz;
                        let is_favorite = favorites.contains(&tz);
                        ui.horizontal(|ui| {
                            let star = if is_favorite { "★" } else { "☆" };
                            if ui.small_button(star).clicked() {
                                result.toggle_favorite = Some(tz);
                            }
                            if ui.selectable_label(is_current, tz.name()).clicked() {
                                result.selected_tz = Some(tz);
                                result.close_picker = true;
                            }
                        });
                    }
                });

            ui.separator();
            if ui.button("Close").clicked() {
                result.close_picker = true;
            }
        });

    result
}

/// Draw the top mode bar. Returns a newly selected mode, if any.
pub fn draw_mode_bar(ctx: &egui::Context, current: Mode) -> Option<Mode> {
    let mut selected = None;

    egui::TopBottomPanel::top("mode_bar")
        .resizable(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("TimeLab");
                ui.separator();
                for mode in Mode::ALL {
                    if ui.selectable_label(mode == current, mode.label()).clicked()
                        && mode != current
                    {
                        selected = Some(mode);
                    }
                }
            });
        });

    selected
}

/// Result of the interactive controls panel
#[derive(Default)]
pub struct InteractiveResult {
    pub changed: bool,
    pub set_now: bool,
    pub randomize: bool,
    pub read_time: bool,
}

/// Draw the interactive-mode controls
pub fn draw_interactive_panel(
    ctx: &egui::Context,
    session: &mut InteractionSession,
    show_numbers: &mut bool,
) -> InteractiveResult {
    let mut result = InteractiveResult::default();

    egui::Window::new("Interactive")
        .collapsible(true)
        .resizable(false)
        .default_width(220.0)
        .anchor(egui::Align2::LEFT_TOP, [10.0, 40.0])
        .show(ctx, |ui| {
            ui.label("Hands");
            result.changed |= ui.checkbox(&mut session.visibility.hour, "Hour hand").changed();
            result.changed |= ui
                .checkbox(&mut session.visibility.minute, "Minute hand")
                .changed();
            result.changed |= ui
                .checkbox(&mut session.visibility.second, "Second hand")
                .changed();
            result.changed |= ui.checkbox(show_numbers, "Numbers").changed();

            ui.separator();
            result.changed |= ui.checkbox(&mut session.allow_drag, "Allow dragging").changed();
            result.changed |= ui.checkbox(&mut session.spotlight, "Spotlight aid").changed();

            ui.separator();
            ui.label("Drag mode");
            ui.horizontal(|ui| {
                for mode in [DragMode::Independent, DragMode::Snapped] {
                    if ui
                        .selectable_label(session.drag_mode == mode, mode.label())
                        .clicked()
                        && session.drag_mode != mode
                    {
                        session.drag_mode = mode;
                        result.changed = true;
                    }
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Set to now").clicked() {
                    result.set_now = true;
                }
                if ui.button("Random").clicked() {
                    result.randomize = true;
                }
            });
            if ui.button("Read time").clicked() {
                result.read_time = true;
            }

            ui.separator();
            ui.label("Arrows step minutes (Shift fine, Ctrl hours)");
        });

    result
}

/// Result of the learn panel
#[derive(Default)]
pub struct LearnResult {
    pub select: Option<usize>,
    pub start: bool,
    pub next: bool,
}

/// Draw the learn-mode panel: lesson list, tutorial text, progress
pub fn draw_learn_panel(
    ctx: &egui::Context,
    learn: &LearnState,
    progress: &ProgressStore,
) -> LearnResult {
    let mut result = LearnResult::default();

    egui::Window::new("Learn")
        .collapsible(true)
        .resizable(false)
        .default_width(260.0)
        .anchor(egui::Align2::LEFT_TOP, [10.0, 40.0])
        .show(ctx, |ui| {
            for (index, lesson) in LESSONS.iter().enumerate() {
                let stars = progress.lesson_stars(lesson.id);
                let label = format!(
                    "{} {}{}",
                    lesson.title,
                    "★".repeat(stars as usize),
                    "☆".repeat((MAX_STARS - stars) as usize)
                );
                if ui
                    .selectable_label(learn.selected_index() == Some(index), label)
                    .clicked()
                {
                    result.select = Some(index);
                }
            }

            ui.separator();

            if let Some(lesson) = learn.selected_lesson() {
                if learn.is_running() {
                    if let Some(step_text) = learn.current_step_text() {
                        ui.label(format!("Step {}:", learn.current_step() + 1));
                        ui.label(step_text);
                    }
                    if ui.button("Next step").clicked() {
                        result.next = true;
                    }
                } else {
                    ui.label(format!("Ready to learn about {}?", lesson.title));
                    if ui.button("Start lesson").clicked() {
                        result.start = true;
                    }
                }
            } else {
                ui.label("Pick a lesson to begin.");
            }

            ui.separator();
            let (completed, total) = progress.lessons_completed();
            let percent = (completed as f32 / total as f32 * 100.0).round();
            ui.label(format!("Progress: {}% ({} of {} lessons)", percent, completed, total));
            ui.label(format!("Points: {}", progress.total_points));
            ui.label(format!(
                "Streak: {} day(s) (best {})",
                progress.current_streak, progress.longest_streak
            ));
            if let Some(recommendation) = progress.recommendation() {
                ui.colored_label(ACCENT, recommendation);
            }

            if !progress.achievements.is_empty() {
                ui.separator();
                ui.label(format!("Achievements ({})", progress.achievements.len()));
                for id in &progress.achievements {
                    if let Some(def) = achievement_by_id(id) {
                        ui.label(format!("🏆 {}", def.name))
                            .on_hover_text(def.description);
                    }
                }
            }
        });

    result
}

/// Result of the quiz panel
#[derive(Default)]
pub struct QuizResult {
    pub start: bool,
    pub next: bool,
    pub answer: Option<usize>,
    pub set_difficulty: Option<Difficulty>,
}

/// Draw the quiz-mode panel
pub fn draw_quiz_panel(
    ctx: &egui::Context,
    quiz: &QuizState,
    progress: &ProgressStore,
) -> QuizResult {
    let mut result = QuizResult::default();

    egui::Window::new("Quiz")
        .collapsible(true)
        .resizable(false)
        .default_width(240.0)
        .anchor(egui::Align2::LEFT_TOP, [10.0, 40.0])
        .show(ctx, |ui| {
            ui.label("Difficulty");
            ui.horizontal(|ui| {
                for difficulty in Difficulty::ALL {
                    if ui
                        .selectable_label(quiz.difficulty == difficulty, difficulty.label())
                        .clicked()
                        && quiz.difficulty != difficulty
                    {
                        result.set_difficulty = Some(difficulty);
                    }
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                ui.label(format!("Score: {}", quiz.score));
                ui.label(format!("Streak: {}", quiz.streak));
                ui.label(format!(
                    "Best: {} ({})",
                    progress.quiz_best_score, progress.quiz_best_streak
                ));
            });
            let stats = progress.concept_stats(quiz.difficulty.concept());
            if stats.attempts > 0 {
                ui.label(format!(
                    "Mastery: {}% · Accuracy: {:.0}%",
                    stats.mastery,
                    stats.accuracy() * 100.0
                ));
            }

            ui.separator();

            if let Some(question) = quiz.current_question() {
                ui.label("What time is shown?");
                for (index, option) in question.options.iter().enumerate() {
                    let response =
                        ui.add_enabled(quiz.answered.is_none(), egui::Button::new(*option));
                    if response.clicked() {
                        result.answer = Some(index);
                    }
                    // After answering, mark the picked and correct options
                    if let Some(picked) = quiz.answered {
                        if index == question.correct {
                            ui.colored_label(CORRECT, format!("✔ {}", option));
                        } else if index == picked {
                            ui.colored_label(INCORRECT, format!("✘ {}", option));
                        }
                    }
                }

                if quiz.answered.is_some() && ui.button("Next question").clicked() {
                    result.next = true;
                }
            } else {
                let label = if quiz.active { "Restart quiz" } else { "Start quiz" };
                if ui.button(label).clicked() {
                    result.start = true;
                }
            }
        });

    result
}

/// Result of the games panel
#[derive(Default)]
pub struct GamesResult {
    pub start: Option<GameKind>,
    pub end: bool,
    pub check: bool,
    pub dial_changed: bool,
}

fn draw_dial(ui: &mut egui::Ui, dial: &mut AnswerDial) -> bool {
    let mut changed = false;
    ui.label("Your answer:");
    ui.horizontal(|ui| {
        ui.label("Hour");
        if ui.small_button("-").clicked() {
            dial.hour = if dial.hour <= 1 { 12 } else { dial.hour - 1 };
            changed = true;
        }
        ui.label(format!("{:2}", dial.hour));
        if ui.small_button("+").clicked() {
            dial.hour = if dial.hour >= 12 { 1 } else { dial.hour + 1 };
            changed = true;
        }
    });
    ui.horizontal(|ui| {
        ui.label("Minute");
        for minute in [0u32, 15, 30, 45] {
            if ui
                .selectable_label(dial.minute == minute, format!("{:02}", minute))
                .clicked()
                && dial.minute != minute
            {
                dial.minute = minute;
                changed = true;
            }
        }
    });
    changed
}

/// Draw the games-mode panel
pub fn draw_games_panel(
    ctx: &egui::Context,
    games: &mut GamesState,
    progress: &ProgressStore,
) -> GamesResult {
    let mut result = GamesResult::default();

    egui::Window::new("Games")
        .collapsible(true)
        .resizable(false)
        .default_width(260.0)
        .anchor(egui::Align2::LEFT_TOP, [10.0, 40.0])
        .show(ctx, |ui| {
            match &games.active {
                None => {
                    for kind in GameKind::ALL {
                        if ui.button(kind.label()).clicked() {
                            result.start = Some(kind);
                        }
                        ui.label(kind.tagline());
                        ui.separator();
                    }
                    if let Some(best) = progress.games.race_best_secs {
                        ui.label(format!("Race best: {:.1}s", best));
                    }
                    ui.label(format!(
                        "Detective solved: {} of {}",
                        progress.games.detective_solved, progress.games.detective_plays
                    ));
                    ui.label(format!(
                        "Memory perfect: {} of {}",
                        progress.games.memory_perfect, progress.games.memory_plays
                    ));
                }
                Some(ActiveGame::Race(race)) => {
                    ui.label("Race the Clock");
                    ui.label(format!("Set the clock to show: {}", race.target.format()));
                    ui.colored_label(ACCENT, format!("Time: {:.1}s", race.elapsed_secs()));
                    ui.separator();
                    match race.result {
                        None => {
                            result.dial_changed = draw_dial(ui, &mut games.dial);
                            if ui.button("Check answer").clicked() {
                                result.check = true;
                            }
                        }
                        Some(outcome) => {
                            if outcome.correct {
                                ui.colored_label(
                                    CORRECT,
                                    format!(
                                        "Correct! You set the clock in {:.1} seconds",
                                        outcome.elapsed_secs
                                    ),
                                );
                            } else {
                                ui.colored_label(INCORRECT, "Not quite right!");
                            }
                            if ui.button("Play again").clicked() {
                                result.start = Some(GameKind::Race);
                            }
                        }
                    }
                    if ui.button("End game").clicked() {
                        result.end = true;
                    }
                }
                Some(ActiveGame::Detective(detective)) => {
                    ui.label("Time Detective");
                    ui.label("Study these clues and figure out the time!");
                    for clue in &detective.clues {
                        ui.label(format!("• {}", clue));
                    }
                    ui.separator();
                    match detective.solved {
                        None => {
                            draw_dial(ui, &mut games.dial);
                            if ui.button("Submit answer").clicked() {
                                result.check = true;
                            }
                        }
                        Some(true) => {
                            ui.colored_label(
                                CORRECT,
                                format!(
                                    "Case solved! It was {}",
                                    detective.mystery.format()
                                ),
                            );
                            if ui.button("New mystery").clicked() {
                                result.start = Some(GameKind::Detective);
                            }
                        }
                        Some(false) => {
                            ui.colored_label(
                                INCORRECT,
                                format!(
                                    "Not quite. The correct time was {}",
                                    detective.mystery.format()
                                ),
                            );
                            if ui.button("Try another").clicked() {
                                result.start = Some(GameKind::Detective);
                            }
                        }
                    }
                    if ui.button("End game").clicked() {
                        result.end = true;
                    }
                }
                Some(ActiveGame::Memory(memory)) => {
                    ui.label("Clock Memory");
                    match memory.phase {
                        MemoryPhase::Showing { index } => {
                            ui.label("Watch carefully! Memorize this sequence...");
                            ui.colored_label(
                                ACCENT,
                                egui::RichText::new(memory.sequence[index].format()).size(28.0),
                            );
                            ui.label(format!(
                                "Time {} of {}",
                                index + 1,
                                memory.sequence.len()
                            ));
                        }
                        MemoryPhase::Recall { step } => {
                            ui.label("Now set the clock to each time in order.");
                            ui.label(format!("Time {} of {}", step + 1, memory.sequence.len()));
                            result.dial_changed = draw_dial(ui, &mut games.dial);
                            if ui.button("Check this time").clicked() {
                                result.check = true;
                            }
                        }
                        MemoryPhase::Done { success } => {
                            if success {
                                ui.colored_label(
                                    CORRECT,
                                    format!(
                                        "Perfect memory! All {} times correct",
                                        memory.sequence.len()
                                    ),
                                );
                            } else {
                                ui.colored_label(INCORRECT, "Not quite right!");
                            }
                            if ui.button("Play again").clicked() {
                                result.start = Some(GameKind::Memory);
                            }
                        }
                    }
                    if ui.button("End game").clicked() {
                        result.end = true;
                    }
                }
            }
        });

    result
}

/// Result of the settings panel
#[derive(Default)]
pub struct SettingsResult {
    pub changed: bool,
    pub open_picker: bool,
}

/// Draw the settings panel (display prefs and timezone)
pub fn draw_settings_panel(
    ctx: &egui::Context,
    show_digital: &mut bool,
    show_seconds: &mut bool,
    hour_cycle: &mut HourCycle,
    reduced_motion: &mut bool,
    time_data: &TimeData,
    current_tz: Tz,
) -> SettingsResult {
    let mut result = SettingsResult::default();

    egui::Window::new("Settings")
        .collapsible(true)
        .resizable(false)
        .default_width(220.0)
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 40.0])
        .show(ctx, |ui| {
            result.changed |= ui.checkbox(show_digital, "Digital readout").changed();
            result.changed |= ui.checkbox(show_seconds, "Show seconds").changed();
            result.changed |= ui.checkbox(reduced_motion, "Reduced motion").changed();

            ui.separator();
            ui.label("Hour cycle");
            ui.horizontal(|ui| {
                for (cycle, label) in [(HourCycle::Twelve, "12h"), (HourCycle::TwentyFour, "24h")]
                {
                    if ui.selectable_label(*hour_cycle == cycle, label).clicked()
                        && *hour_cycle != cycle
                    {
                        *hour_cycle = cycle;
                        result.changed = true;
                    }
                }
            });

            ui.separator();
            let tz_text = format!(
                "{} ({}) · {}",
                current_tz.name(),
                time_data.tz_abbrev,
                time_data.format_utc_offset()
            );
            ui.label(tz_text);
            if ui.button("Change time zone").clicked() {
                result.open_picker = true;
            }
        });

    result
}
