//! TimeLab - interactive educational analog clock
//!
//! An analog clock with draggable hands and a set of learning modes:
//! guided lessons, reading quizzes, and small games, backed by a
//! persisted learner progress store.

mod drawing;
mod games;
mod lessons;
mod progress;
mod projection;
mod quiz;
mod session;
mod ui;

use std::time::Instant;

use chrono_tz::Tz;
use nannou::prelude::*;
use nannou_egui::{self, Egui};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use shared::{compute_time_data, format_clock, spoken_time, HourCycle, TimeData};

use crate::drawing::Toast;
use crate::games::{ActiveGame, GameKind, GamesState, MemoryOutcome};
use crate::lessons::{LearnState, LessonOutcome};
use crate::progress::ProgressStore;
use crate::projection::{project_angles, toward_shortest, FaceGeometry, HandAngles};
use crate::quiz::QuizState;
use crate::session::{
    angle_from_pointer, DragMode, HandKind, HandVisibility, InteractionSession, Mode, TimeValue,
};
use crate::ui::PickerState;

const DEFAULT_TZ: &str = "America/Los_Angeles";
/// Wall-clock resample threshold (~60 updates/sec)
const TICK_INTERVAL_SECS: f32 = 1.0 / 60.0;
/// Exponential easing rate for hand rotation
const EASE_RATE: f32 = 14.0;

fn main() {
    nannou::app(model).update(update).run();
}

/// Persisted configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Config {
    selected_tz_id: String,
    favorites: Vec<String>,
    show_digital: bool,
    show_seconds: bool,
    show_numbers: bool,
    hour_cycle: HourCycle,
    reduced_motion: bool,
    drag_mode: DragMode,
    allow_drag: bool,
    spotlight: bool,
    hand_visibility: HandVisibility,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selected_tz_id: DEFAULT_TZ.to_string(),
            favorites: vec![
                "America/New_York".to_string(),
                "America/Los_Angeles".to_string(),
                "Europe/London".to_string(),
                "Asia/Tokyo".to_string(),
            ],
            show_digital: true,
            show_seconds: true,
            show_numbers: true,
            hour_cycle: HourCycle::TwentyFour,
            reduced_motion: false,
            drag_mode: DragMode::Independent,
            allow_drag: true,
            spotlight: true,
            hand_visibility: HandVisibility::default(),
        }
    }
}

/// Application state
struct Model {
    /// Interaction core: displayed time, mode, drag state machine
    session: InteractionSession,
    /// Wall-clock snapshot for normal mode
    time_data: TimeData,
    selected_tz: Tz,
    favorites: Vec<Tz>,

    /// Display settings
    show_digital: bool,
    show_seconds: bool,
    show_numbers: bool,
    hour_cycle: HourCycle,
    reduced_motion: bool,

    /// Mode-specific state
    learn: LearnState,
    quiz: QuizState,
    games: GamesState,
    progress: ProgressStore,

    /// Rendered hand angles, eased toward the projected target
    rendered: HandAngles,
    last_wall_sample: Instant,

    picker_state: PickerState,
    toasts: Vec<Toast>,
    rng: StdRng,

    /// egui integration
    egui: Egui,
}

impl Model {
    fn show_toast(&mut self, text: String) {
        self.toasts.push(Toast::new(text));
    }

    /// The time value driving the hands this frame
    fn render_time(&self) -> TimeValue {
        if self.session.mode.uses_wall_clock() {
            TimeValue::new(
                self.time_data.hour24 as f64,
                self.time_data.minute as f64,
                self.time_data.second as f64 + self.time_data.second_fraction,
            )
        } else {
            self.session.time
        }
    }

    /// Hand projection policy for the current mode. The wall clock
    /// always sweeps continuously.
    fn render_drag_mode(&self) -> DragMode {
        if self.session.mode.uses_wall_clock() {
            DragMode::Snapped
        } else {
            self.session.drag_mode
        }
    }

    /// Hand visibility effective in the current mode
    fn effective_visibility(&self) -> HandVisibility {
        if self.session.mode == Mode::Interactive {
            self.session.visibility
        } else {
            HandVisibility {
                hour: true,
                minute: true,
                second: self.show_seconds,
            }
        }
    }

    fn set_timezone(&mut self, tz: Tz) {
        self.selected_tz = tz;
        self.time_data = compute_time_data(tz);
        self.progress.mark_timezone_viewed(tz.name());
        let unlocked = self.progress.check_achievements();
        for achievement in unlocked {
            self.show_toast(format!("Achievement Unlocked: {}", achievement.name));
        }
        self.progress.save();
        save_config(self);
    }

    fn toggle_favorite(&mut self, tz: Tz) {
        if let Some(pos) = self.favorites.iter().position(|&t| t == tz) {
            self.favorites.remove(pos);
        } else {
            self.favorites.push(tz);
        }
        save_config(self);
    }

    /// Record one practiced answer and surface any unlocks as toasts
    fn record_practice(&mut self, concept: progress::Concept, correct: bool, response_ms: u64) {
        let today = chrono::Local::now().date_naive();
        let unlocked = self
            .progress
            .record_practice(concept, correct, response_ms, today);
        for achievement in unlocked {
            self.toasts
                .push(Toast::new(format!("Achievement Unlocked: {}", achievement.name)));
        }
        self.progress.save();
    }
}

fn save_config(model: &Model) {
    let config = Config {
        selected_tz_id: model.selected_tz.name().to_string(),
        favorites: model
            .favorites
            .iter()
            .map(|tz| tz.name().to_string())
            .collect(),
        show_digital: model.show_digital,
        show_seconds: model.show_seconds,
        show_numbers: model.show_numbers,
        hour_cycle: model.hour_cycle,
        reduced_motion: model.reduced_motion,
        drag_mode: model.session.drag_mode,
        allow_drag: model.session.allow_drag,
        spotlight: model.session.spotlight,
        hand_visibility: model.session.visibility,
    };
    if let Err(e) = shared::save_settings(&config) {
        eprintln!("Failed to save settings: {}", e);
    }
}

fn model(app: &App) -> Model {
    app.set_exit_on_escape(false);

    let window_id = app
        .new_window()
        .title("TimeLab")
        .size(1000, 760)
        .min_size(600, 500)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let config: Config = shared::load_settings()
        .ok()
        .flatten()
        .unwrap_or_default();

    let selected_tz: Tz = shared::parse_timezone(&config.selected_tz_id).unwrap_or_else(|e| {
        eprintln!("{}; using default", e);
        DEFAULT_TZ.parse().unwrap()
    });

    let favorites: Vec<Tz> = config
        .favorites
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let time_data = compute_time_data(selected_tz);

    let mut session = InteractionSession::new();
    session.drag_mode = config.drag_mode;
    session.allow_drag = config.allow_drag;
    session.spotlight = config.spotlight;
    session.visibility = config.hand_visibility;

    let mut progress = ProgressStore::load();
    progress.mark_timezone_viewed(selected_tz.name());

    let rendered = project_angles(
        &TimeValue::new(
            time_data.hour24 as f64,
            time_data.minute as f64,
            time_data.second as f64,
        ),
        DragMode::Snapped,
    );

    Model {
        session,
        time_data,
        selected_tz,
        favorites,
        show_digital: config.show_digital,
        show_seconds: config.show_seconds,
        show_numbers: config.show_numbers,
        hour_cycle: config.hour_cycle,
        reduced_motion: config.reduced_motion,
        learn: LearnState::default(),
        quiz: QuizState::default(),
        games: GamesState::default(),
        progress,
        rendered,
        last_wall_sample: Instant::now(),
        picker_state: PickerState::default(),
        toasts: Vec::new(),
        rng: StdRng::from_entropy(),
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    // Resample the wall clock, throttled to roughly one tick per frame
    // at 60fps (cheaper frames skip the resample)
    if model.last_wall_sample.elapsed().as_secs_f32() >= TICK_INTERVAL_SECS {
        model.time_data = compute_time_data(model.selected_tz);
        model.last_wall_sample = Instant::now();
    }

    // Advance the memory game's showing phase
    if let Some(ActiveGame::Memory(memory)) = &mut model.games.active {
        memory.tick();
    }

    model.toasts.retain(|toast| !toast.is_expired());

    // Begin egui frame
    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();

    let mode_selection = ui::draw_mode_bar(&ctx, model.session.mode);

    let interactive_result = if model.session.mode == Mode::Interactive {
        Some(ui::draw_interactive_panel(
            &ctx,
            &mut model.session,
            &mut model.show_numbers,
        ))
    } else {
        None
    };

    let learn_result = if model.session.mode == Mode::Learn {
        Some(ui::draw_learn_panel(&ctx, &model.learn, &model.progress))
    } else {
        None
    };

    let quiz_result = if model.session.mode == Mode::Quiz {
        Some(ui::draw_quiz_panel(&ctx, &model.quiz, &model.progress))
    } else {
        None
    };

    let games_result = if model.session.mode == Mode::Games {
        Some(ui::draw_games_panel(&ctx, &mut model.games, &model.progress))
    } else {
        None
    };

    let settings_result = ui::draw_settings_panel(
        &ctx,
        &mut model.show_digital,
        &mut model.show_seconds,
        &mut model.hour_cycle,
        &mut model.reduced_motion,
        &model.time_data,
        model.selected_tz,
    );

    let picker_result = ui::draw_timezone_picker(
        &ctx,
        &mut model.picker_state,
        model.selected_tz,
        &model.favorites,
    );

    drop(ctx);

    // Apply UI results now that the egui frame is closed
    if let Some(mode) = mode_selection {
        model.session.set_mode(mode);
        if mode != Mode::Quiz {
            model.quiz.stop();
        }
    }

    if let Some(result) = interactive_result {
        apply_interactive_result(model, result);
    }
    if let Some(result) = learn_result {
        apply_learn_result(model, result);
    }
    if let Some(result) = quiz_result {
        apply_quiz_result(model, result);
    }
    if let Some(result) = games_result {
        apply_games_result(model, result);
    }

    if settings_result.changed {
        save_config(model);
    }
    if settings_result.open_picker {
        model.picker_state.open();
    }

    if let Some(tz) = picker_result.selected_tz {
        model.set_timezone(tz);
    }
    if let Some(tz) = picker_result.toggle_favorite {
        model.toggle_favorite(tz);
    }
    if picker_result.close_picker {
        model.picker_state.close();
    }

    // Ease rendered angles toward the projection target along the
    // shorter angular path
    let target = project_angles(&model.render_time(), model.render_drag_mode());
    let dt = update.since_last.as_secs_f32();
    let dragged = model.session.dragging();
    model.rendered = HandAngles {
        hour: ease_angle(
            model.rendered.hour,
            target.hour,
            dt,
            model.reduced_motion || dragged == Some(HandKind::Hour),
        ),
        minute: ease_angle(
            model.rendered.minute,
            target.minute,
            dt,
            model.reduced_motion || dragged == Some(HandKind::Minute),
        ),
        second: ease_angle(
            model.rendered.second,
            target.second,
            dt,
            model.reduced_motion || dragged == Some(HandKind::Second),
        ),
    };
}

/// Move a rendered angle toward its target. The target is re-expressed
/// within half a turn of the current angle first, so transitions across
/// the 12 o'clock boundary never spin the long way around.
fn ease_angle(current: f32, target: f32, dt: f32, snap: bool) -> f32 {
    let target = toward_shortest(current, target);
    let next = if snap {
        target
    } else {
        current + (target - current) * (1.0 - (-EASE_RATE * dt).exp())
    };
    next.rem_euclid(360.0)
}

fn apply_interactive_result(model: &mut Model, result: ui::InteractiveResult) {
    if result.changed {
        // Hiding the dragged hand would orphan the session
        if let Some(hand) = model.session.dragging() {
            if !model.session.visibility.shows(hand) || !model.session.allow_drag {
                model.session.end_drag();
            }
        }
        save_config(model);
    }
    if result.set_now {
        let data = model.time_data.clone();
        model.session.set_to_now(&data);
    }
    if result.randomize {
        model.session.randomize(&mut model.rng);
    }
    if result.read_time {
        let time = model.session.time;
        model.show_toast(spoken_time(time.h, time.m));
    }
}

fn apply_learn_result(model: &mut Model, result: ui::LearnResult) {
    if let Some(index) = result.select {
        model.learn.select(index);
    }
    if result.start {
        model.learn.start();
    }
    if result.next {
        match model.learn.advance() {
            Some(LessonOutcome::Completed) => {
                if let Some(lesson) = model.learn.selected_lesson() {
                    let stars = model.progress.record_lesson_completion(lesson.id);
                    let concept = lesson.concept;
                    model.show_toast(format!("Lesson Complete! {} star(s)", stars));
                    model.record_practice(concept, true, 5000);
                }
            }
            Some(LessonOutcome::Step(_)) | None => {}
        }
    }
    // The final step of a running lesson puts its practice time on the clock
    if let Some(practice) = model.learn.practice_time() {
        model.session.set_time(practice);
    }
}

fn apply_quiz_result(model: &mut Model, result: ui::QuizResult) {
    if let Some(difficulty) = result.set_difficulty {
        model.quiz.difficulty = difficulty;
    }
    if result.start {
        let time = model.quiz.start(&mut model.rng);
        model.session.set_time(time);
    }
    if result.next {
        let time = model.quiz.next_question(&mut model.rng);
        model.session.set_time(time);
    }
    if let Some(index) = result.answer {
        if let Some(verdict) = model.quiz.answer(index) {
            if verdict.correct {
                model.show_toast("Correct! Well done!".to_string());
            } else {
                model.show_toast(format!("Incorrect. The answer is {}", verdict.correct_text));
            }
            model
                .progress
                .record_quiz_bests(model.quiz.score, model.quiz.best_streak);
            model.record_practice(verdict.concept, verdict.correct, verdict.response_ms);
        }
    }
}

fn apply_games_result(model: &mut Model, result: ui::GamesResult) {
    if let Some(kind) = result.start {
        model.games.start(kind, &mut model.rng);
        if matches!(kind, GameKind::Race) {
            let time = model.games.dial.time();
            model.session.set_time(time);
        }
    }
    if result.dial_changed {
        let time = model.games.dial.time();
        model.session.set_time(time);
    }
    if result.check {
        check_active_game(model);
    }
    if result.end {
        model.games.end();
    }
}

fn check_active_game(model: &mut Model) {
    let mut toast = None;
    match &mut model.games.active {
        Some(ActiveGame::Race(race)) if race.result.is_none() => {
            let outcome = race.check(&model.session.time);
            model.progress.record_race(outcome.correct, outcome.elapsed_secs);
            model.progress.save();
        }
        Some(ActiveGame::Detective(detective)) if detective.solved.is_none() => {
            let solved = detective.check(model.games.dial.dialed());
            model.progress.record_detective(solved);
            model.progress.save();
        }
        Some(ActiveGame::Memory(memory)) => match memory.check(&model.session.time) {
            Some(MemoryOutcome::CorrectNext { .. }) => {
                toast = Some("Correct! Next time...".to_string());
            }
            Some(MemoryOutcome::AllCorrect) => {
                model.progress.record_memory(true);
                model.progress.save();
            }
            Some(MemoryOutcome::Wrong { expected }) => {
                toast = Some(format!("It should have been {}", expected.format()));
                model.progress.record_memory(false);
                model.progress.save();
            }
            None => {}
        },
        _ => {}
    }
    if let Some(text) = toast {
        model.show_toast(text);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    draw.background().color(drawing::colors::BACKGROUND);

    let geometry = FaceGeometry::calculate(window_rect);
    let visibility = model.effective_visibility();

    drawing::draw_clock_face(&draw, &geometry, model.show_numbers);

    if model.session.mode.allows_drag() && model.session.allow_drag {
        drawing::draw_interactive_ring(&draw, &geometry);
    }

    drawing::draw_hands(
        &draw,
        &geometry,
        &model.rendered,
        &visibility,
        model.session.dragging(),
    );

    if model.session.mode == Mode::Interactive {
        drawing::draw_indicator_dots(&draw, &geometry, &model.rendered, &visibility);
    }

    if model.session.spotlight {
        if let Some(hand) = model.session.dragging() {
            drawing::draw_spotlight(&draw, &geometry, model.rendered.get(hand));
        }
    }

    if model.show_digital {
        let time = model.render_time();
        let text = format_clock(time.h, time.m, time.s, model.hour_cycle, model.show_seconds);
        drawing::draw_digital(&draw, &text, window_rect);
    }

    if model.session.mode == Mode::Normal {
        let label = format!("Timezone: {}", model.selected_tz.name());
        drawing::draw_timezone_label(&draw, &label, window_rect);
    }

    drawing::draw_toasts(&draw, &model.toasts, window_rect);

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let mods = app.keys.mods;

    match key {
        Key::Escape => {
            if model.picker_state.is_open {
                model.picker_state.close();
            }
        }
        Key::T => {
            if !model.picker_state.is_open {
                model.picker_state.open();
            }
        }
        // Keyboard hand control in interactive mode: arrows step the
        // minute (Shift for fine steps, Ctrl/Cmd steps the hour)
        Key::Up | Key::Right | Key::Down | Key::Left
            if model.session.mode == Mode::Interactive =>
        {
            let forward = matches!(key, Key::Up | Key::Right);
            let sign = if forward { 1.0 } else { -1.0 };
            if mods.ctrl() || mods.logo() {
                model.session.nudge_hour(sign);
            } else {
                let step = if mods.shift() { 1.0 } else { 5.0 };
                model.session.nudge_minute(sign * step);
            }
            let time = model.session.time;
            model.show_toast(format!(
                "Time: {}",
                format_clock(time.h, time.m, time.s, model.hour_cycle, false)
            ));
        }
        Key::H if model.session.mode == Mode::Interactive => {
            model.session.nudge_hour(1.0);
        }
        Key::M if model.session.mode == Mode::Interactive => {
            model.session.nudge_minute(15.0);
        }
        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    let pos = app.mouse.position();
    let geometry = FaceGeometry::calculate(app.window_rect());

    if let Some(hand) = geometry.hit_test_hand(pos, &model.rendered, &model.session.visibility) {
        model.session.begin_drag(hand);
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    if model.session.is_dragging() {
        let geometry = FaceGeometry::calculate(app.window_rect());
        let angle = angle_from_pointer(pos.x, pos.y, geometry.center.x, geometry.center.y);
        model.session.drag_to(angle);
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    // Registered window-wide: a drag released outside the face (or the
    // window) still terminates
    if button == MouseButton::Left {
        model.session.end_drag();
    }
}

fn raw_window_event(app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);

    match event {
        nannou::winit::event::WindowEvent::Focused(focused) => {
            if *focused {
                // Resync time on focus
                model.time_data = compute_time_data(model.selected_tz);
                model.last_wall_sample = Instant::now();
            }
        }
        // Touch maps to the same drag lifecycle as the mouse
        nannou::winit::event::WindowEvent::Touch(touch) => {
            let window_rect = app.window_rect();
            let geometry = FaceGeometry::calculate(window_rect);

            let pos_x = touch.location.x as f32 - window_rect.w() / 2.0;
            let pos_y = window_rect.h() / 2.0 - touch.location.y as f32;

            match touch.phase {
                nannou::winit::event::TouchPhase::Started => {
                    let pos = pt2(pos_x, pos_y);
                    if let Some(hand) =
                        geometry.hit_test_hand(pos, &model.rendered, &model.session.visibility)
                    {
                        model.session.begin_drag(hand);
                    }
                }
                nannou::winit::event::TouchPhase::Moved => {
                    if model.session.is_dragging() {
                        let angle = angle_from_pointer(
                            pos_x,
                            pos_y,
                            geometry.center.x,
                            geometry.center.y,
                        );
                        model.session.drag_to(angle);
                    }
                }
                nannou::winit::event::TouchPhase::Ended
                | nannou::winit::event::TouchPhase::Cancelled => {
                    model.session.end_drag();
                }
            }
        }
        _ => {}
    }
}
