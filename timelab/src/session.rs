//! Clock interaction session - angle math, time model, drag state machine
//!
//! The session owns the displayed time and everything about how the user
//! may manipulate it. It is deliberately free of windowing types: handlers
//! feed it clock-face angles and it hands back a time value for the
//! projection layer, so the whole state machine is testable headless.

use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::TimeData;

/// One of the three rotating indicators on the clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandKind {
    Hour,
    Minute,
    Second,
}

/// Policy governing whether hands move independently or with
/// mechanical coupling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragMode {
    /// Each hand follows the pointer directly, no cross-field coupling
    Independent,
    /// Hands snap to whole positions; the minute hand carries into the hour
    Snapped,
}

impl DragMode {
    pub fn label(self) -> &'static str {
        match self {
            DragMode::Independent => "Independent",
            DragMode::Snapped => "Snapped",
        }
    }
}

/// Top-level application mode, switched only by explicit user action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Normal,
    Interactive,
    Learn,
    Quiz,
    Games,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Normal,
        Mode::Interactive,
        Mode::Learn,
        Mode::Quiz,
        Mode::Games,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "Clock",
            Mode::Interactive => "Interactive",
            Mode::Learn => "Learn",
            Mode::Quiz => "Quiz",
            Mode::Games => "Games",
        }
    }

    /// Normal mode renders the wall clock; every other mode renders the
    /// session's own time value.
    pub fn uses_wall_clock(self) -> bool {
        matches!(self, Mode::Normal)
    }

    /// Hands may only be grabbed in interactive mode.
    pub fn allows_drag(self) -> bool {
        matches!(self, Mode::Interactive)
    }
}

/// Which hands are shown while in interactive mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandVisibility {
    pub hour: bool,
    pub minute: bool,
    pub second: bool,
}

impl Default for HandVisibility {
    fn default() -> Self {
        Self {
            hour: true,
            minute: true,
            second: false,
        }
    }
}

impl HandVisibility {
    pub fn shows(&self, hand: HandKind) -> bool {
        match hand {
            HandKind::Hour => self.hour,
            HandKind::Minute => self.minute,
            HandKind::Second => self.second,
        }
    }
}

/// Fractional time-of-day used for interactive display
///
/// Fields may hold fractional values so a hand can rest between marks
/// during a continuous drag. Invariant: `0 <= h < 24`, `0 <= m, s < 60`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeValue {
    pub h: f64,
    pub m: f64,
    pub s: f64,
}

impl TimeValue {
    pub fn new(h: f64, m: f64, s: f64) -> Self {
        Self {
            h: h.rem_euclid(24.0),
            m: m.rem_euclid(60.0),
            s: s.rem_euclid(60.0),
        }
    }

    /// Snapshot of the wall clock (whole-valued fields)
    pub fn from_wall(data: &TimeData) -> Self {
        Self::new(data.hour24 as f64, data.minute as f64, data.second as f64)
    }

    /// Uniform random whole-valued time over the full day
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            h: rng.gen_range(0..24) as f64,
            m: rng.gen_range(0..60) as f64,
            s: rng.gen_range(0..60) as f64,
        }
    }

    /// Whether the value falls in the PM half of the day
    pub fn is_pm(&self) -> bool {
        self.h >= 12.0
    }

    /// Truncated integer fields for display and comparison
    pub fn hms(&self) -> (u32, u32, u32) {
        (
            self.h.floor() as u32 % 24,
            self.m.floor() as u32 % 60,
            self.s.floor() as u32 % 60,
        )
    }
}

impl Default for TimeValue {
    fn default() -> Self {
        // The traditional storefront clock position
        Self {
            h: 10.0,
            m: 0.0,
            s: 0.0,
        }
    }
}

/// Angle of a pointer position around the clock center, in degrees
/// clockwise from 12 o'clock, normalized into `[0, 360)`.
///
/// Coordinates are y-up (nannou convention), so 12 o'clock is +y and the
/// clockwise angle is `atan2(dx, dy)`.
pub fn angle_from_pointer(x: f32, y: f32, cx: f32, cy: f32) -> f32 {
    let dx = x - cx;
    let dy = y - cy;
    // rem_euclid can round a tiny negative angle up to a full turn
    let deg = dx.atan2(dy).to_degrees().rem_euclid(360.0);
    if deg < 360.0 {
        deg
    } else {
        0.0
    }
}

/// Convert an angle to a fractional unit value in `[0, units)`
pub fn degrees_to_unit(angle: f32, units: f64) -> f64 {
    (angle as f64 * units / 360.0).rem_euclid(units)
}

/// Convert an angle to the nearest whole unit, wrapping `units -> 0`
pub fn snap_to_unit(angle: f32, units: u32) -> u32 {
    let step = 360.0 / units as f64;
    ((angle as f64 / step).round() as u32) % units
}

/// Drag-session lifecycle: at most one hand is dragged at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(HandKind),
}

/// Owned interaction state, passed explicitly into every handler
pub struct InteractionSession {
    pub time: TimeValue,
    pub mode: Mode,
    pub drag_mode: DragMode,
    pub visibility: HandVisibility,
    pub allow_drag: bool,
    pub spotlight: bool,
    drag: DragState,
}

impl Default for InteractionSession {
    fn default() -> Self {
        Self {
            time: TimeValue::default(),
            mode: Mode::Normal,
            drag_mode: DragMode::Independent,
            visibility: HandVisibility::default(),
            allow_drag: true,
            spotlight: true,
            drag: DragState::Idle,
        }
    }
}

impl InteractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hand currently being dragged, if any
    pub fn dragging(&self) -> Option<HandKind> {
        match self.drag {
            DragState::Idle => None,
            DragState::Dragging(hand) => Some(hand),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    /// Try to start dragging a hand.
    ///
    /// Guards: interactive mode, dragging enabled, hand visible, and no
    /// other hand already held (exclusive lock). Returns whether the
    /// drag started.
    pub fn begin_drag(&mut self, hand: HandKind) -> bool {
        if !self.mode.allows_drag() || !self.allow_drag {
            return false;
        }
        if !self.visibility.shows(hand) {
            return false;
        }
        if self.drag != DragState::Idle {
            return false;
        }
        self.drag = DragState::Dragging(hand);
        true
    }

    /// Move the dragged hand to a new clock-face angle.
    ///
    /// No-op while idle. Updates the time value per the active drag mode.
    pub fn drag_to(&mut self, angle_deg: f32) {
        let hand = match self.drag {
            DragState::Idle => return,
            DragState::Dragging(hand) => hand,
        };
        match hand {
            HandKind::Hour => self.update_hour_from_angle(angle_deg),
            HandKind::Minute => self.update_minute_from_angle(angle_deg),
            HandKind::Second => self.update_second_from_angle(angle_deg),
        }
    }

    /// End the drag. Always legal; idempotent. Callers invoke this from
    /// globally-registered release handlers so a drag terminates no
    /// matter where the pointer lands.
    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Switch mode. Leaving interactive mode while a drag is in flight
    /// force-terminates it so no session is orphaned.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        if !mode.allows_drag() {
            self.end_drag();
        }
        self.mode = mode;
    }

    /// Replace the whole time value
    pub fn set_time(&mut self, time: TimeValue) {
        self.time = time;
    }

    pub fn set_to_now(&mut self, data: &TimeData) {
        self.time = TimeValue::from_wall(data);
    }

    pub fn randomize(&mut self, rng: &mut impl Rng) {
        self.time = TimeValue::random(rng);
    }

    /// Keyboard nudge: step the minute, wrapping within the hour
    pub fn nudge_minute(&mut self, delta: f64) {
        self.time.m = (self.time.m + delta).rem_euclid(60.0);
    }

    /// Keyboard nudge: step the hour
    pub fn nudge_hour(&mut self, delta: f64) {
        self.time.h = (self.time.h + delta).rem_euclid(24.0);
    }

    fn update_hour_from_angle(&mut self, angle: f32) {
        let was_pm = self.time.is_pm();
        match self.drag_mode {
            DragMode::Snapped => {
                // Nearest of 12 positions, keeping the existing half of
                // the day (unit 0 is the 12 o'clock mark)
                let unit = snap_to_unit(angle, 12) as f64;
                self.time.h = unit + if was_pm { 12.0 } else { 0.0 };
            }
            DragMode::Independent => {
                let unit = degrees_to_unit(angle, 12.0);
                self.time.h = unit + if was_pm { 12.0 } else { 0.0 };
            }
        }
    }

    fn update_minute_from_angle(&mut self, angle: f32) {
        match self.drag_mode {
            DragMode::Snapped => {
                let old = self.time.m;
                let new = snap_to_unit(angle, 60) as f64;
                // Boundary heuristic for which way the hand swept past 12:
                // approximate, misfires on a >30-minute jump in one event
                if old > 45.0 && new < 15.0 {
                    self.time.h = (self.time.h + 1.0).rem_euclid(24.0);
                } else if old < 15.0 && new > 45.0 {
                    self.time.h = (self.time.h - 1.0).rem_euclid(24.0);
                }
                self.time.m = new;
            }
            DragMode::Independent => {
                self.time.m = degrees_to_unit(angle, 60.0);
            }
        }
    }

    fn update_second_from_angle(&mut self, angle: f32) {
        match self.drag_mode {
            // No carry into the minute field
            DragMode::Snapped => self.time.s = snap_to_unit(angle, 60) as f64,
            DragMode::Independent => self.time.s = degrees_to_unit(angle, 60.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn interactive_session(drag_mode: DragMode) -> InteractionSession {
        let mut session = InteractionSession::new();
        session.set_mode(Mode::Interactive);
        session.drag_mode = drag_mode;
        session.visibility.second = true;
        session
    }

    #[test]
    fn test_angle_from_pointer_cardinal_points() {
        // 12 o'clock (directly above center)
        assert_eq!(angle_from_pointer(0.0, 10.0, 0.0, 0.0), 0.0);
        // 3, 6, and 9 o'clock
        assert!((angle_from_pointer(10.0, 0.0, 0.0, 0.0) - 90.0).abs() < 1e-3);
        assert!((angle_from_pointer(0.0, -10.0, 0.0, 0.0) - 180.0).abs() < 1e-3);
        assert!((angle_from_pointer(-10.0, 0.0, 0.0, 0.0) - 270.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_from_pointer_in_range() {
        for i in 0..360 {
            let rad = (i as f32).to_radians();
            let angle = angle_from_pointer(rad.sin() * 50.0, rad.cos() * 50.0, 0.0, 0.0);
            assert!((0.0..360.0).contains(&angle));
        }
    }

    #[test]
    fn test_snap_to_unit_hour_grid() {
        for k in 0..12u32 {
            assert_eq!(snap_to_unit(k as f32 * 30.0, 12), k);
        }
        // Nearest-rounding wraps 359 degrees back to the 12 o'clock mark
        assert_eq!(snap_to_unit(359.0, 12), 0);
    }

    #[test]
    fn test_degrees_to_unit_fractional() {
        assert!((degrees_to_unit(90.0, 12.0) - 3.0).abs() < 1e-9);
        assert!((degrees_to_unit(3.0, 60.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_snapped_minute_forward_wrap_increments_hour() {
        let mut session = interactive_session(DragMode::Snapped);
        session.set_time(TimeValue::new(10.0, 58.0, 0.0));
        assert!(session.begin_drag(HandKind::Minute));
        session.drag_to(2.0 * 6.0); // angle for m=2
        session.end_drag();
        let (h, m, _) = session.time.hms();
        assert_eq!(m, 2);
        assert_eq!(h, 11);
    }

    #[test]
    fn test_snapped_minute_backward_wrap_decrements_hour() {
        let mut session = interactive_session(DragMode::Snapped);
        session.set_time(TimeValue::new(10.0, 2.0, 0.0));
        assert!(session.begin_drag(HandKind::Minute));
        session.drag_to(58.0 * 6.0); // angle for m=58
        session.end_drag();
        let (h, m, _) = session.time.hms();
        assert_eq!(m, 58);
        assert_eq!(h, 9);
    }

    #[test]
    fn test_snapped_minute_wrap_across_midnight() {
        let mut session = interactive_session(DragMode::Snapped);
        session.set_time(TimeValue::new(23.0, 58.0, 0.0));
        session.begin_drag(HandKind::Minute);
        session.drag_to(0.0);
        assert_eq!(session.time.hms().0, 0);
    }

    #[test]
    fn test_snapped_hour_preserves_meridiem() {
        let mut session = interactive_session(DragMode::Snapped);
        session.set_time(TimeValue::new(15.0, 0.0, 0.0)); // 3 PM
        session.begin_drag(HandKind::Hour);
        session.drag_to(9.0 * 30.0); // drag to the 9 position
        assert_eq!(session.time.hms().0, 21); // 9 PM, not 9 AM
    }

    #[test]
    fn test_independent_hour_is_fractional() {
        let mut session = interactive_session(DragMode::Independent);
        session.set_time(TimeValue::new(3.0, 0.0, 0.0));
        session.begin_drag(HandKind::Hour);
        session.drag_to(45.0); // halfway between 1 and 2
        assert!((session.time.h - 1.5).abs() < 1e-6);
        // Minute untouched: no coupling in independent mode
        assert_eq!(session.time.m, 0.0);
    }

    #[test]
    fn test_second_snap_has_no_minute_carry() {
        let mut session = interactive_session(DragMode::Snapped);
        session.set_time(TimeValue::new(10.0, 30.0, 58.0));
        session.begin_drag(HandKind::Second);
        session.drag_to(2.0 * 6.0);
        let (h, m, s) = session.time.hms();
        assert_eq!((h, m, s), (10, 30, 2));
    }

    #[test]
    fn test_drag_exclusivity() {
        let mut session = interactive_session(DragMode::Snapped);
        assert!(session.begin_drag(HandKind::Hour));
        // A second pointer-down while one hand is held is ignored
        assert!(!session.begin_drag(HandKind::Minute));
        assert_eq!(session.dragging(), Some(HandKind::Hour));
        session.end_drag();
        assert!(session.begin_drag(HandKind::Minute));
    }

    #[test]
    fn test_drag_guards() {
        let mut session = InteractionSession::new();
        // Normal mode: no dragging
        assert!(!session.begin_drag(HandKind::Hour));

        session.set_mode(Mode::Interactive);
        session.allow_drag = false;
        assert!(!session.begin_drag(HandKind::Hour));

        session.allow_drag = true;
        session.visibility.hour = false;
        assert!(!session.begin_drag(HandKind::Hour));
        assert!(session.begin_drag(HandKind::Minute));
    }

    #[test]
    fn test_end_drag_is_idempotent() {
        let mut session = interactive_session(DragMode::Snapped);
        session.end_drag();
        assert!(!session.is_dragging());
        session.begin_drag(HandKind::Hour);
        session.end_drag();
        session.end_drag();
        assert!(!session.is_dragging());
    }

    #[test]
    fn test_mode_switch_terminates_drag() {
        let mut session = interactive_session(DragMode::Snapped);
        session.begin_drag(HandKind::Minute);
        session.set_mode(Mode::Learn);
        assert!(!session.is_dragging());
        // And back in interactive mode a fresh drag is possible
        session.set_mode(Mode::Interactive);
        assert!(session.begin_drag(HandKind::Minute));
    }

    #[test]
    fn test_drag_to_while_idle_is_noop() {
        let mut session = interactive_session(DragMode::Snapped);
        let before = session.time;
        session.drag_to(90.0);
        assert_eq!(session.time, before);
    }

    #[test]
    fn test_random_time_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let t = TimeValue::random(&mut rng);
            assert!(t.h >= 0.0 && t.h < 24.0);
            assert!(t.m >= 0.0 && t.m < 60.0);
            assert!(t.s >= 0.0 && t.s < 60.0);
            assert_eq!(t.h.fract(), 0.0);
        }
    }

    #[test]
    fn test_time_value_normalizes() {
        let t = TimeValue::new(-1.0, 61.0, -0.5);
        assert_eq!(t.h, 23.0);
        assert_eq!(t.m, 1.0);
        assert_eq!(t.s, 59.5);
    }

    #[test]
    fn test_nudges_wrap() {
        let mut session = interactive_session(DragMode::Snapped);
        session.set_time(TimeValue::new(0.0, 58.0, 0.0));
        session.nudge_minute(5.0);
        assert_eq!(session.time.m, 3.0);
        session.nudge_hour(-1.0);
        assert_eq!(session.time.h, 23.0);
    }
}
