//! Games mode - Race the Clock, Time Detective, Clock Memory
//!
//! Small game state machines over quarter-hour target times. Answers are
//! dialed on the clock through the games panel; checking compares the
//! truncated hour/minute reading.

use std::time::Instant;

use rand::Rng;

use crate::session::TimeValue;

/// How long each time in a memory sequence stays on screen
pub const MEMORY_SHOW_SECS: f32 = 2.0;
pub const MEMORY_SEQUENCE_LEN: usize = 3;

const QUARTER_MINUTES: [u32; 4] = [0, 15, 30, 45];

/// A game target: 12-hour clock reading on a quarter-hour boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTime {
    /// Hour (1-12)
    pub hour: u32,
    /// Minute (0, 15, 30, or 45)
    pub minute: u32,
}

impl GameTime {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            hour: rng.gen_range(1..=12),
            minute: QUARTER_MINUTES[rng.gen_range(0..QUARTER_MINUTES.len())],
        }
    }

    pub fn format(&self) -> String {
        format!("{}:{:02}", self.hour, self.minute)
    }

    /// Compare against a displayed time value (12-hour reading,
    /// truncated fields)
    pub fn matches(&self, time: &TimeValue) -> bool {
        let (h, m, _) = time.hms();
        let h12 = match h % 12 {
            0 => 12,
            other => other,
        };
        h12 == self.hour && m == self.minute
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Race,
    Detective,
    Memory,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Race, GameKind::Detective, GameKind::Memory];

    pub fn label(self) -> &'static str {
        match self {
            GameKind::Race => "Race the Clock",
            GameKind::Detective => "Time Detective",
            GameKind::Memory => "Clock Memory",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            GameKind::Race => "Set the clock as fast as you can",
            GameKind::Detective => "Solve the time from the clues",
            GameKind::Memory => "Remember the times in order",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RaceResult {
    pub correct: bool,
    pub elapsed_secs: f32,
}

/// Race the Clock: dial the target time against a stopwatch
pub struct RaceGame {
    pub target: GameTime,
    started: Instant,
    pub result: Option<RaceResult>,
}

impl RaceGame {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            target: GameTime::random(rng),
            started: Instant::now(),
            result: None,
        }
    }

    pub fn elapsed_secs(&self) -> f32 {
        match self.result {
            Some(result) => result.elapsed_secs,
            None => self.started.elapsed().as_secs_f32(),
        }
    }

    /// Check the dialed time; stops the stopwatch
    pub fn check(&mut self, time: &TimeValue) -> RaceResult {
        let result = RaceResult {
            correct: self.target.matches(time),
            elapsed_secs: self.started.elapsed().as_secs_f32(),
        };
        self.result = Some(result);
        result
    }
}

/// Time Detective: derive the mystery time from generated clues
pub struct DetectiveGame {
    pub mystery: GameTime,
    pub clues: Vec<String>,
    pub solved: Option<bool>,
}

impl DetectiveGame {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mystery = GameTime::random(rng);
        Self {
            mystery,
            clues: clues_for(mystery),
            solved: None,
        }
    }

    pub fn check(&mut self, guess: GameTime) -> bool {
        let correct = guess == self.mystery;
        self.solved = Some(correct);
        correct
    }
}

/// Clue derivation for the detective game
pub fn clues_for(time: GameTime) -> Vec<String> {
    let mut clues = Vec::new();

    if time.hour <= 6 {
        clues.push("It's morning time - before noon".to_string());
    } else {
        clues.push("It's later in the day - afternoon".to_string());
    }

    let direction = match time.minute {
        0 => "straight up",
        15 => "to the right",
        30 => "straight down",
        _ => "to the left",
    };
    clues.push(format!("The minute hand points {}", direction));

    let activity = match time.hour {
        1 => Some("Breakfast time"),
        3 => Some("Snack time"),
        6 => Some("Dinner time"),
        7 => Some("School starts"),
        8 => Some("Bedtime story"),
        12 => Some("Lunch time"),
        _ => None,
    };
    if let Some(activity) = activity {
        clues.push(activity.to_string());
    }

    clues
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryPhase {
    /// Showing `sequence[index]` to memorize
    Showing { index: usize },
    /// Recalling: the player dials `sequence[step]` next
    Recall { step: usize },
    Done { success: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryOutcome {
    CorrectNext { step: usize },
    AllCorrect,
    Wrong { expected: GameTime },
}

/// Clock Memory: memorize a short sequence, then dial it back in order
pub struct MemoryGame {
    pub sequence: Vec<GameTime>,
    pub phase: MemoryPhase,
    shown_at: Instant,
}

impl MemoryGame {
    pub fn new(rng: &mut impl Rng) -> Self {
        let sequence = (0..MEMORY_SEQUENCE_LEN)
            .map(|_| GameTime::random(rng))
            .collect();
        Self {
            sequence,
            phase: MemoryPhase::Showing { index: 0 },
            shown_at: Instant::now(),
        }
    }

    /// Advance the showing phase on its timer; call once per frame
    pub fn tick(&mut self) {
        if let MemoryPhase::Showing { index } = self.phase {
            if self.shown_at.elapsed().as_secs_f32() >= MEMORY_SHOW_SECS {
                if index + 1 < self.sequence.len() {
                    self.phase = MemoryPhase::Showing { index: index + 1 };
                    self.shown_at = Instant::now();
                } else {
                    self.phase = MemoryPhase::Recall { step: 0 };
                }
            }
        }
    }

    /// Check the dialed time against the next sequence entry.
    /// Only meaningful during recall; the first mistake ends the round.
    pub fn check(&mut self, time: &TimeValue) -> Option<MemoryOutcome> {
        let step = match self.phase {
            MemoryPhase::Recall { step } => step,
            _ => return None,
        };
        let expected = self.sequence[step];
        if !expected.matches(time) {
            self.phase = MemoryPhase::Done { success: false };
            return Some(MemoryOutcome::Wrong { expected });
        }
        if step + 1 < self.sequence.len() {
            self.phase = MemoryPhase::Recall { step: step + 1 };
            Some(MemoryOutcome::CorrectNext { step: step + 1 })
        } else {
            self.phase = MemoryPhase::Done { success: true };
            Some(MemoryOutcome::AllCorrect)
        }
    }
}

/// One game running at a time
pub enum ActiveGame {
    Race(RaceGame),
    Detective(DetectiveGame),
    Memory(MemoryGame),
}

impl ActiveGame {
    #[allow(dead_code)]
    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Race(_) => GameKind::Race,
            ActiveGame::Detective(_) => GameKind::Detective,
            ActiveGame::Memory(_) => GameKind::Memory,
        }
    }
}

/// Answer entry dial: 1-12 hour, quarter minutes
#[derive(Debug, Clone, Copy)]
pub struct AnswerDial {
    pub hour: u32,
    pub minute: u32,
}

impl Default for AnswerDial {
    fn default() -> Self {
        Self {
            hour: 12,
            minute: 0,
        }
    }
}

impl AnswerDial {
    pub fn dialed(&self) -> GameTime {
        GameTime {
            hour: self.hour,
            minute: self.minute,
        }
    }

    /// The dialed answer as a time value for the clock face
    pub fn time(&self) -> TimeValue {
        TimeValue::new(self.hour as f64 % 12.0, self.minute as f64, 0.0)
    }
}

/// Games panel state: the running game plus the answer dial
#[derive(Default)]
pub struct GamesState {
    pub active: Option<ActiveGame>,
    pub dial: AnswerDial,
}

impl GamesState {
    pub fn start(&mut self, kind: GameKind, rng: &mut impl Rng) {
        self.dial = AnswerDial::default();
        self.active = Some(match kind {
            GameKind::Race => ActiveGame::Race(RaceGame::new(rng)),
            GameKind::Detective => ActiveGame::Detective(DetectiveGame::new(rng)),
            GameKind::Memory => ActiveGame::Memory(MemoryGame::new(rng)),
        });
    }

    pub fn end(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_game_times_on_quarters() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let t = GameTime::random(&mut rng);
            assert!(t.hour >= 1 && t.hour <= 12);
            assert!(QUARTER_MINUTES.contains(&t.minute));
        }
    }

    #[test]
    fn test_game_time_matches_twelve_hour_reading() {
        let target = GameTime { hour: 12, minute: 0 };
        assert!(target.matches(&TimeValue::new(0.0, 0.0, 0.0)));
        assert!(target.matches(&TimeValue::new(12.0, 0.0, 0.0)));

        let target = GameTime { hour: 3, minute: 15 };
        assert!(target.matches(&TimeValue::new(15.0, 15.0, 0.0)));
        assert!(!target.matches(&TimeValue::new(15.0, 30.0, 0.0)));
        // Fractional minutes truncate before comparing
        assert!(target.matches(&TimeValue::new(3.0, 15.9, 0.0)));
    }

    #[test]
    fn test_race_check_stops_clock() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut race = RaceGame::new(&mut rng);
        let target = race.target;
        let result = race.check(&TimeValue::new(
            target.hour as f64,
            target.minute as f64,
            0.0,
        ));
        assert!(result.correct);
        assert!(race.result.is_some());
        // Elapsed is frozen after the check
        assert_eq!(race.elapsed_secs(), result.elapsed_secs);
    }

    #[test]
    fn test_detective_clues_cover_minute_direction() {
        for (minute, needle) in [
            (0, "straight up"),
            (15, "to the right"),
            (30, "straight down"),
            (45, "to the left"),
        ] {
            let clues = clues_for(GameTime { hour: 4, minute });
            assert!(clues.iter().any(|c| c.contains(needle)));
        }
    }

    #[test]
    fn test_detective_activity_clue() {
        let clues = clues_for(GameTime { hour: 12, minute: 0 });
        assert!(clues.iter().any(|c| c.contains("Lunch")));
        // Hours without an activity still get the two base clues
        let clues = clues_for(GameTime { hour: 4, minute: 0 });
        assert_eq!(clues.len(), 2);
    }

    #[test]
    fn test_memory_recall_flow() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut game = MemoryGame::new(&mut rng);
        assert_eq!(game.sequence.len(), MEMORY_SEQUENCE_LEN);
        assert_eq!(game.phase, MemoryPhase::Showing { index: 0 });

        // Jump straight to recall for the test
        game.phase = MemoryPhase::Recall { step: 0 };

        let first = game.sequence[0];
        let outcome = game.check(&TimeValue::new(
            first.hour as f64,
            first.minute as f64,
            0.0,
        ));
        assert_eq!(outcome, Some(MemoryOutcome::CorrectNext { step: 1 }));

        // A wrong second answer ends the round
        let second = game.sequence[1];
        let wrong_minute = (second.minute + 15) % 60;
        let outcome = game.check(&TimeValue::new(second.hour as f64, wrong_minute as f64, 0.0));
        assert_eq!(outcome, Some(MemoryOutcome::Wrong { expected: second }));
        assert_eq!(game.phase, MemoryPhase::Done { success: false });
        // No further checks once done
        assert_eq!(game.check(&TimeValue::default()), None);
    }

    #[test]
    fn test_memory_all_correct() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut game = MemoryGame::new(&mut rng);
        game.phase = MemoryPhase::Recall { step: 0 };
        for i in 0..MEMORY_SEQUENCE_LEN {
            let expected = game.sequence[i];
            let outcome = game.check(&TimeValue::new(
                expected.hour as f64,
                expected.minute as f64,
                0.0,
            ));
            if i + 1 < MEMORY_SEQUENCE_LEN {
                assert_eq!(outcome, Some(MemoryOutcome::CorrectNext { step: i + 1 }));
            } else {
                assert_eq!(outcome, Some(MemoryOutcome::AllCorrect));
            }
        }
        assert_eq!(game.phase, MemoryPhase::Done { success: true });
    }

    #[test]
    fn test_games_state_start_and_dial() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut games = GamesState::default();
        games.start(GameKind::Race, &mut rng);
        assert_eq!(games.active.as_ref().map(|g| g.kind()), Some(GameKind::Race));

        games.dial.hour = 3;
        games.dial.minute = 45;
        assert_eq!(games.dial.dialed(), GameTime { hour: 3, minute: 45 });
        assert_eq!(games.dial.time().hms(), (3, 45, 0));

        games.end();
        assert!(games.active.is_none());

        // Starting a new game resets the dial
        games.start(GameKind::Memory, &mut rng);
        assert_eq!(games.dial.dialed(), GameTime { hour: 12, minute: 0 });
    }
}
