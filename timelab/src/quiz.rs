//! Quiz mode - multiple-choice clock-reading questions
//!
//! Question banks per difficulty; each question sets the clock to its
//! time and offers four readings. Scoring tracks streaks and bests, and
//! every answer is recorded against the matching learning concept.

use std::time::Instant;

use rand::Rng;

use crate::progress::Concept;
use crate::session::TimeValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// The learning concept a difficulty's answers are recorded under
    pub fn concept(self) -> Concept {
        match self {
            Difficulty::Easy => Concept::OClock,
            Difficulty::Medium => Concept::HalfPast,
            Difficulty::Hard => Concept::AnyTime,
        }
    }

    fn bank(self) -> &'static [QuizQuestion] {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Medium => &MEDIUM,
            Difficulty::Hard => &HARD,
        }
    }
}

pub struct QuizQuestion {
    pub h: u32,
    pub m: u32,
    pub options: [&'static str; 4],
    pub correct: usize,
}

impl QuizQuestion {
    pub fn time(&self) -> TimeValue {
        TimeValue::new(self.h as f64, self.m as f64, 0.0)
    }
}

static EASY: [QuizQuestion; 4] = [
    QuizQuestion { h: 3, m: 0, options: ["3:00", "4:00", "2:00", "12:00"], correct: 0 },
    QuizQuestion { h: 6, m: 0, options: ["5:00", "6:00", "7:00", "12:00"], correct: 1 },
    QuizQuestion { h: 9, m: 0, options: ["8:00", "10:00", "9:00", "3:00"], correct: 2 },
    QuizQuestion { h: 12, m: 0, options: ["12:00", "1:00", "11:00", "6:00"], correct: 0 },
];

static MEDIUM: [QuizQuestion; 4] = [
    QuizQuestion { h: 2, m: 30, options: ["2:30", "2:15", "3:00", "2:45"], correct: 0 },
    QuizQuestion { h: 7, m: 15, options: ["7:30", "7:15", "7:45", "8:15"], correct: 1 },
    QuizQuestion { h: 4, m: 45, options: ["4:15", "5:15", "4:45", "4:30"], correct: 2 },
    QuizQuestion { h: 10, m: 30, options: ["10:15", "11:00", "10:45", "10:30"], correct: 3 },
];

static HARD: [QuizQuestion; 4] = [
    QuizQuestion { h: 1, m: 25, options: ["1:25", "1:20", "1:30", "1:35"], correct: 0 },
    QuizQuestion { h: 5, m: 40, options: ["5:35", "5:40", "5:45", "6:40"], correct: 1 },
    QuizQuestion { h: 8, m: 55, options: ["8:50", "9:55", "8:55", "8:45"], correct: 2 },
    QuizQuestion { h: 11, m: 10, options: ["11:05", "11:15", "12:10", "11:10"], correct: 3 },
];

/// Result of answering the current question
pub struct QuizVerdict {
    pub correct: bool,
    pub correct_text: &'static str,
    pub response_ms: u64,
    pub concept: Concept,
}

/// Running quiz state
pub struct QuizState {
    pub difficulty: Difficulty,
    pub active: bool,
    pub score: u32,
    pub streak: u32,
    pub best_streak: u32,
    current: Option<&'static QuizQuestion>,
    question_started: Option<Instant>,
    /// Index the player picked for the current question, for feedback
    pub answered: Option<usize>,
}

impl Default for QuizState {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            active: false,
            score: 0,
            streak: 0,
            best_streak: 0,
            current: None,
            question_started: None,
            answered: None,
        }
    }
}

impl QuizState {
    pub fn current_question(&self) -> Option<&'static QuizQuestion> {
        self.current
    }

    /// Start a fresh quiz round and deal the first question.
    /// Returns the time to put on the clock.
    pub fn start(&mut self, rng: &mut impl Rng) -> TimeValue {
        self.active = true;
        self.score = 0;
        self.streak = 0;
        self.next_question(rng)
    }

    /// Deal the next question from the active difficulty bank.
    /// Returns the time to put on the clock.
    pub fn next_question(&mut self, rng: &mut impl Rng) -> TimeValue {
        let bank = self.difficulty.bank();
        let question = &bank[rng.gen_range(0..bank.len())];
        self.current = Some(question);
        self.question_started = Some(Instant::now());
        self.answered = None;
        question.time()
    }

    /// Answer the current question. Returns None if there is no open
    /// question or it was already answered.
    pub fn answer(&mut self, index: usize) -> Option<QuizVerdict> {
        if self.answered.is_some() {
            return None;
        }
        let question = self.current?;
        let response_ms = self
            .question_started
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        self.answered = Some(index);

        let correct = index == question.correct;
        if correct {
            self.score += 10;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
        } else {
            self.streak = 0;
        }

        Some(QuizVerdict {
            correct,
            correct_text: question.options[question.correct],
            response_ms,
            concept: self.difficulty.concept(),
        })
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.current = None;
        self.answered = None;
        self.question_started = None;
    }
}
