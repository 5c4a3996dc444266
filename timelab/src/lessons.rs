//! Learning mode - lesson content and progression
//!
//! Four guided lessons on clock reading. Each lesson walks a fixed list
//! of steps; the final step puts a practice time on the clock. Completing
//! a lesson earns up to three stars and records a practice session.

use crate::progress::Concept;
use crate::session::TimeValue;

/// Stars awarded per lesson are capped at three
pub const MAX_STARS: u32 = 3;

pub struct Lesson {
    pub id: &'static str,
    pub title: &'static str,
    pub concept: Concept,
    pub steps: &'static [&'static str],
    /// Practice times as (hour, minute)
    pub practice: &'static [(u32, u32)],
}

pub static LESSONS: [Lesson; 4] = [
    Lesson {
        id: "oclock",
        title: "O'Clock Times",
        concept: Concept::OClock,
        steps: &[
            "When the minute hand points to 12, we say 'o'clock'",
            "The hour hand points to the number for that hour",
            "Try setting the clock to 3 o'clock!",
        ],
        practice: &[(3, 0), (7, 0), (12, 0)],
    },
    Lesson {
        id: "half-past",
        title: "Half Past",
        concept: Concept::HalfPast,
        steps: &[
            "Half past means 30 minutes after the hour",
            "The minute hand points to 6",
            "Try setting the clock to half past 2!",
        ],
        practice: &[(2, 30), (5, 30), (9, 30)],
    },
    Lesson {
        id: "quarter",
        title: "Quarter Past/To",
        concept: Concept::QuarterPast,
        steps: &[
            "Quarter past means 15 minutes after",
            "Quarter to means 15 minutes before",
            "Try both quarter past and quarter to!",
        ],
        practice: &[(3, 15), (6, 45), (10, 15)],
    },
    Lesson {
        id: "five-minute",
        title: "5-Minute Times",
        concept: Concept::FiveMinutes,
        steps: &[
            "Each number represents 5 minutes",
            "Count by 5s around the clock",
            "Practice different 5-minute times!",
        ],
        practice: &[(4, 20), (8, 35), (11, 50)],
    },
];

/// What advancing a running lesson produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonOutcome {
    /// Moved to the given step index
    Step(usize),
    /// Walked past the last step; the lesson is complete
    Completed,
}

/// Lesson selection and step progression
#[derive(Default)]
pub struct LearnState {
    selected: Option<usize>,
    step: usize,
    running: bool,
}

impl LearnState {
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_lesson(&self) -> Option<&'static Lesson> {
        self.selected.map(|i| &LESSONS[i])
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Pick a lesson; resets any progress through a previous one
    pub fn select(&mut self, index: usize) {
        if index < LESSONS.len() {
            self.selected = Some(index);
            self.step = 0;
            self.running = false;
        }
    }

    /// Start the selected lesson at step 0. Returns false with nothing
    /// selected.
    pub fn start(&mut self) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.step = 0;
        self.running = true;
        true
    }

    pub fn current_step_text(&self) -> Option<&'static str> {
        let lesson = self.selected_lesson()?;
        if self.running {
            lesson.steps.get(self.step).copied()
        } else {
            None
        }
    }

    /// The practice time to put on the clock, present only on the final
    /// step of a running lesson.
    pub fn practice_time(&self) -> Option<TimeValue> {
        let lesson = self.selected_lesson()?;
        if self.running && self.step + 1 == lesson.steps.len() {
            lesson
                .practice
                .first()
                .map(|&(h, m)| TimeValue::new(h as f64, m as f64, 0.0))
        } else {
            None
        }
    }

    /// Advance a running lesson by one step
    pub fn advance(&mut self) -> Option<LessonOutcome> {
        let lesson = self.selected_lesson()?;
        if !self.running {
            return None;
        }
        self.step += 1;
        if self.step < lesson.steps.len() {
            Some(LessonOutcome::Step(self.step))
        } else {
            self.running = false;
            self.step = 0;
            Some(LessonOutcome::Completed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_tables_are_consistent() {
        for lesson in &LESSONS {
            assert!(!lesson.steps.is_empty());
            assert!(!lesson.practice.is_empty());
            for &(h, m) in lesson.practice {
                assert!(h >= 1 && h <= 12);
                assert!(m < 60);
            }
        }
    }

    #[test]
    fn test_start_requires_selection() {
        let mut learn = LearnState::default();
        assert!(!learn.start());
        learn.select(0);
        assert!(learn.start());
        assert!(learn.is_running());
    }

    #[test]
    fn test_progression_to_completion() {
        let mut learn = LearnState::default();
        learn.select(1);
        learn.start();
        assert_eq!(learn.current_step_text(), Some(LESSONS[1].steps[0]));
        assert_eq!(learn.advance(), Some(LessonOutcome::Step(1)));
        assert_eq!(learn.advance(), Some(LessonOutcome::Step(2)));
        // Final step exposes the first practice time
        let practice = learn.practice_time().unwrap();
        assert_eq!(practice.hms(), (2, 30, 0));
        assert_eq!(learn.advance(), Some(LessonOutcome::Completed));
        assert!(!learn.is_running());
    }

    #[test]
    fn test_practice_time_only_on_final_step() {
        let mut learn = LearnState::default();
        learn.select(0);
        learn.start();
        assert!(learn.practice_time().is_none());
        learn.advance();
        learn.advance();
        assert!(learn.practice_time().is_some());
    }

    #[test]
    fn test_reselect_resets_progress() {
        let mut learn = LearnState::default();
        learn.select(0);
        learn.start();
        learn.advance();
        learn.select(2);
        assert_eq!(learn.current_step(), 0);
        assert!(!learn.is_running());
    }
}
