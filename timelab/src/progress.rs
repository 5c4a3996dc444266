//! Learner progress store - mastery, points, streaks, achievements
//!
//! TOML-persisted record of practice across lessons, quizzes, and games.
//! Dates are stored as ISO strings and parsed for streak arithmetic.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lessons::{LESSONS, MAX_STARS};

/// Baseline response time for full speed credit in the mastery formula
const SPEED_BASELINE_MS: f64 = 30_000.0;
const HISTORY_CAP: usize = 1000;
const ACHIEVEMENT_BONUS: u64 = 50;

/// A clock-reading concept tracked for mastery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    OClock,
    HalfPast,
    QuarterPast,
    QuarterTo,
    FiveMinutes,
    AnyTime,
}

impl Concept {
    pub const ALL: [Concept; 6] = [
        Concept::OClock,
        Concept::HalfPast,
        Concept::QuarterPast,
        Concept::QuarterTo,
        Concept::FiveMinutes,
        Concept::AnyTime,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Concept::OClock => "oclock",
            Concept::HalfPast => "half-past",
            Concept::QuarterPast => "quarter-past",
            Concept::QuarterTo => "quarter-to",
            Concept::FiveMinutes => "five-minutes",
            Concept::AnyTime => "any-time",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Concept::OClock => "o'clock times",
            Concept::HalfPast => "half past",
            Concept::QuarterPast => "quarter past",
            Concept::QuarterTo => "quarter to",
            Concept::FiveMinutes => "5-minute times",
            Concept::AnyTime => "any time",
        }
    }

    /// Harder concepts earn more points per correct answer
    fn multiplier(self) -> f64 {
        match self {
            Concept::OClock => 1.0,
            Concept::HalfPast => 1.2,
            Concept::QuarterPast | Concept::QuarterTo => 1.5,
            Concept::FiveMinutes => 2.0,
            Concept::AnyTime => 2.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConceptStats {
    pub attempts: u32,
    pub correct: u32,
    /// 0-100, weighted accuracy (70%) and speed (30%)
    pub mastery: u32,
    pub average_ms: f64,
}

impl ConceptStats {
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeEntry {
    pub concept: String,
    pub correct: bool,
    pub response_ms: u64,
    /// ISO date, e.g. "2026-08-06"
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecords {
    pub race_best_secs: Option<f32>,
    pub race_plays: u32,
    pub detective_plays: u32,
    pub detective_solved: u32,
    pub memory_plays: u32,
    pub memory_perfect: u32,
}

/// An achievement definition: a predicate over the store
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    check: fn(&ProgressStore) -> bool,
}

pub static ACHIEVEMENTS: [AchievementDef; 8] = [
    AchievementDef {
        id: "first_timer",
        name: "First Timer",
        description: "Complete your first practice session",
        check: |store| !store.history.is_empty(),
    },
    AchievementDef {
        id: "oclock_master",
        name: "O'Clock Master",
        description: "Master o'clock times (90% mastery)",
        check: |store| store.concept_stats(Concept::OClock).mastery >= 90,
    },
    AchievementDef {
        id: "week_warrior",
        name: "Week Warrior",
        description: "Practice 7 days in a row",
        check: |store| store.current_streak >= 7,
    },
    AchievementDef {
        id: "century_club",
        name: "Century Club",
        description: "Score 100 points",
        check: |store| store.total_points >= 100,
    },
    AchievementDef {
        id: "speed_demon",
        name: "Speed Demon",
        description: "Complete 10 problems in under 5 seconds each",
        check: |store| {
            store.history.len() >= 10
                && store
                    .history
                    .iter()
                    .rev()
                    .take(10)
                    .all(|entry| entry.correct && entry.response_ms < 5000)
        },
    },
    AchievementDef {
        id: "perfect_score",
        name: "Perfect Score",
        description: "Get 20 correct answers in a row",
        check: |store| {
            store.history.len() >= 20
                && store.history.iter().rev().take(20).all(|entry| entry.correct)
        },
    },
    AchievementDef {
        id: "time_traveler",
        name: "Time Traveler",
        description: "Practice with 5 different time zones",
        check: |store| store.timezones_viewed.len() >= 5,
    },
    AchievementDef {
        id: "dedicated_learner",
        name: "Dedicated Learner",
        description: "Practice for 30 days total",
        check: |store| {
            let unique: std::collections::BTreeSet<&str> =
                store.history.iter().map(|entry| entry.date.as_str()).collect();
            unique.len() >= 30
        },
    },
];

/// Look up an achievement definition by its stored id
pub fn achievement_by_id(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|def| def.id == id)
}

/// The persisted learner store
///
/// Plain values come before the table-valued fields so the TOML layout
/// stays flat and readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressStore {
    pub total_points: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_practice_date: Option<String>,
    pub quiz_best_score: u32,
    pub quiz_best_streak: u32,
    /// Unlocked achievement ids, in unlock order
    pub achievements: Vec<String>,
    /// Distinct timezone names the learner has viewed
    pub timezones_viewed: Vec<String>,
    /// Stars per lesson id, 0-3
    pub lesson_stars: BTreeMap<String, u32>,
    pub concepts: BTreeMap<String, ConceptStats>,
    pub games: GameRecords,
    pub history: Vec<PracticeEntry>,
}

impl ProgressStore {
    /// Load from disk, falling back to a fresh store
    pub fn load() -> Self {
        match shared::load_progress::<ProgressStore>() {
            Ok(Some(store)) => store,
            Ok(None) => ProgressStore::default(),
            Err(e) => {
                eprintln!("Failed to load progress: {}", e);
                ProgressStore::default()
            }
        }
    }

    pub fn save(&self) {
        if let Err(e) = shared::save_progress(self) {
            eprintln!("Failed to save progress: {}", e);
        }
    }

    pub fn concept_stats(&self, concept: Concept) -> ConceptStats {
        self.concepts.get(concept.key()).cloned().unwrap_or_default()
    }

    /// Record one practice answer. Updates mastery, streak, points and
    /// history, then returns any achievements this unlocked.
    pub fn record_practice(
        &mut self,
        concept: Concept,
        correct: bool,
        response_ms: u64,
        today: NaiveDate,
    ) -> Vec<&'static AchievementDef> {
        let stats = self.concepts.entry(concept.key().to_string()).or_default();
        stats.attempts += 1;
        if correct {
            stats.correct += 1;
        }
        let total_ms = stats.average_ms * (stats.attempts - 1) as f64 + response_ms as f64;
        stats.average_ms = total_ms / stats.attempts as f64;
        let accuracy = stats.correct as f64 / stats.attempts as f64;
        let speed = (1.0 - stats.average_ms / SPEED_BASELINE_MS).max(0.0);
        stats.mastery = ((accuracy * 0.7 + speed * 0.3) * 100.0).round() as u32;

        self.history.push(PracticeEntry {
            concept: concept.key().to_string(),
            correct,
            response_ms,
            date: today.to_string(),
        });
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }

        self.update_streak(today);

        if correct {
            self.total_points += self.points_for(concept, response_ms);
        }

        self.check_achievements()
    }

    fn update_streak(&mut self, today: NaiveDate) {
        let last = self
            .last_practice_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());
        match last {
            Some(last) if last == today => return,
            Some(last) if today - last == chrono::Duration::days(1) => {
                self.current_streak += 1;
            }
            _ => self.current_streak = 1,
        }
        self.last_practice_date = Some(today.to_string());
        self.longest_streak = self.longest_streak.max(self.current_streak);
    }

    fn points_for(&self, concept: Concept, response_ms: u64) -> u64 {
        let base = 10.0 * concept.multiplier();
        let speed_bonus = if response_ms < 5000 {
            5.0
        } else if response_ms < 10_000 {
            3.0
        } else {
            0.0
        };
        let streak_bonus = self.current_streak.min(10) as f64;
        (base + speed_bonus + streak_bonus).round() as u64
    }

    /// Unlock any achievements whose predicate now holds. Each unlock
    /// happens exactly once and grants a point bonus.
    pub fn check_achievements(&mut self) -> Vec<&'static AchievementDef> {
        let newly: Vec<&'static AchievementDef> = ACHIEVEMENTS
            .iter()
            .filter(|def| !self.achievements.iter().any(|id| id == def.id) && (def.check)(self))
            .collect();
        for def in &newly {
            self.achievements.push(def.id.to_string());
            self.total_points += ACHIEVEMENT_BONUS;
        }
        newly
    }

    /// Bump a lesson's star level, capped at three
    pub fn record_lesson_completion(&mut self, lesson_id: &str) -> u32 {
        let stars = self.lesson_stars.entry(lesson_id.to_string()).or_insert(0);
        *stars = (*stars + 1).min(MAX_STARS);
        *stars
    }

    pub fn lesson_stars(&self, lesson_id: &str) -> u32 {
        self.lesson_stars.get(lesson_id).copied().unwrap_or(0)
    }

    /// Completed lessons (full stars) out of the lesson catalogue
    pub fn lessons_completed(&self) -> (usize, usize) {
        let completed = LESSONS
            .iter()
            .filter(|lesson| self.lesson_stars(lesson.id) >= MAX_STARS)
            .count();
        (completed, LESSONS.len())
    }

    pub fn record_race(&mut self, correct: bool, elapsed_secs: f32) {
        self.games.race_plays += 1;
        if correct {
            let best = self.games.race_best_secs.get_or_insert(elapsed_secs);
            *best = best.min(elapsed_secs);
        }
    }

    pub fn record_detective(&mut self, solved: bool) {
        self.games.detective_plays += 1;
        if solved {
            self.games.detective_solved += 1;
        }
    }

    pub fn record_memory(&mut self, perfect: bool) {
        self.games.memory_plays += 1;
        if perfect {
            self.games.memory_perfect += 1;
        }
    }

    pub fn record_quiz_bests(&mut self, score: u32, streak: u32) {
        self.quiz_best_score = self.quiz_best_score.max(score);
        self.quiz_best_streak = self.quiz_best_streak.max(streak);
    }

    /// Note a timezone the learner has looked at (distinct names only)
    pub fn mark_timezone_viewed(&mut self, name: &str) {
        if !self.timezones_viewed.iter().any(|n| n == name) {
            self.timezones_viewed.push(name.to_string());
        }
    }

    /// The attempted concept with the lowest mastery
    pub fn weakest_concept(&self) -> Option<Concept> {
        Concept::ALL
            .iter()
            .copied()
            .filter(|c| self.concept_stats(*c).attempts > 0)
            .min_by_key(|c| self.concept_stats(*c).mastery)
    }

    /// A single practice suggestion for the learn panel
    pub fn recommendation(&self) -> Option<String> {
        if let Some(concept) = self.weakest_concept() {
            let stats = self.concept_stats(concept);
            if stats.attempts > 10 && stats.mastery < 70 {
                return Some(format!("Focus on practicing {}", concept.label()));
            }
        }
        if self.current_streak == 0 {
            Some("Start a new practice streak today!".to_string())
        } else if self.current_streak < 7 {
            Some(format!(
                "Keep going! {} more days to unlock Week Warrior",
                7 - self.current_streak
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    #[test]
    fn test_mastery_formula() {
        let mut store = ProgressStore::default();
        // One correct answer in 3s: accuracy 1.0, speed 0.9
        store.record_practice(Concept::OClock, true, 3000, day(1));
        let stats = store.concept_stats(Concept::OClock);
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.mastery, 97);

        // A slow miss halves accuracy and drags the average
        store.record_practice(Concept::OClock, false, 33_000, day(1));
        let stats = store.concept_stats(Concept::OClock);
        assert_eq!(stats.attempts, 2);
        assert!((stats.average_ms - 18_000.0).abs() < 1e-6);
        // accuracy 0.5, speed 0.4 -> 0.35 + 0.12 = 47
        assert_eq!(stats.mastery, 47);
    }

    #[test]
    fn test_streak_arithmetic() {
        let mut store = ProgressStore::default();
        store.record_practice(Concept::OClock, true, 1000, day(1));
        assert_eq!(store.current_streak, 1);
        // Same day: no change
        store.record_practice(Concept::OClock, true, 1000, day(1));
        assert_eq!(store.current_streak, 1);
        // Next day: continues
        store.record_practice(Concept::OClock, true, 1000, day(2));
        assert_eq!(store.current_streak, 2);
        // A gap resets
        store.record_practice(Concept::OClock, true, 1000, day(5));
        assert_eq!(store.current_streak, 1);
        assert_eq!(store.longest_streak, 2);
    }

    #[test]
    fn test_points_scale_with_difficulty_and_speed() {
        let mut store = ProgressStore::default();
        store.record_practice(Concept::OClock, true, 3000, day(1));
        // base 10 + fast 5 + streak 1 (+50 First Timer bonus)
        assert_eq!(store.total_points, 16 + 50);

        let mut store = ProgressStore::default();
        store.record_practice(Concept::AnyTime, true, 20_000, day(1));
        // base 25 + no speed bonus + streak 1 (+50 First Timer bonus)
        assert_eq!(store.total_points, 26 + 50);

        // Incorrect answers earn nothing
        let mut store = ProgressStore::default();
        store.record_practice(Concept::OClock, false, 1000, day(1));
        assert_eq!(store.total_points, 50); // First Timer only
    }

    #[test]
    fn test_achievements_unlock_once() {
        let mut store = ProgressStore::default();
        let unlocked = store.record_practice(Concept::OClock, true, 1000, day(1));
        assert!(unlocked.iter().any(|a| a.id == "first_timer"));
        let unlocked = store.record_practice(Concept::OClock, true, 1000, day(1));
        assert!(!unlocked.iter().any(|a| a.id == "first_timer"));
        assert_eq!(
            store.achievements.iter().filter(|id| *id == "first_timer").count(),
            1
        );
    }

    #[test]
    fn test_speed_demon_needs_ten_fast_correct() {
        let mut store = ProgressStore::default();
        for _ in 0..9 {
            store.record_practice(Concept::OClock, true, 2000, day(1));
        }
        assert!(!store.achievements.iter().any(|id| id == "speed_demon"));
        store.record_practice(Concept::OClock, true, 2000, day(1));
        assert!(store.achievements.iter().any(|id| id == "speed_demon"));
    }

    #[test]
    fn test_time_traveler() {
        let mut store = ProgressStore::default();
        for name in ["UTC", "Europe/London", "Asia/Tokyo", "America/New_York"] {
            store.mark_timezone_viewed(name);
        }
        // Duplicates don't count
        store.mark_timezone_viewed("UTC");
        assert!(store.check_achievements().is_empty());
        store.mark_timezone_viewed("Australia/Sydney");
        let newly = store.check_achievements();
        assert!(newly.iter().any(|a| a.id == "time_traveler"));
    }

    #[test]
    fn test_history_cap() {
        let mut store = ProgressStore::default();
        for _ in 0..(HISTORY_CAP + 25) {
            store.record_practice(Concept::OClock, true, 1000, day(1));
        }
        assert_eq!(store.history.len(), HISTORY_CAP);
    }

    #[test]
    fn test_lesson_stars_cap() {
        let mut store = ProgressStore::default();
        for expected in [1, 2, 3, 3] {
            assert_eq!(store.record_lesson_completion("oclock"), expected);
        }
        assert_eq!(store.lesson_stars("oclock"), MAX_STARS);
        assert_eq!(store.lesson_stars("half-past"), 0);
    }

    #[test]
    fn test_lessons_completed_counts_full_stars() {
        let mut store = ProgressStore::default();
        assert_eq!(store.lessons_completed(), (0, LESSONS.len()));
        for _ in 0..MAX_STARS {
            store.record_lesson_completion("oclock");
        }
        assert_eq!(store.lessons_completed(), (1, LESSONS.len()));
    }

    #[test]
    fn test_race_best_only_improves() {
        let mut store = ProgressStore::default();
        store.record_race(true, 8.5);
        store.record_race(true, 12.0);
        store.record_race(false, 1.0);
        assert_eq!(store.games.race_best_secs, Some(8.5));
        assert_eq!(store.games.race_plays, 3);
    }

    #[test]
    fn test_weakest_concept_and_recommendation() {
        let mut store = ProgressStore::default();
        assert_eq!(store.weakest_concept(), None);
        for _ in 0..12 {
            store.record_practice(Concept::HalfPast, false, 25_000, day(1));
        }
        store.record_practice(Concept::OClock, true, 2000, day(1));
        assert_eq!(store.weakest_concept(), Some(Concept::HalfPast));
        let rec = store.recommendation().unwrap();
        assert!(rec.contains("half past"));
    }
}
