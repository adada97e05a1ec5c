// src/models/profile.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Persisted practice statistics for the (single) user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,

    /// Consecutive days with at least one answered question.
    #[serde(default)]
    pub streak: u32,

    #[serde(default)]
    pub questions_answered: u64,
}

impl UserProfile {
    /// Records an answer submitted on `today`.
    ///
    /// Same day keeps the streak, the day after extends it, anything else
    /// (a longer gap or the very first answer) starts a new streak of 1.
    pub fn record_answer(&mut self, today: NaiveDate) {
        self.streak = match self.last_active_date {
            Some(last) if last == today => self.streak,
            Some(last) if last.succ_opt() == Some(today) => self.streak + 1,
            _ => 1,
        };
        self.last_active_date = Some(today);
        self.questions_answered += 1;
    }

    /// Applied on hydration: a streak survives only if the user was active today or yesterday.
    pub fn decay_streak(&mut self, today: NaiveDate) {
        let alive = matches!(
            self.last_active_date,
            Some(last) if last == today || last.succ_opt() == Some(today)
        );
        if !alive {
            self.streak = 0;
        }
    }
}

/// Profile plus figures derived from the attempt history.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub attempts: usize,
    pub correct_answers: usize,
    /// Share of answered attempts that were correct, 0.0 when nothing is answered.
    pub accuracy: f64,
}
