//! Session statistics
//!
//! Aggregates the committed session log into:
//! - Total focus time and number of completed study sessions
//! - Average study session length
//! - Best run of study sessions on consecutive days
//!
//! Everything is recomputed from the log on each call; nothing is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Aggregated study statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    /// Sum of study session lengths in minutes
    pub total_focus_minutes: u32,
    /// Number of completed study sessions
    pub sessions_completed: u32,
    /// Longest run of study sessions on consecutive days
    pub best_streak: u32,
    /// Mean study session length in minutes (0 with no sessions)
    pub average_session_length: f64,
}

impl Statistics {
    /// Calculate statistics from the committed session log
    pub fn from_sessions(sessions: &[SessionRecord]) -> Self {
        let study: Vec<&SessionRecord> = sessions
            .iter()
            .filter(|s| s.is_study() && s.completed)
            .collect();

        let total_focus_minutes: u32 = study.iter().map(|s| s.duration_minutes).sum();
        let sessions_completed = study.len() as u32;

        let average_session_length = if sessions_completed > 0 {
            total_focus_minutes as f64 / sessions_completed as f64
        } else {
            0.0
        };

        Self {
            total_focus_minutes,
            sessions_completed,
            best_streak: best_streak(&study),
            average_session_length,
        }
    }

    /// Get total hours and minutes as a tuple
    pub fn total_time(&self) -> (u32, u32) {
        (self.total_focus_minutes / 60, self.total_focus_minutes % 60)
    }
}

fn best_streak(study: &[&SessionRecord]) -> u32 {
    let mut best = 0;
    let mut current = 0;
    let mut previous: Option<DateTime<Utc>> = None;

    for session in study {
        current = match previous {
            Some(prev) if is_consecutive_day(prev, session.started_at) => current + 1,
            _ => 1,
        };
        best = best.max(current);
        previous = Some(session.started_at);
    }

    best
}

/// Whether two timestamps count as one day apart.
///
/// The absolute gap is rounded up to whole days, so any gap in (0h, 24h]
/// counts, including two sessions on the same calendar day. Identical
/// timestamps do not.
pub fn is_consecutive_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    let diff_ms = (b - a).num_milliseconds().abs() as f64;
    (diff_ms / MILLIS_PER_DAY).ceil() == 1.0
}
