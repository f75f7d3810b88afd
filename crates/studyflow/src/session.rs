//! Session records
//!
//! A record is opened when a phase starts and only lands in the session log
//! once the countdown for that phase runs out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which phase a session covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Study,
    Break,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Study => "study",
            SessionKind::Break => "break",
        }
    }
}

/// A study or break session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// When the phase was started
    pub started_at: DateTime<Utc>,
    /// Full length of the phase in minutes (0 while in progress)
    pub duration_minutes: u32,
    /// Phase this session covers
    pub kind: SessionKind,
    /// Whether the countdown ran all the way to zero
    pub completed: bool,
}

impl SessionRecord {
    /// Open an in-progress record
    pub fn open(kind: SessionKind, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            duration_minutes: 0,
            kind,
            completed: false,
        }
    }

    /// Close the record as completed with the phase's full length
    pub fn complete(self, duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            completed: true,
            ..self
        }
    }

    pub fn is_study(&self) -> bool {
        self.kind == SessionKind::Study
    }
}
