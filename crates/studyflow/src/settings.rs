//! Timer settings
//!
//! Settings are checked once, when they enter the program. The engine
//! assumes every duration is positive.

use serde::{Deserialize, Serialize};
use studyflow_core::Config;
use thiserror::Error;

/// Settings validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be greater than zero")]
    NonPositive { field: &'static str },

    #[error("{field} must be at most {max} minutes")]
    TooLong { field: &'static str, max: u32 },
}

/// Phase lengths for a timer run. The engine never mutates these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Focus phase length in minutes
    pub focus_duration: u32,
    /// Short break length in minutes
    pub break_duration: u32,
    /// Long break length in minutes
    pub long_break_duration: u32,
    /// Completed focus phases between long breaks
    pub sessions_until_long_break: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            sessions_until_long_break: 4,
        }
    }
}

impl Settings {
    /// Longest accepted phase (one day)
    pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

    /// Build validated settings
    pub fn new(
        focus_duration: u32,
        break_duration: u32,
        long_break_duration: u32,
        sessions_until_long_break: u32,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            focus_duration,
            break_duration,
            long_break_duration,
            sessions_until_long_break,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject zero values and phases longer than a day
    pub fn validate(&self) -> Result<(), SettingsError> {
        let durations = [
            ("focus_duration", self.focus_duration),
            ("break_duration", self.break_duration),
            ("long_break_duration", self.long_break_duration),
        ];
        let counts = [("sessions_until_long_break", self.sessions_until_long_break)];

        if let Some(&(field, _)) = durations.iter().chain(&counts).find(|&&(_, value)| value == 0) {
            return Err(SettingsError::NonPositive { field });
        }
        if let Some(&(field, _)) = durations
            .iter()
            .find(|&&(_, value)| value > Self::MAX_DURATION_MINUTES)
        {
            return Err(SettingsError::TooLong {
                field,
                max: Self::MAX_DURATION_MINUTES,
            });
        }
        Ok(())
    }

    /// Break length after `completed_focus` focus phases have finished
    pub fn break_after(&self, completed_focus: u32) -> u32 {
        if completed_focus > 0 && completed_focus % self.sessions_until_long_break == 0 {
            self.long_break_duration
        } else {
            self.break_duration
        }
    }
}

impl TryFrom<&Config> for Settings {
    type Error = SettingsError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        Settings::new(
            config.focus_duration,
            config.break_duration,
            config.long_break_duration,
            config.sessions_until_long_break,
        )
    }
}

impl From<Settings> for Config {
    fn from(settings: Settings) -> Self {
        Config {
            focus_duration: settings.focus_duration,
            break_duration: settings.break_duration,
            long_break_duration: settings.long_break_duration,
            sessions_until_long_break: settings.sessions_until_long_break,
        }
    }
}
