//! Timer engine
//!
//! Two phases (study and break), each either idle or running. The host
//! drives the countdown by calling [`TimerEngine::tick`] once per elapsed
//! second while the timer runs; commands and ticks never interleave, so
//! every call leaves the engine in a consistent state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::session::{SessionKind, SessionRecord};
use crate::settings::Settings;
use crate::stats::Statistics;

/// Observable timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub minutes_remaining: u32,
    /// Always within 0..=59
    pub seconds_remaining: u32,
    pub is_running: bool,
    pub is_break: bool,
    /// Completed focus phases, never decreases
    pub focus_score: u32,
    /// Completed focus phases, never reset on a missed day (unlike
    /// [`Statistics::best_streak`])
    pub streak: u32,
}

impl TimerState {
    /// Fresh state at the start of a focus phase
    pub fn initial(settings: &Settings) -> Self {
        Self {
            minutes_remaining: settings.focus_duration,
            seconds_remaining: 0,
            is_running: false,
            is_break: false,
            focus_score: 0,
            streak: 0,
        }
    }

    pub fn phase(&self) -> SessionKind {
        if self.is_break {
            SessionKind::Break
        } else {
            SessionKind::Study
        }
    }

    /// Countdown as MM:SS
    pub fn countdown(&self) -> String {
        format!("{:02}:{:02}", self.minutes_remaining, self.seconds_remaining)
    }

    pub fn remaining_seconds(&self) -> u64 {
        u64::from(self.minutes_remaining) * 60 + u64::from(self.seconds_remaining)
    }

    fn is_exhausted(&self) -> bool {
        self.minutes_remaining == 0 && self.seconds_remaining == 0
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running; nothing changed
    Idle,
    /// Countdown moved by one second
    Running,
    /// The countdown ran out and the timer switched to the next phase
    PhaseComplete { finished: SessionKind },
}

/// Countdown state machine plus the committed session log
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: Settings,
    state: TimerState,
    current: Option<SessionRecord>,
    sessions: Vec<SessionRecord>,
}

impl TimerEngine {
    /// Create an idle engine at the start of a focus phase
    pub fn new(settings: Settings) -> Self {
        Self {
            state: TimerState::initial(&settings),
            settings,
            current: None,
            sessions: Vec::new(),
        }
    }

    /// Rebuild an engine from a saved snapshot. The restored timer is paused,
    /// has no in-progress session and starts the saved phase from its full
    /// length under `settings`.
    pub fn restore(settings: Settings, state: TimerState, sessions: Vec<SessionRecord>) -> Self {
        let mut engine = Self {
            settings,
            state: TimerState {
                is_running: false,
                ..state
            },
            current: None,
            sessions,
        };
        engine.state.minutes_remaining = engine.phase_duration();
        engine.state.seconds_remaining = 0;
        engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> SessionKind {
        self.state.phase()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    /// The committed session log, oldest first
    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    /// The session opened by `start` and not yet committed
    pub fn current_session(&self) -> Option<&SessionRecord> {
        self.current.as_ref()
    }

    /// Statistics over the committed log
    pub fn statistics(&self) -> Statistics {
        Statistics::from_sessions(&self.sessions)
    }

    /// Full length of the current phase in minutes
    pub fn phase_duration(&self) -> u32 {
        if self.state.is_break {
            self.settings.break_after(self.state.focus_score)
        } else {
            self.settings.focus_duration
        }
    }

    /// Progress through the current phase as a percentage (0-100)
    pub fn progress_percent(&self) -> u32 {
        let total = u64::from(self.phase_duration()) * 60;
        if total == 0 {
            return 100;
        }
        let elapsed = total.saturating_sub(self.state.remaining_seconds());
        ((elapsed * 100) / total).min(100) as u32
    }

    /// Start (or resume) the countdown
    pub fn start(&mut self) {
        self.start_at(Utc::now());
    }

    /// Start (or resume) the countdown, stamping a new session with `now`
    pub fn start_at(&mut self, now: DateTime<Utc>) {
        if self.state.is_running {
            return;
        }
        self.state.is_running = true;
        if self.current.is_none() {
            self.current = Some(SessionRecord::open(self.phase(), now));
            debug!(phase = self.phase().as_str(), "opened session");
        }
        debug!(countdown = %self.state.countdown(), "timer started");
    }

    /// Stop the countdown, keeping the in-progress session open
    pub fn pause(&mut self) {
        self.state.is_running = false;
        debug!(countdown = %self.state.countdown(), "timer paused");
    }

    /// Stop the countdown, rewind the current phase and drop its session
    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.state.minutes_remaining = self.phase_duration();
        self.state.seconds_remaining = 0;
        if self.current.take().is_some() {
            debug!(phase = self.phase().as_str(), "discarded in-progress session");
        }
    }

    /// Advance the countdown by one second.
    ///
    /// The tick that brings the countdown to 00:00 also finishes the phase:
    /// the session is committed, counters updated and the timer stops at
    /// the full length of the next phase.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running {
            return TickOutcome::Idle;
        }

        if self.state.seconds_remaining > 0 {
            self.state.seconds_remaining -= 1;
        } else if self.state.minutes_remaining > 0 {
            self.state.minutes_remaining -= 1;
            self.state.seconds_remaining = 59;
        }

        if self.state.is_exhausted() {
            return self.complete_phase();
        }
        TickOutcome::Running
    }

    fn complete_phase(&mut self) -> TickOutcome {
        let finished = self.phase();
        let duration = self.phase_duration();

        if let Some(session) = self.current.take() {
            info!(
                kind = finished.as_str(),
                minutes = duration,
                "session completed"
            );
            self.sessions.push(session.complete(duration));
        }

        if finished == SessionKind::Study {
            self.state.focus_score += 1;
            self.state.streak += 1;
        }

        self.state.is_break = !self.state.is_break;
        self.state.is_running = false;
        self.state.minutes_remaining = self.phase_duration();
        self.state.seconds_remaining = 0;

        debug!(
            next = self.phase().as_str(),
            minutes = self.state.minutes_remaining,
            "phase switched"
        );
        TickOutcome::PhaseComplete { finished }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings(focus: u32, brk: u32) -> Settings {
        Settings::new(focus, brk, 15, 4).unwrap()
    }

    fn run_ticks(engine: &mut TimerEngine, n: u32) -> Vec<TickOutcome> {
        (0..n).map(|_| engine.tick()).collect()
    }

    #[test]
    fn test_initial_state() {
        let engine = TimerEngine::new(Settings::default());
        let state = engine.state();
        assert_eq!(state.minutes_remaining, 25);
        assert_eq!(state.seconds_remaining, 0);
        assert!(!state.is_running);
        assert!(!state.is_break);
        assert_eq!(state.focus_score, 0);
        assert_eq!(state.streak, 0);
        assert!(engine.current_session().is_none());
        assert!(engine.sessions().is_empty());
    }

    #[test]
    fn test_tick_while_idle_does_nothing() {
        let mut engine = TimerEngine::new(Settings::default());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.state().countdown(), "25:00");
    }

    #[test]
    fn test_first_tick_borrows_a_minute() {
        let mut engine = TimerEngine::new(Settings::default());
        engine.start();
        assert_eq!(engine.tick(), TickOutcome::Running);
        assert_eq!(engine.state().minutes_remaining, 24);
        assert_eq!(engine.state().seconds_remaining, 59);
    }

    #[test]
    fn test_start_opens_one_session() {
        let mut engine = TimerEngine::new(Settings::default());
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        engine.start_at(t0);
        engine.start_at(t0 + chrono::Duration::minutes(1));

        let current = engine.current_session().unwrap();
        assert_eq!(current.started_at, t0);
        assert_eq!(current.kind, SessionKind::Study);
        assert!(!current.completed);
    }

    #[test]
    fn test_full_focus_phase_switches_to_break() {
        let mut engine = TimerEngine::new(settings(25, 5));
        engine.start();

        let outcomes = run_ticks(&mut engine, 25 * 60);
        let completions: Vec<_> = outcomes
            .iter()
            .filter(|o| matches!(o, TickOutcome::PhaseComplete { .. }))
            .collect();
        assert_eq!(completions.len(), 1);
        assert_eq!(
            outcomes.last(),
            Some(&TickOutcome::PhaseComplete { finished: SessionKind::Study })
        );

        let state = engine.state();
        assert!(state.is_break);
        assert!(!state.is_running);
        assert_eq!(state.minutes_remaining, 5);
        assert_eq!(state.seconds_remaining, 0);
        assert_eq!(state.focus_score, 1);
        assert_eq!(state.streak, 1);

        assert_eq!(engine.sessions().len(), 1);
        let session = &engine.sessions()[0];
        assert_eq!(session.kind, SessionKind::Study);
        assert_eq!(session.duration_minutes, 25);
        assert!(session.completed);
        assert!(engine.current_session().is_none());
    }

    #[test]
    fn test_completion_stops_the_timer() {
        let mut engine = TimerEngine::new(settings(1, 1));
        engine.start();
        run_ticks(&mut engine, 60);
        assert!(!engine.is_running());
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.state().countdown(), "01:00");
    }

    #[test]
    fn test_break_does_not_score() {
        let mut engine = TimerEngine::new(settings(1, 2));
        engine.start();
        run_ticks(&mut engine, 60);
        engine.start();
        let outcomes = run_ticks(&mut engine, 120);
        assert_eq!(
            outcomes.last(),
            Some(&TickOutcome::PhaseComplete { finished: SessionKind::Break })
        );

        let state = engine.state();
        assert!(!state.is_break);
        assert_eq!(state.minutes_remaining, 1);
        assert_eq!(state.focus_score, 1);
        assert_eq!(state.streak, 1);

        let kinds: Vec<_> = engine.sessions().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SessionKind::Study, SessionKind::Break]);
        assert_eq!(engine.sessions()[1].duration_minutes, 2);
    }

    #[test]
    fn test_reset_discards_in_progress_session() {
        let mut engine = TimerEngine::new(Settings::default());
        engine.start();
        run_ticks(&mut engine, 300);
        engine.reset();

        assert!(engine.current_session().is_none());
        assert!(engine.sessions().is_empty());
        assert!(!engine.is_running());
        assert_eq!(engine.state().countdown(), "25:00");
    }

    #[test]
    fn test_reset_during_break_restores_break_length() {
        let mut engine = TimerEngine::new(settings(1, 3));
        engine.start();
        run_ticks(&mut engine, 60);
        engine.start();
        run_ticks(&mut engine, 10);
        engine.reset();
        assert!(engine.state().is_break);
        assert_eq!(engine.state().countdown(), "03:00");
    }

    #[test]
    fn test_pause_keeps_session_and_countdown() {
        let mut engine = TimerEngine::new(settings(1, 1));
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        engine.start_at(t0);
        run_ticks(&mut engine, 30);
        engine.pause();

        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.state().countdown(), "00:30");
        assert_eq!(engine.current_session().unwrap().started_at, t0);

        engine.start_at(t0 + chrono::Duration::minutes(10));
        run_ticks(&mut engine, 30);

        assert_eq!(engine.sessions().len(), 1);
        assert_eq!(engine.sessions()[0].started_at, t0);
    }

    #[test]
    fn test_long_break_every_n_sessions() {
        let mut engine = TimerEngine::new(Settings::new(1, 2, 7, 2).unwrap());

        engine.start();
        run_ticks(&mut engine, 60);
        assert_eq!(engine.state().minutes_remaining, 2);

        engine.start();
        run_ticks(&mut engine, 120);
        engine.start();
        run_ticks(&mut engine, 60);
        assert_eq!(engine.state().focus_score, 2);
        assert_eq!(engine.state().minutes_remaining, 7);

        engine.start();
        run_ticks(&mut engine, 7 * 60);
        let last = engine.sessions().last().unwrap();
        assert_eq!(last.kind, SessionKind::Break);
        assert_eq!(last.duration_minutes, 7);
    }

    #[test]
    fn test_countdown_bounds_hold() {
        let mut engine = TimerEngine::new(settings(2, 1));
        for i in 0..1000 {
            if i % 7 == 0 {
                engine.start();
            }
            if i % 97 == 0 {
                engine.pause();
            }
            if i % 401 == 0 {
                engine.reset();
            }
            engine.tick();
            assert!(engine.state().seconds_remaining <= 59);
        }
    }

    #[test]
    fn test_progress_percent() {
        let mut engine = TimerEngine::new(settings(2, 1));
        assert_eq!(engine.progress_percent(), 0);
        engine.start();
        run_ticks(&mut engine, 60);
        assert_eq!(engine.progress_percent(), 50);
    }

    #[test]
    fn test_restore_is_paused() {
        let state = TimerState {
            minutes_remaining: 3,
            seconds_remaining: 12,
            is_running: true,
            is_break: true,
            focus_score: 4,
            streak: 4,
        };
        let engine = TimerEngine::restore(Settings::default(), state, Vec::new());
        assert!(!engine.is_running());
        assert!(engine.current_session().is_none());
        assert_eq!(engine.phase(), SessionKind::Break);
        assert_eq!(engine.phase_duration(), 15);
        assert_eq!(engine.state().countdown(), "15:00");
        assert_eq!(engine.state().focus_score, 4);
    }

    #[test]
    fn test_restore_under_new_settings_runs_new_length() {
        let saved = TimerState::initial(&Settings::default());
        let mut engine =
            TimerEngine::restore(Settings::new(50, 5, 15, 4).unwrap(), saved, Vec::new());
        assert_eq!(engine.state().countdown(), "50:00");

        engine.start();
        let mut ticks = 0;
        while !matches!(engine.tick(), TickOutcome::PhaseComplete { .. }) {
            ticks += 1;
        }
        ticks += 1;

        assert_eq!(ticks, 50 * 60);
        assert_eq!(engine.sessions()[0].duration_minutes, 50);
    }

    #[test]
    fn test_progress_with_longest_phase() {
        let longest = Settings::MAX_DURATION_MINUTES;
        let mut engine = TimerEngine::new(Settings::new(longest, 5, 15, 4).unwrap());
        assert_eq!(engine.progress_percent(), 0);
        assert_eq!(engine.state().remaining_seconds(), u64::from(longest) * 60);

        engine.start();
        engine.tick();
        assert_eq!(engine.progress_percent(), 0);
    }
}
