//! studyflow - Pomodoro study timer with session statistics
//!
//! The timer is a plain state machine. Nothing in here owns a clock: the
//! host calls [`TimerEngine::tick`] once per elapsed second and issues
//! start/pause/reset commands between ticks.
//!
//! - [`Settings`]: validated phase lengths
//! - [`TimerEngine`]: countdown, phase flips and the committed session log
//! - [`Statistics`]: aggregates recomputed from the log
//! - [`SessionStore`]: best-effort persistence between runs

pub mod session;
pub mod settings;
pub mod stats;
pub mod store;
pub mod timer;

pub use session::{SessionKind, SessionRecord};
pub use settings::{Settings, SettingsError};
pub use stats::Statistics;
pub use store::SessionStore;
pub use timer::{TickOutcome, TimerEngine, TimerState};
