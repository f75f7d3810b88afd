//! Session storage
//!
//! Persists the committed session log and a timer snapshot between runs.
//! - Session log: <data>/sessions.jsonl (one record per line, append only)
//! - Timer snapshot: <data>/timer_state.json
//!
//! Persistence is best effort: corrupt content is skipped with a warning
//! instead of failing the run.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::session::SessionRecord;
use crate::timer::TimerState;

/// Study session store
pub struct SessionStore {
    data_dir: PathBuf,
}

impl SessionStore {
    /// Create a new session store with the given data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create studyflow data directory: {}", data_dir.display())
        })?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    fn sessions_path(&self) -> PathBuf {
        self.data_dir.join("sessions.jsonl")
    }

    fn state_path(&self) -> PathBuf {
        self.data_dir.join("timer_state.json")
    }

    /// Append a committed session to the log
    pub fn append(&self, session: &SessionRecord) -> Result<()> {
        let path = self.sessions_path();
        let line = serde_json::to_string(session).context("Failed to serialize session")?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open session log: {}", path.display()))?;

        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write to session log: {}", path.display()))
    }

    /// Read the whole session log, oldest first
    pub fn load_sessions(&self) -> Result<Vec<SessionRecord>> {
        let path = self.sessions_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&path)
            .with_context(|| format!("Failed to open session log: {}", path.display()))?;

        let mut sessions = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read line {} of session log", line_num + 1))?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<SessionRecord>(&line) {
                Ok(session) => sessions.push(session),
                Err(e) => warn!(line = line_num + 1, error = %e, "skipping unreadable session"),
            }
        }

        Ok(sessions)
    }

    /// Save the timer snapshot
    pub fn save_state(&self, state: &TimerState) -> Result<()> {
        let path = self.state_path();
        let content = serde_json::to_string_pretty(state).context("Failed to serialize timer state")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write timer state: {}", path.display()))
    }

    /// Load the timer snapshot, if there is a readable one
    pub fn load_state(&self) -> Result<Option<TimerState>> {
        let path = self.state_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read timer state: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable timer state");
                Ok(None)
            }
        }
    }

    /// Remove the session log and timer snapshot
    pub fn clear(&self) -> Result<()> {
        for path in [self.sessions_path(), self.state_path()] {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionKind;
    use crate::settings::Settings;
    use chrono::Utc;
    use tempfile::TempDir;

    fn temp_store() -> (SessionStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(&temp.path().join("studyflow")).unwrap();
        (store, temp)
    }

    #[test]
    fn test_empty_store() {
        let (store, _temp) = temp_store();
        assert!(store.load_sessions().unwrap().is_empty());
        assert!(store.load_state().unwrap().is_none());
    }

    #[test]
    fn test_append_and_load_sessions() {
        let (store, _temp) = temp_store();

        let first = SessionRecord::open(SessionKind::Study, Utc::now()).complete(25);
        let second = SessionRecord::open(SessionKind::Break, Utc::now()).complete(5);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        let sessions = store.load_sessions().unwrap();
        assert_eq!(sessions, vec![first, second]);
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let (store, _temp) = temp_store();

        let good = SessionRecord::open(SessionKind::Study, Utc::now()).complete(25);
        store.append(&good).unwrap();
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(store.sessions_path())
            .unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();
        store.append(&good).unwrap();

        assert_eq!(store.load_sessions().unwrap().len(), 2);
    }

    #[test]
    fn test_state_roundtrip() {
        let (store, _temp) = temp_store();

        let mut state = TimerState::initial(&Settings::default());
        state.is_break = true;
        state.focus_score = 3;
        store.save_state(&state).unwrap();

        assert_eq!(store.load_state().unwrap(), Some(state));
    }

    #[test]
    fn test_corrupt_state_is_ignored() {
        let (store, _temp) = temp_store();
        fs::write(store.state_path(), "[1, 2").unwrap();
        assert!(store.load_state().unwrap().is_none());
    }

    #[test]
    fn test_clear() {
        let (store, _temp) = temp_store();
        store
            .append(&SessionRecord::open(SessionKind::Study, Utc::now()).complete(25))
            .unwrap();
        store
            .save_state(&TimerState::initial(&Settings::default()))
            .unwrap();

        store.clear().unwrap();
        assert!(store.load_sessions().unwrap().is_empty());
        assert!(store.load_state().unwrap().is_none());
    }
}
