//! Standard paths used by StudyFlow tools

use std::path::PathBuf;

/// Standard StudyFlow paths
pub struct Paths {
    /// Data directory (~/.local/share/studyflow)
    pub data: PathBuf,
    /// Config directory (~/.config/studyflow)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("studyflow");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("studyflow");

        Self { data, config }
    }

    /// Location of the timer settings file
    pub fn settings_file(&self) -> PathBuf {
        self.config.join("settings.json")
    }

    /// Get a data file path for a tool
    pub fn data_file(&self, name: &str) -> PathBuf {
        self.data.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_end_in_studyflow() {
        let paths = Paths::new();
        assert!(paths.data.ends_with("studyflow"));
        assert!(paths.config.ends_with("studyflow"));
    }

    #[test]
    fn test_file_locations() {
        let paths = Paths::new();
        assert_eq!(paths.settings_file(), paths.config.join("settings.json"));
        assert_eq!(paths.data_file("todos.json"), paths.data.join("todos.json"));
    }
}
