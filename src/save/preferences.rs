//! User preferences
//!
//! Stored as RON next to the other per-user config. Anything missing or
//! malformed falls back to defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::atomic::write_text_atomic;

pub const MIN_SCALE: u8 = 1;
pub const MAX_SCALE: u8 = 10;
pub const DEFAULT_SCALE: u8 = 2;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Display scale, `MIN_SCALE..=MAX_SCALE`
    pub scale: u8,
    /// Overrides the platform location of the save store
    pub save_dir: Option<PathBuf>,
    /// env_logger filter used by the binary
    pub log_filter: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            save_dir: None,
            log_filter: "info".to_string(),
        }
    }
}

impl Preferences {
    pub fn set_scale(&mut self, scale: u8) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn scale_up(&mut self) {
        self.set_scale(self.scale.saturating_add(1));
    }

    pub fn scale_down(&mut self) {
        self.set_scale(self.scale.saturating_sub(1));
    }

    /// Where the save store lives for these preferences
    pub fn save_store_path(&self) -> PathBuf {
        match &self.save_dir {
            Some(dir) => dir.join("saves.json"),
            None => super::store::save_store_path(),
        }
    }

    fn clamped(mut self) -> Self {
        self.set_scale(self.scale);
        self
    }
}

/// Default location of the preferences file
pub fn preferences_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "aldon", "AldonsCrossing") {
        let mut path = proj_dirs.config_dir().to_path_buf();
        path.push("preferences.ron");
        path
    } else {
        PathBuf::from("./preferences.ron")
    }
}

/// Load preferences from `path` (or create defaults)
pub fn load_preferences(path: &std::path::Path) -> Preferences {
    if !path.exists() {
        log::info!("No preferences found, using defaults");
        return Preferences::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match ron::from_str::<Preferences>(&content) {
            Ok(prefs) => {
                log::info!("Loaded preferences from {:?}", path);
                prefs.clamped()
            }
            Err(e) => {
                log::warn!("Failed to parse preferences: {}, using defaults", e);
                Preferences::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read preferences: {}, using defaults", e);
            Preferences::default()
        }
    }
}

/// Save preferences to `path`
pub fn save_preferences(prefs: &Preferences, path: &std::path::Path) -> Result<(), PreferencesError> {
    let content = ron::ser::to_string_pretty(prefs, ron::ser::PrettyConfig::default())?;
    write_text_atomic(path, &content)?;
    log::debug!("Preferences saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_clamped() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.scale, DEFAULT_SCALE);

        prefs.set_scale(0);
        assert_eq!(prefs.scale, MIN_SCALE);
        prefs.scale_down();
        assert_eq!(prefs.scale, MIN_SCALE);

        prefs.set_scale(200);
        assert_eq!(prefs.scale, MAX_SCALE);
        prefs.scale_up();
        assert_eq!(prefs.scale, MAX_SCALE);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.ron");
        let mut prefs = Preferences::default();
        prefs.set_scale(5);
        prefs.save_dir = Some(dir.path().to_path_buf());

        save_preferences(&prefs, &path).unwrap();
        assert_eq!(load_preferences(&path), prefs);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.ron");
        fs::write(&path, "(scale: 40)").unwrap();

        let prefs = load_preferences(&path);
        assert_eq!(prefs.scale, MAX_SCALE);
        assert_eq!(prefs.log_filter, "info");
        assert_eq!(prefs.save_dir, None);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.ron");
        fs::write(&path, "scale = 3").unwrap();

        assert_eq!(load_preferences(&path), Preferences::default());
    }

    #[test]
    fn test_save_dir_override() {
        let prefs = Preferences {
            save_dir: Some(PathBuf::from("/tmp/aldon")),
            ..Preferences::default()
        };
        assert_eq!(prefs.save_store_path(), PathBuf::from("/tmp/aldon/saves.json"));
    }
}
