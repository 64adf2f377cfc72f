//! Configuration file persistence for mdpro
//!
//! Settings and snippets are small JSON files kept in the platform config
//! directory. Loading never fails: a missing, empty or corrupt file falls
//! back to defaults with a warning. Saving writes a sibling temporary file
//! and renames it over the target.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "mdpro";

/// Settings file name
const SETTINGS_FILE_NAME: &str = "settings.json";

/// Snippets file name, stored next to the settings
pub const SNIPPETS_FILE_NAME: &str = "snippets.json";

/// Suffix of the temporary file written before the rename
const BACKUP_SUFFIX: &str = "bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\mdpro\`
/// - **macOS**: `~/Library/Application Support/mdpro/`
/// - **Linux**: `~/.config/mdpro/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

// ─────────────────────────────────────────────────────────────────────────────
// Generic JSON Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read and parse a JSON file.
///
/// Returns `Ok(None)` when the file does not exist or is blank.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!("{} not found", path.display());
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("{} is empty", path.display());
        return Ok(None);
    }

    let value = serde_json::from_str(&contents).map_err(|e| {
        warn!("{} contains invalid JSON: {}", path.display(), e);
        Error::ConfigParse {
            message: format!("Failed to parse {}: {}", path.display(), e),
            source: Some(Box::new(e)),
        }
    })?;
    Ok(Some(value))
}

/// Serialize `value` as pretty JSON and write it to `path`.
///
/// The parent directory is created when missing. The data goes to
/// `<path>.bak` first and is then renamed over `path`.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating config directory: {}", dir.display());
            fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
                path: dir.to_path_buf(),
                source: Box::new(e),
            })?;
        }
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let backup_path = path.with_extension(BACKUP_SUFFIX);
    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, path).map_err(|e| Error::ConfigSave {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings Store
// ─────────────────────────────────────────────────────────────────────────────

/// Explicit owner of the settings file.
///
/// The session holds one of these instead of reaching for a global; every
/// settings-affecting action calls [`SettingsStore::save`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Create a store backed by `path`, loading whatever is there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Self::load_from(&path);
        Self { path, settings }
    }

    /// Create a store with explicit settings (nothing is read from disk).
    pub fn with_settings(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self {
            path: path.into(),
            settings,
        }
    }

    /// Path of the settings file in the platform config directory.
    pub fn default_location() -> Result<PathBuf> {
        Ok(get_config_dir()?.join(SETTINGS_FILE_NAME))
    }

    /// Path of the snippets file that lives next to the settings file.
    pub fn snippets_path(&self) -> PathBuf {
        self.path.with_file_name(SNIPPETS_FILE_NAME)
    }

    /// Load settings from `path`, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Settings {
        Self::load_internal(path)
            .unwrap_or_warn_default(Settings::default(), "Failed to load settings")
    }

    fn load_internal(path: &Path) -> Result<Settings> {
        let mut settings: Settings = match read_json(path)? {
            Some(settings) => settings,
            None => return Ok(Settings::default()),
        };
        settings.sanitize();
        info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Re-read the file, replacing the in-memory settings.
    pub fn reload(&mut self) {
        self.settings = Self::load_from(&self.path);
    }

    /// Write the current settings to disk.
    pub fn save(&self) -> Result<()> {
        write_json_atomic(&self.path, &self.settings)?;
        info!("Settings saved to {}", self.path.display());
        Ok(())
    }

    /// Save, logging instead of returning the error.
    ///
    /// Returns `true` if the save was successful.
    pub fn save_silent(&self) -> bool {
        match self.save() {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save settings: {}", e);
                false
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// Helper to create a test environment with a temporary config directory.
    struct TestEnv {
        _temp_dir: TempDir,
        settings_file: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let settings_file = temp_dir.path().join(APP_NAME).join(SETTINGS_FILE_NAME);
            Self {
                _temp_dir: temp_dir,
                settings_file,
            }
        }

        fn write_settings(&self, content: &str) {
            fs::create_dir_all(self.settings_file.parent().unwrap()).unwrap();
            fs::write(&self.settings_file, content).expect("Failed to write settings");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Platform directory tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_default_location_names_app_dir() {
        // Only meaningful where the platform exposes a config directory
        if let Ok(path) = SettingsStore::default_location() {
            let text = path.to_string_lossy();
            assert!(text.contains(APP_NAME));
            assert!(text.ends_with(SETTINGS_FILE_NAME));
        }
    }

    #[test]
    fn test_snippets_path_is_sibling() {
        let store = SettingsStore::with_settings("/cfg/mdpro/settings.json", Settings::default());
        assert_eq!(
            store.snippets_path(),
            PathBuf::from("/cfg/mdpro/snippets.json")
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let store = SettingsStore::open(&env.settings_file);
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let env = TestEnv::new();
        env.write_settings("   \n");
        let store = SettingsStore::open(&env.settings_file);
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_load_corrupted_file_uses_defaults() {
        let env = TestEnv::new();
        env.write_settings("{ invalid json }");
        let store = SettingsStore::open(&env.settings_file);
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn test_load_wrong_types_uses_defaults() {
        let env = TestEnv::new();
        env.write_settings(r#"{"dark_mode": "yes"}"#);
        let store = SettingsStore::open(&env.settings_file);
        assert!(!store.settings().dark_mode);
    }

    #[test]
    fn test_load_valid_file_is_sanitized() {
        let env = TestEnv::new();
        env.write_settings(r#"{"dark_mode": true, "auto_save_interval_secs": 0, "unknown": 1}"#);
        let store = SettingsStore::open(&env.settings_file);
        assert!(store.settings().dark_mode);
        assert_eq!(
            store.settings().auto_save_interval_secs,
            Settings::MIN_AUTO_SAVE_SECS
        );
    }

    #[test]
    fn test_read_json_reports_parse_error() {
        let env = TestEnv::new();
        env.write_settings("[1, 2");
        let result: Result<Option<Settings>> = read_json(&env.settings_file);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_creates_directory_and_roundtrips() {
        let env = TestEnv::new();
        let mut store = SettingsStore::open(&env.settings_file);
        store.settings_mut().dark_mode = true;
        store.settings_mut().word_goal = 750;
        store
            .settings_mut()
            .add_recent_file(PathBuf::from("/notes/today.md"));
        store.save().unwrap();

        assert!(env.settings_file.exists());
        // No temporary file left behind
        assert!(!env.settings_file.with_extension(BACKUP_SUFFIX).exists());

        let reopened = SettingsStore::open(&env.settings_file);
        assert_eq!(reopened.settings(), store.settings());
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let env = TestEnv::new();
        let mut store = SettingsStore::open(&env.settings_file);
        env.write_settings(r#"{"word_goal": 42}"#);
        store.reload();
        assert_eq!(store.settings().word_goal, 42);
    }

    #[test]
    fn test_save_silent_reports_failure() {
        let env = TestEnv::new();
        // A directory where the file should be makes the rename fail
        fs::create_dir_all(&env.settings_file).unwrap();
        let store = SettingsStore::with_settings(&env.settings_file, Settings::default());
        assert!(!store.save_silent());
    }

    #[test]
    fn test_generic_json_map_roundtrip() {
        let env = TestEnv::new();
        let path = env.settings_file.with_file_name(SNIPPETS_FILE_NAME);
        let mut map = BTreeMap::new();
        map.insert("sig".to_string(), "-- \nMe".to_string());
        write_json_atomic(&path, &map).unwrap();

        let loaded: Option<BTreeMap<String, String>> = read_json(&path).unwrap();
        assert_eq!(loaded, Some(map));
    }
}
