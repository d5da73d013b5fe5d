// Application settings
// Loaded from ~/.config/plangrid/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use plangrid_engine::session::{PastePolicy, PromptPolicy, SessionOptions};
use plangrid_engine::DEFAULT_CENTURY_PIVOT;

use crate::error::ConfigError;

/// Written on first run; `//` lines are stripped before parsing.
pub const DEFAULT_SETTINGS_JSON: &str = r#"{
    // Two-digit years at or above the pivot are 19YY, below it 20YY
    "dates.centuryPivot": 70,

    // Pasted start/end/duration cells: "replan" recalculates like typing,
    // "raw" writes values as-is
    "paste.policy": "replan",

    // Ambiguous edit while a prompt is open: "queue" or "reject"
    "prompt.policy": "queue"
}
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Dates
    #[serde(rename = "dates.centuryPivot")]
    pub century_pivot: u32,

    // Paste
    #[serde(rename = "paste.policy")]
    pub paste_policy: PastePolicy,

    // Prompts
    #[serde(rename = "prompt.policy")]
    pub prompt_policy: PromptPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            century_pivot: DEFAULT_CENTURY_PIVOT,
            paste_policy: PastePolicy::default(),
            prompt_policy: PromptPolicy::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("plangrid");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            if let Err(e) = Self::create_default_file(&path) {
                log::warn!("could not write default settings.json: {e}");
            }
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}: {e}; using default settings", path.display());
                Self::default()
            }
        }
    }

    /// Load and validate a specific settings file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse settings text. Lines starting with `//` are comments.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let settings: Self = serde_json::from_str(&cleaned)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.century_pivot > 99 {
            return Err(ConfigError::Validation(format!(
                "dates.centuryPivot must be 0-99, got {}",
                self.century_pivot
            )));
        }
        Ok(())
    }

    /// Save current settings to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Engine options for a new edit session.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            century_pivot: self.century_pivot,
            paste: self.paste_policy,
            prompts: self.prompt_policy,
        }
    }

    fn create_default_file(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_SETTINGS_JSON)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_matches_defaults() {
        let parsed = Settings::from_json(DEFAULT_SETTINGS_JSON).unwrap();
        assert_eq!(parsed, Settings::default());
        assert_eq!(parsed.session_options(), SessionOptions::default());
    }

    #[test]
    fn missing_keys_take_defaults() {
        let settings = Settings::from_json(r#"{ "paste.policy": "raw" }"#).unwrap();
        assert_eq!(settings.paste_policy, PastePolicy::Raw);
        assert_eq!(settings.prompt_policy, PromptPolicy::Queue);
        assert_eq!(settings.century_pivot, 70);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let json = r#"{ "grid.rowHeight": 24, "prompt.policy": "reject" }"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.prompt_policy, PromptPolicy::Reject);
    }

    #[test]
    fn bad_values_are_errors() {
        let err = Settings::from_json(r#"{ "dates.centuryPivot": 150 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("centuryPivot"));

        let err = Settings::from_json(r#"{ "paste.policy": "sometimes" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            century_pivot: 30,
            paste_policy: PastePolicy::Raw,
            prompt_policy: PromptPolicy::Reject,
        };

        settings.save_to(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"dates.centuryPivot\": 30"));
        assert!(text.contains("\"paste.policy\": \"raw\""));

        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn invalid_settings_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            century_pivot: 100,
            ..Settings::default()
        };
        assert!(matches!(settings.save_to(&path), Err(ConfigError::Validation(_))));
        assert!(!path.exists());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn pivot_reaches_the_parser() {
        use plangrid_engine::EditSession;
        let settings = Settings::from_json(r#"{ "dates.centuryPivot": 30 }"#).unwrap();
        let today = plangrid_engine::date::local_today();
        let session = EditSession::new(settings.session_options(), today);
        assert_eq!(session.parser().century_pivot(), 30);
        assert_eq!(
            session.parser().parse("1.1.45").map(|d| d.format("%Y").to_string()),
            Some("1945".to_string())
        );
    }
}
