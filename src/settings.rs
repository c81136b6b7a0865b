//! Host-settable configuration
//!
//! Loaded from LocalStorage in the browser, or from the JSON file named by
//! `RETRO_ARCADE_SETTINGS` on native. Load failures fall back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// AI difficulty (pong opponent speed)
///
/// Stored lowercase; read case-insensitively through [`Difficulty::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Result<Self, SettingsError> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SettingsError::UnknownDifficulty(s.to_string())),
        }
    }

    /// Opponent paddle speed in pixels per tick
    pub fn ai_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.5,
            Difficulty::Medium => 4.0,
            Difficulty::Hard => 5.5,
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = SettingsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable")]
    StorageUnavailable,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Fixed RNG seed; random per mount when absent
    pub seed: Option<u64>,
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "retro_arcade_settings";
    /// Environment variable naming the native settings file
    pub const ENV_PATH: &'static str = "RETRO_ARCADE_SETTINGS";

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(Some(settings)) => {
                log::info!("Loaded settings ({})", settings.difficulty.as_str());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn try_load() -> Result<Option<Self>, SettingsError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(SettingsError::StorageUnavailable)?;

        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Self::from_json(&json).map(Some),
            Ok(None) => Ok(None),
            Err(_) => Err(SettingsError::StorageUnavailable),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn try_load() -> Result<Option<Self>, SettingsError> {
        let Some(path) = std::env::var_os(Self::ENV_PATH) else {
            return Ok(None);
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_json(&json).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), SettingsError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(SettingsError::StorageUnavailable)?;
        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| SettingsError::StorageUnavailable)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("Hard").ok(), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse(" easy ").ok(), Some(Difficulty::Easy));
        assert!(matches!(
            Difficulty::parse("nightmare"),
            Err(SettingsError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_ai_speeds() {
        assert_eq!(Difficulty::Easy.ai_speed(), 2.5);
        assert_eq!(Difficulty::Medium.ai_speed(), 4.0);
        assert_eq!(Difficulty::Hard.ai_speed(), 5.5);
    }

    #[test]
    fn test_from_json_partial_and_malformed() {
        let s = Settings::from_json(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(s.difficulty, Difficulty::Hard);
        assert_eq!(s.seed, None);

        let s = Settings::from_json(r#"{"seed":42}"#).unwrap();
        assert_eq!(s.difficulty, Difficulty::Medium);
        assert_eq!(s.seed, Some(42));

        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_from_json_difficulty_any_case() {
        let s = Settings::from_json(r#"{"difficulty":"Hard"}"#).unwrap();
        assert_eq!(s.difficulty, Difficulty::Hard);
        let s = Settings::from_json(r#"{"difficulty":" EASY "}"#).unwrap();
        assert_eq!(s.difficulty, Difficulty::Easy);
        assert!(matches!(
            Settings::from_json(r#"{"difficulty":"nightmare"}"#),
            Err(SettingsError::Json(_))
        ));
        // Still written lowercase
        assert_eq!(
            Settings::from_json(r#"{"difficulty":"Hard"}"#).unwrap().to_json().unwrap(),
            r#"{"difficulty":"hard","seed":null}"#
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let s = Settings {
            difficulty: Difficulty::Easy,
            seed: Some(9),
        };
        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), s);
    }
}
