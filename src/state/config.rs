//! Configuration management

use crate::glossary::DEFAULT_GLOSSARY_PATH;
use crate::speech::normalize::DEFAULT_ACRONYMS;
use crate::speech::voice::{default_voice_preferences, VoicePreference};
use crate::speech::{Normalizer, SpeechSettings, VoiceSelector};
use crate::{GlossaError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Application configuration
///
/// Persistent settings for the data file location, speech parameters,
/// the voice priority table and the acronym pronunciation table.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.glossa.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from ~/.glossa.cfg, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(path)
                .map_err(|e| GlossaError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(path)
                .map_err(|e| GlossaError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self {
            ini,
            path: path.to_path_buf(),
        })
    }

    /// Built-in defaults without touching the filesystem
    pub fn in_memory() -> Self {
        Self {
            ini: Self::default_config(),
            path: Self::config_path(),
        }
    }

    /// Get config file path (~/.glossa.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".glossa.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("glossary"))
            .set("path", DEFAULT_GLOSSARY_PATH);

        let defaults = SpeechSettings::default();
        ini.with_section(Some("speech"))
            .set("language", defaults.language.as_str())
            .set("rate", defaults.rate.to_string())
            .set("pitch", defaults.pitch.to_string())
            .set("volume", defaults.volume.to_string())
            .set("retry_on_error", defaults.retry_on_error.to_string());

        for pref in default_voice_preferences() {
            ini.with_section(Some("voices"))
                .set(pref.name_pattern, pref.language_prefix);
        }

        for (acronym, spoken) in DEFAULT_ACRONYMS {
            ini.with_section(Some("acronyms")).set(*acronym, *spoken);
        }

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// All key/value pairs of a section in file order
    fn section_pairs(&self, section: &str) -> Vec<(String, String)> {
        self.ini
            .section(Some(section))
            .map(|props| {
                props
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Glossary data file location
    pub fn glossary_path(&self) -> PathBuf {
        PathBuf::from(self.get_string("glossary", "path", DEFAULT_GLOSSARY_PATH))
    }

    /// Utterance parameters, each clamped to a sane range
    pub fn speech_settings(&self) -> SpeechSettings {
        let defaults = SpeechSettings::default();
        SpeechSettings {
            language: self.get_string("speech", "language", &defaults.language),
            rate: self.get_float("speech", "rate", defaults.rate).clamp(0.1, 10.0),
            pitch: self.get_float("speech", "pitch", defaults.pitch).clamp(0.0, 2.0),
            volume: self.get_float("speech", "volume", defaults.volume).clamp(0.0, 1.0),
            retry_on_error: self.get_bool("speech", "retry_on_error", defaults.retry_on_error),
        }
    }

    /// Voice priority table in rank order
    pub fn voice_preferences(&self) -> Vec<VoicePreference> {
        self.section_pairs("voices")
            .into_iter()
            .map(|(name, prefix)| VoicePreference::new(name, prefix))
            .collect()
    }

    /// Acronym pronunciation table
    pub fn acronyms(&self) -> Vec<(String, String)> {
        self.section_pairs("acronyms")
    }

    /// Voice selector for the configured language and priority table
    pub fn voice_selector(&self) -> VoiceSelector {
        VoiceSelector::new(self.voice_preferences(), self.speech_settings().language)
    }

    /// Normalizer built from the acronym table
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.acronyms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_defaults() {
        let config = Config::in_memory();
        assert_eq!(config.glossary_path(), PathBuf::from("glossary.json"));
        assert_eq!(config.speech_settings(), SpeechSettings::default());
        assert_eq!(config.voice_preferences(), default_voice_preferences());
        assert_eq!(config.acronyms().len(), DEFAULT_ACRONYMS.len());
    }
}
