//! Configuration loading tests
//!
//! Tests that configuration files are created with defaults and that
//! edited tables are read back in file order

use glossa::speech::voice::VoicePreference;
use glossa::state::config::Config;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_created_with_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("glossa.cfg");

    let config = Config::load_from(&path).expect("Failed to load config");
    assert!(path.exists());
    assert_eq!(config.path(), path.as_path());

    let settings = config.speech_settings();
    assert_eq!(settings.language, "en-US");
    assert!(settings.rate < 1.0);
    assert_eq!(settings.volume, 1.0);
    assert!(!settings.retry_on_error);

    assert!(!config.voice_preferences().is_empty());
    assert!(config.acronyms().iter().any(|(k, v)| k == "API" && v == "A P I"));
}

#[test]
fn test_tables_read_in_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("glossa.cfg");
    fs::write(
        &path,
        "[glossary]\npath = data/terms.json\n\
         [speech]\nlanguage = es-ES\nrate = 0.7\nretry_on_error = true\n\
         [voices]\nMonica = es\nGoogle español = es-ES\n\
         [acronyms]\nURL = U R L\nBAD = BAD again\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.glossary_path().to_str(), Some("data/terms.json"));

    let settings = config.speech_settings();
    assert_eq!(settings.language, "es-ES");
    assert_eq!(settings.rate, 0.7);
    assert!(settings.retry_on_error);

    assert_eq!(
        config.voice_preferences(),
        vec![
            VoicePreference::new("Monica", "es"),
            VoicePreference::new("Google español", "es-ES"),
        ]
    );
    assert_eq!(config.voice_selector().language(), "es-ES");

    // The self-referencing entry is dropped, the other one kept
    let normalizer = config.normalizer();
    assert_eq!(normalizer.len(), 1);
    assert_eq!(normalizer.normalize("open the URL"), "open the U R L");
}

#[test]
fn test_out_of_range_values_are_clamped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("glossa.cfg");
    fs::write(
        &path,
        "[speech]\npitch = 1.2\nvolume = 3.5\nrate = not a number\n",
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.get_float("speech", "pitch", 0.0), 1.2);
    let settings = config.speech_settings();
    assert_eq!(settings.pitch, 1.2);
    assert_eq!(settings.volume, 1.0);
    assert_eq!(settings.rate, 0.8);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("glossa.cfg");
    fs::write(&path, "[speech\nrate = 0.8\n").unwrap();
    assert!(Config::load_from(&path).is_err());
}
