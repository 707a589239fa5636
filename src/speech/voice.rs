//! Voice selection
//!
//! Picks one synthesis voice out of whatever the platform offers, using an
//! ordered table of preferred voices and falling back to broader matches.

use log::debug;
use std::fmt;

/// A platform synthesis voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceDescriptor {
    /// Platform voice name (e.g. "Samantha", "Google US English")
    pub name: String,

    /// BCP 47 language tag (e.g. "en-US")
    pub language: String,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }

    /// Primary language subtag ("en" for "en-US" or "en_GB")
    pub fn language_family(&self) -> &str {
        language_family(&self.language)
    }
}

impl fmt::Display for VoiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.language)
    }
}

/// Primary subtag of a language tag, accepting `-` or `_` as separator
pub fn language_family(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or("").trim()
}

/// Check whether `tag` starts with `prefix`, ignoring case and separator style
fn tag_has_prefix(tag: &str, prefix: &str) -> bool {
    let tag = tag.replace('_', "-").to_ascii_lowercase();
    let prefix = prefix.replace('_', "-").to_ascii_lowercase();
    tag.starts_with(&prefix)
}

/// One row of the voice priority table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePreference {
    /// Case-insensitive substring of the voice name
    pub name_pattern: String,

    /// Required language tag prefix (e.g. "en" or "en-US")
    pub language_prefix: String,
}

impl VoicePreference {
    pub fn new(name_pattern: impl Into<String>, language_prefix: impl Into<String>) -> Self {
        Self {
            name_pattern: name_pattern.into(),
            language_prefix: language_prefix.into(),
        }
    }

    fn matches(&self, voice: &VoiceDescriptor) -> bool {
        !self.name_pattern.is_empty()
            && voice
                .name
                .to_lowercase()
                .contains(&self.name_pattern.to_lowercase())
            && tag_has_prefix(&voice.language, &self.language_prefix)
    }
}

/// Known clear English voices across common platforms, best first
pub fn default_voice_preferences() -> Vec<VoicePreference> {
    [
        ("Google US English", "en-US"),
        ("Samantha", "en-US"),
        ("Microsoft Aria", "en-US"),
        ("Microsoft Jenny", "en-US"),
        ("Microsoft Zira", "en-US"),
        ("Alex", "en-US"),
        ("Google UK English Female", "en-GB"),
        ("Daniel", "en-GB"),
        ("Karen", "en-AU"),
    ]
    .into_iter()
    .map(|(name, lang)| VoicePreference::new(name, lang))
    .collect()
}

/// Which rule picked a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    /// Matched a row of the priority table
    Preferred,
    /// First voice in the target language family
    LanguageFamily,
    /// First available voice, any language
    FirstAvailable,
}

/// Deterministic voice picker
#[derive(Debug, Clone)]
pub struct VoiceSelector {
    preferences: Vec<VoicePreference>,
    language: String,
}

impl VoiceSelector {
    /// Create a selector for the target language tag (e.g. "en-US")
    pub fn new(preferences: Vec<VoicePreference>, language: impl Into<String>) -> Self {
        Self {
            preferences,
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn preferences(&self) -> &[VoicePreference] {
        &self.preferences
    }

    /// Pick a voice from `voices`, or `None` if the set is empty
    pub fn select<'a>(&self, voices: &'a [VoiceDescriptor]) -> Option<&'a VoiceDescriptor> {
        self.select_with_rule(voices).map(|(voice, _)| voice)
    }

    /// Pick a voice and report which rule chose it
    pub fn select_with_rule<'a>(
        &self,
        voices: &'a [VoiceDescriptor],
    ) -> Option<(&'a VoiceDescriptor, SelectionRule)> {
        let family = language_family(&self.language);
        let in_family =
            |voice: &VoiceDescriptor| voice.language_family().eq_ignore_ascii_case(family);

        for pref in &self.preferences {
            if let Some(voice) = voices.iter().find(|&v| in_family(v) && pref.matches(v)) {
                debug!("Voice {} matched preference {:?}", voice, pref.name_pattern);
                return Some((voice, SelectionRule::Preferred));
            }
        }

        if let Some(voice) = voices.iter().find(|&v| in_family(v)) {
            debug!("Voice {} matched language family {:?}", voice, family);
            return Some((voice, SelectionRule::LanguageFamily));
        }

        let voice = voices.first()?;
        debug!("No {:?} voice available, using {}", family, voice);
        Some((voice, SelectionRule::FirstAvailable))
    }
}

impl Default for VoiceSelector {
    fn default() -> Self {
        Self::new(default_voice_preferences(), "en-US")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voices() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("Thomas", "fr-FR"),
            VoiceDescriptor::new("Fred", "en-US"),
            VoiceDescriptor::new("Daniel", "en-GB"),
            VoiceDescriptor::new("Samantha", "en-US"),
        ]
    }

    #[test]
    fn test_language_family() {
        assert_eq!(language_family("en-US"), "en");
        assert_eq!(language_family("en_GB"), "en");
        assert_eq!(language_family("es"), "es");
        assert_eq!(language_family(""), "");
    }

    #[test]
    fn test_preference_order_wins_over_list_order() {
        let selector = VoiceSelector::default();
        let voices = voices();
        let (voice, rule) = selector.select_with_rule(&voices).unwrap();
        // Samantha ranks above Daniel in the table
        assert_eq!(voice.name, "Samantha");
        assert_eq!(rule, SelectionRule::Preferred);
    }

    #[test]
    fn test_preference_requires_language_prefix() {
        let selector = VoiceSelector::new(vec![VoicePreference::new("Daniel", "en-US")], "en-US");
        let voices = voices();
        // Daniel is en-GB so the row does not apply; fall back to family match
        let (voice, rule) = selector.select_with_rule(&voices).unwrap();
        assert_eq!(voice.name, "Fred");
        assert_eq!(rule, SelectionRule::LanguageFamily);
    }

    #[test]
    fn test_name_match_is_substring_and_case_insensitive() {
        let selector = VoiceSelector::new(vec![VoicePreference::new("aria", "en")], "en-US");
        let voices = vec![
            VoiceDescriptor::new("Fred", "en-US"),
            VoiceDescriptor::new("Microsoft Aria Online (Natural)", "en_US"),
        ];
        assert_eq!(selector.select(&voices).unwrap().name, "Microsoft Aria Online (Natural)");
    }

    #[test]
    fn test_first_voice_fallback() {
        let selector = VoiceSelector::default();
        let voices = vec![
            VoiceDescriptor::new("Monica", "es-ES"),
            VoiceDescriptor::new("Thomas", "fr-FR"),
        ];
        let (voice, rule) = selector.select_with_rule(&voices).unwrap();
        assert_eq!(voice.name, "Monica");
        assert_eq!(rule, SelectionRule::FirstAvailable);
    }

    #[test]
    fn test_empty_set() {
        assert!(VoiceSelector::default().select(&[]).is_none());
    }

    #[test]
    fn test_deterministic() {
        let selector = VoiceSelector::default();
        let voices = voices();
        let first = selector.select(&voices).cloned();
        for _ in 0..10 {
            assert_eq!(selector.select(&voices).cloned(), first);
        }
    }
}
