//! Pronunciation normalizer
//!
//! Rewrites text before it reaches the synthesizer: underscores become
//! spaces, known acronyms are replaced by a spoken form, and whitespace is
//! collapsed. The rewrite is idempotent because spoken forms that would be
//! rewritten again are rejected when the table is built.

use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::{HashMap, HashSet};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Acronyms spelled out by default (acronym, spoken form)
pub const DEFAULT_ACRONYMS: &[(&str, &str)] = &[
    ("API", "A P I"),
    ("JSON", "Jason"),
    ("SQL", "sequel"),
    ("HTML", "H T M L"),
    ("CSS", "C S S"),
    ("URL", "U R L"),
    ("HTTP", "H T T P"),
    ("HTTPS", "H T T P S"),
    ("CLI", "C L I"),
    ("GUI", "gooey"),
    ("UI", "U I"),
    ("IDE", "I D E"),
    ("CPU", "C P U"),
    ("SDK", "S D K"),
    ("DNS", "D N S"),
    ("YAML", "yamel"),
];

/// Text rewriter applied before synthesis
#[derive(Debug, Clone)]
pub struct Normalizer {
    acronyms: HashMap<String, String>,
    pattern: Option<Regex>,
}

impl Normalizer {
    /// Build a normalizer from (acronym, spoken form) pairs
    ///
    /// Entries whose acronym is not a single alphanumeric word, or whose
    /// spoken form contains an underscore or one of the acronyms as a
    /// word, are skipped with a warning.
    pub fn new<I, K, V>(table: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let candidates: Vec<(String, String)> = table
            .into_iter()
            .map(|(k, v)| {
                let (k, v): (String, String) = (k.into(), v.into());
                (k.trim().to_string(), v.trim().to_string())
            })
            .filter(|(k, v)| {
                let ok = !k.is_empty() && k.chars().all(char::is_alphanumeric) && !v.is_empty();
                if !ok {
                    warn!("Ignoring acronym entry {:?} = {:?}", k, v);
                }
                ok
            })
            .collect();

        let keys: HashSet<&str> = candidates.iter().map(|(k, _)| k.as_str()).collect();
        let mut acronyms = HashMap::new();
        for (key, spoken) in &candidates {
            let reenters = spoken.contains('_')
                || spoken
                    .split(|c: char| !c.is_alphanumeric())
                    .any(|word| keys.contains(word));
            if reenters {
                warn!(
                    "Ignoring acronym {:?}: spoken form {:?} would be rewritten again",
                    key, spoken
                );
                continue;
            }
            acronyms.insert(key.clone(), spoken.clone());
        }

        Self {
            pattern: Self::build_pattern(acronyms.keys()),
            acronyms,
        }
    }

    /// Normalizer with no acronym table
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<(String, String)>())
    }

    fn build_pattern<'a>(keys: impl Iterator<Item = &'a String>) -> Option<Regex> {
        let mut keys: Vec<&String> = keys.collect();
        if keys.is_empty() {
            return None;
        }
        // Longest first so HTTPS wins over HTTP
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b(?:{})\b", alternation)).ok()
    }

    /// Number of active acronym rules
    pub fn len(&self) -> usize {
        self.acronyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.acronyms.is_empty()
    }

    /// Spoken form for an acronym, if the table has one
    pub fn spoken_form(&self, acronym: &str) -> Option<&str> {
        self.acronyms.get(acronym).map(String::as_str)
    }

    /// Rewrite `text` for clearer synthesis
    pub fn normalize(&self, text: &str) -> String {
        let text = text.replace('_', " ");

        let text = match &self.pattern {
            Some(re) => re
                .replace_all(&text, |caps: &Captures| {
                    let matched = &caps[0];
                    self.acronyms
                        .get(matched)
                        .cloned()
                        .unwrap_or_else(|| matched.to_string())
                })
                .into_owned(),
            None => text,
        };

        WHITESPACE.replace_all(&text, " ").trim().to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ACRONYMS.iter().copied())
    }
}
