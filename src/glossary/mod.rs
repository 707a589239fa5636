//! Glossary store
//!
//! The glossary is loaded once at startup from a JSON document of the form
//! `{ "terms": [ ... ] }`. Insertion order is the canonical display order.

pub mod filter;
pub mod pager;

use crate::{GlossaError, Result};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use filter::{filter_terms, matches_query};
pub use pager::{PageView, Pager, PAGE_SIZE};

/// Default location of the glossary data file, relative to the working directory
pub const DEFAULT_GLOSSARY_PATH: &str = "glossary.json";

/// One glossary entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Display key, also the text spoken by the play control
    pub term: String,

    /// Phonetic or alternate spelling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,

    pub definition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,

    /// Usage example
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl TermRecord {
    /// Create a record with only the required fields
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            pronunciation: None,
            definition: definition.into(),
            translation: None,
            example: None,
        }
    }

    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = Some(pronunciation.into());
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = Some(translation.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// On-disk shape of the data file
#[derive(Debug, Deserialize)]
struct GlossaryDocument {
    terms: Vec<TermRecord>,
}

/// Ordered, immutable list of term records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glossary {
    terms: Vec<TermRecord>,
}

impl Glossary {
    pub fn new(terms: Vec<TermRecord>) -> Self {
        Self { terms }
    }

    /// Parse a glossary from the JSON document text
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: GlossaryDocument = serde_json::from_str(json)?;
        Ok(Self::new(doc.terms))
    }

    /// Load a glossary from a data file
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading glossary from {:?}", path);
        let json = fs::read_to_string(path).map_err(|e| {
            GlossaError::Glossary(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let glossary = Self::from_json(&json).map_err(|e| {
            GlossaError::Glossary(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        info!("Loaded {} terms from {:?}", glossary.len(), path);
        Ok(glossary)
    }

    /// Load a glossary, falling back to an empty one on any failure
    ///
    /// A missing or malformed data file is not fatal: the browser simply
    /// shows its "no results" state.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(glossary) => glossary,
            Err(e) => {
                error!("Error loading glossary: {}", e);
                Self::default()
            }
        }
    }

    pub fn terms(&self) -> &[TermRecord] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
