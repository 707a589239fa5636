//! Application state management
//!
//! `State` is the single controller for the browser: it owns the loaded
//! glossary, the current query and its filtered view, the page position
//! and the speech dispatcher. The front end only forwards user actions
//! into it and renders what it exposes.

pub mod config;

use crate::glossary::{filter_terms, Glossary, PageView, Pager, TermRecord};
use crate::speech::{
    SpeechDispatcher, Status, StatusLine, Synth, SynthEvent, UtteranceId, VoiceDescriptor,
};
use config::Config;
use log::{debug, info, warn};
use std::sync::mpsc::Receiver;

/// Main application state
pub struct State {
    /// Configuration loaded from ~/.glossa.cfg
    pub config: Config,

    glossary: Glossary,

    /// Raw search query as typed
    query: String,

    /// Terms matching `query`, in glossary order
    filtered: Vec<TermRecord>,

    pager: Pager,

    speech: SpeechDispatcher,

    /// Status message shared with the speech dispatcher
    status: StatusLine,
}

impl State {
    /// Create the application state
    ///
    /// `events` must be the receiving end of the channel `synth` reports on.
    pub fn new(
        config: Config,
        glossary: Glossary,
        synth: Box<dyn Synth>,
        events: Receiver<SynthEvent>,
    ) -> Self {
        info!("Initializing state with {} terms", glossary.len());

        let status = StatusLine::new();
        let normalizer = config.normalizer();
        info!("  Acronyms: {}", normalizer.len());
        let selector = config.voice_selector();
        info!("  Voice preferences: {}", selector.preferences().len());
        let settings = config.speech_settings();
        info!("  Speech settings: {:?}", settings);

        let mut speech = SpeechDispatcher::new(
            synth,
            events,
            normalizer,
            selector,
            settings,
            Box::new(status.clone()),
        );
        speech.pump();

        Self {
            config,
            filtered: glossary.terms().to_vec(),
            glossary,
            query: String::new(),
            pager: Pager::new(),
            speech,
            status,
        }
    }

    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current filtered view
    pub fn filtered(&self) -> &[TermRecord] {
        &self.filtered
    }

    /// Replace the search query, recompute the filtered view and go to page 1
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.filtered = filter_terms(self.glossary.terms(), query);
        self.pager.reset();
        debug!("Query {:?} matched {} terms", query, self.filtered.len());
    }

    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    /// The visible page
    pub fn page(&self) -> PageView<'_> {
        self.pager.view(&self.filtered)
    }

    /// Go to the next page; false if already on the last one
    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.filtered.len())
    }

    /// Go to the previous page; false if already on the first one
    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    /// Term shown in `row` (1-based) of the visible page
    pub fn term_on_page(&self, row: usize) -> Option<&TermRecord> {
        if row == 0 {
            return None;
        }
        self.page().items.get(row - 1)
    }

    /// Play the term in `row` (1-based) of the visible page
    pub fn play(&mut self, row: usize) -> Option<UtteranceId> {
        let Some(term) = self.term_on_page(row).map(|t| t.term.clone()) else {
            warn!("No term in row {} of page {}", row, self.current_page());
            return None;
        };
        info!("Playing {:?}", term);
        self.speech.speak(&term)
    }

    /// Speak arbitrary text
    pub fn say(&mut self, text: &str) -> Option<UtteranceId> {
        self.speech.speak(text)
    }

    /// Silence speech
    pub fn stop(&mut self) {
        self.speech.stop();
    }

    /// Apply pending speech events; returns how many were handled
    pub fn pump_speech(&mut self) -> usize {
        self.speech.pump()
    }

    pub fn status(&self) -> Status {
        self.status.current()
    }

    pub fn status_message(&self) -> String {
        self.status.message()
    }

    pub fn speech(&self) -> &SpeechDispatcher {
        &self.speech
    }

    /// Reload the voice list and return it with the voice that would be used
    pub fn voices(&mut self) -> (Vec<VoiceDescriptor>, Option<VoiceDescriptor>) {
        self.speech.refresh_voices();
        (
            self.speech.voices().to_vec(),
            self.speech.selected_voice().cloned(),
        )
    }
}
