//! Speech dispatcher
//!
//! Owns the synthesizer and enforces the at-most-one-active-utterance rule:
//! every `speak` cancels whatever is playing, and lifecycle events for any
//! utterance other than the active one are dropped.

use super::normalize::Normalizer;
use super::status::{Status, StatusSink};
use super::synth::{FailureKind, Synth, SynthEvent, SynthFailure, UtteranceId, UtteranceRequest};
use super::voice::{VoiceDescriptor, VoiceSelector};
use log::{debug, error, info, warn};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Fixed utterance parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechSettings {
    /// Target language tag, also the fallback when no voice is resolved
    pub language: String,

    /// Rate multiplier; below 1.0 for clearer terms
    pub rate: f32,

    pub pitch: f32,

    pub volume: f32,

    /// Resubmit once with default voice and neutral rate after a retryable failure
    pub retry_on_error: bool,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
            retry_on_error: false,
        }
    }
}

/// The utterance whose events are currently being followed
#[derive(Debug)]
struct ActiveUtterance {
    id: UtteranceId,
    /// Text as requested, for status messages
    text: String,
    retried: bool,
}

/// Turns play actions into utterance requests and tracks their lifecycle
pub struct SpeechDispatcher {
    synth: Box<dyn Synth>,
    events: Receiver<SynthEvent>,
    normalizer: Normalizer,
    selector: VoiceSelector,
    settings: SpeechSettings,
    /// `None` until the platform voice list has been read once
    voices: Option<Vec<VoiceDescriptor>>,
    active: Option<ActiveUtterance>,
    /// Request parked while the voice list is not ready
    pending: Option<String>,
    status: Status,
    sink: Box<dyn StatusSink>,
}

impl SpeechDispatcher {
    pub fn new(
        synth: Box<dyn Synth>,
        events: Receiver<SynthEvent>,
        normalizer: Normalizer,
        selector: VoiceSelector,
        settings: SpeechSettings,
        sink: Box<dyn StatusSink>,
    ) -> Self {
        info!("Speech dispatcher using {} backend", synth.name());
        Self {
            synth,
            events,
            normalizer,
            selector,
            settings,
            voices: None,
            active: None,
            pending: None,
            status: Status::Idle,
            sink,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn settings(&self) -> &SpeechSettings {
        &self.settings
    }

    pub fn backend_name(&self) -> &str {
        self.synth.name()
    }

    /// Id of the utterance currently being followed
    pub fn active_utterance(&self) -> Option<UtteranceId> {
        self.active.as_ref().map(|a| a.id)
    }

    /// Cached voice list (empty until it has been populated)
    pub fn voices(&self) -> &[VoiceDescriptor] {
        self.voices.as_deref().unwrap_or(&[])
    }

    /// Voice the selector would pick from the cached list
    pub fn selected_voice(&self) -> Option<&VoiceDescriptor> {
        self.selector.select(self.voices())
    }

    /// Re-read the platform voice list into the cache
    ///
    /// Does nothing until the backend reports its list as ready, so an early
    /// listing never counts as the first population.
    pub fn refresh_voices(&mut self) {
        if !self.synth.voices_ready() {
            debug!("Voice list not ready yet");
            return;
        }
        let voices = match self.synth.voices() {
            Ok(voices) => voices,
            Err(e) => {
                warn!("Could not list voices: {}", e);
                Vec::new()
            }
        };
        info!("Voice list populated with {} voices", voices.len());
        self.voices = Some(voices);
    }

    fn set_status(&mut self, status: Status) {
        debug!("Status: {}", status);
        self.sink.update(&status);
        self.status = status;
    }

    /// Speak `raw`, preempting anything already playing
    ///
    /// Returns the id of the submitted utterance. Blank text, deferred
    /// requests and submit failures return `None` and are reported to the
    /// status sink instead.
    pub fn speak(&mut self, raw: &str) -> Option<UtteranceId> {
        let text = raw.trim();
        if text.is_empty() {
            debug!("Rejected blank speak request");
            self.set_status(Status::NothingToSpeak);
            return None;
        }

        self.silence();

        if self.voices.is_none() {
            if self.synth.voices_ready() {
                self.refresh_voices();
            } else {
                info!("Voices not ready, deferring {:?}", text);
                self.pending = Some(text.to_string());
                self.set_status(Status::WaitingForVoices(text.to_string()));
                return None;
            }
        }

        self.submit(text, false)
    }

    /// Cancel playback and any parked request
    pub fn stop(&mut self) {
        self.silence();
        self.set_status(Status::Idle);
    }

    fn silence(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("Preempting utterance {}", active.id);
        }
        self.pending = None;
        if let Err(e) = self.synth.cancel() {
            warn!("Failed to cancel speech: {}", e);
        }
    }

    fn build_request(&self, spoken: String, simplified: bool) -> UtteranceRequest {
        if simplified {
            return UtteranceRequest {
                text: spoken,
                voice: None,
                language: self.settings.language.clone(),
                rate: 1.0,
                pitch: 1.0,
                volume: self.settings.volume,
            };
        }

        let voice = self.selected_voice().cloned();
        if voice.is_none() {
            debug!("No voice resolved, falling back to {}", self.settings.language);
        }
        UtteranceRequest {
            text: spoken,
            voice,
            language: self.settings.language.clone(),
            rate: self.settings.rate,
            pitch: self.settings.pitch,
            volume: self.settings.volume,
        }
    }

    fn submit(&mut self, text: &str, simplified: bool) -> Option<UtteranceId> {
        let spoken = self.normalizer.normalize(text);
        if spoken.is_empty() {
            self.set_status(Status::NothingToSpeak);
            return None;
        }

        let request = self.build_request(spoken, simplified);
        debug!("Submitting {:?}", request);

        match self.synth.submit(&request) {
            Ok(id) => {
                self.active = Some(ActiveUtterance {
                    id,
                    text: text.to_string(),
                    retried: simplified,
                });
                self.set_status(Status::Speaking(text.to_string()));
                Some(id)
            }
            Err(e) => {
                error!("Failed to speak {:?}: {}", text, e);
                self.set_status(Status::Error(e.to_string()));
                None
            }
        }
    }

    /// Drain pending synth events; returns how many were handled
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Synth event channel closed");
                    break;
                }
            }
        }
        handled
    }

    fn is_active(&self, id: UtteranceId) -> bool {
        self.active.as_ref().is_some_and(|a| a.id == id)
    }

    /// Apply one lifecycle event
    pub fn handle_event(&mut self, event: SynthEvent) {
        match event {
            SynthEvent::VoicesChanged => {
                self.refresh_voices();
                if let Some(text) = self.pending.take() {
                    info!("Voices ready, speaking deferred {:?}", text);
                    self.submit(&text, false);
                }
            }
            SynthEvent::Started(id) if self.is_active(id) => {
                debug!("Utterance {} started", id);
            }
            SynthEvent::Finished(id) | SynthEvent::Stopped(id) if self.is_active(id) => {
                debug!("Utterance {} ended", id);
                self.active = None;
                self.set_status(Status::Idle);
            }
            SynthEvent::Failed(id, failure) if self.is_active(id) => self.handle_failure(failure),
            other => debug!("Ignoring event for inactive utterance: {:?}", other),
        }
    }

    fn handle_failure(&mut self, failure: SynthFailure) {
        let Some(active) = self.active.take() else {
            return;
        };
        warn!("Utterance {} failed: {}", active.id, failure);

        match failure.kind {
            // Cut off by someone else; not a user-facing error
            FailureKind::Interrupted | FailureKind::Canceled => {
                self.set_status(Status::Idle);
                return;
            }
            kind if kind.is_retryable() && self.settings.retry_on_error && !active.retried => {
                info!("Retrying {:?} with default voice", active.text);
                self.submit(&active.text, true);
                return;
            }
            _ => {}
        }

        self.set_status(Status::Error(failure.message));
    }
}
