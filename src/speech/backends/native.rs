//! Native TTS backend using the tts crate
//!
//! The `tts` crate gives a unified interface to:
//! - Speech Dispatcher on Linux
//! - AVFoundation on macOS/iOS
//! - WinRT/SAPI on Windows
//!
//! Platform utterance callbacks are forwarded as [`SynthEvent`]s.

use crate::speech::synth::{Synth, SynthEvent, UtteranceId, UtteranceRequest};
use crate::speech::voice::{language_family, VoiceDescriptor};
use crate::{GlossaError, Result};
use log::{debug, error, warn};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use tts::{Features, Tts as TtsCrate, UtteranceId as TtsUtteranceId, Voice};

type IdMap = Arc<Mutex<IdTable<TtsUtteranceId>>>;

/// Most callbacks held for ids `speak` has not returned yet
const MAX_EARLY: usize = 32;

/// Platform utterance callback kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Begin,
    End,
    Stop,
}

impl Phase {
    fn event(self, id: UtteranceId) -> SynthEvent {
        match self {
            Phase::Begin => SynthEvent::Started(id),
            Phase::End => SynthEvent::Finished(id),
            Phase::Stop => SynthEvent::Stopped(id),
        }
    }

    fn is_terminal(self) -> bool {
        self != Phase::Begin
    }
}

/// Platform utterance ids mapped to ours, removed once an utterance ends
///
/// Callbacks may run before `speak` hands back the platform id (WinRT fires
/// begin from inside `speak`). Those are parked in `early` and replayed when
/// the id is registered.
struct IdTable<K> {
    known: Vec<(K, UtteranceId)>,
    early: Vec<(K, Phase)>,
}

impl<K: PartialEq> IdTable<K> {
    fn new() -> Self {
        Self {
            known: Vec::new(),
            early: Vec::new(),
        }
    }

    /// Event for a platform callback, or `None` if the id is not known yet
    fn route(&mut self, key: K, phase: Phase) -> Option<SynthEvent> {
        match self.known.iter().position(|(k, _)| *k == key) {
            Some(pos) => {
                let id = if phase.is_terminal() {
                    self.known.remove(pos).1
                } else {
                    self.known[pos].1
                };
                Some(phase.event(id))
            }
            None => {
                if self.early.len() >= MAX_EARLY {
                    self.early.remove(0);
                }
                self.early.push((key, phase));
                None
            }
        }
    }

    /// Map `key` to `id`, returning events for callbacks that already fired
    fn register(&mut self, key: K, id: UtteranceId) -> Vec<SynthEvent> {
        let mut events = Vec::new();
        let mut ended = false;
        self.early.retain(|(k, phase)| {
            if *k == key {
                events.push(phase.event(id));
                ended |= phase.is_terminal();
                false
            } else {
                true
            }
        });
        if !ended {
            self.known.push((key, id));
        }
        events
    }
}

/// Native TTS backend using the tts crate
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    features: Features,

    events: Sender<SynthEvent>,

    ids: IdMap,

    next_id: u64,
}

impl NativeSynth {
    /// Create a new native TTS synthesizer
    ///
    /// Initializes the platform-appropriate TTS backend and hooks its
    /// utterance callbacks up to `events` where the platform supports them.
    pub fn new(events: Sender<SynthEvent>) -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| GlossaError::Speech(format!("Failed to initialize TTS: {}", e)))?;
        let features = tts.supported_features();
        let ids: IdMap = Arc::new(Mutex::new(IdTable::new()));

        if features.utterance_callbacks {
            Self::register_callbacks(&tts, &events, &ids)?;
        } else {
            warn!("Utterance callbacks not supported on this platform");
        }

        debug!("Native TTS backend created successfully");

        Ok(Self {
            tts,
            features,
            events,
            ids,
            next_id: 0,
        })
    }

    fn register_callbacks(tts: &TtsCrate, events: &Sender<SynthEvent>, ids: &IdMap) -> Result<()> {
        let (tx, map) = (events.clone(), ids.clone());
        tts.on_utterance_begin(Some(Box::new(move |tts_id: TtsUtteranceId| {
            forward(&map, &tx, tts_id, Phase::Begin)
        })))
        .map_err(|e| GlossaError::Speech(format!("Failed to register callback: {}", e)))?;

        let (tx, map) = (events.clone(), ids.clone());
        tts.on_utterance_end(Some(Box::new(move |tts_id: TtsUtteranceId| {
            forward(&map, &tx, tts_id, Phase::End)
        })))
        .map_err(|e| GlossaError::Speech(format!("Failed to register callback: {}", e)))?;

        let (tx, map) = (events.clone(), ids.clone());
        tts.on_utterance_stop(Some(Box::new(move |tts_id: TtsUtteranceId| {
            forward(&map, &tx, tts_id, Phase::Stop)
        })))
        .map_err(|e| GlossaError::Speech(format!("Failed to register callback: {}", e)))?;

        Ok(())
    }

    /// Scale a multiplier around the platform's normal value
    fn scaled(normal: f32, min: f32, max: f32, factor: f32) -> f32 {
        (normal * factor).clamp(min, max)
    }

    /// Find the platform voice matching a descriptor
    fn find_voice(&self, wanted: &VoiceDescriptor) -> Result<Option<Voice>> {
        let voices = self
            .tts
            .voices()
            .map_err(|e| GlossaError::Speech(format!("Failed to get voices: {}", e)))?;
        Ok(voices
            .into_iter()
            .find(|v| v.name() == wanted.name && v.language().as_str() == wanted.language))
    }

    /// First platform voice in the given language family
    fn voice_for_language(&self, language: &str) -> Result<Option<Voice>> {
        let family = language_family(language);
        let voices = self
            .tts
            .voices()
            .map_err(|e| GlossaError::Speech(format!("Failed to get voices: {}", e)))?;
        Ok(voices
            .into_iter()
            .find(|v| language_family(v.language().as_str()).eq_ignore_ascii_case(family)))
    }

    fn apply_voice(&mut self, request: &UtteranceRequest) -> Result<()> {
        if !self.features.voice {
            debug!("Voice selection not supported on this platform");
            return Ok(());
        }

        let voice = match &request.voice {
            Some(wanted) => {
                let found = self.find_voice(wanted)?;
                if found.is_none() {
                    warn!("Voice {} disappeared, using {}", wanted, request.language);
                    self.voice_for_language(&request.language)?
                } else {
                    found
                }
            }
            None => self.voice_for_language(&request.language)?,
        };

        if let Some(voice) = voice {
            debug!("Selecting voice: {}", voice.name());
            self.tts
                .set_voice(&voice)
                .map_err(|e| GlossaError::Speech(format!("Failed to set voice: {}", e)))?;
        }
        Ok(())
    }

    fn apply_prosody(&mut self, request: &UtteranceRequest) -> Result<()> {
        if self.features.rate {
            let rate = Self::scaled(
                self.tts.normal_rate(),
                self.tts.min_rate(),
                self.tts.max_rate(),
                request.rate,
            );
            self.tts
                .set_rate(rate)
                .map_err(|e| GlossaError::Speech(format!("Failed to set rate: {}", e)))?;
        }

        if self.features.pitch {
            let pitch = Self::scaled(
                self.tts.normal_pitch(),
                self.tts.min_pitch(),
                self.tts.max_pitch(),
                request.pitch,
            );
            self.tts
                .set_pitch(pitch)
                .map_err(|e| GlossaError::Speech(format!("Failed to set pitch: {}", e)))?;
        }

        if self.features.volume {
            let volume = Self::scaled(
                self.tts.max_volume(),
                self.tts.min_volume(),
                self.tts.max_volume(),
                request.volume,
            );
            self.tts
                .set_volume(volume)
                .map_err(|e| GlossaError::Speech(format!("Failed to set volume: {}", e)))?;
        }
        Ok(())
    }
}

/// Send the event for a platform callback once its id is known
fn forward(ids: &IdMap, events: &Sender<SynthEvent>, tts_id: TtsUtteranceId, phase: Phase) {
    if let Ok(mut ids) = ids.lock() {
        if let Some(event) = ids.route(tts_id, phase) {
            let _ = events.send(event);
        }
    }
}

impl Synth for NativeSynth {
    fn voices(&mut self) -> Result<Vec<VoiceDescriptor>> {
        let voices = self
            .tts
            .voices()
            .map_err(|e| GlossaError::Speech(format!("Failed to get voices: {}", e)))?;
        Ok(voices
            .iter()
            .map(|v| VoiceDescriptor::new(v.name(), v.language().as_str()))
            .collect())
    }

    fn submit(&mut self, request: &UtteranceRequest) -> Result<UtteranceId> {
        // Settings are best effort; a voice we cannot set still gets spoken
        if let Err(e) = self.apply_voice(request) {
            warn!("{}", e);
        }
        if let Err(e) = self.apply_prosody(request) {
            warn!("{}", e);
        }

        self.next_id += 1;
        let id = UtteranceId(self.next_id);

        debug!("Speaking {}: {}", id, request.text);
        let tts_id = self.tts.speak(request.text.as_str(), false).map_err(|e| {
            error!("Failed to speak: {}", e);
            GlossaError::Speech(format!("Speak failed: {}", e))
        })?;

        match tts_id {
            Some(tts_id) if self.features.utterance_callbacks => {
                if let Ok(mut ids) = self.ids.lock() {
                    for event in ids.register(tts_id, id) {
                        let _ = self.events.send(event);
                    }
                }
            }
            // No callbacks: the end of playback is never reported
            _ => {
                let _ = self.events.send(SynthEvent::Started(id));
            }
        }

        Ok(id)
    }

    fn cancel(&mut self) -> Result<()> {
        if !self.features.stop {
            return Ok(());
        }
        debug!("Canceling speech");
        self.tts.stop().map_err(|e| {
            error!("Failed to cancel speech: {}", e);
            GlossaError::Speech(format!("Cancel failed: {}", e))
        })?;
        Ok(())
    }

    fn name(&self) -> &str {
        "native"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_create_synth() {
        // May fail without speech-dispatcher (Linux) or in CI without audio
        let (tx, _rx) = mpsc::channel();
        match NativeSynth::new(tx) {
            Ok(_) => println!("Native TTS backend initialized successfully"),
            Err(e) => println!("TTS initialization failed (may be expected in CI): {}", e),
        }
    }

    #[test]
    fn test_scaled() {
        assert_eq!(NativeSynth::scaled(1.0, 0.1, 10.0, 0.8), 0.8);
        assert_eq!(NativeSynth::scaled(200.0, 50.0, 500.0, 0.8), 160.0);
        assert_eq!(NativeSynth::scaled(1.0, 0.5, 2.0, 0.1), 0.5);
        assert_eq!(NativeSynth::scaled(1.0, 0.0, 1.0, 1.5), 1.0);
    }

    #[test]
    fn test_callbacks_after_register() {
        let mut table = IdTable::new();
        assert!(table.register(7u32, UtteranceId(1)).is_empty());

        assert_eq!(table.route(7, Phase::Begin), Some(SynthEvent::Started(UtteranceId(1))));
        assert_eq!(table.route(7, Phase::End), Some(SynthEvent::Finished(UtteranceId(1))));
        assert!(table.known.is_empty());
    }

    #[test]
    fn test_begin_before_register_is_replayed() {
        let mut table = IdTable::new();
        assert_eq!(table.route(7u32, Phase::Begin), None);

        let replayed = table.register(7, UtteranceId(1));
        assert_eq!(replayed, vec![SynthEvent::Started(UtteranceId(1))]);
        assert!(table.early.is_empty());
        assert_eq!(table.route(7, Phase::End), Some(SynthEvent::Finished(UtteranceId(1))));
    }

    #[test]
    fn test_fast_end_before_register() {
        let mut table = IdTable::new();
        table.route(3u32, Phase::Begin);
        table.route(3, Phase::End);
        table.route(4, Phase::Begin);

        let replayed = table.register(3, UtteranceId(9));
        assert_eq!(
            replayed,
            vec![SynthEvent::Started(UtteranceId(9)), SynthEvent::Finished(UtteranceId(9))]
        );
        assert!(table.known.is_empty());
        assert_eq!(table.early, vec![(4, Phase::Begin)]);
    }

    #[test]
    fn test_early_callbacks_bounded() {
        let mut table = IdTable::new();
        for key in 0..(MAX_EARLY as u32 + 5) {
            table.route(key, Phase::Stop);
        }
        assert_eq!(table.early.len(), MAX_EARLY);
        assert!(table.register(0, UtteranceId(1)).is_empty());
    }
}
