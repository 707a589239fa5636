//! Speech synthesizer abstraction
//!
//! The platform synthesizer is an external collaborator. Backends implement
//! [`Synth`] and report utterance lifecycle changes asynchronously as
//! [`SynthEvent`]s over the channel handed to them at construction.

use super::voice::VoiceDescriptor;
use crate::Result;
use log::info;
use std::fmt;
use std::sync::mpsc::Sender;

/// Identifier for one submitted utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single request to vocalize a string
///
/// Built fresh for every play action and never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceRequest {
    pub text: String,

    /// Voice to use; `None` lets the platform pick its default for `language`
    pub voice: Option<VoiceDescriptor>,

    /// Language tag used when no voice was resolved
    pub language: String,

    /// Rate multiplier, 1.0 is the platform's normal rate
    pub rate: f32,

    /// Pitch multiplier, 1.0 is the platform's normal pitch
    pub pitch: f32,

    /// Volume, 0.0 to 1.0
    pub volume: f32,
}

/// Category of a synthesis failure reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Utterance was cut off by another one
    Interrupted,
    /// Utterance was removed from the queue before it started
    Canceled,
    /// The engine failed to produce audio
    SynthesisFailed,
    /// The requested voice could not be used
    VoiceUnavailable,
    /// The audio output could not be opened
    AudioBusy,
    Other,
}

impl FailureKind {
    /// Whether resubmitting with simpler parameters might succeed
    pub fn is_retryable(self) -> bool {
        matches!(self, FailureKind::SynthesisFailed | FailureKind::VoiceUnavailable)
    }
}

/// Error reported for an in-flight utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl SynthFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for SynthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Lifecycle notification from a backend
#[derive(Debug, Clone, PartialEq)]
pub enum SynthEvent {
    /// Playback of an utterance began
    Started(UtteranceId),
    /// Playback finished normally
    Finished(UtteranceId),
    /// Playback was stopped before finishing
    Stopped(UtteranceId),
    /// Playback failed
    Failed(UtteranceId, SynthFailure),
    /// The available voice list changed or became ready
    VoicesChanged,
}

/// Platform speech capability
///
/// Calls never block on playback; completion arrives later as events.
pub trait Synth {
    /// Enumerate the voices the platform currently offers
    fn voices(&mut self) -> Result<Vec<VoiceDescriptor>>;

    /// Whether the voice list has been populated at least once
    ///
    /// Some platforms fill their voice list asynchronously and send
    /// [`SynthEvent::VoicesChanged`] when it is ready.
    fn voices_ready(&self) -> bool {
        true
    }

    /// Submit an utterance for playback
    fn submit(&mut self, request: &UtteranceRequest) -> Result<UtteranceId>;

    /// Stop the active utterance and drop anything queued
    fn cancel(&mut self) -> Result<()>;

    /// Short backend name for logs and the voice listing
    fn name(&self) -> &str;
}

/// Create the platform speech synthesizer
///
/// Lifecycle events are delivered on `events`.
pub fn create_synth(events: Sender<SynthEvent>) -> Result<Box<dyn Synth>> {
    let platform = std::env::consts::OS;
    info!("Creating native speech synthesizer for platform: {}", platform);

    use super::backends::native::NativeSynth;

    match NativeSynth::new(events) {
        Ok(synth) => {
            info!("Successfully initialized native TTS backend");
            Ok(Box::new(synth))
        }
        Err(e) => Err(crate::GlossaError::Speech(format!(
            "Failed to initialize speech backend for platform '{}': {}",
            platform, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(FailureKind::SynthesisFailed.is_retryable());
        assert!(FailureKind::VoiceUnavailable.is_retryable());
        assert!(!FailureKind::Interrupted.is_retryable());
        assert!(!FailureKind::Canceled.is_retryable());
        assert!(!FailureKind::Other.is_retryable());
    }

    #[test]
    fn test_failure_display() {
        let failure = SynthFailure::new(FailureKind::AudioBusy, "device busy");
        assert_eq!(failure.to_string(), "AudioBusy: device busy");
    }
}
