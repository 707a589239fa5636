//! Speech synthesis system

pub mod backends;
pub mod dispatcher;
pub mod normalize;
pub mod status;
pub mod synth;
pub mod voice;

pub use dispatcher::{SpeechDispatcher, SpeechSettings};
pub use normalize::Normalizer;
pub use status::{Status, StatusLine, StatusSink};
pub use synth::{create_synth, Synth, SynthEvent, UtteranceId, UtteranceRequest};
pub use voice::{VoiceDescriptor, VoicePreference, VoiceSelector};
