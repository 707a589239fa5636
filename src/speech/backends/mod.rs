//! Speech backends

// Native TTS backend using the tts crate (cross-platform)
pub mod native;

// Silent in-memory backend
pub mod memory;
