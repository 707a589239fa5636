//! Playback status reporting

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Speech playback state shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    /// A request is parked until the platform voice list is ready
    WaitingForVoices(String),
    /// An utterance has been submitted and not yet finished
    Speaking(String),
    /// The last utterance failed
    Error(String),
    /// A blank request was rejected before reaching the synthesizer
    NothingToSpeak,
}

impl Status {
    /// Human-readable status message
    pub fn message(&self) -> String {
        match self {
            Status::Idle => "Ready".to_string(),
            Status::WaitingForVoices(text) => format!("Waiting for voices to say: {}", text),
            Status::Speaking(text) => format!("Speaking: {}", text),
            Status::Error(msg) => format!("Playback error: {}", msg),
            Status::NothingToSpeak => "Nothing to speak".to_string(),
        }
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self, Status::Speaking(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_) | Status::NothingToSpeak)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Receiver of status transitions
pub trait StatusSink {
    fn update(&mut self, status: &Status);
}

impl<F: FnMut(&Status)> StatusSink for F {
    fn update(&mut self, status: &Status) {
        self(status)
    }
}

/// Single status message shared between the dispatcher and the UI
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    current: Rc<RefCell<Status>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Status {
        self.current.borrow().clone()
    }

    pub fn message(&self) -> String {
        self.current.borrow().message()
    }
}

impl StatusSink for StatusLine {
    fn update(&mut self, status: &Status) {
        *self.current.borrow_mut() = status.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(Status::Idle.message(), "Ready");
        assert_eq!(Status::Speaking("cache".into()).message(), "Speaking: cache");
        assert_eq!(Status::Error("boom".into()).message(), "Playback error: boom");
        assert_eq!(Status::NothingToSpeak.to_string(), "Nothing to speak");
    }

    #[test]
    fn test_status_line_clones_share_state() {
        let line = StatusLine::new();
        let mut writer = line.clone();
        writer.update(&Status::Speaking("API".into()));
        assert_eq!(line.current(), Status::Speaking("API".into()));
        assert!(line.current().is_speaking());
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |s: &Status| seen.push(s.clone());
            sink.update(&Status::NothingToSpeak);
        }
        assert_eq!(seen, vec![Status::NothingToSpeak]);
    }
}
