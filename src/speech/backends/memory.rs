//! In-process synthesizer that produces no audio
//!
//! Records every request and emits lifecycle events on the event channel.
//! Used when no platform speech engine is available, and to drive the
//! dispatcher deterministically from tests through [`MemorySynthHandle`].

use crate::speech::synth::{Synth, SynthEvent, SynthFailure, UtteranceId, UtteranceRequest};
use crate::speech::voice::VoiceDescriptor;
use crate::Result;
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

#[derive(Debug, Default)]
struct MemoryState {
    voices: Vec<VoiceDescriptor>,
    voices_ready: bool,
    submitted: Vec<(UtteranceId, UtteranceRequest)>,
    active: Option<UtteranceId>,
    cancels: usize,
    next_id: u64,
}

/// Silent synthesizer backed by shared in-memory state
pub struct MemorySynth {
    state: Rc<RefCell<MemoryState>>,
    events: Sender<SynthEvent>,
    /// Finish each utterance as soon as it starts
    auto_finish: bool,
}

impl MemorySynth {
    /// Create a synthesizer whose voice list is not ready yet
    pub fn new(events: Sender<SynthEvent>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState::default())),
            events,
            auto_finish: false,
        }
    }

    /// Create a ready synthesizer with no voices that finishes every
    /// utterance immediately
    pub fn silent(events: Sender<SynthEvent>) -> Self {
        let synth = Self {
            auto_finish: true,
            ..Self::new(events)
        };
        synth.state.borrow_mut().voices_ready = true;
        synth
    }

    /// Handle for inspecting and scripting this synthesizer
    pub fn handle(&self) -> MemorySynthHandle {
        MemorySynthHandle {
            state: self.state.clone(),
            events: self.events.clone(),
        }
    }

    fn emit(&self, event: SynthEvent) {
        // The dispatcher may already be gone during shutdown
        let _ = self.events.send(event);
    }
}

impl Synth for MemorySynth {
    fn voices(&mut self) -> Result<Vec<VoiceDescriptor>> {
        Ok(self.state.borrow().voices.clone())
    }

    fn voices_ready(&self) -> bool {
        self.state.borrow().voices_ready
    }

    fn submit(&mut self, request: &UtteranceRequest) -> Result<UtteranceId> {
        let id = {
            let mut state = self.state.borrow_mut();
            state.next_id += 1;
            let id = UtteranceId(state.next_id);
            state.submitted.push((id, request.clone()));
            state.active = if self.auto_finish { None } else { Some(id) };
            id
        };
        debug!("Memory synth speaking {} {:?}", id, request.text);

        self.emit(SynthEvent::Started(id));
        if self.auto_finish {
            self.emit(SynthEvent::Finished(id));
        }
        Ok(id)
    }

    fn cancel(&mut self) -> Result<()> {
        let stopped = {
            let mut state = self.state.borrow_mut();
            state.cancels += 1;
            state.active.take()
        };
        if let Some(id) = stopped {
            self.emit(SynthEvent::Stopped(id));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "silent"
    }
}

/// Shared view of a [`MemorySynth`]
#[derive(Clone)]
pub struct MemorySynthHandle {
    state: Rc<RefCell<MemoryState>>,
    events: Sender<SynthEvent>,
}

impl MemorySynthHandle {
    /// Replace the voice list, mark it ready and announce the change
    pub fn set_voices(&self, voices: Vec<VoiceDescriptor>) {
        {
            let mut state = self.state.borrow_mut();
            state.voices = voices;
            state.voices_ready = true;
        }
        let _ = self.events.send(SynthEvent::VoicesChanged);
    }

    /// Every request submitted so far, oldest first
    pub fn submitted(&self) -> Vec<(UtteranceId, UtteranceRequest)> {
        self.state.borrow().submitted.clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.state.borrow().cancels
    }

    pub fn active(&self) -> Option<UtteranceId> {
        self.state.borrow().active
    }

    /// End the active utterance normally
    pub fn finish_active(&self) {
        if let Some(id) = self.state.borrow_mut().active.take() {
            let _ = self.events.send(SynthEvent::Finished(id));
        }
    }

    /// Fail the active utterance
    pub fn fail_active(&self, failure: SynthFailure) {
        if let Some(id) = self.state.borrow_mut().active.take() {
            let _ = self.events.send(SynthEvent::Failed(id, failure));
        }
    }
}
