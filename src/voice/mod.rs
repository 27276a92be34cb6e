//! Voice output sinks.
//!
//! The coach hands finished lines to a [`VoiceSink`] and never waits for
//! audible completion.  Actual speech synthesis lives outside this crate;
//! the sinks here cover the text stand-ins and the mute/enable adapter.
//!
//! * [`ConsoleVoice`]: prints lines to stdout.
//! * [`NullVoice`]: discards everything.
//! * [`GatedVoice`]: owns the mute / enabled switches around any sink.

pub mod console;
pub mod gated;

use std::sync::Arc;

use crate::config::{CoachStyle, VoiceProviderKind};

pub use console::{ConsoleVoice, NullVoice};
pub use gated::GatedVoice;

// ---------------------------------------------------------------------------
// VoiceSink trait
// ---------------------------------------------------------------------------

/// Destination for spoken coaching lines.
///
/// Methods take `&self`; implementors use interior mutability so a sink can
/// be shared as `Arc<dyn VoiceSink>` between the coach and an outer UI.
pub trait VoiceSink: Send + Sync {
    /// Queue or speak `text`.  Fire-and-forget.
    fn speak(&self, text: &str);

    /// Cancel any in-flight utterance.
    fn stop(&self);

    fn set_style(&self, style: CoachStyle);

    fn set_muted(&self, muted: bool);

    fn set_enabled(&self, enabled: bool);
}

/// Build the sink selected in [`CoachSettings`](crate::config::CoachSettings),
/// wrapped in a [`GatedVoice`].
pub fn from_kind(kind: VoiceProviderKind) -> Arc<dyn VoiceSink> {
    match kind {
        VoiceProviderKind::Console => Arc::new(GatedVoice::new(ConsoleVoice::new())),
        VoiceProviderKind::Silent => Arc::new(GatedVoice::new(NullVoice)),
    }
}

// ---------------------------------------------------------------------------
// MockVoice  (test-only)
// ---------------------------------------------------------------------------

/// Everything a [`MockVoice`] was asked to do, in order.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceCall {
    Speak(String),
    Stop,
    Style(CoachStyle),
    Muted(bool),
    Enabled(bool),
}

/// A test double that records calls instead of speaking.
#[cfg(test)]
#[derive(Default)]
pub struct MockVoice {
    calls: std::sync::Mutex<Vec<VoiceCall>>,
}

#[cfg(test)]
impl MockVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<VoiceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the spoken lines.
    pub fn spoken(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VoiceCall::Speak(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: VoiceCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[cfg(test)]
impl VoiceSink for MockVoice {
    fn speak(&self, text: &str) {
        self.record(VoiceCall::Speak(text.to_string()));
    }

    fn stop(&self) {
        self.record(VoiceCall::Stop);
    }

    fn set_style(&self, style: CoachStyle) {
        self.record(VoiceCall::Style(style));
    }

    fn set_muted(&self, muted: bool) {
        self.record(VoiceCall::Muted(muted));
    }

    fn set_enabled(&self, enabled: bool) {
        self.record(VoiceCall::Enabled(enabled));
    }
}
