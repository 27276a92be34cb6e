//! Mute / enable adapter around a [`VoiceSink`].
//!
//! The orchestrator only calls `speak`, `stop` and `set_style`; the two
//! switches belong to whoever owns the adapter (settings screen, headphone
//! unplug handler, …).

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::CoachStyle;

use super::VoiceSink;

/// Drops `speak` calls while muted or disabled.
///
/// Disabling also stops the inner sink so a half-spoken line is cut off.
pub struct GatedVoice<S: VoiceSink> {
    inner: S,
    muted: AtomicBool,
    enabled: AtomicBool,
}

impl<S: VoiceSink> GatedVoice<S> {
    /// Starts unmuted and enabled.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            muted: AtomicBool::new(false),
            enabled: AtomicBool::new(true),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

impl<S: VoiceSink> VoiceSink for GatedVoice<S> {
    fn speak(&self, text: &str) {
        if !self.is_enabled() || self.is_muted() {
            log::debug!("voice gated (muted or disabled), skipping line");
            return;
        }
        self.inner.speak(text);
    }

    fn stop(&self) {
        self.inner.stop();
    }

    fn set_style(&self, style: CoachStyle) {
        self.inner.set_style(style);
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    fn set_enabled(&self, enabled: bool) {
        let was_enabled = self.enabled.swap(enabled, Ordering::Relaxed);
        if was_enabled && !enabled {
            self.inner.stop();
        }
    }
}
