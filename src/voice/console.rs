//! Text stand-ins for a speech engine.

use std::io::Write;
use std::sync::Mutex;

use crate::config::CoachStyle;

use super::VoiceSink;

/// Prints each line to stdout as `[style] line`.
pub struct ConsoleVoice {
    style: Mutex<CoachStyle>,
}

impl ConsoleVoice {
    pub fn new() -> Self {
        Self {
            style: Mutex::new(CoachStyle::default()),
        }
    }

    /// Style label the next line will be printed with.
    pub fn style(&self) -> CoachStyle {
        *self.style.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn format_line(&self, text: &str) -> String {
        format!("[{}] {}", self.style().label(), text)
    }
}

impl Default for ConsoleVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSink for ConsoleVoice {
    fn speak(&self, text: &str) {
        let line = self.format_line(text);
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}") {
            log::warn!("console voice: write failed: {e}");
        }
    }

    fn stop(&self) {
        log::debug!("console voice: stop");
    }

    fn set_style(&self, style: CoachStyle) {
        *self.style.lock().unwrap_or_else(|e| e.into_inner()) = style;
    }

    // Mute / enable are handled by `GatedVoice`.
    fn set_muted(&self, _muted: bool) {}

    fn set_enabled(&self, _enabled: bool) {}
}

/// Discards every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVoice;

impl VoiceSink for NullVoice {
    fn speak(&self, text: &str) {
        log::debug!("null voice: dropped {:?}", text);
    }

    fn stop(&self) {}

    fn set_style(&self, _style: CoachStyle) {}

    fn set_muted(&self, _muted: bool) {}

    fn set_enabled(&self, _enabled: bool) {}
}
