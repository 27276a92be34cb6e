//! Per-session line memory: the prewarmed AI cache, AI call accounting and
//! the recent-lines ring used for anti-repeat.

use std::collections::VecDeque;

use super::sanitizer::is_repeat;

/// Lines kept for anti-repeat.
pub const RECENT_LINES: usize = 5;
/// Prewarmed AI lines kept per session.
pub const AI_CACHE_SIZE: usize = 3;
/// Hard cap on AI calls per session.
pub const AI_CALL_CAP: u32 = 6;
/// Minimum spacing between live (uncached) AI calls, in session seconds.
pub const AI_LIVE_SPACING_SECS: u64 = 120;

/// Line memory for one session.
#[derive(Debug, Default)]
pub struct LineMemory {
    ai_cache: Vec<String>,
    cache_index: usize,
    recent: VecDeque<String>,
    ai_lines_generated: u32,
    last_ai_request_at: Option<u64>,
}

impl LineMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // -----------------------------------------------------------------------
    // AI accounting
    // -----------------------------------------------------------------------

    pub fn ai_lines_generated(&self) -> u32 {
        self.ai_lines_generated
    }

    pub fn under_call_cap(&self) -> bool {
        self.ai_lines_generated < AI_CALL_CAP
    }

    /// `true` while the cache wants more lines and the cap allows a call.
    pub fn wants_prewarm(&self) -> bool {
        self.ai_cache.len() < AI_CACHE_SIZE && self.under_call_cap()
    }

    /// `true` when a live call is allowed at session second `elapsed`.
    pub fn can_request_live(&self, elapsed: u64) -> bool {
        self.under_call_cap()
            && self
                .last_ai_request_at
                .map_or(true, |last| elapsed.saturating_sub(last) >= AI_LIVE_SPACING_SECS)
    }

    /// Count one AI call; `at` is the session second for live calls.
    pub fn record_ai_call(&mut self, at: Option<u64>) {
        self.ai_lines_generated += 1;
        if at.is_some() {
            self.last_ai_request_at = at;
        }
    }

    // -----------------------------------------------------------------------
    // Cache
    // -----------------------------------------------------------------------

    /// Add a line unless the cache is full or already holds it (ignoring case).
    pub fn cache_line(&mut self, line: String) -> bool {
        if self.ai_cache.len() >= AI_CACHE_SIZE
            || self
                .ai_cache
                .iter()
                .any(|cached| cached.to_lowercase() == line.to_lowercase())
        {
            return false;
        }
        self.ai_cache.push(line);
        true
    }

    /// Next cached line, cycling round-robin.  `None` when empty.
    pub fn next_cached(&mut self) -> Option<String> {
        if self.ai_cache.is_empty() {
            return None;
        }
        let line = self.ai_cache[self.cache_index % self.ai_cache.len()].clone();
        self.cache_index = self.cache_index.wrapping_add(1);
        Some(line)
    }

    pub fn cache_len(&self) -> usize {
        self.ai_cache.len()
    }

    // -----------------------------------------------------------------------
    // Recent lines
    // -----------------------------------------------------------------------

    /// Push a spoken line, dropping the oldest beyond [`RECENT_LINES`].
    pub fn remember(&mut self, line: String) {
        self.recent.push_back(line);
        while self.recent.len() > RECENT_LINES {
            self.recent.pop_front();
        }
    }

    pub fn is_recent(&self, line: &str) -> bool {
        is_repeat(line, &self.recent)
    }

    /// Recent lines, oldest first.
    pub fn recent_lines(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
