//! Shared coach status.
//!
//! [`CoachStatus`] is a snapshot of what the coach last did, written by the
//! [`CoachRunner`](super::CoachRunner) after each command and read by whatever
//! front end is attached (the CLI prints it at the end of a session).
//!
//! [`SharedStatus`] is `Arc<Mutex<CoachStatus>>`.  Keep lock scopes short and
//! never hold one across `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use super::trigger::Trigger;

// ---------------------------------------------------------------------------
// CoachStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoachStatus {
    /// Trigger resolved on the most recent tick that resolved one.
    pub last_trigger: Option<Trigger>,

    /// Most recent line handed to the voice sink (tick or manual).
    pub last_line: Option<String>,

    /// Most recent chat reply.
    pub last_reply: Option<String>,

    /// Lines spoken this session.
    pub lines_spoken: u32,

    /// AI calls made this session, mirrored from the orchestrator.
    pub ai_lines_generated: u32,

    /// Ticks processed this session.
    pub ticks: u64,
}

impl CoachStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-session counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a line that was spoken.
    pub fn record_line(&mut self, line: &str) {
        self.last_line = Some(line.to_string());
        self.lines_spoken += 1;
    }
}

// ---------------------------------------------------------------------------
// SharedStatus
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`CoachStatus`].
pub type SharedStatus = Arc<Mutex<CoachStatus>>;

pub fn new_shared_status() -> SharedStatus {
    Arc::new(Mutex::new(CoachStatus::new()))
}

/// Lock the status, recovering the data if a previous holder panicked.
pub fn lock_status(status: &SharedStatus) -> MutexGuard<'_, CoachStatus> {
    status.lock().unwrap_or_else(|e| e.into_inner())
}
