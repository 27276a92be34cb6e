//! Session snapshot types.
//!
//! A [`SessionState`] is produced by the external session timer once per
//! tick (typically 1 Hz).  The coach never owns or mutates it.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionType / SessionPhase
// ---------------------------------------------------------------------------

/// Kind of session being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Quick,
    Workout,
    Sport,
}

impl SessionType {
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Quick => "quick",
            SessionType::Workout => "workout",
            SessionType::Sport => "sport",
        }
    }
}

/// Segment of the session the timer is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    Warmup,
    Main,
    Finisher,
    Rest,
}

impl SessionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Warmup => "warmup",
            SessionPhase::Main => "main",
            SessionPhase::Finisher => "finisher",
            SessionPhase::Rest => "rest",
        }
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, SessionPhase::Rest)
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// One sample of the running session timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub session_type: SessionType,
    pub phase: SessionPhase,
    pub elapsed_secs: u64,
    /// `0` once the session has completed.
    pub remaining_secs: u64,
    /// Non-decreasing within a well-behaved session.
    pub round: u32,
    pub paused: bool,
}

impl SessionState {
    /// Convenience constructor for an unpaused state.
    pub fn new(
        session_type: SessionType,
        phase: SessionPhase,
        elapsed_secs: u64,
        remaining_secs: u64,
        round: u32,
    ) -> Self {
        Self {
            session_type,
            phase,
            elapsed_secs,
            remaining_secs,
            round,
            paused: false,
        }
    }

    /// Same state with the paused flag set.
    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Optional user details supplied fresh on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContext {
    pub goal: Option<String>,
    pub streak_days: Option<u32>,
    pub steps_today: Option<u32>,
    pub last_workout_date: Option<String>,
}

/// Optional live performance readings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentPerformance {
    pub heart_rate: Option<u32>,
    pub reps: Option<u32>,
    pub effort: Option<String>,
}

impl From<&crate::config::ProfileConfig> for UserContext {
    fn from(profile: &crate::config::ProfileConfig) -> Self {
        Self {
            goal: profile.goal.clone(),
            streak_days: profile.streak_days,
            steps_today: profile.steps_today,
            last_workout_date: profile.last_workout_date.clone(),
        }
    }
}
