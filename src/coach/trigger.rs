//! Trigger resolution: decides *why* the coach might speak on a tick.
//!
//! [`TriggerResolver::resolve`] maps one [`SessionState`] to at most one
//! [`Trigger`].  Rules are evaluated in priority order and the first match
//! wins:
//!
//! | # | Trigger       | Fires when                                                   |
//! |---|---------------|--------------------------------------------------------------|
//! | 1 | SessionStart  | not yet started and `elapsed <= 1`                            |
//! | 2 | RoundStart    | round differs from the last observed round                    |
//! | 3 | RestStart     | phase became Rest                                             |
//! | 4 | RestEnd       | phase left Rest                                               |
//! | 5 | Midway        | `0 < remaining <= elapsed`, once per (phase, round)           |
//! | 6 | FinalMinute   | `1 <= remaining <= 60`, once per (phase, round)               |
//! | 7 | Completion    | `remaining == 0` and `elapsed > 0`, once per session          |
//! | 8 | Frequency     | Main phase, a full interval since the last frequency line     |
//!
//! The resolver keeps the small memory these rules need.  Last phase and
//! round are recorded by [`observe`](TriggerResolver::observe), which the
//! orchestrator calls at the end of every tick, paused or not.

use std::collections::HashSet;
use std::fmt;

use crate::session::{SessionPhase, SessionState};

/// Remaining-seconds window for [`Trigger::FinalMinute`].
const FINAL_MINUTE_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Trigger
// ---------------------------------------------------------------------------

/// Symbolic reason to consider speaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    SessionStart,
    RoundStart,
    Midway,
    FinalMinute,
    RestStart,
    RestEnd,
    Completion,
    Frequency,
}

impl Trigger {
    /// Stable upper-snake name, used in the context summary.
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::SessionStart => "SESSION_START",
            Trigger::RoundStart => "ROUND_START",
            Trigger::Midway => "MIDWAY",
            Trigger::FinalMinute => "FINAL_MINUTE",
            Trigger::RestStart => "REST_START",
            Trigger::RestEnd => "REST_END",
            Trigger::Completion => "COMPLETION",
            Trigger::Frequency => "FREQUENCY",
        }
    }

    /// Session start and completion are always allowed through the gap check.
    pub fn bypasses_gap(&self) -> bool {
        matches!(self, Trigger::SessionStart | Trigger::Completion)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// TriggerResolver
// ---------------------------------------------------------------------------

/// Per-session trigger memory.
#[derive(Debug, Default)]
pub struct TriggerResolver {
    last_phase: Option<SessionPhase>,
    last_round: Option<u32>,
    session_started: bool,
    has_completed: bool,
    midway_keys: HashSet<(SessionPhase, u32)>,
    final_minute_keys: HashSet<(SessionPhase, u32)>,
    last_frequency_at: u64,
}

impl TriggerResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything; the next tick is treated as a fresh session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Resolve the trigger for this tick, if any.
    ///
    /// `frequency_secs` is the configured interval for
    /// [`Trigger::Frequency`].  Resolution mutates memory: it may record a
    /// new round, a midway / final-minute key, or flip the start /
    /// completion flags.
    pub fn resolve(&mut self, state: &SessionState, frequency_secs: u64) -> Option<Trigger> {
        let key = (state.phase, state.round);

        if !self.session_started && state.elapsed_secs <= 1 {
            self.session_started = true;
            return Some(Trigger::SessionStart);
        }

        // Any change fires, including a decrease.
        if let Some(prev) = self.last_round {
            if prev != state.round {
                self.last_round = Some(state.round);
                return Some(Trigger::RoundStart);
            }
        }

        if let Some(prev) = self.last_phase {
            if !prev.is_rest() && state.phase.is_rest() {
                return Some(Trigger::RestStart);
            }
            if prev.is_rest() && !state.phase.is_rest() {
                return Some(Trigger::RestEnd);
            }
        }

        if state.remaining_secs > 0
            && state.remaining_secs <= state.elapsed_secs
            && self.midway_keys.insert(key)
        {
            return Some(Trigger::Midway);
        }

        if (1..=FINAL_MINUTE_SECS).contains(&state.remaining_secs)
            && self.final_minute_keys.insert(key)
        {
            return Some(Trigger::FinalMinute);
        }

        if !self.has_completed && state.remaining_secs == 0 && state.elapsed_secs > 0 {
            self.has_completed = true;
            return Some(Trigger::Completion);
        }

        if state.phase == SessionPhase::Main
            && frequency_secs > 0
            && state.elapsed_secs >= frequency_secs
            && state.elapsed_secs.saturating_sub(self.last_frequency_at) >= frequency_secs
        {
            return Some(Trigger::Frequency);
        }

        None
    }

    /// Record the phase and round seen on this tick.
    pub fn observe(&mut self, state: &SessionState) {
        self.last_phase = Some(state.phase);
        self.last_round = Some(state.round);
    }

    /// Record that a frequency-driven line was actually spoken.
    pub fn mark_frequency_spoken(&mut self, elapsed_secs: u64) {
        self.last_frequency_at = elapsed_secs;
    }

    pub fn session_started(&self) -> bool {
        self.session_started
    }

    pub fn has_completed(&self) -> bool {
        self.has_completed
    }

    pub fn last_phase(&self) -> Option<SessionPhase> {
        self.last_phase
    }

    pub fn last_round(&self) -> Option<u32> {
        self.last_round
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
