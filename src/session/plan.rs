//! Workout timeline used as a tick source.
//!
//! [`WorkoutPlan`] lays out the session as consecutive [`Segment`]s:
//!
//! ```text
//! warmup (round 0) → main 1 → rest 1 → main 2 → … → main N → finisher (round N)
//! ```
//!
//! and answers "what does the timer read at second `t`?" with a
//! [`SessionState`] whose `elapsed`/`remaining` cover the whole session.

use crate::config::SessionConfig;

use super::state::{SessionPhase, SessionState, SessionType};

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One contiguous stretch of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub phase: SessionPhase,
    pub round: u32,
    pub secs: u64,
}

// ---------------------------------------------------------------------------
// WorkoutPlan
// ---------------------------------------------------------------------------

/// Ordered list of segments for one session.
///
/// # Example
/// ```rust
/// use workout_coach::config::SessionConfig;
/// use workout_coach::session::{SessionPhase, WorkoutPlan};
///
/// let plan = WorkoutPlan::from_config(&SessionConfig::default());
/// let first = plan.state_at(0);
/// assert_eq!(first.phase, SessionPhase::Warmup);
/// assert_eq!(plan.state_at(plan.total_secs()).remaining_secs, 0);
/// ```
#[derive(Debug, Clone)]
pub struct WorkoutPlan {
    session_type: SessionType,
    segments: Vec<Segment>,
}

impl WorkoutPlan {
    /// Build from explicit segments.  Zero-length segments are dropped.
    pub fn new(session_type: SessionType, segments: Vec<Segment>) -> Self {
        Self {
            session_type,
            segments: segments.into_iter().filter(|s| s.secs > 0).collect(),
        }
    }

    /// Build the standard warmup / rounds / finisher layout.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut segments = Vec::with_capacity(config.rounds as usize * 2 + 2);

        segments.push(Segment {
            phase: SessionPhase::Warmup,
            round: 0,
            secs: config.warmup_secs,
        });

        for round in 1..=config.rounds {
            segments.push(Segment {
                phase: SessionPhase::Main,
                round,
                secs: config.round_secs,
            });
            if round < config.rounds {
                segments.push(Segment {
                    phase: SessionPhase::Rest,
                    round,
                    secs: config.rest_secs,
                });
            }
        }

        segments.push(Segment {
            phase: SessionPhase::Finisher,
            round: config.rounds,
            secs: config.finisher_secs,
        });

        Self::new(config.session_type, segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total session length in seconds.
    pub fn total_secs(&self) -> u64 {
        self.segments.iter().map(|s| s.secs).sum()
    }

    /// Timer reading at `elapsed` seconds.
    ///
    /// Past the end of the plan the last segment is reported with
    /// `remaining_secs == 0`.  An empty plan reports a finished main phase.
    pub fn state_at(&self, elapsed: u64) -> SessionState {
        let total = self.total_secs();
        let remaining = total.saturating_sub(elapsed);

        let mut start = 0;
        for segment in &self.segments {
            if elapsed < start + segment.secs {
                return SessionState::new(
                    self.session_type,
                    segment.phase,
                    elapsed,
                    remaining,
                    segment.round,
                );
            }
            start += segment.secs;
        }

        let (phase, round) = self
            .segments
            .last()
            .map(|s| (s.phase, s.round))
            .unwrap_or((SessionPhase::Main, 0));

        SessionState::new(self.session_type, phase, elapsed, 0, round)
    }

    /// One state per second, from `0` through completion inclusive.
    pub fn states(&self) -> impl Iterator<Item = SessionState> + '_ {
        (0..=self.total_secs()).map(move |t| self.state_at(t))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
