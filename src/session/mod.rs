//! Session snapshots fed to the coach, and a simple tick source.
//!
//! * [`SessionState`]: one immutable sample of the running workout timer.
//! * [`UserContext`] / [`RecentPerformance`]: optional per-call enrichment.
//! * [`WorkoutPlan`]: builds a warmup → rounds → finisher timeline and
//!   produces one `SessionState` per elapsed second.

pub mod plan;
pub mod state;

pub use plan::{Segment, WorkoutPlan};
pub use state::{RecentPerformance, SessionPhase, SessionState, SessionType, UserContext};
