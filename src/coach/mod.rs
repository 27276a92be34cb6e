//! The workout coach: decides when to speak and what to say.
//!
//! # Architecture
//!
//! ```text
//! SessionState (one per tick)
//!        │
//!        ▼
//! CoachOrchestrator::handle_session_state()
//!        │
//!        ├─ TriggerResolver     → Option<Trigger>
//!        ├─ timing gate         (8 s / frequency interval)
//!        ├─ context_summary     → "type=… phase=… trigger=…"
//!        ├─ LineProvider (AI)   → prewarmed cache / live call
//!        ├─ LineProvider (offline fallback)
//!        ├─ sanitizer           → ≤12 words, anti-repeat
//!        └─ VoiceSink::speak
//!
//! CoachRunner::run() owns the orchestrator on a tokio task and
//! mirrors results into SharedStatus (Arc<Mutex<CoachStatus>>).
//! ```
//!
//! | Module          | Responsibility                                  |
//! |-----------------|-------------------------------------------------|
//! | `trigger`       | Trigger rules and their per-session memory      |
//! | `memory`        | AI cache, AI call cap, recent-lines ring        |
//! | `summary`       | Context string handed to providers              |
//! | `sanitizer`     | Word limit, denylist, repeat detection          |
//! | `orchestrator`  | Tick handling, line construction, chat          |
//! | `runner`        | Command channel around the orchestrator         |
//! | `status`        | Shared snapshot for front ends                  |

pub mod memory;
pub mod orchestrator;
pub mod runner;
pub mod sanitizer;
pub mod status;
pub mod summary;
pub mod trigger;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use memory::LineMemory;
pub use orchestrator::{CoachOrchestrator, TickOutcome, MIN_GAP_SECS};
pub use runner::{CoachCommand, CoachRunner};
pub use status::{lock_status, new_shared_status, CoachStatus, SharedStatus};
pub use summary::{context_summary, user_summary};
pub use trigger::{Trigger, TriggerResolver};
