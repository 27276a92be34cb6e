//! Command loop that owns a [`CoachOrchestrator`].
//!
//! The orchestrator processes one tick at a time.  [`CoachRunner`] gives it
//! a home on a tokio task: producers (the workout clock, a chat prompt, a
//! settings screen) send [`CoachCommand`]s over an mpsc channel and the
//! runner applies them strictly in order, mirroring results into a
//! [`SharedStatus`].
//!
//! ```text
//! CoachCommand (mpsc)
//!        │
//!        ▼
//! CoachRunner::run()  ← async tokio task
//!        │
//!        ├─ Tick           → handle_session_state → status
//!        ├─ ManualLine     → request_manual_line  → status
//!        ├─ Chat           → send_message         → reply channel + status
//!        ├─ UpdateSettings / UpdateVoice
//!        └─ ResetSession / Stop
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::config::CoachSettings;
use crate::session::{RecentPerformance, SessionState, UserContext};
use crate::voice::VoiceSink;

use super::orchestrator::CoachOrchestrator;
use super::status::{lock_status, SharedStatus};

// ---------------------------------------------------------------------------
// CoachCommand
// ---------------------------------------------------------------------------

/// Messages accepted by [`CoachRunner::run`].
pub enum CoachCommand {
    /// One session tick.
    Tick {
        state: SessionState,
        user: UserContext,
        performance: Option<RecentPerformance>,
    },

    /// Speak a line now, outside trigger resolution.
    ManualLine { user: UserContext },

    /// Free-form chat.  The reply is also sent on `reply` when present.
    Chat {
        text: String,
        user: UserContext,
        reply: Option<oneshot::Sender<String>>,
    },

    UpdateSettings(CoachSettings),

    UpdateVoice(Arc<dyn VoiceSink>),

    /// Clear session memory and the status counters.
    ResetSession,

    /// Silence the voice sink.
    Stop,
}

// ---------------------------------------------------------------------------
// CoachRunner
// ---------------------------------------------------------------------------

pub struct CoachRunner {
    coach: CoachOrchestrator,
    status: SharedStatus,
}

impl CoachRunner {
    pub fn new(coach: CoachOrchestrator, status: SharedStatus) -> Self {
        Self { coach, status }
    }

    /// Process commands until every sender is dropped.  Returns the
    /// orchestrator so the caller can inspect it afterwards.
    pub async fn run(mut self, mut rx: mpsc::Receiver<CoachCommand>) -> CoachOrchestrator {
        while let Some(command) = rx.recv().await {
            self.handle(command).await;
        }

        log::info!("coach: command channel closed, runner shutting down");
        self.coach
    }

    async fn handle(&mut self, command: CoachCommand) {
        match command {
            CoachCommand::Tick {
                state,
                user,
                performance,
            } => {
                let outcome = self
                    .coach
                    .handle_session_state(&state, &user, performance.as_ref())
                    .await;
                let mut st = lock_status(&self.status);
                st.ticks += 1;
                if outcome.trigger.is_some() {
                    st.last_trigger = outcome.trigger;
                }
                if let Some(line) = &outcome.line {
                    st.record_line(line);
                }
                st.ai_lines_generated = self.coach.ai_lines_generated();
            }
            CoachCommand::ManualLine { user } => {
                let line = self.coach.request_manual_line(&user).await;
                let mut st = lock_status(&self.status);
                if let Some(line) = &line {
                    st.record_line(line);
                }
                st.ai_lines_generated = self.coach.ai_lines_generated();
            }
            CoachCommand::Chat { text, user, reply } => {
                let answer = self.coach.send_message(&text, &user).await;
                lock_status(&self.status).last_reply = Some(answer.clone());
                if let Some(tx) = reply {
                    if tx.send(answer).is_err() {
                        log::debug!("coach: chat reply receiver dropped");
                    }
                }
            }
            CoachCommand::UpdateSettings(settings) => {
                self.coach.update_settings(settings);
            }
            CoachCommand::UpdateVoice(voice) => {
                self.coach.update_voice_provider(voice);
            }
            CoachCommand::ResetSession => {
                self.coach.reset_session();
                lock_status(&self.status).reset();
            }
            CoachCommand::Stop => {
                log::debug!("coach: stop requested");
                self.coach.stop();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
