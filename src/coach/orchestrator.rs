//! Coach orchestrator: turns session ticks into spoken lines.
//!
//! [`CoachOrchestrator`] owns the coaching policy, the per-session memory
//! and handles to the providers and voice sink.  It is driven by a single
//! caller (one workout loop), one tick at a time.
//!
//! # Tick flow
//!
//! ```text
//! handle_session_state(state)
//!   ├─ hybrid off / paused → record phase+round, stay quiet
//!   ├─ TriggerResolver::resolve → None → record phase+round, stay quiet
//!   ├─ gap check (8 s, or the frequency interval for FREQUENCY;
//!   │             SESSION_START / COMPLETION always pass)
//!   ├─ build_coach_line
//!   │     ├─ AI voice mode: prewarm cache (≤3 lines, ≤6 calls/session)
//!   │     │                 → cached line (round-robin) or live call (≥120 s apart)
//!   │     ├─ blank → offline phrase
//!   │     ├─ sanitize (12 words)
//!   │     └─ recent repeat → one offline retry
//!   ├─ voice.speak(line)
//!   └─ record phase+round
//! ```

use std::sync::Arc;

use crate::config::{CoachSettings, CoachStyle};
use crate::llm::LineProvider;
use crate::session::{RecentPerformance, SessionState, UserContext};
use crate::voice::VoiceSink;

use super::memory::LineMemory;
use super::sanitizer::{is_banned, sanitize};
use super::summary::{context_summary, user_summary};
use super::trigger::{Trigger, TriggerResolver};

/// Minimum seconds between utterances for every trigger except FREQUENCY.
pub const MIN_GAP_SECS: u64 = 8;

// ---------------------------------------------------------------------------
// TickOutcome
// ---------------------------------------------------------------------------

/// What a single tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Trigger resolved on this tick, whether or not anything was spoken.
    pub trigger: Option<Trigger>,
    /// Line handed to the voice sink.
    pub line: Option<String>,
}

impl TickOutcome {
    pub fn spoke(&self) -> bool {
        self.line.is_some()
    }
}

// ---------------------------------------------------------------------------
// CoachOrchestrator
// ---------------------------------------------------------------------------

/// Drives trigger resolution, line construction and the voice sink.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use workout_coach::coach::CoachOrchestrator;
/// use workout_coach::config::{AppConfig, VoiceProviderKind};
/// use workout_coach::llm::{ApiLineProvider, FallbackLineProvider, OfflineLineProvider};
/// use workout_coach::session::{SessionPhase, SessionState, SessionType, UserContext};
/// use workout_coach::voice;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let offline = Arc::new(OfflineLineProvider::new());
/// let ai = Arc::new(FallbackLineProvider::new(
///     ApiLineProvider::from_config(&config.llm),
///     Arc::clone(&offline),
/// ));
///
/// let mut coach = CoachOrchestrator::new(
///     config.coach.clone(),
///     ai,
///     offline,
///     voice::from_kind(VoiceProviderKind::Console),
/// );
///
/// coach.reset_session();
/// let state = SessionState::new(SessionType::Workout, SessionPhase::Main, 0, 600, 1);
/// coach.handle_session_state(&state, &UserContext::default(), None).await;
/// # }
/// ```
pub struct CoachOrchestrator {
    settings: CoachSettings,
    ai: Arc<dyn LineProvider>,
    offline: Arc<dyn LineProvider>,
    voice: Arc<dyn VoiceSink>,
    resolver: TriggerResolver,
    memory: LineMemory,
    last_spoken_at: Option<u64>,
    /// Session second of the most recent tick; manual lines are stamped with it.
    last_tick_at: Option<u64>,
}

impl CoachOrchestrator {
    /// Create an orchestrator with empty session memory.
    ///
    /// * `ai`: provider used in AI modes; expected never to fail
    ///   (e.g. a `FallbackLineProvider`).  Its lines are screened against
    ///   the denylist here as well.
    /// * `offline`: deterministic provider used for fallbacks.
    /// * `voice`: output sink; receives the current style immediately.
    pub fn new(
        settings: CoachSettings,
        ai: Arc<dyn LineProvider>,
        offline: Arc<dyn LineProvider>,
        voice: Arc<dyn VoiceSink>,
    ) -> Self {
        voice.set_style(settings.style);
        Self {
            settings,
            ai,
            offline,
            voice,
            resolver: TriggerResolver::new(),
            memory: LineMemory::new(),
            last_spoken_at: None,
            last_tick_at: None,
        }
    }

    // -----------------------------------------------------------------------
    // Policy and wiring
    // -----------------------------------------------------------------------

    /// Replace the coaching policy.  The voice sink hears about a style
    /// change immediately.
    pub fn update_settings(&mut self, settings: CoachSettings) {
        if settings.style != self.settings.style {
            self.voice.set_style(settings.style);
        }
        log::debug!("coach: settings updated: {:?}", settings);
        self.settings = settings;
    }

    /// Swap the output sink and reapply the current style to it.
    pub fn update_voice_provider(&mut self, voice: Arc<dyn VoiceSink>) {
        voice.set_style(self.settings.style);
        self.voice = voice;
    }

    /// Clear all session memory.  Call before every new session.
    pub fn reset_session(&mut self) {
        self.resolver.reset();
        self.memory.reset();
        self.last_spoken_at = None;
        self.last_tick_at = None;
        log::info!("coach: session memory reset");
    }

    /// Silence the voice sink.  Session memory is kept.
    pub fn stop(&self) {
        self.voice.stop();
    }

    pub fn settings(&self) -> &CoachSettings {
        &self.settings
    }

    pub fn ai_lines_generated(&self) -> u32 {
        self.memory.ai_lines_generated()
    }

    /// Lines spoken recently, oldest first.
    pub fn recent_lines(&self) -> Vec<String> {
        self.memory.recent_lines()
    }

    // -----------------------------------------------------------------------
    // Tick entry point
    // -----------------------------------------------------------------------

    /// Process one session tick.
    pub async fn handle_session_state(
        &mut self,
        state: &SessionState,
        user: &UserContext,
        performance: Option<&RecentPerformance>,
    ) -> TickOutcome {
        self.last_tick_at = Some(state.elapsed_secs);
        if !self.settings.hybrid_enabled || state.paused {
            self.resolver.observe(state);
            return TickOutcome::default();
        }

        let frequency_secs = self.settings.frequency.interval_secs();
        let Some(trigger) = self.resolver.resolve(state, frequency_secs) else {
            self.resolver.observe(state);
            return TickOutcome::default();
        };

        let min_gap = if trigger == Trigger::Frequency {
            frequency_secs
        } else {
            MIN_GAP_SECS
        };
        let gap_ok = trigger.bypasses_gap()
            || self
                .last_spoken_at
                .map_or(true, |last| state.elapsed_secs.saturating_sub(last) >= min_gap);

        let mut spoken = None;
        if gap_ok {
            let line = self
                .build_coach_line(trigger, state, user, performance)
                .await;
            if !line.trim().is_empty() {
                log::info!("coach: [{}] {}", trigger, line);
                self.voice.speak(&line);
                self.last_spoken_at = Some(state.elapsed_secs);
                if trigger == Trigger::Frequency {
                    self.resolver.mark_frequency_spoken(state.elapsed_secs);
                }
                self.memory.remember(line.clone());
                spoken = Some(line);
            }
        } else {
            log::debug!(
                "coach: {} at {}s suppressed, last line at {:?}s",
                trigger,
                state.elapsed_secs,
                self.last_spoken_at
            );
        }

        self.resolver.observe(state);
        TickOutcome {
            trigger: Some(trigger),
            line: spoken,
        }
    }

    // -----------------------------------------------------------------------
    // Line construction
    // -----------------------------------------------------------------------

    /// Build the line for `trigger`.  Returns an empty string when there is
    /// nothing worth saying.
    pub async fn build_coach_line(
        &mut self,
        trigger: Trigger,
        state: &SessionState,
        user: &UserContext,
        performance: Option<&RecentPerformance>,
    ) -> String {
        let summary = context_summary(trigger.name(), state, user, performance);
        let style = self.settings.style;

        let mut raw = String::new();
        if self.settings.ai_voice_enabled() {
            self.prewarm_ai_cache(&summary, style).await;
            raw = self.fetch_ai_line(&summary, style, state.elapsed_secs).await;
        }
        if raw.trim().is_empty() {
            raw = self.offline_line(&summary, style).await;
        }

        let line = sanitize(&raw);
        if line.is_empty() {
            return String::new();
        }

        if self.memory.is_recent(&line) {
            let retry = sanitize(&self.offline_line(&summary, style).await);
            if !retry.is_empty() && !self.memory.is_recent(&retry) {
                return retry;
            }
            log::debug!("coach: repeat retry failed, keeping {:?}", line);
        }

        line
    }

    /// Fill the AI cache up to its size, within the per-session call cap.
    async fn prewarm_ai_cache(&mut self, summary: &str, style: CoachStyle) {
        while self.memory.wants_prewarm() {
            self.memory.record_ai_call(None);
            let line = sanitize(&self.ai_line(summary, style).await);
            if !line.is_empty() {
                self.memory.cache_line(line);
            }
        }
    }

    /// Cached line if any, else a live call when spacing and cap allow.
    async fn fetch_ai_line(&mut self, summary: &str, style: CoachStyle, elapsed: u64) -> String {
        if let Some(cached) = self.memory.next_cached() {
            return cached;
        }
        if self.memory.can_request_live(elapsed) {
            self.memory.record_ai_call(Some(elapsed));
            return self.ai_line(summary, style).await;
        }
        String::new()
    }

    async fn ai_line(&self, summary: &str, style: CoachStyle) -> String {
        match self.ai.generate_one_liner(summary, style).await {
            Ok(line) if is_banned(&line) => {
                log::warn!("coach: AI line hit the content filter, discarded");
                String::new()
            }
            Ok(line) => line,
            Err(e) => {
                log::warn!("coach: AI provider failed: {e}");
                String::new()
            }
        }
    }

    async fn offline_line(&self, summary: &str, style: CoachStyle) -> String {
        self.offline
            .generate_one_liner(summary, style)
            .await
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Out-of-band requests
    // -----------------------------------------------------------------------

    /// User asked for a line right now.  Skips trigger resolution and the
    /// timing gate.  Returns the spoken line, if any; always `None` with
    /// hybrid coaching off.
    ///
    /// The line counts as spoken at the most recent tick's second, so tick
    /// triggers right after it are held back by the usual gap.
    pub async fn request_manual_line(&mut self, user: &UserContext) -> Option<String> {
        if !self.settings.hybrid_enabled {
            log::debug!("coach: manual line ignored, hybrid coaching is off");
            return None;
        }

        let summary = user_summary("MANUAL", user);
        let style = self.settings.style;

        let mut raw = String::new();
        if self.settings.ai_voice_enabled() && self.memory.under_call_cap() {
            self.memory.record_ai_call(None);
            raw = self.ai_line(&summary, style).await;
        }
        if raw.trim().is_empty() {
            raw = self.offline_line(&summary, style).await;
        }

        let line = sanitize(&raw);
        if line.is_empty() {
            return None;
        }

        log::info!("coach: [MANUAL] {}", line);
        self.voice.speak(&line);
        if self.last_tick_at.is_some() {
            self.last_spoken_at = self.last_tick_at;
        }
        self.memory.remember(line.clone());
        Some(line)
    }

    /// Free-form chat.  Voiced only when `speak_replies` is set and hybrid
    /// coaching is on; the reply text is returned either way.
    pub async fn send_message(&mut self, user_text: &str, user: &UserContext) -> String {
        let summary = user_summary("CHAT", user);

        let mut reply = String::new();
        if self.settings.ai_chat_enabled() {
            reply = match self.ai.send_message(user_text, &summary).await {
                Ok(text) if is_banned(&text) => {
                    log::warn!("coach: AI reply hit the content filter, discarded");
                    String::new()
                }
                Ok(text) => text,
                Err(e) => {
                    log::warn!("coach: AI chat failed: {e}");
                    String::new()
                }
            };
        }
        if reply.trim().is_empty() {
            reply = self
                .offline
                .send_message(user_text, &summary)
                .await
                .unwrap_or_default();
        }

        let reply = reply.trim().to_string();
        if self.settings.hybrid_enabled && self.settings.speak_replies && !reply.is_empty() {
            self.voice.speak(&reply);
        }
        reply
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::{CoachFrequency, IntelligenceMode};
    use crate::llm::{LlmError, OfflineLineProvider};
    use crate::session::{SessionPhase, SessionType};
    use crate::voice::{MockVoice, VoiceCall};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns scripted lines in order (then repeats the last), counting calls.
    struct ScriptedProvider {
        lines: Mutex<Vec<String>>,
        calls: AtomicU32,
    }

    impl ScriptedProvider {
        fn new(lines: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                lines: Mutex::new(lines.iter().map(|s| s.to_string()).collect()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        fn next(&self) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut lines = self.lines.lock().unwrap();
            if lines.len() > 1 {
                lines.remove(0)
            } else {
                lines.first().cloned().unwrap_or_default()
            }
        }
    }

    #[async_trait]
    impl LineProvider for ScriptedProvider {
        async fn generate_one_liner(&self, _c: &str, _s: CoachStyle) -> Result<String, LlmError> {
            Ok(self.next())
        }
        async fn send_message(&self, _t: &str, _c: &str) -> Result<String, LlmError> {
            Ok(self.next())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LineProvider for FailingProvider {
        async fn generate_one_liner(&self, _c: &str, _s: CoachStyle) -> Result<String, LlmError> {
            Err(LlmError::Timeout)
        }
        async fn send_message(&self, _t: &str, _c: &str) -> Result<String, LlmError> {
            Err(LlmError::Timeout)
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn settings() -> CoachSettings {
        CoachSettings {
            hybrid_enabled: true,
            intelligence: IntelligenceMode::Basic,
            frequency: CoachFrequency::Medium,
            ..CoachSettings::default()
        }
    }

    fn ai_settings() -> CoachSettings {
        CoachSettings {
            intelligence: IntelligenceMode::AiVoice,
            ..settings()
        }
    }

    fn coach_with(
        settings: CoachSettings,
        ai: Arc<dyn LineProvider>,
        offline: Arc<dyn LineProvider>,
    ) -> (CoachOrchestrator, Arc<MockVoice>) {
        let voice = Arc::new(MockVoice::new());
        let coach = CoachOrchestrator::new(settings, ai, offline, voice.clone());
        (coach, voice)
    }

    fn basic_coach(settings: CoachSettings) -> (CoachOrchestrator, Arc<MockVoice>) {
        let offline: Arc<dyn LineProvider> = Arc::new(OfflineLineProvider::with_seed(5));
        coach_with(settings, Arc::new(FailingProvider), offline)
    }

    fn main_state(elapsed: u64, remaining: u64, round: u32) -> SessionState {
        SessionState::new(SessionType::Workout, SessionPhase::Main, elapsed, remaining, round)
    }

    fn user() -> UserContext {
        UserContext::default()
    }

    // -----------------------------------------------------------------------
    // Tick handling
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn session_start_then_quiet_tick() {
        let (mut coach, voice) = basic_coach(settings());

        let first = coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;
        assert_eq!(first.trigger, Some(Trigger::SessionStart));
        assert!(first.spoke());

        let second = coach
            .handle_session_state(&main_state(1, 599, 1), &user(), None)
            .await;
        assert_eq!(second, TickOutcome::default());
        assert_eq!(voice.spoken().len(), 1);
    }

    #[tokio::test]
    async fn hybrid_disabled_never_speaks() {
        let mut s = settings();
        s.hybrid_enabled = false;
        let (mut coach, voice) = basic_coach(s);

        for e in 0..=600 {
            coach
                .handle_session_state(&main_state(e, 600 - e, 1 + (e / 200) as u32), &user(), None)
                .await;
        }
        assert!(voice.spoken().is_empty());
    }

    #[tokio::test]
    async fn paused_resolves_nothing_but_tracks_round() {
        let (mut coach, voice) = basic_coach(settings());

        let out = coach
            .handle_session_state(&main_state(0, 600, 1).paused(), &user(), None)
            .await;
        assert_eq!(out, TickOutcome::default());
        assert!(voice.spoken().is_empty());
        assert_eq!(coach.resolver.last_round(), Some(1));

        coach
            .handle_session_state(&main_state(20, 580, 2).paused(), &user(), None)
            .await;
        assert_eq!(coach.resolver.last_round(), Some(2));
        assert!(!coach.resolver.session_started());

        // Resuming on the same round is not a round change.
        let out = coach
            .handle_session_state(&main_state(21, 579, 2), &user(), None)
            .await;
        assert_ne!(out.trigger, Some(Trigger::RoundStart));
    }

    #[tokio::test]
    async fn gap_suppresses_close_triggers() {
        let (mut coach, voice) = basic_coach(settings());
        coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;

        // Round change 5 s after the start line: resolved but not spoken.
        let out = coach
            .handle_session_state(&main_state(5, 595, 2), &user(), None)
            .await;
        assert_eq!(out.trigger, Some(Trigger::RoundStart));
        assert!(!out.spoke());

        let out = coach
            .handle_session_state(&main_state(9, 591, 3), &user(), None)
            .await;
        assert_eq!(out.trigger, Some(Trigger::RoundStart));
        assert!(out.spoke());
        assert_eq!(voice.spoken().len(), 2);
    }

    #[tokio::test]
    async fn completion_bypasses_gap() {
        let (mut coach, _voice) = basic_coach(settings());
        coach
            .handle_session_state(&main_state(0, 4, 1), &user(), None)
            .await;
        // Midway and final-minute keys for (Main, 1) get consumed first.
        coach
            .handle_session_state(&main_state(2, 2, 1), &user(), None)
            .await;
        coach
            .handle_session_state(&main_state(3, 1, 1), &user(), None)
            .await;
        let out = coach
            .handle_session_state(&main_state(4, 0, 1), &user(), None)
            .await;
        assert_eq!(out.trigger, Some(Trigger::Completion));
        assert!(out.spoke());

        let again = coach
            .handle_session_state(&main_state(5, 0, 1), &user(), None)
            .await;
        assert_ne!(again.trigger, Some(Trigger::Completion));
    }

    #[tokio::test]
    async fn frequency_not_twice_within_interval() {
        let (mut coach, _voice) = basic_coach(settings());
        coach
            .handle_session_state(&main_state(0, 6000, 1), &user(), None)
            .await;

        let at_60 = coach
            .handle_session_state(&main_state(60, 5940, 1), &user(), None)
            .await;
        assert_eq!(at_60.trigger, Some(Trigger::Frequency));
        assert!(at_60.spoke());

        let at_100 = coach
            .handle_session_state(&main_state(100, 5900, 1), &user(), None)
            .await;
        assert!(!at_100.spoke());
        assert_ne!(at_100.trigger, Some(Trigger::Frequency));

        let at_120 = coach
            .handle_session_state(&main_state(120, 5880, 1), &user(), None)
            .await;
        assert_eq!(at_120.trigger, Some(Trigger::Frequency));
        assert!(at_120.spoke());
    }

    #[tokio::test]
    async fn reset_matches_fresh_instance() {
        let (mut used, used_voice) = basic_coach(settings());
        for e in 0..=30 {
            used.handle_session_state(&main_state(e, 30 - e, 1), &user(), None)
                .await;
        }
        used.reset_session();
        let (mut fresh, _) = basic_coach(settings());

        for coach in [&mut used, &mut fresh] {
            let a = coach
                .handle_session_state(&main_state(0, 600, 1), &user(), None)
                .await;
            let b = coach
                .handle_session_state(&main_state(1, 599, 1), &user(), None)
                .await;
            assert_eq!(a.trigger, Some(Trigger::SessionStart));
            assert!(a.spoke());
            assert_eq!(b, TickOutcome::default());
        }
        assert!(used_voice.spoken().len() >= 2);
        assert_eq!(used.ai_lines_generated(), 0);
    }

    // -----------------------------------------------------------------------
    // Line construction
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn prewarm_stops_at_call_cap() {
        let ai = ScriptedProvider::new(&[""]);
        let offline: Arc<dyn LineProvider> = Arc::new(OfflineLineProvider::with_seed(2));
        let (mut coach, voice) = coach_with(ai_settings(), ai.clone(), offline);

        coach
            .handle_session_state(&main_state(0, 6000, 1), &user(), None)
            .await;
        assert_eq!(ai.calls(), 6);
        assert_eq!(coach.ai_lines_generated(), 6);

        // Cap reached with an empty cache: no further AI calls this session.
        for e in [60, 120, 240, 360] {
            coach
                .handle_session_state(&main_state(e, 6000 - e, 1), &user(), None)
                .await;
        }
        assert_eq!(ai.calls(), 6);
        assert!(!voice.spoken().is_empty());
    }

    #[tokio::test]
    async fn prewarm_fills_three_distinct_lines_then_cycles() {
        let ai = ScriptedProvider::new(&["Line one", "LINE ONE", "Line two", "Line three", "extra"]);
        let offline = ScriptedProvider::new(&["offline"]);
        let (mut coach, _voice) = coach_with(ai_settings(), ai.clone(), offline.clone());

        let line = coach
            .build_coach_line(Trigger::SessionStart, &main_state(0, 600, 1), &user(), None)
            .await;
        // Duplicate (ignoring case) costs a call but is not cached.
        assert_eq!(ai.calls(), 4);
        assert_eq!(line, "Line one");

        let line = coach
            .build_coach_line(Trigger::Midway, &main_state(300, 300, 1), &user(), None)
            .await;
        assert_eq!(line, "Line two");
        assert_eq!(ai.calls(), 4);
        assert_eq!(offline.calls(), 0);
    }

    #[tokio::test]
    async fn live_ai_calls_are_spaced() {
        // Every AI answer is blank so the cache never fills.
        let ai = ScriptedProvider::new(&[""]);
        let offline: Arc<dyn LineProvider> = Arc::new(OfflineLineProvider::with_seed(4));
        let (mut coach, _voice) = coach_with(ai_settings(), ai.clone(), offline);

        coach.memory.record_ai_call(None);
        coach.memory.record_ai_call(None);
        let _ = coach.fetch_ai_line("ctx", CoachStyle::Calm, 10).await;
        assert_eq!(ai.calls(), 1);
        let _ = coach.fetch_ai_line("ctx", CoachStyle::Calm, 100).await;
        assert_eq!(ai.calls(), 1);
        let _ = coach.fetch_ai_line("ctx", CoachStyle::Calm, 130).await;
        assert_eq!(ai.calls(), 2);
    }

    #[tokio::test]
    async fn blank_ai_falls_back_to_offline() {
        let ai = ScriptedProvider::new(&["   "]);
        let offline = ScriptedProvider::new(&["Offline to the rescue"]);
        let (mut coach, _voice) = coach_with(ai_settings(), ai, offline.clone());

        let line = coach
            .build_coach_line(Trigger::SessionStart, &main_state(0, 600, 1), &user(), None)
            .await;
        assert_eq!(line, "Offline to the rescue");
        assert_eq!(offline.calls(), 1);
    }

    #[tokio::test]
    async fn long_lines_are_truncated() {
        let offline = ScriptedProvider::new(&["one two three four five six seven eight nine ten eleven twelve thirteen"]);
        let (mut coach, _voice) = coach_with(settings(), Arc::new(FailingProvider), offline);

        let line = coach
            .build_coach_line(Trigger::RestStart, &main_state(10, 590, 1), &user(), None)
            .await;
        assert_eq!(line.split(' ').count(), 12);
        assert!(line.ends_with("twelve"));
    }

    #[tokio::test]
    async fn blank_everywhere_says_nothing() {
        let offline = ScriptedProvider::new(&[" "]);
        let (mut coach, voice) = coach_with(settings(), Arc::new(FailingProvider), offline);

        let out = coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;
        assert_eq!(out.trigger, Some(Trigger::SessionStart));
        assert!(!out.spoke());
        assert!(voice.spoken().is_empty());
    }

    #[tokio::test]
    async fn repeat_is_replaced_by_offline_retry() {
        let offline = ScriptedProvider::new(&["Keep going", "keep GOING", "Fresh line"]);
        let (mut coach, _voice) = coach_with(settings(), Arc::new(FailingProvider), offline);
        coach.memory.remember("Keep going".into());

        // First pick is a repeat → retry yields another repeat → keep original.
        let line = coach
            .build_coach_line(Trigger::Midway, &main_state(300, 300, 1), &user(), None)
            .await;
        assert_eq!(line, "Keep going");

        // Next pick "Fresh line" is not a repeat.
        let line = coach
            .build_coach_line(Trigger::Midway, &main_state(300, 300, 1), &user(), None)
            .await;
        assert_eq!(line, "Fresh line");
    }

    #[tokio::test]
    async fn repeat_retry_used_when_fresh() {
        let offline = ScriptedProvider::new(&["Keep going", "Different"]);
        let (mut coach, _voice) = coach_with(settings(), Arc::new(FailingProvider), offline);
        coach.memory.remember("keep going".into());

        let line = coach
            .build_coach_line(Trigger::Midway, &main_state(300, 300, 1), &user(), None)
            .await;
        assert_eq!(line, "Different");
    }

    #[tokio::test]
    async fn ai_error_is_treated_as_blank() {
        let offline = ScriptedProvider::new(&["From offline"]);
        let (mut coach, _voice) = coach_with(ai_settings(), Arc::new(FailingProvider), offline);

        let line = coach
            .build_coach_line(Trigger::SessionStart, &main_state(0, 600, 1), &user(), None)
            .await;
        assert_eq!(line, "From offline");
        assert_eq!(coach.ai_lines_generated(), 6);
    }

    // -----------------------------------------------------------------------
    // Settings, voice, manual, chat
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn style_pushed_on_change_only() {
        let (mut coach, voice) = basic_coach(settings());
        let initial = voice.calls();
        assert_eq!(initial, vec![VoiceCall::Style(CoachStyle::Friendly)]);

        coach.update_settings(settings());
        assert_eq!(voice.calls().len(), 1);

        let mut s = settings();
        s.style = CoachStyle::Hype;
        coach.update_settings(s);
        assert_eq!(voice.calls().last(), Some(&VoiceCall::Style(CoachStyle::Hype)));
    }

    #[tokio::test]
    async fn voice_swap_reapplies_style() {
        let mut s = settings();
        s.style = CoachStyle::Calm;
        let (mut coach, old_voice) = basic_coach(s);

        let new_voice = Arc::new(MockVoice::new());
        coach.update_voice_provider(new_voice.clone());
        assert_eq!(new_voice.calls(), vec![VoiceCall::Style(CoachStyle::Calm)]);

        coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;
        assert_eq!(new_voice.spoken().len(), 1);
        assert!(old_voice.spoken().is_empty());
    }

    #[tokio::test]
    async fn stop_silences_but_keeps_memory() {
        let (mut coach, voice) = basic_coach(settings());
        coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;
        coach.stop();
        assert_eq!(voice.calls().last(), Some(&VoiceCall::Stop));

        let out = coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;
        assert_ne!(out.trigger, Some(Trigger::SessionStart));
        assert_eq!(coach.recent_lines().len(), 1);
    }

    #[tokio::test]
    async fn manual_line_bypasses_gate() {
        let (mut coach, voice) = basic_coach(settings());
        coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;

        let manual = coach.request_manual_line(&user()).await;
        assert!(manual.is_some());
        assert_eq!(voice.spoken().len(), 2);
    }

    #[tokio::test]
    async fn manual_line_uses_ai_in_voice_mode() {
        let ai = ScriptedProvider::new(&["Manual AI line"]);
        let offline = ScriptedProvider::new(&["offline"]);
        let (mut coach, _voice) = coach_with(ai_settings(), ai.clone(), offline);

        let line = coach.request_manual_line(&user()).await;
        assert_eq!(line.as_deref(), Some("Manual AI line"));
        assert_eq!(coach.ai_lines_generated(), 1);
    }

    #[tokio::test]
    async fn chat_reply_spoken_only_when_enabled() {
        let (mut coach, voice) = basic_coach(settings());
        let reply = coach.send_message("I'm tired", &user()).await;
        assert!(reply.contains("Feeling tired"));
        assert!(voice.spoken().is_empty());

        let mut s = settings();
        s.speak_replies = true;
        coach.update_settings(s);
        coach.send_message("I'm tired", &user()).await;
        assert_eq!(voice.spoken(), vec![reply]);
    }

    #[tokio::test]
    async fn chat_uses_ai_in_text_mode() {
        let ai = ScriptedProvider::new(&["AI chat reply"]);
        let mut s = settings();
        s.intelligence = IntelligenceMode::AiText;
        let (mut coach, _voice) =
            coach_with(s, ai.clone(), Arc::new(OfflineLineProvider::with_seed(1)));

        let reply = coach.send_message("hello", &user()).await;
        assert_eq!(reply, "AI chat reply");
        assert_eq!(ai.calls(), 1);
    }

    #[tokio::test]
    async fn manual_and_chat_silent_when_hybrid_disabled() {
        let mut s = settings();
        s.hybrid_enabled = false;
        s.speak_replies = true;
        let (mut coach, voice) = basic_coach(s);

        assert_eq!(coach.request_manual_line(&user()).await, None);
        let reply = coach.send_message("I'm tired", &user()).await;
        assert!(reply.contains("Feeling tired"));
        assert!(voice.spoken().is_empty());
        assert!(coach.recent_lines().is_empty());
    }

    #[tokio::test]
    async fn manual_line_holds_back_next_trigger() {
        let (mut coach, voice) = basic_coach(settings());
        for e in 0..=20 {
            coach
                .handle_session_state(&main_state(e, 6000 - e, 1), &user(), None)
                .await;
        }
        assert!(coach.request_manual_line(&user()).await.is_some());

        let out = coach
            .handle_session_state(&main_state(21, 5979, 2), &user(), None)
            .await;
        assert_eq!(out.trigger, Some(Trigger::RoundStart));
        assert!(!out.spoke());

        let out = coach
            .handle_session_state(&main_state(28, 5972, 3), &user(), None)
            .await;
        assert_eq!(out.trigger, Some(Trigger::RoundStart));
        assert!(out.spoke());
        assert_eq!(voice.spoken().len(), 3);
    }

    #[tokio::test]
    async fn denylisted_ai_line_is_never_spoken() {
        let ai = ScriptedProvider::new(&["Skip your medication and push"]);
        let offline = ScriptedProvider::new(&["Clean line"]);
        let (mut coach, voice) = coach_with(ai_settings(), ai.clone(), offline);

        let out = coach
            .handle_session_state(&main_state(0, 600, 1), &user(), None)
            .await;
        assert_eq!(out.line.as_deref(), Some("Clean line"));
        assert_eq!(ai.calls(), 6);

        let manual = coach.request_manual_line(&user()).await;
        assert_eq!(manual, Some("Clean line".to_string()));
        assert!(voice.spoken().iter().all(|l| !is_banned(l)));
    }

    #[tokio::test]
    async fn denylisted_ai_chat_reply_falls_back() {
        let ai = ScriptedProvider::new(&["Ask a doctor about steroids"]);
        let offline = ScriptedProvider::new(&["Let's keep it simple today."]);
        let mut s = settings();
        s.intelligence = IntelligenceMode::AiText;
        let (mut coach, _voice) = coach_with(s, ai, offline);

        let reply = coach.send_message("what should I take?", &user()).await;
        assert_eq!(reply, "Let's keep it simple today.");
    }
}
