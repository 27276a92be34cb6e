//! Deterministic (offline) line provider.
//!
//! [`OfflineLineProvider`] needs no network: one-liners come from a fixed
//! phrase bank per [`CoachStyle`], chat replies from keyword buckets.  It is
//! the fallback behind every AI call and the sole provider in Basic mode.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::CoachStyle;
use crate::llm::provider::{LineProvider, LlmError};

// ---------------------------------------------------------------------------
// Phrase banks
// ---------------------------------------------------------------------------

const CALM_LINES: &[&str] = &[
    "Breathe slow and steady, you are doing well.",
    "Relax your shoulders and keep a smooth rhythm.",
    "Stay present, one rep at a time.",
    "Nice and controlled, keep that pace.",
    "Find your breath, then find your strength.",
];

const FRIENDLY_LINES: &[&str] = &[
    "You're doing great, keep it up!",
    "Nice work, I'm proud of this effort.",
    "Keep going, you've got this!",
    "Looking strong, stay with it.",
    "Great pace, let's keep moving together.",
];

const HYPE_LINES: &[&str] = &[
    "Let's go! Bring the energy!",
    "This is your moment, push it!",
    "Turn it up, you are on fire!",
    "Big effort now, no holding back!",
    "Crush it, champion, all the way!",
];

const MILITARY_LINES: &[&str] = &[
    "Eyes forward. Keep moving.",
    "No excuses. Finish the set.",
    "Discipline over comfort. Push.",
    "Hold the line, soldier.",
    "Form tight. Drive through.",
];

fn lines_for(style: CoachStyle) -> &'static [&'static str] {
    match style {
        CoachStyle::Calm => CALM_LINES,
        CoachStyle::Friendly => FRIENDLY_LINES,
        CoachStyle::Hype => HYPE_LINES,
        CoachStyle::Military => MILITARY_LINES,
    }
}

// ---------------------------------------------------------------------------
// Chat buckets
// ---------------------------------------------------------------------------

struct ChatBucket {
    keywords: &'static [&'static str],
    reply: &'static str,
}

/// Checked in order; the first bucket with a matching keyword wins.
static CHAT_BUCKETS: &[ChatBucket] = &[
    ChatBucket {
        keywords: &["plan", "program", "schedule"],
        reply: "Start with a short warmup, then three strong rounds and an easy finisher. Consistency beats intensity.",
    },
    ChatBucket {
        keywords: &["tired", "exhausted", "fatigue"],
        reply: "Feeling tired is normal. Slow the pace, focus on breathing, and finish with good form.",
    },
    ChatBucket {
        keywords: &["rest", "recover", "break"],
        reply: "Rest is part of training. Take the full break, sip water, and come back ready.",
    },
    ChatBucket {
        keywords: &["form", "technique", "posture"],
        reply: "Quality first: slow the movement down, brace your core, and stop the set if form breaks.",
    },
    ChatBucket {
        keywords: &["motivat", "bored", "lazy"],
        reply: "Just start the first minute. Momentum shows up once you move.",
    },
];

const GENERIC_REPLIES: &[&str] = &[
    "Keep showing up. Small sessions add up to big results.",
    "Good question. Listen to your body and keep the effort honest.",
    "Stay consistent and the progress will follow.",
    "One workout at a time. You're building something.",
];

// ---------------------------------------------------------------------------
// OfflineLineProvider
// ---------------------------------------------------------------------------

/// Phrase-bank provider.  Never returns `Err` and never returns blank text.
///
/// # Example
/// ```rust
/// use workout_coach::config::CoachStyle;
/// use workout_coach::llm::{LineProvider, OfflineLineProvider};
///
/// # #[tokio::main] async fn main() {
/// let offline = OfflineLineProvider::with_seed(7);
/// let line = offline.generate_one_liner("", CoachStyle::Calm).await.unwrap();
/// assert!(!line.is_empty());
/// # }
/// ```
pub struct OfflineLineProvider {
    rng: Mutex<StdRng>,
}

impl OfflineLineProvider {
    /// Provider seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Provider with reproducible choices.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Synchronous pick used by both trait methods.
    pub fn pick_line(&self, style: CoachStyle) -> String {
        self.pick(lines_for(style))
    }

    /// Synchronous chat reply.
    pub fn reply_to(&self, user_text: &str) -> String {
        let lowered = user_text.to_lowercase();
        CHAT_BUCKETS
            .iter()
            .find(|bucket| bucket.keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|bucket| bucket.reply.to_string())
            .unwrap_or_else(|| self.pick(GENERIC_REPLIES))
    }

    fn pick(&self, bank: &'static [&'static str]) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        bank.choose(&mut *rng).copied().unwrap_or_default().to_string()
    }
}

impl Default for OfflineLineProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineProvider for OfflineLineProvider {
    async fn generate_one_liner(
        &self,
        _context: &str,
        style: CoachStyle,
    ) -> Result<String, LlmError> {
        Ok(self.pick_line(style))
    }

    async fn send_message(&self, user_text: &str, _context: &str) -> Result<String, LlmError> {
        Ok(self.reply_to(user_text))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
