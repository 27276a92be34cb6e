//! Prompt builder for coaching one-liners and chat replies.
//!
//! Both prompts come back as a `(system_msg, user_msg)` pair for an
//! OpenAI-compatible `/v1/chat/completions` endpoint.

use crate::config::CoachStyle;

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

const ONE_LINER_INSTRUCTION: &str = "\
You are a workout coach speaking to an athlete mid-session through their earbuds.
Task: Say ONE short line that fits the moment described in the context.

Rules:
1. At most 12 words.
2. No medical, diet or injury advice.
3. No emojis, hashtags, quotes or stage directions.
4. Reply with ONLY the line to be spoken.";

const CHAT_INSTRUCTION: &str = "\
You are a supportive workout coach answering a short question from an athlete.

Rules:
1. Keep the answer under 60 words.
2. Never give medical advice; suggest a professional for pain or injury.
3. Use the context to personalise the answer when it helps.
4. Reply with plain text only.";

fn style_hint(style: CoachStyle) -> &'static str {
    match style {
        CoachStyle::Calm => "Tone: calm, steady, encouraging breath and focus.",
        CoachStyle::Friendly => "Tone: warm and upbeat, like a training buddy.",
        CoachStyle::Hype => "Tone: loud, high-energy, hype-man.",
        CoachStyle::Military => "Tone: drill sergeant, clipped commands.",
    }
}

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds coaching prompts in chat-message format.
///
/// # Example
/// ```rust
/// use workout_coach::config::CoachStyle;
/// use workout_coach::llm::PromptBuilder;
///
/// let builder = PromptBuilder::new();
/// let (system, user) = builder.build_one_liner("phase=main trigger=MIDWAY", CoachStyle::Hype);
/// assert!(system.contains("12 words"));
/// assert!(user.contains("trigger=MIDWAY"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Prompt for a single spoken line.
    pub fn build_one_liner(&self, context: &str, style: CoachStyle) -> (String, String) {
        let system_msg = format!("{}\n{}", ONE_LINER_INSTRUCTION, style_hint(style));
        let user_msg = format!("Context: {}\n\nLine:", context);
        (system_msg, user_msg)
    }

    /// Prompt for a free-form chat reply.
    pub fn build_chat(&self, user_text: &str, context: &str) -> (String, String) {
        let system_msg = CHAT_INSTRUCTION.to_string();

        let mut user_msg = String::with_capacity(256);
        if !context.is_empty() {
            user_msg.push_str(&format!("Context: {}\n\n", context));
        }
        user_msg.push_str(&format!("Athlete: {}\n\nCoach:", user_text.trim()));

        (system_msg, user_msg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
