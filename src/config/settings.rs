//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the coach
//! task by value.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::session::SessionType;

// ---------------------------------------------------------------------------
// IntelligenceMode
// ---------------------------------------------------------------------------

/// Selects how much of the coach is driven by the AI line provider.
///
/// | Variant  | Tick lines        | Chat replies      |
/// |----------|-------------------|-------------------|
/// | Basic    | offline phrases   | offline keywords  |
/// | AiText   | offline phrases   | AI (with fallback)|
/// | AiVoice  | AI (with fallback)| AI (with fallback)|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntelligenceMode {
    Basic,
    AiText,
    AiVoice,
}

impl Default for IntelligenceMode {
    fn default() -> Self {
        Self::Basic
    }
}

// ---------------------------------------------------------------------------
// VoiceProviderKind
// ---------------------------------------------------------------------------

/// Which voice sink the composition root builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceProviderKind {
    /// Print spoken lines to stdout.
    Console,
    /// Text-only mode; nothing is voiced.
    Silent,
}

impl Default for VoiceProviderKind {
    fn default() -> Self {
        Self::Console
    }
}

// ---------------------------------------------------------------------------
// CoachStyle
// ---------------------------------------------------------------------------

/// Tone of the coaching lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoachStyle {
    Calm,
    Friendly,
    Hype,
    Military,
}

impl CoachStyle {
    /// Lower-case label used in prompts and console output.
    pub fn label(&self) -> &'static str {
        match self {
            CoachStyle::Calm => "calm",
            CoachStyle::Friendly => "friendly",
            CoachStyle::Hype => "hype",
            CoachStyle::Military => "military",
        }
    }
}

impl Default for CoachStyle {
    fn default() -> Self {
        Self::Friendly
    }
}

// ---------------------------------------------------------------------------
// CoachFrequency
// ---------------------------------------------------------------------------

/// How often the coach speaks unprompted during the main phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoachFrequency {
    /// Every 120 seconds.
    Low,
    /// Every 60 seconds.
    Medium,
    /// Every 30 seconds.
    High,
}

impl CoachFrequency {
    /// Interval between frequency-driven lines, in seconds.
    ///
    /// ```
    /// use workout_coach::config::CoachFrequency;
    ///
    /// assert_eq!(CoachFrequency::Low.interval_secs(), 120);
    /// assert_eq!(CoachFrequency::Medium.interval_secs(), 60);
    /// assert_eq!(CoachFrequency::High.interval_secs(), 30);
    /// ```
    pub fn interval_secs(&self) -> u64 {
        match self {
            CoachFrequency::Low => 120,
            CoachFrequency::Medium => 60,
            CoachFrequency::High => 30,
        }
    }
}

impl Default for CoachFrequency {
    fn default() -> Self {
        Self::Medium
    }
}

// ---------------------------------------------------------------------------
// CoachSettings
// ---------------------------------------------------------------------------

/// User-configurable coaching policy.
///
/// Replaced wholesale through
/// [`CoachOrchestrator::update_settings`](crate::coach::CoachOrchestrator::update_settings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachSettings {
    /// Umbrella switch; when `false` the coach never speaks: no tick lines,
    /// no manual lines, no voiced chat replies.
    pub hybrid_enabled: bool,
    /// How much of the coach is AI-driven.
    pub intelligence: IntelligenceMode,
    /// Which voice sink to build.
    pub voice_provider: VoiceProviderKind,
    /// Tone of the lines.
    pub style: CoachStyle,
    /// Unprompted line cadence during the main phase.
    pub frequency: CoachFrequency,
    /// Also voice free-form chat replies.
    pub speak_replies: bool,
}

impl CoachSettings {
    /// `true` when tick lines should come from the AI provider.
    pub fn ai_voice_enabled(&self) -> bool {
        self.hybrid_enabled && self.intelligence == IntelligenceMode::AiVoice
    }

    /// `true` when chat replies should come from the AI provider.
    pub fn ai_chat_enabled(&self) -> bool {
        self.hybrid_enabled && self.intelligence != IntelligenceMode::Basic
    }
}

impl Default for CoachSettings {
    fn default() -> Self {
        Self {
            hybrid_enabled: true,
            intelligence: IntelligenceMode::default(),
            voice_provider: VoiceProviderKind::default(),
            style: CoachStyle::default(),
            frequency: CoachFrequency::default(),
            speak_replies: false,
        }
    }
}

// ---------------------------------------------------------------------------
// LlmProvider
// ---------------------------------------------------------------------------

/// Selects which LLM backend generates AI lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Ollama running locally: no authentication required.
    Ollama,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, Together.ai, LM Studio …).
    /// Requires an API key.
    OpenAiCompatible,
    /// AI lines disabled: every request falls back to offline phrases.
    Disabled,
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::Ollama
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the AI line provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Whether the remote provider is contacted at all.
    pub enabled: bool,
    /// Which backend to use.
    pub provider: LlmProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key: `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"qwen2.5:3b"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a line before falling back.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: LlmProvider::default(),
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:3b".into(),
            temperature: 0.8,
            timeout_secs: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Shape of the simulated workout the binary drives the coach with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub session_type: SessionType,
    pub warmup_secs: u64,
    /// Length of each main-phase round.
    pub round_secs: u64,
    /// Rest between rounds (none after the last round).
    pub rest_secs: u64,
    pub rounds: u32,
    pub finisher_secs: u64,
    /// Wall-clock milliseconds per simulated second.  `1000` is real time.
    pub tick_millis: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_type: SessionType::Workout,
            warmup_secs: 120,
            round_secs: 180,
            rest_secs: 45,
            rounds: 3,
            finisher_secs: 90,
            tick_millis: 1000,
        }
    }
}

// ---------------------------------------------------------------------------
// ProfileConfig
// ---------------------------------------------------------------------------

/// Static user details used to build the per-tick `UserContext`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub goal: Option<String>,
    pub streak_days: Option<u32>,
    pub steps_today: Option<u32>,
    /// ISO date string, e.g. `"2026-10-18"`.
    pub last_workout_date: Option<String>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use workout_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Coaching policy.
    pub coach: CoachSettings,
    /// AI line provider settings.
    pub llm: LlmConfig,
    /// Simulated session shape.
    pub session: SessionConfig,
    /// User details fed to the coach each tick.
    pub profile: ProfileConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
