//! Configuration module for the workout coach.
//!
//! Provides `AppConfig` (top-level settings), the user-facing
//! [`CoachSettings`] policy, sub-configs for the LLM backend and the demo
//! session, `AppPaths` for cross-platform config directories, and TOML
//! persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, CoachFrequency, CoachSettings, CoachStyle, IntelligenceMode, LlmConfig,
    LlmProvider, ProfileConfig, SessionConfig, VoiceProviderKind,
};
